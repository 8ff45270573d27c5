pub mod request;
pub mod response;

pub use request::{
    AddDependencyParams, AddPluginParams, DependencyKeyParams, InitializeParams,
    JsonRpcRequest, ListDependenciesParams, PluginKeyParams, ProfileParams, PropertyKeyParams,
    PropertyParams, ReadResourceParams, RpcId, ToolCallParams, UpdateDependencyVersionParams,
    UpdatePluginVersionParams,
};
pub use response::{
    JsonRpcError, JsonRpcResponse, McpError, McpErrorCode, McpErrorResponse, ToolResult,
    ToolResultContent,
};
