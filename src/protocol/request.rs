use serde::{Deserialize, Serialize};

/// JSON-RPC 2.0 ID: a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RpcId {
    Number(i64),
    Str(String),
}

/// JSON-RPC 2.0 request envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: Option<RpcId>,
    pub method: String,
    pub params: Option<serde_json::Value>,
}

/// MCP `initialize` params.
#[derive(Debug, Clone, Deserialize)]
pub struct InitializeParams {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: Option<String>,
    #[serde(rename = "clientInfo")]
    pub client_info: Option<ClientInfo>,
}

/// Client information sent during `initialize`.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientInfo {
    pub name: Option<String>,
    pub version: Option<String>,
}

/// Parameters for `tools/call`.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallParams {
    pub name: String,
    pub arguments: Option<serde_json::Value>,
}

/// Parameters for `resources/read`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadResourceParams {
    pub uri: String,
}

// ---------------------------------------------------------------------------
// Tool arguments
//
// `profile_id` is passed through untouched; handlers normalize it with
// `ProfileScope::from_profile_id`.
// ---------------------------------------------------------------------------

/// Arguments for tools that only take an optional profile.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileParams {
    pub profile_id: Option<String>,
}

/// Arguments for `pom.list_dependencies` / `pom.list_managed_dependencies`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListDependenciesParams {
    pub profile_id: Option<String>,
    /// Dependency scope filter (`compile`, `test`, ...).
    pub scope: Option<String>,
}

/// Identity key of a dependency.
#[derive(Debug, Clone, Deserialize)]
pub struct DependencyKeyParams {
    pub group_id: String,
    pub artifact_id: String,
    pub profile_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddDependencyParams {
    pub group_id: String,
    pub artifact_id: String,
    pub version: Option<String>,
    #[serde(rename = "type")]
    pub dependency_type: Option<String>,
    pub scope: Option<String>,
    pub profile_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateDependencyVersionParams {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub profile_id: Option<String>,
}

/// Identity key of a plugin; `group_id` may be omitted for standard plugins.
#[derive(Debug, Clone, Deserialize)]
pub struct PluginKeyParams {
    pub group_id: Option<String>,
    pub artifact_id: String,
    pub profile_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddPluginParams {
    pub group_id: Option<String>,
    pub artifact_id: String,
    pub version: Option<String>,
    pub inherited: Option<bool>,
    pub profile_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePluginVersionParams {
    pub group_id: Option<String>,
    pub artifact_id: String,
    pub version: String,
    pub profile_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PropertyParams {
    pub key: String,
    pub value: String,
    pub profile_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PropertyKeyParams {
    pub key: String,
    pub profile_id: Option<String>,
}
