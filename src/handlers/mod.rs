pub mod dependencies;
pub mod plugins;
pub mod profiles;
pub mod properties;
pub mod resources;
pub mod tools;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::ServerConfig;
use crate::pom::{DependencySection, PomEditor, PomError, ProfileScope};
use crate::protocol::{
    InitializeParams, JsonRpcError, JsonRpcRequest, JsonRpcResponse, McpErrorCode,
    McpErrorResponse, ReadResourceParams, ToolCallParams, ToolResult,
};
use crate::schema;

/// Dispatch a JSON-RPC request to the appropriate handler.
///
/// Returns `None` for notifications (no response required).
pub async fn dispatch(
    req: &JsonRpcRequest,
    config: &ServerConfig,
) -> Option<JsonRpcResponse> {
    match req.method.as_str() {
        "initialize" => {
            if let Some(params) = req
                .params
                .clone()
                .and_then(|v| serde_json::from_value::<InitializeParams>(v).ok())
            {
                let client = params.client_info.as_ref();
                info!(
                    client = client.and_then(|c| c.name.as_deref()).unwrap_or("unknown"),
                    client_version = client.and_then(|c| c.version.as_deref()).unwrap_or("unknown"),
                    protocol = params.protocol_version.as_deref().unwrap_or("unspecified"),
                    "initialize"
                );
            }
            let result = serde_json::json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {
                    "tools": {},
                    "resources": {}
                },
                "serverInfo": {
                    "name": "pom-mcp-server",
                    "version": env!("CARGO_PKG_VERSION")
                }
            });
            Some(JsonRpcResponse::success(req.id.clone(), result))
        }

        "notifications/initialized" => None,

        "ping" => Some(JsonRpcResponse::success(req.id.clone(), serde_json::json!({}))),

        "tools/list" => {
            let result = serde_json::json!({ "tools": tools::definitions() });
            Some(JsonRpcResponse::success(req.id.clone(), result))
        }

        "tools/call" => {
            let params: ToolCallParams = match parse_params(req) {
                Ok(p) => p,
                Err(err) => return Some(JsonRpcResponse::error(req.id.clone(), err)),
            };

            let tool_result = dispatch_tool_call(&params, config).await;
            Some(match serde_json::to_value(&tool_result) {
                Ok(result_json) => JsonRpcResponse::success(req.id.clone(), result_json),
                Err(e) => {
                    error!(error = %e, "tool result serialization failed");
                    JsonRpcResponse::error(req.id.clone(), JsonRpcError::internal_error(e.to_string()))
                }
            })
        }

        "resources/list" => Some(JsonRpcResponse::success(
            req.id.clone(),
            resources::list(config),
        )),

        "resources/read" => {
            let params: ReadResourceParams = match parse_params(req) {
                Ok(p) => p,
                Err(err) => return Some(JsonRpcResponse::error(req.id.clone(), err)),
            };
            Some(match resources::read(&params, config).await {
                Ok(result) => JsonRpcResponse::success(req.id.clone(), result),
                Err(err) => JsonRpcResponse::error(req.id.clone(), err),
            })
        }

        _ => Some(JsonRpcResponse::error(
            req.id.clone(),
            JsonRpcError::method_not_found(&req.method),
        )),
    }
}

fn parse_params<T: DeserializeOwned>(req: &JsonRpcRequest) -> Result<T, JsonRpcError> {
    match &req.params {
        Some(v) => serde_json::from_value(v.clone()).map_err(|e| {
            JsonRpcError::invalid_params(format!("Invalid {} params: {e}", req.method))
        }),
        None => Err(JsonRpcError::invalid_params(format!(
            "Missing params for {}",
            req.method
        ))),
    }
}

async fn dispatch_tool_call(params: &ToolCallParams, config: &ServerConfig) -> ToolResult {
    let Some(tool) = tools::find(&params.name) else {
        return ToolResult::error(format!("Unknown tool: {}", params.name));
    };

    let arguments = params
        .arguments
        .clone()
        .unwrap_or_else(|| serde_json::json!({}));
    if let Err(e) = schema::validate_value(&tool.input_schema, &arguments) {
        debug!(tool = tool.name, error = %e, "rejected tool arguments");
        return McpErrorResponse::new(
            McpErrorCode::InvalidArguments,
            format!("Invalid arguments for {}: {e}", tool.name),
        )
        .into();
    }

    use DependencySection::{DependencyManagement as Managed, Dependencies as Direct};

    macro_rules! call {
        ($handler:path $(, $section:expr)?) => {
            match parse_arguments(tool.name, arguments) {
                Ok(args) => $handler($($section,)? args, config).await,
                Err(result) => result,
            }
        };
    }

    match tool.name {
        "pom.list_dependencies" => call!(dependencies::list, Direct),
        "pom.get_dependency" => call!(dependencies::get, Direct),
        "pom.dependency_exists" => call!(dependencies::exists, Direct),
        "pom.add_dependency" => call!(dependencies::add, Direct),
        "pom.update_dependency_version" => call!(dependencies::update_version, Direct),
        "pom.remove_dependency" => call!(dependencies::remove, Direct),

        "pom.list_managed_dependencies" => call!(dependencies::list, Managed),
        "pom.get_managed_dependency" => call!(dependencies::get, Managed),
        "pom.managed_dependency_exists" => call!(dependencies::exists, Managed),
        "pom.add_managed_dependency" => call!(dependencies::add, Managed),
        "pom.update_managed_dependency_version" => call!(dependencies::update_version, Managed),
        "pom.remove_managed_dependency" => call!(dependencies::remove, Managed),

        "pom.list_plugins" => call!(plugins::list),
        "pom.add_plugin" => call!(plugins::add),
        "pom.update_plugin_version" => call!(plugins::update_version),
        "pom.remove_plugin" => call!(plugins::remove),

        "pom.list_properties" => call!(properties::list),
        "pom.add_property" => call!(properties::add),
        "pom.update_property" => call!(properties::update),
        "pom.remove_property" => call!(properties::remove),

        "pom.list_profiles" => profiles::list(config).await,

        other => ToolResult::error(format!("Unknown tool: {other}")),
    }
}

fn parse_arguments<T: DeserializeOwned>(
    tool: &str,
    arguments: serde_json::Value,
) -> Result<T, ToolResult> {
    serde_json::from_value(arguments).map_err(|e| {
        McpErrorResponse::new(
            McpErrorCode::InvalidArguments,
            format!("Invalid arguments for {tool}: {e}"),
        )
        .into()
    })
}

/// Scope for list tools: `None` aggregates the main POM and every profile.
pub(crate) fn list_scope(profile_id: Option<&str>) -> Option<ProfileScope> {
    match ProfileScope::from_profile_id(profile_id) {
        ProfileScope::MainPom => None,
        scope => Some(scope),
    }
}

/// Run `operation` against the configured POM on a blocking thread.
///
/// Editor failures are logged and mapped to their MCP error object.
pub(crate) async fn with_editor<T, F>(config: &ServerConfig, operation: F) -> Result<T, McpErrorResponse>
where
    F: FnOnce(&PomEditor) -> Result<T, PomError> + Send + 'static,
    T: Send + 'static,
{
    let editor = PomEditor::new(config.pom_path());
    match tokio::task::spawn_blocking(move || operation(&editor)).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => {
            warn!(error = %err, "POM operation failed");
            Err(err.into())
        }
        Err(join_err) => {
            error!(error = %join_err, "task join error");
            Err(McpErrorResponse::canonical(McpErrorCode::InternalError))
        }
    }
}

#[derive(Debug, Serialize)]
struct Confirmation {
    status: &'static str,
    message: String,
}

/// Tool result for a successful mutation.
pub(crate) fn confirmation(outcome: Result<String, McpErrorResponse>) -> ToolResult {
    match outcome {
        Ok(message) => ToolResult::json(&Confirmation {
            status: "ok",
            message,
        }),
        Err(err) => err.into(),
    }
}
