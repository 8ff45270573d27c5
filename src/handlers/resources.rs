//! MCP resources: the POM being edited, exposed read-only.

use serde_json::{json, Value};

use super::with_editor;
use crate::config::ServerConfig;
use crate::protocol::{JsonRpcError, ReadResourceParams};

pub const POM_RESOURCE_URI: &str = "pom://project";
const POM_MIME_TYPE: &str = "application/xml";

pub fn list(config: &ServerConfig) -> Value {
    json!({
        "resources": [{
            "uri": POM_RESOURCE_URI,
            "name": "pom.xml",
            "description": format!("Maven POM at {}", config.pom_path().display()),
            "mimeType": POM_MIME_TYPE
        }]
    })
}

pub async fn read(params: &ReadResourceParams, config: &ServerConfig) -> Result<Value, JsonRpcError> {
    if params.uri != POM_RESOURCE_URI {
        return Err(JsonRpcError::invalid_params(format!(
            "Unknown resource: {}",
            params.uri
        )));
    }

    let text = with_editor(config, |editor| editor.read_raw()).await?;
    Ok(json!({
        "contents": [{
            "uri": POM_RESOURCE_URI,
            "mimeType": POM_MIME_TYPE,
            "text": text
        }]
    }))
}
