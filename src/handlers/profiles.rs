use serde::Serialize;

use super::with_editor;
use crate::config::ServerConfig;
use crate::pom::Profile;
use crate::protocol::ToolResult;

#[derive(Debug, Serialize)]
struct ProfileList {
    profiles: Vec<Profile>,
}

/// Handle a `pom.list_profiles` tool call.
///
/// Profiles are returned in document order with the entries each one
/// declares. Profiles without an `<id>` are not addressable and are left out.
pub async fn list(config: &ServerConfig) -> ToolResult {
    match with_editor(config, |editor| editor.list_profiles()).await {
        Ok(profiles) => ToolResult::json(&ProfileList { profiles }),
        Err(err) => err.into(),
    }
}
