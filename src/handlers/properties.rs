use serde::Serialize;

use super::{confirmation, list_scope, with_editor};
use crate::config::ServerConfig;
use crate::pom::{ProfileScope, Property, Scoped};
use crate::protocol::{ProfileParams, PropertyKeyParams, PropertyParams, ToolResult};

#[derive(Debug, Serialize)]
struct PropertyList {
    properties: Vec<Scoped<Property>>,
}

pub async fn list(params: ProfileParams, config: &ServerConfig) -> ToolResult {
    let scope = list_scope(params.profile_id.as_deref());
    match with_editor(config, move |editor| editor.list_properties(scope.as_ref())).await {
        Ok(properties) => ToolResult::json(&PropertyList { properties }),
        Err(err) => err.into(),
    }
}

pub async fn add(params: PropertyParams, config: &ServerConfig) -> ToolResult {
    let scope = ProfileScope::from_profile_id(params.profile_id.as_deref());
    let outcome = with_editor(config, move |editor| {
        editor.add_property(&scope, &params.key, &params.value)?;
        Ok(format!("Property '{}' added to {scope}", params.key))
    })
    .await;

    confirmation(outcome)
}

pub async fn update(params: PropertyParams, config: &ServerConfig) -> ToolResult {
    let scope = ProfileScope::from_profile_id(params.profile_id.as_deref());
    let outcome = with_editor(config, move |editor| {
        editor.update_property(&scope, &params.key, &params.value)?;
        Ok(format!("Property '{}' updated in {scope}", params.key))
    })
    .await;

    confirmation(outcome)
}

pub async fn remove(params: PropertyKeyParams, config: &ServerConfig) -> ToolResult {
    let scope = ProfileScope::from_profile_id(params.profile_id.as_deref());
    let outcome = with_editor(config, move |editor| {
        let removed = editor.remove_property(&scope, &params.key)?;
        Ok(format!("Property '{}' removed from {scope}", removed.key))
    })
    .await;

    confirmation(outcome)
}
