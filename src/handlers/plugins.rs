use serde::Serialize;

use super::{confirmation, list_scope, with_editor};
use crate::config::ServerConfig;
use crate::pom::model::plugin_coordinates;
use crate::pom::{Plugin, ProfileScope, Scoped};
use crate::protocol::{
    AddPluginParams, PluginKeyParams, ProfileParams, ToolResult, UpdatePluginVersionParams,
};

#[derive(Debug, Serialize)]
struct PluginList {
    plugins: Vec<Scoped<Plugin>>,
}

pub async fn list(params: ProfileParams, config: &ServerConfig) -> ToolResult {
    let scope = list_scope(params.profile_id.as_deref());
    match with_editor(config, move |editor| editor.list_plugins(scope.as_ref())).await {
        Ok(plugins) => ToolResult::json(&PluginList { plugins }),
        Err(err) => err.into(),
    }
}

pub async fn add(params: AddPluginParams, config: &ServerConfig) -> ToolResult {
    let scope = ProfileScope::from_profile_id(params.profile_id.as_deref());
    let mut plugin = Plugin::new(params.group_id, params.artifact_id);
    plugin.version = params.version;
    plugin.inherited = params.inherited;

    let outcome = with_editor(config, move |editor| {
        let coordinates = plugin.coordinates();
        editor.add_plugin(&scope, plugin)?;
        Ok(format!("Plugin '{coordinates}' added to {scope}"))
    })
    .await;

    confirmation(outcome)
}

pub async fn update_version(params: UpdatePluginVersionParams, config: &ServerConfig) -> ToolResult {
    let scope = ProfileScope::from_profile_id(params.profile_id.as_deref());
    let outcome = with_editor(config, move |editor| {
        let group_id = params.group_id.as_deref();
        editor.update_plugin_version(&scope, group_id, &params.artifact_id, &params.version)?;
        Ok(format!(
            "Plugin '{}' set to version {} in {scope}",
            plugin_coordinates(group_id, &params.artifact_id),
            params.version
        ))
    })
    .await;

    confirmation(outcome)
}

/// A missing `group_id` matches plugins declared without one and plugins
/// declared with the default Maven plugin group.
pub async fn remove(params: PluginKeyParams, config: &ServerConfig) -> ToolResult {
    let scope = ProfileScope::from_profile_id(params.profile_id.as_deref());
    let outcome = with_editor(config, move |editor| {
        let removed = editor.remove_plugin(&scope, params.group_id.as_deref(), &params.artifact_id)?;
        Ok(format!("Plugin '{}' removed from {scope}", removed.coordinates()))
    })
    .await;

    confirmation(outcome)
}
