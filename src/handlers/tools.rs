//! Tool catalog advertised by `tools/list`.
//!
//! The `inputSchema` of each tool is also what `tools/call` validates
//! arguments against before dispatching.

use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

fn profile_id() -> Value {
    json!({
        "type": ["string", "null"],
        "description": "Profile id. Omit, null, blank or \"null\" for the main POM"
    })
}

fn list_profile_id() -> Value {
    json!({
        "type": ["string", "null"],
        "description": "Restrict to one profile. Omit (or null) to list the main POM and all profiles"
    })
}

fn string(description: &str) -> Value {
    json!({ "type": "string", "minLength": 1, "description": description })
}

fn optional_string(description: &str) -> Value {
    json!({ "type": ["string", "null"], "description": description })
}

fn schema(required: &[&str], properties: Value) -> Value {
    json!({
        "type": "object",
        "required": required,
        "properties": properties
    })
}

fn list_dependencies_schema() -> Value {
    schema(
        &[],
        json!({
            "profile_id": list_profile_id(),
            "scope": optional_string("Only dependencies with this scope; a missing scope counts as compile")
        }),
    )
}

fn dependency_key_schema() -> Value {
    schema(
        &["group_id", "artifact_id"],
        json!({
            "group_id": string("Dependency groupId"),
            "artifact_id": string("Dependency artifactId"),
            "profile_id": profile_id()
        }),
    )
}

fn add_dependency_schema() -> Value {
    schema(
        &["group_id", "artifact_id"],
        json!({
            "group_id": string("Dependency groupId"),
            "artifact_id": string("Dependency artifactId"),
            "version": optional_string("Version or ${property} reference"),
            "type": optional_string("Packaging type; jar is the default and is not written"),
            "scope": optional_string("Dependency scope; compile is the default and is not written"),
            "profile_id": profile_id()
        }),
    )
}

fn update_dependency_version_schema() -> Value {
    schema(
        &["group_id", "artifact_id", "version"],
        json!({
            "group_id": string("Dependency groupId"),
            "artifact_id": string("Dependency artifactId"),
            "version": string("New version"),
            "profile_id": profile_id()
        }),
    )
}

fn plugin_group_id() -> Value {
    optional_string("Plugin groupId; omitted means org.apache.maven.plugins")
}

/// Every tool the server exposes, in advertisement order.
pub fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "pom.list_dependencies",
            description: "List dependencies of the main POM and its profiles, each tagged with its profile id",
            input_schema: list_dependencies_schema(),
        },
        ToolDefinition {
            name: "pom.get_dependency",
            description: "Get one dependency by groupId and artifactId",
            input_schema: dependency_key_schema(),
        },
        ToolDefinition {
            name: "pom.dependency_exists",
            description: "Check whether a dependency is declared",
            input_schema: dependency_key_schema(),
        },
        ToolDefinition {
            name: "pom.add_dependency",
            description: "Add a dependency to the main POM or a profile",
            input_schema: add_dependency_schema(),
        },
        ToolDefinition {
            name: "pom.update_dependency_version",
            description: "Set the version of a declared dependency",
            input_schema: update_dependency_version_schema(),
        },
        ToolDefinition {
            name: "pom.remove_dependency",
            description: "Remove a declared dependency",
            input_schema: dependency_key_schema(),
        },
        ToolDefinition {
            name: "pom.list_managed_dependencies",
            description: "List dependencyManagement entries of the main POM and its profiles",
            input_schema: list_dependencies_schema(),
        },
        ToolDefinition {
            name: "pom.get_managed_dependency",
            description: "Get one dependencyManagement entry by groupId and artifactId",
            input_schema: dependency_key_schema(),
        },
        ToolDefinition {
            name: "pom.managed_dependency_exists",
            description: "Check whether a dependencyManagement entry is declared",
            input_schema: dependency_key_schema(),
        },
        ToolDefinition {
            name: "pom.add_managed_dependency",
            description: "Add a dependencyManagement entry, creating the section if needed",
            input_schema: add_dependency_schema(),
        },
        ToolDefinition {
            name: "pom.update_managed_dependency_version",
            description: "Set the version of a dependencyManagement entry",
            input_schema: update_dependency_version_schema(),
        },
        ToolDefinition {
            name: "pom.remove_managed_dependency",
            description: "Remove a dependencyManagement entry",
            input_schema: dependency_key_schema(),
        },
        ToolDefinition {
            name: "pom.list_plugins",
            description: "List build plugins of the main POM and its profiles, with plugin-level dependencies",
            input_schema: schema(&[], json!({ "profile_id": list_profile_id() })),
        },
        ToolDefinition {
            name: "pom.add_plugin",
            description: "Add a build plugin, creating <build><plugins> if needed",
            input_schema: schema(
                &["artifact_id"],
                json!({
                    "group_id": plugin_group_id(),
                    "artifact_id": string("Plugin artifactId"),
                    "version": optional_string("Plugin version"),
                    "inherited": {
                        "type": ["boolean", "null"],
                        "description": "Whether child POMs inherit the plugin; omitted when null"
                    },
                    "profile_id": profile_id()
                }),
            ),
        },
        ToolDefinition {
            name: "pom.update_plugin_version",
            description: "Set the version of a build plugin",
            input_schema: schema(
                &["artifact_id", "version"],
                json!({
                    "group_id": plugin_group_id(),
                    "artifact_id": string("Plugin artifactId"),
                    "version": string("New version"),
                    "profile_id": profile_id()
                }),
            ),
        },
        ToolDefinition {
            name: "pom.remove_plugin",
            description: "Remove a build plugin",
            input_schema: schema(
                &["artifact_id"],
                json!({
                    "group_id": plugin_group_id(),
                    "artifact_id": string("Plugin artifactId"),
                    "profile_id": profile_id()
                }),
            ),
        },
        ToolDefinition {
            name: "pom.list_properties",
            description: "List properties of the main POM and its profiles",
            input_schema: schema(&[], json!({ "profile_id": list_profile_id() })),
        },
        ToolDefinition {
            name: "pom.add_property",
            description: "Add a property",
            input_schema: schema(
                &["key", "value"],
                json!({
                    "key": string("Property name"),
                    "value": { "type": "string", "description": "Property value" },
                    "profile_id": profile_id()
                }),
            ),
        },
        ToolDefinition {
            name: "pom.update_property",
            description: "Change the value of an existing property",
            input_schema: schema(
                &["key", "value"],
                json!({
                    "key": string("Property name"),
                    "value": { "type": "string", "description": "Property value" },
                    "profile_id": profile_id()
                }),
            ),
        },
        ToolDefinition {
            name: "pom.remove_property",
            description: "Remove a property",
            input_schema: schema(
                &["key"],
                json!({
                    "key": string("Property name"),
                    "profile_id": profile_id()
                }),
            ),
        },
        ToolDefinition {
            name: "pom.list_profiles",
            description: "List profiles with the dependencies, plugins and properties each declares",
            input_schema: schema(&[], json!({})),
        },
    ]
}

pub fn find(name: &str) -> Option<ToolDefinition> {
    definitions().into_iter().find(|t| t.name == name)
}
