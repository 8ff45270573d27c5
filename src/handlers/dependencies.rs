//! `pom.*dependency*` tools, shared by `<dependencies>` and
//! `<dependencyManagement>` through [`DependencySection`].

use serde::Serialize;

use super::{confirmation, list_scope, with_editor};
use crate::config::ServerConfig;
use crate::pom::model::dependency_coordinates;
use crate::pom::{Dependency, DependencySection, PomError, ProfileScope, Scoped};
use crate::protocol::{
    AddDependencyParams, DependencyKeyParams, ListDependenciesParams, ToolResult,
    UpdateDependencyVersionParams,
};

#[derive(Debug, Serialize)]
struct DependencyList {
    dependencies: Vec<Scoped<Dependency>>,
}

#[derive(Debug, Serialize)]
struct Exists {
    exists: bool,
}

pub async fn list(
    section: DependencySection,
    params: ListDependenciesParams,
    config: &ServerConfig,
) -> ToolResult {
    let scope = list_scope(params.profile_id.as_deref());
    let outcome = with_editor(config, move |editor| match params.scope.as_deref() {
        Some(dependency_scope) => {
            editor.list_dependencies_with_scope(section, scope.as_ref(), dependency_scope)
        }
        None => editor.list_dependencies(section, scope.as_ref()),
    })
    .await;

    match outcome {
        Ok(dependencies) => ToolResult::json(&DependencyList { dependencies }),
        Err(err) => err.into(),
    }
}

/// Fails with `entity_not_found` when the dependency is not declared.
pub async fn get(
    section: DependencySection,
    params: DependencyKeyParams,
    config: &ServerConfig,
) -> ToolResult {
    let scope = ProfileScope::from_profile_id(params.profile_id.as_deref());
    let outcome = with_editor(config, move |editor| {
        match editor.find_dependency(section, &scope, &params.group_id, &params.artifact_id)? {
            Some(dependency) => Ok(Scoped::new(scope.profile_id(), dependency)),
            None => Err(PomError::EntityNotFound {
                kind: section.kind(),
                key: dependency_coordinates(&params.group_id, &params.artifact_id),
                scope,
            }),
        }
    })
    .await;

    match outcome {
        Ok(dependency) => ToolResult::json(&dependency),
        Err(err) => err.into(),
    }
}

pub async fn exists(
    section: DependencySection,
    params: DependencyKeyParams,
    config: &ServerConfig,
) -> ToolResult {
    let scope = ProfileScope::from_profile_id(params.profile_id.as_deref());
    let outcome = with_editor(config, move |editor| {
        editor.dependency_exists(section, &scope, &params.group_id, &params.artifact_id)
    })
    .await;

    match outcome {
        Ok(exists) => ToolResult::json(&Exists { exists }),
        Err(err) => err.into(),
    }
}

pub async fn add(
    section: DependencySection,
    params: AddDependencyParams,
    config: &ServerConfig,
) -> ToolResult {
    let scope = ProfileScope::from_profile_id(params.profile_id.as_deref());
    let mut dependency = Dependency::new(params.group_id, params.artifact_id);
    dependency.version = params.version;
    dependency.dependency_type = params.dependency_type;
    dependency.scope = params.scope;

    let outcome = with_editor(config, move |editor| {
        let coordinates = dependency.coordinates();
        editor.add_dependency(section, &scope, dependency)?;
        Ok(format!("{} '{coordinates}' added to {scope}", section.kind()))
    })
    .await;

    confirmation(outcome)
}

pub async fn update_version(
    section: DependencySection,
    params: UpdateDependencyVersionParams,
    config: &ServerConfig,
) -> ToolResult {
    let scope = ProfileScope::from_profile_id(params.profile_id.as_deref());
    let outcome = with_editor(config, move |editor| {
        editor.update_dependency_version(
            section,
            &scope,
            &params.group_id,
            &params.artifact_id,
            &params.version,
        )?;
        Ok(format!(
            "{} '{}' set to version {} in {scope}",
            section.kind(),
            dependency_coordinates(&params.group_id, &params.artifact_id),
            params.version
        ))
    })
    .await;

    confirmation(outcome)
}

pub async fn remove(
    section: DependencySection,
    params: DependencyKeyParams,
    config: &ServerConfig,
) -> ToolResult {
    let scope = ProfileScope::from_profile_id(params.profile_id.as_deref());
    let outcome = with_editor(config, move |editor| {
        let removed =
            editor.remove_dependency(section, &scope, &params.group_id, &params.artifact_id)?;
        Ok(format!(
            "{} '{}' removed from {scope}",
            section.kind(),
            removed.coordinates()
        ))
    })
    .await;

    confirmation(outcome)
}
