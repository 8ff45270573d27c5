//! File-backed POM operations.
//!
//! Each call loads the file, performs one lookup or edit, and writes the
//! file back only if the edit succeeded. Nothing is cached between calls;
//! callers must serialize access to a given path.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::document::{DependencySection, PomDocument};
use super::error::Result;
use super::model::{effective_scope, Dependency, Plugin, Profile, Property, Scoped};
use super::scope::ProfileScope;

#[derive(Debug, Clone)]
pub struct PomEditor {
    path: PathBuf,
}

impl PomEditor {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<PomDocument> {
        debug!(path = %self.path.display(), "loading POM");
        PomDocument::load(&self.path)
    }

    fn modify<T, F>(&self, edit: F) -> Result<T>
    where
        F: FnOnce(&mut PomDocument) -> Result<T>,
    {
        let mut document = self.load()?;
        let outcome = edit(&mut document)?;
        document.save(&self.path)?;
        debug!(path = %self.path.display(), "POM written");
        Ok(outcome)
    }

    /// Dependencies of one scope, or of every scope when `scope` is `None`.
    pub fn list_dependencies(
        &self,
        section: DependencySection,
        scope: Option<&ProfileScope>,
    ) -> Result<Vec<Scoped<Dependency>>> {
        let document = self.load()?;
        match scope {
            None => Ok(document.all_dependencies(section)),
            Some(scope) => Ok(document
                .dependencies(section, scope)?
                .into_iter()
                .map(|d| Scoped::new(scope.profile_id(), d))
                .collect()),
        }
    }

    /// Like [`list_dependencies`](Self::list_dependencies), keeping only
    /// entries whose effective scope is `dependency_scope`.
    pub fn list_dependencies_with_scope(
        &self,
        section: DependencySection,
        scope: Option<&ProfileScope>,
        dependency_scope: &str,
    ) -> Result<Vec<Scoped<Dependency>>> {
        let wanted = effective_scope(Some(dependency_scope));
        Ok(self
            .list_dependencies(section, scope)?
            .into_iter()
            .filter(|d| effective_scope(d.item.scope.as_deref()) == wanted)
            .collect())
    }

    pub fn dependency_exists(
        &self,
        section: DependencySection,
        scope: &ProfileScope,
        group_id: &str,
        artifact_id: &str,
    ) -> Result<bool> {
        Ok(self.find_dependency(section, scope, group_id, artifact_id)?.is_some())
    }

    pub fn find_dependency(
        &self,
        section: DependencySection,
        scope: &ProfileScope,
        group_id: &str,
        artifact_id: &str,
    ) -> Result<Option<Dependency>> {
        self.load()?
            .find_dependency(section, scope, group_id, artifact_id)
    }

    pub fn add_dependency(
        &self,
        section: DependencySection,
        scope: &ProfileScope,
        dependency: Dependency,
    ) -> Result<()> {
        let coordinates = dependency.coordinates();
        self.modify(|doc| doc.add_dependency(section, scope, dependency))?;
        info!(%coordinates, %scope, ?section, "dependency added");
        Ok(())
    }

    pub fn update_dependency_version(
        &self,
        section: DependencySection,
        scope: &ProfileScope,
        group_id: &str,
        artifact_id: &str,
        version: &str,
    ) -> Result<()> {
        self.modify(|doc| {
            doc.update_dependency_version(section, scope, group_id, artifact_id, version)
        })?;
        info!(group_id, artifact_id, version, %scope, ?section, "dependency version updated");
        Ok(())
    }

    pub fn remove_dependency(
        &self,
        section: DependencySection,
        scope: &ProfileScope,
        group_id: &str,
        artifact_id: &str,
    ) -> Result<Dependency> {
        let removed = self.modify(|doc| doc.remove_dependency(section, scope, group_id, artifact_id))?;
        info!(group_id, artifact_id, %scope, ?section, "dependency removed");
        Ok(removed)
    }

    pub fn list_plugins(&self, scope: Option<&ProfileScope>) -> Result<Vec<Scoped<Plugin>>> {
        let document = self.load()?;
        match scope {
            None => Ok(document.all_plugins()),
            Some(scope) => Ok(document
                .plugins(scope)?
                .into_iter()
                .map(|p| Scoped::new(scope.profile_id(), p))
                .collect()),
        }
    }

    pub fn find_plugin(
        &self,
        scope: &ProfileScope,
        group_id: Option<&str>,
        artifact_id: &str,
    ) -> Result<Option<Plugin>> {
        self.load()?.find_plugin(scope, group_id, artifact_id)
    }

    pub fn add_plugin(&self, scope: &ProfileScope, plugin: Plugin) -> Result<()> {
        let coordinates = plugin.coordinates();
        self.modify(|doc| doc.add_plugin(scope, plugin))?;
        info!(%coordinates, %scope, "plugin added");
        Ok(())
    }

    pub fn update_plugin_version(
        &self,
        scope: &ProfileScope,
        group_id: Option<&str>,
        artifact_id: &str,
        version: &str,
    ) -> Result<()> {
        self.modify(|doc| doc.update_plugin_version(scope, group_id, artifact_id, version))?;
        info!(artifact_id, version, %scope, "plugin version updated");
        Ok(())
    }

    pub fn remove_plugin(
        &self,
        scope: &ProfileScope,
        group_id: Option<&str>,
        artifact_id: &str,
    ) -> Result<Plugin> {
        let removed = self.modify(|doc| doc.remove_plugin(scope, group_id, artifact_id))?;
        info!(artifact_id, %scope, "plugin removed");
        Ok(removed)
    }

    pub fn list_properties(&self, scope: Option<&ProfileScope>) -> Result<Vec<Scoped<Property>>> {
        let document = self.load()?;
        match scope {
            None => Ok(document.all_properties()),
            Some(scope) => Ok(document
                .properties(scope)?
                .into_iter()
                .map(|p| Scoped::new(scope.profile_id(), p))
                .collect()),
        }
    }

    pub fn add_property(&self, scope: &ProfileScope, key: &str, value: &str) -> Result<()> {
        self.modify(|doc| doc.add_property(scope, key, value))?;
        info!(key, %scope, "property added");
        Ok(())
    }

    pub fn update_property(&self, scope: &ProfileScope, key: &str, value: &str) -> Result<()> {
        self.modify(|doc| doc.update_property(scope, key, value))?;
        info!(key, %scope, "property updated");
        Ok(())
    }

    pub fn remove_property(&self, scope: &ProfileScope, key: &str) -> Result<Property> {
        let removed = self.modify(|doc| doc.remove_property(scope, key))?;
        info!(key, %scope, "property removed");
        Ok(removed)
    }

    pub fn list_profiles(&self) -> Result<Vec<Profile>> {
        Ok(self.load()?.profiles())
    }

    /// Raw file content, for resource reads.
    pub fn read_raw(&self) -> Result<String> {
        std::fs::read_to_string(&self.path).map_err(|source| super::error::PomError::Read {
            path: self.path.clone(),
            source,
        })
    }
}
