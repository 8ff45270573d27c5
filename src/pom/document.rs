//! In-memory POM: typed reads and edits over the lossless element tree.
//!
//! Every lookup resolves the owning scope first (main `<project>` or one
//! `<profile>`), and every edit validates before touching the tree, so a
//! failed operation leaves the document exactly as loaded.

use std::path::Path;

use tracing::debug;

use super::error::{EntityKind, PomError, Result};
use super::model::{
    dependency_coordinates, effective_plugin_group_id, identity, is_valid_property_key,
    plugin_coordinates, Dependency, Plugin, Profile, Property, Scoped,
};
use super::scope::ProfileScope;
use super::xml::{Element, Layout, XmlDocument, XmlError};

/// Indentation used when the document gives no hint.
const DEFAULT_INDENT: &str = "    ";

const PLUGINS_PATH: &[&str] = &["build", "plugins"];
const PROPERTIES_PATH: &[&str] = &["properties"];

/// Which dependency list of a scope an operation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencySection {
    /// `<dependencies>`
    Dependencies,
    /// `<dependencyManagement><dependencies>`
    DependencyManagement,
}

impl DependencySection {
    fn path(self) -> &'static [&'static str] {
        match self {
            Self::Dependencies => &["dependencies"],
            Self::DependencyManagement => &["dependencyManagement", "dependencies"],
        }
    }

    pub fn kind(self) -> EntityKind {
        match self {
            Self::Dependencies => EntityKind::Dependency,
            Self::DependencyManagement => EntityKind::ManagedDependency,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PomDocument {
    xml: XmlDocument,
    layout: Layout,
}

impl PomDocument {
    pub fn parse(content: &str) -> std::result::Result<Self, XmlError> {
        let xml = XmlDocument::parse(content)?;
        if xml.root().local_name() != "project" {
            return Err(XmlError::UnexpectedRoot {
                expected: "project",
                found: xml.root().name().to_string(),
            });
        }

        let indent_unit = xml
            .root()
            .elements()
            .find_map(|e| e.indent().filter(|i| !i.is_empty()).map(str::to_string))
            .unwrap_or_else(|| DEFAULT_INDENT.to_string());

        let layout = Layout::new(indent_unit, Layout::detect_newline(content));

        Ok(Self { xml, layout })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| PomError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| PomError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_xml_string().map_err(|e| PomError::Write {
            path: path.to_path_buf(),
            source: std::io::Error::other(e),
        })?;
        std::fs::write(path, content).map_err(|source| PomError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn to_xml_string(&self) -> std::result::Result<String, XmlError> {
        self.xml.to_xml_string()
    }

    pub fn indent_unit(&self) -> &str {
        &self.layout.unit
    }

    /// Line terminator used for inserted lines, taken from the first line break.
    pub fn newline(&self) -> &'static str {
        self.layout.newline
    }

    fn project(&self) -> &Element {
        self.xml.root()
    }

    fn owner(&self, scope: &ProfileScope) -> Result<&Element> {
        match scope {
            ProfileScope::MainPom => Ok(self.project()),
            ProfileScope::Profile(id) => profile_elements(self.project())
                .find(|p| p.child_text("id").as_deref() == Some(id.as_str()))
                .ok_or_else(|| PomError::ProfileNotFound(id.clone())),
        }
    }

    /// Main POM first, then each profile in document order.
    fn owners(&self) -> Vec<(Option<String>, &Element)> {
        let mut owners = vec![(None, self.project())];
        for profile in profile_elements(self.project()) {
            match profile.child_text("id") {
                Some(id) => owners.push((Some(id), profile)),
                None => debug!("skipping <profile> without <id>"),
            }
        }
        owners
    }

    pub fn profile_ids(&self) -> Vec<String> {
        self.owners().into_iter().filter_map(|(id, _)| id).collect()
    }

    pub fn profiles(&self) -> Vec<Profile> {
        self.owners()
            .into_iter()
            .filter_map(|(id, owner)| {
                Some(Profile {
                    id: id?,
                    dependencies: dependencies_of(owner, DependencySection::Dependencies),
                    managed_dependencies: dependencies_of(
                        owner,
                        DependencySection::DependencyManagement,
                    ),
                    plugins: plugins_of(owner),
                    properties: properties_of(owner),
                })
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Dependencies and dependencyManagement
    // ------------------------------------------------------------------

    pub fn dependencies(
        &self,
        section: DependencySection,
        scope: &ProfileScope,
    ) -> Result<Vec<Dependency>> {
        Ok(dependencies_of(self.owner(scope)?, section))
    }

    pub fn all_dependencies(&self, section: DependencySection) -> Vec<Scoped<Dependency>> {
        self.owners()
            .into_iter()
            .flat_map(|(id, owner)| {
                dependencies_of(owner, section)
                    .into_iter()
                    .map(move |d| Scoped::new(id.as_deref(), d))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    pub fn find_dependency(
        &self,
        section: DependencySection,
        scope: &ProfileScope,
        group_id: &str,
        artifact_id: &str,
    ) -> Result<Option<Dependency>> {
        Ok(self
            .dependencies(section, scope)?
            .into_iter()
            .find(|d| d.matches(group_id, artifact_id)))
    }

    pub fn add_dependency(
        &mut self,
        section: DependencySection,
        scope: &ProfileScope,
        dependency: Dependency,
    ) -> Result<()> {
        let dependency = dependency.normalized()?;
        if self
            .find_dependency(section, scope, &dependency.group_id, &dependency.artifact_id)?
            .is_some()
        {
            return Err(PomError::AlreadyExists {
                kind: section.kind(),
                key: dependency.coordinates(),
                scope: scope.clone(),
            });
        }

        let layout = &self.layout;
        let owner = owner_mut(self.xml.root_mut(), scope)?;
        ensure_path(owner, section.path(), layout).append_element(dependency.to_element(), layout);
        Ok(())
    }

    pub fn update_dependency_version(
        &mut self,
        section: DependencySection,
        scope: &ProfileScope,
        group_id: &str,
        artifact_id: &str,
        version: &str,
    ) -> Result<()> {
        let layout = &self.layout;
        let owner = owner_mut(self.xml.root_mut(), scope)?;
        let entry = owner
            .descendant_mut(section.path())
            .and_then(|list| {
                list.elements_mut()
                    .find(|e| is_dependency(e, group_id, artifact_id))
            })
            .ok_or_else(|| PomError::EntityNotFound {
                kind: section.kind(),
                key: dependency_coordinates(group_id, artifact_id),
                scope: scope.clone(),
            })?;
        set_version(entry, version, layout);
        Ok(())
    }

    pub fn remove_dependency(
        &mut self,
        section: DependencySection,
        scope: &ProfileScope,
        group_id: &str,
        artifact_id: &str,
    ) -> Result<Dependency> {
        let owner = owner_mut(self.xml.root_mut(), scope)?;
        owner
            .descendant_mut(section.path())
            .and_then(|list| {
                list.remove_first_element_where(|e| is_dependency(e, group_id, artifact_id))
            })
            .and_then(|removed| Dependency::from_element(&removed))
            .ok_or_else(|| PomError::EntityNotFound {
                kind: section.kind(),
                key: dependency_coordinates(group_id, artifact_id),
                scope: scope.clone(),
            })
    }

    // ------------------------------------------------------------------
    // Plugins
    // ------------------------------------------------------------------

    pub fn plugins(&self, scope: &ProfileScope) -> Result<Vec<Plugin>> {
        Ok(plugins_of(self.owner(scope)?))
    }

    pub fn all_plugins(&self) -> Vec<Scoped<Plugin>> {
        self.owners()
            .into_iter()
            .flat_map(|(id, owner)| {
                plugins_of(owner)
                    .into_iter()
                    .map(move |p| Scoped::new(id.as_deref(), p))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    pub fn find_plugin(
        &self,
        scope: &ProfileScope,
        group_id: Option<&str>,
        artifact_id: &str,
    ) -> Result<Option<Plugin>> {
        Ok(self
            .plugins(scope)?
            .into_iter()
            .find(|p| p.matches(group_id, artifact_id)))
    }

    pub fn add_plugin(&mut self, scope: &ProfileScope, plugin: Plugin) -> Result<()> {
        let plugin = plugin.normalized()?;
        if self
            .find_plugin(scope, plugin.group_id.as_deref(), &plugin.artifact_id)?
            .is_some()
        {
            return Err(PomError::AlreadyExists {
                kind: EntityKind::Plugin,
                key: plugin.coordinates(),
                scope: scope.clone(),
            });
        }

        let layout = &self.layout;
        let owner = owner_mut(self.xml.root_mut(), scope)?;
        ensure_path(owner, PLUGINS_PATH, layout).append_element(plugin.to_element(), layout);
        Ok(())
    }

    pub fn update_plugin_version(
        &mut self,
        scope: &ProfileScope,
        group_id: Option<&str>,
        artifact_id: &str,
        version: &str,
    ) -> Result<()> {
        let layout = &self.layout;
        let owner = owner_mut(self.xml.root_mut(), scope)?;
        let entry = owner
            .descendant_mut(PLUGINS_PATH)
            .and_then(|list| list.elements_mut().find(|e| is_plugin(e, group_id, artifact_id)))
            .ok_or_else(|| PomError::EntityNotFound {
                kind: EntityKind::Plugin,
                key: plugin_coordinates(group_id, artifact_id),
                scope: scope.clone(),
            })?;
        set_version(entry, version, layout);
        Ok(())
    }

    pub fn remove_plugin(
        &mut self,
        scope: &ProfileScope,
        group_id: Option<&str>,
        artifact_id: &str,
    ) -> Result<Plugin> {
        let owner = owner_mut(self.xml.root_mut(), scope)?;
        owner
            .descendant_mut(PLUGINS_PATH)
            .and_then(|list| list.remove_first_element_where(|e| is_plugin(e, group_id, artifact_id)))
            .and_then(|removed| Plugin::from_element(&removed))
            .ok_or_else(|| PomError::EntityNotFound {
                kind: EntityKind::Plugin,
                key: plugin_coordinates(group_id, artifact_id),
                scope: scope.clone(),
            })
    }

    // ------------------------------------------------------------------
    // Properties
    // ------------------------------------------------------------------

    pub fn properties(&self, scope: &ProfileScope) -> Result<Vec<Property>> {
        Ok(properties_of(self.owner(scope)?))
    }

    pub fn all_properties(&self) -> Vec<Scoped<Property>> {
        self.owners()
            .into_iter()
            .flat_map(|(id, owner)| {
                properties_of(owner)
                    .into_iter()
                    .map(move |p| Scoped::new(id.as_deref(), p))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    pub fn property(&self, scope: &ProfileScope, key: &str) -> Result<Option<String>> {
        Ok(self
            .properties(scope)?
            .into_iter()
            .find(|p| p.key == key)
            .map(|p| p.value))
    }

    pub fn add_property(&mut self, scope: &ProfileScope, key: &str, value: &str) -> Result<()> {
        if !is_valid_property_key(key) {
            return Err(PomError::InvalidName(key.to_string()));
        }
        if self.property(scope, key)?.is_some() {
            return Err(PomError::AlreadyExists {
                kind: EntityKind::Property,
                key: key.to_string(),
                scope: scope.clone(),
            });
        }

        let layout = &self.layout;
        let owner = owner_mut(self.xml.root_mut(), scope)?;
        ensure_path(owner, PROPERTIES_PATH, layout)
            .append_element(Element::with_text(key, value), layout);
        Ok(())
    }

    pub fn update_property(&mut self, scope: &ProfileScope, key: &str, value: &str) -> Result<()> {
        let owner = owner_mut(self.xml.root_mut(), scope)?;
        let entry = owner
            .descendant_mut(PROPERTIES_PATH)
            .and_then(|props| props.elements_mut().find(|e| e.name() == key))
            .ok_or_else(|| PomError::EntityNotFound {
                kind: EntityKind::Property,
                key: key.to_string(),
                scope: scope.clone(),
            })?;
        entry.set_text(value);
        Ok(())
    }

    pub fn remove_property(&mut self, scope: &ProfileScope, key: &str) -> Result<Property> {
        let owner = owner_mut(self.xml.root_mut(), scope)?;
        owner
            .descendant_mut(PROPERTIES_PATH)
            .and_then(|props| props.remove_first_element_where(|e| e.name() == key))
            .map(|removed| Property {
                key: key.to_string(),
                value: removed.text(),
            })
            .ok_or_else(|| PomError::EntityNotFound {
                kind: EntityKind::Property,
                key: key.to_string(),
                scope: scope.clone(),
            })
    }
}

fn profile_elements(project: &Element) -> impl Iterator<Item = &Element> {
    project
        .child("profiles")
        .into_iter()
        .flat_map(|profiles| profiles.children_named("profile"))
}

fn owner_mut<'a>(project: &'a mut Element, scope: &ProfileScope) -> Result<&'a mut Element> {
    match scope {
        ProfileScope::MainPom => Ok(project),
        ProfileScope::Profile(id) => project
            .child_mut("profiles")
            .and_then(|profiles| {
                profiles.elements_mut().find(|p| {
                    p.local_name() == "profile" && p.child_text("id").as_deref() == Some(id.as_str())
                })
            })
            .ok_or_else(|| PomError::ProfileNotFound(id.clone())),
    }
}

/// Walk `path` below `element`, creating missing containers on the way.
fn ensure_path<'a>(element: &'a mut Element, path: &[&str], layout: &Layout) -> &'a mut Element {
    let mut current = element;
    for name in path {
        current = current.ensure_child(name, layout);
    }
    current
}

// `child_text` is already trimmed, so only the caller's side needs `identity`.
fn is_dependency(element: &Element, group_id: &str, artifact_id: &str) -> bool {
    element.local_name() == "dependency"
        && element.child_text("groupId").as_deref() == Some(identity(group_id))
        && element.child_text("artifactId").as_deref() == Some(identity(artifact_id))
}

fn is_plugin(element: &Element, group_id: Option<&str>, artifact_id: &str) -> bool {
    element.local_name() == "plugin"
        && element.child_text("artifactId").as_deref() == Some(identity(artifact_id))
        && effective_plugin_group_id(element.child_text("groupId").as_deref())
            == effective_plugin_group_id(group_id)
}

/// Replace `<version>` in place, or add it right after `<artifactId>`.
fn set_version(entry: &mut Element, version: &str, layout: &Layout) {
    match entry.child_mut("version") {
        Some(existing) => existing.set_text(version),
        None => {
            entry.insert_element_after("artifactId", Element::with_text("version", version), layout)
        }
    }
}

fn dependencies_of(owner: &Element, section: DependencySection) -> Vec<Dependency> {
    owner
        .descendant(section.path())
        .map(|list| {
            list.children_named("dependency")
                .filter_map(Dependency::from_element)
                .collect()
        })
        .unwrap_or_default()
}

fn plugins_of(owner: &Element) -> Vec<Plugin> {
    owner
        .descendant(PLUGINS_PATH)
        .map(|list| list.children_named("plugin").filter_map(Plugin::from_element).collect())
        .unwrap_or_default()
}

fn properties_of(owner: &Element) -> Vec<Property> {
    owner
        .descendant(PROPERTIES_PATH)
        .map(|props| {
            props
                .elements()
                .map(|e| Property {
                    key: e.name().to_string(),
                    value: e.text(),
                })
                .collect()
        })
        .unwrap_or_default()
}
