//! Typed views of the POM entries the editor works with.
//!
//! Maven's implicit defaults live here as named constants, together with the
//! normalization functions used both when comparing identity keys and when
//! deciding which fields to omit from the serialized form.

use serde::{Deserialize, Serialize};

use super::error::{PomError, Result};
use super::xml::{Element, Layout};

/// Dependency `<type>` when the element is absent.
pub const DEFAULT_DEPENDENCY_TYPE: &str = "jar";

/// Dependency `<scope>` when the element is absent.
pub const DEFAULT_DEPENDENCY_SCOPE: &str = "compile";

/// Plugin `<groupId>` when the element is absent.
pub const DEFAULT_PLUGIN_GROUP_ID: &str = "org.apache.maven.plugins";

/// `Some(value)` only when `value` is non-empty and differs from `default`.
fn explicit<'a>(value: Option<&'a str>, default: &str) -> Option<&'a str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != default)
}

/// Dependency type as it should be written, `None` meaning omit.
pub fn explicit_type(value: Option<&str>) -> Option<&str> {
    explicit(value, DEFAULT_DEPENDENCY_TYPE)
}

/// Dependency scope as it should be written, `None` meaning omit.
pub fn explicit_scope(value: Option<&str>) -> Option<&str> {
    explicit(value, DEFAULT_DEPENDENCY_SCOPE)
}

/// Scope a dependency resolves to for matching purposes.
pub fn effective_scope(value: Option<&str>) -> &str {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_DEPENDENCY_SCOPE)
}

/// Identity key as stored and compared: `groupId` and `artifactId` never
/// carry surrounding whitespace.
pub fn identity(value: &str) -> &str {
    value.trim()
}

fn required_identity(field: &'static str, value: &str) -> Result<String> {
    match identity(value) {
        "" => Err(PomError::BlankIdentifier(field)),
        v => Ok(v.to_string()),
    }
}

/// Group id a plugin resolves to for matching purposes.
pub fn effective_plugin_group_id(value: Option<&str>) -> &str {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(DEFAULT_PLUGIN_GROUP_ID)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub group_id: String,
    pub artifact_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub dependency_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl Dependency {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: None,
            dependency_type: None,
            scope: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_type(mut self, dependency_type: impl Into<String>) -> Self {
        self.dependency_type = Some(dependency_type.into());
        self
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// `groupId:artifactId`
    pub fn coordinates(&self) -> String {
        dependency_coordinates(&self.group_id, &self.artifact_id)
    }

    pub fn matches(&self, group_id: &str, artifact_id: &str) -> bool {
        identity(&self.group_id) == identity(group_id)
            && identity(&self.artifact_id) == identity(artifact_id)
    }

    /// Trim the identity keys and drop `type` and `scope` when they carry
    /// the Maven default. Blank keys are rejected.
    pub fn normalized(self) -> Result<Self> {
        Ok(Self {
            group_id: required_identity("group_id", &self.group_id)?,
            artifact_id: required_identity("artifact_id", &self.artifact_id)?,
            dependency_type: explicit_type(self.dependency_type.as_deref()).map(str::to_string),
            scope: explicit_scope(self.scope.as_deref()).map(str::to_string),
            ..self
        })
    }

    pub(crate) fn from_element(element: &Element) -> Option<Self> {
        Some(Self {
            group_id: element.child_text("groupId")?,
            artifact_id: element.child_text("artifactId")?,
            version: element.child_text("version"),
            dependency_type: element.child_text("type"),
            scope: element.child_text("scope"),
        })
    }

    pub(crate) fn to_element(&self) -> Element {
        let layout = Layout::default();
        let mut element = Element::new("dependency");
        element.set_child_text("groupId", &self.group_id, &layout);
        element.set_child_text("artifactId", &self.artifact_id, &layout);
        if let Some(version) = &self.version {
            element.set_child_text("version", version, &layout);
        }
        if let Some(t) = explicit_type(self.dependency_type.as_deref()) {
            element.set_child_text("type", t, &layout);
        }
        if let Some(scope) = explicit_scope(self.scope.as_deref()) {
            element.set_child_text("scope", scope, &layout);
        }
        element
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plugin {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    pub artifact_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherited: Option<bool>,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

impl Plugin {
    pub fn new(group_id: Option<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id,
            artifact_id: artifact_id.into(),
            version: None,
            inherited: None,
            dependencies: Vec::new(),
        }
    }

    /// Coordinates with the default group filled in.
    pub fn coordinates(&self) -> String {
        plugin_coordinates(self.group_id.as_deref(), &self.artifact_id)
    }

    pub fn matches(&self, group_id: Option<&str>, artifact_id: &str) -> bool {
        identity(&self.artifact_id) == identity(artifact_id)
            && effective_plugin_group_id(self.group_id.as_deref())
                == effective_plugin_group_id(group_id)
    }

    /// Trim the identity keys. A blank group id is the same as no group id.
    pub fn normalized(self) -> Result<Self> {
        let group_id = self
            .group_id
            .as_deref()
            .map(identity)
            .filter(|g| !g.is_empty())
            .map(str::to_string);
        Ok(Self {
            group_id,
            artifact_id: required_identity("artifact_id", &self.artifact_id)?,
            ..self
        })
    }

    pub(crate) fn from_element(element: &Element) -> Option<Self> {
        let dependencies = element
            .child("dependencies")
            .map(|deps| {
                deps.children_named("dependency")
                    .filter_map(Dependency::from_element)
                    .collect()
            })
            .unwrap_or_default();

        Some(Self {
            group_id: element.child_text("groupId"),
            artifact_id: element.child_text("artifactId")?,
            version: element.child_text("version"),
            inherited: element
                .child_text("inherited")
                .and_then(|v| v.parse::<bool>().ok()),
            dependencies,
        })
    }

    pub(crate) fn to_element(&self) -> Element {
        let layout = Layout::default();
        let mut element = Element::new("plugin");
        if let Some(group_id) = &self.group_id {
            element.set_child_text("groupId", group_id, &layout);
        }
        element.set_child_text("artifactId", &self.artifact_id, &layout);
        if let Some(version) = &self.version {
            element.set_child_text("version", version, &layout);
        }
        if let Some(inherited) = self.inherited {
            element.set_child_text("inherited", if inherited { "true" } else { "false" }, &layout);
        }
        if !self.dependencies.is_empty() {
            let deps = element.ensure_child("dependencies", &layout);
            for dependency in &self.dependencies {
                deps.append_element(dependency.to_element(), &layout);
            }
        }
        element
    }
}

pub fn dependency_coordinates(group_id: &str, artifact_id: &str) -> String {
    format!("{}:{}", identity(group_id), identity(artifact_id))
}

pub fn plugin_coordinates(group_id: Option<&str>, artifact_id: &str) -> String {
    format!("{}:{}", effective_plugin_group_id(group_id), identity(artifact_id))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub key: String,
    pub value: String,
}

/// Property keys become element names, so they must be valid XML names.
pub fn is_valid_property_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Summary of one `<profile>` and the sections it carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub id: String,
    pub dependencies: Vec<Dependency>,
    pub managed_dependencies: Vec<Dependency>,
    pub plugins: Vec<Plugin>,
    pub properties: Vec<Property>,
}

/// An entry tagged with the profile that owns it (`None` for the main POM).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scoped<T> {
    pub profile_id: Option<String>,
    #[serde(flatten)]
    pub item: T,
}

impl<T> Scoped<T> {
    pub fn new(profile_id: Option<&str>, item: T) -> Self {
        Self {
            profile_id: profile_id.map(str::to_string),
            item,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_omitted() {
        assert_eq!(explicit_type(Some("jar")), None);
        assert_eq!(explicit_type(Some("")), None);
        assert_eq!(explicit_type(None), None);
        assert_eq!(explicit_type(Some("pom")), Some("pom"));
        assert_eq!(explicit_scope(Some("compile")), None);
        assert_eq!(explicit_scope(Some("  ")), None);
        assert_eq!(explicit_scope(Some("test")), Some("test"));
    }

    #[test]
    fn test_effective_values() {
        assert_eq!(effective_scope(None), "compile");
        assert_eq!(effective_scope(Some("provided")), "provided");
        assert_eq!(effective_plugin_group_id(None), DEFAULT_PLUGIN_GROUP_ID);
        assert_eq!(effective_plugin_group_id(Some("")), DEFAULT_PLUGIN_GROUP_ID);
        assert_eq!(effective_plugin_group_id(Some("org.codehaus.mojo")), "org.codehaus.mojo");
    }

    #[test]
    fn test_dependency_normalized() {
        let dep = Dependency::new("g", "a").with_type("jar").with_scope("compile");
        let dep = dep.normalized().unwrap();
        assert!(dep.dependency_type.is_none());
        assert!(dep.scope.is_none());

        let dep = Dependency::new("g", "a").with_type("pom").with_scope("import");
        assert_eq!(dep.clone().normalized().unwrap(), dep);
    }

    #[test]
    fn test_identity_keys_are_trimmed() {
        let dep = Dependency::new(" org.webjars ", "bootstrap\n").normalized().unwrap();
        assert_eq!(dep.coordinates(), "org.webjars:bootstrap");
        assert!(Dependency::new("org.webjars", "bootstrap").matches(" org.webjars", "bootstrap "));

        let plugin = Plugin::new(Some("  ".into()), " maven-war-plugin ").normalized().unwrap();
        assert!(plugin.group_id.is_none());
        assert_eq!(plugin.artifact_id, "maven-war-plugin");
        assert!(plugin.matches(None, "maven-war-plugin "));
        assert_eq!(
            plugin_coordinates(Some(" org.codehaus.mojo "), " exec-maven-plugin"),
            "org.codehaus.mojo:exec-maven-plugin"
        );
    }

    #[test]
    fn test_blank_identity_is_rejected() {
        assert!(matches!(
            Dependency::new(" ", "a").normalized(),
            Err(PomError::BlankIdentifier("group_id"))
        ));
        assert!(matches!(
            Plugin::new(None, "\t").normalized(),
            Err(PomError::BlankIdentifier("artifact_id"))
        ));
    }

    #[test]
    fn test_plugin_matches_default_group() {
        let plugin = Plugin::new(None, "maven-surefire-plugin");
        assert!(plugin.matches(None, "maven-surefire-plugin"));
        assert!(plugin.matches(Some(DEFAULT_PLUGIN_GROUP_ID), "maven-surefire-plugin"));
        assert!(!plugin.matches(Some("org.codehaus.mojo"), "maven-surefire-plugin"));
        assert_eq!(plugin.coordinates(), "org.apache.maven.plugins:maven-surefire-plugin");
        // the stored model is untouched by matching
        assert!(plugin.group_id.is_none());
    }

    #[test]
    fn test_property_key_validation() {
        assert!(is_valid_property_key("version.jakarta.ee"));
        assert!(is_valid_property_key("_x-1"));
        assert!(!is_valid_property_key(""));
        assert!(!is_valid_property_key("1abc"));
        assert!(!is_valid_property_key("has space"));
        assert!(!is_valid_property_key("a<b"));
    }

    #[test]
    fn test_scoped_serializes_flat() {
        let scoped = Scoped::new(Some("it"), Property {
            key: "k".into(),
            value: "v".into(),
        });
        let json = serde_json::to_value(&scoped).unwrap();
        assert_eq!(json, serde_json::json!({"profile_id": "it", "key": "k", "value": "v"}));
    }
}
