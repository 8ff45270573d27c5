//! Maven POM model editor.
//!
//! Locates dependencies, managed dependencies, plugins and properties in a
//! `pom.xml`, optionally inside a named profile, edits them, and writes the
//! file back with every untouched node preserved.

pub mod document;
pub mod editor;
pub mod error;
pub mod model;
pub mod scope;
pub mod xml;

pub use document::{DependencySection, PomDocument};
pub use editor::PomEditor;
pub use error::{EntityKind, PomError};
pub use model::{Dependency, Plugin, Profile, Property, Scoped};
pub use scope::ProfileScope;
