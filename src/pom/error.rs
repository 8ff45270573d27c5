//! Errors raised while reading or editing a POM.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use super::scope::ProfileScope;
use super::xml::XmlError;

/// The kind of entry an operation was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Dependency,
    ManagedDependency,
    Plugin,
    Property,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Dependency => "Dependency",
            Self::ManagedDependency => "Managed dependency",
            Self::Plugin => "Plugin",
            Self::Property => "Property",
        })
    }
}

#[derive(Error, Debug)]
pub enum PomError {
    #[error("Profile '{0}' not found")]
    ProfileNotFound(String),

    #[error("{kind} '{key}' not found in {scope}")]
    EntityNotFound {
        kind: EntityKind,
        key: String,
        scope: ProfileScope,
    },

    #[error("{kind} '{key}' already exists in {scope}")]
    AlreadyExists {
        kind: EntityKind,
        key: String,
        scope: ProfileScope,
    },

    #[error("'{0}' is not a valid property name")]
    InvalidName(String),

    #[error("'{0}' must not be blank")]
    BlankIdentifier(&'static str),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: XmlError,
    },
}

pub type Result<T> = std::result::Result<T, PomError>;
