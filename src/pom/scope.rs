use std::fmt;

/// Which part of the POM an operation targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProfileScope {
    MainPom,
    Profile(String),
}

impl ProfileScope {
    /// Resolve a caller-supplied profile id.
    ///
    /// Absent, blank, and any-case `"null"` ids (after trimming) all mean
    /// the main POM. Anything else names a profile by its trimmed id; whether
    /// that profile exists is checked against the document later.
    pub fn from_profile_id(profile_id: Option<&str>) -> Self {
        match profile_id.map(str::trim) {
            None => Self::MainPom,
            Some(id) if id.is_empty() || id.eq_ignore_ascii_case("null") => Self::MainPom,
            Some(id) => Self::Profile(id.to_string()),
        }
    }

    pub fn profile_id(&self) -> Option<&str> {
        match self {
            Self::MainPom => None,
            Self::Profile(id) => Some(id),
        }
    }
}

impl fmt::Display for ProfileScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MainPom => f.write_str("main POM"),
            Self::Profile(id) => write!(f, "profile '{id}'"),
        }
    }
}
