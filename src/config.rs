use std::path::PathBuf;

/// Environment variable overriding the POM location.
pub const POM_PATH_ENV: &str = "POM_XML_PATH";

/// File name used when no override is set, relative to the working directory.
const DEFAULT_POM_FILE: &str = "pom.xml";

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    /// Fixed POM path. When unset, the path is resolved on every call.
    pub pom_path: Option<PathBuf>,
}

impl ServerConfig {
    /// Configuration that follows the environment.
    ///
    /// - `POM_XML_PATH` (optional): POM to edit, re-read on every tool call;
    ///   falls back to `pom.xml` in the working directory
    pub fn from_env() -> Self {
        Self { pom_path: None }
    }

    /// Pin the POM path, ignoring the environment.
    pub fn with_pom_path(path: impl Into<PathBuf>) -> Self {
        Self {
            pom_path: Some(path.into()),
        }
    }

    /// Path of the POM for the current call.
    pub fn pom_path(&self) -> PathBuf {
        if let Some(path) = &self.pom_path {
            return path.clone();
        }
        match std::env::var_os(POM_PATH_ENV) {
            Some(path) if !path.is_empty() => PathBuf::from(path),
            _ => std::env::current_dir()
                .map(|dir| dir.join(DEFAULT_POM_FILE))
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_POM_FILE)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pinned_path_wins() {
        let config = ServerConfig::with_pom_path("/tmp/project/pom.xml");
        assert_eq!(config.pom_path(), PathBuf::from("/tmp/project/pom.xml"));
    }

    #[test]
    fn test_env_and_default_resolution() {
        let config = ServerConfig::default();

        std::env::set_var(POM_PATH_ENV, "/srv/app/pom.xml");
        assert_eq!(config.pom_path(), PathBuf::from("/srv/app/pom.xml"));

        std::env::remove_var(POM_PATH_ENV);
        assert!(config.pom_path().ends_with(DEFAULT_POM_FILE));
    }
}
