use std::path::{Path, PathBuf};

/// Manages all filesystem paths for devgarden configuration
#[derive(Debug, Clone)]
pub struct GardenPaths {
    pub config_dir: PathBuf,
}

impl GardenPaths {
    /// Create a new GardenPaths instance, using ~/.config/devgarden
    pub fn new() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::with_config_dir(home.join(".config").join("devgarden"))
    }

    /// Create with a custom configuration directory
    pub fn with_config_dir(config_dir: impl AsRef<Path>) -> Self {
        Self {
            config_dir: config_dir.as_ref().to_path_buf(),
        }
    }

    /// Path to the config.yaml file (client credentials, API URLs)
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.yaml")
    }

    /// Path to the tokens.yaml file (per-user access tokens)
    pub fn tokens_file(&self) -> PathBuf {
        self.config_dir.join("tokens.yaml")
    }
}

impl Default for GardenPaths {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_files_live_in_config_dir() {
        let paths = GardenPaths::with_config_dir("/tmp/dg");
        assert_eq!(paths.config_file(), PathBuf::from("/tmp/dg/config.yaml"));
        assert_eq!(paths.tokens_file(), PathBuf::from("/tmp/dg/tokens.yaml"));
    }

    #[test]
    fn test_default_ends_with_devgarden() {
        assert!(GardenPaths::new().config_dir.ends_with(".config/devgarden"));
    }
}
