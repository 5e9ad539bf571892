//! # Kigo Config
//!
//! Configuration for the kigo gateway: a JSON config file under `~/.kigo`
//! with environment-variable overrides for the values that are usually
//! injected at deploy time (JWT secret, completion-service API key, port).

pub mod config;
pub mod loader;

pub use config::{
    AuthConfig, Config, ConfigError, ConfigResult, LlmConfig, LogLevel, LoggingConfig,
    ServerConfig,
};
pub use loader::load_config;

use std::path::PathBuf;

/// Kigo configuration directory (`~/.kigo`)
pub fn kigo_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".kigo"))
}

/// Default configuration file path
pub fn default_config_path() -> Option<PathBuf> {
    kigo_dir().map(|dir| dir.join("config.json"))
}

/// Expand a leading `~/` to the user's home directory
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_tilde_leaves_absolute_paths_alone() {
        assert_eq!(expand_tilde("/etc/kigo.json"), PathBuf::from("/etc/kigo.json"));
    }

    #[test]
    fn expand_tilde_resolves_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~/config.json"), home.join("config.json"));
        }
    }

    #[test]
    fn default_config_path_lives_under_kigo_dir() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with(".kigo/config.json"));
        }
    }
}
