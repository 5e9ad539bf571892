//! Config file loading with environment overrides

use std::path::Path;

use tracing::{debug, info};

use crate::config::{Config, ConfigResult};

/// Load configuration from a JSON file, then apply environment overrides.
///
/// A missing file is not an error: defaults are used so a fresh install can
/// run with nothing but `KIGO_JWT_SECRET` and `ANTHROPIC_API_KEY` set.
pub async fn load_config(path: &Path) -> ConfigResult<Config> {
    let mut config = if path.exists() {
        let raw = tokio::fs::read_to_string(path).await?;
        let config: Config = serde_json::from_str(&raw)?;
        info!("config loaded from {}", path.display());
        config
    } else {
        debug!("no config file at {}, using defaults", path.display());
        Config::default()
    };

    apply_env_overrides(&mut config);
    config.validate()?;
    Ok(config)
}

/// Deploy-time secrets and listener overrides come from the environment.
fn apply_env_overrides(config: &mut Config) {
    if let Ok(secret) = std::env::var("KIGO_JWT_SECRET") {
        if !secret.is_empty() {
            config.auth.jwt_secret = secret;
        }
    }
    if let Ok(key) = std::env::var("ANTHROPIC_API_KEY") {
        if !key.is_empty() {
            config.llm.api_key = key;
        }
    }
    if let Ok(port) = std::env::var("KIGO_PORT") {
        if let Ok(port) = port.parse() {
            config.server.port = port;
        }
    }
    if let Ok(host) = std::env::var("KIGO_HOST") {
        if !host.is_empty() {
            config.server.host = host;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn loads_file_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"server":{{"host":"127.0.0.1","port":9100,"ws_path":"/ws"}},"auth":{{"jwt_secret":"file-secret","token_ttl_secs":3600}}}}"#
        )
        .unwrap();

        let config = load_config(file.path()).await.unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.auth.token_ttl_secs, 3600);
    }

    #[tokio::test]
    async fn missing_file_uses_defaults() {
        // Will fail validation without a secret unless the environment
        // provides one, so only assert the non-secret defaults.
        let result = load_config(Path::new("/nonexistent/kigo.json")).await;
        match result {
            Ok(config) => assert_eq!(config.server.ws_path, "/ws"),
            Err(e) => assert!(e.to_string().contains("jwt_secret")),
        }
    }
}
