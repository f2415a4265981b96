//! Server configuration loader for relaychat.
//!
//! Reads an optional `config.toml` (by default from
//! `{config_dir}/relaychat/config.toml`) into [`ServerConfig`]. Falls back to
//! defaults when the file is missing or malformed.

use std::path::{Path, PathBuf};

use relaychat_types::config::ServerConfig;

/// A relay call must be allowed at least this long.
const MIN_DURATION_SECS: u64 = 1;

/// Default location of the config file, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("relaychat").join("config.toml"))
}

/// Load server configuration from `path`.
///
/// - If the file does not exist, returns [`ServerConfig::default()`].
/// - If the file exists but cannot be read or parsed, logs a warning and
///   returns the default.
/// - `max_duration_secs` is raised to at least one second.
pub async fn load_server_config(path: &Path) -> ServerConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return ServerConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return ServerConfig::default();
        }
    };

    let mut config = match toml::from_str::<ServerConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            return ServerConfig::default();
        }
    };

    if config.max_duration_secs < MIN_DURATION_SECS {
        tracing::warn!(
            configured = config.max_duration_secs,
            "max_duration_secs too small, raising to {MIN_DURATION_SECS}"
        );
        config.max_duration_secs = MIN_DURATION_SECS;
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_server_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_server_config(&tmp.path().join("config.toml")).await;
        assert_eq!(config, ServerConfig::default());
    }

    #[tokio::test]
    async fn load_server_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        tokio::fs::write(
            &config_path,
            r#"
host = "0.0.0.0"
port = 8080
max_duration_secs = 60
"#,
        )
        .await
        .unwrap();

        let config = load_server_config(&config_path).await;
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_duration_secs, 60);
    }

    #[tokio::test]
    async fn load_server_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        tokio::fs::write(&config_path, "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_server_config(&config_path).await;
        assert_eq!(config, ServerConfig::default());
    }

    #[tokio::test]
    async fn load_server_config_enforces_minimum_duration() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        tokio::fs::write(&config_path, "max_duration_secs = 0")
            .await
            .unwrap();

        let config = load_server_config(&config_path).await;
        assert_eq!(config.max_duration_secs, 1);
    }

    #[test]
    fn default_config_path_ends_with_relaychat_config() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("relaychat/config.toml"));
        }
    }
}
