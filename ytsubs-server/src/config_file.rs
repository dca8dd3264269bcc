//! Configuration file support
//!
//! Loads server configuration from TOML files. Every section except
//! `[server]` is optional.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::{ApiKey, FetchSettings, LogFormat, ServerConfig};
use crate::error::Result;

/// Configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Server settings
    pub server: ServerSettings,
    /// Upstream fetch settings
    pub fetch: Option<FetchFileSettings>,
    /// Logging settings
    pub logging: Option<LoggingSettings>,
    /// Limits settings
    pub limits: Option<LimitsSettings>,
    /// Third-party API settings
    pub api: Option<ApiSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Enable CORS
    pub cors_enabled: Option<bool>,
    /// Tokio worker threads
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchFileSettings {
    /// Watch page timeout in seconds
    pub page_timeout_secs: Option<u64>,
    /// Timed-text timeout in seconds
    pub track_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty)
    pub format: Option<LogFormat>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsSettings {
    /// Maximum request body size in KB
    pub max_request_size_kb: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    pub youtube_api_key: Option<ApiKey>,
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: ConfigFile = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Generate default configuration file
    pub fn default_config() -> Self {
        let defaults = ServerConfig::default();
        Self {
            server: ServerSettings {
                host: defaults.host,
                port: defaults.port,
                cors_enabled: Some(defaults.cors_enabled),
                workers: None,
            },
            fetch: Some(FetchFileSettings {
                page_timeout_secs: Some(defaults.fetch.page_timeout_secs),
                track_timeout_secs: Some(defaults.fetch.track_timeout_secs),
            }),
            logging: Some(LoggingSettings {
                level: defaults.log_level,
                format: Some(defaults.log_format),
            }),
            limits: Some(LimitsSettings {
                max_request_size_kb: Some(defaults.max_request_size_kb),
            }),
            api: None,
        }
    }

    /// Convert to ServerConfig
    pub fn into_server_config(self) -> ServerConfig {
        let defaults = ServerConfig::default();
        let fetch_defaults = FetchSettings::default();
        ServerConfig {
            host: self.server.host,
            port: self.server.port,
            workers: self.server.workers,
            cors_enabled: self.server.cors_enabled.unwrap_or(defaults.cors_enabled),
            log_level: self
                .logging
                .as_ref()
                .map(|l| l.level.clone())
                .unwrap_or(defaults.log_level),
            log_format: self
                .logging
                .and_then(|l| l.format)
                .unwrap_or(defaults.log_format),
            fetch: FetchSettings {
                page_timeout_secs: self
                    .fetch
                    .as_ref()
                    .and_then(|f| f.page_timeout_secs)
                    .unwrap_or(fetch_defaults.page_timeout_secs),
                track_timeout_secs: self
                    .fetch
                    .as_ref()
                    .and_then(|f| f.track_timeout_secs)
                    .unwrap_or(fetch_defaults.track_timeout_secs),
            },
            max_request_size_kb: self
                .limits
                .and_then(|l| l.max_request_size_kb)
                .unwrap_or(defaults.max_request_size_kb),
            youtube_api_key: self.api.and_then(|a| a.youtube_api_key),
        }
    }
}

/// Generate default configuration file at the specified path
pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    ConfigFile::default_config().to_file(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServerError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = ConfigFile::default_config();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.fetch.unwrap().page_timeout_secs, Some(30));
    }

    #[test]
    fn test_config_file_roundtrip() {
        let config = ConfigFile::default_config();

        let mut temp_file = NamedTempFile::new().unwrap();
        let content = toml::to_string_pretty(&config).unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();

        let loaded = ConfigFile::from_file(temp_file.path()).unwrap();
        assert_eq!(loaded.server.port, config.server.port);
        assert_eq!(loaded.logging.unwrap().format, Some(LogFormat::Pretty));
    }

    #[test]
    fn test_minimal_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(
            temp_file,
            "[server]\nhost = \"127.0.0.1\"\nport = 8080\nworkers = 2\n\n[logging]\nlevel = \"debug\"\nformat = \"json\"\n\n[api]\nyoutube_api_key = \"abc\"\n"
        )
        .unwrap();

        let config = ConfigFile::from_file(temp_file.path())
            .unwrap()
            .into_server_config();
        assert_eq!(config.socket_addr(), "127.0.0.1:8080");
        assert_eq!(config.workers, Some(2));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(config.has_api_key());
        assert!(config.cors_enabled);
        assert_eq!(config.fetch.track_timeout_secs, 20);
        assert_eq!(config.max_request_size_kb, 64);
    }

    #[test]
    fn test_invalid_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "[server]\nport = \"not a number\"\n").unwrap();
        assert!(matches!(
            ConfigFile::from_file(temp_file.path()),
            Err(ServerError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_generate_default_config() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_path_buf();

        generate_default_config(&path).unwrap();

        assert!(path.exists());
        let loaded = ConfigFile::from_file(&path).unwrap();
        assert_eq!(loaded.server.port, 5000);
    }
}
