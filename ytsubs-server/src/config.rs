//! Server configuration
//!
//! Built once at startup (defaults, then the TOML file, then environment
//! overrides) and read-only afterwards.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use ytsubs_lib::FetchConfig;

use crate::error::{Result, ServerError};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(ServerError::Config(format!("unknown log format {:?}", other))),
        }
    }
}

/// Metadata API key. Never printed.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        ApiKey(key.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// Upstream fetch timeouts
#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub page_timeout_secs: u64,
    pub track_timeout_secs: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            page_timeout_secs: 30,
            track_timeout_secs: 20,
        }
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Tokio worker threads; `None` lets the runtime decide
    pub workers: Option<usize>,

    /// Enable CORS
    pub cors_enabled: bool,

    /// Default log level for our own crates
    pub log_level: String,

    pub log_format: LogFormat,

    pub fetch: FetchSettings,

    /// Maximum request body size in kilobytes
    pub max_request_size_kb: usize,

    /// Optional metadata API key, only reported as present or absent
    pub youtube_api_key: Option<ApiKey>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            workers: None,
            cors_enabled: true,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            fetch: FetchSettings::default(),
            max_request_size_kb: 64,
            youtube_api_key: None,
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn has_api_key(&self) -> bool {
        self.youtube_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    pub fn max_request_size_bytes(&self) -> usize {
        self.max_request_size_kb * 1024
    }

    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            page_timeout: Duration::from_secs(self.fetch.page_timeout_secs),
            track_timeout: Duration::from_secs(self.fetch.track_timeout_secs),
            ..FetchConfig::default()
        }
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_from(|name| std::env::var(name).ok())
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.port = parse_var("PORT", &port)?;
        }
        if let Some(workers) = lookup("WORKERS") {
            self.workers = Some(parse_var("WORKERS", &workers)?);
        }
        if let Some(key) = lookup("YOUTUBE_API_KEY") {
            self.youtube_api_key = (!key.is_empty()).then(|| ApiKey::new(key));
        }
        if let Some(secs) = lookup("PAGE_TIMEOUT_SECS") {
            self.fetch.page_timeout_secs = parse_var("PAGE_TIMEOUT_SECS", &secs)?;
        }
        if let Some(secs) = lookup("TRACK_TIMEOUT_SECS") {
            self.fetch.track_timeout_secs = parse_var("TRACK_TIMEOUT_SECS", &secs)?;
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            self.log_format = LogFormat::parse(&format)?;
        }
        self.validate()
    }

    /// Reject values the runtime or fetcher would choke on.
    pub fn validate(&self) -> Result<()> {
        if self.workers == Some(0) {
            return Err(ServerError::Config("workers must be at least 1".to_string()));
        }
        if self.fetch.page_timeout_secs == 0 || self.fetch.track_timeout_secs == 0 {
            return Err(ServerError::Config(
                "fetch timeouts must be at least one second".to_string(),
            ));
        }
        if self.max_request_size_kb == 0 {
            return Err(ServerError::Config(
                "max_request_size_kb must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ServerError::Config(format!("invalid value for {}: {:?}", name, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert_eq!(config.workers, None);
        assert!(!config.has_api_key());
        assert_eq!(config.fetch_config().page_timeout, Duration::from_secs(30));
        assert_eq!(config.fetch_config().track_timeout, Duration::from_secs(20));
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            ..Default::default()
        };
        assert_eq!(config.socket_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ServerConfig::default();
        config
            .apply_env_from(env(&[
                ("HOST", "127.0.0.1"),
                ("PORT", "8081"),
                ("WORKERS", "4"),
                ("YOUTUBE_API_KEY", "secret-key"),
                ("PAGE_TIMEOUT_SECS", "10"),
                ("LOG_FORMAT", "JSON"),
            ]))
            .unwrap();
        assert_eq!(config.socket_addr(), "127.0.0.1:8081");
        assert_eq!(config.workers, Some(4));
        assert!(config.has_api_key());
        assert_eq!(config.fetch.page_timeout_secs, 10);
        assert_eq!(config.fetch.track_timeout_secs, 20);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_empty_api_key_counts_as_missing() {
        let mut config = ServerConfig::default();
        config.apply_env_from(env(&[("YOUTUBE_API_KEY", "")])).unwrap();
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_bad_env_values() {
        for vars in [
            [("PORT", "eighty")],
            [("WORKERS", "0")],
            [("TRACK_TIMEOUT_SECS", "0")],
            [("LOG_FORMAT", "xml")],
        ] {
            let mut config = ServerConfig::default();
            assert!(
                matches!(config.apply_env_from(env(&vars)), Err(ServerError::Config(_))),
                "{:?} accepted",
                vars
            );
        }
    }

    #[test]
    fn test_api_key_is_redacted() {
        let config = ServerConfig {
            youtube_api_key: Some(ApiKey::new("AIza-very-secret")),
            ..Default::default()
        };
        let printed = format!("{:?}", config);
        assert!(!printed.contains("very-secret"));
        assert!(printed.contains("<redacted>"));
    }
}
