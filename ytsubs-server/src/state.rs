//! Application state shared across all handlers
//!
//! Nothing in here changes after startup.

#[cfg(test)]
use std::sync::Arc;

use ytsubs_lib::service::RequestDefaults;
use ytsubs_lib::CaptionExtractor;

use crate::config::ServerConfig;
use crate::error::Result;

pub struct AppState {
    /// Server configuration
    pub config: ServerConfig,

    /// Caption pipeline, shared by every request
    pub extractor: CaptionExtractor,

    /// Format and language used when a request omits them
    pub defaults: RequestDefaults,
}

impl AppState {
    /// Create a new AppState that fetches from the real upstream
    pub fn new(config: ServerConfig) -> Result<Self> {
        let extractor = CaptionExtractor::with_http(config.fetch_config())?;
        Ok(Self::with_extractor(config, extractor))
    }

    /// Create an AppState around a custom fetcher
    #[cfg(test)]
    pub fn with_fetcher(config: ServerConfig, fetcher: Arc<dyn ytsubs_lib::Fetcher>) -> Self {
        Self::with_extractor(config, CaptionExtractor::new(fetcher))
    }

    fn with_extractor(config: ServerConfig, extractor: CaptionExtractor) -> Self {
        Self {
            config,
            extractor,
            defaults: RequestDefaults::server(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ytsubs_lib::SubtitleFormat;

    #[test]
    fn test_app_state_creation() {
        let state = AppState::new(ServerConfig::default()).unwrap();
        assert_eq!(state.defaults.format, SubtitleFormat::Srt);
        assert_eq!(state.defaults.language, "fr");
        assert!(!state.config.has_api_key());
    }
}
