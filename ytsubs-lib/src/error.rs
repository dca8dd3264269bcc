use thiserror::Error;

/// Main error type for the caption pipeline
#[derive(Error, Debug)]
pub enum CaptionError {
    /// The caller supplied something that is not an 11-character video id
    #[error("Invalid video id: {0:?}")]
    InvalidVideoId(String),

    /// A transport-level failure talking to the upstream site
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The upstream did not answer within the configured timeout
    #[error("Upstream request timed out: {0}")]
    Timeout(String),

    /// The upstream answered with a non-2xx status
    #[error("Upstream returned HTTP {status} for {url}")]
    UpstreamStatus { status: u16, url: String },

    /// Rendering the cue list into the requested format failed
    #[error("Render error: {0}")]
    Render(#[from] serde_json::Error),

    /// Fetcher configuration could not be applied
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CaptionError {
    /// Whether the upstream explicitly refused access (HTTP 403).
    pub fn is_access_denied(&self) -> bool {
        matches!(self, CaptionError::UpstreamStatus { status: 403, .. })
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, CaptionError>;
