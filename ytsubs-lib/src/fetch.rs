//! Upstream HTTP access
//!
//! The pipeline makes exactly two sequential GETs per request: the watch page,
//! then the selected timed-text document. Both go through [`Fetcher`] so the
//! orchestrator can be driven by a stub in tests.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use tracing::debug;

use crate::error::{CaptionError, Result};

/// Desktop browser user agent; the upstream rejects unbranded clients.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Which of the two upstream documents is being fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// Public watch page markup
    WatchPage,
    /// Timed-text XML of one caption track
    TimedText,
}

impl FetchKind {
    fn accept(self) -> &'static str {
        match self {
            FetchKind::WatchPage => "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            FetchKind::TimedText => {
                "text/xml,application/xml,application/xhtml+xml,text/html;q=0.9,text/plain;q=0.8,*/*;q=0.5"
            }
        }
    }

    fn headers(self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(self.accept()));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
        headers
    }
}

/// Fetch a text document from the upstream.
///
/// Implementations return `Err` for transport failures, timeouts and non-2xx
/// statuses. They never retry.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch_text(&self, url: &str, kind: FetchKind) -> Result<String>;
}

/// Timeouts and identity for [`HttpFetcher`]
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Timeout for the watch page
    pub page_timeout: Duration,
    /// Timeout for the timed-text document
    pub track_timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            page_timeout: Duration::from_secs(30),
            track_timeout: Duration::from_secs(20),
            user_agent: BROWSER_USER_AGENT.to_string(),
        }
    }
}

impl FetchConfig {
    fn timeout_for(&self, kind: FetchKind) -> Duration {
        match kind {
            FetchKind::WatchPage => self.page_timeout,
            FetchKind::TimedText => self.track_timeout,
        }
    }
}

/// [`Fetcher`] backed by a shared `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    config: FetchConfig,
}

impl HttpFetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        if config.page_timeout.is_zero() || config.track_timeout.is_zero() {
            return Err(CaptionError::Config(
                "fetch timeouts must be greater than zero".to_string(),
            ));
        }
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .gzip(true)
            .build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str, kind: FetchKind) -> Result<String> {
        debug!("GET {} ({:?})", url, kind);

        let response = self
            .client
            .get(url)
            .headers(kind.headers())
            .timeout(self.config.timeout_for(kind))
            .send()
            .await
            .map_err(|e| classify(e, url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CaptionError::UpstreamStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await.map_err(|e| classify(e, url))?;
        debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}

fn classify(err: reqwest::Error, url: &str) -> CaptionError {
    if err.is_timeout() {
        CaptionError::Timeout(url.to_string())
    } else {
        CaptionError::Network(err)
    }
}
