// Compile a literal regex on first use and reuse it afterwards.
macro_rules! regex {
    ($re:literal $(,)?) => {{
        static RE: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
        RE.get_or_init(|| regex::Regex::new($re).unwrap())
    }};
}

pub(crate) mod api;
pub(crate) mod error;
pub(crate) mod fetch;
pub(crate) mod locator;
pub(crate) mod render;
pub(crate) mod selector;
pub mod service;
pub(crate) mod text;
pub(crate) mod timecode;
pub(crate) mod timedtext;
pub(crate) mod types;
pub(crate) mod url;

#[cfg(test)]
pub(crate) mod tests;

pub use api::*;
pub use error::{CaptionError, Result};
pub use fetch::{FetchConfig, FetchKind, Fetcher, HttpFetcher, BROWSER_USER_AGENT};
pub use locator::{locate_tracks, unplayable_status};
pub use render::render;
pub use selector::select_track;
pub use text::clean_text;
pub use timecode::{format_timecode, srt_timecode, vtt_timecode, TimecodeStyle};
pub use timedtext::{parse_timed_text, DEFAULT_CUE_DURATION_SECS};
pub use types::*;
pub use url::{extract_video_id, Thumbnails, VideoInfo};

/// Crate version, reported by the adapters.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
