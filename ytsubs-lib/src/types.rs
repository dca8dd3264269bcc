//! Pipeline data model
//!
//! Everything here is request-scoped: built while serving one request and
//! dropped once the response is produced.

use std::fmt;

use serde::Serialize;

use crate::error::{CaptionError, Result};

/// Length of a video id on the upstream platform
pub const VIDEO_ID_LEN: usize = 11;

/// A validated 11-character video identifier (`[A-Za-z0-9_-]{11}`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    /// Validate caller input. Nothing touches the network before this passes.
    pub fn parse(input: &str) -> Result<Self> {
        if is_video_id(input) {
            Ok(VideoId(input.to_string()))
        } else {
            Err(CaptionError::InvalidVideoId(input.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Public watch page for this video
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Check the video id shape without allocating.
pub fn is_video_id(s: &str) -> bool {
    s.len() == VIDEO_ID_LEN
        && s
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// One caption track advertised by the watch page
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionTrack {
    pub language_code: String,
    /// Display name, e.g. "English (auto-generated)"
    pub language_name: Option<String>,
    /// Automatic speech recognition track
    pub is_generated: bool,
    /// Opaque absolute URL of the timed-text document
    pub fetch_url: String,
}

/// One timed caption unit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cue {
    #[serde(rename = "start")]
    pub start_secs: f64,
    #[serde(rename = "duration")]
    pub duration_secs: f64,
    pub text: String,
}

impl Cue {
    pub fn new(start_secs: f64, duration_secs: f64, text: impl Into<String>) -> Self {
        Self {
            start_secs,
            duration_secs,
            text: text.into(),
        }
    }

    pub fn end_secs(&self) -> f64 {
        self.start_secs + self.duration_secs
    }
}

/// Output document format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleFormat {
    Txt,
    Srt,
    Vtt,
    Json,
}

impl SubtitleFormat {
    /// Resolve a caller-supplied token. Unknown tokens render as plain text.
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "srt" => SubtitleFormat::Srt,
            "vtt" => SubtitleFormat::Vtt,
            "json" => SubtitleFormat::Json,
            _ => SubtitleFormat::Txt,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            SubtitleFormat::Txt => "txt",
            SubtitleFormat::Srt => "srt",
            SubtitleFormat::Vtt => "vtt",
            SubtitleFormat::Json => "json",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            SubtitleFormat::Txt => "text/plain; charset=utf-8",
            SubtitleFormat::Srt => "application/x-subrip; charset=utf-8",
            SubtitleFormat::Vtt => "text/vtt; charset=utf-8",
            SubtitleFormat::Json => "application/json; charset=utf-8",
        }
    }
}

impl fmt::Display for SubtitleFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Why the pipeline produced nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbsentReason {
    /// The watch page lists no caption tracks
    NoTracks,
    /// The watch page says the video cannot be played
    VideoUnavailable,
    /// A track list existed but nothing could be selected from it
    NoSelectableTrack,
    /// The upstream answered 403 to one of the fetches
    AccessDenied,
    /// Network error, timeout or non-2xx status
    Unreachable,
    /// The timed-text document held no usable cues
    NoCues,
}

impl AbsentReason {
    /// Short machine-friendly label, used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            AbsentReason::NoTracks => "no_tracks",
            AbsentReason::VideoUnavailable => "video_unavailable",
            AbsentReason::NoSelectableTrack => "no_selectable_track",
            AbsentReason::AccessDenied => "access_denied",
            AbsentReason::Unreachable => "unreachable",
            AbsentReason::NoCues => "no_cues",
        }
    }
}

impl fmt::Display for AbsentReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tagged pipeline outcome. There is no partially filled success.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction<T> {
    Found(T),
    Absent(AbsentReason),
}

impl<T> Extraction<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Extraction::Found(value) => Some(value),
            Extraction::Absent(_) => None,
        }
    }

    pub fn absent_reason(&self) -> Option<AbsentReason> {
        match self {
            Extraction::Found(_) => None,
            Extraction::Absent(reason) => Some(*reason),
        }
    }
}

/// The cues of one selected track, plus what else was on offer
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub video_id: VideoId,
    /// Language code of the track actually used
    pub language: String,
    /// Every track the page advertised, in page order
    pub tracks: Vec<CaptionTrack>,
    /// Non-empty, in document order
    pub cues: Vec<Cue>,
}

/// Final document for one request
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    pub format: SubtitleFormat,
    pub body: String,
    pub content_type: &'static str,
    /// `{videoId}_subtitles.{format}`
    pub filename: String,
}

/// A transcript together with its rendering
#[derive(Debug, Clone, PartialEq)]
pub struct Subtitles {
    pub transcript: Transcript,
    pub document: RenderedDocument,
}
