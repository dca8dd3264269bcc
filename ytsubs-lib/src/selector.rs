//! Caption track selection

use crate::types::CaptionTrack;

/// Language used when the requested one is not offered
pub const FALLBACK_LANGUAGE: &str = "en";

/// Pick the track to download.
///
/// In order: the first track whose language code equals `language`, the first
/// English track, the first track listed. `None` only for an empty list.
/// Codes are compared exactly, so `en` does not match `en-US`.
pub fn select_track<'a>(tracks: &'a [CaptionTrack], language: &str) -> Option<&'a CaptionTrack> {
    tracks
        .iter()
        .find(|t| t.language_code == language)
        .or_else(|| tracks.iter().find(|t| t.language_code == FALLBACK_LANGUAGE))
        .or_else(|| tracks.first())
}
