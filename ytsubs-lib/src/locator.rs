//! Caption track locator
//!
//! The watch page embeds the player configuration as inline script data. We
//! never parse the DOM: each strategy isolates a JSON fragment holding a
//! `captionTracks` list and tries to deserialize it. Strategies run in a fixed
//! priority order and the first one that yields tracks wins. Upstream markup
//! drifts, so every failure here is quiet and ends in "no tracks".

use serde::Deserialize;
use tracing::{debug, trace};

use crate::types::CaptionTrack;

/// A pure extraction strategy over raw page markup
struct Strategy {
    name: &'static str,
    locate: fn(&str) -> Option<Vec<CaptionTrack>>,
}

const STRATEGIES: [Strategy; 4] = [
    Strategy {
        name: "captions-object",
        locate: captions_object,
    },
    Strategy {
        name: "tracklist-renderer",
        locate: tracklist_renderer,
    },
    Strategy {
        name: "bare-array",
        locate: bare_array,
    },
    Strategy {
        name: "balanced-array",
        locate: balanced_array,
    },
];

/// Playability states that mean the page will never carry captions
const UNPLAYABLE_STATES: [&str; 3] = ["ERROR", "UNPLAYABLE", "LOGIN_REQUIRED"];

#[derive(Debug, Deserialize)]
struct CaptionsFragment {
    #[serde(rename = "captionTracks")]
    caption_tracks: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTrack {
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default)]
    language_code: Option<String>,
    #[serde(default)]
    name: Option<RawName>,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    vss_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawName {
    #[serde(default)]
    simple_text: Option<String>,
    #[serde(default)]
    runs: Vec<RawRun>,
}

#[derive(Debug, Deserialize)]
struct RawRun {
    text: String,
}

impl RawTrack {
    /// A usable track needs both a fetch URL and a language code.
    fn into_track(self) -> Option<CaptionTrack> {
        let RawTrack {
            base_url,
            language_code,
            name,
            kind,
            vss_id,
        } = self;
        let fetch_url = base_url.filter(|u| !u.is_empty())?;
        let language_code = language_code.filter(|c| !c.is_empty())?;
        let is_generated = kind.as_deref() == Some("asr")
            || vss_id.as_deref().is_some_and(|v| v.starts_with("a."));
        let language_name = name.and_then(|n| {
            n.simple_text.or_else(|| {
                let joined: String = n.runs.into_iter().map(|r| r.text).collect();
                (!joined.is_empty()).then_some(joined)
            })
        });
        Some(CaptionTrack {
            language_code,
            language_name,
            is_generated,
            fetch_url,
        })
    }
}

/// Find the caption tracks advertised by a watch page, in page order.
///
/// Returns an empty list when no strategy succeeds.
pub fn locate_tracks(markup: &str) -> Vec<CaptionTrack> {
    for strategy in &STRATEGIES {
        match (strategy.locate)(markup) {
            Some(tracks) if !tracks.is_empty() => {
                debug!(
                    "Located {} caption track(s) with strategy {}",
                    tracks.len(),
                    strategy.name
                );
                return tracks;
            }
            _ => trace!("Strategy {} found no caption tracks", strategy.name),
        }
    }
    debug!("No caption track strategy matched ({} bytes of markup)", markup.len());
    Vec::new()
}

/// The page's playability status, if it says the video cannot be played.
pub fn unplayable_status(markup: &str) -> Option<&str> {
    let caps = regex!(r#""playabilityStatus":\s*\{[^{}]*?"status":\s*"([A-Z_]+)""#).captures(markup)?;
    let status = caps.get(1)?.as_str();
    UNPLAYABLE_STATES.contains(&status).then_some(status)
}

fn captions_object(markup: &str) -> Option<Vec<CaptionTrack>> {
    let caps = regex!(r#""captions":\s*(\{[^}]*?"captionTracks":\s*\[[^\]]+\][^}]*\})"#)
        .captures(markup)?;
    tracks_from_object(caps.get(1)?.as_str())
}

fn tracklist_renderer(markup: &str) -> Option<Vec<CaptionTrack>> {
    let caps = regex!(
        r#""playerCaptionsTracklistRenderer":\s*(\{[^}]*?"captionTracks":\s*\[[^\]]+\][^}]*\})"#
    )
    .captures(markup)?;
    tracks_from_object(caps.get(1)?.as_str())
}

fn bare_array(markup: &str) -> Option<Vec<CaptionTrack>> {
    let caps = regex!(r#"captionTracks["']:\s*(\[[^\]]+\])"#).captures(markup)?;
    tracks_from_array(caps.get(1)?.as_str())
}

fn balanced_array(markup: &str) -> Option<Vec<CaptionTrack>> {
    let m = regex!(r#""captionTracks":\s*\["#).find(markup)?;
    // Back up onto the opening bracket.
    let array = balanced_slice(&markup[m.end() - 1..])?;
    tracks_from_array(array)
}

fn tracks_from_object(json: &str) -> Option<Vec<CaptionTrack>> {
    match serde_json::from_str::<CaptionsFragment>(json) {
        Ok(fragment) => Some(usable_tracks(fragment.caption_tracks)),
        Err(e) => {
            debug!("Caption object did not parse: {}", e);
            None
        }
    }
}

fn tracks_from_array(json: &str) -> Option<Vec<CaptionTrack>> {
    match serde_json::from_str::<Vec<serde_json::Value>>(json) {
        Ok(entries) => Some(usable_tracks(entries)),
        Err(e) => {
            debug!("Caption array did not parse: {}", e);
            None
        }
    }
}

/// Keep the entries that describe a complete track, in order.
fn usable_tracks(entries: Vec<serde_json::Value>) -> Vec<CaptionTrack> {
    let total = entries.len();
    let tracks: Vec<CaptionTrack> = entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value::<RawTrack>(entry).ok())
        .filter_map(RawTrack::into_track)
        .collect();
    if tracks.len() < total {
        debug!("Skipped {} incomplete caption track entries", total - tracks.len());
    }
    tracks
}

/// Slice a bracketed JSON value starting at `s[0]`, honouring strings and
/// escapes. `None` if it never closes.
fn balanced_slice(s: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in s.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            '[' | '{' if !in_string => depth += 1,
            ']' | '}' if !in_string => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&s[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::fixtures;

    #[test]
    fn test_captions_object_shape() {
        let markup = r#"<script>var x = {"captions": {"captionTracks": [{"baseUrl": "https://example.test/tt?lang=en", "languageCode": "en", "kind": "asr"}], "visibility": "ON"}};</script>"#;
        let tracks = locate_tracks(markup);
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].language_code, "en");
        assert!(tracks[0].is_generated);
        assert_eq!(tracks[0].fetch_url, "https://example.test/tt?lang=en");
    }

    #[test]
    fn test_tracklist_renderer_shape() {
        let markup = r#"{"playerCaptionsTracklistRenderer": {"captionTracks": [{"baseUrl": "https://example.test/a", "languageCode": "fr"}, {"baseUrl": "https://example.test/b", "languageCode": "de"}]}}"#;
        let tracks = locate_tracks(markup);
        let codes: Vec<_> = tracks.iter().map(|t| t.language_code.as_str()).collect();
        assert_eq!(codes, ["fr", "de"]);
        assert!(!tracks[0].is_generated);
    }

    #[test]
    fn test_bare_array_shape() {
        let markup = r#"cfg.captionTracks": [{"baseUrl": "https://example.test/c", "languageCode": "es", "vssId": "a.es"}], more"#;
        let tracks = locate_tracks(markup);
        assert_eq!(tracks.len(), 1);
        assert!(tracks[0].is_generated);
    }

    #[test]
    fn test_nested_real_page_shape() {
        let tracks = locate_tracks(&fixtures::watch_page(&fixtures::default_tracks()));
        let codes: Vec<_> = tracks.iter().map(|t| t.language_code.as_str()).collect();
        assert_eq!(codes, ["es", "en", "de"]);
        assert_eq!(tracks[1].language_name.as_deref(), Some("English (auto-generated)"));
        assert!(tracks[1].is_generated);
        assert_eq!(tracks[0].language_name.as_deref(), Some("Spanish"));
        // Escaped ampersands in the embedded JSON are decoded.
        assert!(tracks[0].fetch_url.contains("&lang=es"));
    }

    #[test]
    fn test_broken_json_falls_through_to_next_strategy() {
        // The object pattern matches but does not parse; a later strategy does.
        let markup = r#""captions": {"x": 1, "captionTracks": [{"baseUrl": "u1", "languageCode": "en", "name": {"simpleText": "English"}}], "y": }"#;
        let tracks = locate_tracks(markup);
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].language_name.as_deref(), Some("English"));
    }

    #[test]
    fn test_no_captions_yields_empty() {
        assert!(locate_tracks("<html><body>nothing here</body></html>").is_empty());
        assert!(locate_tracks("").is_empty());
        assert!(locate_tracks(r#""captionTracks": [{"broken"#).is_empty());
    }

    #[test]
    fn test_all_incomplete_tracks_yield_empty() {
        let markup = r#""captionTracks": [{"languageCode": "en"}, {"baseUrl": "https://example.test/x"}, 7]"#;
        assert!(locate_tracks(markup).is_empty());
    }

    #[test]
    fn test_incomplete_track_does_not_hide_the_others() {
        let markup = r#"{"playerCaptionsTracklistRenderer": {"captionTracks": [{"languageCode": "fr", "name": {"simpleText": "French"}}, {"baseUrl": "https://example.test/en", "languageCode": "en"}]}}"#;
        let tracks = locate_tracks(markup);
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].language_code, "en");
        assert_eq!(tracks[0].fetch_url, "https://example.test/en");

        let chosen = crate::select_track(&tracks, "fr").map(|t| t.language_code.as_str());
        assert_eq!(chosen, Some("en"));
    }

    #[test]
    fn test_balanced_slice() {
        assert_eq!(balanced_slice(r#"[1, [2], "]"] tail"#), Some(r#"[1, [2], "]"]"#));
        assert_eq!(balanced_slice(r#"[{"a": "\"]"}] x"#), Some(r#"[{"a": "\"]"}]"#));
        assert_eq!(balanced_slice("[1, 2"), None);
    }

    #[test]
    fn test_unplayable_status() {
        assert_eq!(
            unplayable_status(r#"{"playabilityStatus": {"status": "ERROR", "reason": "Video unavailable"}}"#),
            Some("ERROR")
        );
        assert_eq!(unplayable_status(r#"{"playabilityStatus":{"status":"OK"}}"#), None);
        assert_eq!(
            unplayable_status(r#"{"playabilityStatus":{"reason":"Sign in","status":"LOGIN_REQUIRED"}}"#),
            Some("LOGIN_REQUIRED")
        );
        assert_eq!(unplayable_status("no status"), None);
    }
}
