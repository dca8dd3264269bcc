//! Timed-text XML parser
//!
//! The upstream delivers captions as a flat list of
//! `<text start="S" dur="D">TEXT</text>` elements. A pattern scan is enough;
//! there is no need for a full XML parser.

use tracing::debug;

use crate::error::Result;
use crate::fetch::{FetchKind, Fetcher};
use crate::text::clean_text;
use crate::types::Cue;

/// Duration used when a `<text>` element has no `dur` attribute
pub const DEFAULT_CUE_DURATION_SECS: f64 = 3.0;

/// Fetch a timed-text document and parse it.
pub async fn fetch_timed_text(fetcher: &dyn Fetcher, url: &str) -> Result<Vec<Cue>> {
    let xml = fetcher.fetch_text(url, FetchKind::TimedText).await?;
    Ok(parse_timed_text(&xml))
}

/// Parse every `<text>` element into a cue, in document order.
///
/// Elements with an unparsable timing or with no text left after cleaning are
/// skipped; the rest of the document is still parsed.
pub fn parse_timed_text(xml: &str) -> Vec<Cue> {
    let mut cues = Vec::new();
    let mut skipped = 0usize;

    let pattern = regex!(
        r#"(?s)<text\s+start="([^"]*)"(?:\s+dur="([^"]*)")?(?:\s+[\w:-]+="[^"]*")*\s*>(.*?)</text>"#
    );
    for caps in pattern.captures_iter(xml) {
        let start = caps.get(1).map_or("", |m| m.as_str());
        let dur = caps.get(2).map(|m| m.as_str());
        let text = caps.get(3).map_or("", |m| m.as_str());
        match cue_from_parts(start, dur, text) {
            Some(cue) => cues.push(cue),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!("Skipped {} timed-text element(s), kept {}", skipped, cues.len());
    }
    cues
}

fn cue_from_parts(start: &str, dur: Option<&str>, text: &str) -> Option<Cue> {
    let start_secs = start
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|s| s.is_finite() && *s >= 0.0)?;
    let duration_secs = match dur {
        Some(d) => d
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|d| d.is_finite() && *d > 0.0)?,
        None => DEFAULT_CUE_DURATION_SECS,
    };
    let text = clean_text(text);
    if text.is_empty() {
        return None;
    }
    Some(Cue::new(start_secs, duration_secs, text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_document() {
        let xml = r#"<?xml version="1.0" encoding="utf-8" ?><transcript><text start="0.08" dur="2.5">Hello &amp; welcome</text><text start="2.58" dur="1.9">second line</text></transcript>"#;
        let cues = parse_timed_text(xml);
        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0].start_secs, 0.08);
        assert_eq!(cues[0].duration_secs, 2.5);
        assert_eq!(cues[0].text, "Hello & welcome");
        assert_eq!(cues[1].text, "second line");
    }

    #[test]
    fn test_missing_dur_defaults() {
        let cues = parse_timed_text(r#"<text start="4">no duration</text>"#);
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].duration_secs, DEFAULT_CUE_DURATION_SECS);
    }

    #[test]
    fn test_malformed_values_are_skipped() {
        let xml = concat!(
            r#"<text start="1.0" dur="1.0">one</text>"#,
            r#"<text start="abc" dur="1.0">broken</text>"#,
            r#"<text start="3.0" dur="2.0">three</text>"#,
        );
        let cues = parse_timed_text(xml);
        let texts: Vec<_> = cues.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, ["one", "three"]);
    }

    #[test]
    fn test_bad_duration_and_non_finite_skipped() {
        let xml = concat!(
            r#"<text start="1.0" dur="x">bad dur</text>"#,
            r#"<text start="NaN" dur="1.0">nan start</text>"#,
            r#"<text start="-2" dur="1.0">negative</text>"#,
            r#"<text start="2.0" dur="0">zero dur</text>"#,
            r#"<text start="5.0" dur="1.0">kept</text>"#,
        );
        let cues = parse_timed_text(xml);
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text, "kept");
    }

    #[test]
    fn test_empty_text_dropped() {
        let xml = r#"<text start="0" dur="1">   </text><text start="1" dur="1">&lt;br&gt;</text><text start="2" dur="1">ok</text>"#;
        let cues = parse_timed_text(xml);
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].start_secs, 2.0);
    }

    #[test]
    fn test_document_order_is_kept() {
        let xml = r#"<text start="9" dur="1">late</text><text start="1" dur="1">early</text>"#;
        let cues = parse_timed_text(xml);
        assert_eq!(cues[0].text, "late");
        assert_eq!(cues[1].text, "early");
    }

    #[test]
    fn test_extra_attributes_and_multiline_text() {
        let xml = "<text start=\"1.5\" dur=\"2\" xml:lang=\"en\">first\nsecond</text>";
        let cues = parse_timed_text(xml);
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text, "first second");
    }

    #[test]
    fn test_self_closing_elements_do_not_swallow_neighbours() {
        let xml = r#"<text start="0" dur="1"/><text start="1" dur="1">real</text>"#;
        let cues = parse_timed_text(xml);
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text, "real");
    }

    #[test]
    fn test_not_timed_text() {
        assert!(parse_timed_text("<html>error page</html>").is_empty());
        assert!(parse_timed_text("").is_empty());
    }
}
