//! Output rendering
//!
//! Turns an ordered cue list into one of the supported document formats.
//! An empty cue list renders as an empty body in every format; telling
//! "nothing to show" apart from "extraction failed" is the orchestrator's job.

use crate::error::Result;
use crate::timecode::{srt_timecode, vtt_timecode};
use crate::types::{Cue, RenderedDocument, SubtitleFormat};

/// Render `cues` for `video_id` in `format`.
pub fn render(video_id: &str, cues: &[Cue], format: SubtitleFormat) -> Result<RenderedDocument> {
    let body = if cues.is_empty() {
        String::new()
    } else {
        match format {
            SubtitleFormat::Txt => to_txt(cues),
            SubtitleFormat::Srt => to_srt(cues),
            SubtitleFormat::Vtt => to_vtt(cues),
            SubtitleFormat::Json => serde_json::to_string_pretty(cues)?,
        }
    };

    Ok(RenderedDocument {
        format,
        body,
        content_type: format.mime_type(),
        filename: format!("{}_subtitles.{}", video_id, format.extension()),
    })
}

/// One line per cue, no timing.
pub fn to_txt(cues: &[Cue]) -> String {
    cues.iter()
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn to_srt(cues: &[Cue]) -> String {
    let mut out = String::new();
    for (i, cue) in cues.iter().enumerate() {
        out.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            i + 1,
            srt_timecode(cue.start_secs),
            srt_timecode(cue.end_secs()),
            cue.text
        ));
    }
    out
}

pub fn to_vtt(cues: &[Cue]) -> String {
    let mut out = String::from("WEBVTT\n\n");
    for cue in cues {
        out.push_str(&format!(
            "{} --> {}\n{}\n\n",
            vtt_timecode(cue.start_secs),
            vtt_timecode(cue.end_secs()),
            cue.text
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Cue> {
        vec![Cue::new(0.0, 2.0, "Hi"), Cue::new(2.0, 3.0, "There")]
    }

    #[test]
    fn test_srt_exact() {
        let doc = render("dQw4w9WgXcQ", &sample(), SubtitleFormat::Srt).unwrap();
        assert_eq!(
            doc.body,
            "1\n00:00:00,000 --> 00:00:02,000\nHi\n\n2\n00:00:02,000 --> 00:00:05,000\nThere\n\n"
        );
        assert_eq!(doc.filename, "dQw4w9WgXcQ_subtitles.srt");
        assert_eq!(doc.content_type, "application/x-subrip; charset=utf-8");
    }

    #[test]
    fn test_vtt_exact() {
        let doc = render("dQw4w9WgXcQ", &sample(), SubtitleFormat::Vtt).unwrap();
        assert!(doc.body.starts_with("WEBVTT\n\n00:00:00.000 --> 00:00:02.000\nHi\n\n"));
        assert_eq!(
            doc.body,
            "WEBVTT\n\n00:00:00.000 --> 00:00:02.000\nHi\n\n00:00:02.000 --> 00:00:05.000\nThere\n\n"
        );
        assert_eq!(doc.filename, "dQw4w9WgXcQ_subtitles.vtt");
    }

    #[test]
    fn test_txt() {
        let doc = render("dQw4w9WgXcQ", &sample(), SubtitleFormat::Txt).unwrap();
        assert_eq!(doc.body, "Hi\nThere");
        assert_eq!(doc.content_type, "text/plain; charset=utf-8");
    }

    #[test]
    fn test_json_is_indented_and_keeps_unicode() {
        let cues = vec![Cue::new(1.5, 2.0, "Ça va ? 日本語")];
        let doc = render("dQw4w9WgXcQ", &cues, SubtitleFormat::Json).unwrap();
        assert!(doc.body.contains("Ça va ? 日本語"));
        assert!(doc.body.contains("\n  {"));
        let parsed: serde_json::Value = serde_json::from_str(&doc.body).unwrap();
        assert_eq!(parsed[0]["start"], 1.5);
        assert_eq!(parsed[0]["duration"], 2.0);
        assert_eq!(parsed[0]["text"], "Ça va ? 日本語");
    }

    #[test]
    fn test_unknown_token_renders_as_text() {
        let format = SubtitleFormat::from_token("docx");
        let doc = render("dQw4w9WgXcQ", &sample(), format).unwrap();
        assert_eq!(doc.body, "Hi\nThere");
        assert_eq!(doc.filename, "dQw4w9WgXcQ_subtitles.txt");
    }

    #[test]
    fn test_empty_cues_give_empty_body() {
        for format in [
            SubtitleFormat::Txt,
            SubtitleFormat::Srt,
            SubtitleFormat::Vtt,
            SubtitleFormat::Json,
        ] {
            let doc = render("dQw4w9WgXcQ", &[], format).unwrap();
            assert!(doc.body.is_empty(), "{} body not empty", format);
        }
    }

    #[test]
    fn test_srt_sequence_numbers_are_one_based() {
        let cues: Vec<_> = (0..12)
            .map(|i| Cue::new(i as f64, 1.0, format!("line {}", i)))
            .collect();
        let srt = to_srt(&cues);
        assert!(srt.starts_with("1\n"));
        assert!(srt.contains("\n\n12\n00:00:11,000 --> 00:00:12,000\nline 11\n\n"));
    }
}
