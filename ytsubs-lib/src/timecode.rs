//! Timecode formatting for SRT and WebVTT

/// Decimal separator flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimecodeStyle {
    /// `HH:MM:SS,mmm`
    Srt,
    /// `HH:MM:SS.mmm`
    WebVtt,
}

impl TimecodeStyle {
    fn separator(self) -> char {
        match self {
            TimecodeStyle::Srt => ',',
            TimecodeStyle::WebVtt => '.',
        }
    }
}

/// Format a non-negative offset in seconds.
///
/// Milliseconds are rounded on the whole offset, so 0.9996 s becomes
/// `00:00:01,000`. Hours are not wrapped at 24.
pub fn format_timecode(seconds: f64, style: TimecodeStyle) -> String {
    let total_ms = if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1000.0).round() as u64
    } else {
        0
    };
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms / 60_000) % 60;
    let secs = (total_ms / 1000) % 60;
    let millis = total_ms % 1000;
    format!(
        "{:02}:{:02}:{:02}{}{:03}",
        hours,
        minutes,
        secs,
        style.separator(),
        millis
    )
}

/// `HH:MM:SS,mmm`
pub fn srt_timecode(seconds: f64) -> String {
    format_timecode(seconds, TimecodeStyle::Srt)
}

/// `HH:MM:SS.mmm`
pub fn vtt_timecode(seconds: f64) -> String {
    format_timecode(seconds, TimecodeStyle::WebVtt)
}
