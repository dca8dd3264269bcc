//! Video URL helpers
//!
//! Not part of the caption pipeline: these back the video-info endpoint.

use serde::Serialize;

use crate::types::VideoId;

/// Pull the video id out of a watch, embed or short-link URL.
///
/// Recognised shapes, tried in this order:
///
/// - `https://www.youtube.com/watch?v=ID` (also with `v=` later in the query)
/// - `https://www.youtube.com/embed/ID`
/// - `https://youtu.be/ID`
///
/// The id must be exactly 11 characters; a longer run of id characters is
/// not truncated into a match.
pub fn extract_video_id(url: &str) -> Option<VideoId> {
    let patterns = [
        regex!(r"[?&]v=([0-9A-Za-z_-]{11})(?:[^0-9A-Za-z_-]|$)"),
        regex!(r"/embed/([0-9A-Za-z_-]{11})(?:[^0-9A-Za-z_-]|$)"),
        regex!(r"youtu\.be/([0-9A-Za-z_-]{11})(?:[^0-9A-Za-z_-]|$)"),
    ];
    patterns.iter().find_map(|re| {
        let caps = re.captures(url)?;
        VideoId::parse(caps.get(1)?.as_str()).ok()
    })
}

/// Thumbnail URLs in the sizes the image host serves
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Thumbnails {
    pub maxresdefault: String,
    pub hqdefault: String,
    pub mqdefault: String,
    pub default: String,
}

/// Basic video information, derived from the id alone
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoInfo {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub thumbnails: Thumbnails,
    pub url: String,
}

impl VideoInfo {
    /// Everything that can be known without calling a metadata API.
    pub fn basic(id: &VideoId) -> Self {
        let thumb = |name: &str| format!("https://img.youtube.com/vi/{}/{}.jpg", id, name);
        VideoInfo {
            video_id: id.to_string(),
            title: format!("YouTube video {}", id),
            description: "Full metadata requires a YouTube Data API key".to_string(),
            thumbnails: Thumbnails {
                maxresdefault: thumb("maxresdefault"),
                hqdefault: thumb("hqdefault"),
                mqdefault: thumb("mqdefault"),
                default: thumb("default"),
            },
            url: id.watch_url(),
        }
    }
}
