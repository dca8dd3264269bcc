use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{CaptionError, Result};
use crate::fetch::{FetchConfig, FetchKind, Fetcher, HttpFetcher};
use crate::locator::{locate_tracks, unplayable_status};
use crate::render::render;
use crate::selector::select_track;
use crate::timedtext::fetch_timed_text;
use crate::types::{AbsentReason, Extraction, SubtitleFormat, Subtitles, Transcript, VideoId};

/// End-to-end caption extraction
///
/// Runs page fetch → track location → selection → timed-text fetch, in that
/// order, for every call. Holds no per-request state, so one instance can be
/// shared by all requests.
#[derive(Clone)]
pub struct CaptionExtractor {
    fetcher: Arc<dyn Fetcher>,
}

impl CaptionExtractor {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }

    /// Extractor that talks to the real upstream.
    pub fn with_http(config: FetchConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(HttpFetcher::new(config)?)))
    }

    /// Fetch the cues of the best track for `language`.
    ///
    /// Every "nothing to return" condition, including upstream failures, comes
    /// back as `Extraction::Absent`; the cause is logged here.
    pub async fn extract(&self, video_id: &VideoId, language: &str) -> Extraction<Transcript> {
        let page_url = video_id.watch_url();
        let markup = match self.fetcher.fetch_text(&page_url, FetchKind::WatchPage).await {
            Ok(markup) => markup,
            Err(e) => return Extraction::Absent(absent_after_failure(video_id, "watch page", &e)),
        };

        let tracks = locate_tracks(&markup);
        if tracks.is_empty() {
            if let Some(status) = unplayable_status(&markup) {
                info!("Video {} is not playable (status {})", video_id, status);
                return Extraction::Absent(AbsentReason::VideoUnavailable);
            }
            info!("No caption tracks for video {}", video_id);
            return Extraction::Absent(AbsentReason::NoTracks);
        }

        let Some(track) = select_track(&tracks, language) else {
            return Extraction::Absent(AbsentReason::NoSelectableTrack);
        };
        debug!(
            "Video {}: selected track {} (requested {}, generated: {})",
            video_id, track.language_code, language, track.is_generated
        );

        let cues = match fetch_timed_text(self.fetcher.as_ref(), &track.fetch_url).await {
            Ok(cues) => cues,
            Err(e) => return Extraction::Absent(absent_after_failure(video_id, "timed text", &e)),
        };
        if cues.is_empty() {
            info!("Track {} of video {} has no usable cues", track.language_code, video_id);
            return Extraction::Absent(AbsentReason::NoCues);
        }

        let language = track.language_code.clone();
        Extraction::Found(Transcript {
            video_id: video_id.clone(),
            language,
            tracks,
            cues,
        })
    }

    /// Extract and render in `format`.
    ///
    /// `Err` is reserved for failures that are not about the upstream.
    pub async fn subtitles(
        &self,
        video_id: &VideoId,
        language: &str,
        format: SubtitleFormat,
    ) -> Result<Extraction<Subtitles>> {
        let transcript = match self.extract(video_id, language).await {
            Extraction::Found(transcript) => transcript,
            Extraction::Absent(reason) => return Ok(Extraction::Absent(reason)),
        };
        let document = render(video_id.as_str(), &transcript.cues, format)?;
        debug!(
            "Rendered {} cue(s) of {} as {} ({} bytes)",
            transcript.cues.len(),
            video_id,
            format,
            document.body.len()
        );
        Ok(Extraction::Found(Subtitles {
            transcript,
            document,
        }))
    }
}

fn absent_after_failure(video_id: &VideoId, what: &str, err: &CaptionError) -> AbsentReason {
    if err.is_access_denied() {
        warn!("Access denied fetching {} for {}: {}", what, video_id, err);
        AbsentReason::AccessDenied
    } else {
        warn!("Failed to fetch {} for {}: {}", what, video_id, err);
        AbsentReason::Unreachable
    }
}
