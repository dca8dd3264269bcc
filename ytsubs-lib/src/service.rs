//! Request handling shared by the HTTP server and the gateway function
//!
//! Both deployment shapes parse the same request body and map outcomes to the
//! same statuses and bodies. Only the defaults differ.

pub use http::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::api::CaptionExtractor;
use crate::types::{AbsentReason, CaptionTrack, Extraction, SubtitleFormat, Subtitles, VideoId};
use crate::url::{extract_video_id, VideoInfo};

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Per-adapter request defaults
#[derive(Debug, Clone)]
pub struct RequestDefaults {
    pub format: SubtitleFormat,
    pub language: String,
}

impl RequestDefaults {
    /// Long-running HTTP service
    pub fn server() -> Self {
        Self {
            format: SubtitleFormat::Srt,
            language: "fr".to_string(),
        }
    }

    /// Gateway function
    pub fn function() -> Self {
        Self {
            format: SubtitleFormat::Txt,
            language: "fr".to_string(),
        }
    }
}

/// Body of a subtitles request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtitleRequest {
    #[serde(default)]
    pub video_id: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

/// Body of a video-info request
#[derive(Debug, Clone, Deserialize)]
pub struct VideoInfoRequest {
    #[serde(default)]
    pub url: Option<String>,
}

/// `{error, details?}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// One entry of `availableLanguages`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailableLanguage {
    pub language: String,
    pub name: String,
    pub is_generated: bool,
}

impl From<&CaptionTrack> for AvailableLanguage {
    fn from(track: &CaptionTrack) -> Self {
        AvailableLanguage {
            language: track.language_code.clone(),
            name: track
                .language_name
                .clone()
                .unwrap_or_else(|| track.language_code.clone()),
            is_generated: track.is_generated,
        }
    }
}

/// JSON envelope returned for the `json` format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtitlesEnvelope {
    pub video_id: String,
    pub language: String,
    pub format: String,
    /// The rendered document
    pub content: String,
    pub available_languages: Vec<AvailableLanguage>,
    pub success: bool,
}

impl From<&Subtitles> for SubtitlesEnvelope {
    fn from(subs: &Subtitles) -> Self {
        SubtitlesEnvelope {
            video_id: subs.transcript.video_id.to_string(),
            language: subs.transcript.language.clone(),
            format: subs.document.format.to_string(),
            content: subs.document.body.clone(),
            available_languages: subs.transcript.tracks.iter().map(Into::into).collect(),
            success: true,
        }
    }
}

/// Transport-neutral response
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceResponse {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub content_disposition: Option<String>,
    pub body: String,
}

impl ServiceResponse {
    pub fn json<T: Serialize>(status: StatusCode, value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => ServiceResponse {
                status,
                content_type: JSON_CONTENT_TYPE,
                content_disposition: None,
                body,
            },
            Err(e) => {
                error!("Failed to serialize response: {}", e);
                ServiceResponse {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    content_type: JSON_CONTENT_TYPE,
                    content_disposition: None,
                    body: r#"{"error":"Internal server error"}"#.to_string(),
                }
            }
        }
    }

    pub fn error(status: StatusCode, error: impl Into<String>, details: Option<String>) -> Self {
        Self::json(
            status,
            &ErrorBody {
                error: error.into(),
                details,
            },
        )
    }

    /// 405 for anything but POST/OPTIONS on the subtitles endpoint
    pub fn method_not_allowed() -> Self {
        Self::error(
            StatusCode::METHOD_NOT_ALLOWED,
            "Method not allowed, use POST",
            None,
        )
    }

    pub fn not_found() -> Self {
        Self::error(StatusCode::NOT_FOUND, "Endpoint not found", None)
    }

    fn document(subs: Subtitles) -> Self {
        let doc = subs.document;
        ServiceResponse {
            status: StatusCode::OK,
            content_type: doc.content_type,
            content_disposition: Some(format!("attachment; filename=\"{}\"", doc.filename)),
            body: doc.body,
        }
    }
}

/// Handle a subtitles request body end to end.
pub async fn handle_subtitles(
    extractor: &CaptionExtractor,
    body: &[u8],
    defaults: &RequestDefaults,
) -> ServiceResponse {
    let request = match parse_subtitle_request(body) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let Some(raw_id) = request.video_id.as_deref().filter(|id| !id.is_empty()) else {
        return ServiceResponse::error(StatusCode::BAD_REQUEST, "videoId is required", None);
    };
    let video_id = match VideoId::parse(raw_id) {
        Ok(id) => id,
        Err(e) => {
            return ServiceResponse::error(
                StatusCode::BAD_REQUEST,
                "Invalid videoId",
                Some(e.to_string()),
            )
        }
    };
    let format = request
        .format
        .as_deref()
        .map(SubtitleFormat::from_token)
        .unwrap_or(defaults.format);
    let language = request.language.as_deref().unwrap_or(&defaults.language);

    info!(
        "Subtitles request: video {}, format {}, language {}",
        video_id, format, language
    );

    match extractor.subtitles(&video_id, language, format).await {
        Ok(Extraction::Found(subs)) if format == SubtitleFormat::Json => {
            ServiceResponse::json(StatusCode::OK, &SubtitlesEnvelope::from(&subs))
        }
        Ok(Extraction::Found(subs)) => ServiceResponse::document(subs),
        Ok(Extraction::Absent(reason)) => absent_response(reason),
        Err(e) => {
            error!("Subtitles for {} failed: {}", video_id, e);
            ServiceResponse::error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
                Some(e.to_string()),
            )
        }
    }
}

/// Basic info for the video a URL points at.
pub fn handle_video_info(body: &[u8]) -> ServiceResponse {
    let request: VideoInfoRequest = match serde_json::from_slice(body) {
        Ok(request) => request,
        Err(e) => {
            return ServiceResponse::error(
                StatusCode::BAD_REQUEST,
                "Invalid JSON body",
                Some(e.to_string()),
            )
        }
    };
    let Some(url) = request.url.filter(|u| !u.is_empty()) else {
        return ServiceResponse::error(StatusCode::BAD_REQUEST, "url is required", None);
    };
    match extract_video_id(&url) {
        Some(id) => ServiceResponse::json(StatusCode::OK, &VideoInfo::basic(&id)),
        None => ServiceResponse::error(StatusCode::BAD_REQUEST, "Invalid YouTube URL", None),
    }
}

fn parse_subtitle_request(body: &[u8]) -> Result<SubtitleRequest, ServiceResponse> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ServiceResponse::error(
            StatusCode::BAD_REQUEST,
            "Request body required",
            None,
        ));
    }
    serde_json::from_slice(body).map_err(|e| {
        ServiceResponse::error(
            StatusCode::BAD_REQUEST,
            "Invalid JSON body",
            Some(e.to_string()),
        )
    })
}

fn absent_response(reason: AbsentReason) -> ServiceResponse {
    match reason {
        AbsentReason::AccessDenied => ServiceResponse::error(
            StatusCode::FORBIDDEN,
            "Subtitles are disabled for this video",
            Some("The upstream refused access to the captions".to_string()),
        ),
        AbsentReason::VideoUnavailable => ServiceResponse::error(
            StatusCode::NOT_FOUND,
            "Video unavailable",
            Some("The video is private, removed or does not exist".to_string()),
        ),
        _ => ServiceResponse::error(
            StatusCode::NOT_FOUND,
            "No subtitles available for this video",
            None,
        ),
    }
}
