//! HTTP request handlers

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::warn;
use ytsubs_lib::service::{self, ServiceResponse};

use crate::state::AppState;

/// Adapter from the transport-neutral response to axum
#[derive(Debug)]
pub struct ApiResponse(pub ServiceResponse);

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let ServiceResponse {
            status,
            content_type,
            content_disposition,
            body,
        } = self.0;

        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        if let Some(disposition) = content_disposition {
            match HeaderValue::from_str(&disposition) {
                Ok(value) => {
                    headers.insert(header::CONTENT_DISPOSITION, value);
                }
                Err(e) => warn!("Dropping Content-Disposition {:?}: {}", disposition, e),
            }
        }

        (status, headers, body).into_response()
    }
}

/// Health check endpoint
pub async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}

/// Version information endpoint
pub async fn version_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "online",
        "version": env!("CARGO_PKG_VERSION"),
        "library": ytsubs_lib::VERSION,
    }))
}

/// Service self-test
/// GET /api/test
pub async fn api_test(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "OK",
        "hasYouTubeKey": state.config.has_api_key(),
        "transcriptApiAvailable": true,
    }))
}

/// Subtitle download
/// POST /api/subtitles, OPTIONS for preflight
pub async fn subtitles(
    State(state): State<Arc<AppState>>,
    method: Method,
    body: Bytes,
) -> Response {
    if method == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else if method == Method::POST {
        ApiResponse(service::handle_subtitles(&state.extractor, &body, &state.defaults).await)
            .into_response()
    } else {
        ApiResponse(ServiceResponse::method_not_allowed()).into_response()
    }
}

/// Basic video info from a URL
/// POST /api/video-info
pub async fn video_info(method: Method, body: Bytes) -> Response {
    if method == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else if method == Method::POST {
        ApiResponse(service::handle_video_info(&body)).into_response()
    } else {
        ApiResponse(ServiceResponse::method_not_allowed()).into_response()
    }
}

/// Fallback for unknown paths
pub async fn not_found() -> ApiResponse {
    ApiResponse(ServiceResponse::not_found())
}
