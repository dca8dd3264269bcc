//! Gateway event handling
//!
//! The platform hands us `{httpMethod, body, isBase64Encoded}` and expects
//! `{statusCode, headers, body}` back. Everything between is the shared
//! service with the function's defaults.

use std::collections::BTreeMap;

use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};
use ytsubs_lib::service::{self, RequestDefaults, ServiceResponse, StatusCode};
use ytsubs_lib::CaptionExtractor;

/// Incoming gateway event
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayEvent {
    #[serde(default)]
    pub http_method: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

/// Outgoing gateway response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

fn cors_headers(content_type: &str) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    headers.insert("Access-Control-Allow-Origin".to_string(), "*".to_string());
    headers.insert(
        "Access-Control-Allow-Headers".to_string(),
        "Content-Type, Authorization".to_string(),
    );
    headers.insert(
        "Access-Control-Allow-Methods".to_string(),
        "POST, OPTIONS".to_string(),
    );
    headers.insert("Content-Type".to_string(), content_type.to_string());
    headers
}

impl From<ServiceResponse> for GatewayResponse {
    fn from(resp: ServiceResponse) -> Self {
        let mut headers = cors_headers(resp.content_type);
        if let Some(disposition) = resp.content_disposition {
            headers.insert("Content-Disposition".to_string(), disposition);
        }
        GatewayResponse {
            status_code: resp.status.as_u16(),
            headers,
            body: resp.body,
        }
    }
}

/// Parse a raw gateway event. A malformed event still gets a response.
pub fn parse_event(raw: &str) -> Result<GatewayEvent, GatewayResponse> {
    serde_json::from_str(raw).map_err(|e| {
        error!("Malformed gateway event: {}", e);
        ServiceResponse::error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error",
            Some(e.to_string()),
        )
        .into()
    })
}

/// Handle one gateway event.
pub async fn handle_event(event: &GatewayEvent, extractor: &CaptionExtractor) -> GatewayResponse {
    let method = event.http_method.trim().to_ascii_uppercase();
    debug!(
        "Gateway event: {} ({} body bytes)",
        method,
        event.body.as_ref().map_or(0, |b| b.len())
    );

    match method.as_str() {
        "OPTIONS" => GatewayResponse {
            status_code: StatusCode::OK.as_u16(),
            headers: cors_headers("application/json"),
            body: String::new(),
        },
        "POST" => {
            let body = match decode_body(event) {
                Ok(body) => body,
                Err(response) => return response,
            };
            service::handle_subtitles(extractor, &body, &RequestDefaults::function())
                .await
                .into()
        }
        _ => ServiceResponse::method_not_allowed().into(),
    }
}

fn decode_body(event: &GatewayEvent) -> Result<Vec<u8>, GatewayResponse> {
    let raw = match event.body.as_deref() {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Err(bad_request("Request body required", None)),
    };
    if !event.is_base64_encoded {
        return Ok(raw.as_bytes().to_vec());
    }
    base64::engine::general_purpose::STANDARD
        .decode(raw.trim())
        .map_err(|e| {
            warn!("Undecodable base64 body: {}", e);
            bad_request("Invalid base64 body", Some(e.to_string()))
        })
}

fn bad_request(error: &str, details: Option<String>) -> GatewayResponse {
    ServiceResponse::error(StatusCode::BAD_REQUEST, error, details).into()
}
