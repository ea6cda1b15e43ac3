use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{error, info};

use super::dto::{AudioQuery, PreviewQuery};
use super::service::MediaService;
use crate::common::filename::{attachment_disposition, sanitize_filename, FALLBACK_NAME};
use crate::common::media_url::is_allowed_media_host;
use crate::common::response::PlainError;
use crate::state::AppState;

const INVALID_MEDIA_URL: &str = "Invalid media URL";
const PREVIEW_FAILED: &str = "Preview failed";
const CONVERSION_FAILED: &str = "Audio conversion failed";

/// Stream the reel video through this server
/// Proxies the upstream body unbuffered, forwarding Range requests
#[utoipa::path(
    get,
    path = "/api/reel/preview",
    params(PreviewQuery),
    responses(
        (status = 200, description = "Video bytes"),
        (status = 206, description = "Partial Content"),
        (status = 400, description = "URL host is not allow-listed"),
        (status = 500, description = "Preview failed")
    ),
    tag = "Media"
)]
pub async fn preview(
    State(state): State<AppState>,
    Query(query): Query<PreviewQuery>,
    headers: HeaderMap,
) -> Response {
    let url = query.url.unwrap_or_default();
    let url = url.trim();
    if url.is_empty() || !is_allowed_media_host(url, &state.config.allowed_media_hosts) {
        return PlainError(INVALID_MEDIA_URL, StatusCode::BAD_REQUEST).into_response();
    }

    let range = headers.get(header::RANGE).and_then(|h| h.to_str().ok());

    let upstream = match MediaService::open_preview(&state, url, range).await {
        Ok(r) => r,
        Err(e) => {
            error!("Preview failed for {}: {}", url, e);
            return PlainError(PREVIEW_FAILED, StatusCode::INTERNAL_SERVER_ERROR).into_response();
        }
    };

    let mut builder = Response::builder();

    let content_type = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| header::HeaderValue::from_static("video/mp4"));
    builder = builder.header(header::CONTENT_TYPE, content_type);

    if let Some(cl) = upstream.headers().get(header::CONTENT_LENGTH) {
        builder = builder.header(header::CONTENT_LENGTH, cl.clone());
    }

    if let Some(cr) = upstream.headers().get(header::CONTENT_RANGE) {
        builder = builder
            .header(header::CONTENT_RANGE, cr.clone())
            .status(StatusCode::PARTIAL_CONTENT);
    } else {
        builder = builder.status(StatusCode::OK);
    }

    if let Some(ar) = upstream.headers().get(header::ACCEPT_RANGES) {
        builder = builder.header(header::ACCEPT_RANGES, ar.clone());
    }

    let body = Body::from_stream(upstream.bytes_stream());

    builder
        .body(body)
        .unwrap_or_else(|_| PlainError(PREVIEW_FAILED, StatusCode::INTERNAL_SERVER_ERROR).into_response())
}

/// Convert the reel's audio track to MP3 and download it
#[utoipa::path(
    get,
    path = "/api/reel/audio",
    params(AudioQuery),
    responses(
        (status = 200, description = "MP3 attachment"),
        (status = 400, description = "URL host is not allow-listed"),
        (status = 500, description = "Audio conversion failed")
    ),
    tag = "Media"
)]
pub async fn audio(
    State(state): State<AppState>,
    Query(query): Query<AudioQuery>,
) -> Response {
    let url = query.url.unwrap_or_default();
    let url = url.trim();
    if url.is_empty() || !is_allowed_media_host(url, &state.config.allowed_media_hosts) {
        return PlainError(INVALID_MEDIA_URL, StatusCode::BAD_REQUEST).into_response();
    }

    let safe_name = sanitize_filename(query.name.as_deref().unwrap_or(FALLBACK_NAME));

    let stream = match MediaService::convert_to_mp3(&state, url).await {
        Ok(s) => s,
        Err(e) => {
            // stderr and I/O details stay server-side.
            let detail = e.details().unwrap_or_else(|| e.to_string());
            error!("Audio conversion failed for {}: {}", url, detail);
            return PlainError(CONVERSION_FAILED, StatusCode::INTERNAL_SERVER_ERROR).into_response();
        }
    };

    info!("Serving {}.mp3 ({} bytes)", safe_name, stream.size);

    let size = stream.size;
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "audio/mpeg")
        .header(
            header::CONTENT_DISPOSITION,
            attachment_disposition(&format!("{}.mp3", safe_name)),
        )
        .header(header::CONTENT_LENGTH, size)
        .body(Body::from_stream(stream))
        .unwrap_or_else(|_| PlainError(CONVERSION_FAILED, StatusCode::INTERNAL_SERVER_ERROR).into_response())
}
