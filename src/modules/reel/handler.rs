use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{error, warn};

use super::dto::{ReelQuery, ReelResponse};
use super::service::ReelService;
use crate::common::response::{ApiError, ApiSuccess, ErrorResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Resolve a reel, audio page or MP4 link into display metadata and
/// preview/download links
#[utoipa::path(
    get,
    path = "/api/reel",
    params(ReelQuery),
    responses(
        (status = 200, description = "Reel metadata", body = ReelResponse),
        (status = 400, description = "Invalid URL, missing shortcode, or not a video", body = ErrorResponse),
        (status = 502, description = "No playable video found or Instagram blocked the request", body = ErrorResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse)
    ),
    tag = "Reel"
)]
pub async fn get_reel(
    State(state): State<AppState>,
    Query(query): Query<ReelQuery>,
) -> impl IntoResponse {
    let url = query.url.unwrap_or_default();
    let url = url.trim();

    match ReelService::lookup(&state, url).await {
        Ok(res) => ApiSuccess(res, StatusCode::OK).into_response(),
        Err(e) => {
            match &e {
                AppError::Internal(inner) => error!("Reel lookup failed for {}: {:#}", url, inner),
                other => warn!("Reel lookup failed for {}: {}", url, other),
            }
            ApiError::from_app(&e, state.config.debug_errors).into_response()
        }
    }
}
