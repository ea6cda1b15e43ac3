use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid URL. Paste a Reel page, audio page, or direct MP4 URL.")]
    InvalidUrl,

    #[error("Could not read reel shortcode.")]
    MissingShortcode,

    #[error("This Reel has no video.")]
    NotAVideo,

    #[error("No reel found for this audio link.")]
    NoReelForAudio,

    #[error("Could not locate a playable reel video.")]
    NoVideoFound,

    #[error("Instagram blocked this reel. Try another URL.")]
    UpstreamBlocked(String),

    #[error("Audio conversion failed")]
    Conversion(String),

    #[error("Failed to fetch reel details.")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidUrl | AppError::MissingShortcode | AppError::NotAVideo => {
                StatusCode::BAD_REQUEST
            }
            AppError::NoReelForAudio | AppError::NoVideoFound | AppError::UpstreamBlocked(_) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::Conversion(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Server-side detail; only exposed to clients when debug errors are enabled.
    pub fn details(&self) -> Option<String> {
        match self {
            AppError::UpstreamBlocked(reason) => Some(reason.clone()),
            AppError::Conversion(stderr) => Some(stderr.clone()),
            AppError::Internal(e) => Some(format!("{:#}", e)),
            _ => None,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
