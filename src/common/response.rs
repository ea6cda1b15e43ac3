use std::any::Any;

use axum::{
    body::Body,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tower_http::catch_panic::ResponseForPanic;
use tracing::error;
use utoipa::ToSchema;

use crate::error::AppError;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

pub struct ApiSuccess<T>(pub T, pub StatusCode);

impl<T> IntoResponse for ApiSuccess<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        let (body, status) = (self.0, self.1);
        (status, Json(body)).into_response()
    }
}

/// JSON error with an optional `details` field.
pub struct ApiError(pub String, pub StatusCode, pub Option<String>);

impl ApiError {
    /// Maps an [`AppError`] to its client-facing form. Details are attached
    /// only when `debug` is set.
    pub fn from_app(err: &AppError, debug: bool) -> Self {
        let details = if debug { err.details() } else { None };
        Self(err.to_string(), err.status_code(), details)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (message, status, details) = (self.0, self.1, self.2);
        let response = ErrorResponse {
            error: message,
            details,
        };
        (status, Json(response)).into_response()
    }
}

/// Plain-text error used by the media endpoints, whose responses are consumed
/// directly by `<video>` elements and download links.
pub struct PlainError(pub &'static str, pub StatusCode);

impl IntoResponse for PlainError {
    fn into_response(self) -> Response {
        let (message, status) = (self.0, self.1);
        (status, message).into_response()
    }
}

/// Turns a handler panic into the generic JSON 500 instead of a dropped
/// connection. The panic message is only exposed with debug errors on.
#[derive(Clone, Copy)]
pub struct PanicResponder {
    debug: bool,
}

impl PanicResponder {
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }
}

impl ResponseForPanic for PanicResponder {
    type ResponseBody = Body;

    fn response_for_panic(&mut self, err: Box<dyn Any + Send + 'static>) -> Response {
        let message = err
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| err.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        error!("Handler panicked: {}", message);

        let err = AppError::Internal(anyhow::anyhow!("handler panicked: {}", message));
        ApiError::from_app(&err, self.debug).into_response()
    }
}
