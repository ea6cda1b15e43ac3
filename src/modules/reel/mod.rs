use axum::Router;
use axum::routing::get;

use crate::state::AppState;

pub mod audio_page;
pub mod dto;
pub mod handler;
pub mod html;
pub mod json_search;
pub mod metadata;
pub mod resolvers;
pub mod service;
pub mod shortcode;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/reel", get(handler::get_reel))
}
