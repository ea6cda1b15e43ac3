use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::common::response::PanicResponder;
use crate::state::AppState;

/// Builds the full application: API routes, Swagger UI and the static
/// front-end served from `PUBLIC_DIR` for everything else.
pub fn create_app(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config.public_dir);
    let panics = CatchPanicLayer::custom(PanicResponder::new(state.config.debug_errors));

    crate::routes::configure_routes()
        .fallback_service(static_files)
        .layer(panics)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
