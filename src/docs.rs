use utoipa::OpenApi;

use crate::common::response::ErrorResponse;
use crate::modules::reel::dto::ReelResponse;
use crate::routes::HealthResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::modules::reel::handler::get_reel,
        crate::modules::media::handler::preview,
        crate::modules::media::handler::audio,
    ),
    components(
        schemas(ReelResponse, ErrorResponse, HealthResponse)
    ),
    tags(
        (name = "Reel", description = "Reel metadata lookup"),
        (name = "Media", description = "Video preview proxy and MP3 download"),
        (name = "Health", description = "Service health")
    )
)]
pub struct ApiDoc;
