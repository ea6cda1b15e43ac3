//! Mobile API media info, addressed by the numeric media id.

use async_trait::async_trait;
use serde_json::Value;

use super::{Resolution, VideoResolver, check_blocked};
use crate::config::settings::AppConfig;
use crate::infrastructure::http::client::{InstagramHttp, UpstreamError};
use crate::modules::reel::metadata::{ReelMetadata, VideoPick};
use crate::modules::reel::shortcode::shortcode_to_media_id;

pub struct PrivateApiResolver {
    http: InstagramHttp,
    api_base_url: String,
}

impl PrivateApiResolver {
    pub fn new(http: InstagramHttp, config: &AppConfig) -> Self {
        Self {
            http,
            api_base_url: config.instagram_api_base_url.clone(),
        }
    }
}

pub(crate) fn interpret(body: &Value) -> Result<Resolution, UpstreamError> {
    check_blocked(body)?;

    Ok(match body.pointer("/items/0").filter(|v| v.is_object()) {
        Some(media) => Resolution::from_metadata(ReelMetadata::from_media(media, VideoPick::Last)),
        None => Resolution::Miss,
    })
}

#[async_trait]
impl VideoResolver for PrivateApiResolver {
    fn name(&self) -> &'static str {
        "private-api"
    }

    async fn resolve(&self, shortcode: &str) -> Result<Resolution, UpstreamError> {
        let Some(media_id) = shortcode_to_media_id(shortcode) else {
            return Ok(Resolution::Miss);
        };
        let endpoint = format!("{}/api/v1/media/{}/info/", self.api_base_url, media_id);
        let body = self.http.get_json(&endpoint).await?;
        interpret(&body)
    }
}
