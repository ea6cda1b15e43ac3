//! Post lookup through Instagram's web GraphQL endpoint.

use async_trait::async_trait;
use serde_json::Value;

use super::{Resolution, VideoResolver, check_blocked};
use crate::config::settings::AppConfig;
use crate::infrastructure::http::client::{InstagramHttp, UpstreamError};
use crate::modules::reel::metadata::{ReelMetadata, VideoPick};

/// Anti-CSRF token the public web app sends with anonymous queries.
const LSD_TOKEN: &str = "AVqbxe3J_YA";

pub struct GraphqlResolver {
    http: InstagramHttp,
    endpoint: String,
    doc_id: String,
}

impl GraphqlResolver {
    pub fn new(http: InstagramHttp, config: &AppConfig) -> Self {
        Self {
            http,
            endpoint: format!("{}/api/graphql", config.instagram_base_url),
            doc_id: config.graphql_doc_id.clone(),
        }
    }
}

fn media_node(body: &Value) -> Option<&Value> {
    body.pointer("/data/xdt_shortcode_media")
        .or_else(|| body.pointer("/data/shortcode_media"))
        .filter(|v| v.is_object())
}

pub(crate) fn interpret(body: &Value) -> Result<Resolution, UpstreamError> {
    check_blocked(body)?;

    let Some(media) = media_node(body) else {
        return Ok(Resolution::Miss);
    };

    if media.get("is_video").and_then(Value::as_bool) == Some(false) {
        return Ok(Resolution::NotAVideo);
    }

    Ok(Resolution::from_metadata(ReelMetadata::from_media(
        media,
        VideoPick::First,
    )))
}

#[async_trait]
impl VideoResolver for GraphqlResolver {
    fn name(&self) -> &'static str {
        "graphql"
    }

    async fn resolve(&self, shortcode: &str) -> Result<Resolution, UpstreamError> {
        let variables = serde_json::json!({ "shortcode": shortcode }).to_string();
        let form = [
            ("doc_id", self.doc_id.as_str()),
            ("variables", variables.as_str()),
            ("lsd", LSD_TOKEN),
        ];
        let body = self.http.post_form_json(&self.endpoint, &form).await?;
        interpret(&body)
    }
}
