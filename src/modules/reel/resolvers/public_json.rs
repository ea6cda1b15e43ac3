//! The `?__a=1` JSON view of a reel page.

use async_trait::async_trait;
use serde_json::Value;

use super::{Resolution, VideoResolver, check_blocked};
use crate::config::settings::AppConfig;
use crate::infrastructure::http::client::{InstagramHttp, UpstreamError};
use crate::modules::reel::metadata::{ReelMetadata, VideoPick};

pub struct PublicJsonResolver {
    http: InstagramHttp,
    base_url: String,
}

impl PublicJsonResolver {
    pub fn new(http: InstagramHttp, config: &AppConfig) -> Self {
        Self {
            http,
            base_url: config.instagram_base_url.clone(),
        }
    }

    fn endpoint(&self, shortcode: &str) -> String {
        format!("{}/reel/{}/?__a=1&__d=dis", self.base_url, shortcode)
    }
}

pub(crate) fn interpret(body: &Value) -> Result<Resolution, UpstreamError> {
    check_blocked(body)?;

    let media = body
        .pointer("/graphql/shortcode_media")
        .or_else(|| body.pointer("/items/0"))
        .filter(|v| v.is_object());

    Ok(match media {
        Some(media) => Resolution::from_metadata(ReelMetadata::from_media(media, VideoPick::First)),
        None => Resolution::Miss,
    })
}

#[async_trait]
impl VideoResolver for PublicJsonResolver {
    fn name(&self) -> &'static str {
        "public-json"
    }

    async fn resolve(&self, shortcode: &str) -> Result<Resolution, UpstreamError> {
        let body = self.http.get_json(&self.endpoint(shortcode)).await?;
        interpret(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_graphql_wrapper() {
        let body = json!({ "graphql": { "shortcode_media": {
            "video_url": "https://scontent.cdninstagram.com/a.mp4",
            "music_attribution_info": { "song_title": "Tune", "artist_name": "Someone" }
        }}});
        let Resolution::Found(meta) = interpret(&body).unwrap() else {
            panic!("expected a video");
        };
        assert_eq!(meta.audio_name, "Tune - Someone");
    }

    #[test]
    fn test_items_wrapper_uses_first_version() {
        let body = json!({ "items": [{
            "video_versions": [
                { "url": "https://scontent.cdninstagram.com/first.mp4" },
                { "url": "https://scontent.cdninstagram.com/second.mp4" }
            ]
        }]});
        let Resolution::Found(meta) = interpret(&body).unwrap() else {
            panic!("expected a video");
        };
        assert_eq!(meta.video_url, "https://scontent.cdninstagram.com/first.mp4");
    }

    #[test]
    fn test_empty_items_is_miss() {
        assert_eq!(interpret(&json!({ "items": [] })).unwrap(), Resolution::Miss);
    }
}
