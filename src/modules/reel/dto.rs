use serde::{Deserialize, Serialize};
use url::form_urlencoded;
use utoipa::{IntoParams, ToSchema};

use crate::common::filename::sanitize_filename;
use crate::modules::reel::metadata::ReelMetadata;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ReelQuery {
    /// Reel page, audio page, or direct MP4 URL.
    pub url: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReelResponse {
    pub title: String,
    pub audio_name: String,
    pub thumbnail_url: String,
    pub preview_url: String,
    pub mp3_url: String,
    pub download_name: String,
}

impl From<ReelMetadata> for ReelResponse {
    fn from(m: ReelMetadata) -> Self {
        let download_name = sanitize_filename(&m.audio_name);

        let preview_query = form_urlencoded::Serializer::new(String::new())
            .append_pair("url", &m.video_url)
            .finish();
        let mp3_query = form_urlencoded::Serializer::new(String::new())
            .append_pair("url", &m.video_url)
            .append_pair("name", &download_name)
            .finish();

        Self {
            title: m.title,
            audio_name: m.audio_name,
            thumbnail_url: m.thumbnail_url,
            preview_url: format!("/api/reel/preview?{}", preview_query),
            mp3_url: format!("/api/reel/audio?{}", mp3_query),
            download_name: format!("{}.mp3", download_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_response_urls_are_encoded() {
        let response = ReelResponse::from(ReelMetadata {
            title: "Walk".into(),
            audio_name: "Song: Part 1 / Remix".into(),
            thumbnail_url: String::new(),
            video_url: "https://v.fbcdn.net/a.mp4?x=1&y=2".into(),
        });
        assert_eq!(
            response.preview_url,
            "/api/reel/preview?url=https%3A%2F%2Fv.fbcdn.net%2Fa.mp4%3Fx%3D1%26y%3D2"
        );
        assert_eq!(
            response.mp3_url,
            "/api/reel/audio?url=https%3A%2F%2Fv.fbcdn.net%2Fa.mp4%3Fx%3D1%26y%3D2&name=Song+Part+1+Remix"
        );
        assert_eq!(response.download_name, "Song Part 1 Remix.mp3");
    }

    #[test]
    fn test_serializes_camel_case() {
        let response = ReelResponse::from(ReelMetadata {
            title: "t".into(),
            audio_name: "a".into(),
            thumbnail_url: "th".into(),
            video_url: "https://v.fbcdn.net/a.mp4".into(),
        });
        let json = serde_json::to_value(&response).unwrap();
        for key in ["title", "audioName", "thumbnailUrl", "previewUrl", "mp3Url", "downloadName"] {
            assert!(json.get(key).is_some(), "{key}");
        }
    }
}
