//! Last resort: the public reel page itself (OpenGraph tags, JSON-LD and the
//! legacy `_sharedData` blob).

use async_trait::async_trait;
use select::document::Document;
use serde_json::Value;

use super::{Resolution, VideoResolver};
use crate::config::settings::AppConfig;
use crate::infrastructure::http::client::{InstagramHttp, UpstreamError};
use crate::modules::reel::html;
use crate::modules::reel::metadata::{self, ReelMetadata, VideoPick};

pub struct PageHtmlResolver {
    http: InstagramHttp,
    base_url: String,
}

impl PageHtmlResolver {
    pub fn new(http: InstagramHttp, config: &AppConfig) -> Self {
        Self {
            http,
            base_url: config.instagram_base_url.clone(),
        }
    }
}

fn ld_thumbnail(ld: &Value) -> Option<String> {
    let thumb = ld.get("thumbnailUrl")?;
    thumb
        .as_str()
        .or_else(|| thumb.get(0).and_then(Value::as_str))
        .map(String::from)
}

pub(crate) fn extract(page: &str) -> ReelMetadata {
    let document = Document::from(page);
    let media = html::shared_data_media(page);
    let from_media = media
        .as_ref()
        .map(|m| ReelMetadata::from_media(m, VideoPick::First));
    let ld = html::ld_video_object(&document).unwrap_or(Value::Null);

    // Shared data wins field by field, then JSON-LD, then OpenGraph.
    let media_title = media
        .as_ref()
        .and_then(|m| metadata::caption(m).or_else(|| metadata::owner_username(m).map(|o| format!("Reel by @{}", o))));
    let title = media_title
        .or_else(|| ld.get("name").and_then(Value::as_str).map(String::from))
        .or_else(|| html::meta_content(&document, "og:title"))
        .unwrap_or_else(|| metadata::DEFAULT_TITLE.to_string());

    let audio_name = media
        .as_ref()
        .and_then(metadata::audio_name)
        .unwrap_or_else(|| metadata::DEFAULT_AUDIO_NAME.to_string());

    let thumbnail_url = from_media
        .as_ref()
        .map(|m| m.thumbnail_url.clone())
        .filter(|t| !t.is_empty())
        .or_else(|| ld_thumbnail(&ld))
        .or_else(|| html::meta_content(&document, "og:image"))
        .unwrap_or_default();

    let video_url = from_media
        .map(|m| m.video_url)
        .filter(|v| !v.is_empty())
        .or_else(|| ld.get("contentUrl").and_then(Value::as_str).map(String::from))
        .or_else(|| html::meta_content(&document, "og:video"))
        .or_else(|| html::meta_content(&document, "og:video:secure_url"))
        .unwrap_or_default();

    ReelMetadata {
        title,
        audio_name,
        thumbnail_url,
        video_url,
    }
}

#[async_trait]
impl VideoResolver for PageHtmlResolver {
    fn name(&self) -> &'static str {
        "page-html"
    }

    async fn resolve(&self, shortcode: &str) -> Result<Resolution, UpstreamError> {
        let url = format!("{}/reel/{}/", self.base_url, shortcode);
        let page = self.http.get_text(&url).await?;
        Ok(Resolution::from_metadata(extract(&page)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opengraph_only_page() {
        let page = r#"<meta property="og:title" content="Sunset">
            <meta property="og:image" content="https://scontent.cdninstagram.com/t.jpg">
            <meta property="og:video:secure_url" content="https://scontent.cdninstagram.com/v.mp4">"#;
        let meta = extract(page);
        assert_eq!(meta.title, "Sunset");
        assert_eq!(meta.audio_name, metadata::DEFAULT_AUDIO_NAME);
        assert_eq!(meta.thumbnail_url, "https://scontent.cdninstagram.com/t.jpg");
        assert_eq!(meta.video_url, "https://scontent.cdninstagram.com/v.mp4");
    }

    #[test]
    fn test_shared_data_beats_opengraph() {
        let page = r#"<meta property="og:video" content="https://scontent.cdninstagram.com/og.mp4">
            <script>window._sharedData = {"entry_data":{"PostPage":[{"graphql":{"shortcode_media":{
                "video_url":"https://scontent.cdninstagram.com/shared.mp4",
                "owner":{"username":"poster"},
                "music_info":{"song_title":"Hook"}
            }}}]}};</script>"#;
        let meta = extract(page);
        assert_eq!(meta.video_url, "https://scontent.cdninstagram.com/shared.mp4");
        assert_eq!(meta.title, "Reel by @poster");
        assert_eq!(meta.audio_name, "Hook");
    }

    #[test]
    fn test_login_page_has_no_video() {
        let meta = extract("<html><title>Login • Instagram</title></html>");
        assert!(!meta.has_video());
        assert_eq!(meta.title, metadata::DEFAULT_TITLE);
    }
}
