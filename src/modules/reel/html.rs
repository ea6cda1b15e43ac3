//! Scraping of Instagram HTML pages. Meta tags and JSON-LD come from the
//! parsed document; the `_sharedData` blob and shortcode markers live inside
//! script text and are matched with regexes.

use std::sync::LazyLock;

use regex::Regex;
use select::document::Document;
use select::predicate::{Attr, Name};
use serde_json::Value;

static SHARED_DATA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)window\._sharedData\s*=\s*(\{.*?\});").expect("shared data regex")
});

static SHORTCODE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""shortcode"\s*:\s*"([A-Za-z0-9_-]{5,})""#).expect("shortcode marker regex")
});

static REEL_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/reel/([A-Za-z0-9_-]{5,})/").expect("reel link regex"));

/// `content` of the first `<meta property=..>` (or `name=..`) tag matching `property`.
pub fn meta_content(document: &Document, property: &str) -> Option<String> {
    document
        .find(Name("meta"))
        .find(|node| {
            node.attr("property")
                .or_else(|| node.attr("name"))
                .is_some_and(|key| key.eq_ignore_ascii_case(property))
        })
        .and_then(|node| node.attr("content"))
        .map(str::trim)
        .filter(|content| !content.is_empty())
        .map(String::from)
}

/// The first JSON-LD node that describes a video.
pub fn ld_video_object(document: &Document) -> Option<Value> {
    document
        .find(Attr("type", "application/ld+json"))
        .find_map(|node| {
            let json: Value = serde_json::from_str(node.text().trim()).ok()?;
            let candidates = match json {
                Value::Array(items) => items,
                Value::Object(ref map) if map.get("@graph").is_some_and(Value::is_array) => {
                    map["@graph"].as_array().cloned().unwrap_or_default()
                }
                other => vec![other],
            };
            candidates.into_iter().find(|candidate| {
                candidate.get("@type").and_then(Value::as_str) == Some("VideoObject")
                    || candidate.get("contentUrl").is_some()
            })
        })
}

/// `shortcode_media` out of a legacy `window._sharedData` blob.
pub fn shared_data_media(html: &str) -> Option<Value> {
    let caps = SHARED_DATA.captures(html)?;
    let data: Value = serde_json::from_str(&caps[1]).ok()?;
    data.pointer("/entry_data/PostPage/0/graphql/shortcode_media")
        .or_else(|| data.pointer("/entry_data/ReelPage/0/graphql/shortcode_media"))
        .filter(|v| v.is_object())
        .cloned()
}

/// First shortcode embedded in a page, from a `"shortcode":"..."` pair or a
/// `/reel/<code>/` link.
pub fn embedded_shortcode(html: &str) -> Option<String> {
    SHORTCODE_MARKER
        .captures(html)
        .or_else(|| REEL_LINK.captures(html))
        .map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><head>
        <meta property="og:title" content="Clip by @me &amp; friends" />
        <meta content="https://scontent.cdninstagram.com/v.mp4?a=1&amp;b=2" property="og:video">
        <meta property='og:image' content='https://scontent.cdninstagram.com/t.jpg'>
        <script type="application/ld+json">
            {"@context":"https://schema.org","@graph":[
                {"@type":"Person","name":"me"},
                {"@type":"VideoObject","name":"LD name","contentUrl":"https://v.fbcdn.net/ld.mp4","thumbnailUrl":["https://v.fbcdn.net/ld.jpg"]}
            ]}
        </script>
        </head></html>"#;

    #[test]
    fn test_meta_content_any_attribute_order() {
        let document = Document::from(PAGE);
        assert_eq!(
            meta_content(&document, "og:title").as_deref(),
            Some("Clip by @me & friends")
        );
        assert_eq!(
            meta_content(&document, "og:video").as_deref(),
            Some("https://scontent.cdninstagram.com/v.mp4?a=1&b=2")
        );
        assert_eq!(
            meta_content(&document, "og:image").as_deref(),
            Some("https://scontent.cdninstagram.com/t.jpg")
        );
        assert_eq!(meta_content(&document, "og:video:secure_url"), None);
    }

    #[test]
    fn test_meta_content_with_angle_bracket_in_value() {
        let document = Document::from(r#"<meta property="og:title" content="5 > 3 tips">"#);
        assert_eq!(meta_content(&document, "og:title").as_deref(), Some("5 > 3 tips"));
    }

    #[test]
    fn test_meta_content_by_name() {
        let document = Document::from(r#"<meta name="twitter:title" content="Named">"#);
        assert_eq!(meta_content(&document, "twitter:title").as_deref(), Some("Named"));
    }

    #[test]
    fn test_ld_video_object_in_graph() {
        let video = ld_video_object(&Document::from(PAGE)).unwrap();
        assert_eq!(video["contentUrl"], "https://v.fbcdn.net/ld.mp4");
    }

    #[test]
    fn test_shared_data_media() {
        let html = r#"<script>window._sharedData = {"entry_data":{"ReelPage":[{"graphql":{"shortcode_media":{"video_url":"https://v.fbcdn.net/s.mp4"}}}]}};</script>"#;
        let media = shared_data_media(html).unwrap();
        assert_eq!(media["video_url"], "https://v.fbcdn.net/s.mp4");
        assert!(shared_data_media(PAGE).is_none());
    }

    #[test]
    fn test_embedded_shortcode() {
        let marker = r#"{"media":{"shortcode":"Cq1_z-9AbC","id":"1"}}"#;
        assert_eq!(embedded_shortcode(marker).as_deref(), Some("Cq1_z-9AbC"));

        let link = r#"<a href="/reel/DeF456ghi/">watch</a>"#;
        assert_eq!(embedded_shortcode(link).as_deref(), Some("DeF456ghi"));

        assert_eq!(embedded_shortcode("<html>nothing</html>"), None);
    }
}
