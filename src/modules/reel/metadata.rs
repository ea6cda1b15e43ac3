//! Field extraction shared by every Instagram media JSON shape
//! (GraphQL `shortcode_media`, web `items[0]`, private API `items[0]`).

use serde_json::Value;
use url::Url;

pub const DEFAULT_TITLE: &str = "Instagram Reel";
pub const DEFAULT_AUDIO_NAME: &str = "Original audio";

/// Music attribution containers, most specific first.
const MUSIC_INFO_PATHS: &[&str] = &[
    "/clips_music_attribution_info",
    "/music_attribution_info",
    "/music_info",
    "/audio",
    "/clips_metadata/music_info/music_asset_info",
    "/music_metadata/music_info/music_asset_info",
    "/clips_metadata/original_sound_info",
];

const SONG_TITLE_KEYS: &[&str] = &["/song_title", "/title", "/original_audio_title"];
const ARTIST_KEYS: &[&str] = &["/artist_name", "/display_artist", "/ig_artist/username"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReelMetadata {
    pub title: String,
    pub audio_name: String,
    pub thumbnail_url: String,
    pub video_url: String,
}

/// Which entry of `video_versions` to prefer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoPick {
    First,
    Last,
}

fn non_empty_str<'a>(value: &'a Value, pointer: &str) -> Option<&'a str> {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn first_of<'a>(value: &'a Value, pointers: &[&str]) -> Option<&'a str> {
    pointers.iter().find_map(|p| non_empty_str(value, p))
}

pub fn caption(media: &Value) -> Option<String> {
    first_of(media, &["/edge_media_to_caption/edges/0/node/text", "/caption/text"])
        .map(String::from)
}

pub fn owner_username(media: &Value) -> Option<String> {
    first_of(media, &["/owner/username", "/user/username"]).map(String::from)
}

pub fn thumbnail_url(media: &Value) -> Option<String> {
    if let Some(url) = first_of(media, &["/display_url", "/thumbnail_src"]) {
        return Some(url.to_string());
    }
    let last_resource = media
        .get("display_resources")
        .and_then(Value::as_array)
        .and_then(|items| items.last())
        .and_then(|item| non_empty_str(item, "/src"));
    last_resource
        .or_else(|| non_empty_str(media, "/image_versions2/candidates/0/url"))
        .map(String::from)
}

pub fn video_url(media: &Value, pick: VideoPick) -> Option<String> {
    let versions = media.get("video_versions").and_then(Value::as_array);
    let version_url = |index: Option<usize>| {
        index
            .and_then(|i| versions.and_then(|v| v.get(i)))
            .and_then(|item| non_empty_str(item, "/url"))
    };
    let first = version_url(Some(0));
    let last = version_url(versions.map(|v| v.len().saturating_sub(1)));
    let direct = non_empty_str(media, "/video_url");

    let found = match pick {
        VideoPick::First => direct.or(first).or(last),
        VideoPick::Last => last.or(first).or(direct),
    };
    found.map(String::from)
}

/// "Song - Artist", "Song", or `None` when no container carries a title.
pub fn audio_name(media: &Value) -> Option<String> {
    MUSIC_INFO_PATHS.iter().find_map(|path| {
        let info = media.pointer(path).filter(|v| v.is_object())?;
        let song = first_of(info, SONG_TITLE_KEYS)?;
        Some(match first_of(info, ARTIST_KEYS) {
            Some(artist) => format!("{} - {}", song, artist),
            None => song.to_string(),
        })
    })
}

pub fn title(caption: Option<String>, owner: Option<String>) -> String {
    caption
        .or_else(|| owner.map(|o| format!("Reel by @{}", o)))
        .unwrap_or_else(|| DEFAULT_TITLE.to_string())
}

impl ReelMetadata {
    /// Builds metadata from a media object. `video_url` is empty when the
    /// object carries no playable video.
    pub fn from_media(media: &Value, pick: VideoPick) -> Self {
        Self {
            title: title(caption(media), owner_username(media)),
            audio_name: audio_name(media).unwrap_or_else(|| DEFAULT_AUDIO_NAME.to_string()),
            thumbnail_url: thumbnail_url(media).unwrap_or_default(),
            video_url: video_url(media, pick).unwrap_or_default(),
        }
    }

    /// Metadata for a direct MP4 link: the file stem stands in for both names.
    pub fn from_direct_url(url: &Url) -> Self {
        let stem = url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .map(|name| {
                let lower = name.to_ascii_lowercase();
                match lower.strip_suffix(".mp4") {
                    Some(_) => name[..name.len() - 4].to_string(),
                    None => name.to_string(),
                }
            })
            .filter(|stem| !stem.is_empty());

        Self {
            title: stem.clone().unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            audio_name: stem.unwrap_or_else(|| DEFAULT_AUDIO_NAME.to_string()),
            thumbnail_url: String::new(),
            video_url: url.to_string(),
        }
    }

    pub fn has_video(&self) -> bool {
        !self.video_url.is_empty()
    }
}
