use std::sync::LazyLock;

use regex::Regex;
use url::Url;

const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

static REEL_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/reels?/([A-Za-z0-9_-]+)").expect("reel path regex"));

static AUDIO_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/audio/(\d+)").expect("audio path regex"));

/// Shortcode read from `/reel/<code>/`, `/reels/<code>/` or
/// `/<user>/reel/<code>/`. `/reels/audio/...` never yields a shortcode.
pub fn extract_shortcode(url: &Url) -> Option<String> {
    REEL_PATH
        .captures_iter(url.path())
        .map(|caps| caps[1].to_string())
        .find(|code| code != "audio")
}

/// Numeric audio id from `/audio/<id>/` or `/reels/audio/<id>/`.
pub fn extract_audio_id(url: &Url) -> Option<String> {
    AUDIO_PATH.captures(url.path()).map(|caps| caps[1].to_string())
}

/// Whether `value` looks like a shortcode: at least 5 chars of `[A-Za-z0-9_-]`.
pub fn is_shortcode_like(value: &str) -> bool {
    value.len() >= 5 && value.bytes().all(|b| ALPHABET.contains(&b))
}

/// Decodes a shortcode into Instagram's numeric media id by reading it as a
/// base-64 number over `A-Za-z0-9-_`. Returns `None` if any character falls
/// outside the alphabet. Distinct codes of equal length up to 21 characters
/// map to distinct ids; longer inputs wrap.
pub fn shortcode_to_media_id(shortcode: &str) -> Option<u128> {
    shortcode.bytes().try_fold(0u128, |id, b| {
        let digit = ALPHABET.iter().position(|&c| c == b)? as u128;
        Some(id.wrapping_mul(64).wrapping_add(digit))
    })
}
