//! Classification of user-supplied URLs and the outbound host allow-list.

use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaUrl {
    /// `instagram.com/.../reel/<code>/`
    Reel(Url),
    /// `instagram.com/reels/audio/<id>/` or `instagram.com/audio/<id>/`
    AudioPage(Url),
    /// An `.mp4` on an allow-listed CDN host.
    DirectMp4(Url),
}

/// Returns `None` for anything that is not a reel page, audio page or
/// allow-listed direct MP4.
pub fn classify(raw: &str, allowed_hosts: &[String]) -> Option<MediaUrl> {
    let url = Url::parse(raw.trim()).ok()?;

    if is_direct_mp4(&url, allowed_hosts) {
        return Some(MediaUrl::DirectMp4(url));
    }

    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
    if !host.contains("instagram.com") {
        return None;
    }

    let path = url.path();
    if path.contains("/reel/") {
        Some(MediaUrl::Reel(url))
    } else if path.contains("/audio/") {
        Some(MediaUrl::AudioPage(url))
    } else {
        None
    }
}

fn is_direct_mp4(url: &Url, allowed_hosts: &[String]) -> bool {
    url.path().to_ascii_lowercase().ends_with(".mp4") && is_allowed_url(url, allowed_hosts)
}

/// True when `raw` is an http(s) URL whose host is one of `allowed_hosts`
/// or a subdomain of one.
pub fn is_allowed_media_host(raw: &str, allowed_hosts: &[String]) -> bool {
    match Url::parse(raw.trim()) {
        Ok(url) => is_allowed_url(&url, allowed_hosts),
        Err(_) => false,
    }
}

/// Parsed form of [`is_allowed_media_host`]. Also applied to every redirect hop.
pub fn is_allowed_url(url: &Url, allowed_hosts: &[String]) -> bool {
    matches!(url.scheme(), "http" | "https") && host_matches(url, allowed_hosts)
}

fn host_matches(url: &Url, allowed_hosts: &[String]) -> bool {
    let Some(host) = url.host_str() else {
        return false;
    };
    let host = host.to_ascii_lowercase();
    allowed_hosts.iter().any(|domain| {
        let domain = domain.to_ascii_lowercase();
        host == domain || host.ends_with(&format!(".{}", domain))
    })
}

/// Hosts that receive the Instagram session cookie.
pub fn is_instagram_host(url: &Url) -> bool {
    match url.host_str() {
        Some(host) => {
            let host = host.to_ascii_lowercase();
            host == "instagram.com" || host.ends_with(".instagram.com")
        }
        None => false,
    }
}
