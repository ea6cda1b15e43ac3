use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::redirect::{Attempt, Policy};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::common::media_url::{is_allowed_url, is_instagram_host};
use crate::config::settings::AppConfig;

/// Per-request timeout for Instagram JSON/HTML calls.
const API_TIMEOUT: Duration = Duration::from_secs(20);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(20);
/// Applies per read on media streams, so long downloads are not cut off.
const MEDIA_READ_TIMEOUT: Duration = Duration::from_secs(30);

const INSTAGRAM_REFERER: &str = "https://www.instagram.com/";

const MAX_REDIRECTS: usize = 10;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("invalid upstream url: {0}")]
    InvalidUrl(String),

    #[error("upstream returned HTTP {0}")]
    Status(StatusCode),

    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream returned an unreadable body: {0}")]
    Decode(String),

    #[error("upstream refused the request: {0}")]
    Blocked(String),
}

impl UpstreamError {
    /// Whether Instagram actively refused us, as opposed to the content simply
    /// not being there.
    pub fn is_blocked(&self) -> bool {
        match self {
            UpstreamError::Blocked(_) => true,
            UpstreamError::Status(status) => matches!(
                *status,
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
            ),
            _ => false,
        }
    }
}

/// Follows a redirect only onto an allow-listed http(s) host. Anything else
/// stops the chain and the 3xx response surfaces as a `Status` error.
fn redirect_policy(allowed_hosts: Vec<String>) -> Policy {
    Policy::custom(move |attempt: Attempt| {
        if attempt.previous().len() >= MAX_REDIRECTS {
            attempt.error("too many redirects")
        } else if is_allowed_url(attempt.url(), &allowed_hosts) {
            attempt.follow()
        } else {
            warn!("Refusing redirect to {}", attempt.url());
            attempt.stop()
        }
    })
}

/// Outbound HTTP client carrying the browser-like headers Instagram expects.
/// The session cookie is only attached for instagram.com hosts.
#[derive(Clone)]
pub struct InstagramHttp {
    client: reqwest::Client,
    app_id: String,
    session_id: Option<String>,
}

impl InstagramHttp {
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(header::REFERER, HeaderValue::from_static(INSTAGRAM_REFERER));

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .connect_timeout(CONNECT_TIMEOUT)
            .read_timeout(MEDIA_READ_TIMEOUT)
            .redirect(redirect_policy(config.allowed_media_hosts.clone()))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            client,
            app_id: config.app_id.clone(),
            session_id: config.session_id.clone(),
        })
    }

    fn request(&self, method: Method, raw: &str) -> Result<RequestBuilder, UpstreamError> {
        let url = Url::parse(raw).map_err(|_| UpstreamError::InvalidUrl(raw.to_string()))?;
        let attach_cookie = is_instagram_host(&url);

        let mut builder = self.client.request(method, url);
        if let (true, Some(session)) = (attach_cookie, self.session_id.as_deref()) {
            builder = builder.header(header::COOKIE, format!("sessionid={}", session));
        }
        Ok(builder)
    }

    fn api_request(&self, method: Method, raw: &str) -> Result<RequestBuilder, UpstreamError> {
        Ok(self
            .request(method, raw)?
            .header("X-IG-App-ID", &self.app_id)
            .header("X-Requested-With", "XMLHttpRequest")
            .timeout(API_TIMEOUT))
    }

    async fn send(builder: RequestBuilder) -> Result<Response, UpstreamError> {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status));
        }
        Ok(response)
    }

    /// GET an Instagram JSON endpoint.
    pub async fn get_json(&self, url: &str) -> Result<Value, UpstreamError> {
        debug!("GET json {}", url);
        let response = Self::send(self.api_request(Method::GET, url)?).await?;
        Self::decode_json(response).await
    }

    /// POST a form to an Instagram JSON endpoint.
    pub async fn post_form_json(
        &self,
        url: &str,
        form: &[(&str, &str)],
    ) -> Result<Value, UpstreamError> {
        debug!("POST form {}", url);
        let builder = self
            .api_request(Method::POST, url)?
            .header("Origin", "https://www.instagram.com")
            .form(form);
        let response = Self::send(builder).await?;
        Self::decode_json(response).await
    }

    /// GET an HTML page.
    pub async fn get_text(&self, url: &str) -> Result<String, UpstreamError> {
        debug!("GET page {}", url);
        let builder = self.request(Method::GET, url)?.timeout(API_TIMEOUT);
        let response = Self::send(builder).await?;
        Ok(response.text().await?)
    }

    /// GET a media file for streaming, optionally forwarding a `Range`
    /// header. The caller consumes the body.
    pub async fn get_media(&self, url: &str, range: Option<&str>) -> Result<Response, UpstreamError> {
        debug!("GET media {} (range: {:?})", url, range);
        let mut builder = self.request(Method::GET, url)?;
        if let Some(range) = range {
            builder = builder.header(header::RANGE, range);
        }
        Self::send(builder).await
    }

    async fn decode_json(response: Response) -> Result<Value, UpstreamError> {
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            // Instagram answers with the login page when it wants a session.
            if text.trim_start().starts_with('<') {
                UpstreamError::Blocked("received HTML instead of JSON (login wall)".to_string())
            } else {
                UpstreamError::Decode(e.to_string())
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocked_statuses() {
        assert!(UpstreamError::Status(StatusCode::TOO_MANY_REQUESTS).is_blocked());
        assert!(UpstreamError::Status(StatusCode::FORBIDDEN).is_blocked());
        assert!(UpstreamError::Blocked("login".into()).is_blocked());
        assert!(!UpstreamError::Status(StatusCode::NOT_FOUND).is_blocked());
        assert!(!UpstreamError::Decode("eof".into()).is_blocked());
    }

    #[test]
    fn test_request_rejects_bad_url() {
        let http = InstagramHttp::new(&AppConfig::default()).unwrap();
        assert!(matches!(
            http.request(Method::GET, "::nope"),
            Err(UpstreamError::InvalidUrl(_))
        ));
    }
}
