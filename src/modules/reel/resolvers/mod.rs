//! Ordered fallback chain that turns a shortcode into a playable video URL.
//!
//! Each strategy is independent and shares one signature. The chain tries them
//! in order and stops at the first that produces a video URL. A strategy that
//! errors is logged and skipped; only exhausting the chain reaches the client.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::settings::AppConfig;
use crate::error::{AppError, AppResult};
use crate::infrastructure::http::client::{InstagramHttp, UpstreamError};

use super::metadata::ReelMetadata;

pub mod graphql;
pub mod page_html;
pub mod private_api;
pub mod public_json;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Metadata with a non-empty video URL.
    Found(ReelMetadata),
    /// The post exists but is not a video. Ends the chain.
    NotAVideo,
    /// Nothing usable; try the next strategy.
    Miss,
}

impl Resolution {
    /// `Found` only when a video URL is actually present.
    pub fn from_metadata(metadata: ReelMetadata) -> Self {
        if metadata.has_video() {
            Resolution::Found(metadata)
        } else {
            Resolution::Miss
        }
    }
}

#[async_trait]
pub trait VideoResolver: Send + Sync {
    fn name(&self) -> &'static str;

    async fn resolve(&self, shortcode: &str) -> Result<Resolution, UpstreamError>;
}

pub struct ResolverChain {
    resolvers: Vec<Box<dyn VideoResolver>>,
}

impl ResolverChain {
    pub fn new(resolvers: Vec<Box<dyn VideoResolver>>) -> Self {
        Self { resolvers }
    }

    /// GraphQL post lookup, web JSON, private API, then the HTML page.
    pub fn standard(http: InstagramHttp, config: &AppConfig) -> Self {
        Self::new(vec![
            Box::new(graphql::GraphqlResolver::new(http.clone(), config)),
            Box::new(public_json::PublicJsonResolver::new(http.clone(), config)),
            Box::new(private_api::PrivateApiResolver::new(http.clone(), config)),
            Box::new(page_html::PageHtmlResolver::new(http, config)),
        ])
    }

    pub async fn resolve(&self, shortcode: &str) -> AppResult<ReelMetadata> {
        let mut blocked: Option<String> = None;

        for resolver in &self.resolvers {
            match resolver.resolve(shortcode).await {
                Ok(Resolution::Found(metadata)) => {
                    info!("Resolved reel {} via {}", shortcode, resolver.name());
                    return Ok(metadata);
                }
                Ok(Resolution::NotAVideo) => {
                    info!("Reel {} is not a video ({})", shortcode, resolver.name());
                    return Err(AppError::NotAVideo);
                }
                Ok(Resolution::Miss) => {
                    warn!("{}: no video for {}", resolver.name(), shortcode);
                }
                Err(e) => {
                    warn!("{} failed for {}: {}", resolver.name(), shortcode, e);
                    if e.is_blocked() && blocked.is_none() {
                        blocked = Some(format!("{}: {}", resolver.name(), e));
                    }
                }
            }
        }

        Err(match blocked {
            Some(reason) => AppError::UpstreamBlocked(reason),
            None => AppError::NoVideoFound,
        })
    }
}

/// Checks a JSON body for Instagram's login-wall and checkpoint markers.
pub(crate) fn check_blocked(body: &serde_json::Value) -> Result<(), UpstreamError> {
    if body.get("require_login").and_then(|v| v.as_bool()) == Some(true) {
        return Err(UpstreamError::Blocked("login required".to_string()));
    }
    if let Some(message) = body.get("message").and_then(|v| v.as_str()) {
        if message.contains("login_required")
            || message.contains("checkpoint_required")
            || message.contains("Please wait a few minutes")
        {
            return Err(UpstreamError::Blocked(message.to_string()));
        }
    }
    Ok(())
}
