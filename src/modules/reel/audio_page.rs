//! Resolves an audio page (`/reels/audio/<id>/`) to one reel that uses it.

use tracing::{info, warn};

use crate::config::settings::AppConfig;
use crate::error::{AppError, AppResult};
use crate::infrastructure::http::client::{InstagramHttp, UpstreamError};

use super::html;
use super::json_search::find_shortcode;

#[derive(Clone, Copy)]
enum Step {
    PublicJson,
    PrivateApi,
    PageHtml,
}

impl Step {
    fn name(self) -> &'static str {
        match self {
            Step::PublicJson => "public-json",
            Step::PrivateApi => "private-api",
            Step::PageHtml => "page-html",
        }
    }
}

pub struct AudioPageResolver {
    http: InstagramHttp,
    base_url: String,
    api_base_url: String,
}

impl AudioPageResolver {
    pub fn new(http: InstagramHttp, config: &AppConfig) -> Self {
        Self {
            http,
            base_url: config.instagram_base_url.clone(),
            api_base_url: config.instagram_api_base_url.clone(),
        }
    }

    async fn from_public_json(&self, audio_id: &str) -> Result<Option<String>, UpstreamError> {
        let url = format!("{}/reels/audio/{}/?__a=1&__d=dis", self.base_url, audio_id);
        let body = self.http.get_json(&url).await?;
        Ok(find_shortcode(&body))
    }

    async fn from_private_api(&self, audio_id: &str) -> Result<Option<String>, UpstreamError> {
        let url = format!(
            "{}/api/v1/clips/music/?audio_cluster_id={}",
            self.api_base_url, audio_id
        );
        let body = self.http.get_json(&url).await?;
        Ok(find_shortcode(&body))
    }

    async fn from_page(&self, audio_id: &str) -> Result<Option<String>, UpstreamError> {
        let url = format!("{}/reels/audio/{}/", self.base_url, audio_id);
        let page = self.http.get_text(&url).await?;
        Ok(html::embedded_shortcode(&page))
    }

    /// Tries the public JSON view, the private clips API, then the raw page.
    /// Later steps only run when earlier ones miss.
    pub async fn find_reel(&self, audio_id: &str) -> AppResult<String> {
        for step in [Step::PublicJson, Step::PrivateApi, Step::PageHtml] {
            let result = match step {
                Step::PublicJson => self.from_public_json(audio_id).await,
                Step::PrivateApi => self.from_private_api(audio_id).await,
                Step::PageHtml => self.from_page(audio_id).await,
            };
            match result {
                Ok(Some(shortcode)) => {
                    info!("Audio {} resolved to reel {} via {}", audio_id, shortcode, step.name());
                    return Ok(shortcode);
                }
                Ok(None) => warn!("{}: no reel for audio {}", step.name(), audio_id),
                Err(e) => warn!("{} failed for audio {}: {}", step.name(), audio_id, e),
            }
        }

        Err(AppError::NoReelForAudio)
    }
}
