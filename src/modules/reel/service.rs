use tracing::info;

use super::dto::ReelResponse;
use super::metadata::ReelMetadata;
use super::shortcode::{extract_audio_id, extract_shortcode};
use crate::common::media_url::{MediaUrl, classify};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

pub struct ReelService;

impl ReelService {
    /// Classifies `raw`, resolves it to a playable video and builds the
    /// preview/download links.
    pub async fn lookup(state: &AppState, raw: &str) -> AppResult<ReelResponse> {
        let media = classify(raw, &state.config.allowed_media_hosts).ok_or(AppError::InvalidUrl)?;
        let metadata = Self::resolve(state, media).await?;
        Ok(ReelResponse::from(metadata))
    }

    async fn resolve(state: &AppState, media: MediaUrl) -> AppResult<ReelMetadata> {
        match media {
            MediaUrl::DirectMp4(url) => Ok(ReelMetadata::from_direct_url(&url)),
            MediaUrl::Reel(url) => {
                let shortcode = extract_shortcode(&url).ok_or(AppError::MissingShortcode)?;
                state.resolvers.resolve(&shortcode).await
            }
            MediaUrl::AudioPage(url) => {
                let audio_id = extract_audio_id(&url).ok_or(AppError::InvalidUrl)?;
                let shortcode = state.audio_pages.find_reel(&audio_id).await?;
                info!("Audio page {} -> reel {}", audio_id, shortcode);
                state.resolvers.resolve(&shortcode).await
            }
        }
    }
}
