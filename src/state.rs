use std::sync::Arc;

use crate::config::settings::AppConfig;
use crate::infrastructure::http::client::InstagramHttp;
use crate::modules::reel::audio_page::AudioPageResolver;
use crate::modules::reel::resolvers::ResolverChain;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub http: InstagramHttp,
    pub resolvers: Arc<ResolverChain>,
    pub audio_pages: Arc<AudioPageResolver>,
}

impl AppState {
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let http = InstagramHttp::new(&config)?;
        let resolvers = ResolverChain::standard(http.clone(), &config);
        let audio_pages = AudioPageResolver::new(http.clone(), &config);

        Ok(Self {
            config: Arc::new(config),
            http,
            resolvers: Arc::new(resolvers),
            audio_pages: Arc::new(audio_pages),
        })
    }
}
