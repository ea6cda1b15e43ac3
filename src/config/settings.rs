use std::path::PathBuf;

use crate::config::env::{self, EnvKey};
use crate::infrastructure::transcoder::ffmpeg;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36";

/// Instagram web app id, public and embedded in the instagram.com bundle.
pub const DEFAULT_APP_ID: &str = "936619743392459";

/// Persisted query id for the GraphQL post lookup. Instagram rotates these.
pub const DEFAULT_GRAPHQL_DOC_ID: &str = "8845758582119845";

pub const DEFAULT_ALLOWED_MEDIA_HOSTS: [&str; 4] =
    ["cdninstagram.com", "fbcdn.net", "instagram.com", "igcdn.com"];

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server_port: u16,
    pub user_agent: String,
    pub session_id: Option<String>,
    pub app_id: String,
    pub graphql_doc_id: String,
    pub ffmpeg_path: PathBuf,
    pub debug_errors: bool,
    pub instagram_base_url: String,
    pub instagram_api_base_url: String,
    pub public_dir: PathBuf,
    pub temp_root: PathBuf,
    pub allowed_media_hosts: Vec<String>,
}

impl AppConfig {
    pub fn new() -> Self {
        let defaults = Self::default();

        Self {
            server_port: env::get_parsed(EnvKey::ServerPort, defaults.server_port),
            user_agent: env::get_or(EnvKey::UserAgent, DEFAULT_USER_AGENT),
            session_id: env::get_opt(EnvKey::SessionId),
            app_id: env::get_or(EnvKey::AppId, DEFAULT_APP_ID),
            graphql_doc_id: env::get_or(EnvKey::GraphqlDocId, DEFAULT_GRAPHQL_DOC_ID),
            ffmpeg_path: ffmpeg::resolve_binary(env::get_opt(EnvKey::FfmpegPath)),
            debug_errors: env::get_flag(EnvKey::DebugErrors),
            instagram_base_url: env::get_opt(EnvKey::InstagramBaseUrl)
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.instagram_base_url),
            instagram_api_base_url: env::get_opt(EnvKey::InstagramApiBaseUrl)
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.instagram_api_base_url),
            public_dir: env::get_opt(EnvKey::PublicDir)
                .map(PathBuf::from)
                .unwrap_or(defaults.public_dir),
            temp_root: env::get_opt(EnvKey::TempDir)
                .map(PathBuf::from)
                .unwrap_or(defaults.temp_root),
            allowed_media_hosts: defaults.allowed_media_hosts,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_port: 3000,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            session_id: None,
            app_id: DEFAULT_APP_ID.to_string(),
            graphql_doc_id: DEFAULT_GRAPHQL_DOC_ID.to_string(),
            ffmpeg_path: PathBuf::from("ffmpeg"),
            debug_errors: false,
            instagram_base_url: "https://www.instagram.com".to_string(),
            instagram_api_base_url: "https://i.instagram.com".to_string(),
            public_dir: PathBuf::from("public"),
            temp_root: std::env::temp_dir(),
            allowed_media_hosts: DEFAULT_ALLOWED_MEDIA_HOSTS
                .iter()
                .map(|h| h.to_string())
                .collect(),
        }
    }
}
