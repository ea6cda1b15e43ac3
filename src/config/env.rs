use std::env;
use std::str::FromStr;

pub enum EnvKey {
    ServerPort,
    UserAgent,
    SessionId,
    AppId,
    GraphqlDocId,
    FfmpegPath,
    DebugErrors,
    InstagramBaseUrl,
    InstagramApiBaseUrl,
    PublicDir,
    TempDir,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::ServerPort => "PORT",
            EnvKey::UserAgent => "USER_AGENT",
            EnvKey::SessionId => "IG_SESSIONID",
            EnvKey::AppId => "IG_APP_ID",
            EnvKey::GraphqlDocId => "INSTAGRAM_DOC_ID",
            EnvKey::FfmpegPath => "FFMPEG_PATH",
            EnvKey::DebugErrors => "DEBUG_ERRORS",
            EnvKey::InstagramBaseUrl => "IG_BASE_URL",
            EnvKey::InstagramApiBaseUrl => "IG_API_BASE_URL",
            EnvKey::PublicDir => "PUBLIC_DIR",
            EnvKey::TempDir => "TEMP_DIR",
        }
    }
}

pub fn get(key: EnvKey) -> Result<String, env::VarError> {
    env::var(key.as_str())
}

pub fn get_or(key: EnvKey, default: &str) -> String {
    env::var(key.as_str()).unwrap_or_else(|_| default.to_string())
}

/// Returns the trimmed value, treating blank values as unset.
pub fn get_opt(key: EnvKey) -> Option<String> {
    env::var(key.as_str())
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn get_parsed<T: FromStr>(key: EnvKey, default: T) -> T {
    match get(key) {
        Ok(val) => val.parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}

pub fn get_flag(key: EnvKey) -> bool {
    match get(key) {
        Ok(val) => matches!(val.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"),
        Err(_) => false,
    }
}
