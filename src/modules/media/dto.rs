use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
pub struct PreviewQuery {
    /// Video URL on an allow-listed CDN host.
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct AudioQuery {
    /// Video URL on an allow-listed CDN host.
    pub url: Option<String>,
    /// Download name without extension; sanitized before use.
    pub name: Option<String>,
}
