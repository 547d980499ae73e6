use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stored association between a long URL and its short code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ShortLink {
    pub original_url: String,
    pub short_code: String,
}

impl ShortLink {
    pub fn new(original_url: impl Into<String>, short_code: impl Into<String>) -> Self {
        Self {
            original_url: original_url.into(),
            short_code: short_code.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ShortenRequest {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ShortenResponse {
    #[serde(rename = "originalURL", skip_serializing_if = "String::is_empty", default)]
    pub original_url: String,
    #[serde(rename = "shortURL")]
    pub short_url: String,
}
