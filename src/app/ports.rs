use crate::catalog::VerseReference;
use crate::error::Result;
use crate::types::VerseRecord;
use async_trait::async_trait;

// Outbound HTTP
#[async_trait]
pub trait HttpClientPort: Send + Sync {
    async fn get(&self, url: &str, headers: &[(&str, String)]) -> std::result::Result<HttpGetResult, String>;
}

#[derive(Clone, Debug)]
pub struct HttpGetResult {
    pub status: u16,
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl HttpGetResult {
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

/// Looks up the Arabic text and translation for one verse.
#[async_trait]
pub trait VerseSource: Send + Sync {
    async fn fetch_verse(&self, reference: VerseReference) -> Result<VerseRecord>;
}

/// Why no background image came back. Never surfaced to HTTP callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageUnavailable {
    NotConfigured,
    Upstream(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackgroundImage {
    Url(String),
    Unavailable(ImageUnavailable),
}

impl BackgroundImage {
    pub fn into_url(self) -> Option<String> {
        match self {
            BackgroundImage::Url(url) => Some(url),
            BackgroundImage::Unavailable(_) => None,
        }
    }
}

/// Optional background photo lookup; unavailability is an outcome, not an error.
#[async_trait]
pub trait ImageSource: Send + Sync {
    fn is_configured(&self) -> bool;
    async fn fetch_background_image(&self) -> BackgroundImage;
}
