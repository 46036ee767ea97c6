use crate::app::ports::{BackgroundImage, HttpClientPort, ImageSource, ImageUnavailable};
use crate::constants::{
    BACKGROUND_SEARCH_TERMS, IMAGE_RENDER_PARAMS, UNSPLASH_API_BASE, UNSPLASH_PLACEHOLDER_KEY,
    UNSPLASH_QUERY_PARAMS,
};
use crate::observability::metrics;
use crate::selection::RandomSource;
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
struct RandomPhoto {
    urls: PhotoUrls,
    #[serde(default)]
    alt_description: Option<String>,
    #[serde(default)]
    user: Option<PhotoUser>,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    #[serde(default)]
    full: Option<String>,
    #[serde(default)]
    raw: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PhotoUser {
    name: String,
}

/// Treats blank keys and the sample placeholder as "no key".
pub fn normalize_access_key(key: Option<String>) -> Option<String> {
    key.map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty() && k != UNSPLASH_PLACEHOLDER_KEY)
}

/// Random landscape photo lookup against the Unsplash API.
pub struct UnsplashClient {
    http: Arc<dyn HttpClientPort>,
    rng: Arc<dyn RandomSource>,
    access_key: Option<String>,
    base_url: String,
}

impl UnsplashClient {
    pub fn new(
        http: Arc<dyn HttpClientPort>,
        rng: Arc<dyn RandomSource>,
        access_key: Option<String>,
    ) -> Self {
        Self::with_base_url(http, rng, access_key, UNSPLASH_API_BASE)
    }

    pub fn with_base_url(
        http: Arc<dyn HttpClientPort>,
        rng: Arc<dyn RandomSource>,
        access_key: Option<String>,
        base_url: &str,
    ) -> Self {
        Self {
            http,
            rng,
            access_key: normalize_access_key(access_key),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn search_url(&self, term: &str) -> Result<String, String> {
        let mut params: Vec<(&str, &str)> = vec![("query", term)];
        params.extend_from_slice(&UNSPLASH_QUERY_PARAMS);
        reqwest::Url::parse_with_params(&format!("{}/photos/random", self.base_url), &params)
            .map(|u| u.to_string())
            .map_err(|e| format!("invalid image API url: {}", e))
    }

    async fn request_photo(&self, key: &str) -> Result<String, String> {
        let term = BACKGROUND_SEARCH_TERMS[self.rng.index(BACKGROUND_SEARCH_TERMS.len())];
        let url = self.search_url(term)?;
        debug!(term, "Requesting background image");

        let headers = [("Authorization", format!("Client-ID {}", key))];
        let resp = self.http.get(&url, &headers).await?;
        if !resp.is_success() {
            return Err(format!("Unsplash API error: {}", resp.status));
        }

        let photo: RandomPhoto = serde_json::from_slice(&resp.bytes)
            .map_err(|e| format!("malformed Unsplash response: {}", e))?;
        let base = photo
            .urls
            .full
            .or(photo.urls.raw)
            .ok_or_else(|| "Unsplash response has no usable url".to_string())?;

        info!(
            description = photo.alt_description.as_deref().unwrap_or("untitled"),
            author = photo.user.as_ref().map(|u| u.name.as_str()).unwrap_or("unknown"),
            "Fetched background image"
        );
        Ok(with_render_params(&base))
    }
}

/// Appends the fixed size/crop/quality parameters to a photo URL.
pub fn with_render_params(url: &str) -> String {
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{}{}{}", url, sep, IMAGE_RENDER_PARAMS)
}

#[async_trait]
impl ImageSource for UnsplashClient {
    fn is_configured(&self) -> bool {
        self.access_key.is_some()
    }

    async fn fetch_background_image(&self) -> BackgroundImage {
        let Some(key) = self.access_key.as_deref() else {
            return BackgroundImage::Unavailable(ImageUnavailable::NotConfigured);
        };

        match self.request_photo(key).await {
            Ok(url) => {
                metrics::background_image(true);
                BackgroundImage::Url(url)
            }
            Err(message) => {
                warn!(error = %message, "Background image unavailable, using gradient");
                metrics::background_image(false);
                BackgroundImage::Unavailable(ImageUnavailable::Upstream(message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ports::HttpGetResult;
    use crate::selection::FixedIndex;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct CountingHttp {
        calls: AtomicUsize,
        last: Mutex<Option<(String, Vec<(String, String)>)>>,
        reply: std::result::Result<HttpGetResult, String>,
    }

    impl CountingHttp {
        fn replying(reply: std::result::Result<HttpGetResult, String>) -> Arc<Self> {
            Arc::new(Self { calls: AtomicUsize::new(0), last: Mutex::new(None), reply })
        }
    }

    #[async_trait]
    impl HttpClientPort for CountingHttp {
        async fn get(&self, url: &str, headers: &[(&str, String)]) -> std::result::Result<HttpGetResult, String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let headers = headers.iter().map(|(k, v)| (k.to_string(), v.clone())).collect();
            *self.last.lock().unwrap() = Some((url.to_string(), headers));
            self.reply.clone()
        }
    }

    fn json_reply(status: u16, body: serde_json::Value) -> std::result::Result<HttpGetResult, String> {
        Ok(HttpGetResult {
            status,
            bytes: serde_json::to_vec(&body).unwrap(),
            content_type: "application/json".to_string(),
        })
    }

    fn client(http: Arc<CountingHttp>, key: Option<&str>) -> UnsplashClient {
        UnsplashClient::with_base_url(http, Arc::new(FixedIndex(0)), key.map(String::from), "http://img.test")
    }

    #[tokio::test]
    async fn no_key_means_no_request() {
        let http = CountingHttp::replying(Err("should not be called".into()));
        let images = client(http.clone(), None);

        assert!(!images.is_configured());
        assert_eq!(
            images.fetch_background_image().await,
            BackgroundImage::Unavailable(ImageUnavailable::NotConfigured)
        );
        assert_eq!(http.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn placeholder_key_counts_as_unconfigured() {
        let http = CountingHttp::replying(Err("should not be called".into()));
        let images = client(http.clone(), Some(UNSPLASH_PLACEHOLDER_KEY));
        assert!(!images.is_configured());
        assert!(images.fetch_background_image().await.into_url().is_none());
        assert_eq!(http.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn success_returns_sized_url_and_sends_client_id() {
        let http = CountingHttp::replying(json_reply(
            200,
            json!({
                "urls": { "full": "https://images.test/photo-1?ixid=abc", "raw": "https://images.test/raw" },
                "alt_description": "mountain at dawn",
                "user": { "name": "A. Photographer" }
            }),
        ));
        let images = client(http.clone(), Some("secret"));

        let got = images.fetch_background_image().await;
        assert_eq!(
            got,
            BackgroundImage::Url(
                "https://images.test/photo-1?ixid=abc&w=1920&h=1080&fit=crop&crop=center&q=85".to_string()
            )
        );

        let (url, headers) = http.last.lock().unwrap().clone().unwrap();
        assert!(url.starts_with("http://img.test/photos/random?query=sea+sunset+horizon"));
        assert!(url.contains("orientation=landscape"));
        assert!(url.contains("content_filter=high"));
        assert_eq!(headers, vec![("Authorization".to_string(), "Client-ID secret".to_string())]);
    }

    #[tokio::test]
    async fn raw_url_is_used_when_full_is_missing() {
        let http = CountingHttp::replying(json_reply(200, json!({ "urls": { "raw": "https://images.test/raw" } })));
        let got = client(http, Some("secret")).fetch_background_image().await;
        assert_eq!(got.into_url().unwrap(), "https://images.test/raw?w=1920&h=1080&fit=crop&crop=center&q=85");
    }

    #[tokio::test]
    async fn upstream_failures_degrade_to_unavailable() {
        let failures = vec![
            Err("connection refused".to_string()),
            json_reply(401, json!({ "errors": ["OAuth error: The access token is invalid"] })),
            json_reply(200, json!({ "unexpected": true })),
        ];
        for reply in failures {
            let http = CountingHttp::replying(reply);
            let got = client(http.clone(), Some("secret")).fetch_background_image().await;
            assert!(matches!(got, BackgroundImage::Unavailable(ImageUnavailable::Upstream(_))));
            assert_eq!(http.calls.load(Ordering::SeqCst), 1);
        }
    }
}
