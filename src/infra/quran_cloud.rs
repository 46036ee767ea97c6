use crate::app::ports::{HttpClientPort, HttpGetResult, VerseSource};
use crate::catalog::VerseReference;
use crate::constants::{ARABIC_EDITION, QURAN_API_BASE, TRANSLATION_EDITION};
use crate::error::{AyahError, Result};
use crate::observability::metrics;
use crate::types::{AyahNumbers, SurahInfo, VerseRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    #[serde(default)]
    data: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AyahPayload {
    pub number: u32,
    pub text: String,
    pub surah: SurahPayload,
    pub number_in_surah: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurahPayload {
    pub number: u16,
    pub name: String,
    pub english_name: String,
    pub english_name_translation: String,
}

/// Client for the alquran.cloud `ayah/{surah}:{ayah}/{edition}` endpoint.
pub struct QuranCloudClient {
    http: Arc<dyn HttpClientPort>,
    base_url: String,
    arabic_edition: String,
    translation_edition: String,
}

impl QuranCloudClient {
    pub fn new(http: Arc<dyn HttpClientPort>) -> Self {
        Self::with_base_url(http, QURAN_API_BASE)
    }

    pub fn with_base_url(http: Arc<dyn HttpClientPort>, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            arabic_edition: ARABIC_EDITION.to_string(),
            translation_edition: TRANSLATION_EDITION.to_string(),
        }
    }

    fn ayah_url(&self, reference: VerseReference, edition: &str) -> String {
        format!("{}/ayah/{}/{}", self.base_url, reference, edition)
    }

    async fn fetch_edition(&self, reference: VerseReference, edition: &str) -> Result<AyahPayload> {
        let url = self.ayah_url(reference, edition);
        debug!(%url, "Requesting ayah");
        let resp = self.http.get(&url, &[]).await.map_err(|message| {
            metrics::verse_request(false);
            AyahError::UpstreamUnavailable {
                reference: reference.to_string(),
                message,
            }
        })?;
        let parsed = parse_ayah_response(reference, edition, &resp);
        metrics::verse_request(parsed.is_ok());
        parsed
    }
}

/// Decodes one provider response. A body without a usable `data` object means
/// the provider has nothing for this reference; anything undecodable means the
/// provider itself misbehaved.
pub fn parse_ayah_response(
    reference: VerseReference,
    edition: &str,
    resp: &HttpGetResult,
) -> Result<AyahPayload> {
    let envelope: ApiEnvelope = serde_json::from_slice(&resp.bytes).map_err(|e| {
        warn!(%reference, edition, status = resp.status, "Undecodable verse response");
        AyahError::UpstreamUnavailable {
            reference: reference.to_string(),
            message: format!("status {}: {}", resp.status, e),
        }
    })?;

    if !envelope.data.is_object() {
        warn!(%reference, edition, status = resp.status, "Verse response carried no data");
        return Err(AyahError::UpstreamDataMissing {
            reference: reference.to_string(),
            edition: edition.to_string(),
        });
    }

    serde_json::from_value(envelope.data).map_err(|e| AyahError::UpstreamUnavailable {
        reference: reference.to_string(),
        message: format!("malformed ayah payload: {}", e),
    })
}

/// Combines the two edition payloads into a display record. Chapter metadata
/// and numbering come from the Arabic edition.
pub fn assemble_record(
    arabic: AyahPayload,
    translation: AyahPayload,
    fetched_at: DateTime<Utc>,
) -> VerseRecord {
    let reference = VerseRecord::reference_label(
        &arabic.surah.english_name,
        arabic.surah.number,
        arabic.number_in_surah,
    );
    VerseRecord {
        arabic: arabic.text,
        translation: translation.text,
        surah: SurahInfo {
            number: arabic.surah.number,
            name: arabic.surah.name,
            english_name: arabic.surah.english_name,
            english_name_translation: arabic.surah.english_name_translation,
        },
        ayah: AyahNumbers {
            number: arabic.number_in_surah,
            number_in_quran: arabic.number,
        },
        reference,
        category: None,
        background_image: None,
        fetched_at,
    }
}

#[async_trait]
impl VerseSource for QuranCloudClient {
    #[instrument(skip(self), fields(reference = %reference))]
    async fn fetch_verse(&self, reference: VerseReference) -> Result<VerseRecord> {
        let (arabic, translation) = tokio::join!(
            self.fetch_edition(reference, &self.arabic_edition),
            self.fetch_edition(reference, &self.translation_edition),
        );
        Ok(assemble_record(arabic?, translation?, Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    fn response(status: u16, body: serde_json::Value) -> HttpGetResult {
        HttpGetResult {
            status,
            bytes: serde_json::to_vec(&body).unwrap(),
            content_type: "application/json".to_string(),
        }
    }

    fn ayah_body(text: &str, edition: &str) -> serde_json::Value {
        json!({
            "code": 200,
            "status": "OK",
            "data": {
                "number": 1735,
                "text": text,
                "edition": { "identifier": edition },
                "surah": {
                    "number": 13,
                    "name": "سُورَةُ الرَّعۡدِ",
                    "englishName": "Ar-Ra'd",
                    "englishNameTranslation": "The Thunder",
                    "numberOfAyahs": 43,
                    "revelationType": "Medinan"
                },
                "numberInSurah": 28,
                "juz": 13
            }
        })
    }

    struct StubHttp {
        urls: Mutex<Vec<String>>,
        fail_translation: bool,
    }

    #[async_trait]
    impl HttpClientPort for StubHttp {
        async fn get(&self, url: &str, _headers: &[(&str, String)]) -> std::result::Result<HttpGetResult, String> {
            self.urls.lock().unwrap().push(url.to_string());
            if url.ends_with(TRANSLATION_EDITION) {
                if self.fail_translation {
                    return Ok(response(404, json!({ "code": 404, "status": "Not Found", "data": "Not found" })));
                }
                return Ok(response(200, ayah_body("Those who have believed...", TRANSLATION_EDITION)));
            }
            Ok(response(200, ayah_body("الَّذِينَ آمَنُوا", ARABIC_EDITION)))
        }
    }

    #[tokio::test]
    async fn fetch_verse_merges_both_editions() {
        let http = Arc::new(StubHttp { urls: Mutex::new(vec![]), fail_translation: false });
        let client = QuranCloudClient::with_base_url(http.clone(), "http://quran.test/v1/");

        let record = client.fetch_verse(VerseReference::new(13, 28)).await.unwrap();

        assert_eq!(record.arabic, "الَّذِينَ آمَنُوا");
        assert_eq!(record.translation, "Those who have believed...");
        assert_eq!(record.reference, "Ar-Ra'd 13:28");
        assert_eq!(record.surah.english_name_translation, "The Thunder");
        assert_eq!(record.ayah, AyahNumbers { number: 28, number_in_quran: 1735 });
        assert!(record.category.is_none());

        let mut urls = http.urls.lock().unwrap().clone();
        urls.sort();
        assert_eq!(
            urls,
            vec![
                "http://quran.test/v1/ayah/13:28/ar.alafasy".to_string(),
                "http://quran.test/v1/ayah/13:28/en.sahih".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn missing_translation_fails_whole_fetch() {
        let http = Arc::new(StubHttp { urls: Mutex::new(vec![]), fail_translation: true });
        let client = QuranCloudClient::new(http);

        let err = client.fetch_verse(VerseReference::new(13, 28)).await.unwrap_err();
        assert!(matches!(err, AyahError::UpstreamDataMissing { ref edition, .. } if edition == TRANSLATION_EDITION));
    }

    #[test]
    fn html_error_page_is_upstream_unavailable() {
        let resp = HttpGetResult {
            status: 502,
            bytes: b"<html>Bad Gateway</html>".to_vec(),
            content_type: "text/html".to_string(),
        };
        let err = parse_ayah_response(VerseReference::new(1, 1), ARABIC_EDITION, &resp).unwrap_err();
        assert!(matches!(err, AyahError::UpstreamUnavailable { .. }));
    }

    #[test]
    fn null_data_is_data_missing() {
        let resp = response(200, json!({ "code": 200, "status": "OK", "data": null }));
        let err = parse_ayah_response(VerseReference::new(1, 1), ARABIC_EDITION, &resp).unwrap_err();
        assert!(matches!(err, AyahError::UpstreamDataMissing { .. }));
    }
}
