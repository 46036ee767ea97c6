#![allow(dead_code)]

use async_trait::async_trait;
use ayah_widget::app::ports::{BackgroundImage, ImageSource, ImageUnavailable, VerseSource};
use ayah_widget::app::AyahService;
use ayah_widget::cache::VerseCache;
use ayah_widget::catalog::{Catalog, VerseReference};
use ayah_widget::error::{AyahError, Result};
use ayah_widget::selection::{RandomSource, SelectionEngine};
use ayah_widget::types::{AyahNumbers, SurahInfo, VerseRecord};
use chrono::Utc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Verse source that answers from the reference alone and records each call.
#[derive(Default)]
pub struct FakeVerses {
    pub fail: AtomicBool,
    pub calls: AtomicUsize,
    pub requested: Mutex<Vec<VerseReference>>,
}

impl FakeVerses {
    pub fn failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VerseSource for FakeVerses {
    async fn fetch_verse(&self, reference: VerseReference) -> Result<VerseRecord> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(reference);
        if self.fail.load(Ordering::SeqCst) {
            return Err(AyahError::UpstreamUnavailable {
                reference: reference.to_string(),
                message: "simulated outage".into(),
            });
        }
        Ok(VerseRecord {
            arabic: format!("نص {}", reference),
            translation: format!("Translation of {}", reference),
            surah: SurahInfo {
                number: reference.surah,
                name: "سورة".into(),
                english_name: "Surah".into(),
                english_name_translation: "Chapter".into(),
            },
            ayah: AyahNumbers {
                number: reference.ayah,
                number_in_quran: u32::from(reference.surah) * 1000 + u32::from(reference.ayah),
            },
            reference: VerseRecord::reference_label("Surah", reference.surah, reference.ayah),
            category: None,
            background_image: None,
            fetched_at: Utc::now(),
        })
    }
}

pub struct FakeImages(pub Option<String>);

#[async_trait]
impl ImageSource for FakeImages {
    fn is_configured(&self) -> bool {
        self.0.is_some()
    }

    async fn fetch_background_image(&self) -> BackgroundImage {
        match &self.0 {
            Some(url) => BackgroundImage::Url(url.clone()),
            None => BackgroundImage::Unavailable(ImageUnavailable::NotConfigured),
        }
    }
}

pub struct FirstIndex;

impl RandomSource for FirstIndex {
    fn index(&self, _len: usize) -> usize {
        0
    }
}

pub fn service_with(verses: Arc<FakeVerses>, image: Option<&str>) -> Arc<AyahService> {
    let selection = SelectionEngine::new(Arc::new(Catalog::builtin()), Arc::new(FirstIndex));
    Arc::new(AyahService::new(
        selection,
        verses,
        Arc::new(FakeImages(image.map(String::from))),
        Arc::new(VerseCache::new()),
    ))
}
