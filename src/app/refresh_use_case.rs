use crate::app::ports::{ImageSource, VerseSource};
use crate::cache::{CommitOutcome, VerseCache};
use crate::catalog::{Catalog, CategorySummary};
use crate::error::Result;
use crate::observability::metrics;
use crate::selection::{CategoryFallback, Selection, SelectionEngine};
use crate::types::{CachedVerse, VerseRecord};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, instrument};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryListing {
    pub categories: Vec<CategorySummary>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub current_ayah: String,
    pub last_update: String,
    pub unsplash_configured: bool,
}

/// Selection -> verse fetch -> optional image -> slot commit.
///
/// Owns the current-verse slot; every consumer (routes, scheduled jobs, CLI)
/// goes through this type.
pub struct AyahService {
    selection: SelectionEngine,
    verses: Arc<dyn VerseSource>,
    images: Arc<dyn ImageSource>,
    cache: Arc<VerseCache>,
}

impl AyahService {
    pub fn new(
        selection: SelectionEngine,
        verses: Arc<dyn VerseSource>,
        images: Arc<dyn ImageSource>,
        cache: Arc<VerseCache>,
    ) -> Self {
        Self {
            selection,
            verses,
            images,
            cache,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        self.selection.catalog()
    }

    pub fn categories(&self) -> CategoryListing {
        let categories = self.catalog().summaries();
        let total = categories.len();
        CategoryListing { categories, total }
    }

    pub fn image_configured(&self) -> bool {
        self.images.is_configured()
    }

    pub async fn current(&self) -> Option<Arc<CachedVerse>> {
        self.cache.current().await
    }

    /// Returns the cached verse, refreshing once first if nothing is cached yet.
    pub async fn current_or_refresh(&self) -> Result<Arc<CachedVerse>> {
        if let Some(verse) = self.cache.current().await {
            return Ok(verse);
        }
        info!("No verse cached yet, refreshing before reply");
        self.refresh(None, CategoryFallback::Random).await
    }

    /// Fetches a new verse and installs it. On failure the slot is untouched.
    #[instrument(skip(self), fields(requested = category.unwrap_or("any")))]
    pub async fn refresh(
        &self,
        category: Option<&str>,
        fallback: CategoryFallback,
    ) -> Result<Arc<CachedVerse>> {
        let ticket = self.cache.begin();
        let result = self.build_record(category, fallback).await;

        let record = match result {
            Ok(record) => record,
            Err(e) => {
                error!(error = %e, "Refresh failed, keeping last verse");
                metrics::refresh(false);
                return Err(e);
            }
        };

        let outcome = self.cache.commit(ticket, record, Utc::now()).await;
        metrics::refresh(true);
        match &outcome {
            CommitOutcome::Installed(v) => info!(
                reference = %v.record.reference,
                category = v.record.category.as_deref().unwrap_or("-"),
                background = v.record.background_image.is_some(),
                "Updated current ayah"
            ),
            CommitOutcome::Superseded(v) => info!(
                kept = %v.record.reference,
                "Newer refresh already installed, result discarded"
            ),
        }
        Ok(outcome.into_current())
    }

    /// One-off verse for a named category. Unknown names are an error and the
    /// cached slot is never touched.
    pub async fn verse_for_category(&self, category: &str) -> Result<VerseRecord> {
        self.build_record(Some(category), CategoryFallback::Strict).await
    }

    pub async fn health(&self) -> HealthReport {
        let current = self.cache.current().await;
        HealthReport {
            status: "OK",
            timestamp: Utc::now(),
            current_ayah: current
                .as_ref()
                .map(|v| v.record.reference.clone())
                .unwrap_or_else(|| "None".to_string()),
            last_update: current
                .as_ref()
                .map(|v| v.last_updated.to_rfc3339_opts(SecondsFormat::AutoSi, true))
                .unwrap_or_else(|| "Never".to_string()),
            unsplash_configured: self.images.is_configured(),
        }
    }

    async fn build_record(
        &self,
        category: Option<&str>,
        fallback: CategoryFallback,
    ) -> Result<VerseRecord> {
        let Selection { category, reference } =
            self.selection.pick_with_fallback(category, fallback)?;
        let record = self.verses.fetch_verse(reference).await.map_err(|e| {
            error!(%reference, %category, error = %e, "Verse fetch failed");
            e
        })?;
        let image = self.images.fetch_background_image().await.into_url();
        Ok(record.enriched(Some(category), image))
    }
}
