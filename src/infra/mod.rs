pub mod http_client;
pub mod quran_cloud;
pub mod unsplash;

use crate::app::AyahService;
use crate::cache::VerseCache;
use crate::catalog::Catalog;
use crate::config::Config;
use crate::selection::{SelectionEngine, ThreadRandom};
use http_client::ReqwestHttp;
use quran_cloud::QuranCloudClient;
use std::sync::Arc;
use unsplash::UnsplashClient;

/// Wires the production adapters into a service with an empty slot.
pub fn build_service(config: &Config, catalog: Arc<Catalog>) -> AyahService {
    let http = Arc::new(ReqwestHttp::new());
    let rng = Arc::new(ThreadRandom);

    let verses = QuranCloudClient::with_base_url(http.clone(), &config.quran_api_base);
    let images = UnsplashClient::with_base_url(
        http,
        rng.clone(),
        config.unsplash_access_key.clone(),
        &config.unsplash_api_base,
    );

    AyahService::new(
        SelectionEngine::new(catalog, rng),
        Arc::new(verses),
        Arc::new(images),
        Arc::new(VerseCache::new()),
    )
}
