use askama::Template;
use chrono::SecondsFormat;

use crate::types::{CachedVerse, VerseRecord};

/// The client asks for a fresh verse when the shown one is this old.
pub const STALE_AFTER_HOURS: u32 = 3;
/// Shorter threshold applied when the tab regains focus.
pub const STALE_ON_RETURN_HOURS: u32 = 2;

#[derive(Template)]
#[template(path = "verse.html")]
pub struct VersePage<'a> {
    pub verse: &'a VerseRecord,
    pub last_updated: String,
    pub stale_after_hours: u32,
    pub stale_on_return_hours: u32,
}

impl<'a> VersePage<'a> {
    pub fn new(cached: &'a CachedVerse) -> Self {
        Self {
            verse: &cached.record,
            last_updated: cached.last_updated.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            stale_after_hours: STALE_AFTER_HOURS,
            stale_on_return_hours: STALE_ON_RETURN_HOURS,
        }
    }
}

#[derive(Template)]
#[template(path = "loading.html")]
pub struct LoadingPage {
    pub reload_after_ms: u32,
}

impl Default for LoadingPage {
    fn default() -> Self {
        Self { reload_after_ms: 2000 }
    }
}
