use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Chapter metadata as reported by the verse provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurahInfo {
    pub number: u16,
    /// Arabic chapter name.
    pub name: String,
    pub english_name: String,
    pub english_name_translation: String,
}

/// Verse position, both inside its chapter and across the whole text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AyahNumbers {
    /// Number within the surah.
    pub number: u16,
    pub number_in_quran: u32,
}

/// Display-ready verse. Built whole on every fetch and never edited in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerseRecord {
    pub arabic: String,
    pub translation: String,
    pub surah: SurahInfo,
    pub ayah: AyahNumbers,
    /// "{english surah name} {surah}:{ayah}"
    pub reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub background_image: Option<String>,
    #[serde(rename = "lastUpdated")]
    pub fetched_at: DateTime<Utc>,
}

impl VerseRecord {
    pub fn reference_label(english_name: &str, surah: u16, ayah: u16) -> String {
        format!("{} {}:{}", english_name, surah, ayah)
    }

    /// Returns a copy tagged with the category and background it was served with.
    pub fn enriched(mut self, category: Option<String>, background_image: Option<String>) -> Self {
        self.category = category;
        self.background_image = background_image;
        self
    }
}

/// Contents of the current-verse slot: the record plus when it was installed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedVerse {
    pub record: VerseRecord,
    pub last_updated: DateTime<Utc>,
}
