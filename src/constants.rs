/// Upstream endpoints and fixed request parameters shared across the crate.

// Verse text provider
pub const QURAN_API_BASE: &str = "https://api.alquran.cloud/v1";
pub const ARABIC_EDITION: &str = "ar.alafasy";
pub const TRANSLATION_EDITION: &str = "en.sahih";

// Background image provider
pub const UNSPLASH_API_BASE: &str = "https://api.unsplash.com";
pub const UNSPLASH_PLACEHOLDER_KEY: &str = "YOUR_UNSPLASH_ACCESS_KEY_HERE";

/// Query parameters sent with every random-photo request.
pub const UNSPLASH_QUERY_PARAMS: [(&str, &str); 5] = [
    ("orientation", "landscape"),
    ("w", "1920"),
    ("h", "1080"),
    ("content_filter", "high"),
    ("featured", "true"),
];

/// Appended to the returned photo URL so every render is 1920x1080, center-cropped.
pub const IMAGE_RENDER_PARAMS: &str = "w=1920&h=1080&fit=crop&crop=center&q=85";

/// Curated search phrases for landscape backgrounds without people.
pub const BACKGROUND_SEARCH_TERMS: [&str; 12] = [
    "sea sunset horizon",
    "ocean sunrise golden hour",
    "sky sunset clouds",
    "sunrise mountain peaks",
    "snow covered mountains",
    "snowy mountain landscape",
    "ocean waves sunset",
    "sea horizon sunrise",
    "mountain sunrise snow",
    "sky clouds sunset dramatic",
    "snow mountain peaks blue sky",
    "ocean sunset reflection",
];

// Default schedule
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_REFRESH_EVERY_HOURS: u32 = 3;
pub const DEFAULT_MORNING_HOUR: u32 = 6;
pub const DEFAULT_MORNING_CATEGORY: &str = "motivation";
pub const DEFAULT_EVENING_HOUR: u32 = 20;
pub const DEFAULT_EVENING_CATEGORY: &str = "calmness";
