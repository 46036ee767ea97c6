use crate::catalog::Catalog;
use crate::constants::{
    DEFAULT_EVENING_CATEGORY, DEFAULT_EVENING_HOUR, DEFAULT_MORNING_CATEGORY, DEFAULT_MORNING_HOUR,
    DEFAULT_PORT, DEFAULT_REFRESH_EVERY_HOURS, QURAN_API_BASE, UNSPLASH_API_BASE,
};
use crate::error::{AyahError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub port: u16,
    pub unsplash_access_key: Option<String>,
    pub quran_api_base: String,
    pub unsplash_api_base: String,
    /// Prometheus listener port; metrics are not exported when unset.
    pub metrics_port: Option<u16>,
    pub schedule: ScheduleConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub refresh_every_hours: u32,
    pub morning_hour: u32,
    pub morning_category: String,
    pub evening_hour: u32,
    pub evening_category: String,
    pub refresh_on_start: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            unsplash_access_key: None,
            quran_api_base: QURAN_API_BASE.to_string(),
            unsplash_api_base: UNSPLASH_API_BASE.to_string(),
            metrics_port: None,
            schedule: ScheduleConfig::default(),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            refresh_every_hours: DEFAULT_REFRESH_EVERY_HOURS,
            morning_hour: DEFAULT_MORNING_HOUR,
            morning_category: DEFAULT_MORNING_CATEGORY.to_string(),
            evening_hour: DEFAULT_EVENING_HOUR,
            evening_category: DEFAULT_EVENING_CATEGORY.to_string(),
            refresh_on_start: true,
        }
    }
}

fn parse_var<T: FromStr>(key: &str, raw: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| AyahError::Config(format!("{}={:?} is invalid: {}", key, raw, e)))
}

impl Config {
    /// Reads `path` when it exists (defaults otherwise), then applies process
    /// environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    pub fn load_with(path: &Path, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let config = if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                AyahError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
            })?;
            toml::from_str(&content)?
        } else {
            Config::default()
        };
        config.with_env(lookup)
    }

    /// Applies overrides from an environment lookup.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(v) = lookup("PORT") {
            self.port = parse_var("PORT", &v)?;
        }
        if let Some(v) = lookup("UNSPLASH_ACCESS_KEY") {
            self.unsplash_access_key = Some(v);
        }
        if let Some(v) = lookup("QURAN_API_BASE") {
            self.quran_api_base = v;
        }
        if let Some(v) = lookup("UNSPLASH_API_BASE") {
            self.unsplash_api_base = v;
        }
        if let Some(v) = lookup("AYAH_METRICS_PORT") {
            self.metrics_port = Some(parse_var("AYAH_METRICS_PORT", &v)?);
        }
        if let Some(v) = lookup("AYAH_REFRESH_EVERY_HOURS") {
            self.schedule.refresh_every_hours = parse_var("AYAH_REFRESH_EVERY_HOURS", &v)?;
        }
        if let Some(v) = lookup("AYAH_MORNING_HOUR") {
            self.schedule.morning_hour = parse_var("AYAH_MORNING_HOUR", &v)?;
        }
        if let Some(v) = lookup("AYAH_MORNING_CATEGORY") {
            self.schedule.morning_category = v.trim().to_lowercase();
        }
        if let Some(v) = lookup("AYAH_EVENING_HOUR") {
            self.schedule.evening_hour = parse_var("AYAH_EVENING_HOUR", &v)?;
        }
        if let Some(v) = lookup("AYAH_EVENING_CATEGORY") {
            self.schedule.evening_category = v.trim().to_lowercase();
        }
        Ok(self)
    }

    /// Checks schedule values against the clock and the catalog.
    pub fn validate(&self, catalog: &Catalog) -> Result<()> {
        let s = &self.schedule;
        if !(1..=24).contains(&s.refresh_every_hours) {
            return Err(AyahError::Config(format!(
                "refresh_every_hours must be between 1 and 24, got {}",
                s.refresh_every_hours
            )));
        }
        for (field, hour) in [("morning_hour", s.morning_hour), ("evening_hour", s.evening_hour)] {
            if hour > 23 {
                return Err(AyahError::Config(format!("{} must be 0-23, got {}", field, hour)));
            }
        }
        for category in [&s.morning_category, &s.evening_category] {
            if !catalog.contains(category) {
                return Err(AyahError::Config(format!(
                    "scheduled category '{}' is not in the catalog",
                    category
                )));
            }
        }
        Ok(())
    }
}
