pub mod ports;
pub mod refresh_use_case;

pub use refresh_use_case::{AyahService, CategoryListing, HealthReport};
