use thiserror::Error;

#[derive(Error, Debug)]
pub enum AyahError {
    #[error("Invalid category: {name}")]
    InvalidCategory {
        name: String,
        available: Vec<String>,
    },

    #[error("No ayah data returned for {reference} ({edition})")]
    UpstreamDataMissing { reference: String, edition: String },

    #[error("Verse provider unavailable for {reference}: {message}")]
    UpstreamUnavailable { reference: String, message: String },

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AyahError {
    /// True for failures that originate at the verse text provider.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            AyahError::UpstreamDataMissing { .. } | AyahError::UpstreamUnavailable { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, AyahError>;
