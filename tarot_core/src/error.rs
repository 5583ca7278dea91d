//! Error types for the tarot_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for tarot_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog validation error
    #[error("Catalog validation error: {0}")]
    CatalogValidation(String),

    /// Deck cannot cover the largest spread
    #[error("Deck has {available} cards but a spread needs up to {required}")]
    DeckTooSmall { available: usize, required: usize },

    /// Spread name did not match any known layout
    #[error("Unknown spread: {0}")]
    UnknownSpread(String),

    /// Interpretation request or response error
    #[error("Interpretation error: {0}")]
    Interpretation(String),

    /// Settings store error
    #[error("Settings error: {0}")]
    Settings(String),
}
