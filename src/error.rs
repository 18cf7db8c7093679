//! Error types for calendar import and configuration.

use thiserror::Error;

/// Errors surfaced to the player when importing a calendar file.
#[derive(Error, Debug)]
pub enum ImportError {
    /// No VEVENT block survived validation.
    #[error("no events between 8:00 and 18:00 found in calendar")]
    NoEvents,

    /// The host could not read the chosen file.
    #[error("could not read calendar file: {0}")]
    Read(String),
}

/// Errors loading gameplay tuning.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Malformed JSON.
    #[error("tuning parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of its allowed range.
    #[error("invalid tuning value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Result type alias for calendar import.
pub type ImportResult<T> = std::result::Result<T, ImportError>;
