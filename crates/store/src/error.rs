//! Errors surfaced by the storage seams.

use thiserror::Error;

/// Error surfaced when reading or writing a backing store fails.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O failure (for example, permissions or missing directory).
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON serialization or deserialization failure.
    #[error("store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// YAML parse failure in a template seed document.
    #[error("template seed error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
