use thiserror::Error;

use crate::services::SourceError;

/// Unified application error.
///
/// This ensures all layers of the binary (config, match source, output)
/// fail in a predictable and debuggable way.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}
