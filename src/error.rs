//! Error types for the design-scout query host.

use design_search::SearchError;

/// Top-level error type for the query host.
#[derive(Debug, thiserror::Error)]
pub enum ScoutError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Channel send/receive error.
    #[error("channel error: {0}")]
    Channel(String),

    /// Command dispatch or payload validation error.
    #[error("pipeline error: {0}")]
    Pipeline(String),

    /// Gallery search or category directory error.
    #[error("search error: {0}")]
    Search(#[from] SearchError),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, ScoutError>;
