//! Error types shared by the analysis engine, the loader and the exporters.

use thiserror::Error;

/// Result type for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors that can occur while loading a corpus or running an analysis.
///
/// Degenerate statistics (empty years, words that never co-occur, isolated
/// graph nodes) are not errors; they resolve to `NaN`, `None` or a zero
/// contribution in the respective result types.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Caller supplied options that cannot produce a meaningful result.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The target word is not a valid ratio match pattern.
    #[error("Invalid target pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// A segment for this year is already part of the corpus.
    #[error("Year {0} is already loaded")]
    DuplicateYear(i32),

    /// The corpus stopped accepting segments after the given year crossed the token cap.
    #[error("Token cap was reached at year {0}; no further segments are accepted")]
    CorpusFull(i32),

    /// Graph query for a word that is not a node of the graph.
    #[error("Word {0:?} is not a node of the graph")]
    UnknownNode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl AnalysisError {
    /// Creates an invalid configuration error with the given message.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }
}
