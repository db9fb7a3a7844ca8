use std::path::PathBuf;

use thiserror::Error;

/// Conditions surfaced to the user at the UI boundary.
///
/// Degenerate selections are deliberately absent: the selection model
/// normalizes them silently.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("could not read {}: {reason}", path.display())]
    FileRead { path: PathBuf, reason: String },

    #[error("column '{column}' has no valid numeric values")]
    EmptyColumn { column: String },

    #[error("column '{column}' does not exist in the loaded table")]
    UnknownColumn { column: String },

    #[error("clipboard error: {0}")]
    Clipboard(String),

    #[error("a selection needs at least two points, got {length}")]
    InvalidLength { length: usize },
}

impl AnalyzerError {
    /// Wrap a loader failure, keeping the whole context chain.
    pub fn file_read(path: impl Into<PathBuf>, err: &anyhow::Error) -> Self {
        AnalyzerError::FileRead {
            path: path.into(),
            reason: format!("{err:#}"),
        }
    }
}
