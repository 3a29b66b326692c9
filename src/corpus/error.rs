//! Errors raised while assembling or writing the corpus

use super::BuildState;
use std::path::PathBuf;
use thiserror::Error;

/// Corpus aggregation errors
#[derive(Error, Debug)]
pub enum CorpusError {
    /// The artifact could not be written to its destination
    #[error("Failed to write corpus to {path:?}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The records could not be serialized
    #[error("Failed to serialize corpus: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Flush was requested outside the collecting phase
    #[error("Corpus cannot be flushed while {0}")]
    InvalidState(BuildState),
}
