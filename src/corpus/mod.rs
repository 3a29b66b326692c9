//! Corpus assembly for one site build
//!
//! The aggregator collects page records in the order pages are processed and
//! writes them once, as a single JSON array, after the last page. Nothing is
//! persisted until `flush`, and `flush` replaces the artifact atomically.

mod error;

pub use error::CorpusError;

use crate::extract::{content_hash, PageRecord};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Mode of the written artifact, readable by the web server serving the site
#[cfg(unix)]
const ARTIFACT_MODE: u32 = 0o644;

/// Lifecycle of an aggregator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    /// Constructed, build not started
    Idle,
    /// Accepting page records
    Collecting,
    /// Artifact written; no further records accepted
    Flushed,
}

impl std::fmt::Display for BuildState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildState::Idle => write!(f, "idle"),
            BuildState::Collecting => write!(f, "collecting"),
            BuildState::Flushed => write!(f, "flushed"),
        }
    }
}

/// Outcome of a successful flush
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlushSummary {
    /// Destination the corpus was written to
    pub path: PathBuf,
    /// Number of page records written
    pub pages: usize,
    /// Size of the artifact in bytes
    pub bytes: usize,
    /// SHA-256 of the artifact bytes
    pub digest: String,
}

/// Ordered, append-only page record collection scoped to one build
#[derive(Debug)]
pub struct CorpusAggregator {
    records: Vec<PageRecord>,
    state: BuildState,
}

impl CorpusAggregator {
    /// Create an idle aggregator
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            state: BuildState::Idle,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> BuildState {
        self.state
    }

    /// Records collected so far, in processing order
    pub fn records(&self) -> &[PageRecord] {
        &self.records
    }

    /// Number of records collected
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no records have been collected
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Start a build with an empty sequence
    pub fn begin_build(&mut self) {
        if self.state == BuildState::Flushed {
            tracing::warn!("begin_build called on a flushed corpus; use a fresh aggregator per build");
            return;
        }
        self.records.clear();
        self.state = BuildState::Collecting;
    }

    /// Append a page record; `None` (a skipped page) is a no-op
    pub fn record(&mut self, page_record: Option<PageRecord>) {
        let Some(page_record) = page_record else {
            return;
        };
        if self.state != BuildState::Collecting {
            tracing::warn!(
                "Discarding record for {} while corpus is {}",
                page_record.url,
                self.state
            );
            return;
        }
        self.records.push(page_record);
    }

    /// Serialize the ordered corpus
    pub fn to_json(&self) -> Result<Vec<u8>, CorpusError> {
        serde_json::to_vec(&self.records).map_err(CorpusError::Serialize)
    }

    /// Write the corpus to `destination`, replacing any existing file
    ///
    /// The bytes go to a temporary file beside the destination which is then
    /// renamed over it, so a failed flush leaves the previous artifact intact.
    pub fn flush(&mut self, destination: &Path) -> Result<FlushSummary, CorpusError> {
        if self.state != BuildState::Collecting {
            return Err(CorpusError::InvalidState(self.state));
        }

        let bytes = self.to_json()?;
        write_atomic(destination, &bytes)?;

        self.state = BuildState::Flushed;

        let summary = FlushSummary {
            path: destination.to_path_buf(),
            pages: self.records.len(),
            bytes: bytes.len(),
            digest: content_hash(&bytes),
        };
        tracing::info!(
            "Wrote corpus with {} pages ({} bytes) to {:?}",
            summary.pages,
            summary.bytes,
            summary.path
        );
        Ok(summary)
    }
}

impl Default for CorpusAggregator {
    fn default() -> Self {
        Self::new()
    }
}

fn write_atomic(destination: &Path, bytes: &[u8]) -> Result<(), CorpusError> {
    let persist_err = |source: std::io::Error| CorpusError::Persist {
        path: destination.to_path_buf(),
        source,
    };

    let parent = match destination.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(parent).map_err(persist_err)?;
    tmp.write_all(bytes).map_err(persist_err)?;

    // Temp files are created 0600
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(ARTIFACT_MODE))
            .map_err(persist_err)?;
    }

    tmp.as_file().sync_all().map_err(persist_err)?;
    tmp.persist(destination).map_err(|e| persist_err(e.error))?;

    Ok(())
}

/// Read a corpus artifact back into page records
pub fn load_corpus(path: &Path) -> anyhow::Result<Vec<PageRecord>> {
    use anyhow::Context;

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read corpus file: {:?}", path))?;
    let records: Vec<PageRecord> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse corpus file: {:?}", path))?;
    Ok(records)
}
