//! sitecorpus - build-time text corpus for retrieval-assisted documentation chat
//!
//! This library turns a rendered documentation site into a single JSON corpus:
//! every page's main content as normalized text, followed by anchor-tagged
//! sections the chat front-end can turn into deep links.

pub mod cli;
pub mod corpus;
pub mod extract;
pub mod site;

/// Re-export commonly used types
pub use corpus::{BuildState, CorpusAggregator, CorpusError, FlushSummary};
pub use extract::{extract, AnchorSection, PageRecord, SECTIONS_SEPARATOR};
pub use site::{Site, SiteConfig};

/// Application-wide error type
pub use anyhow::Result;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "sitecorpus";
