//! Anchor-tagged runs
//!
//! Sections addressable by an in-page identifier are inlined into a record's
//! content as one run per line:
//!
//! ```text
//! [ANCHOR: #<id>] <text> [/ANCHOR]
//! ```
//!
//! The chat front-end parses the same syntax back out to build deep links,
//! so formatting and parsing live side by side here.

use super::SECTIONS_SEPARATOR;
use serde::{Deserialize, Serialize};

const RUN_OPEN: &str = "[ANCHOR: #";
const RUN_ID_END: &str = "] ";
const RUN_CLOSE: &str = " [/ANCHOR]";

/// A named sub-region of a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorSection {
    /// Element identifier used for in-page deep links
    pub anchor_id: String,
    /// Normalized text of the section
    pub text: String,
}

impl AnchorSection {
    /// Create a new anchor section
    pub fn new(anchor_id: &str, text: &str) -> Self {
        Self {
            anchor_id: anchor_id.to_string(),
            text: text.to_string(),
        }
    }

    /// Format as a self-delimited tagged run
    pub fn to_run(&self) -> String {
        format!(
            "{}{}{}{}{}",
            RUN_OPEN, self.anchor_id, RUN_ID_END, self.text, RUN_CLOSE
        )
    }

    /// Deep link to this section on the given page
    pub fn link(&self, page_url: &str) -> String {
        deep_link(page_url, &self.anchor_id)
    }
}

/// Join anchor runs into the block that follows the separator
pub fn format_anchor_block(sections: &[AnchorSection]) -> String {
    sections
        .iter()
        .map(AnchorSection::to_run)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Split record content into the general text and the anchor block
///
/// Content without a separator is treated as general text only.
pub fn split_content(content: &str) -> (&str, &str) {
    content
        .split_once(SECTIONS_SEPARATOR)
        .unwrap_or((content, ""))
}

/// Recover every well-formed anchor run from record content
pub fn parse_anchor_runs(content: &str) -> Vec<AnchorSection> {
    let (_, block) = split_content(content);
    block.lines().filter_map(parse_run).collect()
}

fn parse_run(line: &str) -> Option<AnchorSection> {
    let inner = line.strip_prefix(RUN_OPEN)?.strip_suffix(RUN_CLOSE)?;
    let (anchor_id, text) = inner.split_once(RUN_ID_END)?;
    if anchor_id.is_empty() || text.is_empty() {
        return None;
    }
    Some(AnchorSection::new(anchor_id, text))
}

/// Build `<page_url>#<anchor_id>`, replacing any fragment already on the URL
pub fn deep_link(page_url: &str, anchor_id: &str) -> String {
    let base = page_url
        .split_once('#')
        .map_or(page_url, |(base, _)| base);
    format!("{}#{}", base, anchor_id)
}
