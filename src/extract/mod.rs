//! Page content extraction
//!
//! This module turns one rendered page into one corpus record:
//! - Locating the primary content container
//! - Collapsing the container's text into a single normalized line
//! - Collecting anchor-tagged sections for deep linking

pub mod anchor;
pub mod page;

pub use anchor::{deep_link, format_anchor_block, parse_anchor_runs, split_content, AnchorSection};
pub use page::{extract, ParsedPage};

use scraper::ElementRef;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Literal line placed between the general text and the anchor block
pub const SECTIONS_SEPARATOR: &str = "\n\n---LINKABLE SECTIONS---\n";

/// Elements whose character data is never visible text
const NON_TEXT_ELEMENTS: &[&str] = &["script", "style", "template", "noscript"];

/// One entry of the corpus
///
/// Field order is part of the artifact format and must stay `title, url, content`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Display title of the page
    pub title: String,
    /// Absolute URL of the page
    pub url: String,
    /// General text, separator, then the anchor block
    pub content: String,
}

impl PageRecord {
    /// Create a new page record
    pub fn new(title: &str, url: &str, content: String) -> Self {
        Self {
            title: title.to_string(),
            url: url.to_string(),
            content,
        }
    }

    /// General body text (everything before the separator)
    pub fn general_text(&self) -> &str {
        split_content(&self.content).0
    }

    /// Anchor sections recovered from the content
    pub fn anchors(&self) -> Vec<AnchorSection> {
        parse_anchor_runs(&self.content)
    }
}

/// Compute a stable hash for content
pub fn content_hash(content: impl AsRef<[u8]>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_ref());
    hex::encode(hasher.finalize())
}

/// Normalized text of an element's subtree
pub fn element_text(element: ElementRef<'_>) -> String {
    let mut words = WordCollector::default();
    words.push_element(element);
    words.finish()
}

/// Accumulates whitespace-separated words from text nodes
#[derive(Default)]
pub(crate) struct WordCollector {
    buf: String,
}

impl WordCollector {
    /// Append every visible word under `element`
    pub(crate) fn push_element(&mut self, element: ElementRef<'_>) {
        for node in element.children() {
            self.push_node(node);
        }
    }

    /// Append every visible word under an arbitrary node
    pub(crate) fn push_node(&mut self, node: ego_tree::NodeRef<'_, scraper::Node>) {
        match node.value() {
            scraper::Node::Text(text) => self.push_str(text),
            scraper::Node::Element(el) => {
                if NON_TEXT_ELEMENTS.contains(&el.name()) {
                    return;
                }
                for child in node.children() {
                    self.push_node(child);
                }
            }
            _ => {}
        }
    }

    fn push_str(&mut self, text: &str) {
        for word in text.split_whitespace() {
            if !self.buf.is_empty() {
                self.buf.push(' ');
            }
            self.buf.push_str(word);
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub(crate) fn finish(self) -> String {
        self.buf
    }
}
