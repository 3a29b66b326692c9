//! Rendered page extraction
//!
//! Parses a page's final HTML leniently and produces its corpus record:
//! the container's general text, the fixed separator, then one tagged run
//! per identified element that carries visible text.

use super::anchor::{format_anchor_block, AnchorSection};
use super::{element_text, PageRecord, WordCollector, NON_TEXT_ELEMENTS, SECTIONS_SEPARATOR};
use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use scraper::{ElementRef, Html};

/// Extract the corpus record for one rendered page
///
/// Returns `None` when the page has no content container at all.
pub fn extract(page_markup: &str, page_title: &str, page_url: &str) -> Option<PageRecord> {
    ParsedPage::parse(page_markup).extract(page_title, page_url)
}

/// A parsed page, ready for container lookup and extraction
pub struct ParsedPage {
    document: Html,
    /// Whether the source markup itself opened a `<body>` element
    explicit_body: bool,
}

impl ParsedPage {
    /// Parse page markup; never fails on malformed input
    pub fn parse(markup: &str) -> Self {
        Self {
            document: Html::parse_document(markup),
            explicit_body: has_body_start_tag(markup),
        }
    }

    /// Primary content container
    ///
    /// The first `role="main"` element wins, then the first `<main>`, then the
    /// source's `<body>`.
    pub fn container(&self) -> Option<ElementRef<'_>> {
        let mut main_element = None;
        for element in self.elements() {
            if element.value().attr("role") == Some("main") {
                return Some(element);
            }
            if main_element.is_none() && element.value().name() == "main" {
                main_element = Some(element);
            }
        }
        main_element.or_else(|| self.body())
    }

    /// Normalized text of the document's `<title>`, if any
    pub fn title(&self) -> Option<String> {
        self.elements()
            .find(|el| el.value().name() == "title")
            .map(element_text)
            .filter(|title| !title.is_empty())
    }

    /// Build the page record from the container
    pub fn extract(&self, page_title: &str, page_url: &str) -> Option<PageRecord> {
        let Some(container) = self.container() else {
            tracing::debug!("No content container in {}, page skipped", page_url);
            return None;
        };

        let general_text = element_text(container);
        let sections = anchor_sections(container);

        let content = format!(
            "{}{}{}",
            general_text,
            SECTIONS_SEPARATOR,
            format_anchor_block(&sections)
        );

        Some(PageRecord::new(page_title, page_url, content))
    }

    fn elements(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.document
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
    }

    fn body(&self) -> Option<ElementRef<'_>> {
        if !self.explicit_body {
            return None;
        }
        self.document
            .root_element()
            .children()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "body")
    }
}

/// Identified elements under the container, in document order
fn anchor_sections(container: ElementRef<'_>) -> Vec<AnchorSection> {
    container
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .filter(|el| !inside_non_text(*el))
        .filter_map(|el| {
            let anchor_id = el.value().attr("id")?;
            if anchor_id.trim().is_empty() {
                return None;
            }
            let text = section_text(el);
            if text.is_empty() {
                return None;
            }
            Some(AnchorSection::new(anchor_id, &text))
        })
        .collect()
}

/// Text for an identified element
///
/// A heading with visible text also covers its following siblings until the
/// next heading of the same or higher rank.
fn section_text(element: ElementRef<'_>) -> String {
    let mut words = WordCollector::default();
    words.push_element(element);

    let Some(rank) = heading_rank(element.value().name()) else {
        return words.finish();
    };
    if words.is_empty() {
        return String::new();
    }

    for sibling in element.next_siblings() {
        let closes_section = ElementRef::wrap(sibling)
            .and_then(|el| heading_rank(el.value().name()))
            .is_some_and(|sibling_rank| sibling_rank <= rank);
        if closes_section {
            break;
        }
        words.push_node(sibling);
    }

    words.finish()
}

fn heading_rank(tag: &str) -> Option<u8> {
    match tag {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

fn inside_non_text(element: ElementRef<'_>) -> bool {
    element.ancestors().any(|node| {
        node.value()
            .as_element()
            .is_some_and(|el| NON_TEXT_ELEMENTS.contains(&el.name()))
    })
}

/// Whether the markup itself opens a `<body>` element
///
/// Comments and the content of raw-text elements are tokenized as such, so a
/// `<body>` inside them does not count.
fn has_body_start_tag(markup: &str) -> bool {
    let mut input = BufferQueue::new();
    input.push_back(StrTendril::from_slice(markup));

    let mut tokenizer = Tokenizer::new(BodyTagScan::default(), TokenizerOpts::default());
    let _ = tokenizer.feed(&mut input);
    tokenizer.end();
    tokenizer.sink.found
}

#[derive(Default)]
struct BodyTagScan {
    found: bool,
}

impl TokenSink for BodyTagScan {
    type Handle = ();

    fn process_token(&mut self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        let Token::TagToken(tag) = token else {
            return TokenSinkResult::Continue;
        };
        if tag.kind != TagKind::StartTag {
            return TokenSinkResult::Continue;
        }

        // Same raw-text switches the tree builder makes (scripting enabled)
        match &*tag.name {
            "body" => {
                self.found = true;
                TokenSinkResult::Continue
            }
            "script" => TokenSinkResult::RawData(RawKind::ScriptData),
            "style" | "xmp" | "iframe" | "noembed" | "noframes" | "noscript" => {
                TokenSinkResult::RawData(RawKind::Rawtext)
            }
            "title" | "textarea" => TokenSinkResult::RawData(RawKind::Rcdata),
            "plaintext" => TokenSinkResult::Plaintext,
            _ => TokenSinkResult::Continue,
        }
    }
}
