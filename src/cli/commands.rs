//! Command implementations

use super::{BuildArgs, ConfigArgs};
use crate::corpus::{load_corpus, FlushSummary};
use crate::extract::{PageRecord, ParsedPage};
use crate::site::{Site, SiteConfig, CONFIG_FILE};
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Build the corpus for the site under `path`
///
/// Returns `None` when corpus generation is disabled.
pub fn build(path: &Path, args: &BuildArgs) -> Result<Option<FlushSummary>> {
    let mut config = SiteConfig::load_or_default(path)?;

    if let Some(ref dir) = args.site_dir {
        config.site_dir = dir.clone();
    }
    if let Some(ref url) = args.site_url {
        config.site_url = Some(url.clone());
    }

    let mut site = Site::open(path, config)?;
    if let Some(ref output) = args.output {
        site = site.with_corpus_path(output.clone());
    }

    site.build()
}

/// Extract a single page from a file, or stdin when `file` is "-"
pub fn extract_page(file: &str, title: Option<&str>, url: &str) -> Result<Option<PageRecord>> {
    let markup = if file == "-" {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("Failed to read page from stdin")?;
        String::from_utf8_lossy(&buf).into_owned()
    } else {
        let bytes = std::fs::read(file).with_context(|| format!("Failed to read page {:?}", file))?;
        String::from_utf8_lossy(&bytes).into_owned()
    };

    let page = ParsedPage::parse(&markup);
    let title = match title {
        Some(t) => t.to_string(),
        None => page.title().unwrap_or_default(),
    };

    Ok(page.extract(&title, url))
}

/// Per-page overview of a corpus file
#[derive(Debug, Clone, Serialize)]
pub struct PageOverview {
    pub title: String,
    pub url: String,
    /// Words in the general text
    pub words: usize,
    /// Deep links for each anchor section
    pub anchors: Vec<String>,
}

impl PageOverview {
    fn from_record(record: &PageRecord) -> Self {
        Self {
            title: record.title.clone(),
            url: record.url.clone(),
            words: record.general_text().split_whitespace().count(),
            anchors: record
                .anchors()
                .iter()
                .map(|a| a.link(&record.url))
                .collect(),
        }
    }
}

/// Load a corpus file (default: the configured artifact) and summarize it
pub fn inspect(path: &Path, file: Option<&Path>) -> Result<Vec<PageOverview>> {
    let corpus_path: PathBuf = match file {
        Some(f) => f.to_path_buf(),
        None => SiteConfig::load_or_default(path)?.corpus_path_in(path),
    };

    let records = load_corpus(&corpus_path)?;
    Ok(records.iter().map(PageOverview::from_record).collect())
}

/// Show or reset the project configuration
pub fn config(path: &Path, args: &ConfigArgs) -> Result<()> {
    if args.reset {
        SiteConfig::default().save(path)?;
        println!("✓ Configuration reset to defaults");
    }

    if args.show || !args.reset {
        let config = SiteConfig::load_or_default(path)?;

        println!("sitecorpus Configuration ({})", CONFIG_FILE);
        println!("=========================\n");
        println!("Enabled: {}", config.enabled);
        println!("Site directory: {:?}", config.site_dir);
        println!("Corpus file: {}", config.corpus_file);
        println!("Directory URLs: {}", config.use_directory_urls);
        if let Some(ref url) = config.site_url {
            println!("Site URL: {}", url);
        }
        if let Some(ref name) = config.site_name {
            println!("Site name: {}", name);
        }

        println!("\nExclude patterns:");
        for pattern in &config.exclude_patterns {
            println!("  - {}", pattern);
        }
    }

    Ok(())
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

/// Print a build summary in text format
pub fn print_summary_text(summary: Option<&FlushSummary>) {
    match summary {
        Some(summary) => {
            println!("✓ Corpus written to {:?}", summary.path);
            println!("  Pages: {}", summary.pages);
            println!("  Bytes: {}", summary.bytes);
            println!("  SHA-256: {}", summary.digest);
        }
        None => println!("Corpus generation disabled; nothing written."),
    }
}

/// Print a corpus overview in text format
pub fn print_overview_text(pages: &[PageOverview], show_anchors: bool) {
    if pages.is_empty() {
        println!("Corpus is empty.");
        return;
    }

    for page in pages {
        let title: &str = if page.title.is_empty() {
            "(untitled)"
        } else {
            &page.title
        };
        println!("{} <{}>", title, page.url);
        println!("   Words: {}  Anchors: {}", page.words, page.anchors.len());
        if show_anchors {
            for link in &page.anchors {
                println!("   - {}", link);
            }
        }
    }

    let anchors: usize = pages.iter().map(|p| p.anchors.len()).sum();
    println!("\n{} pages, {} anchor sections", pages.len(), anchors);
}
