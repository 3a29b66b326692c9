//! Rendered site discovery and build driving
//!
//! This module plays the host build system's part:
//! - Discovering rendered pages in the site output directory
//! - Deriving each page's title and absolute URL
//! - Running the extract → record → flush lifecycle in page order

mod config;

pub use config::{ExcludeSet, SiteConfig, CONFIG_FILE};

use crate::corpus::{CorpusAggregator, FlushSummary};
use crate::extract::ParsedPage;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use url::Url;
use walkdir::WalkDir;

/// A rendered page found in the site directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitePage {
    /// File on disk
    pub path: PathBuf,
    /// Path relative to the site directory, `/`-separated
    pub rel_path: String,
    /// Absolute URL of the page
    pub url: String,
}

/// A rendered documentation site
pub struct Site {
    site_dir: PathBuf,
    corpus_path: PathBuf,
    base_url: Option<Url>,
    excludes: ExcludeSet,
    config: SiteConfig,
}

impl Site {
    /// Open the site described by `config` under `project_root`
    pub fn open(project_root: &Path, config: SiteConfig) -> Result<Self> {
        let site_dir = config.site_dir_in(project_root);
        if !site_dir.is_dir() {
            anyhow::bail!("Site directory not found: {:?}. Build the site first.", site_dir);
        }

        let base_url = config
            .site_url
            .as_deref()
            .map(parse_base_url)
            .transpose()?;
        let excludes = config.exclude_set()?;

        Ok(Self {
            corpus_path: config.corpus_path_in(project_root),
            site_dir,
            base_url,
            excludes,
            config,
        })
    }

    /// Write the corpus somewhere other than the configured location
    pub fn with_corpus_path(mut self, path: PathBuf) -> Self {
        self.corpus_path = path;
        self
    }

    /// Site output directory
    pub fn site_dir(&self) -> &Path {
        &self.site_dir
    }

    /// Where the corpus artifact is written
    pub fn corpus_path(&self) -> &Path {
        &self.corpus_path
    }

    /// Rendered pages in processing order (sorted by relative path)
    pub fn pages(&self) -> Result<Vec<SitePage>> {
        let mut pages = Vec::new();

        for entry in WalkDir::new(&self.site_dir).sort_by_file_name() {
            let entry = entry
                .with_context(|| format!("Failed to walk site directory {:?}", self.site_dir))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("html") {
                continue;
            }

            let rel_path = relative_url_path(&self.site_dir, path);
            if self.excludes.matches(&rel_path) {
                tracing::debug!("Excluding {}", rel_path);
                continue;
            }

            let url = self.page_url(&rel_path)?;
            pages.push(SitePage {
                path: path.to_path_buf(),
                rel_path,
                url,
            });
        }

        Ok(pages)
    }

    /// Absolute URL for a page path relative to the site directory
    pub fn page_url(&self, rel_path: &str) -> Result<String> {
        let rel_url = if self.config.use_directory_urls {
            directory_url(rel_path)
        } else {
            rel_path
        };

        match &self.base_url {
            Some(base) => {
                let joined = base
                    .join(&format!("./{}", rel_url))
                    .with_context(|| format!("Failed to build URL for {}", rel_path))?;
                Ok(joined.to_string())
            }
            None => Ok(format!("/{}", rel_url)),
        }
    }

    /// Display title for a parsed page
    pub fn page_title(&self, page: &ParsedPage) -> String {
        let title = page.title().unwrap_or_default();
        match &self.config.site_name {
            Some(name) => title
                .strip_suffix(&format!(" - {}", name))
                .map(str::to_string)
                .unwrap_or(title),
            None => title,
        }
    }

    /// Run one complete build and write the corpus
    ///
    /// Returns `None` when corpus generation is disabled.
    pub fn build(&self) -> Result<Option<FlushSummary>> {
        if !self.config.enabled {
            tracing::warn!("Corpus generation is disabled in {}; nothing written", CONFIG_FILE);
            return Ok(None);
        }

        let pages = self.pages()?;
        tracing::info!("Extracting {} pages from {:?}", pages.len(), self.site_dir);

        let mut corpus = CorpusAggregator::new();
        corpus.begin_build();

        for page in &pages {
            let bytes = std::fs::read(&page.path)
                .with_context(|| format!("Failed to read page {:?}", page.path))?;
            let markup = String::from_utf8_lossy(&bytes);

            let parsed = ParsedPage::parse(&markup);
            let title = self.page_title(&parsed);
            corpus.record(parsed.extract(&title, &page.url));
        }

        let summary = corpus.flush(&self.corpus_path)?;
        Ok(Some(summary))
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let mut normalized = raw.trim().to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    Url::parse(&normalized).with_context(|| format!("Invalid site_url: {}", raw))
}

/// `foo/index.html` → `foo/`, `index.html` → ``
fn directory_url(rel_path: &str) -> &str {
    if rel_path == "index.html" {
        ""
    } else {
        rel_path.strip_suffix("index.html").filter(|p| p.ends_with('/')).unwrap_or(rel_path)
    }
}

fn relative_url_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
