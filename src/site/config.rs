//! Project configuration for sitecorpus

use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file at the project root
pub const CONFIG_FILE: &str = "sitecorpus.toml";

/// Configuration for a documentation site build
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Whether the corpus is produced at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Rendered site output directory, relative to the project root
    #[serde(default = "default_site_dir")]
    pub site_dir: PathBuf,

    /// Base URL the site is served from (e.g., https://docs.example.com/)
    #[serde(default)]
    pub site_url: Option<String>,

    /// Site name, stripped from the end of page titles
    #[serde(default)]
    pub site_name: Option<String>,

    /// Corpus file name inside the site directory
    #[serde(default = "default_corpus_file")]
    pub corpus_file: String,

    /// Map `foo/index.html` to `foo/` when building page URLs
    #[serde(default = "default_use_directory_urls")]
    pub use_directory_urls: bool,

    /// Page paths to leave out of the corpus (glob patterns)
    #[serde(default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,
}

fn default_enabled() -> bool {
    true
}

fn default_site_dir() -> PathBuf {
    PathBuf::from("site")
}

fn default_corpus_file() -> String {
    "content.json".to_string()
}

fn default_use_directory_urls() -> bool {
    true
}

fn default_exclude_patterns() -> Vec<String> {
    vec!["404.html".to_string()]
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            site_dir: default_site_dir(),
            site_url: None,
            site_name: None,
            corpus_file: default_corpus_file(),
            use_directory_urls: default_use_directory_urls(),
            exclude_patterns: default_exclude_patterns(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from the project root or return defaults
    pub fn load_or_default(project_root: &Path) -> Result<Self> {
        let config_path = project_root.join(CONFIG_FILE);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config file: {:?}", config_path))?;
            let config: SiteConfig = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the project root
    pub fn save(&self, project_root: &Path) -> Result<()> {
        let config_path = project_root.join(CONFIG_FILE);
        let content = toml::to_string_pretty(self)
            .context("Failed to serialize configuration")?;

        std::fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        Ok(())
    }

    /// Site directory resolved against the project root
    pub fn site_dir_in(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.site_dir)
    }

    /// Corpus artifact path resolved against the project root
    pub fn corpus_path_in(&self, project_root: &Path) -> PathBuf {
        self.site_dir_in(project_root).join(&self.corpus_file)
    }

    /// Compile `exclude_patterns`
    pub fn exclude_set(&self) -> Result<ExcludeSet> {
        let patterns = self
            .exclude_patterns
            .iter()
            .map(|raw| {
                Pattern::new(raw).with_context(|| format!("Invalid exclude pattern: {}", raw))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(ExcludeSet { patterns })
    }
}

/// `*` stays within one path segment; `**` spans any number of them
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Compiled exclude patterns
///
/// A pattern without a `/` also matches the file name at any depth, so
/// `404.html` covers `de/404.html`.
#[derive(Debug, Clone, Default)]
pub struct ExcludeSet {
    patterns: Vec<Pattern>,
}

impl ExcludeSet {
    /// Check if a page path (relative to the site directory) should be skipped
    pub fn matches(&self, path: &str) -> bool {
        let file_name = path.rsplit('/').next().unwrap_or(path);
        self.patterns.iter().any(|pattern| {
            let bare_name = !pattern.as_str().contains('/');
            pattern.matches_with(path, MATCH_OPTIONS)
                || (bare_name && pattern.matches_with(file_name, MATCH_OPTIONS))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert!(config.enabled);
        assert_eq!(config.site_dir, PathBuf::from("site"));
        assert_eq!(config.corpus_file, "content.json");
        assert!(config.use_directory_urls);
        assert!(config.site_url.is_none());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "site_url = \"https://docs.example.com/\"\nexclude_patterns = [\"drafts/**\"]\n",
        )
        .unwrap();

        let config = SiteConfig::load_or_default(dir.path()).unwrap();
        assert_eq!(config.site_url.as_deref(), Some("https://docs.example.com/"));
        assert_eq!(config.exclude_patterns, vec!["drafts/**"]);
        assert_eq!(config.corpus_file, "content.json");
        assert_eq!(
            config.corpus_path_in(dir.path()),
            dir.path().join("site").join("content.json")
        );
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let config = SiteConfig {
            site_name: Some("Docs".to_string()),
            use_directory_urls: false,
            ..SiteConfig::default()
        };
        config.save(dir.path()).unwrap();

        assert_eq!(SiteConfig::load_or_default(dir.path()).unwrap(), config);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "enabled = \"maybe\"").unwrap();
        assert!(SiteConfig::load_or_default(dir.path()).is_err());
    }

    fn excludes(patterns: &[&str]) -> ExcludeSet {
        SiteConfig {
            exclude_patterns: patterns.iter().map(|p| p.to_string()).collect(),
            ..SiteConfig::default()
        }
        .exclude_set()
        .unwrap()
    }

    #[test]
    fn test_exclude_matching() {
        assert!(excludes(&["404.html"]).matches("404.html"));
        assert!(excludes(&["404.html"]).matches("de/404.html"));
        assert!(excludes(&["drafts/**"]).matches("drafts/wip/index.html"));
        assert!(excludes(&["**/*.html"]).matches("api/index.html"));
        assert!(excludes(&["*.htm"]).matches("old.htm"));
        assert!(excludes(&["a/*/x.html"]).matches("a/b/x.html"));
        assert!(!excludes(&["drafts/**"]).matches("guide/index.html"));
    }

    #[test]
    fn test_exclude_respects_segment_boundaries() {
        assert!(!excludes(&["drafts/**"]).matches("drafts-old/index.html"));
        assert!(!excludes(&["a/*/x.html"]).matches("a/b/c/x.html"));
        assert!(!excludes(&["api/*.html"]).matches("api/v1/index.html"));
        assert!(!excludes(&["404.html"]).matches("not404.html"));
        assert!(!ExcludeSet::default().matches("index.html"));
    }

    #[test]
    fn test_invalid_exclude_pattern() {
        let config = SiteConfig {
            exclude_patterns: vec!["[unclosed".to_string()],
            ..SiteConfig::default()
        };
        let err = config.exclude_set().unwrap_err();
        assert!(err.to_string().contains("[unclosed"));
    }
}
