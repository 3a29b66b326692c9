//! CLI interface using clap
//!
//! Provides the command-line interface for sitecorpus

mod commands;

pub use commands::*;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// sitecorpus - documentation corpus builder for chat widgets
#[derive(Parser, Debug)]
#[command(name = "sitecorpus")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the project root (defaults to current directory)
    #[arg(short, long, global = true, default_value = ".")]
    pub path: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json)
    #[arg(short = 'o', long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract every rendered page and write the corpus
    Build(BuildArgs),

    /// Extract a single HTML page and print its record
    Extract(ExtractArgs),

    /// Summarize an existing corpus file
    Inspect(InspectArgs),

    /// Show or reset configuration
    Config(ConfigArgs),
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Arguments for build command
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Rendered site directory (overrides site_dir)
    #[arg(short, long)]
    pub site_dir: Option<PathBuf>,

    /// Base URL the site is served from (overrides site_url)
    #[arg(short = 'u', long, env = "SITECORPUS_SITE_URL")]
    pub site_url: Option<String>,

    /// Corpus destination (defaults to <site_dir>/content.json)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

/// Arguments for extract command
#[derive(Parser, Debug)]
pub struct ExtractArgs {
    /// HTML file to extract, or "-" for stdin
    pub file: String,

    /// Page title (defaults to the document's <title>)
    #[arg(short, long)]
    pub title: Option<String>,

    /// Page URL recorded in the output
    #[arg(short, long, default_value = "")]
    pub url: String,
}

/// Arguments for inspect command
#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Corpus file (defaults to the configured location)
    pub file: Option<PathBuf>,

    /// List deep links for every anchor section
    #[arg(short, long)]
    pub anchors: bool,
}

/// Arguments for config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Show current configuration
    #[arg(long)]
    pub show: bool,

    /// Reset to defaults
    #[arg(long)]
    pub reset: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(["sitecorpus", "build", "--site-url", "https://x/"]);
        if let Commands::Build(args) = cli.command {
            assert_eq!(args.site_url.as_deref(), Some("https://x/"));
            assert!(args.site_dir.is_none());
        } else {
            panic!("expected build command");
        }
    }

    #[test]
    fn test_extract_command() {
        let cli = Cli::parse_from(["sitecorpus", "-o", "json", "extract", "page.html", "--url", "/p/"]);
        assert_eq!(cli.format, OutputFormat::Json);
        if let Commands::Extract(args) = cli.command {
            assert_eq!(args.file, "page.html");
            assert_eq!(args.url, "/p/");
            assert!(args.title.is_none());
        } else {
            panic!("expected extract command");
        }
    }

    #[test]
    fn test_inspect_command() {
        let cli = Cli::parse_from(["sitecorpus", "inspect", "--anchors"]);
        assert!(matches!(cli.command, Commands::Inspect(InspectArgs { anchors: true, file: None })));
    }
}
