//! sitecorpus - documentation corpus builder
//!
//! Extracts a retrieval corpus from a rendered documentation site so a chat
//! widget can ground its answers in the site's pages.

use anyhow::Result;
use clap::Parser;
use sitecorpus::cli::{
    Cli, Commands, OutputFormat,
    build, config, extract_page, inspect,
    print_json, print_overview_text, print_summary_text,
};
use std::path::Path;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Get project path
    let project_path = Path::new(&cli.path);

    // Execute command
    match cli.command {
        Commands::Build(args) => {
            let summary = build(project_path, &args)?;

            match cli.format {
                OutputFormat::Json => print_json(&summary)?,
                OutputFormat::Text => print_summary_text(summary.as_ref()),
            }
        }

        Commands::Extract(args) => {
            match extract_page(&args.file, args.title.as_deref(), &args.url)? {
                Some(record) => match cli.format {
                    OutputFormat::Json => print_json(&record)?,
                    OutputFormat::Text => println!("{}", record.content),
                },
                None => eprintln!("No content container found; page would be skipped."),
            }
        }

        Commands::Inspect(args) => {
            let pages = inspect(project_path, args.file.as_deref())?;

            match cli.format {
                OutputFormat::Json => print_json(&pages)?,
                OutputFormat::Text => print_overview_text(&pages, args.anchors),
            }
        }

        Commands::Config(args) => {
            config(project_path, &args)?;
        }
    }

    Ok(())
}
