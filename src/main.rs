//! Binary entry point for urldedup.
//!
//! This binary provides the CLI interface for social-media URL deduplication.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use urldedup::cli::{CleanCommand, ConfigCommand, NormalizeCommand};
use urldedup::config::UrlDedupConfig;
use urldedup::io::ReportFormat;
use urldedup::observability::{self, InitOptions};

/// urldedup - Social-media aware URL deduplication for CSV datasets.
#[derive(Parser)]
#[command(name = "urldedup")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true, env = "URLDEDUP_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Remove duplicate URLs from a CSV file.
    Clean {
        /// Input CSV file.
        input: PathBuf,

        /// Output file for kept rows (default: `<input>_deduplicated.csv`).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Column holding the URLs (default: detected from the header).
        #[arg(long)]
        column: Option<String>,

        /// Similarity threshold between 0 and 1.
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Disable the similarity check.
        #[arg(long)]
        no_similarity: bool,

        /// Also write removed rows with the duplicate reason to this file.
        #[arg(long)]
        removed: Option<PathBuf>,

        /// Summary format.
        #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },

    /// Show the normalized form and platform identity of URLs.
    Normalize {
        /// URLs to normalize.
        #[arg(required = true)]
        urls: Vec<String>,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },

    /// Print the effective configuration.
    Config,
}

/// Main entry point.
fn main() -> ExitCode {
    // A missing .env file is the common case.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match UrlDedupConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = observability::init_from_settings(
        &config.logging,
        InitOptions {
            verbose: cli.verbose,
        },
    ) {
        eprintln!("Failed to initialize observability: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli.command, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
fn run_command(command: Commands, mut config: UrlDedupConfig) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();

    match command {
        Commands::Clean {
            input,
            output,
            column,
            threshold,
            no_similarity,
            removed,
            format,
        } => {
            if let Some(column) = column {
                config.input.url_column = Some(column);
            }
            if let Some(threshold) = threshold {
                config.dedup.similarity_threshold = threshold;
            }
            if no_similarity {
                config.dedup.use_similarity = false;
            }

            let mut command = CleanCommand::new(&input).with_format(format);
            command.output = output;
            command.removed = removed;

            command
                .execute(&config, &mut stdout)
                .with_context(|| format!("failed to clean {}", input.display()))?;
        },
        Commands::Normalize { urls, format } => {
            NormalizeCommand::new(urls, format).execute(&mut stdout)?;
        },
        Commands::Config => {
            ConfigCommand::new().execute(&config, &mut stdout)?;
        },
    }

    Ok(())
}
