use anyhow::Result;
use clap::{Parser, Subcommand};
use harkit_cli::OutputFormat;
use harkit_cli::commands;
use harkit_cli::commands::scrub::ScrubOptions;
use harkit_core::scrub::DEFAULT_PLACEHOLDER;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "harkit")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "A CLI tool for normalizing, inspecting and scrubbing HTTP Archive (HAR) files",
    long_about = "harkit reads HAR 1.2 captures, re-emits them in canonical form, \
                  re-derives cookies from headers and redacts credentials before sharing."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Re-emit a HAR file in canonical form
    Normalize {
        /// Path to the HAR file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Write the result to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Redact or remove headers and strip timings
    Scrub {
        /// Path to the HAR file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// JSON scrub policy, applied before any flags
        #[arg(long)]
        policy: Option<PathBuf>,

        /// Redact headers whose names look like credentials
        #[arg(long)]
        defaults: bool,

        /// Redact the named header (repeatable)
        #[arg(long, value_name = "NAME")]
        redact: Vec<String>,

        /// Redact headers whose names match a regex (repeatable)
        #[arg(long, value_name = "REGEX")]
        redact_pattern: Vec<String>,

        /// Remove the named header (repeatable)
        #[arg(long, value_name = "NAME")]
        remove: Vec<String>,

        /// Remove headers whose names match a regex (repeatable)
        #[arg(long, value_name = "REGEX")]
        remove_pattern: Vec<String>,

        /// Reset entry and page timings to -1
        #[arg(long)]
        strip_timings: bool,

        /// Replacement text for redacted values
        #[arg(long, default_value = DEFAULT_PLACEHOLDER)]
        placeholder: String,

        /// Write the result to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show cookies derived from each entry's headers
    Cookies {
        /// Path to the HAR file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "pretty")]
        format: OutputFormat,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match cli.command {
        Commands::Normalize { file, output } => {
            commands::normalize::execute(&file, output.as_deref())?;
        }
        Commands::Scrub {
            file,
            policy,
            defaults,
            redact,
            redact_pattern,
            remove,
            remove_pattern,
            strip_timings,
            placeholder,
            output,
        } => {
            let options = ScrubOptions {
                policy,
                defaults,
                redact,
                redact_pattern,
                remove,
                remove_pattern,
                strip_timings,
                placeholder,
            };
            let report = commands::scrub::execute(&file, &options, output.as_deref())?;
            tracing::info!(
                "Redacted {} headers, removed {} headers, stripped timings on {} entries",
                report.redacted_headers,
                report.removed_headers,
                report.stripped_entries
            );
        }
        Commands::Cookies { file, format } => commands::cookies::execute(&file, format)?,
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("harkit=debug,harkit_cli=debug,harkit_core=debug")
    } else {
        EnvFilter::new("harkit=info,harkit_cli=info,harkit_core=warn")
    };

    // stdout carries HAR and JSON output
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
