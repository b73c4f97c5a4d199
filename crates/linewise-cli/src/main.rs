//! linewise CLI tool.
//!
//! Usage:
//! ```bash
//! linewise check [OPTIONS] [PATHS]...
//! linewise list-rules
//! linewise init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use linewise_core::Severity;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Token-stream style checker for Ruby sources
#[derive(Parser)]
#[command(name = "linewise")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "LINEWISE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check files for style problems
    Check {
        /// Files or directories to check (default: configured file sets)
        paths: Vec<PathBuf>,

        /// Project root used to resolve configuration and selectors
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Label reported for explicitly given paths
        #[arg(long)]
        label: Option<String>,

        /// Lowest severity that fails the run (overrides the config file)
        #[arg(long)]
        fail_on: Option<Severity>,
    },

    /// List available rules
    ListRules,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for check results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// One-line-per-problem compact format.
    Compact,
    /// JSON output.
    Json,
    /// Source excerpts rendered with miette.
    Pretty,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check {
            paths,
            root,
            format,
            label,
            fail_on,
        } => {
            let source = config_resolver::resolve(&root, cli.config.as_deref());
            let options = commands::check::CheckOptions {
                root,
                paths,
                format,
                label,
                fail_on,
            };
            if commands::check::run(&options, &source)? {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::ListRules => {
            commands::list_rules::run();
            Ok(())
        }
        Commands::Init { force } => commands::init::run(force),
    }
}
