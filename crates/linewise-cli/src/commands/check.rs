//! Check command implementation.

use anyhow::{Context, Result};
use linewise_core::{Config, Critic, Severity};
use linewise_lexer::RubyLexer;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Options of one `check` invocation.
#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// Project root selectors are resolved against.
    pub root: PathBuf,
    /// Explicit files or directories; empty means the configured file sets.
    pub paths: Vec<PathBuf>,
    /// Output format.
    pub format: OutputFormat,
    /// Label for explicit paths.
    pub label: Option<String>,
    /// Fail threshold overriding the configured one.
    pub fail_on: Option<Severity>,
}

/// Loads the configuration the resolver pointed at.
pub fn load_config(source: &ConfigSource) -> Result<Config> {
    let Some(path) = source.path() else {
        debug!("No config file found, using defaults");
        return Ok(Config::default());
    };
    if source.is_global() {
        info!("Using global config: {}", path.display());
    }
    Config::from_file(path).with_context(|| format!("Failed to load config: {}", path.display()))
}

/// Runs the check command.
///
/// Returns `true` when problems at or above the fail threshold were found.
pub fn run(options: &CheckOptions, source: &ConfigSource) -> Result<bool> {
    let mut config = load_config(source)?;

    if !options.paths.is_empty() {
        let cwd = std::env::current_dir().context("Failed to read current directory")?;
        let paths = options
            .paths
            .iter()
            .map(|p| cwd.join(p).to_string_lossy().into_owned())
            .collect();
        config = config.with_paths(paths, options.label.clone());
    }

    let fail_on = options.fail_on.unwrap_or(config.fail_on);
    let file_sets =
        linewise_rules::registry::file_sets(&config).context("Invalid style configuration")?;

    let mut critic = Critic::builder()
        .root(&options.root)
        .tokenizer(RubyLexer::new())
        .file_sets(file_sets)
        .build()
        .context("Failed to build critic")?;

    info!("Checking {}", critic.root().display());

    let found = critic
        .critique(|path, problems, label| {
            debug!("{} [{}]: {} problem(s)", path.display(), label, problems.len());
        })
        .context("Check failed")?;

    let root = critic.root().to_path_buf();
    let result = critic.into_result();
    super::output::print(&result, &root, options.format)?;

    debug!("{} problem(s) found, failing on {}", found, fail_on);
    Ok(result.has_problems_at(fail_on))
}
