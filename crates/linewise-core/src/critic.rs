//! The critic: drives tokenization and ruler dispatch per file.

use crate::context::FileContext;
use crate::event::Tokenizer;
use crate::file_set::FileSet;
use crate::lexed_line::LexedLine;
use crate::ruler::{dispatch, LineContext, RulerSpec};
use crate::types::{CritiqueResult, Problem, Severity};

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Code of the file-level problem recorded for files that fail to lex.
pub const UNPARSABLE_CODE: &str = "LW000";

/// Errors that can occur while selecting files.
#[derive(Debug, Error)]
pub enum CriticError {
    /// IO error while expanding a selector.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Directory walk error.
    #[error("Failed to walk directory: {0}")]
    Walk(#[from] ignore::Error),

    /// No tokenizer was supplied to the builder.
    #[error("No tokenizer configured")]
    MissingTokenizer,
}

/// Builder for configuring a [`Critic`].
#[derive(Default)]
pub struct CriticBuilder {
    root: Option<PathBuf>,
    tokenizer: Option<Box<dyn Tokenizer>>,
    file_sets: Vec<FileSet>,
}

impl CriticBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the project root that selectors are resolved against.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Sets the tokenizer.
    #[must_use]
    pub fn tokenizer<T: Tokenizer + 'static>(mut self, tokenizer: T) -> Self {
        self.tokenizer = Some(Box::new(tokenizer));
        self
    }

    /// Adds a file set.
    #[must_use]
    pub fn file_set(mut self, file_set: FileSet) -> Self {
        self.file_sets.push(file_set);
        self
    }

    /// Adds multiple file sets.
    #[must_use]
    pub fn file_sets<I>(mut self, file_sets: I) -> Self
    where
        I: IntoIterator<Item = FileSet>,
    {
        self.file_sets.extend(file_sets);
        self
    }

    /// Builds the critic.
    ///
    /// # Errors
    ///
    /// Returns an error if no tokenizer was set or the current directory
    /// cannot be determined for a relative root.
    pub fn build(self) -> Result<Critic, CriticError> {
        let tokenizer = self.tokenizer.ok_or(CriticError::MissingTokenizer)?;
        let root = self.root.unwrap_or_else(|| PathBuf::from("."));
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        Ok(Critic {
            root,
            tokenizer,
            file_sets: self.file_sets,
            result: CritiqueResult::new(),
        })
    }
}

/// Runs every active ruler over every file of its file sets.
///
/// Use [`Critic::builder()`] to construct an instance. A critic lives for
/// one check run and accumulates the problems of every file it checks.
pub struct Critic {
    root: PathBuf,
    tokenizer: Box<dyn Tokenizer>,
    file_sets: Vec<FileSet>,
    result: CritiqueResult,
}

impl Critic {
    /// Creates a new builder for configuring a critic.
    #[must_use]
    pub fn builder() -> CriticBuilder {
        CriticBuilder::new()
    }

    /// Returns the project root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Checks every file of every file set.
    ///
    /// `on_file` is called once per file with its path, its problems and
    /// the label of its file set. Returns the number of problems found
    /// by this call.
    ///
    /// # Errors
    ///
    /// Returns an error if a file set's selectors cannot be expanded.
    /// Unreadable and unparsable files are recorded as problems instead.
    pub fn critique<F>(&mut self, mut on_file: F) -> Result<usize, CriticError>
    where
        F: FnMut(&Path, &[Problem], &str),
    {
        info!("Starting check at {:?}", self.root);

        let mut found = 0;
        let mut checked = CritiqueResult::new();

        for file_set in &self.file_sets {
            let files = file_set.files(&self.root)?;
            info!("Checking {} files in {:?}", files.len(), file_set.label());

            for path in &files {
                let problems = match std::fs::read_to_string(path) {
                    Ok(source) => self.check_source(path, &source, file_set.label(), file_set.rulers()),
                    Err(e) => {
                        warn!("Failed to read {}: {}", path.display(), e);
                        vec![Problem::new(
                            UNPARSABLE_CODE,
                            "unreadable",
                            Severity::Error,
                            1,
                            0,
                            format!("Could not read file: {e}"),
                        )]
                    }
                };

                on_file(path, &problems, file_set.label());
                found += problems.len();
                checked.record(path, problems);
            }
        }

        info!(
            "Check complete: {} problems in {} files",
            found, checked.files_checked
        );
        self.result.extend(checked);

        Ok(found)
    }

    /// Checks one source text with fresh instances of `rulers`.
    ///
    /// Returns the problems ordered by line, then column. A source the
    /// tokenizer rejects yields a single `unparsable` problem.
    #[must_use]
    pub fn check_source(
        &self,
        path: &Path,
        source: &str,
        label: &str,
        rulers: &[RulerSpec],
    ) -> Vec<Problem> {
        debug!("Checking: {}", path.display());

        let events = match self.tokenizer.tokenize(source) {
            Ok(events) => events,
            Err(e) => {
                warn!("Failed to tokenize {}: {}", path.display(), e);
                return vec![Problem::new(
                    UNPARSABLE_CODE,
                    "unparsable",
                    Severity::Error,
                    e.line,
                    e.column,
                    format!("Could not tokenize file: {e}"),
                )];
            }
        };

        let file = FileContext::new(path, source, label, &self.root);
        let lines = LexedLine::split_lines(events);
        let mut active: Vec<_> = rulers.iter().map(RulerSpec::build).collect();

        for ruler in &mut active {
            for line in &lines {
                let ctx = LineContext::new(&file, line);
                ruler.on_line_begin(&ctx);
                for event in line.events() {
                    dispatch(ruler.as_mut(), event, &ctx);
                }
                ruler.on_line_end(&ctx);
            }
            ruler.on_file_end(&file);
        }

        let mut problems: Vec<Problem> = active
            .into_iter()
            .flat_map(|ruler| ruler.into_problems())
            .collect();
        problems.sort_by(|a, b| a.line.cmp(&b.line).then(a.column.cmp(&b.column)));
        problems
    }

    /// Problems accumulated over every `critique` call so far.
    #[must_use]
    pub fn result(&self) -> &CritiqueResult {
        &self.result
    }

    /// Consumes the critic, returning the accumulated result.
    #[must_use]
    pub fn into_result(self) -> CritiqueResult {
        self.result
    }

    /// Running total of problems found.
    #[must_use]
    pub fn problem_count(&self) -> usize {
        self.result.problem_count()
    }
}
