//! Ruler checking how many newlines end a file.
//!
//! # Configuration
//!
//! - `trailing_newlines`: newlines required at the end of the file
//!   (default: 1)

use linewise_core::{FileContext, Problem, Ruler, Severity};

/// Rule code for trailing_newlines.
pub const CODE: &str = "LW004";

/// Rule name for trailing_newlines.
pub const NAME: &str = "trailing_newlines";

/// Default number of trailing newlines.
pub const DEFAULT_COUNT: usize = 1;

/// Requires a file to end with an exact number of newlines.
#[derive(Debug, Clone)]
pub struct TrailingNewlinesRuler {
    count: usize,
    severity: Severity,
    problems: Vec<Problem>,
}

impl Default for TrailingNewlinesRuler {
    fn default() -> Self {
        Self::new(DEFAULT_COUNT)
    }
}

impl TrailingNewlinesRuler {
    /// Creates a ruler requiring `count` trailing newlines.
    #[must_use]
    pub fn new(count: usize) -> Self {
        Self {
            count,
            severity: Severity::Error,
            problems: Vec::new(),
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

/// Number of newlines at the end of `source`; `\r\n` counts once.
fn trailing_newlines(source: &str) -> usize {
    source
        .chars()
        .rev()
        .take_while(|c| matches!(c, '\n' | '\r'))
        .filter(|c| *c == '\n')
        .count()
}

impl Ruler for TrailingNewlinesRuler {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Checks the number of newlines at the end of a file"
    }

    fn on_file_end(&mut self, file: &FileContext<'_>) {
        if file.source.is_empty() {
            return;
        }

        let actual = trailing_newlines(file.source);
        if actual != self.count {
            let line = file.source.lines().count().max(1);
            self.problems.push(
                Problem::new(
                    CODE,
                    NAME,
                    self.severity,
                    line,
                    0,
                    format!(
                        "File has {actual} trailing newline(s), but should have {}",
                        self.count
                    ),
                )
                .with_detail("actual_trailing_newlines", actual)
                .with_detail("should_have", self.count),
            );
        }
    }

    fn problems(&self) -> &[Problem] {
        &self.problems
    }

    fn into_problems(self: Box<Self>) -> Vec<Problem> {
        self.problems
    }
}
