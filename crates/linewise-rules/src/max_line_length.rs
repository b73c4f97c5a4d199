//! Ruler limiting the length of source lines.
//!
//! Every physical line is checked, including the bodies of multi-line
//! strings and heredocs. Length is counted in characters, without the
//! line terminator.
//!
//! # Configuration
//!
//! - `max_line_length`: maximum characters per line (default: 80)

use linewise_core::{FileContext, Problem, Ruler, Severity};

/// Rule code for max_line_length.
pub const CODE: &str = "LW003";

/// Rule name for max_line_length.
pub const NAME: &str = "max_line_length";

/// Default maximum length.
pub const DEFAULT_MAX: usize = 80;

/// Flags lines longer than a configured maximum.
#[derive(Debug, Clone)]
pub struct MaxLineLengthRuler {
    max: usize,
    severity: Severity,
    problems: Vec<Problem>,
}

impl Default for MaxLineLengthRuler {
    fn default() -> Self {
        Self::new(DEFAULT_MAX)
    }
}

impl MaxLineLengthRuler {
    /// Creates a ruler allowing at most `max` characters per line.
    #[must_use]
    pub fn new(max: usize) -> Self {
        Self {
            max,
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

impl Ruler for MaxLineLengthRuler {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Limits the number of characters per line"
    }

    fn on_file_end(&mut self, file: &FileContext<'_>) {
        for (i, text) in file.source.lines().enumerate() {
            let length = text.chars().count();
            if length > self.max {
                self.problems.push(
                    Problem::new(
                        CODE,
                        NAME,
                        self.severity,
                        i + 1,
                        self.max,
                        format!("Line is {length} chars long, but should be {}", self.max),
                    )
                    .with_detail("actual_length", length)
                    .with_detail("should_be_at_most", self.max),
                );
            }
        }
    }

    fn problems(&self) -> &[Problem] {
        &self.problems
    }

    fn into_problems(self: Box<Self>) -> Vec<Problem> {
        self.problems
    }
}
