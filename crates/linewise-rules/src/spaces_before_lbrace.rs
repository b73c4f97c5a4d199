//! Ruler checking the whitespace in front of `{`.
//!
//! # Configuration
//!
//! - `spaces_before_lbrace`: required spaces before an opening brace
//!   (default: 1)

use linewise_core::{Event, EventKind, LexedLine, LineContext, Problem, Ruler, Severity};
use tracing::trace;

/// Rule code for spaces_before_lbrace.
pub const CODE: &str = "LW002";

/// Rule name for spaces_before_lbrace.
pub const NAME: &str = "spaces_before_lbrace";

/// Default number of spaces.
pub const DEFAULT_SPACES: usize = 1;

/// Checks the number of spaces before each `{`.
#[derive(Debug, Clone)]
pub struct SpacesBeforeLBraceRuler {
    spaces: usize,
    severity: Severity,
    problems: Vec<Problem>,
}

impl Default for SpacesBeforeLBraceRuler {
    fn default() -> Self {
        Self::new(DEFAULT_SPACES)
    }
}

impl SpacesBeforeLBraceRuler {
    /// Creates a ruler requiring `spaces` spaces before `{`.
    #[must_use]
    pub fn new(spaces: usize) -> Self {
        Self {
            spaces,
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

/// Width of the whitespace right before the event at `column`.
///
/// `Some(0)` when the previous event is not whitespace; `None` when the
/// event is the first on its line.
#[must_use]
pub fn count_spaces(line: &LexedLine, column: usize) -> Option<usize> {
    let index = line.event_index(column)?;
    let previous = line.events().get(index.checked_sub(1)?)?;

    if previous.kind == EventKind::Space {
        Some(previous.width())
    } else {
        Some(0)
    }
}

impl Ruler for SpacesBeforeLBraceRuler {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Checks the number of spaces before an opening brace"
    }

    fn on_lbrace(&mut self, event: &Event, ctx: &LineContext<'_>) {
        let Some(count) = count_spaces(ctx.line, event.column()) else {
            return;
        };
        trace!("Found {count} space(s) before lbrace");

        if count != self.spaces {
            self.problems.push(
                Problem::new(
                    CODE,
                    NAME,
                    self.severity,
                    ctx.lineno(),
                    event.column(),
                    format!(
                        "Line has {count} space(s) before a {{, but should have {}",
                        self.spaces
                    ),
                )
                .with_detail("actual_spaces", count)
                .with_detail("should_have", self.spaces),
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
