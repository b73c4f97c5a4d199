//! Ruler checking the whitespace after `,`.
//!
//! A comma that ends its line (optionally followed by a comment) is not
//! measured.
//!
//! # Configuration
//!
//! - `spaces_after_comma`: required spaces after a comma (default: 1)

use linewise_core::{Event, EventKind, LineContext, Problem, Ruler, Severity};

/// Rule code for spaces_after_comma.
pub const CODE: &str = "LW007";

/// Rule name for spaces_after_comma.
pub const NAME: &str = "spaces_after_comma";

/// Default number of spaces.
pub const DEFAULT_SPACES: usize = 1;

/// Checks the number of spaces after each comma.
#[derive(Debug, Clone)]
pub struct SpacesAfterCommaRuler {
    spaces: usize,
    severity: Severity,
    problems: Vec<Problem>,
}

impl Default for SpacesAfterCommaRuler {
    fn default() -> Self {
        Self::new(DEFAULT_SPACES)
    }
}

impl SpacesAfterCommaRuler {
    /// Creates a ruler requiring `spaces` spaces after a comma.
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

fn ends_line(event: &Event) -> bool {
    event.kind.is_newline() || event.kind == EventKind::Comment || event.text.ends_with('\n')
}

impl Ruler for SpacesAfterCommaRuler {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Checks the number of spaces after a comma"
    }

    fn on_comma(&mut self, event: &Event, ctx: &LineContext<'_>) {
        let events = ctx.line.events();
        let Some(index) = ctx.line.event_index(event.column()) else {
            return;
        };

        let mut following = events[index + 1..].iter();
        let count = match following.next() {
            None => return,
            Some(next) if ends_line(next) => return,
            Some(next) if next.kind == EventKind::Space => {
                if following.next().is_some_and(ends_line) {
                    return;
                }
                next.width()
            }
            Some(_) => 0,
        };

        if count != self.spaces {
            self.problems.push(
                Problem::new(
                    CODE,
                    NAME,
                    self.severity,
                    ctx.lineno(),
                    event.column() + 1,
                    format!(
                        "Line has {count} space(s) after a comma, but should have {}",
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::check;

    fn commas(source: &str) -> Vec<(usize, usize, Option<usize>)> {
        check(source, || Box::new(SpacesAfterCommaRuler::new(1)))
            .iter()
            .map(|p| (p.line, p.column, p.detail("actual_spaces")))
            .collect()
    }

    #[test]
    fn test_single_space() {
        assert!(commas("foo(a, b, c)\n").is_empty());
    }

    #[test]
    fn test_missing_and_extra_spaces() {
        assert_eq!(commas("foo(a,b,  c)\n"), vec![(1, 6, Some(0)), (1, 8, Some(2))]);
    }

    #[test]
    fn test_comma_at_end_of_line() {
        assert!(commas("foo(a,\n  b)\nbar(a,  # note\n  b)\nbaz(a, \n  b)\n").is_empty());
    }

    #[test]
    fn test_commas_in_strings_are_ignored() {
        assert!(commas("x = \"a,b\"\n").is_empty());
    }
}
