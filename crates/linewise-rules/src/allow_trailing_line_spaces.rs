//! Ruler forbidding whitespace at the end of a line.
//!
//! # Configuration
//!
//! - `allow_trailing_line_spaces`: `true` turns the check off
//!   (default: false)

use linewise_core::{EventKind, LineContext, Problem, Ruler, Severity};

/// Rule code for allow_trailing_line_spaces.
pub const CODE: &str = "LW006";

/// Rule name for allow_trailing_line_spaces.
pub const NAME: &str = "allow_trailing_line_spaces";

/// Flags spaces or tabs right before a line break.
#[derive(Debug, Clone)]
pub struct AllowTrailingLineSpacesRuler {
    allow: bool,
    severity: Severity,
    problems: Vec<Problem>,
}

impl Default for AllowTrailingLineSpacesRuler {
    fn default() -> Self {
        Self::new(false)
    }
}

impl AllowTrailingLineSpacesRuler {
    /// Creates the ruler; with `allow` set it never reports.
    #[must_use]
    pub fn new(allow: bool) -> Self {
        Self {
            allow,
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

    fn report(&mut self, line: usize, column: usize, width: usize) {
        self.problems.push(
            Problem::new(
                CODE,
                NAME,
                self.severity,
                line,
                column,
                format!("Line has {width} trailing space(s)"),
            )
            .with_detail("actual_trailing_spaces", width),
        );
    }
}

/// Width of the blank run at the end of `text`, ignoring the terminator.
fn trailing_blank_width(text: &str) -> usize {
    let body = text.trim_end_matches(['\n', '\r']);
    body.chars()
        .rev()
        .take_while(|c| matches!(c, ' ' | '\t'))
        .count()
}

impl Ruler for AllowTrailingLineSpacesRuler {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids whitespace at the end of a line"
    }

    fn on_line_end(&mut self, ctx: &LineContext<'_>) {
        if self.allow {
            return;
        }

        let events = ctx.line.events();
        let Some(last) = events.last() else {
            return;
        };

        match last.kind {
            EventKind::Comment => {
                let width = trailing_blank_width(&last.text);
                if width > 0 {
                    let length = last.text.trim_end_matches(['\n', '\r']).chars().count();
                    self.report(ctx.lineno(), last.column() + length - width, width);
                }
            }
            EventKind::Space if !last.text.ends_with('\n') => {
                self.report(ctx.lineno(), last.column(), last.width());
            }
            EventKind::Newline | EventKind::IgnoredNewline => {
                let before = events.len().checked_sub(2).and_then(|i| events.get(i));
                if let Some(space) = before.filter(|e| e.kind == EventKind::Space) {
                    if !space.text.ends_with('\n') {
                        self.report(ctx.lineno(), space.column(), space.width());
                    }
                }
            }
            _ => {}
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

    fn trailing(source: &str) -> Vec<(usize, usize, Option<usize>)> {
        check(source, || Box::new(AllowTrailingLineSpacesRuler::new(false)))
            .iter()
            .map(|p| (p.line, p.column, p.detail("actual_trailing_spaces")))
            .collect()
    }

    #[test]
    fn test_clean_lines() {
        assert!(trailing("a = 1\n# note\n\nb = [1,\n  2]\n").is_empty());
    }

    #[test]
    fn test_code_with_trailing_spaces() {
        assert_eq!(trailing("a = 1  \nb = 2\n"), vec![(1, 5, Some(2))]);
    }

    #[test]
    fn test_blank_line_with_spaces() {
        assert_eq!(trailing("a = 1\n   \nb = 2\n"), vec![(2, 0, Some(3))]);
    }

    #[test]
    fn test_comment_with_trailing_spaces() {
        assert_eq!(trailing("a = 1 # note \n"), vec![(1, 12, Some(1))]);
    }

    #[test]
    fn test_last_line_without_newline() {
        assert_eq!(trailing("a = 1 "), vec![(1, 5, Some(1))]);
    }

    #[test]
    fn test_backslash_continuation_is_not_trailing_space() {
        assert!(trailing("a = 1 + \\\n  2\n").is_empty());
    }
}
