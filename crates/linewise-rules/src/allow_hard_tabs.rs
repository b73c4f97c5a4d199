//! Ruler forbidding hard tabs in whitespace.
//!
//! Tabs inside strings and comments are not whitespace events and are
//! left alone.
//!
//! # Configuration
//!
//! - `allow_hard_tabs`: `true` turns the check off (default: false)

use linewise_core::{Event, LineContext, Problem, Ruler, Severity};

/// Rule code for allow_hard_tabs.
pub const CODE: &str = "LW005";

/// Rule name for allow_hard_tabs.
pub const NAME: &str = "allow_hard_tabs";

/// Flags whitespace containing a tab character.
#[derive(Debug, Clone)]
pub struct AllowHardTabsRuler {
    allow: bool,
    severity: Severity,
    problems: Vec<Problem>,
}

impl Default for AllowHardTabsRuler {
    fn default() -> Self {
        Self::new(false)
    }
}

impl AllowHardTabsRuler {
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
}

impl Ruler for AllowHardTabsRuler {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids hard tabs in whitespace"
    }

    fn on_space(&mut self, event: &Event, ctx: &LineContext<'_>) {
        if self.allow || !event.text.contains('\t') {
            return;
        }
        self.problems.push(Problem::new(
            CODE,
            NAME,
            self.severity,
            ctx.lineno(),
            event.column(),
            "Hard tab found",
        ));
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

    #[test]
    fn test_tab_indentation() {
        let problems = check("def a\n\tx\nend\n", || Box::new(AllowHardTabsRuler::new(false)));
        assert_eq!(problems.len(), 1);
        assert_eq!((problems[0].line, problems[0].column), (2, 0));
    }

    #[test]
    fn test_tabs_in_strings_and_comments() {
        let source = "x = \"\t\"\n# \tnote\n";
        assert!(check(source, || Box::new(AllowHardTabsRuler::new(false))).is_empty());
    }

    #[test]
    fn test_allowed() {
        assert!(check("\tx\n", || Box::new(AllowHardTabsRuler::new(true))).is_empty());
    }
}
