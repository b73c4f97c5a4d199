//! Problems and run results.

use miette::{Diagnostic, SourceSpan};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Severity level for problems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Should be addressed, does not fail the run by default.
    #[serde(alias = "warn")]
    Warning,
    /// Must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "warning" | "warn" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown severity `{other}`; expected `warning` or `error`")),
        }
    }
}

/// One style violation found in a file.
///
/// Problems are immutable once built; the builder methods consume `self`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    /// Rule code (e.g., "LW001").
    pub code: String,
    /// Rule name (e.g., "indentation_spaces").
    pub rule: String,
    /// Severity of this problem.
    pub severity: Severity,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column (0-indexed).
    pub column: usize,
    /// Human-readable message.
    pub message: String,
    /// Named measurements, e.g. `actual_spaces` and `should_have`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub details: BTreeMap<String, usize>,
}

impl Problem {
    /// Creates a new problem without details.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        line: usize,
        column: usize,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            severity,
            line,
            column,
            message: message.into(),
            details: BTreeMap::new(),
        }
    }

    /// Adds a named measurement.
    #[must_use]
    pub fn with_detail(mut self, key: impl Into<String>, value: usize) -> Self {
        self.details.insert(key.into(), value);
        self
    }

    /// Looks up a named measurement.
    #[must_use]
    pub fn detail(&self, key: &str) -> Option<usize> {
        self.details.get(key).copied()
    }
}

impl std::fmt::Display for Problem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}: {} [{}] {}",
            self.line, self.column, self.severity, self.code, self.message
        )
    }
}

/// A problem rendered as a miette diagnostic against its source text.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("[{code}] {message}")]
pub struct ProblemDiagnostic {
    code: String,
    message: String,
    #[label("{rule}")]
    span: SourceSpan,
    rule: String,
}

impl ProblemDiagnostic {
    /// Builds a diagnostic, locating the problem's line/column in `source`.
    #[must_use]
    pub fn new(problem: &Problem, source: &str) -> Self {
        let offset = crate::context::byte_offset(source, problem.line, problem.column);
        Self {
            code: problem.code.clone(),
            message: problem.message.clone(),
            span: SourceSpan::from((offset, 1)),
            rule: problem.rule.clone(),
        }
    }
}

/// Result of a check run: problems grouped by file.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct CritiqueResult {
    /// Problems per file, in path order.
    pub problems: BTreeMap<PathBuf, Vec<Problem>>,
    /// Number of files checked.
    pub files_checked: usize,
}

impl CritiqueResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the problems for one file.
    pub fn record(&mut self, path: &Path, problems: Vec<Problem>) {
        self.files_checked += 1;
        self.problems
            .entry(path.to_path_buf())
            .or_default()
            .extend(problems);
    }

    /// Total number of problems across all files.
    #[must_use]
    pub fn problem_count(&self) -> usize {
        self.problems.values().map(Vec::len).sum()
    }

    /// Iterates over every problem together with its file.
    pub fn iter(&self) -> impl Iterator<Item = (&Path, &Problem)> {
        self.problems
            .iter()
            .flat_map(|(path, problems)| problems.iter().map(move |p| (path.as_path(), p)))
    }

    /// Counts problems by severity: `(errors, warnings)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize) {
        let errors = self
            .iter()
            .filter(|(_, p)| p.severity == Severity::Error)
            .count();
        (errors, self.problem_count() - errors)
    }

    /// Checks if any problem meets or exceeds the given severity.
    #[must_use]
    pub fn has_problems_at(&self, severity: Severity) -> bool {
        self.iter().any(|(_, p)| p.severity >= severity)
    }

    /// Formats problems at or above `fail_on` as a multi-line report.
    ///
    /// Suitable for `panic!()` messages in `cargo test` integration.
    #[must_use]
    pub fn format_report(&self, fail_on: Severity) -> String {
        use std::fmt::Write;

        let failing: Vec<(&Path, &Problem)> =
            self.iter().filter(|(_, p)| p.severity >= fail_on).collect();

        let mut report = String::new();
        let _ = writeln!(report, "\n=== linewise: {} problem(s) ===\n", failing.len());

        for (path, p) in &failing {
            let _ = writeln!(
                report,
                "{} [{}] at {}:{}:{}",
                p.rule,
                p.code,
                path.display(),
                p.line,
                p.column,
            );
            let _ = writeln!(report, "  {}: {}", p.severity, p.message);
        }

        let (errors, warnings) = self.count_by_severity();
        let _ = writeln!(
            report,
            "\nTotal: {} error(s), {} warning(s) in {} file(s)",
            errors, warnings, self.files_checked
        );

        report
    }

    /// Adds problems from another result.
    pub fn extend(&mut self, other: Self) {
        for (path, problems) in other.problems {
            self.problems.entry(path).or_default().extend(problems);
        }
        self.files_checked += other.files_checked;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_problem(severity: Severity) -> Problem {
        Problem::new(
            "LW001",
            "indentation_spaces",
            severity,
            3,
            4,
            "Line is indented to 4, but should be at 2",
        )
        .with_detail("actual_indentation", 4)
        .with_detail("should_be", 2)
    }

    #[test]
    fn problem_details_are_queryable() {
        let p = make_problem(Severity::Error);
        assert_eq!(p.detail("should_be"), Some(2));
        assert_eq!(p.detail("missing"), None);
    }

    #[test]
    fn problem_display() {
        let p = make_problem(Severity::Warning);
        insta::assert_snapshot!(p.to_string(), @"3:4: warning [LW001] Line is indented to 4, but should be at 2");
    }

    #[test]
    fn severity_parses_warn_alias() {
        assert_eq!("warn".parse::<Severity>(), Ok(Severity::Warning));
        assert_eq!("error".parse::<Severity>(), Ok(Severity::Error));
        assert!("off".parse::<Severity>().is_err());
    }

    #[test]
    fn result_counts_across_files() {
        let mut result = CritiqueResult::new();
        result.record(Path::new("a.rb"), vec![make_problem(Severity::Error)]);
        result.record(
            Path::new("b.rb"),
            vec![make_problem(Severity::Warning), make_problem(Severity::Error)],
        );
        result.record(Path::new("c.rb"), Vec::new());

        assert_eq!(result.files_checked, 3);
        assert_eq!(result.problem_count(), 3);
        assert_eq!(result.count_by_severity(), (2, 1));
        assert!(result.has_problems_at(Severity::Error));
    }

    #[test]
    fn extend_merges_partitions() {
        let mut left = CritiqueResult::new();
        left.record(Path::new("a.rb"), vec![make_problem(Severity::Error)]);
        let mut right = CritiqueResult::new();
        right.record(Path::new("b.rb"), vec![make_problem(Severity::Warning)]);

        left.extend(right);
        assert_eq!(left.problem_count(), 2);
        assert_eq!(left.files_checked, 2);
    }

    #[test]
    fn format_report_filters_by_severity() {
        let mut result = CritiqueResult::new();
        result.record(
            Path::new("lib/a.rb"),
            vec![make_problem(Severity::Warning), make_problem(Severity::Error)],
        );

        let report = result.format_report(Severity::Error);
        assert!(report.contains("1 problem(s)"));
        assert!(report.contains("indentation_spaces [LW001] at lib/a.rb:3:4"));
        assert!(report.contains("Total: 1 error(s), 1 warning(s) in 1 file(s)"));
    }
}
