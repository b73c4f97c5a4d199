//! Shared output formatting for check results.

use anyhow::Result;
use linewise_core::{CritiqueResult, ProblemDiagnostic, Severity};
use miette::{NamedSource, Report};
use std::fmt::Write;
use std::path::Path;

use crate::OutputFormat;

/// Print check results in the specified format.
///
/// Paths are shown relative to `root` where possible.
pub fn print(result: &CritiqueResult, root: &Path, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result, root),
        OutputFormat::Compact => print!("{}", render_compact(result, root)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(result)?),
        OutputFormat::Pretty => print_pretty(result, root),
    }
    Ok(())
}

fn display_path<'a>(path: &'a Path, root: &Path) -> std::path::Display<'a> {
    path.strip_prefix(root).unwrap_or(path).display()
}

fn summary(result: &CritiqueResult) -> String {
    let (errors, warnings) = result.count_by_severity();
    format!(
        "Found {} error(s), {} warning(s) in {} file(s)",
        errors, warnings, result.files_checked
    )
}

fn print_text(result: &CritiqueResult, root: &Path) {
    let (errors, warnings) = result.count_by_severity();

    for (path, problem) in result.iter() {
        let severity_indicator = match problem.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",
            Severity::Warning => "\x1b[33mwarning\x1b[0m",
        };

        println!(
            "{} {} at {}:{}:{}",
            problem.code,
            problem.rule,
            display_path(path, root),
            problem.line,
            problem.column,
        );
        println!("  {}: {}", severity_indicator, problem.message);
        println!();
    }

    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };
    println!("{summary_color}{}\x1b[0m", summary(result));
}

/// One line per problem: `path:line:column: severity [code] message`.
pub fn render_compact(result: &CritiqueResult, root: &Path) -> String {
    let mut out = String::new();
    for (path, problem) in result.iter() {
        let _ = writeln!(out, "{}:{}", display_path(path, root), problem);
    }
    out
}

fn print_pretty(result: &CritiqueResult, root: &Path) {
    for (path, problems) in &result.problems {
        if problems.is_empty() {
            continue;
        }
        let name = display_path(path, root).to_string();
        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => {
                tracing::warn!("Cannot re-read {} for display: {}", name, e);
                for problem in problems {
                    println!("{name}:{problem}");
                }
                continue;
            }
        };

        for problem in problems {
            let report = Report::new(ProblemDiagnostic::new(problem, &source))
                .with_source_code(NamedSource::new(&name, source.clone()));
            println!("{report:?}");
        }
    }
    println!("{}", summary(result));
}
