//! Ruler checking that each line is indented by the expected number of
//! spaces.
//!
//! # Detected Patterns
//!
//! - Block bodies (`def`, `class`, `do`, `if`, ...) not one width deeper
//!   than their opener
//! - `end`, `}`, `]` and `)` that lead a line but are not aligned with
//!   the line that opened the construct
//! - `else`/`elsif`/`when`/`rescue`/`ensure` not aligned with their block
//! - Continuation lines (after a trailing operator, comma, period or
//!   backslash) not one width deeper
//!
//! Blank lines, the closing line of a multi-line string and lines that
//! begin an `=begin` document or the `__END__` section are not measured;
//! the body of a multi-line string is never measured.
//!
//! # Configuration
//!
//! - `indentation_spaces`: columns per nesting level (default: 2)

use crate::indentation_manager::IndentationManager;
use linewise_core::{
    Event, EventKind, FileContext, LexedLine, LineContext, Problem, Ruler, Severity, Token,
};
use tracing::{debug, trace};

/// Rule code for indentation_spaces.
pub const CODE: &str = "LW001";

/// Rule name for indentation_spaces.
pub const NAME: &str = "indentation_spaces";

/// Default indent width.
pub const DEFAULT_SPACES: usize = 2;

/// Checks line indentation against the nesting of open constructs.
#[derive(Debug, Clone)]
pub struct IndentationSpacesRuler {
    manager: IndentationManager,
    severity: Severity,
    measure_line: bool,
    problems: Vec<Problem>,
}

impl Default for IndentationSpacesRuler {
    fn default() -> Self {
        Self::new(DEFAULT_SPACES)
    }
}

impl IndentationSpacesRuler {
    /// Creates a ruler expecting `spaces` columns per nesting level.
    #[must_use]
    pub fn new(spaces: usize) -> Self {
        Self {
            manager: IndentationManager::new(spaces),
            severity: Severity::Error,
            measure_line: false,
            problems: Vec::new(),
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// The underlying state machine.
    #[must_use]
    pub fn manager(&self) -> &IndentationManager {
        &self.manager
    }

    fn open(&mut self, event: &Event, ctx: &LineContext<'_>) {
        self.manager
            .update_for_opening_reason(&Token::new(event, ctx.line));
    }

    fn close(&mut self, event: &Event, ctx: &LineContext<'_>) {
        self.manager.update_for_closing_reason(event, ctx.line);
    }
}

/// Whether `line` starts an embedded document or the data section, both
/// of which Ruby pins to column 0.
fn starts_column_zero_comment(line: &LexedLine) -> bool {
    line.first_non_space_element().is_some_and(|first| {
        first.kind == EventKind::Comment
            && (first.text.starts_with("=begin") || first.text.starts_with("__END__"))
    })
}

impl Ruler for IndentationSpacesRuler {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Checks that lines are indented by the expected number of spaces"
    }

    fn on_line_begin(&mut self, ctx: &LineContext<'_>) {
        self.measure_line = self.manager.is_measuring()
            && !ctx.line.only_spaces()
            && !ctx.line.end_of_multi_line_string()
            && !starts_column_zero_comment(ctx.line);

        if self.measure_line {
            self.manager.update_actual_indentation(ctx.line);
        }
    }

    fn on_line_end(&mut self, ctx: &LineContext<'_>) {
        let line = ctx.line.remove_trailing_comment(ctx.source());
        self.manager.set_up_line_transition();

        if self.measure_line {
            let actual = self.manager.actual_indentation();
            let should_be = self.manager.should_be_at();
            if actual != should_be {
                debug!(
                    line = ctx.lineno(),
                    actual, should_be, "Indentation mismatch"
                );
                self.problems.push(
                    Problem::new(
                        CODE,
                        NAME,
                        self.severity,
                        ctx.lineno(),
                        actual,
                        format!("Line is indented to {actual}, but should be at {should_be}"),
                    )
                    .with_detail("actual_indentation", actual)
                    .with_detail("should_be", should_be),
                );
            }
        }

        self.manager.update_for_line_continuation(&line);
        self.manager.transition_lines();
    }

    fn on_file_end(&mut self, file: &FileContext<'_>) {
        if !self.manager.reasons().is_empty() {
            trace!(
                path = %file.path.display(),
                open = self.manager.reasons().len(),
                "File ended with open constructs"
            );
        }
    }

    fn on_keyword(&mut self, event: &Event, ctx: &LineContext<'_>) {
        let token = Token::new(event, ctx.line);
        if token.is_symbol_name() {
            return;
        }

        if token.is_block_closer() {
            self.close(event, ctx);
        } else if token.is_block_opener() || token.is_continuation_keyword() {
            self.open(event, ctx);
        }
    }

    fn on_lbrace(&mut self, event: &Event, ctx: &LineContext<'_>) {
        self.open(event, ctx);
    }

    fn on_lbracket(&mut self, event: &Event, ctx: &LineContext<'_>) {
        self.open(event, ctx);
    }

    fn on_lparen(&mut self, event: &Event, ctx: &LineContext<'_>) {
        self.open(event, ctx);
    }

    fn on_rbrace(&mut self, event: &Event, ctx: &LineContext<'_>) {
        self.close(event, ctx);
    }

    fn on_rbracket(&mut self, event: &Event, ctx: &LineContext<'_>) {
        self.close(event, ctx);
    }

    fn on_rparen(&mut self, event: &Event, ctx: &LineContext<'_>) {
        self.close(event, ctx);
    }

    fn on_embexpr_begin(&mut self, _event: &Event, _ctx: &LineContext<'_>) {
        self.manager.interpolation_begin();
    }

    fn on_embexpr_end(&mut self, _event: &Event, _ctx: &LineContext<'_>) {
        self.manager.interpolation_end();
    }

    fn on_string_begin(&mut self, event: &Event, ctx: &LineContext<'_>) {
        if !ctx.line.string_closes_on_line(event.column()) {
            self.manager.string_begin(ctx.lineno());
        }
    }

    fn on_string_end(&mut self, event: &Event, ctx: &LineContext<'_>) {
        if !ctx.line.string_opened_on_line(event.column()) {
            self.manager.string_end();
        }
    }

    fn problems(&self) -> &[Problem] {
        &self.problems
    }

    fn into_problems(self: Box<Self>) -> Vec<Problem> {
        self.problems
    }
}
