//! Indentation state machine used by [`IndentationSpacesRuler`].
//!
//! The manager tracks what indentation the current and the next line
//! should have, given the constructs opened so far, and what the current
//! line actually has. It never fails: unbalanced closers clamp the
//! expectation at zero and checking continues.
//!
//! [`IndentationSpacesRuler`]: crate::IndentationSpacesRuler

use linewise_core::{Event, EventKind, LexedLine, Token};
use tracing::trace;

/// The three bracket pairs that open an indentation reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketKind {
    /// `{ }`
    Brace,
    /// `[ ]`
    Bracket,
    /// `( )`
    Paren,
}

impl BracketKind {
    /// All bracket kinds.
    pub const ALL: [Self; 3] = [Self::Brace, Self::Bracket, Self::Paren];

    /// Event category of the opening bracket.
    #[must_use]
    pub fn opener(self) -> EventKind {
        match self {
            Self::Brace => EventKind::LBrace,
            Self::Bracket => EventKind::LBracket,
            Self::Paren => EventKind::LParen,
        }
    }

    /// Bracket kind opened by `kind`, if any.
    #[must_use]
    pub fn from_opener(kind: EventKind) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.opener() == kind)
    }
}

/// One entry of the reason stack: a construct that needs a matching close.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndentReason {
    /// Category of the opening event.
    pub kind: EventKind,
    /// Text of the opening event (`def`, `{`, ...).
    pub token: String,
    /// Line the construct was opened on.
    pub line: usize,
    /// Expected indentation of the opening line when it was pushed.
    pub should_be_at: usize,
}

/// Per-file indentation state.
#[derive(Debug, Clone)]
pub struct IndentationManager {
    spaces: usize,
    this_line: usize,
    next_line: usize,
    pending_decrement: usize,
    actual_indentation: usize,
    reasons: Vec<IndentReason>,
    string_nesting: Vec<usize>,
    interpolations: Vec<usize>,
    measuring: bool,
    continuation: bool,
}

impl IndentationManager {
    /// Creates a manager expecting `spaces` columns per nesting level.
    #[must_use]
    pub fn new(spaces: usize) -> Self {
        Self {
            spaces,
            this_line: 0,
            next_line: 0,
            pending_decrement: 0,
            actual_indentation: 0,
            reasons: Vec::new(),
            string_nesting: Vec::new(),
            interpolations: Vec::new(),
            measuring: true,
            continuation: false,
        }
    }

    /// Indent width in columns.
    #[must_use]
    pub fn spaces(&self) -> usize {
        self.spaces
    }

    /// Indentation the current line should have.
    #[must_use]
    pub fn should_be_at(&self) -> usize {
        self.this_line
    }

    /// Indentation the next line should have, as known so far.
    #[must_use]
    pub fn next_should_be_at(&self) -> usize {
        self.next_line
    }

    /// Indentation the current line actually has.
    #[must_use]
    pub fn actual_indentation(&self) -> usize {
        self.actual_indentation
    }

    /// Open constructs, innermost last.
    #[must_use]
    pub fn reasons(&self) -> &[IndentReason] {
        &self.reasons
    }

    /// Whether expectations are currently being tracked.
    #[must_use]
    pub fn is_measuring(&self) -> bool {
        self.measuring
    }

    /// Whether a multi-line string literal is open.
    #[must_use]
    pub fn in_string(&self) -> bool {
        !self.string_nesting.is_empty()
    }

    /// Whether an interpolation is open at the current nesting depth.
    #[must_use]
    pub fn in_interpolation(&self) -> bool {
        self.interpolations.last() == Some(&self.reasons.len())
    }

    /// Resumes tracking.
    pub fn start(&mut self) {
        trace!(should_be_at = self.this_line, "Starting indentation ruling");
        self.measuring = true;
    }

    /// Suspends tracking until [`start`](Self::start) is called.
    pub fn stop(&mut self) {
        if self.measuring {
            trace!(
                should_be_at = self.this_line,
                actual = self.actual_indentation,
                "Stopping indentation ruling"
            );
        }
        self.measuring = false;
    }

    /// Lowers the current line's expectation by one width, clamped at 0.
    pub fn decrease_this_line(&mut self) {
        if !self.measuring {
            trace!("decrease_this_line called, but checking is stopped");
            return;
        }
        self.this_line = self.this_line.saturating_sub(self.spaces);
        trace!(this_line = self.this_line, next_line = self.next_line);
    }

    /// Applies the decrement accumulated by continuation keywords.
    ///
    /// Called at the end of a line, before comparing.
    pub fn set_up_line_transition(&mut self) {
        trace!(pending = self.pending_decrement, "Setting up line transition");
        if self.pending_decrement > 0 {
            self.decrease_this_line();
        }
    }

    /// Moves to the next line: the next line's expectation becomes the
    /// current one. Suspends tracking if a multi-line string is open.
    pub fn transition_lines(&mut self) {
        if self.measuring {
            self.pending_decrement = 0;
            self.this_line = self.next_line;
            trace!(this_line = self.this_line, "Transitioning lines");
        } else {
            trace!("Skipping transition; checking is stopped");
        }

        if self.in_string() {
            self.stop();
        }
    }

    /// Records the indentation of `line`'s first non-space event.
    ///
    /// The tail of a multi-line string and blank lines are skipped.
    pub fn update_actual_indentation(&mut self, line: &LexedLine) {
        if line.end_of_multi_line_string() {
            trace!("Found end of multi-line string");
            return;
        }
        if let Some(first) = line.first_non_space_element() {
            self.actual_indentation = first.column();
            trace!(actual = self.actual_indentation, "Actual indentation");
        }
    }

    /// Whether `line` ends with an operator, comma, period or modifier
    /// keyword, i.e. its statement continues on the next line.
    #[must_use]
    pub fn line_ends_with_single_token_indenter(&self, line: &LexedLine) -> bool {
        line.ends_with_op()
            || line.ends_with_comma()
            || line.ends_with_period()
            || line.ends_with_modifier_keyword()
    }

    /// True iff a `kind` bracket is open and none of the open ones was
    /// opened on `line`.
    #[must_use]
    pub fn multi_line(&self, kind: BracketKind, line: usize) -> bool {
        let mut open = self.reasons.iter().filter(|r| r.kind == kind.opener()).peekable();
        open.peek().is_some() && open.all(|r| r.line != line)
    }

    /// [`multi_line`](Self::multi_line) for braces.
    #[must_use]
    pub fn multi_line_braces(&self, line: usize) -> bool {
        self.multi_line(BracketKind::Brace, line)
    }

    /// [`multi_line`](Self::multi_line) for brackets.
    #[must_use]
    pub fn multi_line_brackets(&self, line: usize) -> bool {
        self.multi_line(BracketKind::Bracket, line)
    }

    /// [`multi_line`](Self::multi_line) for parentheses.
    #[must_use]
    pub fn multi_line_parens(&self, line: usize) -> bool {
        self.multi_line(BracketKind::Paren, line)
    }

    /// Whether `line` sits inside a bracket opened on an earlier line.
    #[must_use]
    pub fn continuing_enclosed_statement(&self, line: usize) -> bool {
        BracketKind::ALL.into_iter().any(|kind| self.multi_line(kind, line))
    }

    /// Handles a potential opener: a block keyword, a continuation
    /// keyword or an opening bracket.
    ///
    /// Modifier keywords and a loop's optional `do` open nothing. A
    /// continuation keyword adds no nesting; leading its line, it lowers
    /// that line by one width at line end.
    pub fn update_for_opening_reason(&mut self, token: &Token<'_>) {
        if !self.measuring {
            return;
        }
        if token.is_modifier_keyword() {
            trace!(token = token.text(), "Found modifier in line");
            return;
        }
        if token.is_optional_do_loop_opener() {
            trace!("Found keyword loop using optional 'do'");
            return;
        }
        if token.is_continuation_keyword() {
            if token.leads_line() {
                self.pending_decrement += 1;
                trace!(
                    token = token.text(),
                    pending = self.pending_decrement,
                    "Continuation keyword"
                );
            }
            return;
        }

        self.add_indent_reason(token.event().kind, token.text(), token.lineno());
    }

    fn add_indent_reason(&mut self, kind: EventKind, token: &str, line: usize) {
        self.reasons.push(IndentReason {
            kind,
            token: token.to_string(),
            line,
            should_be_at: self.this_line,
        });
        self.next_line = self.this_line + self.spaces;
        self.continuation = false;
        trace!(token, line, next_line = self.next_line, "Added indent reason");
    }

    /// Handles a closer (`end`, `}`, `]`, `)`).
    ///
    /// A `}` that closes an interpolation only ends the interpolation.
    /// When only closers precede the event on `line`, the line itself is
    /// lowered to where the closed construct started.
    pub fn update_for_closing_reason(&mut self, event: &Event, line: &LexedLine) {
        if event.kind == EventKind::RBrace && self.in_interpolation() {
            trace!("Got '}}' while in an interpolation; closing it");
            self.interpolation_end();
            return;
        }
        if !self.measuring {
            return;
        }

        let popped = self.reasons.pop();
        self.continuation = false;
        self.next_line = self
            .reasons
            .last()
            .map_or(0, |r| r.should_be_at + self.spaces);

        if line.closer_leads_line(event.column()) {
            self.this_line = match &popped {
                Some(reason) => reason.should_be_at,
                None => self.this_line.saturating_sub(self.spaces),
            };
        }

        trace!(
            closed = popped.as_ref().map(|r| r.token.as_str()),
            this_line = self.this_line,
            next_line = self.next_line,
            "Removed indent reason"
        );
    }

    /// Bumps the next line one width deeper when `line` continues its
    /// statement, and drops the bump once a line no longer continues.
    ///
    /// No bump is added inside a bracket opened on an earlier line, or
    /// when `line` itself opened the innermost construct.
    pub fn update_for_line_continuation(&mut self, line: &LexedLine) {
        if !self.measuring {
            return;
        }

        let continues = self.line_ends_with_single_token_indenter(line) || line.ends_with_backslash();
        if continues {
            let reason_recorded = self.reasons.last().is_some_and(|r| {
                r.line == line.line_number() || BracketKind::from_opener(r.kind).is_some()
            });
            if !self.continuation && !reason_recorded {
                self.next_line += self.spaces;
                self.continuation = true;
                trace!(next_line = self.next_line, "Line continues");
            }
        } else if self.continuation {
            self.next_line = self.next_line.saturating_sub(self.spaces);
            self.continuation = false;
            trace!(next_line = self.next_line, "Continuation ended");
        }
    }

    /// Records a string begun on `line` that does not close on it.
    ///
    /// Tracking continues to the end of `line` and is then suspended.
    pub fn string_begin(&mut self, line: usize) {
        self.string_nesting.push(line);
        trace!(line, depth = self.string_nesting.len(), "Multi-line string begins");
    }

    /// Records the end of a multi-line string; tracking resumes once the
    /// outermost one is closed.
    pub fn string_end(&mut self) {
        self.string_nesting.pop();
        if self.string_nesting.is_empty() {
            self.start();
        }
    }

    /// Records the start of a string interpolation.
    pub fn interpolation_begin(&mut self) {
        self.interpolations.push(self.reasons.len());
    }

    /// Records the end of the innermost string interpolation.
    pub fn interpolation_end(&mut self) {
        self.interpolations.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linewise_core::EventKind::{
        Comma, Ident, IgnoredNewline, Int, Keyword, LBrace, LParen, Newline, Op, RBrace, RParen,
        Space,
    };

    fn line(lineno: usize, events: &[(usize, EventKind, &str)]) -> LexedLine {
        let events = events
            .iter()
            .map(|(col, kind, text)| Event::new(lineno, *col, *kind, *text))
            .collect();
        LexedLine::from_events(lineno, events)
    }

    fn open(manager: &mut IndentationManager, line: &LexedLine, column: usize) {
        let event = line.event_at(column).expect("event");
        manager.update_for_opening_reason(&Token::new(event, line));
    }

    fn close(manager: &mut IndentationManager, line: &LexedLine, column: usize) {
        let event = line.event_at(column).expect("event").clone();
        manager.update_for_closing_reason(&event, line);
    }

    fn end_line(manager: &mut IndentationManager, line: &LexedLine) {
        manager.set_up_line_transition();
        manager.update_for_line_continuation(line);
        manager.transition_lines();
    }

    #[test]
    fn test_initial_state() {
        let manager = IndentationManager::new(2);
        assert_eq!(manager.should_be_at(), 0);
        assert_eq!(manager.next_should_be_at(), 0);
        assert!(manager.is_measuring());
        assert!(manager.reasons().is_empty());
    }

    #[test]
    fn test_decrease_this_line_clamps_at_zero() {
        let mut manager = IndentationManager::new(27);
        manager.decrease_this_line();
        assert_eq!(manager.should_be_at(), 0);
    }

    #[test]
    fn test_decrease_this_line_is_ignored_when_stopped() {
        let mut manager = IndentationManager::new(2);
        let def = line(1, &[(0, Keyword, "def"), (3, Space, " "), (4, Ident, "a"), (5, Newline, "\n")]);
        open(&mut manager, &def, 0);
        end_line(&mut manager, &def);
        assert_eq!(manager.should_be_at(), 2);

        manager.stop();
        manager.decrease_this_line();
        assert_eq!(manager.should_be_at(), 2);
    }

    #[test]
    fn test_block_opens_and_closes() {
        let mut manager = IndentationManager::new(2);
        let def = line(1, &[(0, Keyword, "def"), (3, Space, " "), (4, Ident, "a"), (5, Newline, "\n")]);
        open(&mut manager, &def, 0);
        assert_eq!(manager.reasons().len(), 1);
        assert_eq!(manager.next_should_be_at(), 2);
        end_line(&mut manager, &def);

        let body = line(2, &[(0, Space, "  "), (2, Ident, "x"), (3, Newline, "\n")]);
        manager.update_actual_indentation(&body);
        assert_eq!(manager.actual_indentation(), 2);
        assert_eq!(manager.should_be_at(), 2);
        end_line(&mut manager, &body);

        let end = line(3, &[(0, Keyword, "end"), (3, Newline, "\n")]);
        close(&mut manager, &end, 0);
        assert_eq!(manager.should_be_at(), 0);
        assert_eq!(manager.next_should_be_at(), 0);
        assert!(manager.reasons().is_empty());
    }

    #[test]
    fn test_modifier_keyword_opens_nothing() {
        let mut manager = IndentationManager::new(2);
        let l = line(
            1,
            &[
                (0, Ident, "x"),
                (1, Space, " "),
                (2, Keyword, "if"),
                (4, Space, " "),
                (5, Ident, "y"),
                (6, Newline, "\n"),
            ],
        );
        open(&mut manager, &l, 2);
        assert!(manager.reasons().is_empty());
        assert_eq!(manager.next_should_be_at(), 0);
    }

    #[test]
    fn test_leading_continuation_keyword_lowers_its_line() {
        let mut manager = IndentationManager::new(2);
        let l1 = line(1, &[(0, Keyword, "if"), (2, Space, " "), (3, Ident, "x"), (4, Newline, "\n")]);
        open(&mut manager, &l1, 0);
        end_line(&mut manager, &l1);

        let l2 = line(2, &[(0, Keyword, "else"), (4, Newline, "\n")]);
        open(&mut manager, &l2, 0);
        assert_eq!(manager.reasons().len(), 1);
        manager.set_up_line_transition();
        assert_eq!(manager.should_be_at(), 0);
        manager.update_for_line_continuation(&l2);
        manager.transition_lines();
        assert_eq!(manager.should_be_at(), 2);
    }

    #[test]
    fn test_closer_mid_line_keeps_this_line() {
        let mut manager = IndentationManager::new(2);
        let l1 = line(1, &[(0, Ident, "foo"), (3, LParen, "("), (4, IgnoredNewline, "\n")]);
        open(&mut manager, &l1, 3);
        end_line(&mut manager, &l1);

        let l2 = line(2, &[(0, Space, "  "), (2, Int, "1"), (3, RParen, ")"), (4, Newline, "\n")]);
        close(&mut manager, &l2, 3);
        assert_eq!(manager.should_be_at(), 2);
        assert_eq!(manager.next_should_be_at(), 0);
    }

    #[test]
    fn test_stacked_closers_lower_to_outer_opener() {
        let mut manager = IndentationManager::new(2);
        let l1 = line(
            1,
            &[
                (0, Ident, "foo"),
                (3, LParen, "("),
                (4, LBrace, "{"),
                (5, IgnoredNewline, "\n"),
            ],
        );
        open(&mut manager, &l1, 3);
        open(&mut manager, &l1, 4);
        end_line(&mut manager, &l1);
        assert_eq!(manager.should_be_at(), 2);

        let l2 = line(2, &[(0, RBrace, "}"), (1, RParen, ")"), (2, Newline, "\n")]);
        close(&mut manager, &l2, 0);
        close(&mut manager, &l2, 1);
        assert_eq!(manager.should_be_at(), 0);
        assert!(manager.reasons().is_empty());
    }

    #[test]
    fn test_unbalanced_closer_clamps() {
        let mut manager = IndentationManager::new(2);
        let l = line(1, &[(0, Keyword, "end"), (3, Newline, "\n")]);
        close(&mut manager, &l, 0);
        assert_eq!(manager.should_be_at(), 0);
        assert_eq!(manager.next_should_be_at(), 0);
    }

    #[test]
    fn test_trailing_operator_continues_once() {
        let mut manager = IndentationManager::new(2);
        let l1 = line(
            1,
            &[
                (0, Ident, "x"),
                (1, Space, " "),
                (2, Op, "="),
                (3, Space, " "),
                (4, Ident, "a"),
                (5, Space, " "),
                (6, Op, "+"),
                (7, IgnoredNewline, "\n"),
            ],
        );
        end_line(&mut manager, &l1);
        assert_eq!(manager.should_be_at(), 2);

        let l2 = line(2, &[(0, Space, "  "), (2, Ident, "b"), (3, Space, " "), (4, Op, "+"), (5, IgnoredNewline, "\n")]);
        end_line(&mut manager, &l2);
        assert_eq!(manager.should_be_at(), 2);

        let l3 = line(3, &[(0, Space, "  "), (2, Ident, "c"), (3, Newline, "\n")]);
        end_line(&mut manager, &l3);
        assert_eq!(manager.should_be_at(), 0);
    }

    #[test]
    fn test_comma_inside_open_bracket_does_not_double_count() {
        let mut manager = IndentationManager::new(2);
        let l1 = line(
            1,
            &[(0, Ident, "foo"), (3, LParen, "("), (4, Int, "1"), (5, Comma, ","), (6, IgnoredNewline, "\n")],
        );
        open(&mut manager, &l1, 3);
        end_line(&mut manager, &l1);
        assert_eq!(manager.should_be_at(), 2);

        let l2 = line(2, &[(0, Space, "  "), (2, Int, "2"), (3, Comma, ","), (4, IgnoredNewline, "\n")]);
        end_line(&mut manager, &l2);
        assert_eq!(manager.should_be_at(), 2);
    }

    #[test]
    fn test_multi_line_predicates() {
        let mut manager = IndentationManager::new(2);
        let l1 = line(1, &[(0, Ident, "foo"), (3, LParen, "("), (4, IgnoredNewline, "\n")]);
        open(&mut manager, &l1, 3);

        assert!(!manager.multi_line_parens(1));
        assert!(manager.multi_line_parens(2));
        assert!(!manager.multi_line_braces(2));
        assert!(!manager.multi_line_brackets(2));
        assert!(manager.continuing_enclosed_statement(2));
        assert!(!manager.continuing_enclosed_statement(1));
    }

    #[test]
    fn test_interpolation_brace_is_not_a_closer() {
        let mut manager = IndentationManager::new(2);
        let def = line(1, &[(0, Keyword, "def"), (3, Space, " "), (4, Ident, "a"), (5, Newline, "\n")]);
        open(&mut manager, &def, 0);
        end_line(&mut manager, &def);

        manager.interpolation_begin();
        assert!(manager.in_interpolation());
        let l = line(2, &[(0, Space, "  "), (2, RBrace, "}"), (3, Newline, "\n")]);
        close(&mut manager, &l, 2);
        assert!(!manager.in_interpolation());
        assert_eq!(manager.reasons().len(), 1);
    }

    #[test]
    fn test_multi_line_string_suspends_after_its_line() {
        let mut manager = IndentationManager::new(2);
        manager.string_begin(1);
        assert!(manager.is_measuring());
        assert!(manager.in_string());

        manager.transition_lines();
        assert!(!manager.is_measuring());

        manager.string_end();
        assert!(manager.is_measuring());
        assert!(!manager.in_string());
    }

    #[test]
    fn test_bracket_kind_roundtrip() {
        for kind in BracketKind::ALL {
            assert_eq!(BracketKind::from_opener(kind.opener()), Some(kind));
        }
        assert_eq!(BracketKind::from_opener(EventKind::Keyword), None);
    }
}
