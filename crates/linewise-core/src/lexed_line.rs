//! Per-line grouping of lexical events.

use crate::event::{Event, EventKind};
use crate::token::Token;
use std::fmt;

/// The events that start on one physical source line.
///
/// A `LexedLine` is a read-only view built per analysis pass. All queries
/// are pure; [`LexedLine::remove_trailing_comment`] returns a new line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexedLine {
    line: usize,
    events: Vec<Event>,
}

impl LexedLine {
    /// Collects the events of `events` that start on `line`.
    #[must_use]
    pub fn new(events: &[Event], line: usize) -> Self {
        Self {
            line,
            events: events.iter().filter(|e| e.line() == line).cloned().collect(),
        }
    }

    /// Wraps events already known to share `line`.
    #[must_use]
    pub fn from_events(line: usize, events: Vec<Event>) -> Self {
        Self { line, events }
    }

    /// Splits a file's event stream into lines, preserving order.
    ///
    /// Lines without any event (for example the body of a multi-line
    /// string) produce no `LexedLine`.
    #[must_use]
    pub fn split_lines(events: Vec<Event>) -> Vec<Self> {
        let mut lines: Vec<Self> = Vec::new();
        for event in events {
            match lines.last_mut() {
                Some(current) if current.line == event.line() => current.events.push(event),
                _ => lines.push(Self {
                    line: event.line(),
                    events: vec![event],
                }),
            }
        }
        lines
    }

    /// Line number (1-indexed).
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line
    }

    /// The events in source order.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Number of events on the line.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the line has no events.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// True iff every event is whitespace or a newline.
    #[must_use]
    pub fn only_spaces(&self) -> bool {
        self.events
            .iter()
            .all(|e| e.kind == EventKind::Space || e.kind.is_newline())
    }

    /// Last event that is neither a newline nor a backslash continuation.
    #[must_use]
    pub fn last_non_line_feed_event(&self) -> Option<&Event> {
        self.events
            .iter()
            .rev()
            .find(|e| !e.kind.is_newline() && !is_backslash_continuation(e))
    }

    /// True iff the last non-newline event has the given category.
    #[must_use]
    pub fn does_line_end_with(&self, kind: EventKind) -> bool {
        self.last_non_line_feed_event().is_some_and(|e| e.kind == kind)
    }

    /// True iff the line ends with an operator.
    #[must_use]
    pub fn ends_with_op(&self) -> bool {
        self.does_line_end_with(EventKind::Op)
    }

    /// True iff the line ends with a comma.
    #[must_use]
    pub fn ends_with_comma(&self) -> bool {
        self.does_line_end_with(EventKind::Comma)
    }

    /// True iff the line ends with a period.
    #[must_use]
    pub fn ends_with_period(&self) -> bool {
        self.does_line_end_with(EventKind::Period)
    }

    /// True iff the line ends with a keyword.
    #[must_use]
    pub fn ends_with_keyword(&self) -> bool {
        self.does_line_end_with(EventKind::Keyword)
    }

    /// True iff the line is continued with a trailing backslash.
    #[must_use]
    pub fn ends_with_backslash(&self) -> bool {
        self.events.last().is_some_and(is_backslash_continuation)
    }

    /// True iff the line ends with a keyword used as a statement modifier.
    #[must_use]
    pub fn ends_with_modifier_keyword(&self) -> bool {
        match self.last_non_line_feed_event() {
            Some(event) if event.kind == EventKind::Keyword => {
                Token::new(event, self).is_modifier_keyword()
            }
            _ => false,
        }
    }

    /// True iff the line starts a `while`/`until`/`for` loop and ends with
    /// its optional `do`.
    #[must_use]
    pub fn loop_with_do(&self) -> bool {
        let starts_loop = self.first_non_space_element().is_some_and(|e| {
            e.is_keyword("while") || e.is_keyword("until") || e.is_keyword("for")
        });
        starts_loop
            && self
                .last_non_line_feed_event()
                .is_some_and(|e| e.is_keyword("do"))
    }

    /// First event that is not whitespace or a newline.
    #[must_use]
    pub fn first_non_space_element(&self) -> Option<&Event> {
        self.events
            .iter()
            .find(|e| e.kind != EventKind::Space && !e.kind.is_newline())
    }

    /// Event starting at `column`, if any.
    #[must_use]
    pub fn event_at(&self, column: usize) -> Option<&Event> {
        self.events.iter().find(|e| e.column() == column)
    }

    /// Index of the event starting at `column`, if any.
    #[must_use]
    pub fn event_index(&self, column: usize) -> Option<usize> {
        self.events.iter().position(|e| e.column() == column)
    }

    /// Nearest event before `column` that is not whitespace or newline.
    #[must_use]
    pub fn previous_significant(&self, column: usize) -> Option<&Event> {
        self.events
            .iter()
            .take_while(|e| e.column() < column)
            .filter(|e| e.kind != EventKind::Space && !e.kind.is_newline())
            .last()
    }

    /// True iff the line is the tail of a string literal begun on an
    /// earlier line: it opens with a string end whose begin is not on
    /// this line.
    #[must_use]
    pub fn end_of_multi_line_string(&self) -> bool {
        match self.first_non_space_element() {
            Some(first) if first.kind == EventKind::StringEnd => {
                !self.string_opened_on_line(first.column())
            }
            _ => false,
        }
    }

    /// True iff the string begin at `column` is closed later on this line.
    #[must_use]
    pub fn string_closes_on_line(&self, column: usize) -> bool {
        let Some(index) = self.event_index(column) else {
            return false;
        };
        let mut depth = 1usize;
        for event in &self.events[index + 1..] {
            match event.kind {
                EventKind::StringBegin => depth += 1,
                EventKind::StringEnd => {
                    depth -= 1;
                    if depth == 0 {
                        return true;
                    }
                }
                _ => {}
            }
        }
        false
    }

    /// True iff the string end at `column` was opened earlier on this line.
    #[must_use]
    pub fn string_opened_on_line(&self, column: usize) -> bool {
        let Some(index) = self.event_index(column) else {
            return false;
        };
        let mut depth = 1usize;
        for event in self.events[..index].iter().rev() {
            match event.kind {
                EventKind::StringEnd => depth += 1,
                EventKind::StringBegin => {
                    depth -= 1;
                    if depth == 0 {
                        return true;
                    }
                }
                _ => {}
            }
        }
        false
    }

    /// True iff every significant event up to and including the one at
    /// `column` closes something (`}`, `]`, `)` or `end`).
    #[must_use]
    pub fn closer_leads_line(&self, column: usize) -> bool {
        let Some(index) = self.event_index(column) else {
            return false;
        };
        self.events[..=index]
            .iter()
            .filter(|e| e.kind != EventKind::Space)
            .all(|e| e.kind.is_closer() || e.is_keyword("end"))
    }

    /// True iff, ignoring leading whitespace and the terminator, the line
    /// is exactly one event of `kind`.
    #[must_use]
    pub fn is_line_only_a(&self, kind: EventKind) -> bool {
        let mut body = self
            .events
            .iter()
            .skip_while(|e| e.kind == EventKind::Space)
            .filter(|e| !e.kind.is_newline());
        matches!((body.next(), body.next()), (Some(e), None) if e.kind == kind)
    }

    /// True iff the line's trailing keyword is actually a symbol name
    /// (`[:class`).
    #[must_use]
    pub fn keyword_is_symbol(&self) -> bool {
        let Some(index) = self.events.iter().rposition(|e| {
            !e.kind.is_newline() && !is_backslash_continuation(e)
        }) else {
            return false;
        };
        if self.events[index].kind != EventKind::Keyword {
            return false;
        }
        index
            .checked_sub(1)
            .is_some_and(|i| self.events[i].kind == EventKind::SymbolBegin)
    }

    /// Returns a copy of the line with its trailing comment (and the
    /// whitespace before it) replaced by a newline marker.
    ///
    /// The marker is an ignored newline when the remaining statement is
    /// incomplete (ends with an operator, comma or period), otherwise a
    /// plain newline. Its column is where the code on the source line
    /// ends. A line without a trailing comment is returned unchanged.
    #[must_use]
    pub fn remove_trailing_comment(&self, source: &str) -> Self {
        let Some(comment) = self.events.last().filter(|e| e.kind == EventKind::Comment) else {
            return self.clone();
        };
        let comment_column = comment.column();

        let mut kept: Vec<Event> = self.events[..self.events.len() - 1].to_vec();
        while kept.last().is_some_and(|e| e.kind == EventKind::Space) {
            kept.pop();
        }

        let column = source
            .lines()
            .nth(self.line.saturating_sub(1))
            .map(|text| {
                let before: String = text.chars().take(comment_column).collect();
                before.trim_end().chars().count()
            })
            .unwrap_or_else(|| kept.last().map_or(0, |e| e.column() + e.width()));

        let stripped = Self::from_events(self.line, kept);
        let kind = if stripped.ends_with_op() || stripped.ends_with_comma() || stripped.ends_with_period()
        {
            EventKind::IgnoredNewline
        } else {
            EventKind::Newline
        };

        let mut events = stripped.events;
        events.push(Event::new(self.line, column, kind, "\n"));
        Self::from_events(self.line, events)
    }
}

impl fmt::Display for LexedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for event in &self.events {
            f.write_str(&event.text)?;
        }
        Ok(())
    }
}

fn is_backslash_continuation(event: &Event) -> bool {
    event.kind == EventKind::Space && event.text.ends_with("\\\n")
}
