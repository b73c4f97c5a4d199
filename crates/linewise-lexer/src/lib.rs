//! # linewise-lexer
//!
//! Layout-preserving Ruby tokenizer for linewise.
//!
//! [`RubyLexer`] implements [`linewise_core::Tokenizer`]. Unlike a parser
//! front end it keeps every byte of the source: whitespace runs, comments
//! (with their trailing newline), backslash line continuations and the
//! bodies of multi-line strings and heredocs all come back as events, so
//! rulers can reason about layout.
//!
//! ```
//! use linewise_core::{EventKind, Tokenizer};
//! use linewise_lexer::RubyLexer;
//!
//! let events = RubyLexer::new().tokenize("if x\n  y\nend\n").unwrap();
//! assert_eq!(events[0].kind, EventKind::Keyword);
//! assert_eq!(events[3].text, "\n");
//! ```
//!
//! Newlines that cannot end a statement (blank lines, or a line ending in
//! an operator, comma, period or opening bracket) are reported as
//! [`EventKind::IgnoredNewline`](linewise_core::EventKind::IgnoredNewline).

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cursor;
mod scanner;

use linewise_core::{Event, TokenizeError, Tokenizer};
use tracing::debug;

/// Tokenizer for Ruby source.
#[derive(Debug, Clone, Copy, Default)]
pub struct RubyLexer;

impl RubyLexer {
    /// Creates a new lexer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Tokenizer for RubyLexer {
    fn tokenize(&self, source: &str) -> Result<Vec<Event>, TokenizeError> {
        scanner::Scanner::new(source).run().map_err(|e| {
            debug!(line = e.line, column = e.column, "Tokenize failed: {}", e.message);
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linewise_core::{EventKind, LexedLine};

    #[test]
    fn test_events_cover_the_source() {
        let source = "def a(b, c)\n  \"x#{b}\" # note\n  [1,\n   2]\nend\n";
        let events = RubyLexer::new().tokenize(source).expect("tokenize");
        let rebuilt: String = events.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(rebuilt, source);
    }

    #[test]
    fn test_events_split_into_lines() {
        let source = "a = [\n  1\n]\n";
        let events = RubyLexer::new().tokenize(source).expect("tokenize");
        let lines = LexedLine::split_lines(events);
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[1].first_non_space_element().map(|e| e.kind),
            Some(EventKind::Int)
        );
    }

    #[test]
    fn test_tokenize_error() {
        let err = RubyLexer::new().tokenize("x = 'open\n").unwrap_err();
        assert_eq!((err.line, err.column), (1, 4));
    }
}
