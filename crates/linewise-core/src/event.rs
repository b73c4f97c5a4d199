//! Lexical events and the tokenizer contract.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Category of a lexical event.
///
/// The set mirrors what a Ruby-style tokenizer emits: layout events
/// (whitespace, newlines, comments) are kept, not elided, so rulers can
/// reason about the physical shape of each line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Local identifier or method name.
    Ident,
    /// Capitalized constant name.
    Const,
    /// Reserved word (`def`, `if`, `end`, ...).
    Keyword,
    /// Integer literal.
    Int,
    /// Float literal.
    Float,
    /// Operator (`=`, `+`, `&&`, `=>`, ...).
    Op,
    /// Run of spaces/tabs, or a backslash line continuation.
    Space,
    /// Newline that terminates a statement.
    Newline,
    /// Newline that does not terminate a statement.
    IgnoredNewline,
    /// `,`
    Comma,
    /// `.`
    Period,
    /// `;`
    Semicolon,
    /// Hash label such as `key:`.
    Label,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// Opening string delimiter (including heredoc openers).
    StringBegin,
    /// Literal string body.
    StringContent,
    /// Closing string delimiter.
    StringEnd,
    /// `#{` inside an interpolating string.
    EmbexprBegin,
    /// `}` closing an interpolation.
    EmbexprEnd,
    /// `:` starting a symbol literal.
    SymbolBegin,
    /// Comment, including its trailing newline when present.
    Comment,
}

impl EventKind {
    /// Whether this event opens a bracketed construct.
    #[must_use]
    pub fn is_opener(self) -> bool {
        matches!(self, Self::LBrace | Self::LBracket | Self::LParen)
    }

    /// Whether this event closes a bracketed construct.
    #[must_use]
    pub fn is_closer(self) -> bool {
        matches!(self, Self::RBrace | Self::RBracket | Self::RParen)
    }

    /// Whether this event is a newline marker of either flavor.
    #[must_use]
    pub fn is_newline(self) -> bool {
        matches!(self, Self::Newline | Self::IgnoredNewline)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ident => "ident",
            Self::Const => "const",
            Self::Keyword => "kw",
            Self::Int => "int",
            Self::Float => "float",
            Self::Op => "op",
            Self::Space => "sp",
            Self::Newline => "nl",
            Self::IgnoredNewline => "ignored_nl",
            Self::Comma => "comma",
            Self::Period => "period",
            Self::Semicolon => "semicolon",
            Self::Label => "label",
            Self::LBrace => "lbrace",
            Self::RBrace => "rbrace",
            Self::LBracket => "lbracket",
            Self::RBracket => "rbracket",
            Self::LParen => "lparen",
            Self::RParen => "rparen",
            Self::StringBegin => "tstring_beg",
            Self::StringContent => "tstring_content",
            Self::StringEnd => "tstring_end",
            Self::EmbexprBegin => "embexpr_beg",
            Self::EmbexprEnd => "embexpr_end",
            Self::SymbolBegin => "symbeg",
            Self::Comment => "comment",
        };
        f.write_str(name)
    }
}

/// Position of an event in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column in characters (0-indexed).
    pub column: usize,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// One lexical event produced by a [`Tokenizer`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Event {
    /// Where the event starts.
    pub position: Position,
    /// Category of the event.
    pub kind: EventKind,
    /// Exact source text of the event.
    pub text: String,
}

impl Event {
    /// Creates a new event.
    #[must_use]
    pub fn new(line: usize, column: usize, kind: EventKind, text: impl Into<String>) -> Self {
        Self {
            position: Position::new(line, column),
            kind,
            text: text.into(),
        }
    }

    /// Line the event starts on.
    #[must_use]
    pub fn line(&self) -> usize {
        self.position.line
    }

    /// Column the event starts at.
    #[must_use]
    pub fn column(&self) -> usize {
        self.position.column
    }

    /// Width of the event text in characters.
    #[must_use]
    pub fn width(&self) -> usize {
        self.text.chars().count()
    }

    /// Whether this is a keyword event with exactly `word` as its text.
    #[must_use]
    pub fn is_keyword(&self, word: &str) -> bool {
        self.kind == EventKind::Keyword && self.text == word
    }
}

/// Error returned when source text cannot be tokenized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at line {line}, column {column}")]
pub struct TokenizeError {
    /// Line where lexing failed (1-indexed).
    pub line: usize,
    /// Column where lexing failed (0-indexed).
    pub column: usize,
    /// What went wrong.
    pub message: String,
}

impl TokenizeError {
    /// Creates a new tokenize error.
    #[must_use]
    pub fn new(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
        }
    }
}

/// Turns source text into an ordered sequence of [`Event`]s.
///
/// Implementations must preserve whitespace and comments exactly as laid
/// out, tag events with 1-based lines and 0-based columns, and emit them
/// in source order.
pub trait Tokenizer: Send + Sync {
    /// Tokenizes a whole source file.
    ///
    /// # Errors
    ///
    /// Returns a [`TokenizeError`] if the source cannot be lexed.
    fn tokenize(&self, source: &str) -> Result<Vec<Event>, TokenizeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_classification() {
        assert!(EventKind::LParen.is_opener());
        assert!(EventKind::RBracket.is_closer());
        assert!(!EventKind::EmbexprEnd.is_closer());
        assert!(EventKind::IgnoredNewline.is_newline());
        assert!(!EventKind::Space.is_newline());
    }

    #[test]
    fn test_event_width_counts_chars() {
        let event = Event::new(1, 0, EventKind::StringContent, "héllo");
        assert_eq!(event.width(), 5);
    }

    #[test]
    fn test_tokenize_error_display() {
        let err = TokenizeError::new(3, 7, "unterminated string");
        assert_eq!(err.to_string(), "unterminated string at line 3, column 7");
    }
}
