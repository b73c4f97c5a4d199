//! Classification of single lexemes in their line context.

use crate::event::{Event, EventKind};
use crate::lexed_line::LexedLine;

/// Every reserved word recognized by the tokenizer.
pub const KEYWORDS: &[&str] = &[
    "__ENCODING__",
    "__FILE__",
    "__LINE__",
    "BEGIN",
    "END",
    "alias",
    "and",
    "begin",
    "break",
    "case",
    "class",
    "def",
    "defined?",
    "do",
    "else",
    "elsif",
    "end",
    "ensure",
    "false",
    "for",
    "if",
    "in",
    "module",
    "next",
    "nil",
    "not",
    "or",
    "redo",
    "rescue",
    "retry",
    "return",
    "self",
    "super",
    "then",
    "true",
    "undef",
    "unless",
    "until",
    "when",
    "while",
    "yield",
];

/// Keywords that open a block closed by `end`.
pub const BLOCK_OPENING_KEYWORDS: &[&str] = &[
    "begin", "case", "class", "def", "do", "for", "if", "module", "unless", "until", "while",
];

/// Keywords that continue an open statement without adding nesting.
pub const CONTINUATION_KEYWORDS: &[&str] = &["else", "elsif", "ensure", "rescue", "then", "when"];

/// Keywords that may trail a statement as a modifier.
pub const MODIFIER_KEYWORDS: &[&str] = &["if", "rescue", "unless", "until", "while"];

/// Loop keywords that accept an optional `do`.
const LOOP_KEYWORDS: &[&str] = &["for", "until", "while"];

/// Keywords after which a modifier-capable keyword starts a new expression.
const EXPRESSION_START_KEYWORDS: &[&str] = &[
    "and", "begin", "do", "else", "elsif", "ensure", "in", "not", "or", "then", "when",
];

/// Returns true if `word` is a reserved word.
#[must_use]
pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

/// A single lexeme viewed in the context of its line.
#[derive(Debug, Clone, Copy)]
pub struct Token<'a> {
    event: &'a Event,
    line: &'a LexedLine,
}

impl<'a> Token<'a> {
    /// Wraps `event`, which must belong to `line`.
    #[must_use]
    pub fn new(event: &'a Event, line: &'a LexedLine) -> Self {
        Self { event, line }
    }

    /// The lexeme text.
    #[must_use]
    pub fn text(&self) -> &'a str {
        &self.event.text
    }

    /// The underlying event.
    #[must_use]
    pub fn event(&self) -> &'a Event {
        self.event
    }

    /// Line number the lexeme starts on.
    #[must_use]
    pub fn lineno(&self) -> usize {
        self.line.line_number()
    }

    /// Whether the lexeme is a keyword event.
    #[must_use]
    pub fn is_keyword(&self) -> bool {
        self.event.kind == EventKind::Keyword
    }

    /// Whether the lexeme is the first non-whitespace event of its line.
    #[must_use]
    pub fn leads_line(&self) -> bool {
        self.line
            .first_non_space_element()
            .is_some_and(|first| first.column() == self.event.column())
    }

    /// Whether the keyword is used as a trailing statement modifier
    /// (`return if done`), as opposed to opening a block.
    #[must_use]
    pub fn is_modifier_keyword(&self) -> bool {
        if !self.is_keyword() || !MODIFIER_KEYWORDS.contains(&self.text()) {
            return false;
        }
        if self.is_symbol_name() {
            return false;
        }

        let Some(previous) = self.line.previous_significant(self.event.column()) else {
            return false;
        };

        match previous.kind {
            EventKind::Op
            | EventKind::Comma
            | EventKind::Semicolon
            | EventKind::Label
            | EventKind::LParen
            | EventKind::LBracket
            | EventKind::LBrace
            | EventKind::EmbexprBegin => false,
            EventKind::Keyword => !EXPRESSION_START_KEYWORDS.contains(&previous.text.as_str()),
            _ => true,
        }
    }

    /// Whether the keyword continues an already-open statement.
    #[must_use]
    pub fn is_continuation_keyword(&self) -> bool {
        self.is_keyword() && CONTINUATION_KEYWORDS.contains(&self.text()) && !self.is_symbol_name()
    }

    /// Whether this is the optional `do` of a `while`/`until`/`for` loop
    /// begun on the same line.
    #[must_use]
    pub fn is_optional_do_loop_opener(&self) -> bool {
        if !self.event.is_keyword("do") {
            return false;
        }
        self.line.first_non_space_element().is_some_and(|first| {
            first.kind == EventKind::Keyword
                && LOOP_KEYWORDS.contains(&first.text.as_str())
                && first.column() < self.event.column()
        })
    }

    /// Whether the keyword is really a name: a symbol (`:class`) or a
    /// method call (`obj.class`, `obj&.class`, `Foo::class`).
    #[must_use]
    pub fn is_symbol_name(&self) -> bool {
        let Some(index) = self.line.event_index(self.event.column()) else {
            return false;
        };
        index
            .checked_sub(1)
            .and_then(|i| self.line.events().get(i))
            .is_some_and(|prev| match prev.kind {
                EventKind::SymbolBegin | EventKind::Period => true,
                EventKind::Op => matches!(prev.text.as_str(), "&." | "::"),
                _ => false,
            })
    }

    /// Whether the keyword opens a block that needs a matching `end`.
    #[must_use]
    pub fn is_block_opener(&self) -> bool {
        self.is_keyword()
            && BLOCK_OPENING_KEYWORDS.contains(&self.text())
            && !self.is_symbol_name()
            && !self.is_modifier_keyword()
            && !self.is_optional_do_loop_opener()
    }

    /// Whether the keyword is a block-closing `end`.
    #[must_use]
    pub fn is_block_closer(&self) -> bool {
        self.event.is_keyword("end") && !self.is_symbol_name()
    }
}
