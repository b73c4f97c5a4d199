//! The scanner turning Ruby source into layout-preserving events.

use crate::cursor::Cursor;
use linewise_core::token::is_keyword;
use linewise_core::{Event, EventKind, TokenizeError};
use tracing::trace;

/// Operators, longest first so the first prefix match wins.
const OPERATORS: &[&str] = &[
    "**=", "<=>", "===", "...", "<<=", ">>=", "&&=", "||=", "**", "==", "!=", ">=", "<=", "&&",
    "||", "<<", ">>", "=~", "!~", "+=", "-=", "*=", "/=", "%=", "|=", "&=", "^=", "=>", "->",
    "..", "::", "&.", "+", "-", "*", "/", "%", "=", "<", ">", "!", "&", "|", "^", "~", "?", ":",
];

/// Keywords after which a newline does not end the statement.
const OPEN_ENDED_KEYWORDS: &[&str] = &["and", "begin", "do", "else", "ensure", "not", "or", "then"];

/// Keywords that are values, so an operator may follow them.
const VALUE_KEYWORDS: &[&str] = &[
    "end",
    "false",
    "nil",
    "self",
    "true",
    "__ENCODING__",
    "__FILE__",
    "__LINE__",
];

/// Modifiers of `%` literals.
const PERCENT_TYPES: &str = "qQwWiIrsx";

/// `%` literal delimiters that may follow `%` directly.
const BARE_PERCENT_DELIMITERS: &str = "([{<|!/^";

#[derive(Debug)]
struct PendingHeredoc {
    id: String,
    indented: bool,
    line: usize,
    column: usize,
}

/// One-shot scanner over a source text.
pub(crate) struct Scanner {
    cursor: Cursor,
    events: Vec<Event>,
    heredocs: Vec<PendingHeredoc>,
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_char(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

fn closing_delimiter(open: char) -> char {
    match open {
        '(' => ')',
        '[' => ']',
        '{' => '}',
        '<' => '>',
        other => other,
    }
}

impl Scanner {
    pub(crate) fn new(source: &str) -> Self {
        Self {
            cursor: Cursor::new(source),
            events: Vec::new(),
            heredocs: Vec::new(),
        }
    }

    pub(crate) fn run(mut self) -> Result<Vec<Event>, TokenizeError> {
        self.lex_code(None)?;
        if let Some(doc) = self.heredocs.first() {
            return Err(TokenizeError::new(
                doc.line,
                doc.column,
                format!("unterminated heredoc `{}`", doc.id),
            ));
        }
        trace!(events = self.events.len(), "Tokenized source");
        Ok(self.events)
    }

    fn push(&mut self, (line, column): (usize, usize), kind: EventKind, text: impl Into<String>) {
        self.events.push(Event::new(line, column, kind, text));
    }

    /// Consumes `n` characters as one event of `kind`.
    fn single(&mut self, kind: EventKind, n: usize) {
        let start = self.cursor.position();
        let text = self.cursor.bump_n(n);
        self.push(start, kind, text);
    }

    fn last_significant(&self) -> Option<&Event> {
        self.events.iter().rev().find(|e| e.kind != EventKind::Space)
    }

    /// Whether the parser would expect the start of an expression here.
    fn value_expected(&self) -> bool {
        let Some(last) = self.last_significant() else {
            return true;
        };
        match last.kind {
            EventKind::Newline
            | EventKind::IgnoredNewline
            | EventKind::Semicolon
            | EventKind::Op
            | EventKind::Comma
            | EventKind::LParen
            | EventKind::LBracket
            | EventKind::LBrace
            | EventKind::EmbexprBegin
            | EventKind::Label
            | EventKind::Comment => true,
            EventKind::Keyword => !VALUE_KEYWORDS.contains(&last.text.as_str()),
            _ => false,
        }
    }

    /// Whether an ambiguous literal opener (`/`, `%`, `?`, `<<`) at the
    /// cursor starts a literal rather than an operator. `after` is the
    /// offset of the first character following the opener.
    fn literal_allowed(&self, after: usize) -> bool {
        if self.value_expected() {
            return true;
        }
        let space_before = matches!(self.cursor.prev(), Some(' ' | '\t'));
        let space_after = matches!(
            self.cursor.peek_nth(after),
            None | Some(' ' | '\t' | '\n' | '\r' | '=')
        );
        let after_command = self
            .last_significant()
            .is_some_and(|e| e.kind == EventKind::Ident);
        after_command && space_before && !space_after
    }

    /// Lexes code until end of input, or until the `}` that closes the
    /// interpolation opened at `interpolation`.
    fn lex_code(&mut self, interpolation: Option<(usize, usize)>) -> Result<(), TokenizeError> {
        let mut brace_depth = 0usize;

        while let Some(c) = self.cursor.peek() {
            let start = self.cursor.position();
            match c {
                ' ' | '\t' | '\x0c' => {
                    let text = self.cursor.eat_while(|c| matches!(c, ' ' | '\t' | '\x0c'));
                    self.push(start, EventKind::Space, text);
                }
                '\r' if self.cursor.peek_nth(1) == Some('\n') => self.lex_newline()?,
                '\r' => self.single(EventKind::Space, 1),
                '\n' => self.lex_newline()?,
                '\\' if self.cursor.peek_nth(1) == Some('\n') => self.single(EventKind::Space, 2),
                '\\' if self.cursor.starts_with("\\\r\n") => self.single(EventKind::Space, 3),
                '#' => self.lex_comment()?,
                '=' if start.1 == 0 && self.at_block_comment() => self.lex_block_comment()?,
                '_' if start.1 == 0 && self.cursor.rest_of_line().trim_end() == "__END__" => {
                    let rest = self.cursor.eat_while(|_| true);
                    self.push(start, EventKind::Comment, rest);
                }
                '"' | '`' => self.lex_quoted(c, true)?,
                '\'' => self.lex_quoted(c, false)?,
                '0'..='9' => self.lex_number(),
                c if is_ident_start(c) => self.lex_identifier(),
                '@' | '$' => self.lex_variable(),
                ',' => self.single(EventKind::Comma, 1),
                ';' => self.single(EventKind::Semicolon, 1),
                '(' => self.single(EventKind::LParen, 1),
                ')' => self.single(EventKind::RParen, 1),
                '[' => self.single(EventKind::LBracket, 1),
                ']' => self.single(EventKind::RBracket, 1),
                '{' => {
                    brace_depth += 1;
                    self.single(EventKind::LBrace, 1);
                }
                '}' => {
                    if interpolation.is_some() && brace_depth == 0 {
                        self.single(EventKind::EmbexprEnd, 1);
                        return Ok(());
                    }
                    brace_depth = brace_depth.saturating_sub(1);
                    self.single(EventKind::RBrace, 1);
                }
                '.' if self.cursor.peek_nth(1) != Some('.') => self.single(EventKind::Period, 1),
                ':' => self.lex_colon(),
                '%' if self.percent_literal_ahead() => self.lex_percent_literal()?,
                '/' if self.literal_allowed(1) => self.lex_regexp()?,
                '<' if self.heredoc_ahead().is_some() => self.lex_heredoc_opener(),
                '?' if self.char_literal_ahead() => self.lex_char_literal(),
                _ => self.lex_operator()?,
            }
        }

        match interpolation {
            Some((line, column)) => Err(TokenizeError::new(
                line,
                column,
                "unterminated interpolation",
            )),
            None => Ok(()),
        }
    }

    fn lex_newline(&mut self) -> Result<(), TokenizeError> {
        let start = self.cursor.position();
        let text = if self.cursor.peek() == Some('\r') {
            self.cursor.bump_n(2)
        } else {
            self.cursor.bump_n(1)
        };

        let kind = match self.last_significant() {
            Some(last) if last.line() == start.0 => match last.kind {
                EventKind::Op
                | EventKind::Comma
                | EventKind::Period
                | EventKind::LBrace
                | EventKind::LBracket
                | EventKind::LParen
                | EventKind::EmbexprBegin => EventKind::IgnoredNewline,
                EventKind::Keyword if OPEN_ENDED_KEYWORDS.contains(&last.text.as_str()) => {
                    EventKind::IgnoredNewline
                }
                _ => EventKind::Newline,
            },
            _ => EventKind::IgnoredNewline,
        };

        self.push(start, kind, text);
        self.read_heredoc_bodies()
    }

    fn lex_comment(&mut self) -> Result<(), TokenizeError> {
        let start = self.cursor.position();
        let mut text = self.cursor.eat_while(|c| c != '\n');
        if self.cursor.eat('\n') {
            text.push('\n');
            self.push(start, EventKind::Comment, text);
            self.read_heredoc_bodies()
        } else {
            self.push(start, EventKind::Comment, text);
            Ok(())
        }
    }

    fn at_block_comment(&self) -> bool {
        self.cursor.rest_of_line().split_whitespace().next() == Some("=begin")
    }

    fn lex_block_comment(&mut self) -> Result<(), TokenizeError> {
        let start = self.cursor.position();
        let mut text = String::new();
        loop {
            if self.cursor.is_eof() {
                return Err(TokenizeError::new(start.0, start.1, "unterminated =begin comment"));
            }
            let line = self.cursor.rest_of_line();
            let is_end = line.split_whitespace().next() == Some("=end");
            text.push_str(&self.cursor.bump_n(line.chars().count()));
            if self.cursor.eat('\n') {
                text.push('\n');
            }
            if is_end {
                break;
            }
        }
        self.push(start, EventKind::Comment, text);
        Ok(())
    }

    /// Emits the bodies of heredocs opened on the line just ended.
    fn read_heredoc_bodies(&mut self) -> Result<(), TokenizeError> {
        for doc in std::mem::take(&mut self.heredocs) {
            let body_start = self.cursor.position();
            let mut body = String::new();

            loop {
                if self.cursor.is_eof() {
                    return Err(TokenizeError::new(
                        doc.line,
                        doc.column,
                        format!("unterminated heredoc `{}`", doc.id),
                    ));
                }
                let line = self.cursor.rest_of_line();
                let candidate = if doc.indented { line.trim_start() } else { line.as_str() };
                if candidate.trim_end_matches('\r') == doc.id {
                    break;
                }
                body.push_str(&self.cursor.bump_n(line.chars().count()));
                if self.cursor.eat('\n') {
                    body.push('\n');
                }
            }

            if !body.is_empty() {
                self.push(body_start, EventKind::StringContent, body);
            }

            let indent_start = self.cursor.position();
            let indent = self.cursor.eat_while(|c| matches!(c, ' ' | '\t'));
            if !indent.is_empty() {
                self.push(indent_start, EventKind::Space, indent);
            }
            let end_start = self.cursor.position();
            let id = self.cursor.bump_n(doc.id.chars().count());
            self.push(end_start, EventKind::StringEnd, id);

            let newline_start = self.cursor.position();
            let mut newline = String::new();
            if self.cursor.peek() == Some('\r') {
                newline.push_str(&self.cursor.bump_n(1));
            }
            if self.cursor.eat('\n') {
                newline.push('\n');
            }
            if !newline.is_empty() {
                self.push(newline_start, EventKind::Newline, newline);
            }
        }
        Ok(())
    }

    fn lex_quoted(&mut self, quote: char, interpolate: bool) -> Result<(), TokenizeError> {
        let start = self.cursor.position();
        self.single(EventKind::StringBegin, 1);
        let close = self.lex_string_body(quote, None, interpolate, start)?;
        self.push(close, EventKind::StringEnd, quote.to_string());
        Ok(())
    }

    /// Lexes string content up to and including the closing delimiter,
    /// returning the delimiter's position.
    ///
    /// Content between interpolations is emitted as one event positioned
    /// where it starts, even when it spans lines.
    fn lex_string_body(
        &mut self,
        close: char,
        nest_open: Option<char>,
        interpolate: bool,
        start: (usize, usize),
    ) -> Result<(usize, usize), TokenizeError> {
        let mut depth = 0usize;
        let mut content = String::new();
        let mut content_start = self.cursor.position();

        loop {
            let Some(c) = self.cursor.peek() else {
                return Err(TokenizeError::new(
                    start.0,
                    start.1,
                    "unterminated string meets end of file",
                ));
            };
            if content.is_empty() {
                content_start = self.cursor.position();
            }

            if c == '\\' {
                content.push_str(&self.cursor.bump_n(2));
                continue;
            }
            if Some(c) == nest_open {
                depth += 1;
            } else if c == close {
                if depth == 0 {
                    self.flush_content(content_start, &mut content);
                    let end = self.cursor.position();
                    self.cursor.bump();
                    return Ok(end);
                }
                depth -= 1;
            } else if interpolate && c == '#' && self.cursor.peek_nth(1) == Some('{') {
                self.flush_content(content_start, &mut content);
                let embexpr = self.cursor.position();
                self.single(EventKind::EmbexprBegin, 2);
                self.lex_code(Some(embexpr))?;
                continue;
            }

            content.push(c);
            self.cursor.bump();
        }
    }

    fn flush_content(&mut self, start: (usize, usize), content: &mut String) {
        if !content.is_empty() {
            self.push(start, EventKind::StringContent, std::mem::take(content));
        }
    }

    fn percent_literal_ahead(&self) -> bool {
        let delimiter_at = match self.cursor.peek_nth(1) {
            Some(t) if PERCENT_TYPES.contains(t) => 2,
            Some(d) if BARE_PERCENT_DELIMITERS.contains(d) => 1,
            _ => return false,
        };
        let delimiter_ok = self
            .cursor
            .peek_nth(delimiter_at)
            .is_some_and(|d| !d.is_alphanumeric() && !d.is_whitespace());
        delimiter_ok && self.literal_allowed(1)
    }

    fn lex_percent_literal(&mut self) -> Result<(), TokenizeError> {
        let start = self.cursor.position();
        let mut opener = self.cursor.bump_n(1);
        let kind = match self.cursor.peek() {
            Some(t) if PERCENT_TYPES.contains(t) => {
                self.cursor.bump();
                opener.push(t);
                Some(t)
            }
            _ => None,
        };
        let Some(open) = self.cursor.bump() else {
            return Err(TokenizeError::new(start.0, start.1, "unterminated literal"));
        };
        opener.push(open);
        self.push(start, EventKind::StringBegin, opener);

        let close = closing_delimiter(open);
        let nest_open = (close != open).then_some(open);
        let interpolate = !matches!(kind, Some('q' | 'w' | 'i' | 's'));
        let end = self.lex_string_body(close, nest_open, interpolate, start)?;

        let mut text = close.to_string();
        if kind == Some('r') {
            text.push_str(&self.cursor.eat_while(|c| c.is_ascii_lowercase()));
        }
        self.push(end, EventKind::StringEnd, text);
        Ok(())
    }

    fn lex_regexp(&mut self) -> Result<(), TokenizeError> {
        let start = self.cursor.position();
        self.single(EventKind::StringBegin, 1);
        let end = self.lex_string_body('/', None, true, start)?;
        let mut text = String::from("/");
        text.push_str(&self.cursor.eat_while(|c| c.is_ascii_lowercase()));
        self.push(end, EventKind::StringEnd, text);
        Ok(())
    }

    /// Length of the heredoc opener at the cursor, its terminator and
    /// whether the terminator may be indented.
    fn heredoc_ahead(&self) -> Option<(usize, String, bool)> {
        if !self.cursor.starts_with("<<") {
            return None;
        }
        let mut i = 2;
        let indented = matches!(self.cursor.peek_nth(2), Some('-' | '~'));
        if indented {
            i += 1;
        }

        let id = match self.cursor.peek_nth(i) {
            Some(quote @ ('\'' | '"' | '`')) => {
                let mut id = String::new();
                let mut j = i + 1;
                loop {
                    match self.cursor.peek_nth(j) {
                        Some(c) if c == quote => break,
                        Some('\n') | None => return None,
                        Some(c) => id.push(c),
                    }
                    j += 1;
                }
                i = j + 1;
                id
            }
            Some(c) if is_ident_start(c) => {
                let mut id = String::new();
                while let Some(c) = self.cursor.peek_nth(i).filter(|c| is_ident_char(*c)) {
                    id.push(c);
                    i += 1;
                }
                id
            }
            _ => return None,
        };

        if id.is_empty() || !self.literal_allowed(2) {
            return None;
        }
        Some((i, id, indented))
    }

    fn lex_heredoc_opener(&mut self) {
        let Some((len, id, indented)) = self.heredoc_ahead() else {
            return;
        };
        let (line, column) = self.cursor.position();
        self.single(EventKind::StringBegin, len);
        self.heredocs.push(PendingHeredoc {
            id,
            indented,
            line,
            column,
        });
    }

    fn char_literal_ahead(&self) -> bool {
        let Some(c) = self.cursor.peek_nth(1) else {
            return false;
        };
        if c.is_whitespace() || !self.value_expected() {
            return false;
        }
        let after = if c == '\\' { 3 } else { 2 };
        !self.cursor.peek_nth(after).is_some_and(is_ident_char)
    }

    fn lex_char_literal(&mut self) {
        let len = if self.cursor.peek_nth(1) == Some('\\') { 3 } else { 2 };
        self.single(EventKind::StringContent, len);
    }

    fn lex_colon(&mut self) {
        if self.cursor.starts_with("::") {
            self.single(EventKind::Op, 2);
            return;
        }
        let symbol = match self.cursor.peek_nth(1) {
            Some(c) if is_ident_start(c) || matches!(c, '"' | '\'' | '@' | '$') => true,
            Some(c) if "+-*/<=>![%&|^~".contains(c) => self.value_expected(),
            _ => false,
        };
        let kind = if symbol { EventKind::SymbolBegin } else { EventKind::Op };
        self.single(kind, 1);
    }

    fn lex_number(&mut self) {
        let start = self.cursor.position();
        let mut text = String::new();
        let mut kind = EventKind::Int;

        if self.cursor.peek() == Some('0')
            && matches!(self.cursor.peek_nth(1), Some('x' | 'X' | 'b' | 'B' | 'o' | 'O'))
        {
            text.push_str(&self.cursor.bump_n(2));
            text.push_str(&self.cursor.eat_while(|c| c.is_ascii_hexdigit() || c == '_'));
        } else {
            text.push_str(&self.cursor.eat_while(|c| c.is_ascii_digit() || c == '_'));

            if self.cursor.peek() == Some('.')
                && self.cursor.peek_nth(1).is_some_and(|c| c.is_ascii_digit())
            {
                kind = EventKind::Float;
                text.push_str(&self.cursor.bump_n(1));
                text.push_str(&self.cursor.eat_while(|c| c.is_ascii_digit() || c == '_'));
            }

            let exponent = matches!(self.cursor.peek(), Some('e' | 'E'))
                && match self.cursor.peek_nth(1) {
                    Some('+' | '-') => self.cursor.peek_nth(2).is_some_and(|c| c.is_ascii_digit()),
                    Some(c) => c.is_ascii_digit(),
                    None => false,
                };
            if exponent {
                kind = EventKind::Float;
                text.push_str(&self.cursor.bump_n(2));
                text.push_str(&self.cursor.eat_while(|c| c.is_ascii_digit()));
            }
        }

        if matches!(self.cursor.peek(), Some('r' | 'i'))
            && !self.cursor.peek_nth(1).is_some_and(is_ident_char)
        {
            text.push_str(&self.cursor.bump_n(1));
        }

        self.push(start, kind, text);
    }

    fn lex_identifier(&mut self) {
        let start = self.cursor.position();
        let mut word = self.cursor.eat_while(is_ident_char);
        if matches!(self.cursor.peek(), Some('?' | '!')) && self.cursor.peek_nth(1) != Some('=') {
            word.push_str(&self.cursor.bump_n(1));
        }

        let after_symbol_or_call = self
            .events
            .last()
            .is_some_and(|e| matches!(e.kind, EventKind::SymbolBegin | EventKind::Period));
        if self.cursor.peek() == Some(':')
            && self.cursor.peek_nth(1) != Some(':')
            && !after_symbol_or_call
        {
            word.push_str(&self.cursor.bump_n(1));
            self.push(start, EventKind::Label, word);
            return;
        }

        let kind = if is_keyword(&word) {
            EventKind::Keyword
        } else if word.starts_with(|c: char| c.is_uppercase()) {
            EventKind::Const
        } else {
            EventKind::Ident
        };
        self.push(start, kind, word);
    }

    fn lex_variable(&mut self) {
        let start = self.cursor.position();
        let mut text = self.cursor.eat_while(|c| matches!(c, '@' | '$'));
        let name = self.cursor.eat_while(is_ident_char);
        if name.is_empty() && text == "$" {
            if let Some(special) = self.cursor.bump() {
                text.push(special);
            }
        }
        text.push_str(&name);
        self.push(start, EventKind::Ident, text);
    }

    fn lex_operator(&mut self) -> Result<(), TokenizeError> {
        let start = self.cursor.position();
        let Some(op) = OPERATORS.iter().find(|op| self.cursor.starts_with(op)) else {
            let c = self.cursor.peek().unwrap_or_default();
            return Err(TokenizeError::new(
                start.0,
                start.1,
                format!("unexpected character `{}`", c.escape_default()),
            ));
        };
        self.single(EventKind::Op, op.chars().count());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use EventKind::*;

    fn lex(source: &str) -> Vec<Event> {
        Scanner::new(source).run().expect("source should tokenize")
    }

    fn kinds(source: &str) -> Vec<(EventKind, String)> {
        lex(source).into_iter().map(|e| (e.kind, e.text)).collect()
    }

    fn render(source: &str) -> String {
        lex(source)
            .iter()
            .map(|e| format!("{}:{} {:?} {:?}", e.line(), e.column(), e.kind, e.text))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn owned(expected: &[(EventKind, &str)]) -> Vec<(EventKind, String)> {
        expected.iter().map(|(k, t)| (*k, (*t).to_string())).collect()
    }

    #[test]
    fn test_simple_statement() {
        insta::assert_snapshot!(render("x = 1\n"), @r#"
        1:0 Ident "x"
        1:1 Space " "
        1:2 Op "="
        1:3 Space " "
        1:4 Int "1"
        1:5 Newline "\n"
        "#);
    }

    #[test]
    fn test_keywords_constants_and_labels() {
        assert_eq!(
            kinds("class Foo < Bar\n  f(a: 1)\nend"),
            owned(&[
                (Keyword, "class"),
                (Space, " "),
                (Const, "Foo"),
                (Space, " "),
                (Op, "<"),
                (Space, " "),
                (Const, "Bar"),
                (Newline, "\n"),
                (Space, "  "),
                (Ident, "f"),
                (LParen, "("),
                (Label, "a:"),
                (Space, " "),
                (Int, "1"),
                (RParen, ")"),
                (Newline, "\n"),
                (Keyword, "end"),
            ])
        );
    }

    #[test]
    fn test_ignored_newlines() {
        let events = lex("\nx = a +\n  b\n");
        let newlines: Vec<EventKind> = events
            .iter()
            .filter(|e| e.kind.is_newline())
            .map(|e| e.kind)
            .collect();
        assert_eq!(newlines, vec![IgnoredNewline, IgnoredNewline, Newline]);
    }

    #[test]
    fn test_comment_swallows_newline() {
        assert_eq!(
            kinds("x # note\ny\n"),
            owned(&[
                (Ident, "x"),
                (Space, " "),
                (Comment, "# note\n"),
                (Ident, "y"),
                (Newline, "\n"),
            ])
        );
    }

    #[test]
    fn test_line_continuation_is_space() {
        assert_eq!(
            kinds("a \\\n  b\n"),
            owned(&[
                (Ident, "a"),
                (Space, " "),
                (Space, "\\\n"),
                (Space, "  "),
                (Ident, "b"),
                (Newline, "\n"),
            ])
        );
    }

    #[test]
    fn test_symbols_and_methods() {
        assert_eq!(
            kinds(":if.nil?"),
            owned(&[(SymbolBegin, ":"), (Keyword, "if"), (Period, "."), (Ident, "nil?")])
        );
        assert_eq!(
            kinds("A::B ? c : d"),
            owned(&[
                (Const, "A"),
                (Op, "::"),
                (Const, "B"),
                (Space, " "),
                (Op, "?"),
                (Space, " "),
                (Ident, "c"),
                (Space, " "),
                (Op, ":"),
                (Space, " "),
                (Ident, "d"),
            ])
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("1_000 2.5 1e3 0xff 3r"),
            owned(&[
                (Int, "1_000"),
                (Space, " "),
                (Float, "2.5"),
                (Space, " "),
                (Float, "1e3"),
                (Space, " "),
                (Int, "0xff"),
                (Space, " "),
                (Int, "3r"),
            ])
        );
        assert_eq!(
            kinds("1..2"),
            owned(&[(Int, "1"), (Op, ".."), (Int, "2")])
        );
    }

    #[test]
    fn test_variables() {
        assert_eq!(
            kinds("@a @@b $c $0"),
            owned(&[
                (Ident, "@a"),
                (Space, " "),
                (Ident, "@@b"),
                (Space, " "),
                (Ident, "$c"),
                (Space, " "),
                (Ident, "$0"),
            ])
        );
    }

    #[test]
    fn test_interpolated_string() {
        assert_eq!(
            kinds("\"a #{b} c\""),
            owned(&[
                (StringBegin, "\""),
                (StringContent, "a "),
                (EmbexprBegin, "#{"),
                (Ident, "b"),
                (EmbexprEnd, "}"),
                (StringContent, " c"),
                (StringEnd, "\""),
            ])
        );
    }

    #[test]
    fn test_braces_inside_interpolation() {
        assert_eq!(
            kinds("\"#{ {a: 1} }\""),
            owned(&[
                (StringBegin, "\""),
                (EmbexprBegin, "#{"),
                (Space, " "),
                (LBrace, "{"),
                (Label, "a:"),
                (Space, " "),
                (Int, "1"),
                (RBrace, "}"),
                (Space, " "),
                (EmbexprEnd, "}"),
                (StringEnd, "\""),
            ])
        );
    }

    #[test]
    fn test_single_quotes_do_not_interpolate() {
        assert_eq!(
            kinds("'#{a}\\''"),
            owned(&[(StringBegin, "'"), (StringContent, "#{a}\\'"), (StringEnd, "'")])
        );
    }

    #[test]
    fn test_multi_line_string_content_is_one_event() {
        let events = lex("x = \"first\nline\n    second\"\n");
        let content = events
            .iter()
            .find(|e| e.kind == StringContent)
            .expect("content");
        assert_eq!((content.line(), content.column()), (1, 5));
        assert_eq!(content.text, "first\nline\n    second");
        let end = events.iter().find(|e| e.kind == StringEnd).expect("end");
        assert_eq!((end.line(), end.column()), (3, 10));
        assert_eq!(events.last().map(|e| e.kind), Some(Newline));
    }

    #[test]
    fn test_percent_literals() {
        assert_eq!(
            kinds("%w(a (b) c)"),
            owned(&[(StringBegin, "%w("), (StringContent, "a (b) c"), (StringEnd, ")")])
        );
        assert_eq!(
            kinds("x % 2"),
            owned(&[(Ident, "x"), (Space, " "), (Op, "%"), (Space, " "), (Int, "2")])
        );
    }

    #[test]
    fn test_regexp_versus_division() {
        assert_eq!(
            kinds("x =~ /a#{b}/i"),
            owned(&[
                (Ident, "x"),
                (Space, " "),
                (Op, "=~"),
                (Space, " "),
                (StringBegin, "/"),
                (StringContent, "a"),
                (EmbexprBegin, "#{"),
                (Ident, "b"),
                (EmbexprEnd, "}"),
                (StringEnd, "/i"),
            ])
        );
        assert_eq!(
            kinds("a / b"),
            owned(&[(Ident, "a"), (Space, " "), (Op, "/"), (Space, " "), (Ident, "b")])
        );
    }

    #[test]
    fn test_heredoc() {
        insta::assert_snapshot!(render("call(<<-EOS, 1)\nbody\n  EOS\ny\n"), @r#"
        1:0 Ident "call"
        1:4 LParen "("
        1:5 StringBegin "<<-EOS"
        1:11 Comma ","
        1:12 Space " "
        1:13 Int "1"
        1:14 RParen ")"
        1:15 Newline "\n"
        2:0 StringContent "body\n"
        3:0 Space "  "
        3:2 StringEnd "EOS"
        3:5 Newline "\n"
        4:0 Ident "y"
        4:1 Newline "\n"
        "#);
    }

    #[test]
    fn test_quoted_heredoc_and_shift_operator() {
        let events = kinds("x = <<~'END'\n  a\nEND\nclass << self\n");
        assert_eq!(events[4], (StringBegin, "<<~'END'".to_string()));
        assert!(events.contains(&(Op, "<<".to_string())));
    }

    #[test]
    fn test_block_comment_and_end_marker() {
        assert_eq!(
            kinds("=begin\nnotes\n=end\nx\n__END__\ndata\n"),
            owned(&[
                (Comment, "=begin\nnotes\n=end\n"),
                (Ident, "x"),
                (Newline, "\n"),
                (Comment, "__END__\ndata\n"),
            ])
        );
    }

    #[test]
    fn test_crlf_is_one_newline() {
        assert_eq!(
            kinds("a\r\nb"),
            owned(&[(Ident, "a"), (Newline, "\r\n"), (Ident, "b")])
        );
    }

    #[test]
    fn test_errors() {
        let err = Scanner::new("x = \"open").run().unwrap_err();
        assert_eq!((err.line, err.column), (1, 4));

        let err = Scanner::new("a(<<EOS)\nbody\n").run().unwrap_err();
        assert_eq!((err.line, err.column), (1, 2));
        assert!(err.message.contains("EOS"));

        let err = Scanner::new("\"#{a").run().unwrap_err();
        assert_eq!((err.line, err.column), (1, 1));

        let err = Scanner::new("=begin\nnever closed\n").run().unwrap_err();
        assert_eq!((err.line, err.column), (1, 0));
    }
}
