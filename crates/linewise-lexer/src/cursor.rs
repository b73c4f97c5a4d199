//! Character cursor with line/column tracking.

/// A cursor over the characters of a source text.
///
/// Lines are 1-based and columns 0-based, both counted in characters.
#[derive(Debug, Clone)]
pub(crate) struct Cursor {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
}

impl Cursor {
    pub(crate) fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            column: 0,
        }
    }

    /// Current `(line, column)`.
    pub(crate) fn position(&self) -> (usize, usize) {
        (self.line, self.column)
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.pos >= self.chars.len()
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    /// Character `n` places ahead of the current one.
    pub(crate) fn peek_nth(&self, n: usize) -> Option<char> {
        self.chars.get(self.pos + n).copied()
    }

    /// The character just before the cursor.
    pub(crate) fn prev(&self) -> Option<char> {
        self.pos.checked_sub(1).and_then(|i| self.chars.get(i).copied())
    }

    pub(crate) fn starts_with(&self, text: &str) -> bool {
        let mut ahead = self.chars[self.pos..].iter();
        text.chars().all(|c| ahead.next() == Some(&c))
    }

    pub(crate) fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Consumes `n` characters, returning them.
    pub(crate) fn bump_n(&mut self, n: usize) -> String {
        (0..n).filter_map(|_| self.bump()).collect()
    }

    pub(crate) fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_while(&mut self, mut pred: impl FnMut(char) -> bool) -> String {
        let mut taken = String::new();
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            taken.push(c);
            self.bump();
        }
        taken
    }

    /// The rest of the current line, without consuming it or its `\n`.
    pub(crate) fn rest_of_line(&self) -> String {
        self.chars[self.pos..]
            .iter()
            .take_while(|c| **c != '\n')
            .collect()
    }
}
