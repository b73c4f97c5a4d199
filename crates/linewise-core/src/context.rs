//! Context types for ruler execution.

use std::path::{Path, PathBuf};

/// Context shared by every ruler while a single file is processed.
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    /// Path to the file as given by the file set.
    pub path: &'a Path,
    /// File contents as a string.
    pub source: &'a str,
    /// Label of the file set this file belongs to.
    pub label: &'a str,
    /// Path relative to the project root.
    pub relative_path: PathBuf,
}

impl<'a> FileContext<'a> {
    /// Creates a new file context.
    #[must_use]
    pub fn new(path: &'a Path, source: &'a str, label: &'a str, root: &Path) -> Self {
        let relative_path = path
            .strip_prefix(root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf);

        Self {
            path,
            source,
            label,
            relative_path,
        }
    }

    /// Text of a source line without its terminator.
    ///
    /// `line` is 1-indexed; returns `None` past the end of the file.
    #[must_use]
    pub fn line_text(&self, line: usize) -> Option<&'a str> {
        line.checked_sub(1).and_then(|i| self.source.lines().nth(i))
    }

    /// Calculates byte offset for a given line and column.
    #[must_use]
    pub fn offset_for(&self, line: usize, column: usize) -> usize {
        byte_offset(self.source, line, column)
    }
}

/// Byte offset of a 1-indexed `line` and 0-indexed character `column`.
///
/// Out-of-range positions clamp to the end of the source.
#[must_use]
pub fn byte_offset(source: &str, line: usize, column: usize) -> usize {
    if line == 0 {
        return 0;
    }

    let mut offset = 0;
    for (i, line_content) in source.split_inclusive('\n').enumerate() {
        if i + 1 == line {
            let within = line_content
                .char_indices()
                .nth(column)
                .map_or(line_content.len(), |(idx, _)| idx);
            return offset + within;
        }
        offset += line_content.len();
    }

    offset
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_path() {
        let ctx = FileContext::new(
            Path::new("/project/lib/foo.rb"),
            "",
            "default",
            Path::new("/project"),
        );
        assert_eq!(ctx.relative_path, PathBuf::from("lib/foo.rb"));

        let outside = FileContext::new(Path::new("other.rb"), "", "default", Path::new("/project"));
        assert_eq!(outside.relative_path, PathBuf::from("other.rb"));
    }

    #[test]
    fn test_line_text() {
        let ctx = FileContext::new(Path::new("t.rb"), "one\ntwo\n", "default", Path::new("."));
        assert_eq!(ctx.line_text(2), Some("two"));
        assert_eq!(ctx.line_text(0), None);
        assert_eq!(ctx.line_text(3), None);
    }

    #[test]
    fn test_offset_calculation() {
        let content = "line1\nline2\nline3";
        assert_eq!(byte_offset(content, 1, 0), 0);
        assert_eq!(byte_offset(content, 2, 0), 6);
        assert_eq!(byte_offset(content, 2, 2), 8);
        assert_eq!(byte_offset(content, 9, 0), content.len());
    }

    #[test]
    fn test_offset_counts_characters() {
        assert_eq!(byte_offset("é = 1\n", 1, 2), 3);
    }
}
