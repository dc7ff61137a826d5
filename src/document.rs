//! The document being chatted in, addressed by line and column.
//!
//! The core only talks to a document through the [`Editor`] trait so that it never needs
//! more than the span it is analysing. [`Document`] is the file-backed implementation the
//! CLI uses: the file is held as a list of lines, mutated by range replacement, and written
//! back in one go.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
/// Zero-based line and character column within a document.
pub struct Position {
    /// Line index, 0 for the first line.
    pub line: usize,
    /// Character offset within the line; `usize::MAX` addresses the end of the line.
    pub column: usize,
}

impl Position {
    #[must_use]
    /// Position at `column` of `line`.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    #[must_use]
    /// Start of `line`.
    pub fn line_start(line: usize) -> Self {
        Self { line, column: 0 }
    }

    #[must_use]
    /// End of `line`, whatever its length.
    pub fn line_end(line: usize) -> Self {
        Self {
            line,
            column: usize::MAX,
        }
    }
}

/// Everything the chat core needs from the editor hosting a document.
///
/// All operations are synchronous and immediately consistent: a read after a
/// [`replace_range`](Editor::replace_range) sees the new text.
pub trait Editor {
    /// Full text, lines joined with `\n`.
    fn text(&self) -> String;

    /// Text between two positions, clamped to the document.
    fn range(&self, from: Position, to: Position) -> String;

    /// A single line without its line break; empty past the end of the document.
    fn line(&self, line: usize) -> String;

    /// Current cursor position.
    fn cursor(&self) -> Position;

    /// Index of the final line.
    fn last_line(&self) -> usize;

    /// Replace the text between `from` and `to` (or insert at `from` when `to` is `None`).
    fn replace_range(&mut self, text: &str, from: Position, to: Option<Position>);

    /// Move the cursor.
    fn set_cursor(&mut self, position: Position);
}

#[derive(Clone, Debug)]
/// In-memory line buffer optionally bound to a file on disk.
pub struct Document {
    lines: Vec<String>,
    cursor: Position,
    path: Option<PathBuf>,
    line_ending: &'static str,
}

impl Document {
    #[must_use]
    /// Build a document from raw text, accepting both `\n` and `\r\n` line endings.
    ///
    /// A trailing line break yields a final empty line, as in a text editor. The line ending
    /// style is remembered for [`save`](Document::save).
    pub fn from_text(text: &str) -> Self {
        let line_ending = if text.contains("\r\n") { "\r\n" } else { "\n" };
        let lines = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect();
        Self {
            lines,
            cursor: Position::default(),
            path: None,
            line_ending,
        }
    }

    /// Load a document from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn open(path: &Path) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        let mut document = Self::from_text(&text);
        document.path = Some(path.to_path_buf());
        Ok(document)
    }

    #[must_use]
    /// Same document with the cursor placed at `position`.
    pub fn with_cursor(mut self, position: Position) -> Self {
        self.set_cursor(position);
        self
    }

    #[must_use]
    /// File this document was loaded from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Write the document back to the file it was opened from.
    ///
    /// # Errors
    ///
    /// Returns an error if the document has no path or the write fails.
    pub fn save(&self) -> io::Result<()> {
        let path = self
            .path
            .as_ref()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "document has no file path"))?;
        fs::write(path, self.lines.join(self.line_ending))?;
        tracing::debug!(path = %path.display(), lines = self.lines.len(), "document written");
        Ok(())
    }

    #[must_use]
    /// All lines, without line breaks.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Byte offset into [`Editor::text`] for a (clamped) position.
    fn offset(&self, position: Position) -> usize {
        let line = position.line.min(self.last_line());
        let preceding: usize = self.lines[..line].iter().map(|l| l.len() + 1).sum();
        let text = &self.lines[line];
        let within = text
            .char_indices()
            .nth(position.column)
            .map_or(text.len(), |(index, _)| index);
        preceding + within
    }
}

impl Editor for Document {
    fn text(&self) -> String {
        self.lines.join("\n")
    }

    fn range(&self, from: Position, to: Position) -> String {
        let text = self.text();
        let (start, end) = (self.offset(from), self.offset(to));
        if start >= end {
            return String::new();
        }
        text[start..end].to_string()
    }

    fn line(&self, line: usize) -> String {
        self.lines.get(line).cloned().unwrap_or_default()
    }

    fn cursor(&self) -> Position {
        self.cursor
    }

    fn last_line(&self) -> usize {
        self.lines.len().saturating_sub(1)
    }

    fn replace_range(&mut self, text: &str, from: Position, to: Option<Position>) {
        let mut content = self.text();
        let start = self.offset(from);
        let end = to.map_or(start, |to| self.offset(to).max(start));
        content.replace_range(start..end, text);
        self.lines = content.split('\n').map(str::to_string).collect();
        let cursor = self.cursor;
        self.set_cursor(cursor);
    }

    fn set_cursor(&mut self, position: Position) {
        let line = position.line.min(self.last_line());
        let column = position.column.min(self.lines[line].chars().count());
        self.cursor = Position { line, column };
    }
}

#[cfg(test)]
#[path = "tests/document.rs"]
mod tests;
