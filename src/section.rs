//! Headings and the chat sections they delimit.
//!
//! A chat section is the run of lines below a heading whose text is the configured chat
//! title, up to the next heading at the same or a shallower level (or the end of the
//! document). Sections are found by looking upward from the cursor, so a section only
//! contains a cursor that sits below its own heading.

#[derive(Clone, Debug, PartialEq, Eq)]
/// One entry of a document outline.
pub struct Heading {
    /// Heading text without the `#` markers.
    pub text: String,
    /// Nesting depth, 1 for `#`.
    pub level: usize,
    /// Line the heading is written on.
    pub start_line: usize,
}

impl Heading {
    #[must_use]
    /// Build a heading entry.
    pub fn new(text: impl Into<String>, level: usize, start_line: usize) -> Self {
        Self {
            text: text.into(),
            level,
            start_line,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Line range of one conversation within a document.
pub struct ChatSection {
    /// Line holding the heading or callout that opens the chat.
    pub heading_line: usize,
    /// First line of the chat body.
    pub start_line: usize,
    /// Line after the last line of the chat body.
    pub end_line: usize,
    /// Heading depth of the opening heading (0 when the chat is not opened by a heading).
    pub heading_level: usize,
    /// Text of lines `start_line..end_line`, joined with `\n`.
    pub content: String,
}

impl ChatSection {
    #[must_use]
    /// Body lines of the section.
    pub fn lines(&self) -> Vec<&str> {
        if self.start_line >= self.end_line {
            return Vec::new();
        }
        self.content.split('\n').collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Where a chat section lies, before its text has been read.
pub struct SectionBounds {
    /// Line of the opening heading.
    pub heading_line: usize,
    /// Level of the opening heading.
    pub heading_level: usize,
    /// Line of the closing heading, or one past the last line of the document.
    pub end_line: usize,
}

#[must_use]
/// Find the chat section enclosing `cursor_line`.
///
/// The opening heading is the nearest heading strictly above the cursor whose text equals
/// `title` and whose level equals `level`. The section closes at the first later heading of
/// the same or a shallower level. Returns `None` when no such heading exists.
pub fn locate_section(
    headings: &[Heading],
    cursor_line: usize,
    title: &str,
    level: usize,
    last_line: usize,
) -> Option<SectionBounds> {
    let opening = headings
        .iter()
        .rev()
        .find(|h| h.text == title && h.level == level && h.start_line < cursor_line)?;

    let end_line = headings
        .iter()
        .filter(|h| h.start_line > opening.start_line)
        .find(|h| h.level <= opening.level)
        .map_or(last_line + 1, |h| h.start_line);

    Some(SectionBounds {
        heading_line: opening.start_line,
        heading_level: opening.level,
        end_line,
    })
}

#[cfg(test)]
#[path = "tests/section.rs"]
mod tests;
