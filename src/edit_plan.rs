//! The edit plan describes how a command changes the document.
//!
//! Planning and applying are kept apart: a plan is computed from the document as it is, holds
//! every range replacement together with the cursor position to land on afterwards, and is
//! only applied once there is something to write (for example after a reply has arrived).
//! The cursor is never found by re-reading the document after the write.

use crate::document::{Editor, Position};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
/// Replacement of one range of the document.
pub struct Edit {
    /// Start of the replaced range.
    pub from: Position,
    /// End of the replaced range; `None` inserts at `from`.
    pub to: Option<Position>,
    /// New text.
    pub text: String,
}

impl Edit {
    #[must_use]
    /// Insert `text` at `at`.
    pub fn insert(at: Position, text: impl Into<String>) -> Self {
        Self {
            from: at,
            to: None,
            text: text.into(),
        }
    }

    #[must_use]
    /// Replace the whole of `line` with `text`.
    pub fn replace_line(line: usize, text: impl Into<String>) -> Self {
        Self {
            from: Position::line_start(line),
            to: Some(Position::line_end(line)),
            text: text.into(),
        }
    }

    #[must_use]
    /// Insert `text` as if at the start of `line`, which may lie past the end of the document.
    ///
    /// A missing line is reached by inserting at the end of the last line, preceded by a line
    /// break.
    pub fn insert_at_line(editor: &dyn Editor, line: usize, text: &str) -> Self {
        let last = editor.last_line();
        if line > last {
            Self::insert(Position::line_end(last), format!("\n{text}"))
        } else {
            Self::insert(Position::line_start(line), text)
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
/// Ordered edits and the cursor position that follows them.
pub struct EditPlan {
    /// Edits, applied last to first so earlier positions stay valid.
    pub edits: Vec<Edit>,
    /// Where the cursor goes once the edits are in.
    pub cursor: Position,
}

impl EditPlan {
    #[must_use]
    /// Plan made of a single edit.
    pub fn single(edit: Edit, cursor: Position) -> Self {
        Self {
            edits: vec![edit],
            cursor,
        }
    }

    /// Apply all edits, then move the cursor.
    ///
    /// Edits are applied from the last position to the first, so that each one is addressed
    /// in the coordinates of the document the plan was computed from.
    pub fn apply(&self, editor: &mut dyn Editor) {
        let mut edits: Vec<&Edit> = self.edits.iter().collect();
        edits.sort_by(|a, b| b.from.cmp(&a.from));
        for edit in edits {
            editor.replace_range(&edit.text, edit.from, edit.to);
        }
        editor.set_cursor(self.cursor);
        tracing::debug!(
            edits = self.edits.len(),
            line = self.cursor.line,
            "edit plan applied"
        );
    }
}

#[cfg(test)]
#[path = "tests/edit_plan.rs"]
mod tests;
