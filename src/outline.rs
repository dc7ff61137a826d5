//! Heading outline of a document, built with tree-sitter.
//!
//! This is the structural index the section locator works from: every heading with its
//! text, level and line, in document order.

use crate::error::ChatError;
use crate::formats::Format;
use crate::section::Heading;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Parser, Query, QueryCursor};

/// Parse `source` and list its headings in document order.
///
/// # Errors
///
/// Returns [`ChatError::Outline`] if the grammar or query cannot be loaded, or the parser
/// produces no tree.
pub fn extract_headings<F: Format + ?Sized>(
    source: &str,
    format: &F,
) -> Result<Vec<Heading>, ChatError> {
    let language = format.language();
    let mut parser = Parser::new();
    parser
        .set_language(&language)
        .map_err(|e| ChatError::Outline(e.to_string()))?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ChatError::Outline("parser returned no tree".to_string()))?;
    let query = Query::new(&language, format.heading_query())
        .map_err(|e| ChatError::Outline(e.to_string()))?;

    let bytes = source.as_bytes();
    let mut headings = Vec::new();
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(&query, tree.root_node(), bytes);

    while let Some(found) = matches.next() {
        for capture in found.captures {
            let node = capture.node;
            let mut level = None;
            let mut text = "";

            let mut walker = node.walk();
            for child in node.children(&mut walker) {
                if let Some(depth) = format.marker_level(child.kind()) {
                    level = Some(depth);
                } else if child.kind() == format.content_kind() {
                    text = child.utf8_text(bytes).unwrap_or_default();
                }
            }

            if let Some(level) = level {
                headings.push(Heading::new(
                    heading_text(text),
                    level,
                    node.start_position().row,
                ));
            }
        }
    }

    tracing::trace!(count = headings.len(), "outline built");
    Ok(headings)
}

/// Heading text without surrounding space or an optional closing `#` sequence.
fn heading_text(raw: &str) -> &str {
    let text = raw.trim();
    let open = text.trim_end_matches('#');
    if open.len() < text.len() && (open.is_empty() || open.ends_with(char::is_whitespace)) {
        open.trim_end()
    } else {
        text
    }
}

#[cfg(test)]
#[path = "tests/outline.rs"]
mod tests;
