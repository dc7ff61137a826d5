//! Format trait and implementations for the document types a chat can live in.
//!
//! A format tells the outline builder which tree-sitter grammar to parse with and how to
//! recognise headings in the resulting tree, so that heading-like text inside code blocks
//! is never mistaken for structure.

pub mod markdown;

/// Tree-sitter grammar and heading queries for one document format.
pub trait Format {
    /// Grammar used to parse the document.
    fn language(&self) -> tree_sitter::Language;

    /// Query capturing every heading node as `@heading`.
    fn heading_query(&self) -> &str;

    /// Heading depth signalled by a marker node kind, if the kind is a heading marker.
    fn marker_level(&self, kind: &str) -> Option<usize>;

    /// Node kind holding the heading's text.
    fn content_kind(&self) -> &str;
}
