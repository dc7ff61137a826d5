//! `key::value` property blocks at the top of a chat.
//!
//! A property block is the longest run of lines, starting at the first line, in which every
//! line looks like `identifier::value`. A blank line or any other line ends it. Keys and
//! values are split out here but not interpreted; see [`crate::chat_settings`].

use regex::Regex;
use std::sync::LazyLock;

static PROPERTY_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z_]+::").unwrap());

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Inclusive index range of a property block within a list of lines.
pub struct PropertySpan {
    /// Index of the first property line.
    pub start: usize,
    /// Index of the last property line.
    pub end: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A located property block with its raw key/value pairs.
pub struct PropertyBlock {
    /// Where the block sits in the line list.
    pub span: PropertySpan,
    /// Keys and values in block order, values untrimmed.
    pub pairs: Vec<(String, String)>,
}

#[must_use]
/// Whether a line has the `identifier::value` shape.
pub fn is_property_line(line: &str) -> bool {
    PROPERTY_LINE.is_match(line)
}

#[must_use]
/// Locate the property block at the top of `lines`.
///
/// Returns `None` when the first line is blank or is not a property line.
pub fn find_properties<S: AsRef<str>>(lines: &[S]) -> Option<PropertySpan> {
    let count = lines
        .iter()
        .map(AsRef::as_ref)
        .take_while(|line| !line.trim().is_empty() && is_property_line(line))
        .count();

    (count > 0).then(|| PropertySpan {
        start: 0,
        end: count - 1,
    })
}

impl PropertyBlock {
    #[must_use]
    /// Locate the property block at the top of `lines` and split each line into a pair.
    pub fn extract<S: AsRef<str>>(lines: &[S]) -> Option<Self> {
        let span = find_properties(lines)?;
        let pairs = lines[span.start..=span.end]
            .iter()
            .filter_map(|line| split_property(line.as_ref()))
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Some(Self { span, pairs })
    }
}

#[must_use]
/// Split `key::value` at the first separator.
pub fn split_property(line: &str) -> Option<(&str, &str)> {
    line.split_once("::")
}

#[cfg(test)]
#[path = "tests/properties.rs"]
mod tests;
