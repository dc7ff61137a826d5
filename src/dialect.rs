//! Document dialects: the textual conventions a chat can be written in.
//!
//! Both dialects answer the same questions through [`Dialect`]: where is the chat around the
//! cursor, what are its properties and turns, and where does new text go. What differs is
//! the markup:
//!
//! ```text
//! heading dialect                 blockquote dialect
//!
//! ## Chat                         > [!CHAT-CONFIG]- Trip planning
//! template::travel                > template::travel
//!                                 >
//! Where should I go in May?
//!                                 Where should I go in May?
//! ### Chat
//! Lisbon is lovely in May.        > [!CHAT-RESPONSE] Chat
//!                                 > Lisbon is lovely in May.
//! ### User
//! ```

pub mod blockquote;
pub mod heading;

use crate::chat_settings::{ChatConfig, ChatSettings};
use crate::document::{Editor, Position};
use crate::edit_plan::{Edit, EditPlan};
use crate::error::ChatError;
use crate::message::{Message, Role};
use crate::section::{ChatSection, Heading};
use regex::Regex;
use std::str::FromStr;

pub use blockquote::BlockquoteDialect;
pub use heading::HeadingDialect;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Which dialect a deployment writes.
pub enum DialectKind {
    /// Chats are sections under a chat heading; role sub-headings switch speakers.
    Heading,
    /// Chats open with a `[!CHAT-CONFIG]` callout; replies are quoted callouts.
    Blockquote,
}

impl FromStr for DialectKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "heading" | "headings" => Ok(Self::Heading),
            "blockquote" | "callout" => Ok(Self::Blockquote),
            other => Err(format!("unknown chat format '{other}'")),
        }
    }
}

#[derive(Clone, Debug)]
/// Names and matchers a dialect works with, derived from the user's settings.
///
/// Rebuild this value whenever the settings change; dialects never read settings directly.
pub struct DialectConfig {
    /// Heading text that opens a chat section.
    pub chat_title: String,
    /// Name the model goes by; also its role heading.
    pub chat_name: String,
    /// Role heading for the user's turns.
    pub user_name: String,
    /// Depth of the heading that opens a chat section.
    pub section_level: usize,
    assistant_heading: Regex,
    user_heading: Regex,
    system_heading: Regex,
}

impl DialectConfig {
    #[must_use]
    /// Compile the role matchers for the given names.
    ///
    /// # Panics
    ///
    /// Does not panic in practice: names are escaped before they are compiled.
    pub fn new(chat_title: &str, chat_name: &str, user_name: &str, section_level: usize) -> Self {
        Self {
            chat_title: chat_title.to_string(),
            chat_name: chat_name.to_string(),
            user_name: user_name.to_string(),
            section_level: section_level.clamp(1, 5),
            assistant_heading: role_heading(chat_name),
            user_heading: role_heading(user_name),
            system_heading: role_heading("System"),
        }
    }

    #[must_use]
    /// Role selected by a role heading line, at any heading depth.
    pub fn role_of_heading(&self, line: &str) -> Option<Role> {
        if self.assistant_heading.is_match(line) {
            Some(Role::Assistant)
        } else if self.user_heading.is_match(line) {
            Some(Role::User)
        } else if self.system_heading.is_match(line) {
            Some(Role::System)
        } else {
            None
        }
    }

    #[must_use]
    /// System message that tells the model its name.
    pub fn identity_message(&self) -> Message {
        Message::system(format!("You will refer to yourself as {}", self.chat_name))
    }
}

impl Default for DialectConfig {
    fn default() -> Self {
        Self::new("Chat", "Chat", "User", 2)
    }
}

fn role_heading(name: &str) -> Regex {
    let pattern = format!(r"^#{{1,6}}\s+{}\s*$", regex::escape(name.trim()));
    Regex::new(&pattern).expect("escaped role name is a valid pattern")
}

#[derive(Clone, Debug, PartialEq)]
/// Everything read from the chat around the cursor.
pub struct ChatSource {
    /// Where the chat is and its body text.
    pub section: ChatSection,
    /// Chat metadata from its properties.
    pub config: ChatConfig,
    /// Completion parameters from its properties.
    pub settings: ChatSettings,
    /// Literal preamble lines, sent as system messages.
    pub literals: Vec<String>,
    /// Conversation turns in document order.
    pub messages: Vec<Message>,
    /// Last non-blank line of the chat, where a reply is attached.
    pub anchor_line: usize,
}

#[derive(Clone, Debug, Default, PartialEq)]
/// Settings and seed messages read from a template document.
pub struct TemplateSource {
    /// Completion parameters.
    pub settings: ChatSettings,
    /// Literal lines, sent as system messages unless the chat has its own.
    pub literals: Vec<String>,
    /// Seed conversation placed before the chat's own turns.
    pub messages: Vec<Message>,
}

/// One textual convention for chats inside documents.
pub trait Dialect {
    /// Names and matchers this dialect was built with.
    fn config(&self) -> &DialectConfig;

    /// Whether [`read_chat`](Dialect::read_chat) needs the heading outline.
    fn uses_outline(&self) -> bool;

    /// Whether chats written in this dialect carry a title that can be rewritten.
    fn has_titles(&self) -> bool;

    /// Locate the chat above the cursor and read its properties and turns.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::ChatNotFound`] when there is no chat above the cursor.
    fn read_chat(&self, editor: &dyn Editor, headings: &[Heading])
        -> Result<ChatSource, ChatError>;

    /// Read a template document.
    fn parse_template(&self, text: &str) -> TemplateSource;

    /// Plan the insertion of a new, empty chat at the cursor.
    fn plan_new_chat(&self, editor: &dyn Editor, template: Option<&str>) -> EditPlan;

    /// Plan writing `response` as the model's turn, followed by room for the next user turn.
    fn plan_response(&self, source: &ChatSource, response: &str) -> EditPlan;

    /// Plan setting the chat's title, if this dialect stores titles.
    fn plan_title(&self, source: &ChatSource, title: &str, cursor: Position) -> Option<EditPlan>;
}

#[must_use]
/// Build the dialect selected in the settings.
pub fn build(kind: DialectKind, config: DialectConfig) -> Box<dyn Dialect> {
    match kind {
        DialectKind::Heading => Box::new(HeadingDialect::new(config)),
        DialectKind::Blockquote => Box::new(BlockquoteDialect::new(config)),
    }
}

#[must_use]
/// Number of blank lines at the end of `lines`.
pub fn trailing_blank_lines<S: AsRef<str>>(lines: &[S]) -> usize {
    lines
        .iter()
        .rev()
        .take_while(|line| line.as_ref().trim().is_empty())
        .count()
}

#[must_use]
/// Document line of the last non-blank line in `lines`, which start at `first_line`.
///
/// Derived only from the count of trailing blank lines; `fallback` is returned when every
/// line is blank.
pub fn last_content_line<S: AsRef<str>>(lines: &[S], first_line: usize, fallback: usize) -> usize {
    let trailing = trailing_blank_lines(lines);
    if trailing == lines.len() {
        fallback
    } else {
        first_line + lines.len() - 1 - trailing
    }
}

/// Plan opening a chat at the cursor with the given header lines.
///
/// When the cursor is on the last line and that line has text, the header is preceded by a
/// blank line. When the cursor is mid-line or the line has text, the header goes on the
/// following line and is followed by an extra blank line. The cursor lands
/// `header.len() + 1` lines below the insertion line.
pub(crate) fn plan_opening(editor: &dyn Editor, header: &[String]) -> EditPlan {
    let cursor = editor.cursor();
    let line = editor.line(cursor.line);
    let mut insert_line = cursor.line;
    let spacing = header.len() + 1;

    let mut block = String::new();
    if cursor.line == editor.last_line() && !line.is_empty() {
        block.push('\n');
    }
    for header_line in header {
        block.push_str(header_line);
        block.push('\n');
    }
    if cursor.column > 0 || !line.is_empty() {
        insert_line += 1;
        block.push('\n');
    }
    block.push('\n');

    EditPlan::single(
        Edit::insert_at_line(editor, insert_line, &block),
        Position::line_start(insert_line + spacing),
    )
}

/// Lines of a response, trimmed as a whole.
pub(crate) fn response_lines(response: &str) -> Vec<&str> {
    response
        .trim()
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

#[cfg(test)]
#[path = "tests/dialect.rs"]
mod tests;
