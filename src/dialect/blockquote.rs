//! Blockquote dialect: a chat opens with a `> [!CHAT-CONFIG]-` callout.
//!
//! The callout's quoted lines hold the title, properties and literal system lines. Replies
//! are `> [!CHAT-RESPONSE]` callouts; unquoted text between them is the user's. A chat runs
//! until the next config callout or the end of the document.

use super::{
    last_content_line, plan_opening, response_lines, ChatSource, Dialect, DialectConfig,
    TemplateSource,
};
use crate::chat_settings::{parse_chat_config, CHAT_CONFIG_MARKER, CHAT_RESPONSE_MARKER};
use crate::document::{Editor, Position};
use crate::edit_plan::{Edit, EditPlan};
use crate::error::ChatError;
use crate::message::{Message, Role, TranscriptBuilder};
use crate::section::{ChatSection, Heading};

#[derive(Clone, Debug, Default)]
/// Chats as config callouts followed by quoted replies.
pub struct BlockquoteDialect {
    config: DialectConfig,
}

/// Text of a quoted line: the `>` and one optional space removed.
fn unquote(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('>')?;
    Some(rest.strip_prefix(' ').unwrap_or(rest))
}

fn is_config_line(line: &str) -> bool {
    unquote(line).is_some_and(|text| text.starts_with(CHAT_CONFIG_MARKER))
}

fn is_response_line(line: &str) -> bool {
    unquote(line).is_some_and(|text| text.starts_with(CHAT_RESPONSE_MARKER))
}

impl BlockquoteDialect {
    #[must_use]
    /// Dialect using the given names.
    pub fn new(config: DialectConfig) -> Self {
        Self { config }
    }

    /// Rebuild the turns written below a config callout.
    fn transcript<S: AsRef<str>>(lines: &[S]) -> Vec<Message> {
        let mut builder = TranscriptBuilder::new();
        for line in lines {
            let line = line.as_ref();
            if is_config_line(line) {
                break;
            }
            if is_response_line(line) {
                builder.start(Role::Assistant, "");
                continue;
            }
            match unquote(line) {
                Some(text) => {
                    if !builder.append(text) {
                        builder.start(Role::User, "");
                        builder.append(text);
                    }
                }
                None => {
                    if builder.current_role().is_none_or(|role| role == Role::Assistant) {
                        builder.start(Role::User, "");
                    }
                    builder.append(line);
                }
            }
        }
        builder.finish()
    }
}

impl Dialect for BlockquoteDialect {
    fn config(&self) -> &DialectConfig {
        &self.config
    }

    fn uses_outline(&self) -> bool {
        false
    }

    fn has_titles(&self) -> bool {
        true
    }

    fn read_chat(
        &self,
        editor: &dyn Editor,
        _headings: &[Heading],
    ) -> Result<ChatSource, ChatError> {
        let last = editor.last_line();
        let cursor = editor.cursor().line.min(last + 1);
        let config_line = (0..cursor)
            .rev()
            .find(|&line| is_config_line(&editor.line(line)))
            .ok_or(ChatError::ChatNotFound)?;

        let mut preamble = Vec::new();
        let mut line = config_line;
        while line <= last {
            let text = editor.line(line);
            let Some(inner) = unquote(&text) else { break };
            if line > config_line && is_response_line(&text) {
                break;
            }
            preamble.push(inner.to_string());
            line += 1;
        }
        let start_line = line;

        let mut body = Vec::new();
        while line <= last {
            let text = editor.line(line);
            if is_config_line(&text) {
                break;
            }
            body.push(text);
            line += 1;
        }
        let end_line = line;

        let parsed = parse_chat_config(&preamble);
        let messages = Self::transcript(&body);
        let anchor_line = last_content_line(&body, start_line, start_line - 1);
        tracing::debug!(
            config = config_line,
            end = end_line,
            messages = messages.len(),
            "callout chat read"
        );

        Ok(ChatSource {
            section: ChatSection {
                heading_line: config_line,
                start_line,
                end_line,
                heading_level: 0,
                content: body.join("\n"),
            },
            config: parsed.config,
            settings: parsed.settings,
            literals: parsed.literals,
            messages,
            anchor_line,
        })
    }

    /// The whole template is a config preamble; quote markers are optional.
    fn parse_template(&self, text: &str) -> TemplateSource {
        let lines: Vec<&str> = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .map(|line| unquote(line).unwrap_or(line))
            .collect();
        let parsed = parse_chat_config(&lines);
        TemplateSource {
            settings: parsed.settings,
            literals: parsed.literals,
            messages: Vec::new(),
        }
    }

    fn plan_new_chat(&self, editor: &dyn Editor, template: Option<&str>) -> EditPlan {
        let mut header = vec![format!(
            "> {CHAT_CONFIG_MARKER} Start a new chat with {}",
            self.config.chat_name
        )];
        if let Some(name) = template {
            header.push(format!("> template::{name}"));
        }
        header.push(">".to_string());
        plan_opening(editor, &header)
    }

    fn plan_response(&self, source: &ChatSource, response: &str) -> EditPlan {
        let lines = response_lines(response);
        let mut text = format!("\n\n> {CHAT_RESPONSE_MARKER} {}\n", self.config.chat_name);
        for line in &lines {
            if line.is_empty() {
                text.push_str(">\n");
            } else {
                text.push_str("> ");
                text.push_str(line);
                text.push('\n');
            }
        }
        text.push('\n');
        let cursor = Position::line_start(source.anchor_line + lines.len() + 4);
        EditPlan::single(Edit::insert(Position::line_end(source.anchor_line), text), cursor)
    }

    fn plan_title(&self, source: &ChatSource, title: &str, cursor: Position) -> Option<EditPlan> {
        let line = format!("> {CHAT_CONFIG_MARKER} {}", title.trim());
        Some(EditPlan::single(
            Edit::replace_line(source.section.heading_line, line),
            cursor,
        ))
    }
}

#[cfg(test)]
#[path = "../tests/blockquote_dialect.rs"]
mod tests;
