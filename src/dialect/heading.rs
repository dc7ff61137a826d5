//! Heading dialect: a chat is the section under a heading titled with the chat title.
//!
//! An optional property block sits directly under the heading. Below it, role headings
//! (`### Chat`, `### User`) switch the speaker; text before the first role heading belongs
//! to the user.

use super::{
    last_content_line, plan_opening, response_lines, ChatSource, Dialect, DialectConfig,
    TemplateSource,
};
use crate::chat_settings::{parse_properties, ParsedConfig};
use crate::document::{Editor, Position};
use crate::edit_plan::{Edit, EditPlan};
use crate::error::ChatError;
use crate::message::{Message, Role, TranscriptBuilder};
use crate::properties::find_properties;
use crate::section::{locate_section, ChatSection, Heading};

#[derive(Clone, Debug, Default)]
/// Chats as heading sections with role sub-headings.
pub struct HeadingDialect {
    config: DialectConfig,
}

impl HeadingDialect {
    #[must_use]
    /// Dialect using the given names.
    pub fn new(config: DialectConfig) -> Self {
        Self { config }
    }

    /// Split off the leading property block and read the rest as turns.
    fn read_body<S: AsRef<str>>(&self, lines: &[S], first_role: Role) -> (ParsedConfig, Vec<Message>) {
        match find_properties(lines) {
            Some(span) => (
                parse_properties(&lines[..=span.end]),
                self.transcript(&lines[span.end + 1..], first_role),
            ),
            None => (ParsedConfig::default(), self.transcript(lines, first_role)),
        }
    }

    fn transcript<S: AsRef<str>>(&self, lines: &[S], first_role: Role) -> Vec<Message> {
        let mut builder = TranscriptBuilder::new();
        let mut role = first_role;
        for line in lines {
            let line = line.as_ref();
            if let Some(next) = self.config.role_of_heading(line) {
                role = next;
                continue;
            }
            builder.push_line(role, line);
        }
        builder.finish()
    }

    /// Reply lines rewritten so that none of them closes the section or reads as a role
    /// heading.
    ///
    /// Headings are pushed below the role headings. A line that still matches a role heading
    /// gets its first `#` escaped. Inside fenced code only the escaping applies.
    fn reply_lines(&self, response: &str, section_level: usize) -> Vec<String> {
        let min_level = (section_level + 2).min(6);
        let mut in_fence = false;
        response_lines(response)
            .into_iter()
            .map(|line| {
                if is_fence(line) {
                    in_fence = !in_fence;
                    return line.to_string();
                }
                let line = match atx_heading(line) {
                    Some((level, rest)) if !in_fence => {
                        format!("{}{rest}", "#".repeat(level.max(min_level)))
                    }
                    _ => line.to_string(),
                };
                if self.config.role_of_heading(&line).is_some() {
                    format!("\\{line}")
                } else {
                    line
                }
            })
            .collect()
    }
}

/// Marker for role headings one level below the section heading.
fn role_marker(section_level: usize) -> String {
    "#".repeat((section_level + 1).min(6))
}

fn is_fence(line: &str) -> bool {
    let text = line.trim_start();
    text.starts_with("```") || text.starts_with("~~~")
}

/// Level and text after the markers of an ATX heading line.
fn atx_heading(line: &str) -> Option<(usize, &str)> {
    let body = line.trim_start_matches(' ');
    if line.len() - body.len() > 3 {
        return None;
    }
    let level = body.bytes().take_while(|&b| b == b'#').count();
    let rest = &body[level..];
    ((1..=6).contains(&level) && (rest.is_empty() || rest.starts_with([' ', '\t'])))
        .then_some((level, rest))
}

impl Dialect for HeadingDialect {
    fn config(&self) -> &DialectConfig {
        &self.config
    }

    fn uses_outline(&self) -> bool {
        true
    }

    fn has_titles(&self) -> bool {
        false
    }

    fn read_chat(
        &self,
        editor: &dyn Editor,
        headings: &[Heading],
    ) -> Result<ChatSource, ChatError> {
        let bounds = locate_section(
            headings,
            editor.cursor().line,
            &self.config.chat_title,
            self.config.section_level,
            editor.last_line(),
        )
        .ok_or(ChatError::ChatNotFound)?;

        let start_line = bounds.heading_line + 1;
        let content = if start_line < bounds.end_line {
            editor.range(
                Position::line_start(start_line),
                Position::line_end(bounds.end_line - 1),
            )
        } else {
            String::new()
        };
        let section = ChatSection {
            heading_line: bounds.heading_line,
            start_line,
            end_line: bounds.end_line,
            heading_level: bounds.heading_level,
            content,
        };

        let lines = section.lines();
        let (parsed, messages) = self.read_body(&lines, Role::User);
        let anchor_line = last_content_line(&lines, start_line, bounds.heading_line);
        tracing::debug!(
            heading = bounds.heading_line,
            end = bounds.end_line,
            messages = messages.len(),
            "heading chat read"
        );

        Ok(ChatSource {
            section,
            config: parsed.config,
            settings: parsed.settings,
            literals: parsed.literals,
            messages,
            anchor_line,
        })
    }

    /// Templates use the same layout as a chat body. Text before any role heading is an
    /// instruction to the model, so it is read as a system message.
    fn parse_template(&self, text: &str) -> TemplateSource {
        let lines: Vec<&str> = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect();
        let (parsed, messages) = self.read_body(&lines, Role::System);
        TemplateSource {
            settings: parsed.settings,
            literals: Vec::new(),
            messages,
        }
    }

    fn plan_new_chat(&self, editor: &dyn Editor, template: Option<&str>) -> EditPlan {
        let mut header = vec![format!(
            "{} {}",
            "#".repeat(self.config.section_level),
            self.config.chat_title
        )];
        if let Some(name) = template {
            header.push(format!("template::{name}"));
        }
        plan_opening(editor, &header)
    }

    fn plan_response(&self, source: &ChatSource, response: &str) -> EditPlan {
        let marker = role_marker(source.section.heading_level);
        let lines = self.reply_lines(response, source.section.heading_level);
        let text = format!(
            "\n\n{marker} {}\n{}\n\n{marker} {}\n",
            self.config.chat_name,
            lines.join("\n"),
            self.config.user_name
        );
        let cursor = Position::line_start(source.anchor_line + lines.len() + 5);
        EditPlan::single(Edit::insert(Position::line_end(source.anchor_line), text), cursor)
    }

    fn plan_title(&self, _source: &ChatSource, _title: &str, _cursor: Position) -> Option<EditPlan> {
        None
    }
}

#[cfg(test)]
#[path = "../tests/heading_dialect.rs"]
mod tests;
