//! Conversation turns and the builder that reconstructs them from lines.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
/// Speaker of a turn.
pub enum Role {
    /// Instructions ahead of the conversation.
    System,
    /// The person writing in the document.
    User,
    /// The language model.
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        };
        f.write_str(name)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
/// One turn of a conversation, as sent to the completion service.
pub struct Message {
    /// Who is speaking.
    pub role: Role,
    /// What was said.
    pub content: String,
}

impl Message {
    #[must_use]
    /// Message with the given role.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    #[must_use]
    /// System message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    #[must_use]
    /// User message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    #[must_use]
    /// Assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

#[derive(Default, Debug)]
/// Accumulates lines into messages while a document is scanned.
///
/// Lines pushed under the role of the current message are appended to it; anything else
/// opens a new message. [`finish`](TranscriptBuilder::finish) trims every message, drops the
/// empty ones and joins neighbours that end up sharing a role.
pub struct TranscriptBuilder {
    messages: Vec<Message>,
}

impl TranscriptBuilder {
    #[must_use]
    /// Empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `line` to the current message if it has `role`, otherwise open a new one.
    pub fn push_line(&mut self, role: Role, line: &str) {
        match self.messages.last_mut() {
            Some(last) if last.role == role => {
                last.content.push_str(line);
                last.content.push('\n');
            }
            _ => self.messages.push(Message::new(role, format!("{line}\n"))),
        }
    }

    /// Open a new message even if the current one has the same role.
    pub fn start(&mut self, role: Role, seed: &str) {
        self.messages.push(Message::new(role, seed));
    }

    /// Append a line to the current message, if there is one.
    ///
    /// Returns false when no message has been started yet.
    pub fn append(&mut self, line: &str) -> bool {
        let Some(last) = self.messages.last_mut() else {
            return false;
        };
        last.content.push_str(line);
        last.content.push('\n');
        true
    }

    #[must_use]
    /// Role of the message currently being built.
    pub fn current_role(&self) -> Option<Role> {
        self.messages.last().map(|m| m.role)
    }

    #[must_use]
    /// Trimmed, non-empty messages with no two neighbours sharing a role.
    pub fn finish(self) -> Vec<Message> {
        let mut finished: Vec<Message> = Vec::with_capacity(self.messages.len());
        for message in self.messages {
            let content = message.content.trim();
            if content.is_empty() {
                continue;
            }
            match finished.last_mut() {
                Some(last) if last.role == message.role => {
                    last.content.push_str("\n\n");
                    last.content.push_str(content);
                }
                _ => finished.push(Message::new(message.role, content)),
            }
        }
        finished
    }
}

#[cfg(test)]
#[path = "tests/message.rs"]
mod tests;
