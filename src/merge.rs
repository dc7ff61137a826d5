//! Layering of defaults, template and inline chat into one completion request.
//!
//! Settings are merged field by field with the precedence inline > template > defaults.
//! Messages are composed in a fixed order:
//!
//! 1. the identity message naming the model,
//! 2. literal lines as system messages: the chat's own if it has any, the template's otherwise,
//! 3. the template's seed conversation,
//! 4. the chat's conversation.

use crate::chat_settings::{ChatConfig, ChatSettings};
use crate::completion::CompletionRequest;
use crate::dialect::{ChatSource, DialectConfig, TemplateSource};
use crate::error::ChatError;
use crate::message::{Message, Role};

#[must_use]
/// Template a chat asks for, falling back to the configured default.
pub fn template_name<'a>(inline: &'a ChatConfig, default_template: Option<&'a str>) -> Option<&'a str> {
    inline
        .template
        .as_deref()
        .or(default_template)
        .filter(|name| !name.trim().is_empty())
}

#[must_use]
/// Overlay template and inline settings on `defaults`.
pub fn merge_settings(
    defaults: ChatSettings,
    template: Option<&TemplateSource>,
    inline: &ChatSettings,
) -> ChatSettings {
    let template = template.map(|t| t.settings.clone()).unwrap_or_default();
    defaults.layer(template).layer(inline.clone())
}

#[must_use]
/// Full message list for a chat, in sending order.
pub fn compose_messages(
    dialect: &DialectConfig,
    template: Option<&TemplateSource>,
    inline: &ChatSource,
) -> Vec<Message> {
    let literals = if inline.literals.is_empty() {
        template.map_or(&[][..], |t| t.literals.as_slice())
    } else {
        inline.literals.as_slice()
    };

    let mut messages = vec![dialect.identity_message()];
    messages.extend(literals.iter().map(|line| Message::system(line.as_str())));
    if let Some(template) = template {
        messages.extend(template.messages.iter().cloned());
    }
    messages.extend(inline.messages.iter().cloned());
    messages
}

/// Check that a conversation has something to answer.
///
/// # Errors
///
/// Returns [`ChatError::NoUserMessage`] if `messages` is empty or its last turn is not the
/// user's.
pub fn ensure_user_turn(messages: &[Message]) -> Result<(), ChatError> {
    match messages.last() {
        Some(last) if last.role == Role::User => Ok(()),
        _ => Err(ChatError::NoUserMessage),
    }
}

/// Resolve the completion request for a chat.
///
/// # Errors
///
/// Returns [`ChatError::NoUserMessage`] if the chat's own conversation does not end with a
/// user turn.
pub fn build_request(
    dialect: &DialectConfig,
    template: Option<&TemplateSource>,
    inline: &ChatSource,
) -> Result<CompletionRequest, ChatError> {
    ensure_user_turn(&inline.messages)?;
    let settings = merge_settings(ChatSettings::defaults(), template, &inline.settings);
    let messages = compose_messages(dialect, template, inline);
    tracing::debug!(
        messages = messages.len(),
        template = template.is_some(),
        "request composed"
    );
    settings.into_request(messages)
}

#[cfg(test)]
#[path = "tests/merge.rs"]
mod tests;
