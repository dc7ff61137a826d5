//! Typed chat configuration read from `key::value` lines.
//!
//! Parsing is total. A numeric property whose value is not a number is left unset rather
//! than defaulted, so a lower layer (template or defaults) still applies. `stream` is only
//! true for the literal value `true`.

use crate::completion::CompletionRequest;
use crate::error::ChatError;
use crate::message::Message;
use crate::properties::split_property;
use serde::{Deserialize, Serialize};

/// Prefix of the line that opens a chat in the callout format; the rest is its title.
pub const CHAT_CONFIG_MARKER: &str = "[!CHAT-CONFIG]-";

/// Prefix of the line that opens a model reply in the callout format.
pub const CHAT_RESPONSE_MARKER: &str = "[!CHAT-RESPONSE]";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Per-chat metadata.
pub struct ChatConfig {
    /// Display title of the chat.
    pub title: Option<String>,
    /// Name of the template the chat is based on.
    pub template: Option<String>,
}

impl ChatConfig {
    #[must_use]
    /// Fields of `over` where set, otherwise those of `self`.
    pub fn layer(self, over: Self) -> Self {
        Self {
            title: over.title.or(self.title),
            template: over.template.or(self.template),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
/// Tunable completion parameters, any of which may be unset.
pub struct ChatSettings {
    /// Model identifier, stored as written.
    pub model: Option<String>,
    /// Sampling temperature.
    pub temperature: Option<f64>,
    /// Nucleus sampling mass.
    pub top_p: Option<f64>,
    /// Number of completions to request.
    pub n: Option<u32>,
    /// Whether the reply should be streamed.
    pub stream: Option<bool>,
    /// Stop sequence, kept as the literal text.
    pub stop: Option<String>,
    /// Upper bound on reply length.
    pub max_tokens: Option<u32>,
    /// Penalty for tokens already present.
    pub presence_penalty: Option<f64>,
    /// Penalty proportional to token frequency.
    pub frequency_penalty: Option<f64>,
}

impl ChatSettings {
    #[must_use]
    /// Settings applied beneath every template and chat.
    pub fn defaults() -> Self {
        Self {
            model: Some("gpt-3.5-turbo".to_string()),
            temperature: Some(0.0),
            top_p: Some(1.0),
            max_tokens: Some(512),
            presence_penalty: Some(0.0),
            frequency_penalty: Some(0.0),
            stream: Some(false),
            ..Self::default()
        }
    }

    #[must_use]
    /// Settings used to ask for title suggestions.
    pub fn title_inference() -> Self {
        Self {
            max_tokens: Some(64),
            ..Self::defaults()
        }
    }

    #[must_use]
    /// Settings used to ask for keywords.
    pub fn keyword_inference() -> Self {
        Self {
            max_tokens: Some(64),
            temperature: Some(0.5),
            frequency_penalty: Some(0.8),
            ..Self::defaults()
        }
    }

    #[must_use]
    /// Field-by-field overlay: every field set in `over` replaces the one in `self`.
    pub fn layer(self, over: Self) -> Self {
        Self {
            model: over.model.or(self.model),
            temperature: over.temperature.or(self.temperature),
            top_p: over.top_p.or(self.top_p),
            n: over.n.or(self.n),
            stream: over.stream.or(self.stream),
            stop: over.stop.or(self.stop),
            max_tokens: over.max_tokens.or(self.max_tokens),
            presence_penalty: over.presence_penalty.or(self.presence_penalty),
            frequency_penalty: over.frequency_penalty.or(self.frequency_penalty),
        }
    }

    /// Attach the conversation and produce a request with every required field resolved.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::NoUserMessage`] if `messages` is empty.
    pub fn into_request(self, messages: Vec<Message>) -> Result<CompletionRequest, ChatError> {
        if messages.is_empty() {
            return Err(ChatError::NoUserMessage);
        }
        let defaults = Self::defaults();
        let resolved = defaults.layer(self);
        Ok(CompletionRequest {
            model: resolved.model.unwrap_or_default(),
            messages,
            temperature: resolved.temperature,
            top_p: resolved.top_p,
            n: resolved.n,
            stream: resolved.stream.unwrap_or(false),
            stop: resolved.stop,
            max_tokens: resolved.max_tokens,
            presence_penalty: resolved.presence_penalty,
            frequency_penalty: resolved.frequency_penalty,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
/// Result of reading one set of configuration lines.
pub struct ParsedConfig {
    /// Chat metadata found.
    pub config: ChatConfig,
    /// Completion parameters found.
    pub settings: ChatSettings,
    /// Non-empty lines that were not configuration, in order (callout format only).
    pub literals: Vec<String>,
}

/// Interpret one property. Returns false when `key` is not a known property.
fn apply_property(
    key: &str,
    value: &str,
    config: &mut ChatConfig,
    settings: &mut ChatSettings,
) -> bool {
    let value = value.trim();
    match key {
        "template" => config.template = non_empty(value).or(config.template.take()),
        "model" => settings.model = non_empty(value).or(settings.model.take()),
        "temperature" => settings.temperature = number(value).or(settings.temperature),
        "top_p" => settings.top_p = number(value).or(settings.top_p),
        "n" => settings.n = value.parse().ok().or(settings.n),
        "max_tokens" => settings.max_tokens = value.parse().ok().or(settings.max_tokens),
        "presence_penalty" => {
            settings.presence_penalty = number(value).or(settings.presence_penalty);
        }
        "frequency_penalty" => {
            settings.frequency_penalty = number(value).or(settings.frequency_penalty);
        }
        "stream" => settings.stream = Some(value == "true"),
        "stop" => settings.stop = non_empty(value).or(settings.stop.take()),
        _ => return false,
    }
    true
}

fn number(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

#[must_use]
/// Read the lines of a property block. Unknown keys and other lines are ignored.
pub fn parse_properties<S: AsRef<str>>(lines: &[S]) -> ParsedConfig {
    let mut parsed = ParsedConfig::default();
    for line in lines {
        if let Some((key, value)) = split_property(line.as_ref()) {
            apply_property(key, value, &mut parsed.config, &mut parsed.settings);
        }
    }
    parsed
}

#[must_use]
/// Read a callout-format config preamble (quote markers already stripped).
///
/// Besides the properties, the `[!CHAT-CONFIG]-` line and a `title::` property set the
/// title, and every other non-empty line is kept as a literal, to be sent as a system
/// message.
pub fn parse_chat_config<S: AsRef<str>>(lines: &[S]) -> ParsedConfig {
    let mut parsed = ParsedConfig::default();
    for line in lines {
        let line = line.as_ref();
        if let Some(title) = line.strip_prefix(CHAT_CONFIG_MARKER) {
            parsed.config.title = Some(title.trim().to_string());
            continue;
        }
        if let Some((key, value)) = split_property(line) {
            if key == "title" {
                parsed.config.title = Some(value.trim().to_string());
                continue;
            }
            if apply_property(key, value, &mut parsed.config, &mut parsed.settings) {
                continue;
            }
        }
        if !line.trim().is_empty() {
            parsed.literals.push(line.to_string());
        }
    }
    parsed
}

#[cfg(test)]
#[path = "tests/chat_settings.rs"]
mod tests;
