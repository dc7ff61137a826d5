//! The chat-completion service the conversation is sent to.
//!
//! The core only needs "request in, reply text out"; [`OpenAiClient`] implements that over an
//! OpenAI-compatible HTTP endpoint. Failures are surfaced once and never retried.

use crate::error::ChatError;
use crate::message::Message;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
/// A fully resolved chat-completion request.
pub struct CompletionRequest {
    /// Model identifier.
    pub model: String,
    /// Conversation, system messages first.
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Sampling temperature.
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Nucleus sampling mass.
    pub top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Number of completions.
    pub n: Option<u32>,
    /// Whether the reply is streamed.
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Stop sequence.
    pub stop: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Upper bound on reply length.
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Penalty for tokens already present.
    pub presence_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Penalty proportional to token frequency.
    pub frequency_penalty: Option<f64>,
}

/// Something that can answer a completion request with the text of one reply.
pub trait CompletionService {
    /// Send `request` and return the content of the first choice.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::Service`] when the request fails and
    /// [`ChatError::EmptyResponse`] when the reply has no content.
    fn complete(&self, request: &CompletionRequest) -> Result<String, ChatError>;
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    #[must_use]
    /// Client sending requests to `base_url` (for example `https://api.openai.com/v1`).
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

impl CompletionService for OpenAiClient {
    fn complete(&self, request: &CompletionRequest) -> Result<String, ChatError> {
        let mut body = request.clone();
        if body.stream {
            tracing::warn!("streaming replies are not supported, requesting a single reply");
            body.stream = false;
        }

        tracing::info!(
            model = %body.model,
            messages = body.messages.len(),
            "sending completion request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| ChatError::Service(format!("Network error: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().unwrap_or_default();
            return Err(map_api_error(status, &text));
        }

        let parsed: CompletionResponse = response
            .json()
            .map_err(|e| ChatError::Service(format!("Unreadable response: {e}")))?;

        extract_content(parsed)
    }
}

fn extract_content(response: CompletionResponse) -> Result<String, ChatError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(ChatError::EmptyResponse)
}

fn map_api_error(status: reqwest::StatusCode, body: &str) -> ChatError {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string());
    match status.as_u16() {
        401 => ChatError::Service("Invalid API key".to_string()),
        429 => ChatError::Service(format!("Rate limited: {detail}")),
        _ => ChatError::Service(format!("{status}: {detail}")),
    }
}

#[cfg(test)]
#[path = "tests/completion.rs"]
mod tests;
