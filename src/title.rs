//! Prompts for title and keyword inference, and tidying of the suggestions that come back.

use crate::chat_settings::ChatSettings;
use crate::completion::CompletionRequest;
use crate::error::ChatError;
use crate::message::Message;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

const TITLE_PROMPT: &str = "Infer title from the summary of the content of these messages. \
                            Return 3 suggestions for the title and nothing else";

const KEYWORD_PROMPT: &str = "Provide high level keywords for these messages. \
                              Add some keywords on the theme and type of the messages.";

static LIST_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-\s*").unwrap());
static ORDINAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.?\s*").unwrap());
static COLONS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*:+\s*").unwrap());
static BACKSLASHES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\\+\s*").unwrap());
static SLASHES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*/+\s*").unwrap());

#[derive(Clone, Debug, PartialEq)]
/// What the inference prompt is about.
pub enum Subject<'a> {
    /// The turns of a chat.
    Chat(&'a [Message]),
    /// A whole document with no chat in it.
    Document(&'a str),
}

impl Subject<'_> {
    fn to_json(&self) -> Result<String, ChatError> {
        let json = match self {
            Subject::Chat(messages) => serde_json::to_string(messages)?,
            Subject::Document(text) => serde_json::to_string(&Message::user(*text))?,
        };
        Ok(json)
    }
}

fn prompt_request(
    prompt: &str,
    subject: &Subject<'_>,
    settings: ChatSettings,
) -> Result<CompletionRequest, ChatError> {
    let content = format!("{prompt}\nMessages:\n\n{}", subject.to_json()?);
    settings.into_request(vec![Message::user(content)])
}

/// Request asking for three title suggestions.
///
/// # Errors
///
/// Returns an error if the subject cannot be encoded.
pub fn title_request(subject: &Subject<'_>) -> Result<CompletionRequest, ChatError> {
    prompt_request(TITLE_PROMPT, subject, ChatSettings::title_inference())
}

/// Request asking for keywords.
///
/// # Errors
///
/// Returns an error if the subject cannot be encoded.
pub fn keyword_request(subject: &Subject<'_>) -> Result<CompletionRequest, ChatError> {
    prompt_request(KEYWORD_PROMPT, subject, ChatSettings::keyword_inference())
}

#[must_use]
/// Tidy one suggested title.
///
/// Removes a list marker, a leading ordinal and one pair of surrounding quotes. Titles meant
/// for file names also have `:` and `\` turned into ` - ` and `/` into `, `.
pub fn clean_title(title: &str, document_title: bool) -> String {
    let title = LIST_MARKER.replace(title, "");
    let title = ORDINAL.replace(&title, "");

    let mut title = title.into_owned();
    if let Some(rest) = title.strip_prefix(['"', '\'']) {
        let rest = rest.strip_suffix(['"', '\'']).unwrap_or(rest);
        title = rest.to_string();
    }

    if document_title {
        title = COLONS.replace_all(&title, " - ").into_owned();
        title = BACKSLASHES.replace_all(&title, " - ").into_owned();
        title = SLASHES.replace_all(&title, ", ").into_owned();
    }
    title.trim().to_string()
}

#[must_use]
/// One cleaned title per non-empty line of a response.
pub fn suggestions(response: &str, document_title: bool) -> Vec<String> {
    response
        .trim()
        .lines()
        .map(|line| clean_title(line, document_title))
        .filter(|title| !title.is_empty())
        .collect()
}

#[must_use]
/// Path of `path` renamed to `title`, keeping its folder and extension.
pub fn renamed_path(path: &Path, title: &str) -> PathBuf {
    let file_name = match path.extension() {
        Some(ext) => format!("{title}.{}", ext.to_string_lossy()),
        None => title.to_string(),
    };
    path.with_file_name(file_name)
}

#[cfg(test)]
#[path = "tests/title.rs"]
mod tests;
