//! Failures that abort a single command.
//!
//! None of these are faults of the program: each one is turned into a single notice for the
//! user and the document is left as it was. Lenient property parsing never produces an error.

use std::io;

#[derive(Debug, thiserror::Error)]
/// Reasons a chat command stops before writing anything.
pub enum ChatError {
    /// No chat heading or config callout sits above the cursor.
    #[error("No chat found above the cursor")]
    ChatNotFound,

    /// The conversation is empty or does not end with a user turn.
    #[error("No user message to respond to")]
    NoUserMessage,

    /// The completion service answered without any content.
    #[error("The model returned an empty response")]
    EmptyResponse,

    /// The completion service rejected the request or could not be reached.
    #[error("Completion request failed: {0}")]
    Service(String),

    /// Commands that call the completion service need an API key.
    #[error("No API key configured")]
    MissingApiKey,

    /// The template folder holds no templates to choose from.
    #[error("No templates found")]
    NoTemplates,

    /// Section titles can only be inferred from inside a chat.
    #[error("No section to set title for")]
    NoSectionForTitle,

    /// The active dialect has no place to store a section title.
    #[error("This chat format has no section titles")]
    TitleUnsupported,

    /// The user dismissed the picker.
    #[error("Cancelled")]
    Cancelled,

    /// The markdown outline could not be built.
    #[error("Could not read document structure: {0}")]
    Outline(String),

    /// A request or a subject could not be encoded as JSON.
    #[error("Could not encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
#[path = "tests/error.rs"]
mod tests;
