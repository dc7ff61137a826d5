//! Settings that persist between runs.
//!
//! We look for a colloquy.toml in the working directory (or the path given with `--config`)
//! and fall back to defaults for anything missing. The whole file is rewritten when a setting
//! is changed from the command line.

use crate::dialect::{DialectConfig, DialectKind};
use facet::Facet;
use std::env;
use std::fs;
use std::io;
use std::path::Path;

/// Environment variable consulted when no API key is configured.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

#[derive(Facet, Clone, Debug, PartialEq)]
/// User settings loaded from colloquy.toml or falling back to defaults.
pub struct Config {
    #[facet(default)]
    /// Secret for the completion service.
    pub api_key: String,
    #[facet(default = "https://api.openai.com/v1".to_string())]
    /// Base URL of an OpenAI-compatible API.
    pub api_base: String,
    #[facet(default = "Chat".to_string())]
    /// Heading text that opens a chat.
    pub chat_title: String,
    #[facet(default = "Chat".to_string())]
    /// Name the model goes by.
    pub chat_name: String,
    #[facet(default = "User".to_string())]
    /// Role heading for your own turns.
    pub user_name: String,
    #[facet(default = 2)]
    /// Heading depth of chat sections.
    pub section_level: usize,
    #[facet(default = "heading".to_string())]
    /// Chat format: `heading` or `blockquote`.
    pub dialect: String,
    #[facet(default)]
    /// Folder holding template documents.
    pub template_folder: Option<String>,
    #[facet(default)]
    /// Template used by chats that do not name one.
    pub default_template: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// File looked for in the working directory.
    pub const FILE_NAME: &'static str = "colloquy.toml";

    #[must_use]
    /// Every setting at its default.
    ///
    /// # Panics
    ///
    /// Panics if the default configuration cannot be parsed.
    pub fn defaults() -> Self {
        facet_toml::from_str::<Self>("").unwrap()
    }

    #[must_use]
    /// Load configuration from `path`, using defaults if it is missing or malformed.
    pub fn load_from(path: &Path) -> Self {
        let Ok(contents) = fs::read_to_string(path) else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Self::defaults();
        };
        match facet_toml::from_str::<Self>(&contents) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring malformed config");
                Self::defaults()
            }
        }
    }

    /// Write every setting to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be encoded or the file cannot be written.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let contents = facet_toml::to_string(self).map_err(|e| io::Error::other(e.to_string()))?;
        fs::write(path, contents)?;
        tracing::info!(path = %path.display(), "settings saved");
        Ok(())
    }

    #[must_use]
    /// API key from the settings, or from the environment when none is set.
    pub fn api_key(&self) -> Option<String> {
        resolve_api_key(&self.api_key, env::var(API_KEY_VAR).ok())
    }

    #[must_use]
    /// Chat format in use; unknown names fall back to the heading format.
    pub fn dialect_kind(&self) -> DialectKind {
        self.dialect.parse().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to heading chats");
            DialectKind::Heading
        })
    }

    #[must_use]
    /// Names and matchers for the dialect, derived from these settings.
    pub fn dialect_config(&self) -> DialectConfig {
        DialectConfig::new(
            &self.chat_title,
            &self.chat_name,
            &self.user_name,
            self.section_level,
        )
    }
}

/// Configured key if non-blank, else the environment's.
fn resolve_api_key(configured: &str, from_env: Option<String>) -> Option<String> {
    let configured = configured.trim();
    if configured.is_empty() {
        from_env.filter(|key| !key.trim().is_empty())
    } else {
        Some(configured.to_string())
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
