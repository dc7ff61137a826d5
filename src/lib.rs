//! colloquy: conversations with a language model that live inside markdown documents.
//!
//! A chat is a region of a document, opened either by a heading (`## Chat`) or by a
//! `> [!CHAT-CONFIG]-` callout. The library finds the region around the cursor, reads its
//! `key::value` properties and conversation turns, merges them with a template and the
//! defaults, and plans where the model's reply is written back so the next run parses the
//! same structure again.

pub mod app_state;
pub mod busy;
pub mod chat_settings;
pub mod completion;
pub mod config;
pub mod dialect;
pub mod document;
pub mod edit_plan;
pub mod error;
pub mod formats;
pub mod merge;
pub mod message;
pub mod outline;
pub mod picker;
pub mod properties;
pub mod section;
pub mod template;
pub mod title;
pub mod ui;
