use super::{resolve_api_key, Config};
use crate::dialect::DialectKind;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_defaults() {
    let config = Config::defaults();
    assert_eq!(config.api_base, "https://api.openai.com/v1");
    assert_eq!(config.chat_title, "Chat");
    assert_eq!(config.chat_name, "Chat");
    assert_eq!(config.user_name, "User");
    assert_eq!(config.section_level, 2);
    assert_eq!(config.dialect_kind(), DialectKind::Heading);
    assert_eq!(config.template_folder, None);
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("colloquy.toml");
    fs::write(
        &path,
        "chat_name = \"Ada\"\ndialect = \"blockquote\"\ntemplate_folder = \"templates\"\n",
    )
    .unwrap();

    let config = Config::load_from(&path);
    assert_eq!(config.chat_name, "Ada");
    assert_eq!(config.dialect_kind(), DialectKind::Blockquote);
    assert_eq!(config.template_folder.as_deref(), Some("templates"));
    assert_eq!(config.user_name, "User");
    assert_eq!(config.dialect_config().chat_name, "Ada");
}

#[test]
fn test_missing_or_malformed_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    assert_eq!(Config::load_from(&dir.path().join("absent.toml")), Config::defaults());

    let path = dir.path().join("bad.toml");
    fs::write(&path, "section_level = \"deep\"\n").unwrap();
    assert_eq!(Config::load_from(&path), Config::defaults());
}

#[test]
fn test_save_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("colloquy.toml");
    let mut config = Config::defaults();
    config.default_template = Some("travel".to_string());
    config.section_level = 3;

    config.save(&path).unwrap();
    assert_eq!(Config::load_from(&path), config);
}

#[test]
fn test_unknown_dialect_falls_back() {
    let config = Config {
        dialect: "org-mode".to_string(),
        ..Config::defaults()
    };
    assert_eq!(config.dialect_kind(), DialectKind::Heading);
}

#[test]
fn test_api_key_resolution() {
    assert_eq!(resolve_api_key("sk-file", Some("sk-env".into())), Some("sk-file".into()));
    assert_eq!(resolve_api_key("  ", Some("sk-env".into())), Some("sk-env".into()));
    assert_eq!(resolve_api_key("", Some(String::new())), None);
    assert_eq!(resolve_api_key("", None), None);
}
