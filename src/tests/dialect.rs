use super::{last_content_line, trailing_blank_lines, DialectConfig, DialectKind};
use crate::message::Role;

#[test]
fn test_kind_from_str() {
    assert_eq!("heading".parse::<DialectKind>(), Ok(DialectKind::Heading));
    assert_eq!(" Blockquote ".parse::<DialectKind>(), Ok(DialectKind::Blockquote));
    assert!("org".parse::<DialectKind>().is_err());
}

#[test]
fn test_role_headings_match_any_depth() {
    let config = DialectConfig::new("Chat", "Ada", "Me", 2);
    assert_eq!(config.role_of_heading("### Ada"), Some(Role::Assistant));
    assert_eq!(config.role_of_heading("#### Me  "), Some(Role::User));
    assert_eq!(config.role_of_heading("### System"), Some(Role::System));
    assert_eq!(config.role_of_heading("### Adam"), None);
    assert_eq!(config.role_of_heading("Ada"), None);
}

#[test]
fn test_role_names_are_matched_literally() {
    let config = DialectConfig::new("Chat", "GPT (4.1)", "User", 2);
    assert_eq!(config.role_of_heading("### GPT (4.1)"), Some(Role::Assistant));
    assert_eq!(config.role_of_heading("### GPT x4.1x"), None);
}

#[test]
fn test_identity_message() {
    let config = DialectConfig::new("Chat", "Ada", "User", 2);
    let message = config.identity_message();
    assert_eq!(message.role, Role::System);
    assert_eq!(message.content, "You will refer to yourself as Ada");
}

#[test]
fn test_last_content_line() {
    let lines = ["Hello", "", "World", "", ""];
    assert_eq!(trailing_blank_lines(&lines), 2);
    assert_eq!(last_content_line(&lines, 10, 9), 12);

    let blank = ["", "  "];
    assert_eq!(last_content_line(&blank, 10, 9), 9);

    let none: [&str; 0] = [];
    assert_eq!(last_content_line(&none, 10, 9), 9);
}
