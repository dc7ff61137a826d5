use super::{clean_title, keyword_request, renamed_path, suggestions, title_request, Subject};
use crate::message::{Message, Role};
use std::path::{Path, PathBuf};

#[test]
fn test_clean_list_decorations() {
    assert_eq!(clean_title("- Trip planning", false), "Trip planning");
    assert_eq!(clean_title("2. Trip planning", false), "Trip planning");
    assert_eq!(clean_title("3 Trip planning", false), "Trip planning");
    assert_eq!(clean_title("1. \"Trip planning\"", false), "Trip planning");
    assert_eq!(clean_title("'Trip planning", false), "Trip planning");
}

#[test]
fn test_trailing_quote_kept_without_leading_quote() {
    assert_eq!(clean_title("Rock 'n' roll'", false), "Rock 'n' roll'");
}

#[test]
fn test_document_titles_are_path_safe() {
    assert_eq!(
        clean_title("Rust: ownership / borrowing", true),
        "Rust - ownership, borrowing"
    );
    assert_eq!(clean_title(r"A \ B", true), "A - B");
    assert_eq!(clean_title("Rust: ownership", false), "Rust: ownership");
}

#[test]
fn test_suggestions_per_line() {
    let response = "1. First idea\n2. \"Second: idea\"\n\n3. Third\n";
    assert_eq!(
        suggestions(response, true),
        vec!["First idea", "Second - idea", "Third"]
    );
}

#[test]
fn test_title_request_embeds_messages() {
    let messages = vec![Message::user("Where should I go?")];
    let request = title_request(&Subject::Chat(&messages)).unwrap();

    assert_eq!(request.messages.len(), 1);
    assert_eq!(request.messages[0].role, Role::User);
    assert!(request.messages[0]
        .content
        .starts_with("Infer title from the summary"));
    assert!(request.messages[0]
        .content
        .ends_with(r#"Messages:

[{"role":"user","content":"Where should I go?"}]"#));
    assert_eq!(request.max_tokens, Some(64));
    assert_eq!(request.temperature, Some(0.0));
}

#[test]
fn test_keyword_request_for_whole_document() {
    let request = keyword_request(&Subject::Document("notes")).unwrap();
    assert!(request.messages[0]
        .content
        .ends_with(r#"{"role":"user","content":"notes"}"#));
    assert_eq!(request.temperature, Some(0.5));
    assert_eq!(request.frequency_penalty, Some(0.8));
}

#[test]
fn test_renamed_path_keeps_folder_and_extension() {
    assert_eq!(
        renamed_path(Path::new("notes/2024/today.md"), "Trip planning"),
        PathBuf::from("notes/2024/Trip planning.md")
    );
    assert_eq!(
        renamed_path(Path::new("scratch"), "Ideas"),
        PathBuf::from("Ideas")
    );
}
