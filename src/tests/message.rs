use super::{Message, Role, TranscriptBuilder};

#[test]
fn test_same_role_lines_coalesce() {
    let mut builder = TranscriptBuilder::new();
    builder.push_line(Role::User, "Hello");
    builder.push_line(Role::User, "there");
    builder.push_line(Role::Assistant, "Hi");
    assert_eq!(
        builder.finish(),
        vec![Message::user("Hello\nthere"), Message::assistant("Hi")]
    );
}

#[test]
fn test_empty_messages_are_dropped() {
    let mut builder = TranscriptBuilder::new();
    builder.push_line(Role::User, "");
    builder.push_line(Role::Assistant, "  ");
    builder.push_line(Role::User, "Question");
    assert_eq!(builder.finish(), vec![Message::user("Question")]);
}

#[test]
fn test_neighbours_joined_after_dropping_empty_turn() {
    let mut builder = TranscriptBuilder::new();
    builder.start(Role::User, "");
    builder.append("first");
    builder.start(Role::Assistant, "");
    builder.start(Role::User, "");
    builder.append("second");
    assert_eq!(builder.finish(), vec![Message::user("first\n\nsecond")]);
}

#[test]
fn test_append_without_message() {
    let mut builder = TranscriptBuilder::new();
    assert!(!builder.append("orphan"));
    assert_eq!(builder.current_role(), None);
}

#[test]
fn test_role_serialises_lowercase() {
    let json = serde_json::to_string(&Message::system("Be brief")).unwrap();
    assert_eq!(json, r#"{"role":"system","content":"Be brief"}"#);
    assert_eq!(Role::Assistant.to_string(), "assistant");
}
