use super::HeadingDialect;
use crate::dialect::{Dialect, DialectConfig};
use crate::document::{Document, Editor, Position};
use crate::error::ChatError;
use crate::formats::markdown::MarkdownFormat;
use crate::message::Message;
use crate::outline::extract_headings;

fn read(text: &str, cursor_line: usize) -> Result<crate::dialect::ChatSource, ChatError> {
    let doc = Document::from_text(text).with_cursor(Position::line_start(cursor_line));
    let headings = extract_headings(&doc.text(), &MarkdownFormat).unwrap();
    HeadingDialect::default().read_chat(&doc, &headings)
}

#[test]
fn test_reads_properties_and_user_turn() {
    let source = read("## Chat\ntemplate::foo\nmodel::gpt-4\n\nHello\n", 5).unwrap();

    assert_eq!(source.config.template.as_deref(), Some("foo"));
    assert_eq!(source.settings.model.as_deref(), Some("gpt-4"));
    assert_eq!(source.messages, vec![Message::user("Hello")]);
    assert_eq!(source.section.heading_line, 0);
    assert_eq!(source.section.start_line, 1);
    assert_eq!(source.anchor_line, 4);
}

#[test]
fn test_role_headings_switch_speaker() {
    let text = "\
# Notes

## Chat

What is Rust?

### Chat
A systems language.

### User
Thanks!
";
    let source = read(text, 10).unwrap();
    assert_eq!(
        source.messages,
        vec![
            Message::user("What is Rust?"),
            Message::assistant("A systems language."),
            Message::user("Thanks!"),
        ]
    );
}

#[test]
fn test_section_stops_at_next_heading() {
    let text = "## Chat\nFirst\n## Other\nSecond\n";
    let source = read(text, 1).unwrap();
    assert_eq!(source.section.end_line, 2);
    assert_eq!(source.messages, vec![Message::user("First")]);
}

#[test]
fn test_no_chat_above_cursor() {
    let err = read("Intro\n## Other\ntext\n", 2).unwrap_err();
    assert!(matches!(err, ChatError::ChatNotFound));
}

#[test]
fn test_property_block_needs_to_be_first() {
    let source = read("## Chat\n\nmodel::x\n", 2).unwrap();
    assert_eq!(source.settings.model, None);
    assert_eq!(source.messages, vec![Message::user("model::x")]);
}

#[test]
fn test_template_reads_system_preamble() {
    let template = HeadingDialect::default()
        .parse_template("model::m1\ntemperature::0.7\nYou are terse.\n\n### User\nHi\n### Chat\nHello.");
    assert_eq!(template.settings.model.as_deref(), Some("m1"));
    assert_eq!(template.settings.temperature, Some(0.7));
    assert!(template.literals.is_empty());
    assert_eq!(
        template.messages,
        vec![
            Message::system("You are terse."),
            Message::user("Hi"),
            Message::assistant("Hello."),
        ]
    );
}

#[test]
fn test_new_chat_after_last_line() {
    let dialect = HeadingDialect::default();
    let mut doc = Document::from_text("one\ntwo\nthree").with_cursor(Position::new(2, 5));

    let plan = dialect.plan_new_chat(&doc, None);
    plan.apply(&mut doc);

    assert_eq!(doc.lines(), &["one", "two", "three", "", "## Chat", "", "", ""]);
    assert_eq!(doc.cursor(), Position::line_start(5));
}

#[test]
fn test_new_chat_with_template_adds_a_line() {
    let dialect = HeadingDialect::default();
    let mut doc = Document::from_text("one\ntwo\nthree").with_cursor(Position::new(2, 0));

    dialect.plan_new_chat(&doc, Some("travel")).apply(&mut doc);

    assert_eq!(doc.line(4), "## Chat");
    assert_eq!(doc.line(5), "template::travel");
    assert_eq!(doc.cursor(), Position::line_start(6));
}

#[test]
fn test_new_chat_on_blank_line() {
    let dialect = HeadingDialect::new(DialectConfig::new("Ask", "Chat", "User", 3));
    let mut doc = Document::from_text("intro\n\nrest").with_cursor(Position::line_start(1));

    dialect.plan_new_chat(&doc, None).apply(&mut doc);

    assert_eq!(doc.lines(), &["intro", "### Ask", "", "", "rest"]);
    assert_eq!(doc.cursor(), Position::line_start(3));
}

#[test]
fn test_response_then_read_back() {
    let dialect = HeadingDialect::default();
    let text = "## Chat\n\nHello\n\n\n## Later\n";
    let mut doc = Document::from_text(text).with_cursor(Position::line_start(3));
    let headings = extract_headings(&doc.text(), &MarkdownFormat).unwrap();
    let source = dialect.read_chat(&doc, &headings).unwrap();
    assert_eq!(source.anchor_line, 2);

    let plan = dialect.plan_response(&source, "Hi!\nHow can I help?\n");
    plan.apply(&mut doc);

    assert_eq!(
        doc.lines(),
        &[
            "## Chat",
            "",
            "Hello",
            "",
            "### Chat",
            "Hi!",
            "How can I help?",
            "",
            "### User",
            "",
            "",
            "",
            "## Later",
            "",
        ]
    );
    assert_eq!(doc.cursor(), Position::line_start(9));

    let headings = extract_headings(&doc.text(), &MarkdownFormat).unwrap();
    let reread = dialect.read_chat(&doc, &headings).unwrap();
    assert_eq!(
        reread.messages,
        vec![
            Message::user("Hello"),
            Message::assistant("Hi!\nHow can I help?"),
        ]
    );
}

#[test]
fn test_reply_headings_stay_inside_the_chat() {
    let dialect = HeadingDialect::default();
    let mut doc = Document::from_text("## Chat\nHello\n").with_cursor(Position::line_start(1));
    let headings = extract_headings(&doc.text(), &MarkdownFormat).unwrap();
    let source = dialect.read_chat(&doc, &headings).unwrap();

    let reply = "## Summary\nLisbon.\n### User\n```\n# not a heading\n```";
    let plan = dialect.plan_response(&source, reply);
    plan.apply(&mut doc);

    assert_eq!(doc.line(4), "#### Summary");
    assert_eq!(doc.line(6), "\\#### User");
    assert_eq!(doc.line(8), "# not a heading");
    assert_eq!(doc.line(11), "### User");
    assert_eq!(doc.cursor(), Position::line_start(12));

    let cursor = doc.cursor();
    doc.replace_range("Thanks", cursor, None);
    let headings = extract_headings(&doc.text(), &MarkdownFormat).unwrap();
    let reread = dialect.read_chat(&doc, &headings).unwrap();
    assert_eq!(reread.section.end_line, 14);
    assert_eq!(
        reread.messages,
        vec![
            Message::user("Hello"),
            Message::assistant("#### Summary\nLisbon.\n\\#### User\n```\n# not a heading\n```"),
            Message::user("Thanks"),
        ]
    );
}

#[test]
fn test_titles_are_not_stored() {
    let source = read("## Chat\nHello\n", 1).unwrap();
    let plan = HeadingDialect::default().plan_title(&source, "Greeting", Position::default());
    assert!(plan.is_none());
}
