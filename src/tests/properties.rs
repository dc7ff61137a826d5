use super::{find_properties, is_property_line, PropertyBlock, PropertySpan};

#[test]
fn test_first_line_not_a_property() {
    assert_eq!(find_properties(&["Hello", "model::gpt-4"]), None);
}

#[test]
fn test_leading_blank_line_means_no_block() {
    assert_eq!(find_properties(&["", "model::gpt-4"]), None);
}

#[test]
fn test_empty_and_blank_inputs() {
    let empty: [&str; 0] = [];
    assert_eq!(find_properties(&empty), None);
    assert_eq!(find_properties(&["", "  ", ""]), None);
}

#[test]
fn test_run_ended_by_blank_line() {
    let lines = ["template::foo", "model::m1", "temperature::0.2", "", "model::ignored"];
    assert_eq!(
        find_properties(&lines),
        Some(PropertySpan { start: 0, end: 2 })
    );
}

#[test]
fn test_run_ended_by_content_line() {
    let lines = ["model::m1", "Hello there", "stream::true"];
    assert_eq!(
        find_properties(&lines),
        Some(PropertySpan { start: 0, end: 0 })
    );
}

#[test]
fn test_whole_input_is_properties() {
    let lines = vec!["a::1".to_string(), "b_c::2".to_string()];
    assert_eq!(
        find_properties(&lines),
        Some(PropertySpan { start: 0, end: 1 })
    );
}

#[test]
fn test_key_shape() {
    assert!(is_property_line("max_tokens::12"));
    assert!(is_property_line("stop::"));
    assert!(!is_property_line("max-tokens::12"));
    assert!(!is_property_line("gpt4::x"));
    assert!(!is_property_line(" model::x"));
    assert!(!is_property_line("model: x"));
}

#[test]
fn test_extract_splits_on_first_separator() {
    let block = PropertyBlock::extract(&["stop::a::b", "model:: m1 ", "", "x::y"]).unwrap();
    assert_eq!(block.span, PropertySpan { start: 0, end: 1 });
    assert_eq!(
        block.pairs,
        vec![
            ("stop".to_string(), "a::b".to_string()),
            ("model".to_string(), " m1 ".to_string()),
        ]
    );
}
