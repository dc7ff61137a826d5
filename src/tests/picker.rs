use super::{PickerState, PickerStep};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn options() -> Vec<String> {
    ["travel", "code-review", "Translation", "poetry"]
        .iter()
        .map(ToString::to_string)
        .collect()
}

#[test]
fn test_filter_is_case_insensitive_substring() {
    let mut state = PickerState::new("Templates", &options());
    for c in "tra".chars() {
        state.push(c);
    }
    assert_eq!(state.filtered(), vec!["travel", "Translation"]);
    state.pop();
    state.pop();
    assert_eq!(state.query(), "t");
    assert_eq!(state.filtered(), vec!["travel", "Translation", "poetry"]);
}

#[test]
fn test_selection_stays_in_bounds() {
    let mut state = PickerState::new("Templates", &options());
    state.up();
    assert_eq!(state.selected(), 0);
    for _ in 0..10 {
        state.down();
    }
    assert_eq!(state.current(), Some("poetry"));
}

#[test]
fn test_typing_resets_selection() {
    let mut state = PickerState::new("Templates", &options());
    state.down();
    state.down();
    state.push('o');
    assert_eq!(state.selected(), 0);
    assert_eq!(state.current(), Some("code-review"));
}

#[test]
fn test_keys_choose_and_dismiss() {
    let mut state = PickerState::new("Templates", &options());
    assert_eq!(state.handle_key(key(KeyCode::Char('p'))), PickerStep::Continue);
    assert_eq!(state.handle_key(key(KeyCode::Char('o'))), PickerStep::Continue);
    assert_eq!(
        state.handle_key(key(KeyCode::Enter)),
        PickerStep::Chosen("poetry".to_string())
    );
    assert_eq!(state.handle_key(key(KeyCode::Esc)), PickerStep::Dismissed);
    assert_eq!(
        state.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
        PickerStep::Dismissed
    );
}

#[test]
fn test_enter_without_matches_keeps_asking() {
    let mut state = PickerState::new("Templates", &options());
    state.push('z');
    assert!(state.filtered().is_empty());
    assert_eq!(state.handle_key(key(KeyCode::Enter)), PickerStep::Continue);
}
