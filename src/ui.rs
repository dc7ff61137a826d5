//! Rendering of the picker screen.
//!
//! The list of matching options fills the screen with the highlighted one reversed; the
//! filter being typed sits in a box underneath.

use crate::picker::PickerState;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

/// Draw the picker for `state`.
pub fn draw_picker(f: &mut Frame, state: &PickerState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(f.area());

    let filtered = state.filtered();
    let items: Vec<ListItem> = if filtered.is_empty() {
        vec![ListItem::new(Line::from(Span::styled(
            "No matches",
            Style::default().fg(Color::DarkGray),
        )))]
    } else {
        filtered
            .iter()
            .enumerate()
            .map(|(i, option)| {
                let style = if i == state.selected() {
                    Style::default().add_modifier(Modifier::REVERSED)
                } else {
                    Style::default()
                };
                ListItem::new(Line::from(*option)).style(style)
            })
            .collect()
    };

    let title = format!("{} ({})", state.prompt, filtered.len());
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(list, chunks[0]);

    let query = Paragraph::new(format!("> {}", state.query())).block(
        Block::default()
            .borders(Borders::ALL)
            .title("↑/↓: Select | Enter: Choose | Esc: Cancel"),
    );
    f.render_widget(query, chunks[1]);
}

#[cfg(test)]
#[path = "tests/ui.rs"]
mod tests;
