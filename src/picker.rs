//! Choosing one option from a list: templates, title suggestions, settings values.
//!
//! [`PickerState`] holds the filter and selection and reacts to keys; it knows nothing about
//! terminals. [`TerminalPicker`] runs it full-screen with ratatui.

use crate::error::ChatError;
use crate::ui;
use ratatui::crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

/// Anything that can ask the user to choose one of several strings.
pub trait Picker {
    /// Let the user choose one of `options`. `None` means the choice was dismissed.
    ///
    /// # Errors
    ///
    /// Returns an error if the picker cannot be shown.
    fn pick(&mut self, prompt: &str, options: &[String]) -> Result<Option<String>, ChatError>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Result of feeding one key to a picker.
pub enum PickerStep {
    /// Keep asking.
    Continue,
    /// The user chose this option.
    Chosen(String),
    /// The user dismissed the picker.
    Dismissed,
}

#[derive(Clone, Debug, Default)]
/// Options, typed filter and highlighted row.
pub struct PickerState {
    /// Shown above the list.
    pub prompt: String,
    options: Vec<String>,
    query: String,
    selected: usize,
}

impl PickerState {
    #[must_use]
    /// Fresh state with an empty filter.
    pub fn new(prompt: &str, options: &[String]) -> Self {
        Self {
            prompt: prompt.to_string(),
            options: options.to_vec(),
            query: String::new(),
            selected: 0,
        }
    }

    #[must_use]
    /// Text typed so far.
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    /// Index into [`filtered`](PickerState::filtered) of the highlighted option.
    pub fn selected(&self) -> usize {
        self.selected
    }

    #[must_use]
    /// Options containing the filter text, case-insensitively, in their original order.
    pub fn filtered(&self) -> Vec<&str> {
        let query = self.query.to_lowercase();
        self.options
            .iter()
            .filter(|option| option.to_lowercase().contains(&query))
            .map(String::as_str)
            .collect()
    }

    #[must_use]
    /// Option that Enter would choose.
    pub fn current(&self) -> Option<&str> {
        self.filtered().get(self.selected).copied()
    }

    /// Add a character to the filter.
    pub fn push(&mut self, c: char) {
        self.query.push(c);
        self.selected = 0;
    }

    /// Remove the last character of the filter.
    pub fn pop(&mut self) {
        self.query.pop();
        self.selected = 0;
    }

    /// Move the highlight up, stopping at the first option.
    pub fn up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Move the highlight down, stopping at the last option.
    pub fn down(&mut self) {
        let count = self.filtered().len();
        if self.selected + 1 < count {
            self.selected += 1;
        }
    }

    /// React to a key press.
    pub fn handle_key(&mut self, key: KeyEvent) -> PickerStep {
        match key.code {
            KeyCode::Esc => PickerStep::Dismissed,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                PickerStep::Dismissed
            }
            KeyCode::Enter => match self.current() {
                Some(option) => PickerStep::Chosen(option.to_string()),
                None => PickerStep::Continue,
            },
            KeyCode::Up => {
                self.up();
                PickerStep::Continue
            }
            KeyCode::Down | KeyCode::Tab => {
                self.down();
                PickerStep::Continue
            }
            KeyCode::Backspace => {
                self.pop();
                PickerStep::Continue
            }
            KeyCode::Char(c) => {
                self.push(c);
                PickerStep::Continue
            }
            _ => PickerStep::Continue,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
/// Full-screen picker on the controlling terminal.
pub struct TerminalPicker;

impl TerminalPicker {
    fn run<B: ratatui::backend::Backend>(
        terminal: &mut Terminal<B>,
        state: &mut PickerState,
    ) -> io::Result<Option<String>> {
        loop {
            terminal.draw(|f| ui::draw_picker(f, state))?;

            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match state.handle_key(key) {
                    PickerStep::Continue => {}
                    PickerStep::Chosen(option) => return Ok(Some(option)),
                    PickerStep::Dismissed => return Ok(None),
                }
            }
        }
    }
}

impl Picker for TerminalPicker {
    fn pick(&mut self, prompt: &str, options: &[String]) -> Result<Option<String>, ChatError> {
        let mut state = PickerState::new(prompt, options);

        enable_raw_mode()?;
        let mut stderr = io::stderr();
        execute!(stderr, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend)?;

        let result = Self::run(&mut terminal, &mut state);

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        let choice = result?;
        tracing::debug!(prompt, chosen = choice.is_some(), "picker closed");
        Ok(choice)
    }
}

#[cfg(test)]
#[path = "tests/picker.rs"]
mod tests;
