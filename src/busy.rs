//! Busy indication while the completion service is working.
//!
//! The indicator is held as a guard: [`BusyGuard::acquire`] switches it on and dropping the
//! guard switches it off again, whether the call succeeded or returned early with an error.

use std::io::{self, Write};

/// A surface that can show that a request is in flight.
pub trait BusyIndicator {
    /// Turn the indicator on or off.
    fn set_busy(&self, busy: bool);
}

#[must_use = "the indicator is cleared as soon as the guard is dropped"]
/// Keeps an indicator on for as long as it is alive.
pub struct BusyGuard<'a> {
    indicator: &'a dyn BusyIndicator,
}

impl<'a> BusyGuard<'a> {
    /// Switch `indicator` on until the returned guard is dropped.
    pub fn acquire(indicator: &'a dyn BusyIndicator) -> Self {
        indicator.set_busy(true);
        Self { indicator }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.indicator.set_busy(false);
    }
}

/// Status line on stderr naming who is being waited on.
pub struct TerminalStatus {
    label: String,
}

impl TerminalStatus {
    #[must_use]
    /// Status line reading "`name` is thinking…".
    pub fn new(name: &str) -> Self {
        Self {
            label: format!("{name} is thinking…"),
        }
    }
}

impl BusyIndicator for TerminalStatus {
    fn set_busy(&self, busy: bool) {
        let mut stderr = io::stderr();
        let result = if busy {
            write!(stderr, "{}", self.label)
        } else {
            write!(stderr, "\r{}\r", " ".repeat(self.label.chars().count()))
        };
        if let Err(e) = result.and_then(|()| stderr.flush()) {
            tracing::debug!("could not update status line: {e}");
        }
    }
}

#[cfg(test)]
#[path = "tests/busy.rs"]
mod tests;
