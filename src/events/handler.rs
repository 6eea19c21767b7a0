//! Polls crossterm and converts what it reads into [`Event`]s.

use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent};

use super::Event;

/// Default interval between ticks when the terminal is idle.
const DEFAULT_TICK: Duration = Duration::from_millis(100);

/// Polls the terminal for input with a fixed tick interval.
#[derive(Debug, Clone, Copy)]
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    /// Create a handler with the default tick interval.
    pub fn new() -> Self {
        Self::with_tick_rate(DEFAULT_TICK)
    }

    /// Create a handler with a custom tick interval.
    pub fn with_tick_rate(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    /// The configured tick interval.
    pub fn tick_rate(&self) -> Duration {
        self.tick_rate
    }

    /// Poll for the next event.
    ///
    /// Blocks until input arrives or the tick interval elapses, in which case
    /// `Event::Tick` is returned.
    pub fn next(&self) -> std::io::Result<Event> {
        if event::poll(self.tick_rate)? {
            Ok(convert(event::read()?))
        } else {
            Ok(Event::Tick)
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn convert(event: CrosstermEvent) -> Event {
    match event {
        CrosstermEvent::Key(key_event) => Event::Key(key_event),
        CrosstermEvent::Mouse(mouse_event) => Event::Mouse(mouse_event),
        CrosstermEvent::Paste(text) => Event::Paste(text),
        CrosstermEvent::Resize(width, height) => Event::Resize(width, height),
        CrosstermEvent::FocusGained => Event::FocusGained,
        CrosstermEvent::FocusLost => Event::FocusLost,
    }
}
