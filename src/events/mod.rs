//! Terminal events for the demo application.

mod handler;

use crossterm::event::{KeyEvent, MouseEvent};

pub use handler::EventHandler;

/// Events the application loop reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A key press.
    Key(KeyEvent),
    /// A mouse click, move or scroll.
    Mouse(MouseEvent),
    /// Text pasted with bracketed paste.
    Paste(String),
    /// The terminal was resized.
    Resize(u16, u16),
    /// The terminal window gained focus.
    FocusGained,
    /// The terminal window lost focus.
    FocusLost,
    /// No input within the tick interval.
    Tick,
}
