//! tagpick - a multi-value filtered selection control for the terminal.
//!
//! The crate is split into a toolkit-free selection core ([`select`]) and a
//! ratatui widget that drives it ([`ui`]). The remaining modules support the
//! `tagpick` binary: settings and candidate files, logging, terminal events
//! and the demo application.
//!
//! ```
//! use tagpick::select::{Item, SelectionController};
//!
//! let mut picker = SelectionController::new(vec![
//!     Item::plain(1u32, "Red"),
//!     Item::plain(2u32, "Green"),
//! ]);
//! picker.set_filter_text("gr");
//! picker.highlight_next();
//! picker.confirm_armed();
//! assert_eq!(picker.form_value(), "2");
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod select;
pub mod ui;
