//! Terminal rendering for the picker.

pub mod components;
pub mod theme;

pub use components::{FieldFocus, MultiSelectAction, MultiSelectField};
pub use theme::Theme;
