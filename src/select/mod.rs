//! Headless multi-value selection core.
//!
//! This module has no terminal dependency. It holds the candidate
//! collection, the ordered selection, the transient input state and the
//! controller that ties them together, plus the anchor width channel used
//! to size the floating candidate list.

mod candidates;
mod controller;
mod input;
mod item;
mod selected;
pub mod sizing;

pub use candidates::{has_unique_keys, CandidateList};
pub use controller::{
    Backspace, Callbacks, ControllerOptions, Phase, SelectionController, SelectionListener,
};
pub use input::InputState;
pub use item::{Item, ItemKey};
pub use selected::{SelectedList, FORM_VALUE_SEPARATOR};
