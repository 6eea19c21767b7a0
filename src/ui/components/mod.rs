//! Reusable UI components.

mod multi_select;
mod popover;
mod tag_strip;

pub use multi_select::{FieldFocus, MultiSelectAction, MultiSelectField, DEFAULT_MAX_VISIBLE};
pub use popover::{popover_area, MIN_POPOVER_HEIGHT};
pub use tag_strip::{Chip, TagStrip, REMOVE_GLYPH};
