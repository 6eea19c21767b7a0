//! Placement of the floating candidate list relative to its anchor.

use ratatui::layout::Rect;

/// Border cells added on each axis by the popover block.
const BORDER: u16 = 2;

/// Smallest popover worth drawing: one row plus borders.
pub const MIN_POPOVER_HEIGHT: u16 = 1 + BORDER;

/// Compute where the popover goes.
///
/// The popover opens below `anchor` when it fits (or when there is at least
/// as much room below as above) and above it otherwise. Its width follows
/// the measured anchor width; until a measurement exists it sizes to
/// `content_width`. The result is always clipped to `bounds` and may be
/// shorter than [`MIN_POPOVER_HEIGHT`] when there is no room at all.
pub fn popover_area(
    anchor: Rect,
    bounds: Rect,
    measured_width: Option<u16>,
    content_width: u16,
    rows: u16,
) -> Rect {
    let width = measured_width
        .unwrap_or_else(|| content_width.saturating_add(BORDER))
        .min(bounds.width);
    let wanted = rows.max(1).saturating_add(BORDER);

    let below = bounds.bottom().saturating_sub(anchor.bottom());
    let above = anchor.y.saturating_sub(bounds.y);

    let (y, height) = if below >= wanted || below >= above {
        (anchor.bottom(), wanted.min(below))
    } else {
        let height = wanted.min(above);
        (anchor.y - height, height)
    };

    let max_x = bounds.right().saturating_sub(width);
    let x = anchor.x.clamp(bounds.x, max_x.max(bounds.x));

    Rect::new(x, y, width, height)
}
