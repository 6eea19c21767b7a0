//! Tag strip: the selected items rendered as removable chips.
//!
//! Layout is computed separately from drawing so the widget can size the
//! anchor before it renders and keep chip rects around for mouse hits.
//! Chips appear exactly in selection order; the strip never reorders or
//! deduplicates.

use ratatui::{
    layout::{Position, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::select::{Item, ItemKey};
use crate::ui::theme::Theme;

/// Glyph drawn as the chip's remove control.
pub const REMOVE_GLYPH: &str = "×";

/// Cells a chip adds around its label: padding, remove glyph, padding.
const CHIP_CHROME: u16 = 4;

/// Gap between neighbouring chips.
const CHIP_GAP: u16 = 1;

/// One laid-out chip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chip {
    /// Key of the selected item.
    pub key: ItemKey,
    /// Label as drawn, possibly truncated.
    pub label: String,
    /// Full chip rectangle.
    pub area: Rect,
    /// The cell holding the remove glyph.
    pub remove_area: Rect,
}

/// Laid-out tag strip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagStrip {
    /// Chips in selection order.
    chips: Vec<Chip>,
    /// Where the text input starts after the last chip.
    input_origin: Position,
    /// Width left for the input on its row.
    input_width: u16,
    /// Rows used including the input row.
    rows: u16,
}

impl TagStrip {
    /// Lay out chips for `items` inside `area`, wrapping as needed.
    ///
    /// `min_input_width` is the room kept for the text input after the last
    /// chip; if the last row is too full the input moves to a new row.
    pub fn layout<T>(
        items: &[Item<T>],
        area: Rect,
        min_input_width: u16,
        render: &dyn Fn(&Item<T>) -> String,
    ) -> Self {
        let mut chips = Vec::with_capacity(items.len());
        let mut x = area.x;
        let mut y = area.y;
        let max_label = area.width.saturating_sub(CHIP_CHROME).max(1);

        for item in items {
            let label = truncate(&render(item), max_label);
            let width = label.width() as u16 + CHIP_CHROME;

            if x > area.x && x + width > area.right() {
                x = area.x;
                y += 1;
            }

            let chip_area = Rect::new(x, y, width.min(area.width), 1);
            let remove_x = x + width.saturating_sub(2);
            chips.push(Chip {
                key: item.key.clone(),
                label,
                area: chip_area,
                remove_area: Rect::new(remove_x.min(area.right().saturating_sub(1)), y, 1, 1),
            });
            x += width + CHIP_GAP;
        }

        let min_input_width = min_input_width.min(area.width);
        if x > area.x && x + min_input_width > area.right() {
            x = area.x;
            y += 1;
        }

        Self {
            chips,
            input_origin: Position::new(x, y),
            input_width: area.right().saturating_sub(x),
            rows: y - area.y + 1,
        }
    }

    /// Chips in selection order.
    pub fn chips(&self) -> &[Chip] {
        &self.chips
    }

    /// Number of rows the strip and input occupy.
    pub fn rows(&self) -> u16 {
        self.rows
    }

    /// Top-left cell of the text input.
    pub fn input_origin(&self) -> Position {
        self.input_origin
    }

    /// Width available to the text input.
    pub fn input_width(&self) -> u16 {
        self.input_width
    }

    /// Find the chip whose remove glyph sits at `position`.
    pub fn remove_hit(&self, position: Position) -> Option<&ItemKey> {
        self.chips
            .iter()
            .find(|chip| chip.remove_area.contains(position))
            .map(|chip| &chip.key)
    }

    /// Find the chip at `position`.
    pub fn chip_index_at(&self, position: Position) -> Option<usize> {
        self.chips
            .iter()
            .position(|chip| chip.area.contains(position))
    }

    /// Draw the chips clipped to `clip`. `focused` marks a chip that has
    /// keyboard focus.
    pub fn render(&self, frame: &mut Frame, clip: Rect, theme: &Theme, focused: Option<usize>) {
        for (i, chip) in self.chips.iter().enumerate() {
            let area = chip.area.intersection(clip);
            if area.is_empty() {
                continue;
            }
            let style = theme.chip(focused == Some(i));
            let line = Line::from(vec![
                Span::styled(format!(" {} ", chip.label), style),
                Span::styled(REMOVE_GLYPH, style),
                Span::styled(" ", style),
            ]);
            frame.render_widget(Paragraph::new(line), area);
        }
    }
}

/// Truncate `text` to `max` display cells, ending with an ellipsis if cut.
fn truncate(text: &str, max: u16) -> String {
    let max = max as usize;
    if text.width() <= max {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn items(labels: &[&str]) -> Vec<Item<()>> {
        labels
            .iter()
            .map(|l| Item::plain(l.to_lowercase().as_str(), *l))
            .collect()
    }

    fn text(item: &Item<()>) -> String {
        item.text.clone()
    }

    #[test]
    fn test_empty_strip_puts_input_at_origin() {
        let strip = TagStrip::layout::<()>(&[], Rect::new(2, 1, 30, 5), 8, &text);
        assert!(strip.chips().is_empty());
        assert_eq!(strip.input_origin(), Position::new(2, 1));
        assert_eq!(strip.input_width(), 30);
        assert_eq!(strip.rows(), 1);
    }

    #[test]
    fn test_chips_keep_selection_order() {
        let items = items(&["Red", "Green", "Blue"]);
        let strip = TagStrip::layout(&items, Rect::new(0, 0, 80, 3), 8, &text);
        let labels: Vec<_> = strip.chips().iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Red", "Green", "Blue"]);
    }

    #[test]
    fn test_chip_geometry() {
        let items = items(&["Red", "Blue"]);
        let strip = TagStrip::layout(&items, Rect::new(0, 0, 80, 3), 8, &text);
        let red = &strip.chips()[0];
        // " Red × "
        assert_eq!(red.area, Rect::new(0, 0, 7, 1));
        assert_eq!(red.remove_area, Rect::new(5, 0, 1, 1));
        let blue = &strip.chips()[1];
        assert_eq!(blue.area.x, 8);
        assert_eq!(strip.input_origin(), Position::new(17, 0));
    }

    #[test]
    fn test_chips_wrap_to_next_row() {
        let items = items(&["Alpha", "Bravo", "Charlie"]);
        // Alpha = 9 wide, Bravo = 9 wide: second chip ends at 19 > 16
        let strip = TagStrip::layout(&items, Rect::new(0, 0, 16, 5), 4, &text);
        assert_eq!(strip.chips()[0].area.y, 0);
        assert_eq!(strip.chips()[1].area.y, 1);
        assert_eq!(strip.chips()[1].area.x, 0);
        assert_eq!(strip.chips()[2].area.y, 2);
        assert_eq!(strip.rows(), 3);
    }

    #[test]
    fn test_input_moves_to_new_row_when_full() {
        let items = items(&["Alpha"]);
        let strip = TagStrip::layout(&items, Rect::new(0, 0, 14, 5), 8, &text);
        assert_eq!(strip.input_origin(), Position::new(0, 1));
        assert_eq!(strip.rows(), 2);
    }

    #[test]
    fn test_long_label_is_truncated() {
        let items = items(&["An extremely long tag name"]);
        let strip = TagStrip::layout(&items, Rect::new(0, 0, 12, 5), 4, &text);
        let chip = &strip.chips()[0];
        assert!(chip.label.ends_with('…'));
        assert!(chip.area.width <= 12);
    }

    #[test]
    fn test_remove_hit() {
        let items = items(&["Red", "Blue"]);
        let strip = TagStrip::layout(&items, Rect::new(0, 0, 80, 3), 8, &text);
        assert_eq!(strip.remove_hit(Position::new(5, 0)), Some(&ItemKey::from("red")));
        assert_eq!(strip.remove_hit(Position::new(2, 0)), None);
        assert_eq!(strip.chip_index_at(Position::new(9, 0)), Some(1));
    }

    #[test]
    fn test_duplicate_labels_are_not_merged() {
        let items = vec![Item::plain("1", "Same"), Item::plain("2", "Same")];
        let strip = TagStrip::layout(&items, Rect::new(0, 0, 80, 3), 8, &text);
        assert_eq!(strip.chips().len(), 2);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefgh", 5), "abcd…");
    }
}
