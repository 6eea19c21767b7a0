//! Theme and styling configuration.

use ratatui::style::{Color, Modifier, Style};

/// Color theme for the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Primary foreground color.
    pub fg: Color,
    /// Dimmed text (placeholders, empty states, help).
    pub muted: Color,
    /// Border color when the control has focus.
    pub focus_border: Color,
    /// Border color when the control is idle.
    pub border: Color,
    /// Background of tag chips.
    pub tag_bg: Color,
    /// Foreground of tag chips.
    pub tag_fg: Color,
    /// Highlight for the armed candidate and the focused chip.
    pub highlight: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            fg: Color::White,
            muted: Color::DarkGray,
            focus_border: Color::Cyan,
            border: Color::Gray,
            tag_bg: Color::Blue,
            tag_fg: Color::White,
            highlight: Color::Yellow,
        }
    }
}

impl Theme {
    /// Default theme with a custom chip color.
    pub fn with_tag_color(tag_bg: Color) -> Self {
        Self {
            tag_bg,
            ..Self::default()
        }
    }

    /// Style for a tag chip.
    pub fn chip(&self, focused: bool) -> Style {
        if focused {
            Style::default()
                .fg(Color::Black)
                .bg(self.highlight)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.tag_fg).bg(self.tag_bg)
        }
    }

    /// Style for the armed candidate row.
    pub fn armed(&self) -> Style {
        Style::default()
            .bg(Color::DarkGray)
            .fg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }

    /// Border style for the anchor.
    pub fn border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.focus_border)
        } else {
            Style::default().fg(self.border)
        }
    }

    /// Style for dimmed text.
    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_tag_color() {
        let theme = Theme::with_tag_color(Color::Magenta);
        assert_eq!(theme.tag_bg, Color::Magenta);
        assert_eq!(theme.fg, Theme::default().fg);
    }

    #[test]
    fn test_focused_chip_differs() {
        let theme = Theme::default();
        assert_ne!(theme.chip(true), theme.chip(false));
    }
}
