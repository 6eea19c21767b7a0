//! Transient input state: the filter text being typed and the armed key.
//!
//! The caret is tracked as a char index so multi-byte input edits cleanly.

use super::item::ItemKey;

/// Filter text, caret and the currently armed candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputState {
    /// Text typed by the user.
    filter_text: String,
    /// Candidate highlighted for confirmation.
    armed_key: Option<ItemKey>,
    /// Caret position in chars.
    cursor: usize,
}

impl InputState {
    /// Create an empty input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current filter text.
    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    /// The armed candidate key, if any.
    pub fn armed_key(&self) -> Option<&ItemKey> {
        self.armed_key.as_ref()
    }

    /// Caret position in chars.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Check if the filter text is empty.
    pub fn is_empty(&self) -> bool {
        self.filter_text.is_empty()
    }

    /// Replace the filter text and move the caret to the end.
    ///
    /// Emptying the text disarms.
    pub fn set_filter_text(&mut self, text: impl Into<String>) {
        self.filter_text = text.into();
        self.cursor = self.char_len();
        self.disarm_if_empty();
    }

    /// Arm a candidate.
    pub fn arm(&mut self, key: ItemKey) {
        self.armed_key = Some(key);
    }

    /// Drop the armed candidate.
    pub fn disarm(&mut self) {
        self.armed_key = None;
    }

    /// Back to `{ "", None }`.
    pub fn reset(&mut self) {
        self.filter_text.clear();
        self.armed_key = None;
        self.cursor = 0;
    }

    /// Insert a char at the caret.
    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_offset(self.cursor);
        self.filter_text.insert(at, c);
        self.cursor += 1;
    }

    /// Delete the char before the caret.
    ///
    /// Returns true if the text changed.
    pub fn delete_backward(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let at = self.byte_offset(self.cursor);
        self.filter_text.remove(at);
        self.disarm_if_empty();
        true
    }

    /// Delete the char under the caret.
    ///
    /// Returns true if the text changed.
    pub fn delete_forward(&mut self) -> bool {
        if self.cursor >= self.char_len() {
            return false;
        }
        let at = self.byte_offset(self.cursor);
        self.filter_text.remove(at);
        self.disarm_if_empty();
        true
    }

    /// Move the caret one char left.
    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move the caret one char right.
    pub fn move_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    /// Move the caret to the start.
    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    /// Move the caret to the end.
    pub fn move_end(&mut self) {
        self.cursor = self.char_len();
    }

    fn char_len(&self) -> usize {
        self.filter_text.chars().count()
    }

    fn byte_offset(&self, char_idx: usize) -> usize {
        self.filter_text
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.filter_text.len())
    }

    fn disarm_if_empty(&mut self) {
        if self.filter_text.is_empty() {
            self.armed_key = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_cursor() {
        let mut input = InputState::new();
        input.insert_char('r');
        input.insert_char('e');
        assert_eq!(input.filter_text(), "re");
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn test_insert_in_middle() {
        let mut input = InputState::new();
        input.set_filter_text("rd");
        input.move_left();
        input.insert_char('e');
        assert_eq!(input.filter_text(), "red");
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn test_multibyte_editing() {
        let mut input = InputState::new();
        input.set_filter_text("éq");
        assert_eq!(input.cursor(), 2);
        assert!(input.delete_backward());
        assert_eq!(input.filter_text(), "é");
        input.move_home();
        assert!(input.delete_forward());
        assert!(input.is_empty());
    }

    #[test]
    fn test_delete_backward_at_start() {
        let mut input = InputState::new();
        input.set_filter_text("ab");
        input.move_home();
        assert!(!input.delete_backward());
        assert_eq!(input.filter_text(), "ab");
    }

    #[test]
    fn test_delete_forward_at_end() {
        let mut input = InputState::new();
        input.set_filter_text("ab");
        assert!(!input.delete_forward());
    }

    #[test]
    fn test_emptying_text_disarms() {
        let mut input = InputState::new();
        input.set_filter_text("r");
        input.arm(ItemKey::from("1"));
        assert!(input.delete_backward());
        assert!(input.armed_key().is_none());
    }

    #[test]
    fn test_editing_non_empty_keeps_arm() {
        let mut input = InputState::new();
        input.set_filter_text("re");
        input.arm(ItemKey::from("1"));
        input.delete_backward();
        assert_eq!(input.armed_key(), Some(&ItemKey::from("1")));
    }

    #[test]
    fn test_set_empty_text_disarms() {
        let mut input = InputState::new();
        input.set_filter_text("x");
        input.arm(ItemKey::from("1"));
        input.set_filter_text("");
        assert!(input.armed_key().is_none());
    }

    #[test]
    fn test_reset() {
        let mut input = InputState::new();
        input.set_filter_text("blue");
        input.arm(ItemKey::from("3"));
        input.reset();
        assert_eq!(input, InputState::new());
    }

    #[test]
    fn test_cursor_bounds() {
        let mut input = InputState::new();
        input.move_left();
        assert_eq!(input.cursor(), 0);
        input.set_filter_text("ab");
        input.move_right();
        assert_eq!(input.cursor(), 2);
        input.move_home();
        input.move_right();
        assert_eq!(input.cursor(), 1);
        input.move_end();
        assert_eq!(input.cursor(), 2);
    }
}
