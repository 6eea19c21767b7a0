//! Multi-select field: a filter input with tag chips and a floating
//! candidate list.
//!
//! The field wraps a [`SelectionController`] and is responsible only for
//! turning terminal input into controller operations and drawing the
//! result. The anchor box publishes its width on every render; the
//! popover reads it back through the sizing channel and falls back to its
//! content width until a measurement exists.
//!
//! ## Keys (input focused)
//!
//! - type to filter, Backspace/Delete to edit
//! - Backspace on empty input removes the last tag
//! - Down/Up arm candidates, Enter confirms
//! - Esc closes the list (or cancels when closed), Tab blurs
//! - Ctrl+Space / Alt+Down toggle the list
//! - Left at the start of the input moves into the tags
//!
//! ## Keys (tags focused)
//!
//! - Left/Right move between tags
//! - Backspace/Delete/Enter remove the focused tag
//! - Esc/Down/Tab return to the input

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Position, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};
use tracing::{debug, trace};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::popover::{popover_area, MIN_POPOVER_HEIGHT};
use super::tag_strip::TagStrip;
use crate::select::sizing::{self, AnchorObserver, AnchorWidth};
use crate::select::{
    Backspace, ControllerOptions, Item, ItemKey, SelectionController, SelectionListener,
};
use crate::ui::theme::Theme;

/// Glyph for the list toggle on the anchor's right edge.
const TRIGGER_GLYPH: &str = "▾";

/// Minimum room kept for typing after the last chip.
const MIN_INPUT_WIDTH: u16 = 8;

/// Symbol drawn before the armed candidate.
const HIGHLIGHT_SYMBOL: &str = "> ";

/// Default number of candidate rows shown at once.
pub const DEFAULT_MAX_VISIBLE: usize = 8;

type CandidateRenderer<T> = Box<dyn Fn(&Item<T>) -> Line<'static>>;
type TagRenderer<T> = Box<dyn Fn(&Item<T>) -> String>;
type EmptyStateRenderer = Box<dyn Fn(&str) -> Line<'static>>;

/// Action resulting from multi-select input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultiSelectAction {
    /// An item was added to the selection.
    Added(ItemKey),
    /// An item was removed from the selection.
    Removed(ItemKey),
    /// Enter with nothing armed.
    Submit,
    /// Esc with the list already closed.
    Cancel,
    /// The field gave up focus.
    Blurred,
}

/// Which part of the field has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldFocus {
    /// The text input.
    #[default]
    Input,
    /// A tag chip, by index into the selection.
    Tag(usize),
}

/// Screen geometry from the last render, used for mouse hits.
#[derive(Debug, Clone, Default)]
struct HitMap {
    anchor: Rect,
    trigger: Rect,
    strip: TagStrip,
    popover: Option<Rect>,
    rows: Vec<(Rect, ItemKey)>,
}

/// Multi-select field widget.
pub struct MultiSelectField<T> {
    /// Selection state machine.
    controller: SelectionController<T>,
    /// Publishes the anchor width; owned by the anchor.
    observer: AnchorObserver,
    /// Anchor width as seen by the popover.
    anchor_width: AnchorWidth,
    /// Keyboard focus within the field.
    focus: FieldFocus,
    /// Title on the anchor border.
    label: String,
    /// Shown when the input is empty and nothing is selected.
    placeholder: String,
    /// Maximum candidate rows shown at once.
    max_visible: usize,
    /// Colors.
    theme: Theme,
    /// Candidate row presentation.
    candidate_renderer: CandidateRenderer<T>,
    /// Chip label presentation.
    tag_renderer: TagRenderer<T>,
    /// Presentation when no candidate matches.
    empty_state: EmptyStateRenderer,
    /// Scroll state of the candidate list.
    list_state: ListState,
    /// Geometry from the last render.
    hits: HitMap,
}

impl<T: Clone + 'static> MultiSelectField<T> {
    /// Create a field over a candidate collection.
    pub fn new(label: impl Into<String>, candidates: Vec<Item<T>>) -> Self {
        Self::from_controller(label, SelectionController::new(candidates))
    }

    /// Wrap an already configured controller.
    pub fn from_controller(label: impl Into<String>, controller: SelectionController<T>) -> Self {
        let (observer, anchor_width) = sizing::observe();
        Self {
            controller,
            observer,
            anchor_width,
            focus: FieldFocus::Input,
            label: label.into(),
            placeholder: "Type to search...".to_string(),
            max_visible: DEFAULT_MAX_VISIBLE,
            theme: Theme::default(),
            candidate_renderer: Box::new(|item: &Item<T>| Line::from(item.text.clone())),
            tag_renderer: Box::new(|item: &Item<T>| item.text.clone()),
            empty_state: Box::new(|text: &str| {
                if text.is_empty() {
                    Line::from("No options available")
                } else {
                    Line::from(format!("No matches for \"{}\"", text))
                }
            }),
            list_state: ListState::default(),
            hits: HitMap::default(),
        }
    }

    /// Seed the selection from candidate keys without firing callbacks.
    pub fn with_initial_keys<K: Into<ItemKey>>(mut self, keys: impl IntoIterator<Item = K>) -> Self {
        self.controller = self.controller.with_initial_keys(keys);
        self
    }

    /// Set controller options.
    pub fn with_options(mut self, options: ControllerOptions) -> Self {
        self.controller = self.controller.with_options(options);
        self
    }

    /// Attach an add/remove listener.
    pub fn with_listener(mut self, listener: impl SelectionListener + 'static) -> Self {
        self.controller.set_listener(listener);
        self
    }

    /// Set the placeholder text.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Set the maximum number of visible candidate rows.
    pub fn with_max_visible(mut self, max_visible: usize) -> Self {
        self.max_visible = max_visible.max(1);
        self
    }

    /// Set the theme.
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Set how candidates are drawn in the list.
    pub fn with_candidate_renderer(mut self, f: impl Fn(&Item<T>) -> Line<'static> + 'static) -> Self {
        self.candidate_renderer = Box::new(f);
        self
    }

    /// Set how selected items are labelled on their chips.
    pub fn with_tag_renderer(mut self, f: impl Fn(&Item<T>) -> String + 'static) -> Self {
        self.tag_renderer = Box::new(f);
        self
    }

    /// Set what the list shows when nothing matches.
    pub fn with_empty_state(mut self, f: impl Fn(&str) -> Line<'static> + 'static) -> Self {
        self.empty_state = Box::new(f);
        self
    }

    /// The wrapped controller.
    pub fn controller(&self) -> &SelectionController<T> {
        &self.controller
    }

    /// Mutable access to the wrapped controller.
    pub fn controller_mut(&mut self) -> &mut SelectionController<T> {
        &mut self.controller
    }

    /// Current keyboard focus within the field.
    pub fn focus(&self) -> FieldFocus {
        self.focus
    }

    /// Comma-joined selected keys.
    pub fn form_value(&self) -> String {
        self.controller.form_value()
    }

    /// Give the field keyboard focus.
    pub fn focus_input(&mut self) {
        self.focus = FieldFocus::Input;
        self.controller.focus();
    }

    /// Take focus away from the field.
    pub fn blur(&mut self) {
        self.focus = FieldFocus::Input;
        self.controller.blur();
    }

    /// Tear the field down: stop width observation and silence callbacks.
    pub fn unmount(&mut self) {
        self.observer.detach();
        self.controller.unmount();
        self.hits = HitMap::default();
    }

    /// Whether the anchor width is still being observed.
    pub fn is_observing(&self) -> bool {
        self.anchor_width.is_observing()
    }

    /// The last measured anchor width, if any.
    pub fn measured_width(&self) -> Option<u16> {
        self.anchor_width.latest()
    }

    /// Height the anchor box needs at the given width.
    pub fn required_height(&self, width: u16) -> u16 {
        let inner = Self::strip_area(Rect::new(0, 0, width, 3));
        let strip = TagStrip::layout(
            self.controller.selected(),
            inner,
            MIN_INPUT_WIDTH,
            &*self.tag_renderer,
        );
        strip.rows() + 2
    }

    /// Handle keyboard input.
    ///
    /// Returns an optional action to be handled by the parent view.
    pub fn handle_input(&mut self, key: KeyEvent) -> Option<MultiSelectAction> {
        if !self.controller.is_mounted() {
            return None;
        }
        match self.focus {
            FieldFocus::Input => self.handle_input_key(key),
            FieldFocus::Tag(index) => self.handle_tag_key(key, index),
        }
    }

    /// Insert pasted text at the caret. Line breaks are dropped.
    pub fn handle_paste(&mut self, text: &str) {
        if !self.controller.is_mounted() {
            return;
        }
        self.focus = FieldFocus::Input;
        for c in text.chars().filter(|c| !c.is_control()) {
            self.controller.insert_char(c);
        }
        trace!(len = text.len(), "Pasted into filter");
    }

    fn handle_input_key(&mut self, key: KeyEvent) -> Option<MultiSelectAction> {
        match (key.code, key.modifiers) {
            (KeyCode::Char(' '), KeyModifiers::CONTROL) | (KeyCode::Down, KeyModifiers::ALT) => {
                self.controller.toggle_list();
                None
            }
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                self.controller.clear_text();
                None
            }
            (KeyCode::Char('a'), KeyModifiers::CONTROL) | (KeyCode::Home, _) => {
                self.controller.move_cursor_home();
                None
            }
            (KeyCode::Char('e'), KeyModifiers::CONTROL) | (KeyCode::End, _) => {
                self.controller.move_cursor_end();
                None
            }
            (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                self.controller.insert_char(c);
                None
            }
            (KeyCode::Backspace, _) => match self.controller.backspace() {
                Backspace::RemovedTag(key) => Some(MultiSelectAction::Removed(key)),
                Backspace::EditedText | Backspace::Ignored => None,
            },
            (KeyCode::Delete, _) => {
                self.controller.delete_forward();
                None
            }
            (KeyCode::Left, _) => {
                if self.controller.input().cursor() == 0 && !self.controller.selected().is_empty() {
                    let last = self.controller.selected().len() - 1;
                    trace!(index = last, "Focus moved into tags");
                    self.focus = FieldFocus::Tag(last);
                } else {
                    self.controller.move_cursor_left();
                }
                None
            }
            (KeyCode::Right, _) => {
                self.controller.move_cursor_right();
                None
            }
            (KeyCode::Down, _) => {
                self.controller.highlight_next();
                None
            }
            (KeyCode::Up, _) => {
                self.controller.highlight_prev();
                None
            }
            (KeyCode::Enter, _) => {
                if self.controller.armed_key().is_some() {
                    self.controller.confirm_armed().map(MultiSelectAction::Added)
                } else {
                    Some(MultiSelectAction::Submit)
                }
            }
            (KeyCode::Esc, _) => {
                if self.controller.is_open() {
                    self.controller.close_list();
                    None
                } else {
                    Some(MultiSelectAction::Cancel)
                }
            }
            (KeyCode::Tab, _) | (KeyCode::BackTab, _) => {
                self.blur();
                Some(MultiSelectAction::Blurred)
            }
            _ => None,
        }
    }

    fn handle_tag_key(&mut self, key: KeyEvent, index: usize) -> Option<MultiSelectAction> {
        let count = self.controller.selected().len();
        if count == 0 {
            self.focus = FieldFocus::Input;
            return self.handle_input_key(key);
        }
        let index = index.min(count - 1);

        match key.code {
            KeyCode::Left => {
                self.focus = FieldFocus::Tag(index.saturating_sub(1));
                None
            }
            KeyCode::Right => {
                self.focus = if index + 1 < count {
                    FieldFocus::Tag(index + 1)
                } else {
                    FieldFocus::Input
                };
                None
            }
            KeyCode::Backspace | KeyCode::Delete | KeyCode::Enter => {
                let key = self.controller.selected()[index].key.clone();
                let removed = self.controller.remove_tag(&key);
                let remaining = self.controller.selected().len();
                self.focus = if remaining == 0 {
                    FieldFocus::Input
                } else {
                    FieldFocus::Tag(index.min(remaining - 1))
                };
                removed.map(MultiSelectAction::Removed)
            }
            KeyCode::Esc | KeyCode::Down | KeyCode::Tab => {
                self.focus = FieldFocus::Input;
                None
            }
            _ => None,
        }
    }

    /// Handle mouse input using geometry from the last render.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> Option<MultiSelectAction> {
        if !self.controller.is_mounted() {
            return None;
        }
        let position = Position::new(mouse.column, mouse.row);

        match mouse.kind {
            MouseEventKind::Moved => {
                if let Some(key) = self.row_at(position) {
                    self.controller.highlight(&key);
                }
                None
            }
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(popover) = self.hits.popover {
                    if popover.contains(position) {
                        let key = self.row_at(position)?;
                        debug!(key = %key, "Candidate clicked");
                        self.focus = FieldFocus::Input;
                        return self.controller.confirm_key(&key).map(MultiSelectAction::Added);
                    }
                }
                // Chips on rows clipped off the anchor keep their rects but
                // are not drawn, so only hits inside the strip count.
                let on_strip = Self::strip_area(self.hits.anchor).contains(position);
                if let Some(key) = self
                    .hits
                    .strip
                    .remove_hit(position)
                    .filter(|_| on_strip)
                    .cloned()
                {
                    debug!(key = %key, "Tag remove clicked");
                    return self.controller.remove_tag(&key).map(MultiSelectAction::Removed);
                }
                if self.hits.trigger.contains(position) {
                    self.focus_input();
                    self.controller.toggle_list();
                    return None;
                }
                if self.hits.anchor.contains(position) {
                    self.focus = match self.hits.strip.chip_index_at(position) {
                        Some(index) if on_strip => FieldFocus::Tag(index),
                        _ => FieldFocus::Input,
                    };
                    self.controller.focus();
                    return None;
                }
                if self.controller.is_focused() {
                    self.blur();
                    return Some(MultiSelectAction::Blurred);
                }
                None
            }
            _ => None,
        }
    }

    fn row_at(&self, position: Position) -> Option<ItemKey> {
        self.hits
            .rows
            .iter()
            .find(|(rect, _)| rect.contains(position))
            .map(|(_, key)| key.clone())
    }

    /// Render the field at the top of `area`.
    ///
    /// The anchor takes the height it needs; the candidate list floats over
    /// whatever is below (or above) it within the frame.
    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        if !self.controller.is_mounted() {
            return;
        }
        let height = self.required_height(area.width).min(area.height);
        let anchor = Rect::new(area.x, area.y, area.width, height);
        self.render_anchor(frame, anchor);
        self.observer.publish(anchor.width);

        if self.controller.is_open() {
            let bounds = frame.area();
            self.render_popover(frame, anchor, bounds);
        } else {
            self.hits.popover = None;
            self.hits.rows.clear();
        }
    }

    fn strip_area(anchor: Rect) -> Rect {
        // Borders on both sides plus the trigger column.
        Rect::new(
            anchor.x + 1,
            anchor.y + 1,
            anchor.width.saturating_sub(4),
            anchor.height.saturating_sub(2),
        )
    }

    fn render_anchor(&mut self, frame: &mut Frame, anchor: Rect) {
        let focused = self.controller.is_focused();
        let block = Block::default()
            .title(format!(" {} ", self.label))
            .borders(Borders::ALL)
            .border_style(self.theme.border(focused));
        frame.render_widget(block, anchor);

        let strip_area = Self::strip_area(anchor);
        let strip = TagStrip::layout(
            self.controller.selected(),
            strip_area,
            MIN_INPUT_WIDTH,
            &*self.tag_renderer,
        );
        let focused_tag = match self.focus {
            FieldFocus::Tag(index) if focused => Some(index),
            _ => None,
        };
        strip.render(frame, strip_area, &self.theme, focused_tag);

        let origin = strip.input_origin();
        let input_area = Rect::new(origin.x, origin.y, strip.input_width(), 1)
            .intersection(strip_area);
        self.render_input(frame, input_area, focused);

        let trigger = Rect::new(anchor.right().saturating_sub(3), anchor.y + 1, 1, 1);
        if anchor.width >= 4 && anchor.height >= 3 {
            frame.render_widget(
                Paragraph::new(Span::styled(TRIGGER_GLYPH, self.theme.muted())),
                trigger,
            );
        }

        self.hits.anchor = anchor;
        self.hits.trigger = trigger;
        self.hits.strip = strip;
    }

    fn render_input(&self, frame: &mut Frame, area: Rect, focused: bool) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let text = self.controller.filter_text();
        if text.is_empty() {
            if self.controller.selected().is_empty() {
                frame.render_widget(
                    Paragraph::new(Span::styled(self.placeholder.clone(), self.theme.muted())),
                    area,
                );
            }
            if focused && self.focus == FieldFocus::Input {
                frame.set_cursor_position(Position::new(area.x, area.y));
            }
            return;
        }

        // Scroll horizontally so the caret stays visible.
        let chars: Vec<char> = text.chars().collect();
        let cursor = self.controller.input().cursor().min(chars.len());
        let span_width = |from: usize, to: usize| -> usize {
            chars[from..to].iter().map(|c| c.width().unwrap_or(0)).sum()
        };
        let avail = area.width.saturating_sub(1) as usize;
        let mut start = 0;
        while start < cursor && span_width(start, cursor) > avail {
            start += 1;
        }
        let visible: String = chars[start..].iter().collect();
        let caret_x = span_width(start, cursor) as u16;

        frame.render_widget(
            Paragraph::new(Span::styled(visible, Style::default().fg(self.theme.fg))),
            area,
        );
        if focused && self.focus == FieldFocus::Input {
            let x = (area.x + caret_x).min(area.right().saturating_sub(1));
            frame.set_cursor_position(Position::new(x, area.y));
        }
    }

    fn render_popover(&mut self, frame: &mut Frame, anchor: Rect, bounds: Rect) {
        let filtered = self.controller.filtered();
        let lines: Vec<Line<'static>> = filtered
            .iter()
            .map(|item| (self.candidate_renderer)(item))
            .collect();
        let keys: Vec<ItemKey> = filtered.iter().map(|item| item.key.clone()).collect();

        let empty_line = if lines.is_empty() {
            Some((self.empty_state)(self.controller.filter_text()))
        } else {
            None
        };
        let content_width = lines
            .iter()
            .chain(empty_line.iter())
            .map(|line| line.width() as u16)
            .max()
            .unwrap_or(0)
            + HIGHLIGHT_SYMBOL.width() as u16;
        let rows = lines.len().clamp(1, self.max_visible) as u16;

        let area = popover_area(anchor, bounds, self.anchor_width.latest(), content_width, rows);
        self.hits.rows.clear();
        if area.height < MIN_POPOVER_HEIGHT {
            self.hits.popover = None;
            return;
        }
        self.hits.popover = Some(area);

        frame.render_widget(Clear, area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border(true));
        let inner = block.inner(area);

        if let Some(empty_line) = empty_line {
            frame.render_widget(
                Paragraph::new(empty_line).style(self.theme.muted()).block(block),
                area,
            );
            return;
        }

        let items: Vec<ListItem> = lines.into_iter().map(ListItem::new).collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(self.theme.armed())
            .highlight_symbol(HIGHLIGHT_SYMBOL);

        self.list_state.select(self.controller.armed_index());
        frame.render_stateful_widget(list, area, &mut self.list_state);

        let offset = self.list_state.offset();
        for (row, key) in keys.into_iter().skip(offset).take(inner.height as usize).enumerate() {
            let rect = Rect::new(inner.x, inner.y + row as u16, inner.width, 1);
            self.hits.rows.push((rect, key));
        }
    }
}
