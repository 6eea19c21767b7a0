//! Selection controller.
//!
//! The controller is the only owner of the selected list and the input
//! state. Every user action maps to one operation here, and each operation
//! is total: unknown, stale or duplicate keys are ignored rather than
//! reported as errors.
//!
//! ## Phases
//!
//! - `Idle`: input empty, nothing armed
//! - `Filtering`: input has text, candidate list open
//! - `Armed`: a candidate is highlighted and ready to confirm
//!
//! Within one handler the commit is applied first and the filtered view is
//! recomputed afterwards against the new selection.

use std::collections::HashSet;
use std::fmt;

use tracing::{debug, trace};

use super::candidates::CandidateList;
use super::input::InputState;
use super::item::{Item, ItemKey};
use super::selected::SelectedList;

/// Receives add/remove notifications from a controller.
///
/// Each method fires exactly once per successful change.
pub trait SelectionListener {
    /// An item was appended to the selection.
    fn on_item_add(&mut self, key: &ItemKey);
    /// An item was removed from the selection.
    fn on_item_remove(&mut self, key: &ItemKey);
}

type KeyCallback = Box<dyn FnMut(&ItemKey)>;

/// Closure-based [`SelectionListener`].
#[derive(Default)]
pub struct Callbacks {
    on_add: Option<KeyCallback>,
    on_remove: Option<KeyCallback>,
}

impl Callbacks {
    /// Create a listener with no callbacks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the add callback.
    pub fn on_add(mut self, f: impl FnMut(&ItemKey) + 'static) -> Self {
        self.on_add = Some(Box::new(f));
        self
    }

    /// Set the remove callback.
    pub fn on_remove(mut self, f: impl FnMut(&ItemKey) + 'static) -> Self {
        self.on_remove = Some(Box::new(f));
        self
    }
}

impl SelectionListener for Callbacks {
    fn on_item_add(&mut self, key: &ItemKey) {
        if let Some(f) = self.on_add.as_mut() {
            f(key);
        }
    }

    fn on_item_remove(&mut self, key: &ItemKey) {
        if let Some(f) = self.on_remove.as_mut() {
            f(key);
        }
    }
}

/// Observable phase of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Input empty, nothing armed.
    #[default]
    Idle,
    /// Input has text.
    Filtering,
    /// A candidate is highlighted.
    Armed,
}

/// Outcome of a Backspace press in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backspace {
    /// The input was empty and the last tag was removed.
    RemovedTag(ItemKey),
    /// A character was deleted from the filter text.
    EditedText,
    /// Nothing happened.
    Ignored,
}

/// Behaviour switches chosen by the embedding caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControllerOptions {
    /// Close the candidate list after each commit.
    pub close_on_commit: bool,
}

/// Orchestrates the candidate list, selection and input state.
pub struct SelectionController<T> {
    /// Read-only source data.
    candidates: CandidateList<T>,
    /// Chosen items in append order.
    selected: SelectedList<T>,
    /// Filter text, caret and armed key.
    input: InputState,
    /// Indices into `candidates` making up the filtered view.
    view: Vec<usize>,
    /// Whether the floating candidate list is open.
    open: bool,
    /// Whether the input has focus.
    focused: bool,
    /// Caller preferences.
    options: ControllerOptions,
    /// Add/remove notifications.
    listener: Option<Box<dyn SelectionListener>>,
    /// Cleared on unmount; every operation is a no-op afterwards.
    mounted: bool,
}

impl<T> fmt::Debug for SelectionController<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionController")
            .field("candidates", &self.candidates.len())
            .field("selected", &self.selected.keys())
            .field("input", &self.input)
            .field("view", &self.view)
            .field("open", &self.open)
            .field("focused", &self.focused)
            .field("options", &self.options)
            .field("mounted", &self.mounted)
            .finish()
    }
}

impl<T: Clone> SelectionController<T> {
    /// Create a controller over a candidate collection with nothing selected.
    pub fn new(candidates: Vec<Item<T>>) -> Self {
        let mut controller = Self {
            candidates: CandidateList::new(candidates),
            selected: SelectedList::new(),
            input: InputState::new(),
            view: Vec::new(),
            open: false,
            focused: false,
            options: ControllerOptions::default(),
            listener: None,
            mounted: true,
        };
        controller.recompute();
        controller
    }

    /// Seed the selection without firing callbacks.
    pub fn with_initial_selection(mut self, items: impl IntoIterator<Item = Item<T>>) -> Self {
        self.selected = SelectedList::from_items(items);
        self.recompute();
        self
    }

    /// Seed the selection from candidate keys without firing callbacks.
    ///
    /// Keys that are not candidates are skipped.
    pub fn with_initial_keys<K: Into<ItemKey>>(mut self, keys: impl IntoIterator<Item = K>) -> Self {
        for key in keys {
            let key = key.into();
            match self.candidates.get(&key) {
                Some(item) => {
                    self.selected.append(item.clone());
                }
                None => debug!(key = %key, "Initial key is not a candidate, skipping"),
            }
        }
        self.recompute();
        self
    }

    /// Set the caller's behaviour options.
    pub fn with_options(mut self, options: ControllerOptions) -> Self {
        self.options = options;
        self
    }

    /// Attach a listener.
    pub fn with_listener(mut self, listener: impl SelectionListener + 'static) -> Self {
        self.set_listener(listener);
        self
    }

    /// Replace the listener.
    pub fn set_listener(&mut self, listener: impl SelectionListener + 'static) {
        if self.mounted {
            self.listener = Some(Box::new(listener));
        }
    }

    // ---- input/commit state -------------------------------------------

    /// Replace the filter text.
    ///
    /// Non-empty text opens the candidate list. Empty text disarms.
    pub fn set_filter_text(&mut self, text: impl Into<String>) {
        if !self.mounted {
            return;
        }
        self.input.set_filter_text(text);
        self.after_text_change();
    }

    /// Type a character at the caret.
    pub fn insert_char(&mut self, c: char) {
        if !self.mounted {
            return;
        }
        self.input.insert_char(c);
        self.after_text_change();
    }

    /// Handle Backspace in the input.
    ///
    /// With empty filter text this removes the most recently added tag.
    /// With any filter text it only edits the text, so a tag is never
    /// deleted mid-search.
    pub fn backspace(&mut self) -> Backspace {
        if !self.mounted {
            return Backspace::Ignored;
        }
        if self.input.is_empty() {
            let removed = self.remove_last();
            return match removed {
                Some(key) => Backspace::RemovedTag(key),
                None => Backspace::Ignored,
            };
        }
        if self.input.delete_backward() {
            self.after_text_change();
            Backspace::EditedText
        } else {
            Backspace::Ignored
        }
    }

    /// Delete the character under the caret.
    pub fn delete_forward(&mut self) -> bool {
        if !self.mounted || !self.input.delete_forward() {
            return false;
        }
        self.after_text_change();
        true
    }

    /// Clear the filter text, keeping the selection.
    pub fn clear_text(&mut self) {
        self.set_filter_text("");
    }

    /// Move the caret one char left.
    pub fn move_cursor_left(&mut self) {
        self.input.move_left();
    }

    /// Move the caret one char right.
    pub fn move_cursor_right(&mut self) {
        self.input.move_right();
    }

    /// Move the caret to the start of the text.
    pub fn move_cursor_home(&mut self) {
        self.input.move_home();
    }

    /// Move the caret to the end of the text.
    pub fn move_cursor_end(&mut self) {
        self.input.move_end();
    }

    // ---- arming --------------------------------------------------------

    /// Arm a candidate from the filtered view.
    ///
    /// Keys that are not currently visible are ignored.
    pub fn highlight(&mut self, key: &ItemKey) -> bool {
        if !self.mounted || !self.view_contains(key) {
            return false;
        }
        trace!(key = %key, "Candidate armed");
        self.input.arm(key.clone());
        true
    }

    /// Arm the next visible candidate, opening the list if needed.
    pub fn highlight_next(&mut self) {
        if !self.mounted {
            return;
        }
        self.open = true;
        let next = match self.armed_index() {
            Some(idx) => (idx + 1).min(self.view.len().saturating_sub(1)),
            None => 0,
        };
        self.arm_view_index(next);
    }

    /// Arm the previous visible candidate.
    pub fn highlight_prev(&mut self) {
        if !self.mounted {
            return;
        }
        self.open = true;
        let prev = match self.armed_index() {
            Some(idx) => idx.saturating_sub(1),
            None => 0,
        };
        self.arm_view_index(prev);
    }

    // ---- commit --------------------------------------------------------

    /// Confirm the armed candidate (keyboard path).
    pub fn confirm_armed(&mut self) -> Option<ItemKey> {
        let key = self.input.armed_key()?.clone();
        self.confirm_key(&key)
    }

    /// Confirm a candidate directly (pointer path).
    ///
    /// The key is re-validated against the current filtered view; a stale
    /// key is ignored. The input keeps focus so selections can be chained.
    pub fn confirm_key(&mut self, key: &ItemKey) -> Option<ItemKey> {
        if !self.mounted {
            return None;
        }
        if !self.view_contains(key) {
            debug!(key = %key, "Ignoring confirm for a key not in the filtered view");
            return None;
        }
        let item = self.candidates.get(key)?.clone();
        let added = self.append(item);
        self.focused = true;
        added
    }

    /// Add a candidate by key from outside the input, e.g. a shortcut.
    ///
    /// Unlike [`confirm_key`](Self::confirm_key) the key does not have to
    /// match the current filter.
    pub fn select_key(&mut self, key: &ItemKey) -> Option<ItemKey> {
        if !self.mounted {
            return None;
        }
        let item = self.candidates.get(key)?.clone();
        self.append(item)
    }

    fn append(&mut self, item: Item<T>) -> Option<ItemKey> {
        let key = item.key.clone();
        if !self.selected.append(item) {
            trace!(key = %key, "Item already selected");
            return None;
        }
        debug!(key = %key, count = self.selected.len(), "Item added");
        self.notify_add(&key);

        self.input.reset();
        if self.options.close_on_commit {
            self.open = false;
        }
        self.recompute();
        Some(key)
    }

    // ---- removal -------------------------------------------------------

    /// Remove a specific tag (the tag's own remove control).
    ///
    /// The input state is left untouched.
    pub fn remove_tag(&mut self, key: &ItemKey) -> Option<ItemKey> {
        if !self.mounted {
            return None;
        }
        let removed = self.selected.remove(key)?;
        debug!(key = %removed.key, count = self.selected.len(), "Item removed");
        self.notify_remove(&removed.key);
        self.recompute();
        Some(removed.key)
    }

    /// Remove the most recently added tag and reset the input.
    pub fn remove_last(&mut self) -> Option<ItemKey> {
        if !self.mounted {
            return None;
        }
        let removed = self.selected.remove_last();
        self.input.reset();
        let removed = removed?;
        debug!(key = %removed.key, count = self.selected.len(), "Last item removed");
        self.notify_remove(&removed.key);
        self.recompute();
        Some(removed.key)
    }

    // ---- focus and list visibility ------------------------------------

    /// The input gained focus.
    pub fn focus(&mut self) {
        if self.mounted {
            self.focused = true;
        }
    }

    /// The input lost focus: reset input state and close the list.
    ///
    /// Nothing is added or removed.
    pub fn blur(&mut self) {
        if !self.mounted {
            return;
        }
        trace!("Input blurred");
        self.focused = false;
        self.open = false;
        self.input.reset();
        self.recompute();
    }

    /// Open the candidate list.
    pub fn open_list(&mut self) {
        if self.mounted {
            self.open = true;
            self.focused = true;
        }
    }

    /// Close the candidate list and disarm.
    pub fn close_list(&mut self) {
        if self.mounted {
            self.open = false;
            self.input.disarm();
        }
    }

    /// Toggle the candidate list.
    pub fn toggle_list(&mut self) {
        if self.open {
            self.close_list();
        } else {
            self.open_list();
        }
    }

    /// Tear the controller down.
    ///
    /// The listener is dropped, so no callback can fire afterwards, and every
    /// later operation is a silent no-op.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        debug!("Selection controller unmounted");
        self.mounted = false;
        self.listener = None;
        self.open = false;
        self.focused = false;
        self.input.reset();
    }

    // ---- queries -------------------------------------------------------

    /// Current phase.
    pub fn phase(&self) -> Phase {
        if self.input.armed_key().is_some() {
            Phase::Armed
        } else if !self.input.is_empty() {
            Phase::Filtering
        } else {
            Phase::Idle
        }
    }

    /// The filtered view in candidate order.
    pub fn filtered(&self) -> Vec<&Item<T>> {
        self.view
            .iter()
            .map(|&idx| &self.candidates.items()[idx])
            .collect()
    }

    /// Number of items in the filtered view.
    pub fn filtered_len(&self) -> usize {
        self.view.len()
    }

    /// Position of the armed key within the filtered view.
    pub fn armed_index(&self) -> Option<usize> {
        let armed = self.input.armed_key()?;
        self.view
            .iter()
            .position(|&idx| &self.candidates.items()[idx].key == armed)
    }

    /// The armed key, if any.
    pub fn armed_key(&self) -> Option<&ItemKey> {
        self.input.armed_key()
    }

    /// The current filter text.
    pub fn filter_text(&self) -> &str {
        self.input.filter_text()
    }

    /// The full input state.
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Selected items in append order.
    pub fn selected(&self) -> &[Item<T>] {
        self.selected.items()
    }

    /// Selected keys in append order.
    pub fn selected_keys(&self) -> Vec<ItemKey> {
        self.selected.keys()
    }

    /// The candidate collection.
    pub fn candidates(&self) -> &CandidateList<T> {
        &self.candidates
    }

    /// Comma-joined selected keys for form submission.
    pub fn form_value(&self) -> String {
        self.selected.form_value()
    }

    /// Whether the candidate list is open.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Whether the input has focus.
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Whether the controller is still mounted.
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// The caller's options.
    pub fn options(&self) -> ControllerOptions {
        self.options
    }

    // ---- internals -----------------------------------------------------

    fn after_text_change(&mut self) {
        self.focused = true;
        if !self.input.is_empty() {
            self.open = true;
        }
        self.recompute();
    }

    fn recompute(&mut self) {
        let excluded: HashSet<ItemKey> = self.selected.keys().into_iter().collect();
        self.view = self
            .candidates
            .matching_indices(self.input.filter_text(), &excluded);
        trace!(
            filter = self.input.filter_text(),
            visible = self.view.len(),
            "Filtered view recomputed"
        );
    }

    fn view_contains(&self, key: &ItemKey) -> bool {
        self.view
            .iter()
            .any(|&idx| &self.candidates.items()[idx].key == key)
    }

    fn arm_view_index(&mut self, index: usize) {
        match self.view.get(index) {
            Some(&idx) => {
                let key = self.candidates.items()[idx].key.clone();
                self.input.arm(key);
            }
            None => self.input.disarm(),
        }
    }

    fn notify_add(&mut self, key: &ItemKey) {
        if let Some(listener) = self.listener.as_mut() {
            listener.on_item_add(key);
        }
    }

    fn notify_remove(&mut self, key: &ItemKey) {
        if let Some(listener) = self.listener.as_mut() {
            listener.on_item_remove(key);
        }
    }
}
