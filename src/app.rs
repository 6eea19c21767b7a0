//! Demo application state and update loop.
//!
//! The application owns a single multi-select field, routes terminal events
//! to it and keeps a short activity log fed by the field's add/remove
//! callbacks. It follows The Elm Architecture: `update` mutates state from
//! an [`Event`], `view` draws it.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};
use tracing::{debug, info, trace};

use crate::config::{CandidateDetails, Settings};
use crate::events::Event;
use crate::select::{Callbacks, ControllerOptions, Item, ItemKey};
use crate::ui::{MultiSelectAction, MultiSelectField, Theme};

/// Entries kept in the activity log.
const ACTIVITY_LIMIT: usize = 50;

/// The current state of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppState {
    /// The picker is taking input.
    #[default]
    Picking,
    /// Application is in the process of exiting.
    Exiting,
}

/// How the session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The selection was submitted.
    Submitted,
    /// The user backed out.
    Cancelled,
}

type ActivityLog = Rc<RefCell<Vec<String>>>;

/// The main application struct that holds all state.
pub struct App {
    state: AppState,
    should_quit: bool,
    outcome: Option<Outcome>,
    field: MultiSelectField<CandidateDetails>,
    activity: ActivityLog,
    form_name: Option<String>,
    theme: Theme,
}

impl App {
    /// Create an application over `candidates` with `initial` keys
    /// preselected. Unknown initial keys are skipped.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` when the settings don't validate.
    pub fn new(
        candidates: Vec<Item<CandidateDetails>>,
        initial: Vec<ItemKey>,
        settings: &Settings,
    ) -> crate::config::Result<Self> {
        settings.validate()?;
        let theme = Theme::with_tag_color(settings.tag_color()?);

        let labels: HashMap<ItemKey, String> = candidates
            .iter()
            .map(|item| (item.key.clone(), item.text.clone()))
            .collect();
        let labels = Rc::new(labels);
        let activity: ActivityLog = Rc::new(RefCell::new(Vec::new()));

        let callbacks = {
            let (add_log, add_labels) = (Rc::clone(&activity), Rc::clone(&labels));
            let (remove_log, remove_labels) = (Rc::clone(&activity), Rc::clone(&labels));
            Callbacks::new()
                .on_add(move |key| {
                    push_activity(&add_log, format!("+ {}", label_for(&add_labels, key)))
                })
                .on_remove(move |key| {
                    push_activity(&remove_log, format!("- {}", label_for(&remove_labels, key)))
                })
        };

        let muted = theme.muted();
        let field = MultiSelectField::new("Select", candidates)
            .with_initial_keys(initial)
            .with_options(ControllerOptions {
                close_on_commit: settings.close_on_commit,
            })
            .with_listener(callbacks)
            .with_placeholder(settings.placeholder.clone())
            .with_max_visible(settings.max_visible_candidates)
            .with_theme(theme)
            .with_candidate_renderer(move |item| {
                let mut spans = vec![Span::raw(item.text.clone())];
                if let Some(description) = &item.payload.description {
                    spans.push(Span::styled(format!("  {}", description), muted));
                }
                Line::from(spans)
            });

        info!(
            candidates = field.controller().candidates().len(),
            selected = field.controller().selected().len(),
            "Picker ready"
        );

        let mut app = Self {
            state: AppState::Picking,
            should_quit: false,
            outcome: None,
            field,
            activity,
            form_name: settings.form_name.clone(),
            theme,
        };
        app.field.focus_input();
        Ok(app)
    }

    /// Check if the application should quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Get the current state.
    pub fn state(&self) -> AppState {
        self.state
    }

    /// How the session ended, once it has.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// The picker field.
    pub fn field(&self) -> &MultiSelectField<CandidateDetails> {
        &self.field
    }

    /// Activity log entries, oldest first.
    pub fn activity(&self) -> Vec<String> {
        self.activity.borrow().clone()
    }

    /// The line printed on a submitted exit: `name=value` when a form name
    /// is set, the bare form value otherwise.
    pub fn output_line(&self) -> Option<String> {
        if self.outcome != Some(Outcome::Submitted) {
            return None;
        }
        let value = self.field.form_value();
        Some(match &self.form_name {
            Some(name) => format!("{}={}", name, value),
            None => value,
        })
    }

    /// Update application state based on an event.
    pub fn update(&mut self, event: Event) {
        if self.should_quit {
            return;
        }
        match event {
            Event::Key(key_event) => {
                trace!(key = ?key_event.code, modifiers = ?key_event.modifiers, "Key event");
                self.handle_key_event(key_event);
            }
            Event::Mouse(mouse_event) => {
                if let Some(action) = self.field.handle_mouse(mouse_event) {
                    self.handle_action(action);
                }
            }
            Event::Paste(text) => self.field.handle_paste(&text),
            Event::FocusLost => {
                debug!("Terminal lost focus");
                self.field.blur();
            }
            Event::FocusGained => trace!("Terminal gained focus"),
            Event::Resize(width, height) => trace!(width, height, "Terminal resize event"),
            Event::Tick => {}
        }
    }

    fn handle_key_event(&mut self, key_event: KeyEvent) {
        if key_event.code == KeyCode::Char('c') && key_event.modifiers == KeyModifiers::CONTROL {
            self.quit(Outcome::Cancelled);
            return;
        }
        if let Some(action) = self.field.handle_input(key_event) {
            self.handle_action(action);
        }
    }

    fn handle_action(&mut self, action: MultiSelectAction) {
        match action {
            MultiSelectAction::Added(key) => debug!(key = %key, "Added"),
            MultiSelectAction::Removed(key) => debug!(key = %key, "Removed"),
            MultiSelectAction::Submit => self.quit(Outcome::Submitted),
            MultiSelectAction::Cancel => self.quit(Outcome::Cancelled),
            MultiSelectAction::Blurred => debug!("Picker blurred"),
        }
    }

    fn quit(&mut self, outcome: Outcome) {
        info!(?outcome, value = %self.field.form_value(), "Quitting");
        self.outcome = Some(outcome);
        self.should_quit = true;
        self.state = AppState::Exiting;
        self.field.unmount();
    }

    /// Render the application.
    pub fn view(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let field_height = self.field.required_height(area.width);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(field_height),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(area);

        self.render_header(frame, chunks[0]);
        self.render_activity(frame, chunks[2]);
        self.render_footer(frame, chunks[3]);
        // Last, so the popover draws over the panes below it.
        self.field.render(frame, chunks[1]);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let count = self.field.controller().selected().len();
        let header = Line::from(vec![
            Span::styled("tagpick", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(format!("  {} selected", count), self.theme.muted()),
        ]);
        frame.render_widget(Paragraph::new(header), area);
    }

    fn render_activity(&self, frame: &mut Frame, area: Rect) {
        let log = self.activity.borrow();
        let visible = area.height.saturating_sub(2) as usize;
        let items: Vec<ListItem> = log
            .iter()
            .skip(log.len().saturating_sub(visible))
            .map(|entry| ListItem::new(entry.as_str()))
            .collect();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border(false))
            .title(" Activity ");
        frame.render_widget(List::new(items).block(block), area);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let help = "↑↓ highlight  Enter add/submit  Bksp remove  Esc close/cancel  Ctrl+C quit";
        frame.render_widget(Paragraph::new(Span::styled(help, self.theme.muted())), area);
    }
}

fn label_for(labels: &HashMap<ItemKey, String>, key: &ItemKey) -> String {
    labels
        .get(key)
        .cloned()
        .unwrap_or_else(|| key.to_string())
}

fn push_activity(log: &ActivityLog, entry: String) {
    let mut log = log.borrow_mut();
    log.push(entry);
    if log.len() > ACTIVITY_LIMIT {
        let excess = log.len() - ACTIVITY_LIMIT;
        log.drain(..excess);
    }
}
