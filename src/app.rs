//! Application state and core logic

use crate::backend::{
    ChannelNotifier, CourseCatalog, Notification, SimulatedSubmitter, StaticCatalog,
    SubmitFunction,
};
use crate::config::AppConfig;
use crate::state::{FieldName, FieldValue, FormController, RegistrationSchema, SubmitOutcome};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedReceiver;

/// How long a toast stays on screen
const TOAST_DURATION: Duration = Duration::from_secs(4);

/// Index of the submit button in the focus order
pub const BUTTON_INDEX: usize = FieldName::ALL.len();

/// A notification currently on screen
#[derive(Debug, Clone)]
pub struct Toast {
    pub notification: Notification,
    pub shown_at: Instant,
}

impl Toast {
    pub fn is_expired(&self) -> bool {
        self.shown_at.elapsed() >= TOAST_DURATION
    }
}

/// Main application struct
pub struct App {
    /// Registration form state machine
    pub form: FormController,
    /// Courses offered in the course selector
    pub catalog: StaticCatalog,
    /// Focused row: a field index, or [`BUTTON_INDEX`]
    pub active_field: usize,
    /// Notification currently displayed
    pub toast: Option<Toast>,
    /// Age exactly as typed; the form holds the coerced value
    age_input: String,
    notifications: UnboundedReceiver<Notification>,
    /// Whether the app should quit
    quit: bool,
}

impl App {
    /// Create a new App instance
    pub fn new(config: &AppConfig) -> Self {
        let catalog = match &config.courses {
            Some(courses) => StaticCatalog::new(courses.clone()),
            None => StaticCatalog::builtin(),
        };
        let submitter: Arc<dyn SubmitFunction> = if config.simulate_failure() {
            Arc::new(SimulatedSubmitter::failing(config.submit_delay()))
        } else {
            Arc::new(SimulatedSubmitter::new(config.submit_delay()))
        };
        Self::with_submitter(config, catalog, submitter)
    }

    fn with_submitter(
        config: &AppConfig,
        catalog: StaticCatalog,
        submitter: Arc<dyn SubmitFunction>,
    ) -> Self {
        let (notifier, notifications) = ChannelNotifier::new();
        let schema = RegistrationSchema::from_catalog(&catalog);
        let form = FormController::new(
            schema,
            submitter,
            Arc::new(notifier),
            config.reset_delay(),
        );
        tracing::info!(courses = catalog.list_courses().len(), "registration form ready");

        Self {
            form,
            catalog,
            active_field: 0,
            toast: None,
            age_input: String::new(),
            notifications,
            quit: false,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Focused field, or None when the submit button is focused
    pub fn active_field_name(&self) -> Option<FieldName> {
        FieldName::ALL.get(self.active_field).copied()
    }

    pub fn is_button_active(&self) -> bool {
        self.active_field == BUTTON_INDEX
    }

    /// Text shown for a field
    pub fn display_value(&self, field: FieldName) -> String {
        let value = self.form.state().values.get(field);
        match field {
            FieldName::Course => {
                let id = value.as_text();
                self.catalog.label_for(id).unwrap_or(id).to_string()
            }
            FieldName::Age => self.age_input.clone(),
            _ => value.display_value(),
        }
    }

    /// Apply background events and expire the toast
    pub fn tick(&mut self) {
        self.form.pump();
        // An untouched age means the form was reset
        if !self.form.state().is_touched(FieldName::Age) {
            self.age_input.clear();
        }
        while let Ok(notification) = self.notifications.try_recv() {
            self.toast = Some(Toast {
                notification,
                shown_at: Instant::now(),
            });
        }
        if self.toast.as_ref().is_some_and(Toast::is_expired) {
            self.toast = None;
        }
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit = true;
            return;
        }

        match key.code {
            KeyCode::Esc => self.quit = true,
            KeyCode::Tab | KeyCode::Down => self.focus(self.active_field + 1),
            KeyCode::BackTab | KeyCode::Up => {
                let prev = self.active_field.checked_sub(1).unwrap_or(BUTTON_INDEX);
                self.focus(prev);
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Left => self.cycle_course(false),
            KeyCode::Right => self.cycle_course(true),
            KeyCode::Char(c) => self.input_char(c),
            KeyCode::Backspace => self.backspace(),
            _ => {}
        }
    }

    fn focus(&mut self, index: usize) {
        if let Some(field) = self.active_field_name() {
            self.form.blur_field(field);
        }
        self.active_field = index % (BUTTON_INDEX + 1);
    }

    fn submit(&mut self) {
        if let Some(field) = self.active_field_name() {
            self.form.blur_field(field);
        }
        if self.form.submit() == SubmitOutcome::Invalid {
            // Jump to the first field with an error
            if let Some(index) = FieldName::ALL
                .iter()
                .position(|f| self.form.state().errors.contains(*f))
            {
                self.active_field = index;
            }
        }
    }

    fn input_char(&mut self, c: char) {
        let Some(field) = self.active_field_name() else {
            return;
        };
        match field {
            FieldName::Name | FieldName::Email => {
                let mut text = self.form.state().values.get(field).as_text().to_string();
                text.push(c);
                self.form.set_field(field, FieldValue::Text(text));
            }
            FieldName::Age => {
                self.age_input.push(c);
                self.form.set_field(field, coerce_age(&self.age_input));
            }
            FieldName::Course => {}
        }
    }

    fn backspace(&mut self) {
        let Some(field) = self.active_field_name() else {
            return;
        };
        match field {
            FieldName::Name | FieldName::Email => {
                let mut text = self.form.state().values.get(field).as_text().to_string();
                text.pop();
                self.form.set_field(field, FieldValue::Text(text));
            }
            FieldName::Age => {
                self.age_input.pop();
                self.form.set_field(field, coerce_age(&self.age_input));
            }
            FieldName::Course => self.form.set_field(field, FieldValue::Text(String::new())),
        }
    }

    fn cycle_course(&mut self, forward: bool) {
        if self.active_field_name() != Some(FieldName::Course) {
            return;
        }
        let current = self.form.state().values.course.as_text();
        let next = if forward {
            self.catalog.next_id(current)
        } else {
            self.catalog.prev_id(current)
        };
        if let Some(id) = next.map(str::to_string) {
            self.form.set_field(FieldName::Course, FieldValue::Text(id));
        }
    }
}

/// Convert typed age text to a number; anything non-numeric stays text
fn coerce_age(raw: &str) -> FieldValue {
    if raw.is_empty() {
        return FieldValue::Number(0);
    }
    match raw.parse::<i64>() {
        Ok(n) => FieldValue::Number(n),
        Err(_) => FieldValue::Text(raw.to_string()),
    }
}
