//! Form state exposed to the rendering layer

use super::field::{DraftRecord, FieldName};
use super::schema::FieldErrors;
use std::collections::BTreeSet;

/// Submission lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Submitted,
}

impl Phase {
    /// Submit button label for this phase
    pub fn button_label(&self) -> &'static str {
        match self {
            Self::Idle => "Register",
            Self::Submitting => "Submitting…",
            Self::Submitted => "Registered!",
        }
    }
}

/// Working state of the registration form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub values: DraftRecord,
    pub errors: FieldErrors,
    /// Fields edited since the last reset
    pub touched: BTreeSet<FieldName>,
    pub phase: Phase,
    /// Failure of the last submission, kept apart from field errors
    pub submission_error: Option<String>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == Phase::Submitting
    }

    pub fn error_for(&self, field: FieldName) -> Option<&str> {
        self.errors.get(field)
    }

    pub fn is_touched(&self, field: FieldName) -> bool {
        self.touched.contains(&field)
    }

    /// Return to the initial empty state
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
