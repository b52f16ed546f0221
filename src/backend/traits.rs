//! Trait abstractions for the form's external collaborators, enabling mocking in tests

use crate::state::RegistrationRecord;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A selectable course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub label: String,
}

impl Course {
    pub fn new(id: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
        }
    }
}

/// Acknowledgement returned by the backend for an accepted registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub id: Uuid,
    pub submitted_at: DateTime<Utc>,
}

impl SubmissionReceipt {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            submitted_at: Utc::now(),
        }
    }
}

impl Default for SubmissionReceipt {
    fn default() -> Self {
        Self::new()
    }
}

/// Failure reported by a submit function
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("registration rejected: {0}")]
    Rejected(String),
    #[error("registration service unavailable: {0}")]
    Unavailable(String),
}

/// Backend that accepts validated registrations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmitFunction: Send + Sync {
    /// Submit a validated registration
    async fn submit(
        &self,
        record: RegistrationRecord,
    ) -> Result<SubmissionReceipt, SubmissionError>;
}

/// Fire-and-forget user notifications
#[cfg_attr(test, mockall::automock)]
pub trait NotificationSink: Send + Sync {
    fn notify(&self, title: &str, description: &str);
}

/// Source of the valid course identifiers
#[cfg_attr(test, mockall::automock)]
pub trait CourseCatalog {
    /// Courses in display order
    fn list_courses(&self) -> Vec<Course>;
}
