//! Fixed-delay stand-in for the registration backend

use super::traits::{SubmissionError, SubmissionReceipt, SubmitFunction};
use crate::state::RegistrationRecord;
use async_trait::async_trait;
use std::time::Duration;

/// Waits for a fixed delay, then accepts (or rejects) every registration
#[derive(Debug, Clone)]
pub struct SimulatedSubmitter {
    delay: Duration,
    fail: bool,
}

impl SimulatedSubmitter {
    pub fn new(delay: Duration) -> Self {
        Self { delay, fail: false }
    }

    /// Reject every submission after the delay
    pub fn failing(delay: Duration) -> Self {
        Self { delay, fail: true }
    }
}

#[async_trait]
impl SubmitFunction for SimulatedSubmitter {
    async fn submit(
        &self,
        record: RegistrationRecord,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        tracing::debug!(
            email = record.email(),
            age = record.age(),
            delay_ms = self.delay.as_millis() as u64,
            "simulating backend call"
        );
        tokio::time::sleep(self.delay).await;

        if self.fail {
            return Err(SubmissionError::Unavailable(
                "simulated backend is configured to fail".to_string(),
            ));
        }
        Ok(SubmissionReceipt::new())
    }
}
