//! Form controller
//!
//! Owns the [`FormState`] and sequences a submission through
//! idle → submitting → submitted → idle. The submit call and the reset delay
//! run as spawned tasks that only post [`ControllerEvent`]s back; every state
//! mutation happens on the owner's thread in [`FormController::handle_event`].

use super::field::{FieldName, FieldParseError, FieldValue};
use super::form_state::{FormState, Phase};
use super::schema::{RegistrationRecord, RegistrationSchema};
use crate::backend::{NotificationSink, SubmissionError, SubmissionReceipt, SubmitFunction};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

pub const SUCCESS_TITLE: &str = "Registration successful";

/// Completion events posted by background tasks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    SubmissionFinished {
        cycle: u64,
        result: Result<SubmissionReceipt, SubmissionError>,
    },
    ResetElapsed {
        cycle: u64,
    },
}

/// What a call to [`FormController::submit`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Draft was valid and the submit function was invoked
    Started,
    /// Draft failed validation; field errors were refreshed
    Invalid,
    /// A submission cycle is already running; nothing changed
    AlreadyInFlight,
}

pub struct FormController {
    state: FormState,
    schema: RegistrationSchema,
    submitter: Arc<dyn SubmitFunction>,
    notifier: Arc<dyn NotificationSink>,
    reset_delay: Duration,
    events_tx: UnboundedSender<ControllerEvent>,
    events_rx: UnboundedReceiver<ControllerEvent>,
    cycle: u64,
    in_flight: Option<RegistrationRecord>,
    reset_timer: Option<JoinHandle<()>>,
}

impl FormController {
    pub fn new(
        schema: RegistrationSchema,
        submitter: Arc<dyn SubmitFunction>,
        notifier: Arc<dyn NotificationSink>,
        reset_delay: Duration,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            state: FormState::new(),
            schema,
            submitter,
            notifier,
            reset_delay,
            events_tx,
            events_rx,
            cycle: 0,
            in_flight: None,
            reset_timer: None,
        }
    }

    /// Read-only view for rendering
    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// Update a single field. Validation runs at submit (or blur) time.
    pub fn set_field(&mut self, field: FieldName, value: FieldValue) {
        tracing::debug!(field = %field, "field updated");
        self.state.values.set(field, value);
        self.state.touched.insert(field);
    }

    /// Update a field addressed by its string name
    #[allow(dead_code)]
    pub fn set_field_by_name(
        &mut self,
        name: &str,
        value: FieldValue,
    ) -> Result<(), FieldParseError> {
        let field = name.parse()?;
        self.set_field(field, value);
        Ok(())
    }

    /// Revalidate a touched field when focus leaves it
    pub fn blur_field(&mut self, field: FieldName) {
        if !self.state.is_idle() || !self.state.is_touched(field) {
            return;
        }
        match self.schema.validate_field(&self.state.values, field) {
            Some(message) => self.state.errors.insert(field, message),
            None => self.state.errors.remove(field),
        }
    }

    /// Validate the draft and, when valid, start a submission
    pub fn submit(&mut self) -> SubmitOutcome {
        if !self.state.is_idle() {
            tracing::debug!(phase = ?self.state.phase, "submit ignored while in flight");
            return SubmitOutcome::AlreadyInFlight;
        }

        self.state.submission_error = None;

        let record = match self.schema.validate(&self.state.values) {
            Ok(record) => record,
            Err(errors) => {
                tracing::debug!(count = errors.len(), "registration failed validation");
                self.state.errors = errors;
                return SubmitOutcome::Invalid;
            }
        };

        self.state.errors.clear();
        self.state.phase = Phase::Submitting;
        self.cycle += 1;
        tracing::info!(
            cycle = self.cycle,
            course = record.course(),
            "submitting registration"
        );

        let cycle = self.cycle;
        let submitter = Arc::clone(&self.submitter);
        let tx = self.events_tx.clone();
        let payload = record.clone();
        self.in_flight = Some(record);
        tokio::spawn(async move {
            let result = submitter.submit(payload).await;
            // Receiver is gone if the controller was dropped mid-flight
            let _ = tx.send(ControllerEvent::SubmissionFinished { cycle, result });
        });

        SubmitOutcome::Started
    }

    /// Apply every event that is already queued without waiting
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    /// Wait for the next background event and apply it
    #[allow(dead_code)]
    pub async fn process_next(&mut self) -> Phase {
        if let Some(event) = self.events_rx.recv().await {
            self.handle_event(event);
        }
        self.state.phase
    }

    pub fn handle_event(&mut self, event: ControllerEvent) {
        match event {
            ControllerEvent::SubmissionFinished { cycle, result } => {
                if cycle != self.cycle || !self.state.is_submitting() {
                    tracing::debug!(cycle, "stale submission result dropped");
                    return;
                }
                self.finish_submission(result);
            }
            ControllerEvent::ResetElapsed { cycle } => {
                if cycle != self.cycle || self.state.phase != Phase::Submitted {
                    tracing::debug!(cycle, "stale reset dropped");
                    return;
                }
                self.reset_timer = None;
                self.state.reset();
                tracing::info!(cycle, "form reset");
            }
        }
    }

    fn finish_submission(&mut self, result: Result<SubmissionReceipt, SubmissionError>) {
        let record = self.in_flight.take();
        match result {
            Ok(receipt) => {
                self.state.phase = Phase::Submitted;
                tracing::info!(
                    cycle = self.cycle,
                    receipt = %receipt.id,
                    submitted_at = %receipt.submitted_at,
                    "registration submitted"
                );

                let description = match &record {
                    Some(r) => format!(
                        "Thanks {}, your registration has been received.",
                        r.name()
                    ),
                    None => "Your registration has been received.".to_string(),
                };
                self.notifier.notify(SUCCESS_TITLE, &description);
                self.schedule_reset();
            }
            Err(err) => {
                tracing::warn!(cycle = self.cycle, error = %err, "registration submission failed");
                self.state.phase = Phase::Idle;
                self.state.submission_error = Some(err.to_string());
            }
        }
    }

    fn schedule_reset(&mut self) {
        self.cancel_reset();
        let cycle = self.cycle;
        let delay = self.reset_delay;
        let tx = self.events_tx.clone();
        self.reset_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(ControllerEvent::ResetElapsed { cycle });
        }));
    }

    fn cancel_reset(&mut self) {
        if let Some(timer) = self.reset_timer.take() {
            timer.abort();
        }
    }

    #[cfg(test)]
    fn reset_abort_handle(&self) -> Option<tokio::task::AbortHandle> {
        self.reset_timer.as_ref().map(JoinHandle::abort_handle)
    }
}

impl Drop for FormController {
    fn drop(&mut self) {
        self.cancel_reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{
        Course, MockNotificationSink, MockSubmitFunction, SimulatedSubmitter,
    };
    use crate::state::forms::field::DraftRecord;

    const RESET_DELAY: Duration = Duration::from_millis(3000);

    fn schema() -> RegistrationSchema {
        RegistrationSchema::new(&[
            Course::new("math", "Mathematics"),
            Course::new("cs", "Computer Science"),
        ])
    }

    fn quiet_notifier() -> Arc<dyn NotificationSink> {
        let mut notifier = MockNotificationSink::new();
        notifier.expect_notify().return_const(());
        Arc::new(notifier)
    }

    fn controller_with(
        submitter: impl SubmitFunction + 'static,
        notifier: Arc<dyn NotificationSink>,
    ) -> FormController {
        FormController::new(schema(), Arc::new(submitter), notifier, RESET_DELAY)
    }

    fn fill_valid(controller: &mut FormController) {
        controller.set_field(FieldName::Name, "Al".into());
        controller.set_field(FieldName::Email, "al@x.com".into());
        controller.set_field(FieldName::Age, FieldValue::Number(16));
        controller.set_field(FieldName::Course, "math".into());
    }

    fn fill_invalid(controller: &mut FormController) {
        controller.set_field(FieldName::Name, "A".into());
        controller.set_field(FieldName::Email, "bad".into());
        controller.set_field(FieldName::Age, FieldValue::Number(10));
        controller.set_field(FieldName::Course, "".into());
    }

    mod set_field {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_updates_value_and_touched_without_validating() {
            let mut controller = controller_with(MockSubmitFunction::new(), quiet_notifier());
            controller.set_field(FieldName::Email, "bad".into());
            assert_eq!(controller.state().values.email, FieldValue::from("bad"));
            assert!(controller.state().is_touched(FieldName::Email));
            assert!(controller.state().errors.is_empty());
        }

        #[tokio::test]
        async fn test_by_name() {
            let mut controller = controller_with(MockSubmitFunction::new(), quiet_notifier());
            controller
                .set_field_by_name("course", "cs".into())
                .unwrap();
            assert_eq!(controller.state().values.course, FieldValue::from("cs"));
            assert!(controller
                .set_field_by_name("phone", "555".into())
                .is_err());
        }
    }

    mod blur {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_untouched_field_is_not_validated() {
            let mut controller = controller_with(MockSubmitFunction::new(), quiet_notifier());
            controller.blur_field(FieldName::Name);
            assert!(controller.state().errors.is_empty());
        }

        #[tokio::test]
        async fn test_touched_field_error_set_and_cleared() {
            let mut controller = controller_with(MockSubmitFunction::new(), quiet_notifier());
            controller.set_field(FieldName::Name, "A".into());
            controller.blur_field(FieldName::Name);
            assert_eq!(
                controller.state().error_for(FieldName::Name),
                Some("Name must be at least 2 characters")
            );
            assert_eq!(controller.state().errors.len(), 1);

            controller.set_field(FieldName::Name, "Ada".into());
            controller.blur_field(FieldName::Name);
            assert!(controller.state().errors.is_empty());
        }
    }

    mod submit {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_invalid_submit_sets_all_errors_and_stays_idle() {
            let mut submitter = MockSubmitFunction::new();
            submitter.expect_submit().never();
            let mut controller = controller_with(submitter, quiet_notifier());
            fill_invalid(&mut controller);

            assert_eq!(controller.submit(), SubmitOutcome::Invalid);
            assert_eq!(controller.phase(), Phase::Idle);
            assert_eq!(controller.state().errors.len(), 4);
        }

        #[tokio::test]
        async fn test_invalid_submit_is_idempotent() {
            let mut submitter = MockSubmitFunction::new();
            submitter.expect_submit().never();
            let mut controller = controller_with(submitter, quiet_notifier());
            fill_invalid(&mut controller);

            controller.submit();
            let first = controller.state().errors.clone();
            controller.submit();
            assert_eq!(controller.state().errors, first);
            assert_eq!(controller.phase(), Phase::Idle);
        }

        #[tokio::test]
        async fn test_valid_submit_clears_errors_and_starts() {
            let mut submitter = MockSubmitFunction::new();
            submitter
                .expect_submit()
                .times(1)
                .returning(|_| Ok(SubmissionReceipt::new()));
            let mut controller = controller_with(submitter, quiet_notifier());
            fill_invalid(&mut controller);
            controller.submit();
            fill_valid(&mut controller);

            assert_eq!(controller.submit(), SubmitOutcome::Started);
            assert_eq!(controller.phase(), Phase::Submitting);
            assert!(controller.state().errors.is_empty());

            controller.process_next().await;
        }

        #[tokio::test]
        async fn test_submit_while_submitting_has_no_effect() {
            let mut submitter = MockSubmitFunction::new();
            submitter
                .expect_submit()
                .times(1)
                .returning(|_| Ok(SubmissionReceipt::new()));
            let mut controller = controller_with(submitter, quiet_notifier());
            fill_valid(&mut controller);
            controller.submit();
            let before = controller.state().clone();

            assert_eq!(controller.submit(), SubmitOutcome::AlreadyInFlight);
            assert_eq!(controller.state(), &before);

            // Let the single spawned call finish so the mock sees exactly one call
            assert_eq!(controller.process_next().await, Phase::Submitted);
        }

        #[tokio::test]
        async fn test_submit_passes_validated_record() {
            let mut submitter = MockSubmitFunction::new();
            submitter
                .expect_submit()
                .withf(|record| {
                    record.name() == "Al"
                        && record.email() == "al@x.com"
                        && record.age() == 16
                        && record.course() == "math"
                })
                .times(1)
                .returning(|_| Ok(SubmissionReceipt::new()));
            let mut controller = controller_with(submitter, quiet_notifier());
            fill_valid(&mut controller);
            controller.submit();
            controller.process_next().await;
        }
    }

    mod lifecycle {
        use super::*;
        use pretty_assertions::assert_eq;
        use std::sync::atomic::{AtomicUsize, Ordering};

        #[tokio::test(start_paused = true)]
        async fn test_full_cycle_notifies_once_and_resets() {
            let mut notifier = MockNotificationSink::new();
            notifier
                .expect_notify()
                .withf(|title, _| title.to_string() == SUCCESS_TITLE)
                .times(1)
                .return_const(());
            let submitter = SimulatedSubmitter::new(Duration::from_millis(1500));
            let mut controller = controller_with(submitter, Arc::new(notifier));
            fill_valid(&mut controller);

            assert_eq!(controller.submit(), SubmitOutcome::Started);
            assert_eq!(controller.phase(), Phase::Submitting);

            assert_eq!(controller.process_next().await, Phase::Submitted);
            assert_eq!(controller.submit(), SubmitOutcome::AlreadyInFlight);

            assert_eq!(controller.process_next().await, Phase::Idle);
            assert_eq!(controller.state().values, DraftRecord::default());
            assert_eq!(controller.state(), &FormState::default());
        }

        #[tokio::test(start_paused = true)]
        async fn test_reset_waits_for_delay() {
            let submitter = SimulatedSubmitter::new(Duration::from_millis(10));
            let mut controller = controller_with(submitter, quiet_notifier());
            fill_valid(&mut controller);
            controller.submit();
            controller.process_next().await;
            assert_eq!(controller.phase(), Phase::Submitted);

            tokio::time::advance(RESET_DELAY - Duration::from_millis(1)).await;
            controller.pump();
            assert_eq!(controller.phase(), Phase::Submitted);

            tokio::time::advance(Duration::from_millis(1)).await;
            assert_eq!(controller.process_next().await, Phase::Idle);
        }

        #[tokio::test(start_paused = true)]
        async fn test_drop_cancels_pending_reset() {
            let submitter = SimulatedSubmitter::new(Duration::from_millis(10));
            let mut controller = controller_with(submitter, quiet_notifier());
            fill_valid(&mut controller);
            controller.submit();
            controller.process_next().await;

            let timer = controller.reset_abort_handle().unwrap();
            assert!(!timer.is_finished());

            drop(controller);
            tokio::task::yield_now().await;
            assert!(timer.is_finished());
        }

        /// Counts submissions that ran to completion
        struct CountingSubmitter {
            completed: Arc<AtomicUsize>,
        }

        #[async_trait::async_trait]
        impl SubmitFunction for CountingSubmitter {
            async fn submit(
                &self,
                _record: RegistrationRecord,
            ) -> Result<SubmissionReceipt, SubmissionError> {
                tokio::time::sleep(Duration::from_millis(5)).await;
                self.completed.fetch_add(1, Ordering::SeqCst);
                Ok(SubmissionReceipt::new())
            }
        }

        #[tokio::test(start_paused = true)]
        async fn test_drop_mid_submission_is_safe() {
            let completed = Arc::new(AtomicUsize::new(0));
            let submitter = CountingSubmitter {
                completed: Arc::clone(&completed),
            };
            let mut notifier = MockNotificationSink::new();
            notifier.expect_notify().never();
            let mut controller = controller_with(submitter, Arc::new(notifier));
            fill_valid(&mut controller);
            assert_eq!(controller.submit(), SubmitOutcome::Started);
            drop(controller);

            // The in-flight call still finishes; its result has nowhere to go
            tokio::time::sleep(Duration::from_millis(20)).await;
            assert_eq!(completed.load(Ordering::SeqCst), 1);
        }
    }

    // Submit function failure was never handled before; it now returns the
    // form to idle with a submission-level error and no notification.
    mod submission_failure {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_failure_returns_to_idle_with_banner_error() {
            let mut submitter = MockSubmitFunction::new();
            submitter
                .expect_submit()
                .times(1)
                .returning(|_| Err(SubmissionError::Unavailable("timeout".to_string())));
            let mut notifier = MockNotificationSink::new();
            notifier.expect_notify().never();
            let mut controller = controller_with(submitter, Arc::new(notifier));
            fill_valid(&mut controller);

            controller.submit();
            assert_eq!(controller.process_next().await, Phase::Idle);

            let state = controller.state();
            assert_eq!(
                state.submission_error.as_deref(),
                Some("registration service unavailable: timeout")
            );
            assert!(state.errors.is_empty());
            assert_eq!(state.values.name, FieldValue::from("Al"));
            assert!(controller.reset_abort_handle().is_none());
        }

        #[tokio::test]
        async fn test_retry_clears_submission_error() {
            let mut submitter = MockSubmitFunction::new();
            let mut seq = mockall::Sequence::new();
            submitter
                .expect_submit()
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| Err(SubmissionError::Rejected("duplicate".to_string())));
            submitter
                .expect_submit()
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| Ok(SubmissionReceipt::new()));
            let mut controller = controller_with(submitter, quiet_notifier());
            fill_valid(&mut controller);

            controller.submit();
            controller.process_next().await;
            assert!(controller.state().submission_error.is_some());

            assert_eq!(controller.submit(), SubmitOutcome::Started);
            assert!(controller.state().submission_error.is_none());
            assert_eq!(controller.process_next().await, Phase::Submitted);
        }
    }

    mod events {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_stale_events_are_ignored() {
            let mut controller = controller_with(MockSubmitFunction::new(), quiet_notifier());
            controller.handle_event(ControllerEvent::SubmissionFinished {
                cycle: 7,
                result: Ok(SubmissionReceipt::new()),
            });
            controller.handle_event(ControllerEvent::ResetElapsed { cycle: 0 });
            assert_eq!(controller.state(), &FormState::default());
        }

        #[tokio::test]
        async fn test_pump_without_events_is_noop() {
            let mut controller = controller_with(MockSubmitFunction::new(), quiet_notifier());
            assert_eq!(controller.pump(), 0);
        }
    }
}
