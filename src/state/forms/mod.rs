//! Form domain layer
//!
//! Schema validation and the submission state machine for the registration
//! form. Rendering reads the controller's state and drives [`FormController`].

mod controller;
mod field;
mod form_state;
mod schema;

pub use controller::{FormController, SubmitOutcome};
pub use field::{FieldName, FieldValue};
pub use form_state::Phase;
pub use schema::{RegistrationRecord, RegistrationSchema};

#[cfg(test)]
pub use field::DraftRecord;
