//! Form rendering module
//!
//! - `field_renderer`: single field with its inline error
//! - `registration_form`: the student registration form

mod field_renderer;
mod registration_form;

pub use registration_form::draw_registration;
