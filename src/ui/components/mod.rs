//! Reusable UI components

mod banner;
mod button;
mod toast;

pub use banner::render_error_banner;
pub use button::{render_button, BUTTON_HEIGHT};
pub use toast::render_toast;
