//! External collaborators of the registration form

mod catalog;
mod notify;
mod simulated;
mod traits;

pub use catalog::StaticCatalog;
pub use notify::{ChannelNotifier, Notification};
pub use simulated::SimulatedSubmitter;
pub use traits::{
    Course, CourseCatalog, NotificationSink, SubmissionError, SubmissionReceipt, SubmitFunction,
};

#[cfg(test)]
pub use traits::{MockCourseCatalog, MockNotificationSink, MockSubmitFunction};
