//! Notification sink that forwards to the UI over a channel

use super::traits::NotificationSink;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
}

/// Forwards notifications to whoever holds the receiving end
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl NotificationSink for ChannelNotifier {
    fn notify(&self, title: &str, description: &str) {
        let notification = Notification {
            title: title.to_string(),
            description: description.to_string(),
        };
        if self.tx.send(notification).is_err() {
            tracing::debug!(title, "notification dropped, no receiver");
        }
    }
}
