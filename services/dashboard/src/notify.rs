//! services/dashboard/src/notify.rs
//!
//! User-visible notifications. Stores publish one notification per terminal
//! outcome the operator should see; any number of views can subscribe.

use tokio::sync::broadcast;
use tracing::debug;

const CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
}

#[derive(Clone)]
pub struct Notifier {
    sender: broadcast::Sender<Notification>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    pub fn notify(&self, message: impl Into<String>, severity: Severity) {
        let notification = Notification {
            message: message.into(),
            severity,
        };
        // No subscribers is fine: nobody is looking.
        if self.sender.send(notification).is_err() {
            debug!("Notification dropped, no subscribers");
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.notify(message, Severity::Success);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.notify(message, Severity::Error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_in_order() {
        let notifier = Notifier::new();
        let mut rx = notifier.subscribe();

        notifier.success("Product created successfully");
        notifier.error("Failed to delete product");

        let first = rx.recv().await.unwrap();
        assert_eq!(first.message, "Product created successfully");
        assert_eq!(first.severity, Severity::Success);
        let second = rx.recv().await.unwrap();
        assert_eq!(second.severity, Severity::Error);
    }

    #[test]
    fn sending_without_subscribers_is_harmless() {
        Notifier::new().notify("nobody listening", Severity::Info);
    }
}
