//! Recording notifier for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, UserId};
use crate::ports::{Notification, Notifier};

/// `Notifier` that records every message instead of delivering it.
#[derive(Debug, Clone)]
pub struct RecordingNotifier {
    sent: Arc<RwLock<Vec<Notification>>>,
}

impl RecordingNotifier {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self {
            sent: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Returns all recorded notifications.
    pub async fn sent(&self) -> Vec<Notification> {
        self.sent.read().await.clone()
    }

    /// Returns notifications addressed to one user.
    pub async fn sent_to(&self, recipient: &UserId) -> Vec<Notification> {
        self.sent
            .read()
            .await
            .iter()
            .filter(|n| &n.recipient == recipient)
            .cloned()
            .collect()
    }

    /// Returns the number of recorded notifications.
    pub async fn count(&self) -> usize {
        self.sent.read().await.len()
    }

    /// Clears recorded notifications (for test isolation).
    pub async fn clear(&self) {
        self.sent.write().await.clear();
    }
}

impl Default for RecordingNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, notification: Notification) -> Result<(), DomainError> {
        self.sent.write().await.push(notification);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_notifications_per_recipient() {
        let notifier = RecordingNotifier::new();
        let alice = UserId::new("alice").unwrap();
        let bob = UserId::new("bob").unwrap();

        notifier
            .notify(Notification::new(alice.clone(), "Hi", "First"))
            .await
            .unwrap();
        notifier
            .notify(Notification::new(bob.clone(), "Hi", "Second"))
            .await
            .unwrap();

        assert_eq!(notifier.count().await, 2);
        assert_eq!(notifier.sent_to(&alice).await.len(), 1);
        assert_eq!(notifier.sent_to(&bob).await[0].body, "Second");
    }
}
