//! Notifier port - Interface for user-facing notifications.
//!
//! Delivery transport (mail, push, in-app) is an adapter concern; the
//! domain only names the recipient and the message.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, UserId};

/// A single user-facing message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub recipient: UserId,
    pub subject: String,
    pub body: String,
}

impl Notification {
    pub fn new(
        recipient: UserId,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            recipient,
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// Port for delivering notifications.
///
/// Callers treat delivery as fire-and-forget; retries happen on the
/// event channel that invokes the calling handler.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one notification.
    async fn notify(&self, notification: Notification) -> Result<(), DomainError>;
}
