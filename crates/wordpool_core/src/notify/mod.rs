//! Local notification port.
//!
//! # Responsibility
//! - Define the capability the scheduler uses to register one-shot reminders.
//! - Define the reminder payload delivered to the platform.
//!
//! # Invariants
//! - Reminders are fire-and-forget; the only cancellation is `cancel_all`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

mod tokio_notifier;

pub use tokio_notifier::{DeliveredReminder, TokioNotifier};

/// Platform-assigned identifier of a scheduled reminder.
pub type ReminderId = String;

pub type NotifyResult<T> = Result<T, NotifyError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    /// The user has not granted notification permission.
    PermissionDenied,
    /// Platform-specific failure with a diagnostic message.
    Backend(String),
}

impl Display for NotifyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PermissionDenied => write!(f, "notification permission not granted"),
            Self::Backend(message) => write!(f, "notification backend failure: {message}"),
        }
    }
}

impl Error for NotifyError {}

/// Extra data attached to a reminder so a tap can open the word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderData {
    pub word_id: String,
}

/// What the user sees when a reminder fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderContent {
    pub title: String,
    pub body: String,
    pub data: ReminderData,
}

/// Capability to request permission and register or clear timed alerts.
#[async_trait]
pub trait NotificationPort: Send + Sync {
    /// Asks the platform for permission; returns whether it was granted.
    async fn request_permission(&self) -> NotifyResult<bool>;

    /// Clears every pending reminder.
    async fn cancel_all(&self) -> NotifyResult<()>;

    /// Registers one reminder that fires `delay_seconds` from now.
    async fn schedule_once_after(
        &self,
        delay_seconds: u64,
        content: ReminderContent,
    ) -> NotifyResult<ReminderId>;
}
