//! In-process notification adapter driven by tokio timers.
//!
//! Each reminder is one spawned task that sleeps for its delay and then
//! hands the content to the delivery channel. Must be used from inside a
//! tokio runtime.

use super::{NotificationPort, NotifyError, NotifyResult, ReminderContent, ReminderId};
use async_trait::async_trait;
use log::{debug, info};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// A reminder whose timer elapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveredReminder {
    pub id: ReminderId,
    pub content: ReminderContent,
}

pub struct TokioNotifier {
    permission_granted: AtomicBool,
    deliveries: mpsc::UnboundedSender<DeliveredReminder>,
    pending: Mutex<HashMap<ReminderId, JoinHandle<()>>>,
}

impl TokioNotifier {
    /// Creates the adapter and the receiving end of its delivery channel.
    pub fn new(permission_granted: bool) -> (Self, mpsc::UnboundedReceiver<DeliveredReminder>) {
        let (deliveries, receiver) = mpsc::unbounded_channel();
        let notifier = Self {
            permission_granted: AtomicBool::new(permission_granted),
            deliveries,
            pending: Mutex::new(HashMap::new()),
        };
        (notifier, receiver)
    }

    /// Simulates the user changing the permission in system settings.
    pub fn set_permission(&self, granted: bool) {
        self.permission_granted.store(granted, Ordering::SeqCst);
    }

    /// Number of timers that have not fired yet.
    pub fn pending_count(&self) -> usize {
        self.pending.lock().map_or(0, |pending| {
            pending
                .values()
                .filter(|handle| !handle.is_finished())
                .count()
        })
    }
}

#[async_trait]
impl NotificationPort for TokioNotifier {
    async fn request_permission(&self) -> NotifyResult<bool> {
        Ok(self.permission_granted.load(Ordering::SeqCst))
    }

    async fn cancel_all(&self) -> NotifyResult<()> {
        let mut pending = self
            .pending
            .lock()
            .map_err(|_| NotifyError::Backend("pending timers lock poisoned".to_string()))?;
        let cancelled = pending.len();
        for (_, handle) in pending.drain() {
            handle.abort();
        }
        debug!("event=notify_cancel_all module=notify status=ok cancelled={cancelled}");
        Ok(())
    }

    async fn schedule_once_after(
        &self,
        delay_seconds: u64,
        content: ReminderContent,
    ) -> NotifyResult<ReminderId> {
        if !self.permission_granted.load(Ordering::SeqCst) {
            return Err(NotifyError::PermissionDenied);
        }

        let id = Uuid::new_v4().to_string();
        let deliveries = self.deliveries.clone();
        let delivered = DeliveredReminder {
            id: id.clone(),
            content,
        };
        let handle = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(delay_seconds)).await;
            // Receiver gone means nobody is listening anymore.
            let _ = deliveries.send(delivered);
        });

        let mut pending = self
            .pending
            .lock()
            .map_err(|_| NotifyError::Backend("pending timers lock poisoned".to_string()))?;
        pending.retain(|_, handle| !handle.is_finished());
        pending.insert(id.clone(), handle);
        info!("event=notify_schedule module=notify status=ok delay_seconds={delay_seconds}");
        Ok(id)
    }
}
