use std::time::Duration;
use wordpool_core::{NotificationPort, NotifyError, ReminderContent, ReminderData, TokioNotifier};

fn content(word_id: &str) -> ReminderContent {
    ReminderContent {
        title: format!("title {word_id}"),
        body: format!("body {word_id}"),
        data: ReminderData {
            word_id: word_id.to_string(),
        },
    }
}

#[tokio::test(start_paused = true)]
async fn reminder_is_delivered_after_its_delay() {
    let (notifier, mut deliveries) = TokioNotifier::new(true);

    let id = notifier.schedule_once_after(5, content("1")).await.unwrap();
    assert_eq!(notifier.pending_count(), 1);

    tokio::time::sleep(Duration::from_secs(4)).await;
    assert!(deliveries.try_recv().is_err());

    let delivered = deliveries.recv().await.unwrap();
    assert_eq!(delivered.id, id);
    assert_eq!(delivered.content.data.word_id, "1");
}

#[tokio::test(start_paused = true)]
async fn cancel_all_drops_pending_reminders() {
    let (notifier, mut deliveries) = TokioNotifier::new(true);
    notifier.schedule_once_after(60, content("1")).await.unwrap();
    notifier.schedule_once_after(120, content("2")).await.unwrap();

    notifier.cancel_all().await.unwrap();
    assert_eq!(notifier.pending_count(), 0);

    tokio::time::sleep(Duration::from_secs(300)).await;
    assert!(deliveries.try_recv().is_err());
}

#[tokio::test]
async fn scheduling_without_permission_is_rejected() {
    let (notifier, _deliveries) = TokioNotifier::new(false);
    assert!(!notifier.request_permission().await.unwrap());
    assert_eq!(
        notifier.schedule_once_after(5, content("1")).await,
        Err(NotifyError::PermissionDenied)
    );

    notifier.set_permission(true);
    assert!(notifier.request_permission().await.unwrap());
    assert!(notifier.schedule_once_after(5, content("1")).await.is_ok());
}
