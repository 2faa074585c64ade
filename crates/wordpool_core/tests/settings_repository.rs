mod common;

use common::Harness;
use std::sync::atomic::Ordering;
use wordpool_core::{NotificationSettings, RepoError, SETTINGS_STORAGE_KEY};

#[tokio::test]
async fn load_returns_defaults_when_nothing_is_stored() {
    let harness = Harness::at(10, 0);
    assert_eq!(
        harness.settings.load().await,
        NotificationSettings {
            start_hour: 9,
            end_hour: 21,
            enabled: true,
        }
    );
    assert!(harness.store.inner.raw(SETTINGS_STORAGE_KEY).is_none());
}

#[tokio::test]
async fn save_then_load_round_trips() {
    let harness = Harness::at(10, 0);
    let settings = NotificationSettings {
        start_hour: 7,
        end_hour: 22,
        enabled: false,
    };

    harness.settings.save(&settings).await.unwrap();
    assert_eq!(harness.settings.load().await, settings);
    assert_eq!(
        harness.store.inner.raw(SETTINGS_STORAGE_KEY).as_deref(),
        Some(r#"{"startHour":7,"endHour":22,"enabled":false}"#)
    );
}

#[tokio::test]
async fn save_stores_invalid_window_verbatim() {
    let harness = Harness::at(10, 0);
    let inverted = NotificationSettings {
        start_hour: 22,
        end_hour: 6,
        enabled: true,
    };

    harness.settings.save(&inverted).await.unwrap();
    assert_eq!(harness.settings.load().await, inverted);
}

#[tokio::test]
async fn corrupt_or_unreadable_blob_falls_back_to_defaults() {
    let harness = Harness::at(10, 0);
    harness
        .store
        .inner
        .insert_raw(SETTINGS_STORAGE_KEY, r#"{"startHour":"nine"}"#);
    assert_eq!(harness.settings.load().await, NotificationSettings::default());

    harness.store.fail_reads.store(true, Ordering::SeqCst);
    assert_eq!(harness.settings.load().await, NotificationSettings::default());
}

#[tokio::test]
async fn save_propagates_write_failure() {
    let harness = Harness::at(10, 0);
    harness.store.fail_writes.store(true, Ordering::SeqCst);

    let err = harness
        .settings
        .save(&NotificationSettings::default())
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Store(_)));
}
