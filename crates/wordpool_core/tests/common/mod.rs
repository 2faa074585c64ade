#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use wordpool_core::clock::resolve_in;
use wordpool_core::{
    Clock, FixedClock, MemoryStore, NotificationPort, NotifyError, NotifyResult, PersistentStore,
    RandomSource, ReminderContent, ReminderId, ReminderScheduler, SchedulerConfig,
    SettingsRepository, StoreError, StoreResult, WordRepository,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortCall {
    RequestPermission,
    CancelAll,
    Schedule {
        delay_seconds: u64,
        content: ReminderContent,
    },
}

/// Notification port that records every call.
#[derive(Default)]
pub struct RecordingNotifier {
    calls: Mutex<Vec<PortCall>>,
    pub deny_permission: AtomicBool,
    pub fail_cancel: AtomicBool,
}

impl RecordingNotifier {
    pub fn calls(&self) -> Vec<PortCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn cancel_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, PortCall::CancelAll))
            .count()
    }

    pub fn scheduled(&self) -> Vec<(u64, ReminderContent)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                PortCall::Schedule {
                    delay_seconds,
                    content,
                } => Some((delay_seconds, content)),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }
}

#[async_trait]
impl NotificationPort for RecordingNotifier {
    async fn request_permission(&self) -> NotifyResult<bool> {
        self.calls.lock().unwrap().push(PortCall::RequestPermission);
        Ok(!self.deny_permission.load(Ordering::SeqCst))
    }

    async fn cancel_all(&self) -> NotifyResult<()> {
        self.calls.lock().unwrap().push(PortCall::CancelAll);
        if self.fail_cancel.load(Ordering::SeqCst) {
            return Err(NotifyError::Backend("cancel failed".to_string()));
        }
        Ok(())
    }

    async fn schedule_once_after(
        &self,
        delay_seconds: u64,
        content: ReminderContent,
    ) -> NotifyResult<ReminderId> {
        if self.deny_permission.load(Ordering::SeqCst) {
            return Err(NotifyError::PermissionDenied);
        }
        let mut calls = self.calls.lock().unwrap();
        calls.push(PortCall::Schedule {
            delay_seconds,
            content,
        });
        Ok(format!("reminder-{}", calls.len()))
    }
}

/// Memory store whose reads and writes can be switched to fail.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
}

#[async_trait]
impl PersistentStore for FlakyStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("read failed".to_string()));
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("write failed".to_string()));
        }
        self.inner.set(key, value).await
    }
}

/// Replays a fixed list of indexes, wrapping around.
pub struct ScriptedRandom {
    picks: Vec<usize>,
    next: usize,
}

impl ScriptedRandom {
    pub fn new(picks: Vec<usize>) -> Self {
        Self { picks, next: 0 }
    }
}

impl RandomSource for ScriptedRandom {
    fn pick_index(&mut self, len: usize) -> usize {
        let pick = self.picks[self.next % self.picks.len()];
        self.next += 1;
        pick % len
    }
}

pub fn local_time(hour: u32, minute: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2024, 5, 1, hour, minute, 0)
        .unwrap()
}

/// New York wall clock on 2024-03-10, when 02:00 EST jumps to 03:00 EDT.
pub struct SpringForwardClock {
    pub now: DateTime<FixedOffset>,
}

impl SpringForwardClock {
    pub fn at(hour: u32, minute: u32) -> Self {
        let local = NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap();
        let now = Self::default().resolve_local(local).unwrap();
        Self { now }
    }
}

impl Default for SpringForwardClock {
    fn default() -> Self {
        Self {
            now: FixedOffset::west_opt(5 * 3600)
                .unwrap()
                .with_ymd_and_hms(2024, 3, 10, 0, 0, 0)
                .unwrap(),
        }
    }
}

impl Clock for SpringForwardClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.now
    }

    fn resolve_local(&self, local: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
        let transition = NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(2, 0, 0)
            .unwrap();
        if local < transition {
            resolve_in(&FixedOffset::west_opt(5 * 3600).unwrap(), local)
        } else if local < transition + Duration::hours(1) {
            resolve_in(&FixedOffset::west_opt(4 * 3600).unwrap(), local + Duration::hours(1))
        } else {
            resolve_in(&FixedOffset::west_opt(4 * 3600).unwrap(), local)
        }
    }
}

pub struct Harness {
    pub now: DateTime<FixedOffset>,
    pub store: Arc<FlakyStore>,
    pub words: WordRepository,
    pub settings: SettingsRepository,
    pub notifier: Arc<RecordingNotifier>,
    pub scheduler: Arc<ReminderScheduler>,
}

impl Harness {
    pub fn at(hour: u32, minute: u32) -> Self {
        Self::with_random(hour, minute, Box::new(ScriptedRandom::new(vec![0])))
    }

    pub fn with_random(hour: u32, minute: u32, random: Box<dyn RandomSource>) -> Self {
        let store = Arc::new(FlakyStore::default());
        let now = local_time(hour, minute);
        let clock = Arc::new(FixedClock(now));
        let words = WordRepository::new(store.clone(), clock.clone());
        let settings = SettingsRepository::new(store.clone());
        let notifier = Arc::new(RecordingNotifier::default());
        let scheduler = Arc::new(ReminderScheduler::new(
            words.clone(),
            settings.clone(),
            notifier.clone(),
            clock,
            random,
        ));
        Self {
            now,
            store,
            words,
            settings,
            notifier,
            scheduler,
        }
    }

    /// Second scheduler over the same state, with custom tunables.
    pub fn scheduler_with(&self, config: SchedulerConfig) -> ReminderScheduler {
        self.scheduler_with_clock(Arc::new(FixedClock(self.now)))
            .with_config(config)
    }

    /// Second scheduler over the same state, reading time from `clock`.
    pub fn scheduler_with_clock(&self, clock: Arc<dyn Clock>) -> ReminderScheduler {
        ReminderScheduler::new(
            self.words.clone(),
            self.settings.clone(),
            self.notifier.clone(),
            clock,
            Box::new(ScriptedRandom::new(vec![0])),
        )
    }

    pub fn seed_raw_words(&self, json: &str) {
        self.store
            .inner
            .insert_raw(wordpool_core::WORDS_STORAGE_KEY, json);
    }
}
