//! Reminder scheduling engine.
//!
//! # Responsibility
//! - Turn the reminder window and the eligible pool into one-shot reminders
//!   registered with a `NotificationPort`.
//! - Provide the permission probe and the five-second test reminder.
//!
//! # Invariants
//! - Never mutates word or settings state.
//! - `schedule_for_today` always starts with exactly one `cancel_all`.
//! - Only window hours strictly after the current hour are considered.
//! - An empty pool skips the slot; it is not an error.
//! - Port failures are logged and never retried.

use crate::clock::Clock;
use crate::model::word::{Word, WordId};
use crate::notify::{NotificationPort, NotifyError, ReminderContent, ReminderData, ReminderId};
use crate::random::RandomSource;
use crate::repo::settings_repo::SettingsRepository;
use crate::repo::word_repo::WordRepository;
use chrono::{Duration, Timelike};
use log::{debug, error, info, warn};
use std::sync::{Arc, Mutex};

/// Tunables of the scheduler.
///
/// Templates substitute `{english}` and `{turkish}` with the word fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    pub test_delay_seconds: u64,
    pub title_template: String,
    pub body_template: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            test_delay_seconds: 5,
            title_template: "Kelime Hatırlatması: {english}".to_string(),
            body_template: "Anlamı: {turkish}".to_string(),
        }
    }
}

/// One reminder registered by `schedule_for_today`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledReminder {
    pub hour: i64,
    pub word_id: WordId,
    pub delay_seconds: u64,
    pub reminder_id: ReminderId,
}

/// Outcome of one `schedule_for_today` run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleReport {
    /// `false` when clearing previous reminders failed and the run stopped.
    pub cancelled: bool,
    pub enabled: bool,
    /// Window hours later than the current hour, in ascending order.
    pub considered_hours: Vec<i64>,
    pub scheduled: Vec<ScheduledReminder>,
    /// Hours skipped because the pool was empty.
    pub skipped_hours: Vec<i64>,
    /// Hours whose registration was rejected by the port.
    pub failed_hours: Vec<i64>,
}

enum SlotOutcome {
    Scheduled(ScheduledReminder),
    EmptyPool,
    Failed,
}

pub struct ReminderScheduler {
    words: WordRepository,
    settings: SettingsRepository,
    notifier: Arc<dyn NotificationPort>,
    clock: Arc<dyn Clock>,
    random: Mutex<Box<dyn RandomSource>>,
    config: SchedulerConfig,
}

impl ReminderScheduler {
    pub fn new(
        words: WordRepository,
        settings: SettingsRepository,
        notifier: Arc<dyn NotificationPort>,
        clock: Arc<dyn Clock>,
        random: Box<dyn RandomSource>,
    ) -> Self {
        Self {
            words,
            settings,
            notifier,
            clock,
            random: Mutex::new(random),
            config: SchedulerConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SchedulerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Asks the platform for permission. Failures read as "not granted".
    pub async fn request_permission(&self) -> bool {
        match self.notifier.request_permission().await {
            Ok(granted) => {
                info!("event=notify_permission module=scheduler status=ok granted={granted}");
                granted
            }
            Err(err) => {
                error!("event=notify_permission module=scheduler status=error error={err}");
                false
            }
        }
    }

    /// Clears every pending reminder.
    pub async fn cancel_all(&self) -> Result<(), NotifyError> {
        self.notifier.cancel_all().await.map_err(|err| {
            error!("event=notify_cancel_all module=scheduler status=error error={err}");
            err
        })
    }

    /// Rebuilds the reminder set for the rest of today's window.
    ///
    /// Clears all pending reminders first, then registers one reminder per
    /// window hour after the current hour, each with a freshly drawn word.
    pub async fn schedule_for_today(&self) -> ScheduleReport {
        let mut report = ScheduleReport::default();
        if self.cancel_all().await.is_err() {
            return report;
        }
        report.cancelled = true;

        let settings = self.settings.load().await;
        report.enabled = settings.enabled;
        if !settings.enabled {
            info!("event=schedule_today module=scheduler status=skip reason=disabled");
            return report;
        }

        let current_hour = i64::from(self.clock.now().hour());
        report.considered_hours = settings
            .window_hours()
            .filter(|hour| *hour > current_hour)
            .collect();

        for hour in report.considered_hours.clone() {
            match self.schedule_slot(hour).await {
                SlotOutcome::Scheduled(reminder) => report.scheduled.push(reminder),
                SlotOutcome::EmptyPool => report.skipped_hours.push(hour),
                SlotOutcome::Failed => report.failed_hours.push(hour),
            }
        }

        info!(
            "event=schedule_today module=scheduler status=ok current_hour={} considered={} scheduled={} skipped={} failed={}",
            current_hour,
            report.considered_hours.len(),
            report.scheduled.len(),
            report.skipped_hours.len(),
            report.failed_hours.len()
        );
        report
    }

    /// Registers one reminder at `hour:00` (today, or tomorrow once passed).
    ///
    /// Returns `None` when the pool is empty or registration failed.
    pub async fn schedule_for_hour(&self, hour: i64) -> Option<ReminderId> {
        match self.schedule_slot(hour).await {
            SlotOutcome::Scheduled(reminder) => Some(reminder.reminder_id),
            SlotOutcome::EmptyPool | SlotOutcome::Failed => None,
        }
    }

    /// Registers a reminder a few seconds from now, outside the window logic.
    ///
    /// Returns `None` when the pool is empty or registration failed.
    pub async fn schedule_test_reminder(&self) -> Option<ReminderId> {
        let Some(word) = self.pick_word().await else {
            info!("event=schedule_test module=scheduler status=skip reason=empty_pool");
            return None;
        };

        let delay = self.config.test_delay_seconds;
        self.register(delay, &word, "schedule_test").await
    }

    /// Builds the payload shown for `word`.
    pub fn reminder_content(&self, word: &Word) -> ReminderContent {
        ReminderContent {
            title: render_template(&self.config.title_template, word),
            body: render_template(&self.config.body_template, word),
            data: ReminderData {
                word_id: word.id.clone(),
            },
        }
    }

    async fn schedule_slot(&self, hour: i64) -> SlotOutcome {
        let Some(word) = self.pick_word().await else {
            debug!("event=schedule_hour module=scheduler status=skip reason=empty_pool hour={hour}");
            return SlotOutcome::EmptyPool;
        };

        let Some(delay_seconds) = seconds_until_hour(self.clock.as_ref(), hour) else {
            warn!("event=schedule_hour module=scheduler status=error reason=invalid_hour hour={hour}");
            return SlotOutcome::Failed;
        };

        match self.register(delay_seconds, &word, "schedule_hour").await {
            Some(reminder_id) => SlotOutcome::Scheduled(ScheduledReminder {
                hour,
                word_id: word.id,
                delay_seconds,
                reminder_id,
            }),
            None => SlotOutcome::Failed,
        }
    }

    async fn register(&self, delay_seconds: u64, word: &Word, event: &str) -> Option<ReminderId> {
        let content = self.reminder_content(word);
        match self
            .notifier
            .schedule_once_after(delay_seconds, content)
            .await
        {
            Ok(reminder_id) => {
                debug!("event={event} module=scheduler status=ok delay_seconds={delay_seconds}");
                Some(reminder_id)
            }
            Err(NotifyError::PermissionDenied) => {
                warn!("event={event} module=scheduler status=error reason=permission_denied");
                None
            }
            Err(err) => {
                error!("event={event} module=scheduler status=error error={err}");
                None
            }
        }
    }

    /// Draws a word uniformly from the current eligible pool.
    async fn pick_word(&self) -> Option<Word> {
        let mut pool = self.words.eligible().await;
        if pool.is_empty() {
            return None;
        }

        let index = match self.random.lock() {
            Ok(mut random) => random.pick_index(pool.len()),
            Err(_) => {
                warn!("event=pick_word module=scheduler status=error reason=random_lock_poisoned");
                0
            }
        };
        Some(pool.swap_remove(index.min(pool.len() - 1)))
    }
}

/// Whole seconds from the clock's current time until the next `hour:00:00`
/// on its local wall clock.
///
/// Targets today when that moment is still ahead, otherwise tomorrow. Both
/// dates are resolved through `Clock::resolve_local`, so a daylight-saving
/// change between now and the target shifts the delay, not the hour.
/// Returns `None` for hours outside `0..=23`.
pub fn seconds_until_hour(clock: &dyn Clock, hour: i64) -> Option<u64> {
    let now = clock.now();
    let hour = u32::try_from(hour).ok()?;
    let today = now.date_naive().and_hms_opt(hour, 0, 0)?;
    let mut target = clock.resolve_local(today)?;
    if target <= now {
        let tomorrow = today.checked_add_signed(Duration::days(1))?;
        target = clock.resolve_local(tomorrow)?;
    }
    u64::try_from((target - now).num_seconds()).ok()
}

/// Substitutes `{english}` and `{turkish}` in a single left-to-right pass.
///
/// Substituted text is never rescanned, so a word whose text contains a
/// placeholder is rendered verbatim; chained `str::replace` calls would
/// expand it.
fn render_template(template: &str, word: &Word) -> String {
    let mut rendered = String::with_capacity(template.len() + word.english.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        rendered.push_str(&rest[..start]);
        let tail = &rest[start..];
        if let Some(after) = tail.strip_prefix("{english}") {
            rendered.push_str(&word.english);
            rest = after;
        } else if let Some(after) = tail.strip_prefix("{turkish}") {
            rendered.push_str(&word.turkish);
            rest = after;
        } else {
            rendered.push('{');
            rest = &tail[1..];
        }
    }
    rendered.push_str(rest);
    rendered
}
