//! Core domain logic for the word learner.
//! This crate owns the word lifecycle invariants and the reminder schedule.

pub mod clock;
pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod random;
pub mod repo;
pub mod service;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::settings::{NotificationSettings, SettingsValidationError};
pub use model::word::{join_meanings, Word, WordId, WordValidationError};
pub use notify::{
    DeliveredReminder, NotificationPort, NotifyError, NotifyResult, ReminderContent,
    ReminderData, ReminderId, TokioNotifier,
};
pub use random::{RandomSource, StdRandom};
pub use repo::settings_repo::SettingsRepository;
pub use repo::word_repo::{RepoError, RepoResult, WordRepository};
pub use repo::{SETTINGS_STORAGE_KEY, WORDS_STORAGE_KEY};
pub use service::reminder_scheduler::{
    seconds_until_hour, ReminderScheduler, ScheduleReport, ScheduledReminder, SchedulerConfig,
};
pub use service::word_service::{PoolEvent, ServiceError, ServiceResult, WordService};
pub use store::{MemoryStore, PersistentStore, SqliteKvStore, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
