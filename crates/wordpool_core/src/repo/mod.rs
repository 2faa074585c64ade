//! Repositories over the key-value store.
//!
//! # Responsibility
//! - Own the encoding of the words and settings blobs.
//! - Implement the learned/pool state transitions as whole-collection
//!   read-modify-write cycles.
//!
//! # Invariants
//! - Unreadable or malformed blobs read as "no data"; they never fail a read.
//! - Write failures propagate to the caller unchanged.
//! - Two concurrent mutations race at collection granularity and the last
//!   writer wins; there is no locking layer.

pub mod settings_repo;
pub mod word_repo;

/// Storage key of the words blob.
pub const WORDS_STORAGE_KEY: &str = "word_learner_words";
/// Storage key of the notification settings blob.
pub const SETTINGS_STORAGE_KEY: &str = "word_learner_notification_settings";
