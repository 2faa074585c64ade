//! Domain model for the word learner.
//!
//! # Responsibility
//! - Define the persisted record shapes (`Word`, `NotificationSettings`).
//! - Keep lifecycle transitions next to the data they guard.
//!
//! # Invariants
//! - Every word is identified by a stable `WordId`.
//! - A learned word is never part of the notification pool.

pub mod settings;
pub mod word;
