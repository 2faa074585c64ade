//! Word domain model.
//!
//! # Responsibility
//! - Define the canonical vocabulary record persisted in the words blob.
//! - Provide lifecycle helpers for the learned/pool state machine.
//!
//! # Invariants
//! - `id` and `created_at` never change after creation.
//! - `is_learned == true` implies `in_notification_pool == false`.
//! - A word with both flags `false` is valid (removed from the pool without
//!   being mastered).
//! - `turkish` holds one or more senses joined by `\n`; never persisted empty.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identifier of a word record.
///
/// Serialized as a plain string to stay compatible with previously stored
/// collections.
pub type WordId = String;

/// Separator between target-language senses inside `Word::turkish`.
pub const MEANING_SEPARATOR: char = '\n';

/// Validation failures for word records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordValidationError {
    /// Source-language text is empty after trimming.
    EmptyEnglish,
    /// No non-empty target-language meaning was provided.
    EmptyMeaning,
    /// Record is marked learned while still in the notification pool.
    LearnedInPool(WordId),
}

impl Display for WordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyEnglish => write!(f, "english text cannot be empty"),
            Self::EmptyMeaning => write!(f, "at least one meaning is required"),
            Self::LearnedInPool(id) => {
                write!(f, "word {id} cannot be learned and in the notification pool")
            }
        }
    }
}

impl Error for WordValidationError {}

/// A single vocabulary entry.
///
/// Field names are serialized in camelCase; this shape is the durable
/// contract with data written by earlier releases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    pub id: WordId,
    pub english: String,
    /// Newline-joined ordered list of senses.
    pub turkish: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    pub is_learned: bool,
    pub in_notification_pool: bool,
}

impl Word {
    /// Creates a fresh word that starts in the notification pool.
    ///
    /// # Invariants
    /// - `is_learned` starts as `false`.
    /// - `in_notification_pool` starts as `true`.
    pub fn new(
        id: impl Into<WordId>,
        english: impl Into<String>,
        turkish: impl Into<String>,
        created_at: i64,
    ) -> Self {
        Self {
            id: id.into(),
            english: english.into(),
            turkish: turkish.into(),
            created_at,
            is_learned: false,
            in_notification_pool: true,
        }
    }

    /// Returns whether this word can be picked for a reminder.
    pub fn is_eligible(&self) -> bool {
        self.in_notification_pool && !self.is_learned
    }

    /// Returns the individual senses stored in `turkish`.
    pub fn meanings(&self) -> Vec<&str> {
        if self.turkish.is_empty() {
            return Vec::new();
        }
        self.turkish.split(MEANING_SEPARATOR).collect()
    }

    /// Marks the word mastered and drops it from the pool.
    pub fn mark_learned(&mut self) {
        self.is_learned = true;
        self.in_notification_pool = false;
    }

    /// Clears mastery and puts the word back into the pool.
    pub fn return_to_pool(&mut self) {
        self.is_learned = false;
        self.in_notification_pool = true;
    }

    /// Checks record-level invariants before persistence.
    pub fn validate(&self) -> Result<(), WordValidationError> {
        if self.english.trim().is_empty() {
            return Err(WordValidationError::EmptyEnglish);
        }
        if self.meanings().iter().all(|sense| sense.trim().is_empty()) {
            return Err(WordValidationError::EmptyMeaning);
        }
        if self.is_learned && self.in_notification_pool {
            return Err(WordValidationError::LearnedInPool(self.id.clone()));
        }
        Ok(())
    }
}

/// Joins user-entered senses into the persisted `turkish` encoding.
///
/// Every sense is trimmed; empty senses are dropped.
pub fn join_meanings<S: AsRef<str>>(meanings: &[S]) -> String {
    meanings
        .iter()
        .map(|sense| sense.as_ref().trim())
        .filter(|sense| !sense.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
