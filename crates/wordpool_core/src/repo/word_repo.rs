//! Word repository over the words blob.
//!
//! # Responsibility
//! - Provide CRUD and lifecycle transitions for `Word` records.
//! - Keep the JSON encoding of the collection inside the repository.
//!
//! # Invariants
//! - Every write path validates the record it touches before persisting.
//! - Mutations of unknown ids are no-ops and write nothing.
//! - Collection order is insertion order.

use super::WORDS_STORAGE_KEY;
use crate::clock::Clock;
use crate::model::word::{Word, WordId, WordValidationError};
use crate::store::{PersistentStore, StoreError};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for word and settings persistence.
#[derive(Debug)]
pub enum RepoError {
    Validation(WordValidationError),
    Store(StoreError),
    Encode(serde_json::Error),
    NotFound(WordId),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode blob: {err}"),
            Self::NotFound(id) => write!(f, "word not found: {id}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl From<WordValidationError> for RepoError {
    fn from(value: WordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// Owns the full word collection persisted under `WORDS_STORAGE_KEY`.
#[derive(Clone)]
pub struct WordRepository {
    store: Arc<dyn PersistentStore>,
    clock: Arc<dyn Clock>,
}

impl WordRepository {
    pub fn new(store: Arc<dyn PersistentStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Returns the persisted collection.
    ///
    /// A missing, unreadable or malformed blob yields an empty collection.
    pub async fn list_all(&self) -> Vec<Word> {
        let raw = match self.store.get(WORDS_STORAGE_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!("event=words_load module=repo status=error error={err}");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Word>>(&raw) {
            Ok(words) => words,
            Err(err) => {
                warn!(
                    "event=words_load module=repo status=malformed bytes={} error={}",
                    raw.len(),
                    err
                );
                Vec::new()
            }
        }
    }

    pub async fn get(&self, id: &str) -> Option<Word> {
        self.list_all().await.into_iter().find(|word| word.id == id)
    }

    /// Words eligible for reminders (`in_notification_pool && !is_learned`).
    pub async fn eligible(&self) -> Vec<Word> {
        self.list_all()
            .await
            .into_iter()
            .filter(Word::is_eligible)
            .collect()
    }

    pub async fn learned(&self) -> Vec<Word> {
        self.list_all()
            .await
            .into_iter()
            .filter(|word| word.is_learned)
            .collect()
    }

    /// Creates a word in the pool and appends it to the collection.
    ///
    /// # Errors
    /// - `Validation` when `english` or `turkish` is blank.
    /// - `Store` when the collection cannot be written; nothing is persisted.
    pub async fn add(&self, english: &str, turkish: &str) -> RepoResult<Word> {
        let mut words = self.list_all().await;
        let now = self.clock.epoch_millis();
        let word = Word::new(next_word_id(&words, now), english, turkish, now);
        word.validate()?;

        words.push(word.clone());
        self.save_all("word_add", &words).await?;
        Ok(word)
    }

    /// Replaces the record with the same id verbatim.
    ///
    /// An unknown id is a silent no-op.
    pub async fn update(&self, word: &Word) -> RepoResult<()> {
        word.validate()?;
        let replacement = word.clone();
        self.modify("word_update", &word.id, move |stored| *stored = replacement)
            .await
    }

    /// Sets `is_learned = true` and drops the word from the pool. Idempotent.
    pub async fn mark_learned(&self, id: &str) -> RepoResult<()> {
        self.modify("word_mark_learned", id, Word::mark_learned)
            .await
    }

    /// Sets pool membership without touching `is_learned`.
    ///
    /// # Errors
    /// - `Validation(LearnedInPool)` when `in_pool` is `true` for a learned
    ///   word; use `return_to_pool` for that workflow.
    pub async fn set_in_pool(&self, id: &str, in_pool: bool) -> RepoResult<()> {
        self.modify("word_set_in_pool", id, move |word| {
            word.in_notification_pool = in_pool;
        })
        .await
    }

    /// Clears mastery and re-enables pool membership in one write.
    pub async fn return_to_pool(&self, id: &str) -> RepoResult<()> {
        self.modify("word_return_to_pool", id, Word::return_to_pool)
            .await
    }

    /// Persists the collection without the matching record.
    pub async fn remove(&self, id: &str) -> RepoResult<()> {
        let mut words = self.list_all().await;
        let before = words.len();
        words.retain(|word| word.id != id);
        if words.len() == before {
            debug!("event=word_remove module=repo status=not_found");
            return Ok(());
        }
        self.save_all("word_remove", &words).await
    }

    async fn modify(
        &self,
        event: &str,
        id: &str,
        mutate: impl FnOnce(&mut Word) + Send,
    ) -> RepoResult<()> {
        let mut words = self.list_all().await;
        let Some(word) = words.iter_mut().find(|word| word.id == id) else {
            warn!("event={event} module=repo status=not_found");
            return Ok(());
        };

        mutate(word);
        word.validate()?;
        self.save_all(event, &words).await
    }

    async fn save_all(&self, event: &str, words: &[Word]) -> RepoResult<()> {
        let encoded = serde_json::to_string(words)?;
        match self.store.set(WORDS_STORAGE_KEY, &encoded).await {
            Ok(()) => {
                info!(
                    "event={event} module=repo status=ok word_count={}",
                    words.len()
                );
                Ok(())
            }
            Err(err) => {
                error!("event={event} module=repo status=error error={err}");
                Err(err.into())
            }
        }
    }
}

/// Derives an id from the creation time, bumped past any existing id.
fn next_word_id(words: &[Word], now_millis: i64) -> WordId {
    let mut candidate = now_millis;
    while words.iter().any(|word| word.id == candidate.to_string()) {
        candidate += 1;
    }
    candidate.to_string()
}
