//! Word learner use-case service.
//!
//! # Responsibility
//! - Expose screen-level workflows (add, edit, learn, pool membership,
//!   delete, settings) without any UI dependency.
//! - Keep an in-memory projection of the collection for fast reads.
//! - Publish state changes on an event bus instead of global callbacks.
//!
//! # Invariants
//! - Commands apply to the projection first, then persist; on persistence
//!   failure the projection is replaced by a fresh read, never rolled back
//!   piecemeal.
//! - Changes to pool membership are followed by a reschedule.

use crate::model::settings::{NotificationSettings, SettingsValidationError};
use crate::model::word::{join_meanings, Word, WordId, WordValidationError};
use crate::notify::ReminderId;
use crate::repo::settings_repo::SettingsRepository;
use crate::repo::word_repo::{RepoError, WordRepository};
use crate::service::reminder_scheduler::{ReminderScheduler, ScheduleReport};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;

const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Notifications published by `WordService`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolEvent {
    /// The word collection changed (or was reloaded).
    WordsChanged,
    SettingsChanged(NotificationSettings),
    /// Some view asked for the settings dialog to be shown.
    SettingsRequested,
    /// The platform refused notification permission at startup.
    PermissionDenied,
    /// A reschedule finished with this many registered reminders.
    RemindersScheduled(usize),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug)]
pub enum ServiceError {
    Repo(RepoError),
    Settings(SettingsValidationError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Settings(err) => write!(f, "invalid notification settings: {err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Settings(err) => Some(err),
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<WordValidationError> for ServiceError {
    fn from(value: WordValidationError) -> Self {
        Self::Repo(RepoError::Validation(value))
    }
}

impl From<SettingsValidationError> for ServiceError {
    fn from(value: SettingsValidationError) -> Self {
        Self::Settings(value)
    }
}

pub struct WordService {
    words: WordRepository,
    settings: SettingsRepository,
    scheduler: Arc<ReminderScheduler>,
    projection: RwLock<Vec<Word>>,
    events: broadcast::Sender<PoolEvent>,
}

impl WordService {
    /// Creates the service with an empty projection; call `refresh` or
    /// `start` to load it.
    pub fn new(
        words: WordRepository,
        settings: SettingsRepository,
        scheduler: Arc<ReminderScheduler>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            words,
            settings,
            scheduler,
            projection: RwLock::new(Vec::new()),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PoolEvent> {
        self.events.subscribe()
    }

    /// App launch: load state, ask for permission, plan today's reminders.
    ///
    /// Returns whether notification permission was granted.
    pub async fn start(&self) -> bool {
        self.refresh().await;
        let settings = self.settings.load().await;

        let granted = self.scheduler.request_permission().await;
        if !granted {
            self.emit(PoolEvent::PermissionDenied);
        }
        if settings.enabled {
            self.reschedule().await;
        }
        granted
    }

    /// Replaces the projection with the persisted collection.
    pub async fn refresh(&self) {
        let fresh = self.words.list_all().await;
        if let Ok(mut projection) = self.projection.write() {
            *projection = fresh;
        }
        self.emit(PoolEvent::WordsChanged);
    }

    pub fn words(&self) -> Vec<Word> {
        self.snapshot(|_| true)
    }

    /// Words currently eligible for reminders.
    pub fn pool_words(&self) -> Vec<Word> {
        self.snapshot(Word::is_eligible)
    }

    pub fn learned_words(&self) -> Vec<Word> {
        self.snapshot(|word| word.is_learned)
    }

    /// Adds a word from form input.
    ///
    /// English and the first sense are required; blank extra senses are
    /// dropped.
    pub async fn add_word<S: AsRef<str>>(
        &self,
        english: &str,
        meanings: &[S],
    ) -> ServiceResult<Word> {
        let (english, turkish) = normalize_input(english, meanings)?;
        match self.words.add(&english, &turkish).await {
            Ok(word) => {
                if let Ok(mut projection) = self.projection.write() {
                    projection.push(word.clone());
                }
                self.emit(PoolEvent::WordsChanged);
                Ok(word)
            }
            Err(err) => {
                warn!("event=word_add module=service status=error error={err}");
                self.refresh().await;
                Err(err.into())
            }
        }
    }

    /// Replaces the text of an existing word, keeping id and lifecycle flags.
    pub async fn edit_word<S: AsRef<str>>(
        &self,
        id: &str,
        english: &str,
        meanings: &[S],
    ) -> ServiceResult<Word> {
        let (english, turkish) = normalize_input(english, meanings)?;
        let mut edited = self.find(id)?;
        edited.english = english;
        edited.turkish = turkish;

        let replacement = edited.clone();
        self.commit(
            "word_edit",
            move |words| replace_word(words, replacement),
            self.words.update(&edited),
        )
        .await?;
        Ok(edited)
    }

    pub async fn mark_learned(&self, id: &str) -> ServiceResult<()> {
        self.commit(
            "word_mark_learned",
            |words| apply_to(words, id, Word::mark_learned),
            self.words.mark_learned(id),
        )
        .await?;
        self.reschedule().await;
        Ok(())
    }

    /// Takes a word out of the pool without marking it learned.
    pub async fn remove_from_pool(&self, id: &str) -> ServiceResult<()> {
        self.commit(
            "word_remove_from_pool",
            |words| apply_to(words, id, |word| word.in_notification_pool = false),
            self.words.set_in_pool(id, false),
        )
        .await?;
        self.reschedule().await;
        Ok(())
    }

    /// Moves a word (learned or not) back into the notification pool.
    pub async fn return_to_pool(&self, id: &str) -> ServiceResult<()> {
        self.commit(
            "word_return_to_pool",
            |words| apply_to(words, id, Word::return_to_pool),
            self.words.return_to_pool(id),
        )
        .await?;
        self.reschedule().await;
        Ok(())
    }

    /// Learned words go back to the pool; everything else becomes learned.
    pub async fn toggle_learned(&self, id: &str) -> ServiceResult<()> {
        if self.find(id)?.is_learned {
            self.return_to_pool(id).await
        } else {
            self.mark_learned(id).await
        }
    }

    pub async fn delete_word(&self, id: &str) -> ServiceResult<()> {
        self.commit(
            "word_delete",
            |words| words.retain(|word| word.id != id),
            self.words.remove(id),
        )
        .await?;
        self.reschedule().await;
        Ok(())
    }

    pub async fn settings(&self) -> NotificationSettings {
        self.settings.load().await
    }

    /// Validates and stores settings, then reschedules or clears reminders.
    pub async fn save_settings(&self, settings: NotificationSettings) -> ServiceResult<()> {
        settings.validate()?;
        self.settings.save(&settings).await?;
        self.emit(PoolEvent::SettingsChanged(settings));

        if settings.enabled {
            self.reschedule().await;
        } else if let Err(err) = self.scheduler.cancel_all().await {
            warn!("event=settings_disable module=service status=error error={err}");
        }
        Ok(())
    }

    /// Asks whichever view owns the settings dialog to open it.
    pub fn request_settings_dialog(&self) {
        self.emit(PoolEvent::SettingsRequested);
    }

    pub async fn reschedule(&self) -> ScheduleReport {
        let report = self.scheduler.schedule_for_today().await;
        self.emit(PoolEvent::RemindersScheduled(report.scheduled.len()));
        report
    }

    /// Fires one reminder shortly to let the user check delivery.
    pub async fn send_test_reminder(&self) -> Option<ReminderId> {
        self.scheduler.schedule_test_reminder().await
    }

    async fn commit(
        &self,
        event: &str,
        apply: impl FnOnce(&mut Vec<Word>),
        persist: impl Future<Output = Result<(), RepoError>>,
    ) -> ServiceResult<()> {
        if let Ok(mut projection) = self.projection.write() {
            apply(&mut *projection);
        }

        match persist.await {
            Ok(()) => {
                info!("event={event} module=service status=ok");
                self.emit(PoolEvent::WordsChanged);
                Ok(())
            }
            Err(err) => {
                warn!("event={event} module=service status=error action=reload error={err}");
                self.refresh().await;
                Err(err.into())
            }
        }
    }

    fn find(&self, id: &str) -> ServiceResult<Word> {
        self.snapshot(|word| word.id == id)
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::Repo(RepoError::NotFound(WordId::from(id))))
    }

    fn snapshot(&self, keep: impl Fn(&Word) -> bool) -> Vec<Word> {
        self.projection
            .read()
            .map(|words| words.iter().filter(|word| keep(word)).cloned().collect())
            .unwrap_or_default()
    }

    fn emit(&self, event: PoolEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

fn normalize_input<S: AsRef<str>>(
    english: &str,
    meanings: &[S],
) -> Result<(String, String), WordValidationError> {
    let english = english.trim();
    if english.is_empty() {
        return Err(WordValidationError::EmptyEnglish);
    }
    // The first sense is mandatory; later ones are optional extras.
    let first_is_blank = meanings
        .first()
        .map_or(true, |meaning| meaning.as_ref().trim().is_empty());
    if first_is_blank {
        return Err(WordValidationError::EmptyMeaning);
    }
    Ok((english.to_string(), join_meanings(meanings)))
}

fn apply_to(words: &mut [Word], id: &str, mutate: impl FnOnce(&mut Word)) {
    if let Some(word) = words.iter_mut().find(|word| word.id == id) {
        mutate(word);
    }
}

fn replace_word(words: &mut [Word], replacement: Word) {
    if let Some(word) = words.iter_mut().find(|word| word.id == replacement.id) {
        *word = replacement;
    }
}
