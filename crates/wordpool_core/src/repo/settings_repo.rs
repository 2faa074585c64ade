//! Notification settings repository.
//!
//! # Invariants
//! - `load` never fails; absent or corrupt blobs yield the defaults.
//! - `save` stores the value verbatim without validating the window.

use super::word_repo::RepoResult;
use super::SETTINGS_STORAGE_KEY;
use crate::model::settings::NotificationSettings;
use crate::store::PersistentStore;
use log::{error, info, warn};
use std::sync::Arc;

#[derive(Clone)]
pub struct SettingsRepository {
    store: Arc<dyn PersistentStore>,
}

impl SettingsRepository {
    pub fn new(store: Arc<dyn PersistentStore>) -> Self {
        Self { store }
    }

    /// Returns persisted settings, or `NotificationSettings::default()`.
    pub async fn load(&self) -> NotificationSettings {
        let raw = match self.store.get(SETTINGS_STORAGE_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return NotificationSettings::default(),
            Err(err) => {
                warn!("event=settings_load module=repo status=error error={err}");
                return NotificationSettings::default();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|err| {
            warn!("event=settings_load module=repo status=malformed error={err}");
            NotificationSettings::default()
        })
    }

    /// Overwrites the stored settings wholesale.
    pub async fn save(&self, settings: &NotificationSettings) -> RepoResult<()> {
        let encoded = serde_json::to_string(settings)?;
        if let Err(err) = self.store.set(SETTINGS_STORAGE_KEY, &encoded).await {
            error!("event=settings_save module=repo status=error error={err}");
            return Err(err.into());
        }

        info!(
            "event=settings_save module=repo status=ok start_hour={} end_hour={} enabled={}",
            settings.start_hour, settings.end_hour, settings.enabled
        );
        Ok(())
    }
}
