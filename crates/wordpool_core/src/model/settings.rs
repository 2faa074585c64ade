//! Notification settings model.
//!
//! # Responsibility
//! - Define the process-wide reminder window and master switch.
//! - Offer writer-side validation; the repository stores values verbatim.
//!
//! # Invariants
//! - Hours are wall-clock hours in `[0, 23]` once validated.
//! - A valid window has `start_hour < end_hour`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const DEFAULT_START_HOUR: i64 = 9;
pub const DEFAULT_END_HOUR: i64 = 21;
const MAX_HOUR: i64 = 23;

/// Settings validation errors raised by settings writers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsValidationError {
    HourOutOfRange(i64),
    EmptyWindow { start_hour: i64, end_hour: i64 },
}

impl Display for SettingsValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HourOutOfRange(hour) => {
                write!(f, "hour {hour} is outside the 0-{MAX_HOUR} range")
            }
            Self::EmptyWindow {
                start_hour,
                end_hour,
            } => write!(
                f,
                "start hour {start_hour} must be earlier than end hour {end_hour}"
            ),
        }
    }
}

impl Error for SettingsValidationError {}

/// Reminder window and master switch.
///
/// Hours are kept as plain integers so that out-of-range values written by a
/// careless caller still round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub start_hour: i64,
    pub end_hour: i64,
    pub enabled: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            start_hour: DEFAULT_START_HOUR,
            end_hour: DEFAULT_END_HOUR,
            enabled: true,
        }
    }
}

impl NotificationSettings {
    /// Inclusive hours of the reminder window.
    ///
    /// Yields nothing when `start_hour > end_hour`.
    pub fn window_hours(&self) -> impl Iterator<Item = i64> {
        self.start_hour..=self.end_hour
    }

    /// Checks the writer contract: both hours in range and `start < end`.
    pub fn validate(&self) -> Result<(), SettingsValidationError> {
        for hour in [self.start_hour, self.end_hour] {
            if !(0..=MAX_HOUR).contains(&hour) {
                return Err(SettingsValidationError::HourOutOfRange(hour));
            }
        }
        if self.start_hour >= self.end_hour {
            return Err(SettingsValidationError::EmptyWindow {
                start_hour: self.start_hour,
                end_hour: self.end_hour,
            });
        }
        Ok(())
    }
}
