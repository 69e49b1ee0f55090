//! Timer records: the persisted active shape and the session-only history shape

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timer identifier, derived from the creation timestamp in milliseconds
pub type TimerId = u64;

/// Categories offered out of the box
pub const PRESET_CATEGORIES: [&str; 4] = ["Workout", "Study", "Break", "Other"];

/// Preset that asks for a free-form category name instead
pub const CUSTOM_CATEGORY: &str = "Other";

/// An active timer exactly as it is written to storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    pub id: TimerId,
    pub name: String,
    /// Total countdown length in whole seconds, always > 0
    pub duration: u32,
    pub category: String,
}

impl Timer {
    /// Duration in milliseconds, the unit the countdown engine works in
    pub fn duration_ms(&self) -> u64 {
        u64::from(self.duration) * 1000
    }

    /// Case-insensitive name match within an exact category
    pub fn conflicts_with(&self, name: &str, category: &str) -> bool {
        self.category == category && self.name.to_lowercase() == name.to_lowercase()
    }

    /// Stamp this timer as completed at `completed_at`
    pub fn complete(self, completed_at: DateTime<Utc>) -> CompletedTimer {
        CompletedTimer {
            timer: self,
            completed_at,
        }
    }
}

/// A timer whose countdown reached zero during this session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedTimer {
    #[serde(flatten)]
    pub timer: Timer,
    #[serde(rename = "completedAt")]
    pub completed_at: DateTime<Utc>,
}

impl CompletedTimer {
    pub fn id(&self) -> TimerId {
        self.timer.id
    }
}

/// Anything that belongs to a category, so active and completed lists group the same way
pub trait Categorized {
    fn category(&self) -> &str;
}

impl Categorized for Timer {
    fn category(&self) -> &str {
        &self.category
    }
}

impl Categorized for CompletedTimer {
    fn category(&self) -> &str {
        &self.timer.category
    }
}
