//! The authoritative active and completed lists, without locking or I/O
//!
//! [`AppState`](super::AppState) wraps a `Board` in a mutex and adds
//! persistence, tickers and notifications around each mutation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    categories::{apply_bulk, category_views, BulkCommand, BulkReport, CategoryView},
    countdown::{Countdown, CountdownSnapshot, Tick},
    timer::{Categorized, CompletedTimer, Timer, TimerId},
    ui_state::{Theme, UiState},
    validator::{validate, CategorySuggestions, TimerDraft, ValidationError},
};

/// An active timer together with its countdown engine
#[derive(Debug, Clone)]
pub struct ActiveTimer {
    pub timer: Timer,
    pub countdown: Countdown,
}

impl ActiveTimer {
    pub fn new(timer: Timer) -> Self {
        let countdown = Countdown::new(timer.duration_ms());
        Self { timer, countdown }
    }

    pub fn view(&self) -> TimerView {
        TimerView {
            timer: self.timer.clone(),
            countdown: self.countdown.snapshot(),
        }
    }
}

impl Categorized for ActiveTimer {
    fn category(&self) -> &str {
        &self.timer.category
    }
}

/// An active timer as reported to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerView {
    #[serde(flatten)]
    pub timer: Timer,
    pub countdown: CountdownSnapshot,
}

/// Full board state as reported to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub active: Vec<TimerView>,
    pub completed: Vec<CompletedTimer>,
}

#[derive(Debug, Clone)]
pub struct Board {
    active: Vec<ActiveTimer>,
    completed: Vec<CompletedTimer>,
    suggestions: CategorySuggestions,
    pub ui: UiState,
    last_id: TimerId,
}

impl Board {
    /// Build a board from persisted timers. Every timer starts paused at full
    /// duration and every loaded category starts expanded.
    pub fn new(timers: Vec<Timer>, theme: Theme) -> Self {
        let mut ui = UiState::new(theme);
        let mut last_id = 0;
        let mut active: Vec<ActiveTimer> = Vec::with_capacity(timers.len());
        for timer in timers {
            if active.iter().any(|entry| entry.timer.id == timer.id) {
                tracing::warn!(
                    "Skipping stored timer \"{}\": id {} is already loaded",
                    timer.name,
                    timer.id
                );
                continue;
            }
            ui.expand_category(&timer.category);
            last_id = last_id.max(timer.id);
            active.push(ActiveTimer::new(timer));
        }

        Self {
            active,
            completed: Vec::new(),
            suggestions: CategorySuggestions::new(),
            ui,
            last_id,
        }
    }

    /// Validate a draft and append the resulting timer
    pub fn create(&mut self, draft: &TimerDraft, now_ms: u64) -> Result<Timer, ValidationError> {
        // creation timestamp, bumped past the last id so ids stay unique
        let id = match self.last_id.checked_add(1) {
            Some(next) => now_ms.max(next),
            None => self.free_id(now_ms),
        };
        let timer = validate(draft, &self.timers(), self.suggestions.names(), id)?;
        self.last_id = self.last_id.max(id);

        if self.suggestions.learn(&timer.category) {
            tracing::debug!("Learned new category suggestion: {}", timer.category);
        }
        self.ui.expand_category(&timer.category);
        self.active.push(ActiveTimer::new(timer.clone()));
        Ok(timer)
    }

    /// Remove an active timer. Completed history cannot be deleted.
    pub fn delete(&mut self, id: TimerId) -> Option<Timer> {
        let index = self.position(id)?;
        Some(self.active.remove(index).timer)
    }

    /// Move a timer from the active list to history
    pub fn complete(&mut self, id: TimerId, completed_at: DateTime<Utc>) -> Option<CompletedTimer> {
        let index = self.position(id)?;
        let completed = self.active.remove(index).timer.complete(completed_at);
        self.completed.push(completed.clone());
        Some(completed)
    }

    /// Advance one timer's countdown. `None` if the timer is no longer active.
    pub fn advance(&mut self, id: TimerId, step_ms: u64) -> Option<Tick> {
        self.get_mut(id).map(|entry| entry.countdown.tick(step_ms))
    }

    pub fn start(&mut self, id: TimerId) -> Option<bool> {
        self.get_mut(id).map(|entry| entry.countdown.start())
    }

    pub fn pause(&mut self, id: TimerId) -> Option<bool> {
        self.get_mut(id).map(|entry| entry.countdown.pause())
    }

    pub fn toggle(&mut self, id: TimerId) -> Option<bool> {
        self.get_mut(id).map(|entry| {
            entry.countdown.toggle();
            true
        })
    }

    pub fn reset(&mut self, id: TimerId) -> Option<bool> {
        self.get_mut(id).map(|entry| {
            entry.countdown.reset();
            true
        })
    }

    pub fn bulk(&mut self, category: &str, command: BulkCommand) -> BulkReport {
        apply_bulk(&mut self.active, category, command)
    }

    pub fn get(&self, id: TimerId) -> Option<&ActiveTimer> {
        self.active.iter().find(|entry| entry.timer.id == id)
    }

    fn get_mut(&mut self, id: TimerId) -> Option<&mut ActiveTimer> {
        self.active.iter_mut().find(|entry| entry.timer.id == id)
    }

    /// First id at or after `from` that no active timer holds
    fn free_id(&self, from: TimerId) -> TimerId {
        (from..=TimerId::MAX)
            .find(|id| self.get(*id).is_none())
            .unwrap_or(from)
    }

    fn position(&self, id: TimerId) -> Option<usize> {
        self.active.iter().position(|entry| entry.timer.id == id)
    }

    /// The active list in its persisted shape
    pub fn timers(&self) -> Vec<Timer> {
        self.active.iter().map(|entry| entry.timer.clone()).collect()
    }

    pub fn active(&self) -> &[ActiveTimer] {
        &self.active
    }

    pub fn completed(&self) -> &[CompletedTimer] {
        &self.completed
    }

    pub fn suggestions(&self) -> &[String] {
        self.suggestions.names()
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            active: self.active.iter().map(ActiveTimer::view).collect(),
            completed: self.completed.clone(),
        }
    }

    pub fn category_views(&self) -> Vec<CategoryView> {
        category_views(&self.active, &self.completed, &self.ui)
    }
}
