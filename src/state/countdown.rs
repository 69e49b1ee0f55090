//! Countdown engine for a single timer
//!
//! The engine is a plain state machine. It owns no scheduling: a ticker task
//! calls [`Countdown::tick`] with a fixed step while the timer is running.
//!
//! ```text
//! Paused -> Running -> Paused
//!           Running -> Completed (remaining hits zero, reported once)
//! any     -> Paused   (reset, remaining back to full duration)
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a countdown currently sits in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountdownStatus {
    Paused,
    Running,
    Completed,
}

/// Result of advancing a countdown by one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Not running, nothing changed
    Idle,
    /// Still counting, with the new remaining time
    Advanced(u64),
    /// Reached zero on this tick
    Completed,
}

/// Countdown state for one timer
#[derive(Debug, Clone)]
pub struct Countdown {
    duration_ms: u64,
    remaining_ms: u64,
    status: CountdownStatus,
    /// When the current run began
    started_at: Option<DateTime<Utc>>,
}

impl Countdown {
    /// A paused countdown at full duration
    pub fn new(duration_ms: u64) -> Self {
        Self {
            duration_ms,
            remaining_ms: duration_ms,
            status: CountdownStatus::Paused,
            started_at: None,
        }
    }

    pub fn status(&self) -> CountdownStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == CountdownStatus::Running
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Remaining fraction in `[0, 1]`
    pub fn progress(&self) -> f64 {
        if self.duration_ms == 0 {
            return 0.0;
        }
        (self.remaining_ms as f64 / self.duration_ms as f64).clamp(0.0, 1.0)
    }

    /// Begin or resume counting. Returns false if already running.
    ///
    /// Starting a completed countdown resets it to full duration first, so a
    /// run always has time left to count.
    pub fn start(&mut self) -> bool {
        match self.status {
            CountdownStatus::Running => false,
            CountdownStatus::Completed => {
                self.remaining_ms = self.duration_ms;
                self.run();
                true
            }
            CountdownStatus::Paused => {
                self.run();
                true
            }
        }
    }

    /// Stop counting, keeping the remaining time exactly. Returns false if not running.
    pub fn pause(&mut self) -> bool {
        if self.status != CountdownStatus::Running {
            return false;
        }
        self.status = CountdownStatus::Paused;
        true
    }

    /// Start if paused or completed, pause if running
    pub fn toggle(&mut self) -> CountdownStatus {
        if self.is_running() {
            self.pause();
        } else {
            self.start();
        }
        self.status
    }

    /// Back to a paused countdown at full duration, from any state
    pub fn reset(&mut self) {
        self.remaining_ms = self.duration_ms;
        self.status = CountdownStatus::Paused;
        self.started_at = None;
    }

    /// Advance by `step_ms`. Never goes below zero; reports completion once.
    pub fn tick(&mut self, step_ms: u64) -> Tick {
        if self.status != CountdownStatus::Running {
            return Tick::Idle;
        }
        if self.remaining_ms <= step_ms {
            self.remaining_ms = 0;
            self.status = CountdownStatus::Completed;
            return Tick::Completed;
        }
        self.remaining_ms -= step_ms;
        Tick::Advanced(self.remaining_ms)
    }

    pub fn snapshot(&self) -> CountdownSnapshot {
        CountdownSnapshot {
            status: self.status,
            remaining_ms: self.remaining_ms,
            progress: self.progress(),
            display: format_clock(self.remaining_ms),
        }
    }

    fn run(&mut self) {
        self.status = CountdownStatus::Running;
        self.started_at = Some(Utc::now());
    }
}

/// Serializable view of a countdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountdownSnapshot {
    pub status: CountdownStatus,
    pub remaining_ms: u64,
    pub progress: f64,
    pub display: String,
}

/// Format milliseconds as `MM:SS.cc`
pub fn format_clock(ms: u64) -> String {
    let total_seconds = ms / 1000;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    let centis = (ms % 1000) / 10;
    format!("{:02}:{:02}.{:02}", minutes, seconds, centis)
}
