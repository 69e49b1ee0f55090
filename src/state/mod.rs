//! State management module
//! 
//! This module contains all state-related structures and their management logic.

pub mod app_state;
pub mod board;
pub mod categories;
pub mod countdown;
pub mod events;
pub mod timer;
pub mod ui_state;
pub mod validator;

// Re-export main types
pub use app_state::{AppState, Confirmation, TickOutcome, TimerCommand};
pub use board::{Board, BoardSnapshot, TimerView};
pub use categories::{BulkCommand, BulkReport, CategoryView};
pub use countdown::{Countdown, CountdownStatus};
pub use events::BoardEvent;
pub use timer::{CompletedTimer, Timer, TimerId};
pub use ui_state::Theme;
pub use validator::{TimerDraft, ValidationError};
