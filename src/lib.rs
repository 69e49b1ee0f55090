//! Timer Board - A state-managed HTTP server for categorized countdown timers
//! 
//! This library provides the timer collection, its per-timer countdown engines,
//! category-wide controls and key-value persistence of the active timer list.

pub mod config;
pub mod error;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::BoardError;
pub use state::AppState;
pub use api::create_router;
pub use utils::signals::shutdown_signal;
