//! Background tasks module
//! 
//! One countdown ticker task per active timer.

pub mod countdown_ticker;

// Re-export main functions
pub use countdown_ticker::{countdown_ticker_task, spawn_countdown_ticker};
