//! Utility functions module
//! 
//! Signal handling and lock helpers shared across the crate.

pub mod signals;
pub mod sync;

pub use signals::shutdown_signal;
pub use sync::lock_or_recover;
