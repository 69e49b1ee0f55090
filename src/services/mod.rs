//! External service module
//! 
//! Persistence of the active timer list and theme preference.

pub mod storage;

// Re-export main types
pub use storage::{
    load_theme, load_timers, save_theme, save_timers, FileStorage, MemoryStorage, Storage,
    StorageError,
};
