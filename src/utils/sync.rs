//! Lock helpers

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::warn;

/// Lock a mutex, taking the data back if a previous holder panicked
pub fn lock_or_recover<'a, T>(mutex: &'a Mutex<T>, what: &str) -> MutexGuard<'a, T> {
    mutex.lock().unwrap_or_else(|poisoned: PoisonError<MutexGuard<'a, T>>| {
        warn!("Recovering poisoned lock on {}", what);
        poisoned.into_inner()
    })
}
