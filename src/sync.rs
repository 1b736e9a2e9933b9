//! # Synchronization Utilities
//!
//! The only shared mutable state in blockbar is a pair of process-wide caches
//! (hex color parsing and cell widths) plus the logger's last-timestamp slot.
//! All of them tolerate stale data, so a poisoned mutex is recovered instead
//! of propagated.
//!
//! | Scenario | Function |
//! |----------|----------|
//! | Library code | [`lock_recover`] |
//! | Need context when tracking down poison | [`lock_recover_debug`] |
//! | Test code | `.lock().unwrap()` |
//!
//! ```rust
//! use std::sync::Mutex;
//! use blockbar::sync::lock_recover;
//!
//! let data = Mutex::new(vec![1, 2, 3]);
//! let guard = lock_recover(&data);
//! assert_eq!(guard.len(), 3);
//! ```

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock a mutex, recovering from poison if necessary.
///
/// # Panics
///
/// This function never panics. It always recovers from poison.
#[inline]
pub fn lock_recover<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Lock a mutex and log the acquisition site when recovering from poison.
///
/// `context` names the caller, e.g. `"ColorTriplet::parse_hex cache"`.
#[inline]
pub fn lock_recover_debug<'a, T>(mutex: &'a Mutex<T>, context: &str) -> MutexGuard<'a, T> {
    mutex.lock().unwrap_or_else(|e| {
        log::warn!(target: "blockbar::sync", "mutex poison recovered at: {context}");
        e.into_inner()
    })
}
