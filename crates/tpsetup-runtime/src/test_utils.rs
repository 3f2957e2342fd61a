//! Shared helpers for unit tests that touch process-global state.

use std::sync::{Mutex, MutexGuard};

/// The working directory is process-wide; tests that change it run one at a time.
pub static CWD_LOCK: Mutex<()> = Mutex::new(());

pub fn lock_cwd() -> MutexGuard<'static, ()> {
    CWD_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}
