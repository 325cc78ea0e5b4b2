//! Serialised access to process environment variables.
//!
//! Configuration layering reads `SCENMERGE_*` variables from the process
//! environment. Reads and writes go through one mutex so tests that adjust
//! variables cannot race each other or the code under test.

use std::env;
use std::ffi::OsStr;
use std::sync::{Mutex, MutexGuard, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn lock() -> MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Set an environment variable while holding the lock.
pub fn set_var<K: AsRef<OsStr>, V: AsRef<OsStr>>(key: K, value: V) {
    let _guard = lock();
    // SAFETY: the mutex serialises access to the unsynchronised std env calls.
    unsafe { env::set_var(key, value) };
}

/// Remove an environment variable while holding the lock.
pub fn remove_var<K: AsRef<OsStr>>(key: K) {
    let _guard = lock();
    // SAFETY: the mutex serialises access to the unsynchronised std env calls.
    unsafe { env::remove_var(key) };
}

/// Read an environment variable while holding the lock.
///
/// # Errors
///
/// Returns [`env::VarError`] when the variable is unset or not Unicode.
pub fn var<K: AsRef<OsStr>>(key: K) -> Result<String, env::VarError> {
    let _guard = lock();
    env::var(key)
}

/// Whether `key` is set to any non-empty value.
#[must_use]
pub fn is_set<K: AsRef<OsStr>>(key: K) -> bool {
    var(key).is_ok_and(|v| !v.is_empty())
}

/// Run `op` while the lock is held.
pub fn with_lock<T, F>(op: F) -> T
where
    F: FnOnce() -> T,
{
    let _guard = lock();
    op()
}
