//! Environment and directory guards for integration tests.
//!
//! Provides helpers to capture and restore environment variables, temporarily
//! change the working directory, and write configuration files.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use scenmerge::environment;
use scenmerge::test_utils::{remove_var, set_var};
use tempfile::TempDir;

/// Variables that can leak configuration into a test.
pub const CONFIG_KEYS: &[&str] = &[
    "SCENMERGE_CONFIG_PATH",
    "SCENMERGE_CMDS_MERGE_MODE",
    "SCENMERGE_CMDS_MERGE_OUTPUT",
    "SCENMERGE_CMDS_MERGE_BACKUP",
    "SCENMERGE_CMDS_MERGE_DRY_RUN",
];

/// RAII guard that restores captured environment variables on drop.
pub struct EnvGuard {
    entries: Vec<(OsString, Option<OsString>)>,
}

impl EnvGuard {
    /// Capture `keys`, removing them from the environment for the guard's
    /// lifetime.
    ///
    /// Mutating the process environment is globally visible, so callers must
    /// serialise tests with `#[serial]`.
    pub fn new(keys: &[&str]) -> Self {
        let mut entries = Vec::new();
        for key in keys {
            let key = OsString::from(key);
            let previous = environment::with_lock(|| env::var_os(key.as_os_str()));
            remove_var(&key);
            entries.push((key, previous));
        }
        Self { entries }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &mut self.entries {
            let key_ref = key.as_os_str();
            match value.take() {
                Some(val) => set_var(key_ref, val),
                None => remove_var(key_ref),
            }
        }
    }
}

/// RAII guard restoring the working directory on drop.
pub struct DirGuard {
    previous: PathBuf,
}

impl DirGuard {
    /// Enter `path`, returning a guard that restores the prior working
    /// directory when dropped.
    pub fn enter(path: impl AsRef<Path>) -> Self {
        let previous = env::current_dir().expect("current dir");
        env::set_current_dir(path.as_ref()).expect("set dir");
        Self { previous }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = env::set_current_dir(&self.previous);
    }
}

/// Write `content` to a temporary `.scenmerge.toml` and return its directory
/// and path.
fn write_config(content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("create config dir");
    let path = dir.path().join(".scenmerge.toml");
    fs::write(&path, content).expect("write config");
    (dir, path)
}

/// Write a config file and point `SCENMERGE_CONFIG_PATH` at it.
///
/// Callers must hold an [`EnvGuard`] capturing `SCENMERGE_CONFIG_PATH`.
pub fn setup_env_and_config(content: &str) -> (TempDir, PathBuf) {
    let (dir, path) = write_config(content);
    set_var("SCENMERGE_CONFIG_PATH", path.as_os_str());
    (dir, path)
}
