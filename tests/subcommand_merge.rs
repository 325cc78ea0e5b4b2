//! Tests verifying configuration precedence for subcommands.
//!
//! Defaults come from a `[cmds.<name>]` section of the config file and can be
//! overridden by environment variables and, finally, by command-line
//! arguments.

#[path = "support/env.rs"]
mod support;

use std::path::PathBuf;

use rstest::rstest;
use scenmerge::config::load_with_path_fallback;
use scenmerge::test_utils::set_var;
use scenmerge::{LockArgs, MergeArgs, MergeMode, ShowArgs};
use serial_test::serial;
use support::{CONFIG_KEYS, DirGuard, EnvGuard, setup_env_and_config};

fn cli_merge(mode: Option<MergeMode>) -> MergeArgs {
    MergeArgs {
        existing: Some("old.json".into()),
        proposed: Some("new.json".into()),
        mode,
        ..MergeArgs::default()
    }
}

#[rstest]
#[serial]
fn config_file_supplies_defaults() {
    let _env = EnvGuard::new(CONFIG_KEYS);
    let (_dir, _path) = setup_env_and_config(
        "[cmds.merge]\nmode = \"append\"\nbackup = true\nmarkers = [\"@manual\"]\n",
    );
    let merged = load_with_path_fallback(cli_merge(None)).expect("merge args");
    assert_eq!(merged.mode, Some(MergeMode::Append));
    assert!(merged.backup);
    assert_eq!(merged.markers, ["@manual"]);
    assert_eq!(merged.existing, Some(PathBuf::from("old.json")));
}

#[rstest]
#[serial]
fn environment_overrides_config_file() {
    let _env = EnvGuard::new(CONFIG_KEYS);
    let (_dir, _path) = setup_env_and_config("[cmds.merge]\nmode = \"append\"\n");
    set_var("SCENMERGE_CMDS_MERGE_MODE", "replace-all");
    let merged = load_with_path_fallback(cli_merge(None)).expect("merge args");
    assert_eq!(merged.mode, Some(MergeMode::ReplaceAll));
}

#[rstest]
#[serial]
fn cli_overrides_environment_and_file() {
    let _env = EnvGuard::new(CONFIG_KEYS);
    let (_dir, _path) = setup_env_and_config("[cmds.merge]\nmode = \"append\"\n");
    set_var("SCENMERGE_CMDS_MERGE_MODE", "replace-all");
    let merged =
        load_with_path_fallback(cli_merge(Some(MergeMode::Selective))).expect("merge args");
    assert_eq!(merged.mode, Some(MergeMode::Selective));
}

#[rstest]
#[serial]
fn false_cli_flag_keeps_configured_true() {
    let _env = EnvGuard::new(CONFIG_KEYS);
    let (_dir, _path) = setup_env_and_config("[cmds.merge]\ndry_run = true\n");
    let merged = load_with_path_fallback(cli_merge(None)).expect("merge args");
    assert!(merged.dry_run);
}

#[rstest]
#[serial]
fn show_reads_its_own_section() {
    let _env = EnvGuard::new(CONFIG_KEYS);
    let (dir, _path) = setup_env_and_config(
        "[cmds.merge]\nmarkers = [\"NOPE\"]\n[cmds.show]\nmarkers = [\"KEEP\"]\n",
    );
    let _cwd = DirGuard::enter(dir.path());
    let cli = ShowArgs {
        file: Some("s.json".into()),
        markers: Vec::new(),
    };
    let merged = load_with_path_fallback(cli).expect("show args");
    assert_eq!(merged.markers, ["KEEP"]);
}

#[rstest]
#[serial]
fn lock_without_config_returns_cli_values() {
    let _env = EnvGuard::new(CONFIG_KEYS);
    let cli = LockArgs {
        file: Some("s.json".into()),
        ids: vec!["login".into()],
        unlock: true,
    };
    let merged = load_with_path_fallback(cli).expect("lock args");
    assert_eq!(merged.ids, ["login"]);
    assert!(merged.unlock);
}
