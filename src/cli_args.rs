//! Command-line argument structures.
//!
//! Isolates clap derivations so lint expectations remain scoped, keeping
//! `main.rs` focused on runtime logic. Sub-command structures also derive
//! `OrthoConfig` so defaults can come from `.scenmerge.toml` and
//! `SCENMERGE_*` environment variables.

use std::path::PathBuf;

use clap::Parser;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::customization::{CustomizationDetector, DEFAULT_MARKERS};
use crate::merge::MergeMode;

/// Options that apply to every sub-command.
#[derive(clap::Args, Debug, Default, Clone)]
pub struct GlobalArgs {
    /// Increase log verbosity (repeatable)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl GlobalArgs {
    /// Default `env_logger` filter implied by the flags. `RUST_LOG` wins.
    #[must_use]
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

/// Parameters accepted by the `merge` sub-command.
#[derive(Parser, Deserialize, Serialize, Debug, OrthoConfig, Clone, Default)]
#[command(name = "merge")]
#[ortho_config(prefix = "SCENMERGE")]
pub struct MergeArgs {
    /// Existing scenario file (may not exist yet)
    #[arg(required = true, value_name = "EXISTING")]
    // Clap requires the argument so parsing yields `Some(value)`. The
    // `Option` lets configuration merging leave it unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub existing: Option<PathBuf>,
    /// Newly generated scenario file
    #[arg(required = true, value_name = "PROPOSED")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposed: Option<PathBuf>,
    /// Where to write the result; defaults to EXISTING
    #[arg(short, long, value_name = "PATH")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    /// Reconciliation policy
    #[arg(short, long, value_enum)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<MergeMode>,
    /// Customization marker substring (repeatable); replaces the defaults
    #[arg(long = "marker", value_name = "TEXT")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub markers: Vec<String>,
    /// Copy the output file to `<file>.bak` before overwriting it
    #[arg(long)]
    // `crate::bool_predicates::not` ensures false CLI defaults cannot override env or config precedence.
    #[serde(default, skip_serializing_if = "crate::bool_predicates::not")]
    pub backup: bool,
    /// Show the changes without writing anything
    #[arg(long)]
    #[serde(default, skip_serializing_if = "crate::bool_predicates::not")]
    pub dry_run: bool,
    /// Print a diff of the changes before writing
    #[arg(long)]
    #[serde(default, skip_serializing_if = "crate::bool_predicates::not")]
    pub diff: bool,
}

/// Explicit engine settings resolved from configuration layers.
#[derive(Debug, Clone)]
pub struct MergeSettings {
    pub mode: MergeMode,
    pub detector: CustomizationDetector,
}

impl MergeArgs {
    /// Resolve the merge mode and marker detector.
    ///
    /// # Errors
    ///
    /// Returns [`regex::Error`] if the markers cannot be compiled.
    pub fn settings(&self) -> Result<MergeSettings, regex::Error> {
        Ok(MergeSettings {
            mode: self.mode.unwrap_or_default(),
            detector: detector_for(&self.markers)?,
        })
    }
}

/// Parameters accepted by the `show` sub-command.
#[derive(Parser, Deserialize, Serialize, Debug, OrthoConfig, Clone, Default)]
#[command(name = "show")]
#[ortho_config(prefix = "SCENMERGE")]
pub struct ShowArgs {
    /// Scenario file to list
    #[arg(required = true, value_name = "FILE")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Customization marker substring (repeatable); replaces the defaults
    #[arg(long = "marker", value_name = "TEXT")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub markers: Vec<String>,
}

/// Parameters accepted by the `lock` sub-command.
#[derive(Parser, Deserialize, Serialize, Debug, OrthoConfig, Clone, Default)]
#[command(name = "lock")]
#[ortho_config(prefix = "SCENMERGE")]
pub struct LockArgs {
    /// Scenario file to update
    #[arg(required = true, value_name = "FILE")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Scenario ids to lock
    #[arg(required = true, value_name = "ID", num_args = 1..)]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ids: Vec<String>,
    /// Clear the lock instead of setting it
    #[arg(long)]
    #[serde(default, skip_serializing_if = "crate::bool_predicates::not")]
    pub unlock: bool,
}

/// Build a detector from configured markers, falling back to the defaults
/// when none are configured.
///
/// # Errors
///
/// Returns [`regex::Error`] if the markers cannot be compiled.
pub fn detector_for(markers: &[String]) -> Result<CustomizationDetector, regex::Error> {
    if markers.is_empty() {
        CustomizationDetector::new(DEFAULT_MARKERS.iter().copied())
    } else {
        CustomizationDetector::new(markers.iter().cloned())
    }
}
