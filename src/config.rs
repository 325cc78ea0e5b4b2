//! Configuration loading helpers.
//!
//! Wraps `ortho_config` sub-command loading so a `[cmds.<name>]` section
//! that omits the positional file arguments falls back to the command-line
//! values instead of failing.

use figment::error::{Error as FigmentError, Kind as FigmentKind};
use ortho_config::{OrthoConfig, OrthoError, load_and_merge_subcommand_for};

/// Positional fields that only ever come from the command line.
pub const POSITIONAL_FIELDS: &[&str] = &["existing", "proposed", "file", "ids"];

fn missing_positional(err: &FigmentError) -> bool {
    // FigmentError yields its causes only by value; clone to inspect without ownership.
    err.clone().into_iter().any(|e| {
        matches!(e.kind, FigmentKind::MissingField(ref f) if POSITIONAL_FIELDS.contains(&f.as_ref()))
    })
}

/// Load configuration for a set of CLI arguments.
///
/// Precedence is defaults < config file < environment < CLI. When the merged
/// layers lack a positional field the CLI arguments are returned unchanged.
///
/// # Errors
///
/// Returns an [`OrthoError`] if configuration gathering fails for any other
/// reason, such as a malformed config file.
#[expect(
    clippy::result_large_err,
    reason = "configuration loading errors can be verbose"
)]
pub fn load_with_path_fallback<T>(cli_args: T) -> Result<T, OrthoError>
where
    T: OrthoConfig + serde::Serialize + Default + clap::CommandFactory + Clone,
{
    match load_and_merge_subcommand_for::<T>(&cli_args) {
        Ok(v) => Ok(v),
        Err(OrthoError::Gathering(e)) => {
            if missing_positional(&e) {
                Ok(cli_args)
            } else {
                Err(OrthoError::Gathering(e))
            }
        }
        Err(e) => Err(e),
    }
}
