//! Command execution helpers for `scenmerge`.
//!
//! This module owns the runtime flow for each subcommand: loading scenario
//! files, running the merge engine and rendering output to the terminal.

use std::io::{self, ErrorKind, IsTerminal, Write};

use log::{error, info, warn};
use termimad::MadSkin;

use crate::banners::{DIFF_BANNER, END_BANNER, START_BANNER};
use crate::cli_args::{LockArgs, MergeArgs, ShowArgs, detector_for};
use crate::diff::render_changes;
use crate::environment;
use crate::error::AppError;
use crate::merge::{ConflictResolver, MergeMode, MergeOutcome, PromptResolver, merge_with};
use crate::printer::write_scenarios;
use crate::scenario::{ScenarioCollection, ScenarioDocument};
use crate::store;
use crate::summary::{write_report, write_warnings};

fn is_broken_pipe_io(err: &io::Error) -> bool {
    err.kind() == ErrorKind::BrokenPipe
}

/// Run `print`, returning `true` when stdout has been closed.
fn handle_output<F>(print: F, label: &str) -> bool
where
    F: FnOnce() -> io::Result<()>,
{
    if let Err(e) = print() {
        if is_broken_pipe_io(&e) {
            return true;
        }
        error!("error printing {label}: {e}");
    }
    false
}

fn use_color() -> bool {
    !environment::is_set("NO_COLOR") && io::stdout().is_terminal()
}

fn write_merge_output<W: Write>(
    out: &mut W,
    outcome: &MergeOutcome,
    diff: Option<&str>,
) -> io::Result<()> {
    writeln!(out, "{START_BANNER}")?;
    write_report(&mut *out, &outcome.report)?;
    write_warnings(&mut *out, &outcome.warnings)?;
    if let Some(diff) = diff {
        writeln!(out, "{DIFF_BANNER}")?;
        if diff.is_empty() {
            writeln!(out, "No changes.")?;
        } else {
            out.write_all(diff.as_bytes())?;
        }
    }
    writeln!(out, "{END_BANNER}")
}

/// Merge the proposed file into the existing one and persist the result.
///
/// The report, any warnings and (with `--diff` or `--dry-run`) a preview of
/// the changes are written to `out`. Nothing is written to disk for a dry
/// run, or when the merge changed nothing and the output is the existing
/// file.
///
/// # Errors
///
/// Returns [`AppError`] when an argument is missing, the proposal does not
/// exist, a marker is invalid or a file cannot be read or written.
pub fn execute_merge<W: Write>(
    args: &MergeArgs,
    resolver: Option<&mut dyn ConflictResolver>,
    mut out: W,
) -> Result<MergeOutcome, AppError> {
    let existing_path = args
        .existing
        .as_deref()
        .ok_or(AppError::MissingArgument("EXISTING"))?;
    let proposed_path = args
        .proposed
        .as_deref()
        .ok_or(AppError::MissingArgument("PROPOSED"))?;
    let output_path = args.output.as_deref().unwrap_or(existing_path);
    if !proposed_path.exists() {
        return Err(AppError::MissingProposal(proposed_path.to_path_buf()));
    }
    let settings = args.settings()?;

    let existed = existing_path.exists();
    let existing = store::load(existing_path)?;
    let proposal = store::load(proposed_path)?;
    let feature = existing.feature.clone().or_else(|| proposal.feature.clone());
    let layout = if existed {
        existing.layout
    } else {
        proposal.layout
    };
    let before = (args.diff || args.dry_run).then(|| existing.scenarios.clone());

    info!(
        "merging {} into {} ({} mode)",
        proposed_path.display(),
        existing_path.display(),
        settings.mode
    );
    let outcome = merge_with(
        existing.scenarios,
        proposal.scenarios,
        settings.mode,
        &settings.detector,
        resolver,
    );
    for w in &outcome.warnings {
        warn!("{w}");
    }

    let diff = before
        .map(|b| render_changes(&b, &outcome.merged, use_color()))
        .transpose()
        .map_err(io::Error::other)?;
    let _ = handle_output(
        || write_merge_output(&mut out, &outcome, diff.as_deref()),
        "merge report",
    );

    if args.dry_run {
        info!("dry run; {} left untouched", output_path.display());
        return Ok(outcome);
    }
    let pristine = !outcome.report.has_changes() && outcome.warnings.is_empty();
    if pristine && existed && output_path == existing_path {
        info!("no changes; {} left untouched", output_path.display());
        return Ok(outcome);
    }

    if args.backup {
        store::backup(output_path)?;
    }
    let doc = ScenarioDocument {
        feature,
        updated_at: None,
        scenarios: outcome.merged.clone(),
        layout,
    };
    store::save(output_path, &doc)?;
    Ok(outcome)
}

/// Entry point for `scenmerge merge`.
///
/// Selective mode prompts on the terminal for every shared id. Without an
/// interactive stdin it falls back to the plain merge rule.
///
/// # Errors
///
/// Propagates any error from [`execute_merge`].
pub fn run_merge(args: &MergeArgs) -> Result<(), AppError> {
    let stdout = io::stdout();
    let selective = args.mode == Some(MergeMode::Selective);
    if selective && io::stdin().is_terminal() {
        let mut prompt = PromptResolver::new(io::stdin().lock(), io::stderr());
        execute_merge(args, Some(&mut prompt), stdout.lock())?;
    } else {
        if selective {
            info!("stdin is not a terminal; selective mode falls back to merge");
        }
        execute_merge(args, None, stdout.lock())?;
    }
    Ok(())
}

/// Entry point for `scenmerge show`.
///
/// # Errors
///
/// Returns [`AppError`] if the file cannot be loaded or stdout fails.
pub fn run_show(args: &ShowArgs) -> Result<(), AppError> {
    let path = args
        .file
        .as_deref()
        .ok_or(AppError::MissingArgument("FILE"))?;
    let detector = detector_for(&args.markers)?;
    let doc = store::load(path)?;
    let skin = MadSkin::default();
    if let Err(e) = write_scenarios(
        io::stdout().lock(),
        &skin,
        doc.feature.as_deref(),
        &doc.scenarios,
        &detector,
    ) {
        if !is_broken_pipe_io(&e) {
            return Err(e.into());
        }
    }
    Ok(())
}

/// Set or clear `locked` on every record named in `ids`.
///
/// Returns the number of records whose flag changed, or the ids that are not
/// in `collection`. Nothing is modified when any id is unknown.
///
/// # Errors
///
/// Returns the unknown ids in the order given.
pub fn set_locked(
    collection: &mut ScenarioCollection,
    ids: &[String],
    locked: bool,
) -> Result<usize, Vec<String>> {
    let unknown: Vec<String> = ids
        .iter()
        .filter(|id| collection.get(id).is_none())
        .cloned()
        .collect();
    if !unknown.is_empty() {
        return Err(unknown);
    }
    let mut changed = 0;
    for record in collection.iter_mut() {
        if record.locked != locked && ids.contains(&record.id) {
            record.locked = locked;
            changed += 1;
        }
    }
    Ok(changed)
}

/// Entry point for `scenmerge lock`.
///
/// # Errors
///
/// Returns [`AppError::UnknownScenario`] without touching the file when an
/// id is not present, or a store error if the file cannot be rewritten.
pub fn run_lock(args: &LockArgs) -> Result<(), AppError> {
    let path = args
        .file
        .as_deref()
        .ok_or(AppError::MissingArgument("FILE"))?;
    let mut doc = store::load(path)?;
    let changed = set_locked(&mut doc.scenarios, &args.ids, !args.unlock).map_err(|ids| {
        AppError::UnknownScenario {
            file: path.display().to_string(),
            ids: ids.join(", "),
        }
    })?;
    if changed > 0 {
        store::save(path, &doc)?;
    }
    let verb = if args.unlock { "unlocked" } else { "locked" };
    let _ = handle_output(
        || {
            writeln!(
                io::stdout().lock(),
                "{verb} {changed} scenario(s) in {}",
                path.display()
            )
        },
        "lock summary",
    );
    Ok(())
}
