//! Utilities for rendering merge reports.
//!
//! Functions in this module turn a [`MergeReport`] and its warnings into
//! human-readable text on any writer.

use std::io::Write;

use crate::merge::{MergeReport, MergeWarning, RecordOutcome};

/// Display order of outcome counts.
const OUTCOME_ORDER: &[RecordOutcome] = &[
    RecordOutcome::Added,
    RecordOutcome::Updated,
    RecordOutcome::Frozen,
    RecordOutcome::KeptByResolver,
    RecordOutcome::ReplacedByResolver,
    RecordOutcome::Unchanged,
    RecordOutcome::Retained,
    RecordOutcome::Dropped,
];

/// Count ids per outcome, skipping outcomes that did not occur.
///
/// # Examples
///
/// ```
/// use scenmerge::{MergeMode, RecordOutcome, ScenarioRecord, merge};
/// use scenmerge::summary::summarize_outcomes;
///
/// let outcome = merge(
///     Default::default(),
///     vec![ScenarioRecord::new("a", ["x"])].into(),
///     MergeMode::Merge,
/// );
/// assert_eq!(summarize_outcomes(&outcome.report), vec![(RecordOutcome::Added, 1)]);
/// ```
#[must_use]
pub fn summarize_outcomes(report: &MergeReport) -> Vec<(RecordOutcome, usize)> {
    OUTCOME_ORDER
        .iter()
        .map(|o| (*o, report.count(*o)))
        .filter(|(_, n)| *n > 0)
        .collect()
}

/// Write the outcome counts followed by one line per id that was not simply
/// retained.
///
/// # Errors
///
/// Returns an error if writing to the provided output fails.
pub fn write_report<W: Write>(mut out: W, report: &MergeReport) -> std::io::Result<()> {
    let counts = summarize_outcomes(report);
    if counts.is_empty() {
        writeln!(out, "No scenarios.")?;
        return Ok(());
    }
    writeln!(out, "Summary:")?;
    for (outcome, count) in &counts {
        let label = if *count == 1 { "scenario" } else { "scenarios" };
        writeln!(out, "{}: {count} {label}", outcome.label())?;
    }
    let notable: Vec<_> = report
        .entries()
        .iter()
        .filter(|(_, o)| !matches!(o, RecordOutcome::Retained | RecordOutcome::Unchanged))
        .collect();
    if !notable.is_empty() {
        writeln!(out)?;
        for (id, outcome) in notable {
            writeln!(out, "  {:<9} {id}", outcome.label())?;
        }
    }
    Ok(())
}

/// Write each warning on its own line.
///
/// # Errors
///
/// Returns an error if writing to the provided output fails.
pub fn write_warnings<W: Write>(mut out: W, warnings: &[MergeWarning]) -> std::io::Result<()> {
    for w in warnings {
        writeln!(out, "warning: {w}")?;
    }
    Ok(())
}
