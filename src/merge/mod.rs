//! Reconciliation of existing and regenerated scenario collections.
//!
//! [`merge`] combines an existing [`ScenarioCollection`] with a freshly
//! generated proposal for the same feature. The default [`MergeMode::Merge`]
//! policy updates machine-authored records, appends new ones and leaves any
//! record a person has customized exactly as it was.
//!
//! The engine is a pure in-memory transformation. Problems with individual
//! records are collected as [`MergeWarning`]s alongside the result rather than
//! aborting the merge.

use std::collections::{HashMap, HashSet};
use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::customization::CustomizationDetector;
use crate::scenario::{ScenarioCollection, ScenarioRecord};

mod resolver;

pub use resolver::{Conflict, ConflictResolver, PromptResolver, Resolution, resolver_fn};

/// Policy governing how existing and proposed scenarios are combined.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum MergeMode {
    /// Per-id reconciliation that freezes customized records.
    #[default]
    Merge,
    /// Keep existing records untouched and add only unseen ids.
    Append,
    /// Like `Merge`, but every shared id is put to a [`ConflictResolver`].
    Selective,
    /// Discard the existing collection and take the proposal.
    ReplaceAll,
}

impl MergeMode {
    /// Lower-case name used on the command line and in configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Merge => "merge",
            Self::Append => "append",
            Self::Selective => "selective",
            Self::ReplaceAll => "replace-all",
        }
    }
}

impl fmt::Display for MergeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-fatal problem found while merging.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MergeWarning {
    /// A proposed record had no id and was left out.
    #[error("proposed scenario at position {index} has no id and was skipped")]
    InvalidProposedRecord { index: usize },
    /// A proposed id repeated an earlier proposed record and was left out.
    #[error("proposed scenario '{id}' at position {index} repeats an earlier id and was skipped")]
    DuplicateProposedId { id: String, index: usize },
    /// The existing collection repeated an id; only the first copy is kept.
    #[error("existing scenario '{id}' at position {index} repeats an earlier id and was dropped")]
    DuplicateExistingId { id: String, index: usize },
    /// A resolver returned a record with another id; the original id was restored.
    #[error("resolver changed the id of scenario '{id}'; the original id was kept")]
    ResolverChangedId { id: String },
}

/// What happened to a single id during a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordOutcome {
    /// Only present in the existing collection; kept as is.
    Retained,
    /// Customized existing record kept verbatim despite a proposal.
    Frozen,
    /// Existing record refreshed from the proposal.
    Updated,
    /// Proposal matched the existing record exactly.
    Unchanged,
    /// New id taken from the proposal.
    Added,
    /// Resolver chose the existing record.
    KeptByResolver,
    /// Resolver chose the proposal or supplied its own record.
    ReplacedByResolver,
    /// Existing id discarded by [`MergeMode::ReplaceAll`].
    Dropped,
}

impl RecordOutcome {
    /// Short label used in reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Retained => "retained",
            Self::Frozen => "frozen",
            Self::Updated => "updated",
            Self::Unchanged => "unchanged",
            Self::Added => "added",
            Self::KeptByResolver => "kept",
            Self::ReplacedByResolver => "replaced",
            Self::Dropped => "dropped",
        }
    }
}

/// Per-id outcomes in output order, followed by dropped ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    entries: Vec<(String, RecordOutcome)>,
}

impl MergeReport {
    fn record(&mut self, id: &str, outcome: RecordOutcome) {
        debug!("scenario '{id}': {}", outcome.label());
        self.entries.push((id.to_owned(), outcome));
    }

    /// All `(id, outcome)` pairs.
    #[must_use]
    pub fn entries(&self) -> &[(String, RecordOutcome)] {
        &self.entries
    }

    /// Number of ids with the given outcome.
    #[must_use]
    pub fn count(&self, outcome: RecordOutcome) -> usize {
        self.entries.iter().filter(|(_, o)| *o == outcome).count()
    }

    /// Outcome recorded for `id`, if any.
    #[must_use]
    pub fn outcome_of(&self, id: &str) -> Option<RecordOutcome> {
        self.entries
            .iter()
            .find_map(|(i, o)| (i == id).then_some(*o))
    }

    /// Whether the merge changed anything relative to the existing collection.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.entries.iter().any(|(_, o)| {
            matches!(
                o,
                RecordOutcome::Updated
                    | RecordOutcome::Added
                    | RecordOutcome::ReplacedByResolver
                    | RecordOutcome::Dropped
            )
        })
    }
}

/// Result of a merge: the new collection plus diagnostics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeOutcome {
    pub merged: ScenarioCollection,
    pub warnings: Vec<MergeWarning>,
    pub report: MergeReport,
}

/// Merge `proposed` into `old` with the default markers and no resolver.
///
/// [`MergeMode::Selective`] therefore behaves like [`MergeMode::Merge`].
///
/// # Examples
///
/// ```
/// use scenmerge::{MergeMode, ScenarioRecord, merge};
///
/// let old = vec![ScenarioRecord::new("A", ["// Custom: x"]).with_priority("high")].into();
/// let proposed = vec![ScenarioRecord::new("A", ["y"]).with_priority("low")].into();
/// let outcome = merge(old, proposed, MergeMode::Merge);
/// assert_eq!(outcome.merged.as_slice()[0].steps, ["// Custom: x"]);
/// ```
#[must_use]
pub fn merge(
    old: ScenarioCollection,
    proposed: ScenarioCollection,
    mode: MergeMode,
) -> MergeOutcome {
    merge_with(old, proposed, mode, &CustomizationDetector::default(), None)
}

/// Merge `proposed` into `old` using `detector` and, for
/// [`MergeMode::Selective`], `resolver`.
///
/// Every mode runs in `O(n + m)` using hash indexes keyed by id.
#[must_use]
pub fn merge_with(
    old: ScenarioCollection,
    proposed: ScenarioCollection,
    mode: MergeMode,
    detector: &CustomizationDetector,
    resolver: Option<&mut dyn ConflictResolver>,
) -> MergeOutcome {
    let mut warnings = Vec::new();
    let proposed = validate_proposed(proposed, &mut warnings);
    let mut report = MergeReport::default();

    let merged = match mode {
        MergeMode::ReplaceAll => replace_all(old, proposed, &mut report),
        MergeMode::Append => {
            let old = dedupe_existing(old, &mut warnings);
            append(old, proposed, &mut report)
        }
        MergeMode::Merge => {
            let old = dedupe_existing(old, &mut warnings);
            reconcile(old, proposed, detector, None, &mut warnings, &mut report)
        }
        MergeMode::Selective => {
            let old = dedupe_existing(old, &mut warnings);
            reconcile(old, proposed, detector, resolver, &mut warnings, &mut report)
        }
    };

    MergeOutcome {
        merged,
        warnings,
        report,
    }
}

/// Shallow union of a machine-authored record with its regenerated proposal.
///
/// Every modelled field comes from the proposal, including fields it leaves
/// unset, except `priority`, which keeps the existing value when it is
/// non-empty. Keys outside the model are unioned with the proposal winning.
#[must_use]
pub fn union_records(existing: &ScenarioRecord, proposed: &ScenarioRecord) -> ScenarioRecord {
    let priority = existing
        .effective_priority()
        .map(str::to_owned)
        .or_else(|| proposed.priority.clone());
    let mut extra = existing.extra.clone();
    extra.extend(proposed.extra.clone());
    ScenarioRecord {
        id: existing.id.clone(),
        priority,
        locked: existing.locked,
        extra,
        ..proposed.clone()
    }
}

/// Apply the per-id rule to a shared id without consulting a resolver.
fn smart_merge(
    existing: &ScenarioRecord,
    proposed: &ScenarioRecord,
    customized: bool,
) -> (ScenarioRecord, RecordOutcome) {
    if customized {
        return (existing.clone(), RecordOutcome::Frozen);
    }
    let merged = union_records(existing, proposed);
    let outcome = if merged == *existing {
        RecordOutcome::Unchanged
    } else {
        RecordOutcome::Updated
    };
    (merged, outcome)
}

fn validate_proposed(
    proposed: ScenarioCollection,
    warnings: &mut Vec<MergeWarning>,
) -> Vec<ScenarioRecord> {
    let mut seen = HashSet::new();
    let mut valid = Vec::with_capacity(proposed.len());
    for (index, record) in proposed.into_iter().enumerate() {
        if !record.has_id() {
            warnings.push(MergeWarning::InvalidProposedRecord { index });
            continue;
        }
        if !seen.insert(record.id.clone()) {
            warnings.push(MergeWarning::DuplicateProposedId {
                id: record.id,
                index,
            });
            continue;
        }
        valid.push(record);
    }
    valid
}

fn dedupe_existing(
    old: ScenarioCollection,
    warnings: &mut Vec<MergeWarning>,
) -> Vec<ScenarioRecord> {
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(old.len());
    for (index, record) in old.into_iter().enumerate() {
        if seen.insert(record.id.clone()) {
            kept.push(record);
        } else {
            warnings.push(MergeWarning::DuplicateExistingId {
                id: record.id,
                index,
            });
        }
    }
    kept
}

fn replace_all(
    old: ScenarioCollection,
    proposed: Vec<ScenarioRecord>,
    report: &mut MergeReport,
) -> ScenarioCollection {
    let index: HashMap<&str, &ScenarioRecord> =
        old.iter().map(|r| (r.id.as_str(), r)).collect();
    let proposed_ids: HashSet<&str> = proposed.iter().map(|r| r.id.as_str()).collect();
    for record in &proposed {
        let outcome = match index.get(record.id.as_str()) {
            Some(existing) if *existing == record => RecordOutcome::Unchanged,
            Some(_) => RecordOutcome::Updated,
            None => RecordOutcome::Added,
        };
        report.record(&record.id, outcome);
    }
    let mut dropped = HashSet::new();
    for id in old.ids() {
        if !proposed_ids.contains(id) && dropped.insert(id) {
            report.record(id, RecordOutcome::Dropped);
        }
    }
    proposed.into()
}

fn append(
    old: Vec<ScenarioRecord>,
    proposed: Vec<ScenarioRecord>,
    report: &mut MergeReport,
) -> ScenarioCollection {
    let existing: HashSet<String> = old.iter().map(|r| r.id.clone()).collect();
    for record in &old {
        report.record(&record.id, RecordOutcome::Retained);
    }
    let mut merged = old;
    for record in proposed {
        if !existing.contains(&record.id) {
            report.record(&record.id, RecordOutcome::Added);
            merged.push(record);
        }
    }
    merged.into()
}

fn reconcile(
    old: Vec<ScenarioRecord>,
    proposed: Vec<ScenarioRecord>,
    detector: &CustomizationDetector,
    mut resolver: Option<&mut dyn ConflictResolver>,
    warnings: &mut Vec<MergeWarning>,
    report: &mut MergeReport,
) -> ScenarioCollection {
    let mut pending: HashMap<String, ScenarioRecord> = HashMap::with_capacity(proposed.len());
    let mut order = Vec::with_capacity(proposed.len());
    for record in proposed {
        order.push(record.id.clone());
        pending.insert(record.id.clone(), record);
    }

    let mut merged = Vec::with_capacity(old.len() + pending.len());
    for existing in old {
        let Some(candidate) = pending.remove(&existing.id) else {
            report.record(&existing.id, RecordOutcome::Retained);
            merged.push(existing);
            continue;
        };
        let customized = detector.is_customized(&existing);
        let (record, outcome) = match resolver.as_deref_mut() {
            Some(r) => resolve_conflict(r, &existing, &candidate, customized, warnings),
            None => smart_merge(&existing, &candidate, customized),
        };
        report.record(&record.id, outcome);
        merged.push(record);
    }

    for id in order {
        if let Some(record) = pending.remove(&id) {
            report.record(&record.id, RecordOutcome::Added);
            merged.push(record);
        }
    }
    merged.into()
}

fn resolve_conflict(
    resolver: &mut dyn ConflictResolver,
    existing: &ScenarioRecord,
    proposed: &ScenarioRecord,
    customized: bool,
    warnings: &mut Vec<MergeWarning>,
) -> (ScenarioRecord, RecordOutcome) {
    let (suggested, suggested_outcome) = smart_merge(existing, proposed, customized);
    let conflict = Conflict {
        existing,
        proposed,
        customized,
        suggested: &suggested,
    };
    match resolver.resolve(&conflict) {
        Resolution::SmartMerge => (suggested, suggested_outcome),
        Resolution::KeepExisting => (existing.clone(), RecordOutcome::KeptByResolver),
        Resolution::AcceptProposed => (proposed.clone(), RecordOutcome::ReplacedByResolver),
        Resolution::Replace(mut record) => {
            if record.id != existing.id {
                warnings.push(MergeWarning::ResolverChangedId {
                    id: existing.id.clone(),
                });
                record.id.clone_from(&existing.id);
            }
            (record, RecordOutcome::ReplacedByResolver)
        }
    }
}
