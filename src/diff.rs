//! Unified diffs between an existing collection and a merge result.

use std::collections::{HashMap, HashSet};
use std::fmt::Write;

use diffy::{PatchFormatter, create_patch};

use crate::scenario::{ScenarioCollection, ScenarioRecord};

fn pretty(record: &ScenarioRecord) -> String {
    let mut text = serde_json::to_string_pretty(record).unwrap_or_else(|e| format!("<{e}>"));
    text.push('\n');
    text
}

/// Render one patch per record that differs between `old` and `merged`.
///
/// Records are compared by id. Each patch is headed by `--- <id>` and
/// `+++ <id>` lines; added records appear as pure additions and records
/// missing from `merged` as pure removals. Unchanged records produce no
/// output.
///
/// # Errors
///
/// Returns an error if writing to the output string fails.
///
/// # Examples
///
/// ```
/// use scenmerge::ScenarioRecord;
/// use scenmerge::diff::render_changes;
///
/// let old = vec![ScenarioRecord::new("a", ["x"])].into();
/// let new = vec![ScenarioRecord::new("a", ["y"])].into();
/// let out = render_changes(&old, &new, false).expect("render");
/// assert!(out.contains("-    \"x\""));
/// assert!(out.contains("+    \"y\""));
/// ```
pub fn render_changes(
    old: &ScenarioCollection,
    merged: &ScenarioCollection,
    color: bool,
) -> Result<String, std::fmt::Error> {
    let formatter = if color {
        PatchFormatter::new().with_color()
    } else {
        PatchFormatter::new()
    };
    let mut out = String::new();
    let mut write_patch = |id: &str, before: &str, after: &str| -> std::fmt::Result {
        let patch = create_patch(before, after);
        if patch.hunks().is_empty() {
            return Ok(());
        }
        let body = formatter.fmt_patch(&patch).to_string();
        // Swap diffy's `original`/`modified` header lines for the scenario id.
        let hunks: String = body.split_inclusive('\n').skip(2).collect();
        writeln!(out, "--- {id}\n+++ {id}")?;
        out.push_str(&hunks);
        if !hunks.ends_with('\n') {
            out.push('\n');
        }
        Ok(())
    };

    let before_by_id: HashMap<&str, &ScenarioRecord> =
        old.iter().map(|r| (r.id.as_str(), r)).collect();
    let merged_ids: HashSet<&str> = merged.ids().collect();
    for record in merged {
        let before = before_by_id
            .get(record.id.as_str())
            .copied()
            .map(pretty)
            .unwrap_or_default();
        write_patch(&record.id, &before, &pretty(record))?;
    }
    for record in old {
        if !merged_ids.contains(record.id.as_str()) {
            write_patch(&record.id, &pretty(record), "")?;
        }
    }
    Ok(out)
}
