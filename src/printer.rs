//! Helpers for printing scenario collections.
//!
//! Collections are rendered as a markdown table and formatted with
//! `termimad`, keeping the table text separate from the terminal output so
//! it can be unit tested without capturing stdout.

use std::io::Write;

use termimad::MadSkin;

use crate::customization::CustomizationDetector;
use crate::scenario::{ScenarioCollection, ScenarioRecord};

fn cell(text: &str) -> String {
    text.replace('|', "/").replace('\n', " ")
}

fn status(record: &ScenarioRecord, detector: &CustomizationDetector) -> &'static str {
    if record.locked {
        "locked"
    } else if detector.is_customized(record) {
        "customized"
    } else {
        "generated"
    }
}

/// Build the markdown table listing every scenario.
#[must_use]
pub fn scenario_table(collection: &ScenarioCollection, detector: &CustomizationDetector) -> String {
    let mut md = String::from("|id|priority|steps|status|\n|:-|:-|-:|:-|\n");
    for record in collection {
        md.push_str(&format!(
            "|{}|{}|{}|{}|\n",
            cell(&record.id),
            cell(record.effective_priority().unwrap_or("-")),
            record.steps.len(),
            status(record, detector),
        ));
    }
    md
}

/// Write the scenario table for `collection`, or a note when it is empty.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_scenarios<W: Write>(
    mut out: W,
    skin: &MadSkin,
    feature: Option<&str>,
    collection: &ScenarioCollection,
    detector: &CustomizationDetector,
) -> std::io::Result<()> {
    if let Some(feature) = feature {
        writeln!(out, "\x1b[1m{feature}\x1b[0m")?;
    }
    if collection.is_empty() {
        writeln!(out, "No scenarios.")?;
        return Ok(());
    }
    skin.write_text_on(&mut out, &scenario_table(collection, detector))
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    Ok(())
}
