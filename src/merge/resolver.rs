//! Decision hooks for selective merging.

use std::io::{BufRead, Write};

use log::warn;

use crate::scenario::ScenarioRecord;

/// A shared id awaiting a decision.
#[derive(Debug, Clone, Copy)]
pub struct Conflict<'a> {
    pub existing: &'a ScenarioRecord,
    pub proposed: &'a ScenarioRecord,
    /// Whether `existing` carries a customization marker or is locked.
    pub customized: bool,
    /// Record the default merge rule would produce.
    pub suggested: &'a ScenarioRecord,
}

/// Choice returned by a [`ConflictResolver`].
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Keep the existing record verbatim.
    KeepExisting,
    /// Take the proposed record verbatim.
    AcceptProposed,
    /// Apply the default merge rule (`Conflict::suggested`).
    SmartMerge,
    /// Use this record instead. Its id is forced to the conflicting id.
    Replace(ScenarioRecord),
}

/// Decides the fate of ids present in both collections.
pub trait ConflictResolver {
    fn resolve(&mut self, conflict: &Conflict<'_>) -> Resolution;
}

impl<F> ConflictResolver for F
where
    F: FnMut(&Conflict<'_>) -> Resolution,
{
    fn resolve(&mut self, conflict: &Conflict<'_>) -> Resolution {
        self(conflict)
    }
}

/// Pin a closure to the [`ConflictResolver`] signature.
///
/// Closures stored in a variable before use do not always infer a signature
/// general enough for the blanket impl; passing them through here does.
pub fn resolver_fn<F>(f: F) -> F
where
    F: FnMut(&Conflict<'_>) -> Resolution,
{
    f
}

/// Asks a person for each conflict over a line-oriented terminal.
///
/// Answers: `k` keep existing, `p` take proposed, `m` (or empty) merge.
/// Unreadable input or end of input falls back to the merge rule.
pub struct PromptResolver<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptResolver<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, conflict: &Conflict<'_>) -> std::io::Result<Option<String>> {
        let existing = conflict.existing;
        writeln!(self.output, "Scenario '{}' exists in both collections.", existing.id)?;
        if conflict.customized {
            writeln!(self.output, "  existing record is customized and will be kept by merge")?;
        }
        writeln!(
            self.output,
            "  existing: {} step(s), proposed: {} step(s)",
            existing.steps.len(),
            conflict.proposed.steps.len()
        )?;
        write!(self.output, "[k]eep existing / [p]roposed / [m]erge (default): ")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_ascii_lowercase()))
    }
}

impl<R: BufRead, W: Write> ConflictResolver for PromptResolver<R, W> {
    fn resolve(&mut self, conflict: &Conflict<'_>) -> Resolution {
        loop {
            match self.ask(conflict) {
                Ok(Some(answer)) => match answer.as_str() {
                    "k" | "keep" => return Resolution::KeepExisting,
                    "p" | "proposed" => return Resolution::AcceptProposed,
                    "" | "m" | "merge" => return Resolution::SmartMerge,
                    other => {
                        if let Err(e) = writeln!(self.output, "unrecognised answer '{other}'") {
                            warn!("prompt failed for scenario '{}': {e}", conflict.existing.id);
                            return Resolution::SmartMerge;
                        }
                    }
                },
                Ok(None) => return Resolution::SmartMerge,
                Err(e) => {
                    warn!("prompt failed for scenario '{}': {e}", conflict.existing.id);
                    return Resolution::SmartMerge;
                }
            }
        }
    }
}
