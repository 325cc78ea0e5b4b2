//! Detection of hand-edited scenarios.
//!
//! A scenario counts as customized when it is explicitly `locked` or when
//! any step contains one of the configured marker substrings. Markers are an
//! in-band convention, so edits made without one are not detected.

use regex::Regex;

use crate::scenario::ScenarioRecord;

/// Markers recognised when none are configured.
pub const DEFAULT_MARKERS: &[&str] = &["// Custom", "// TODO"];

fn compile(markers: &[String]) -> Result<Option<Regex>, regex::Error> {
    if markers.is_empty() {
        return Ok(None);
    }
    let alternation = markers
        .iter()
        .map(|m| regex::escape(m))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&alternation).map(Some)
}

/// Scans scenario steps for customization markers.
///
/// The markers are matched literally and compiled into a single pattern so
/// each step is scanned once regardless of how many markers exist.
#[derive(Debug, Clone)]
pub struct CustomizationDetector {
    markers: Vec<String>,
    pattern: Option<Regex>,
}

impl CustomizationDetector {
    /// Build a detector from literal markers. Blank markers are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`regex::Error`] if the combined pattern exceeds the regex size
    /// limit.
    ///
    /// # Examples
    ///
    /// ```
    /// use scenmerge::{CustomizationDetector, ScenarioRecord};
    ///
    /// let detector = CustomizationDetector::new(["@manual"]).expect("detector");
    /// let record = ScenarioRecord::new("a", ["click save @manual"]);
    /// assert!(detector.is_customized(&record));
    /// ```
    pub fn new<I, S>(markers: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let markers: Vec<String> = markers
            .into_iter()
            .map(Into::into)
            .filter(|m| !m.trim().is_empty())
            .collect();
        let pattern = compile(&markers)?;
        Ok(Self { markers, pattern })
    }

    /// Markers this detector looks for.
    #[must_use]
    pub fn markers(&self) -> &[String] {
        &self.markers
    }

    /// Whether a single step carries a marker.
    #[must_use]
    pub fn step_is_marked(&self, step: &str) -> bool {
        self.pattern.as_ref().is_some_and(|p| p.is_match(step))
    }

    /// Whether `record` must be left untouched by regeneration.
    #[must_use]
    pub fn is_customized(&self, record: &ScenarioRecord) -> bool {
        record.locked || record.steps.iter().any(|s| self.step_is_marked(s))
    }
}

impl Default for CustomizationDetector {
    fn default() -> Self {
        let markers: Vec<String> = DEFAULT_MARKERS.iter().map(|m| (*m).to_owned()).collect();
        // Escaped literals joined by `|` always form a valid pattern.
        let pattern = compile(&markers).ok().flatten();
        Self { markers, pattern }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("// Custom: wait for spinner", true)]
    #[case("click // TODO confirm selector", true)]
    #[case("// custom lowercase", false)]
    #[case("plain step", false)]
    fn default_markers(#[case] step: &str, #[case] expected: bool) {
        let detector = CustomizationDetector::default();
        assert_eq!(detector.step_is_marked(step), expected);
    }

    #[test]
    fn markers_are_literal() {
        let detector = CustomizationDetector::new(["a.b"]).expect("detector");
        assert!(detector.step_is_marked("xa.bx"));
        assert!(!detector.step_is_marked("axb"));
    }

    #[test]
    fn locked_record_is_customized_without_markers() {
        let detector = CustomizationDetector::new(Vec::<String>::new()).expect("detector");
        let mut record = ScenarioRecord::new("a", ["// Custom: ignored"]);
        assert!(!detector.is_customized(&record));
        record.locked = true;
        assert!(detector.is_customized(&record));
    }

    #[test]
    fn blank_markers_are_dropped() {
        let detector = CustomizationDetector::new(["", "  ", "@keep"]).expect("detector");
        assert_eq!(detector.markers(), ["@keep"]);
        assert!(!detector.step_is_marked("anything"));
    }
}
