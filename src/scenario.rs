//! Scenario records and collections.
//!
//! A [`ScenarioRecord`] describes one test case. Records are grouped into a
//! [`ScenarioCollection`] per feature and persisted inside a
//! [`ScenarioDocument`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One test case: identifier, classification metadata and ordered steps.
///
/// Field names follow the camel-case layout used by scenario files.
/// Keys the struct does not model are kept in `extra` so a round trip never
/// loses them.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioRecord {
    /// Stable identifier; the join key between collections.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jira_tickets: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<String>,
    /// Set by a person to stop regeneration from touching this record.
    #[serde(default, skip_serializing_if = "crate::bool_predicates::not")]
    pub locked: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ScenarioRecord {
    /// Build a record with an id and steps, leaving metadata empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use scenmerge::ScenarioRecord;
    ///
    /// let record = ScenarioRecord::new("login", ["open page", "submit form"]);
    /// assert_eq!(record.steps.len(), 2);
    /// ```
    #[must_use]
    pub fn new<I, S>(id: impl Into<String>, steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            steps: steps.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Set the priority, consuming and returning `self`.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Priority when present and non-empty.
    #[must_use]
    pub fn effective_priority(&self) -> Option<&str> {
        self.priority.as_deref().filter(|p| !p.is_empty())
    }

    /// Whether the record carries an identifier. Only the empty string is
    /// rejected; ids are otherwise compared verbatim.
    #[must_use]
    pub fn has_id(&self) -> bool {
        !self.id.is_empty()
    }
}

/// Ordered scenarios for one feature. Order is display order only.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ScenarioCollection(Vec<ScenarioRecord>);

impl ScenarioCollection {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScenarioRecord> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, ScenarioRecord> {
        self.0.iter_mut()
    }

    pub fn push(&mut self, record: ScenarioRecord) {
        self.0.push(record);
    }

    /// Look up a record by id with a linear scan.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ScenarioRecord> {
        self.0.iter().find(|r| r.id == id)
    }

    /// Identifiers in display order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|r| r.id.as_str())
    }

    #[must_use]
    pub fn as_slice(&self) -> &[ScenarioRecord] {
        &self.0
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<ScenarioRecord> {
        self.0
    }
}

impl From<Vec<ScenarioRecord>> for ScenarioCollection {
    fn from(records: Vec<ScenarioRecord>) -> Self {
        Self(records)
    }
}

impl FromIterator<ScenarioRecord> for ScenarioCollection {
    fn from_iter<I: IntoIterator<Item = ScenarioRecord>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ScenarioCollection {
    type Item = ScenarioRecord;
    type IntoIter = std::vec::IntoIter<ScenarioRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ScenarioCollection {
    type Item = &'a ScenarioRecord;
    type IntoIter = std::slice::Iter<'a, ScenarioRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// How a document was laid out when read, so it can be written back the
/// same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// `{ "feature": ..., "scenarios": [...] }`
    #[default]
    Document,
    /// A top-level array of records.
    Bare,
}

/// Persisted container for one feature's scenarios.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub scenarios: ScenarioCollection,
    #[serde(skip)]
    pub layout: Layout,
}

impl ScenarioDocument {
    /// Wrap a collection in a document with no feature name.
    #[must_use]
    pub fn from_collection(scenarios: ScenarioCollection) -> Self {
        Self {
            scenarios,
            ..Self::default()
        }
    }
}
