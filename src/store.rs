//! Reading and writing scenario files.
//!
//! Files are JSON (`.json`) or YAML (`.yaml`, `.yml`) and hold either a
//! [`ScenarioDocument`] object or a bare array of records. A missing file is
//! the first-generation case and loads as an empty document.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::scenario::{Layout, ScenarioCollection, ScenarioDocument};

/// Errors raised by the scenario store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed scenario file {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("failed to serialise scenarios for {path}: {message}")]
    Serialize { path: PathBuf, message: String },
    #[error("unsupported scenario file extension for {0} (expected .json, .yaml or .yml)")]
    UnsupportedFormat(PathBuf),
}

/// On-disk encoding, chosen from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// Detect the format of `path` from its extension.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::UnsupportedFormat`] for any other extension.
    pub fn from_path(path: &Path) -> Result<Self, StoreError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => Err(StoreError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn parse_error(path: &Path, message: impl ToString) -> StoreError {
    StoreError::Parse {
        path: path.to_path_buf(),
        message: message.to_string(),
    }
}

/// Deserialize `value`, reporting the path of the offending field on failure.
fn from_value<T: DeserializeOwned>(path: &Path, value: Value) -> Result<T, StoreError> {
    serde_path_to_error::deserialize::<_, T>(value).map_err(|e| {
        let at = e.path().to_string();
        parse_error(path, format!("{} at `{at}`", e.into_inner()))
    })
}

/// Parse file contents into a document.
///
/// # Errors
///
/// Returns [`StoreError::Parse`] when the text is not valid for `format` or
/// does not describe a scenario collection.
pub fn parse(path: &Path, format: Format, text: &str) -> Result<ScenarioDocument, StoreError> {
    let value: Value = match format {
        Format::Json => serde_json::from_str(text).map_err(|e| parse_error(path, e))?,
        Format::Yaml => serde_yaml::from_str(text).map_err(|e| parse_error(path, e))?,
    };
    match value {
        Value::Array(_) => {
            let scenarios: ScenarioCollection = from_value(path, value)?;
            Ok(ScenarioDocument {
                scenarios,
                layout: Layout::Bare,
                ..ScenarioDocument::default()
            })
        }
        Value::Object(_) => from_value(path, value),
        // An empty YAML file parses as null.
        Value::Null => Ok(ScenarioDocument::default()),
        other => Err(parse_error(
            path,
            format!("expected an object or array of scenarios, found {other}"),
        )),
    }
}

/// Render a document in `format`, honouring its layout.
///
/// # Errors
///
/// Returns [`StoreError::Serialize`] if encoding fails.
pub fn render(path: &Path, format: Format, doc: &ScenarioDocument) -> Result<String, StoreError> {
    let to_err = |message: String| StoreError::Serialize {
        path: path.to_path_buf(),
        message,
    };
    let mut text = match (format, doc.layout) {
        (Format::Json, Layout::Document) => {
            serde_json::to_string_pretty(doc).map_err(|e| to_err(e.to_string()))?
        }
        (Format::Json, Layout::Bare) => {
            serde_json::to_string_pretty(&doc.scenarios).map_err(|e| to_err(e.to_string()))?
        }
        (Format::Yaml, Layout::Document) => {
            serde_yaml::to_string(doc).map_err(|e| to_err(e.to_string()))?
        }
        (Format::Yaml, Layout::Bare) => {
            serde_yaml::to_string(&doc.scenarios).map_err(|e| to_err(e.to_string()))?
        }
    };
    if !text.ends_with('\n') {
        text.push('\n');
    }
    Ok(text)
}

/// Load the document at `path`; a missing file yields an empty document.
///
/// # Errors
///
/// Returns [`StoreError`] if the file cannot be read or parsed.
pub fn load(path: &Path) -> Result<ScenarioDocument, StoreError> {
    let format = Format::from_path(path)?;
    match fs::read_to_string(path) {
        Ok(text) => {
            let doc = parse(path, format, &text)?;
            debug!(
                "loaded {} scenario(s) from {}",
                doc.scenarios.len(),
                path.display()
            );
            Ok(doc)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!(
                "{} does not exist; treating it as an empty collection",
                path.display()
            );
            Ok(ScenarioDocument::default())
        }
        Err(e) => Err(io_error(path, e)),
    }
}

/// Persist `doc` to `path`, stamping `updatedAt` for object layouts.
///
/// Content goes to a sibling temporary file first and is renamed over the
/// target so readers never see a partial file.
///
/// # Errors
///
/// Returns [`StoreError`] if encoding or any filesystem step fails.
pub fn save(path: &Path, doc: &ScenarioDocument) -> Result<(), StoreError> {
    let format = Format::from_path(path)?;
    let mut stamped = doc.clone();
    if stamped.layout == Layout::Document {
        stamped.updated_at = Some(Utc::now());
    }
    let text = render(path, format, &stamped)?;
    let tmp = sibling(path, "tmp");
    fs::write(&tmp, text).map_err(|e| io_error(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| io_error(path, e))?;
    info!(
        "wrote {} scenario(s) to {}",
        doc.scenarios.len(),
        path.display()
    );
    Ok(())
}

/// Copy the current file to `<file>.bak`, returning the backup path.
///
/// Returns `Ok(None)` when there is nothing to back up.
///
/// # Errors
///
/// Returns [`StoreError::Io`] if the copy fails.
pub fn backup(path: &Path) -> Result<Option<PathBuf>, StoreError> {
    if !path.exists() {
        return Ok(None);
    }
    let target = sibling(path, "bak");
    fs::copy(path, &target).map_err(|e| io_error(&target, e))?;
    info!("backed up {} to {}", path.display(), target.display());
    Ok(Some(target))
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(ToOwned::to_owned).unwrap_or_default();
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}
