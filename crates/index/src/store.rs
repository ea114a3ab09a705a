//! JSON knowledge file: the dataset the index is built from.
//!
//! Two layouts are accepted:
//!
//! - grouped: `{"professors": [...], "dining": [...], ...}`, one array per
//!   category, any of which may be missing
//! - flat: `[{"category": "dining", "name": "The Lair", ...}, ...]`
//!
//! The file is read on every [`KnowledgeStore::list_records`] call so that an
//! index rebuild picks up edits.

use std::path::{Path, PathBuf};

use campusbuddy_core::error::StoreError;
use campusbuddy_core::record::{KnowledgeBase, KnowledgeRecord};
use campusbuddy_core::store::KnowledgeStore;
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse dataset text in either layout.
    pub fn parse(&self, content: &str) -> Result<Vec<KnowledgeRecord>, StoreError> {
        let parse_error = |e: serde_json::Error| StoreError::Parse {
            path: self.path.clone(),
            reason: e.to_string(),
        };

        let value: Value = serde_json::from_str(content).map_err(parse_error)?;
        match value {
            Value::Array(_) => serde_json::from_value(value).map_err(parse_error),
            Value::Object(_) => {
                let grouped: KnowledgeBase = serde_json::from_value(value).map_err(parse_error)?;
                Ok(grouped.into_records())
            }
            other => Err(StoreError::Parse {
                path: self.path.clone(),
                reason: format!("expected a JSON object or array, found {}", json_kind(&other)),
            }),
        }
    }
}

impl KnowledgeStore for JsonFileStore {
    fn list_records(&self) -> Result<Vec<KnowledgeRecord>, StoreError> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| StoreError::Read {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;

        let records = self.parse(&content)?;
        debug!(path = %self.path.display(), count = records.len(), "Loaded knowledge records");
        Ok(records)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
