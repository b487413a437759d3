//! Snapshot ingestion and the ordered-alias dataset accessor
//!
//! A snapshot is one immutable point-in-time export: a JSON object mapping
//! dataset name to an array of flat records. Some exported files are
//! structurally present but always empty, and some are present with a
//! non-array payload; both cases are retained so the accessor can tell
//! "present" apart from "absent".

use std::collections::HashMap;
use std::io::Read;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{SnapshotError, SnapshotResult};

/// One flat export record.
pub type Record = serde_json::Map<String, Value>;

/// A shared record row. Datasets and index maps hold `Arc` clones, so a
/// built index bundle is cheap and `Send + Sync`.
pub type Row = Arc<Record>;

/// What the snapshot holds under one dataset name.
#[derive(Debug, Clone)]
enum Slot {
    /// A tabular dataset, possibly empty.
    Table(Vec<Row>),
    /// Present in the export but not an array of records.
    Scalar,
}

/// An immutable ERP export snapshot.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    datasets: HashMap<String, Slot>,
}

impl Snapshot {
    /// Build a snapshot from an already-parsed JSON value. The root must be
    /// an object; dataset arrays keep their object rows and skip anything
    /// else.
    pub fn from_value(value: Value) -> SnapshotResult<Self> {
        let root = match value {
            Value::Object(map) => map,
            other => return Err(SnapshotError::NotAnObject(json_type_name(&other))),
        };

        let mut datasets = HashMap::with_capacity(root.len());
        let mut skipped = 0usize;
        for (name, payload) in root {
            let slot = match payload {
                Value::Array(rows) => {
                    let mut table = Vec::with_capacity(rows.len());
                    for row in rows {
                        match row {
                            Value::Object(record) => table.push(Arc::new(record)),
                            _ => skipped += 1,
                        }
                    }
                    Slot::Table(table)
                }
                _ => Slot::Scalar,
            };
            datasets.insert(name, slot);
        }

        if skipped > 0 {
            tracing::debug!("snapshot ingestion skipped {} non-object rows", skipped);
        }
        Ok(Self { datasets })
    }

    /// Parse a snapshot from a JSON string. Also available through the
    /// `FromStr` impl as `payload.parse()`.
    pub fn from_json_str(payload: &str) -> SnapshotResult<Self> {
        Self::from_value(serde_json::from_str(payload)?)
    }

    /// Parse a snapshot from a reader.
    pub fn from_reader(reader: impl Read) -> SnapshotResult<Self> {
        Self::from_value(serde_json::from_reader(reader)?)
    }

    /// Build a snapshot directly from typed rows. Test and embedding
    /// surface; never fails.
    pub fn from_datasets<I, N>(datasets: I) -> Self
    where
        I: IntoIterator<Item = (N, Vec<Record>)>,
        N: Into<String>,
    {
        let datasets = datasets
            .into_iter()
            .map(|(name, rows)| {
                let table = rows.into_iter().map(Arc::new).collect();
                (name.into(), Slot::Table(table))
            })
            .collect();
        Self { datasets }
    }

    /// Resolve a canonical dataset by trying alias keys in order. The first
    /// key that is present *and tabular* wins, including a present-but-empty
    /// array; presence, not non-emptiness, decides. No alias tabular means
    /// an empty slice. Never fails.
    pub fn dataset(&self, aliases: &[&str]) -> &[Row] {
        for key in aliases {
            if let Some(Slot::Table(rows)) = self.datasets.get(*key) {
                return rows;
            }
        }
        &[]
    }

    /// The rows under one exact dataset name, if that name is tabular.
    pub fn rows(&self, name: &str) -> Option<&[Row]> {
        match self.datasets.get(name) {
            Some(Slot::Table(rows)) => Some(rows),
            _ => None,
        }
    }

    /// Record count under one exact dataset name. Present-but-non-tabular
    /// names count as zero; absent names are `None`.
    pub fn row_count(&self, name: &str) -> Option<usize> {
        match self.datasets.get(name) {
            Some(Slot::Table(rows)) => Some(rows.len()),
            Some(Slot::Scalar) => Some(0),
            None => None,
        }
    }

    /// Whether the export carried this dataset name at all.
    pub fn contains(&self, name: &str) -> bool {
        self.datasets.contains_key(name)
    }

    /// All dataset names present in the export.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.datasets.keys().map(String::as_str)
    }

    /// Number of dataset names in the export.
    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

impl std::str::FromStr for Snapshot {
    type Err = SnapshotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_json_str(s)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
