//! Authoritative row-entity store.
//!
//! The host owns row lifecycle; this store holds the last array it was
//! given plus the engine's own committed edits, and classifies incoming
//! host arrays as echo / structural / content-only (see
//! `RowStore::classify_external`).

use mapgrid_core::RowId;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A row entity: stable id plus arbitrary named fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: RowId,
    #[serde(default)]
    pub fields: serde_json::Map<String, Value>,
}

impl Row {
    pub fn new(id: impl Into<RowId>) -> Self {
        Self {
            id: id.into(),
            fields: serde_json::Map::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Field value, `Null` when absent.
    pub fn field(&self, name: &str) -> Value {
        self.fields.get(name).cloned().unwrap_or(Value::Null)
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }
}

/// Classification of a host-supplied row array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalUpdate {
    /// Echo of the engine's own last notification. Skipped entirely.
    Echo,
    /// Row id set changed: rows added or removed. Captured into history.
    Structural,
    /// Same id set, possibly different field values. Adopted without a
    /// history entry (re-renders must not pollute history).
    ContentOnly,
}

/// Authoritative row array with external-change detection.
#[derive(Debug, Default)]
pub struct RowStore {
    rows: Vec<Row>,
    /// One-shot echo guard. Armed before the host is notified of an
    /// engine-driven update, consumed by the next classify call.
    notifying: bool,
}

impl RowStore {
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows,
            notifying: false,
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Immutable snapshot for history capture.
    pub fn snapshot(&self) -> Vec<Row> {
        self.rows.clone()
    }

    pub fn get(&self, id: &RowId) -> Option<&Row> {
        self.rows.iter().find(|r| &r.id == id)
    }

    /// Stable id of the row at a display position.
    pub fn id_at(&self, index: usize) -> Option<&RowId> {
        self.rows.get(index).map(|r| &r.id)
    }

    /// Pure single-field update: returns a new array, current state
    /// untouched. Unknown ids return the array unchanged.
    pub fn update_field(&self, id: &RowId, field: &str, value: Value) -> Vec<Row> {
        let mut rows = self.rows.clone();
        if let Some(row) = rows.iter_mut().find(|r| &r.id == id) {
            row.set_field(field, value);
        }
        rows
    }

    /// Whole-array replacement (multi-row edits, undo/redo restore,
    /// host-driven add/remove).
    pub fn update_batch(&mut self, rows: Vec<Row>) {
        self.rows = rows;
    }

    /// Arm the echo guard. Must be called before notifying the host of an
    /// engine-driven row change.
    pub fn arm_echo_guard(&mut self) {
        self.notifying = true;
    }

    #[cfg(test)]
    pub fn echo_guard_armed(&self) -> bool {
        self.notifying
    }

    /// Classify a host-supplied row array against the last-seen state.
    ///
    /// Consumes the echo guard: the first array observed after
    /// `arm_echo_guard` is treated as the reflection of our own update.
    /// Structural means the row id *set* changed; an equal-count
    /// add+remove is still structural.
    pub fn classify_external(&mut self, incoming: &[Row]) -> ExternalUpdate {
        if self.notifying {
            self.notifying = false;
            return ExternalUpdate::Echo;
        }
        if id_set(incoming) != id_set(&self.rows) {
            ExternalUpdate::Structural
        } else {
            ExternalUpdate::ContentOnly
        }
    }
}

fn id_set(rows: &[Row]) -> FxHashSet<&RowId> {
    rows.iter().map(|r| &r.id).collect()
}
