//! Sparse mapping-cell store and the dense display projection.
//!
//! At most one cell exists per (row, column) pair; an `FxHashMap` keyed by
//! `CellKey` gives O(1) access into the cell array. All mutators are pure:
//! they return a new cell array and leave current state untouched until the
//! commit path adopts it, so a batch is atomic relative to history.

use mapgrid_core::{CellKey, ColumnId, RowId};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::column::Column;
use crate::rows::Row;
use crate::value::{value_text, PairValue};

/// One record of the sparse mapping table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingCell {
    pub row: RowId,
    pub column: ColumnId,
    pub value: Value,
}

impl MappingCell {
    pub fn new(row: impl Into<RowId>, column: impl Into<ColumnId>, value: Value) -> Self {
        Self {
            row: row.into(),
            column: column.into(),
            value,
        }
    }

    pub fn key(&self) -> CellKey {
        CellKey::new(&self.row, &self.column)
    }
}

/// One cell update within a batch. `part` targets one sub-field of a
/// decomposed column; `None` writes the whole cell value.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingUpdate {
    pub row: RowId,
    pub column: ColumnId,
    pub part: Option<usize>,
    pub value: Value,
}

/// The sparse cell collection plus its O(1) lookup.
#[derive(Debug, Default)]
pub struct MappingStore {
    cells: Vec<MappingCell>,
    lookup: FxHashMap<CellKey, usize>,
    delimiter: String,
}

fn build_lookup(cells: &[MappingCell]) -> FxHashMap<CellKey, usize> {
    cells
        .iter()
        .enumerate()
        .map(|(i, cell)| (cell.key(), i))
        .collect()
}

impl MappingStore {
    pub fn new(cells: Vec<MappingCell>, delimiter: impl Into<String>) -> Self {
        let lookup = build_lookup(&cells);
        Self {
            cells,
            lookup,
            delimiter: delimiter.into(),
        }
    }

    pub fn cells(&self) -> &[MappingCell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Immutable snapshot for history capture.
    pub fn snapshot(&self) -> Vec<MappingCell> {
        self.cells.clone()
    }

    /// Adopt a committed cell array.
    pub fn replace(&mut self, cells: Vec<MappingCell>) {
        self.lookup = build_lookup(&cells);
        self.cells = cells;
    }

    fn raw(&self, row: &RowId, column: &ColumnId) -> Option<&Value> {
        let key = CellKey::new(row, column);
        self.lookup.get(&key).map(|&i| &self.cells[i].value)
    }

    /// Stored value for a cell; a missing mapping yields an empty string.
    /// Never errors.
    pub fn get(&self, row: &RowId, column: &ColumnId) -> Value {
        self.raw(row, column)
            .cloned()
            .unwrap_or_else(|| Value::String(String::new()))
    }

    /// Normalized pair for a decomposed column's cell, accepting all legacy
    /// encodings.
    pub fn get_pair(&self, row: &RowId, column: &Column) -> PairValue {
        let Some(names) = column.part_names() else {
            return PairValue::default();
        };
        match self.raw(row, &column.id) {
            Some(raw) => PairValue::parse(raw, names, &self.delimiter),
            None => PairValue::default(),
        }
    }

    fn upsert(
        cells: &mut Vec<MappingCell>,
        lookup: &mut FxHashMap<CellKey, usize>,
        row: &RowId,
        column: &ColumnId,
        value: Value,
    ) {
        let key = CellKey::new(row, column);
        match lookup.get(&key) {
            Some(&i) => cells[i].value = value,
            None => {
                lookup.insert(key, cells.len());
                cells.push(MappingCell::new(row.clone(), column.clone(), value));
            }
        }
    }

    /// Pure whole-cell upsert: returns a new cell array.
    pub fn set(&self, row: &RowId, column: &ColumnId, value: Value) -> Vec<MappingCell> {
        let mut cells = self.cells.clone();
        let mut lookup = self.lookup.clone();
        Self::upsert(&mut cells, &mut lookup, row, column, value);
        cells
    }

    /// Pure sub-field upsert: read-modify-write on the normalized pair,
    /// preserving the sibling part.
    pub fn set_part(
        &self,
        row: &RowId,
        column: &Column,
        part_index: usize,
        text: impl Into<String>,
    ) -> Vec<MappingCell> {
        let pair = self.get_pair(row, column).with_part(part_index, text);
        self.set(row, &column.id, pair.to_value())
    }

    /// Apply a batch of updates against one starting snapshot.
    ///
    /// Updates within the batch see each other (both parts of one cell can
    /// be written in a single batch), but nothing touches the live store;
    /// the caller commits the returned array as one history entry.
    pub fn set_batch(&self, updates: &[MappingUpdate], columns: &[Column]) -> Vec<MappingCell> {
        let mut cells = self.cells.clone();
        let mut lookup = self.lookup.clone();

        for update in updates {
            let value = match update.part {
                None => update.value.clone(),
                Some(part_index) => {
                    let Some(column) = columns.iter().find(|c| c.id == update.column) else {
                        continue;
                    };
                    let Some(names) = column.part_names() else {
                        continue;
                    };
                    let key = CellKey::new(&update.row, &update.column);
                    let pair = match lookup.get(&key) {
                        Some(&i) => PairValue::parse(&cells[i].value, names, &self.delimiter),
                        None => PairValue::default(),
                    };
                    pair.with_part(part_index, value_text(&update.value))
                        .to_value()
                }
            };
            Self::upsert(&mut cells, &mut lookup, &update.row, &update.column, value);
        }
        cells
    }

    /// Blank every existing cell's value without removing records.
    pub fn clear_all(&self) -> Vec<MappingCell> {
        self.cells
            .iter()
            .map(|cell| MappingCell {
                value: Value::String(String::new()),
                ..cell.clone()
            })
            .collect()
    }

    /// Drop cells referencing row or column ids that no longer exist.
    /// Returns true if anything was dropped. Runs on every shrink, before
    /// the cells are used for display or committed to history.
    pub fn prune(&mut self, rows: &[Row], columns: &[Column]) -> bool {
        let row_ids: FxHashSet<&RowId> = rows.iter().map(|r| &r.id).collect();
        let col_ids: FxHashSet<&ColumnId> = columns.iter().map(|c| &c.id).collect();

        let before = self.cells.len();
        self.cells
            .retain(|cell| row_ids.contains(&cell.row) && col_ids.contains(&cell.column));
        if self.cells.len() != before {
            self.lookup = build_lookup(&self.cells);
            true
        } else {
            false
        }
    }

    /// Dense display projection: each row entity merged with its resolved
    /// mapping values under synthetic keys (`columnId`, or
    /// `columnId_<part>` for decomposed columns).
    pub fn display_rows(
        &self,
        rows: &[Row],
        columns: &[Column],
    ) -> Vec<serde_json::Map<String, Value>> {
        rows.iter()
            .map(|row| {
                let mut out = row.fields.clone();
                out.insert("rowId".to_string(), Value::String(row.id.as_str().to_string()));
                for column in columns {
                    if column.is_decomposed() {
                        let pair = self.get_pair(&row.id, column);
                        for (i, part) in pair.parts.iter().enumerate() {
                            if let Some(prop) = column.part_prop(i) {
                                out.insert(prop, Value::String(part.clone()));
                            }
                        }
                    } else {
                        let text = self
                            .raw(&row.id, &column.id)
                            .map(value_text)
                            .unwrap_or_default();
                        out.insert(column.id.as_str().to_string(), Value::String(text));
                    }
                }
                out
            })
            .collect()
    }
}
