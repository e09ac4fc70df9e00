//! Batch edit resolution.
//!
//! Turns one rectangular edit (paste, autofill, multi-cell range edit,
//! range clear) into discrete per-cell updates split between the row store
//! and the mapping store. Resolution is defensive cell by cell: a
//! read-only or unresolvable cell is skipped, never aborting the batch.
//! The caller commits the whole region as a single history entry.

use mapgrid_core::{EditRegion, RowId};
use serde_json::Value;

use crate::column::{Column, StaticColumn};
use crate::mapping::MappingUpdate;
use crate::rows::Row;

/// Classification of a column property string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropKind<'a> {
    /// A row-entity field rendered directly.
    Static(&'a StaticColumn),
    /// A whole mapping cell.
    Whole(&'a Column),
    /// One part of a decomposed mapping cell.
    Part(&'a Column, usize),
    /// No known column matches.
    Unknown,
}

/// Resolve a property string against the static and mapping columns.
///
/// Part properties use the synthetic `"{columnId}_{part}"` form produced
/// by the display projection.
pub fn classify_prop<'a>(
    prop: &str,
    statics: &'a [StaticColumn],
    columns: &'a [Column],
) -> PropKind<'a> {
    if let Some(sc) = statics.iter().find(|sc| sc.field == prop) {
        return PropKind::Static(sc);
    }
    if let Some(column) = columns.iter().find(|c| c.id.as_str() == prop) {
        return PropKind::Whole(column);
    }
    for column in columns {
        for part_index in 0..2 {
            if column.part_prop(part_index).as_deref() == Some(prop) {
                return PropKind::Part(column, part_index);
            }
        }
    }
    PropKind::Unknown
}

/// One rectangular edit: the region plus its source values in row-major
/// order. `None` cells (absent source data) leave the target unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionEdit {
    pub region: EditRegion,
    pub values: Vec<Vec<Option<Value>>>,
}

impl RegionEdit {
    pub fn new(region: EditRegion, values: Vec<Vec<Option<Value>>>) -> Self {
        Self { region, values }
    }

    /// A range clear: every cell in the region blanked.
    pub fn clear(region: EditRegion) -> Self {
        let blank_row = vec![Some(Value::String(String::new())); region.props.len()];
        let values = vec![blank_row; region.row_count];
        Self { region, values }
    }
}

/// Per-cell updates produced from one region, already split by target
/// store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedEdits {
    /// Static-column updates: (row id, field, value).
    pub field_updates: Vec<(RowId, String, Value)>,
    /// Dynamic-column updates for one `set_batch`.
    pub mapping_updates: Vec<MappingUpdate>,
}

impl ResolvedEdits {
    pub fn is_empty(&self) -> bool {
        self.field_updates.is_empty() && self.mapping_updates.is_empty()
    }
}

/// Resolve a region edit into per-cell updates.
///
/// Rows resolve positionally into the current display order, then by the
/// stable id found there; everything downstream is keyed by id. Cells that
/// are read-only, unresolvable, or carry no source value are dropped
/// silently.
pub fn resolve_region(
    edit: &RegionEdit,
    rows: &[Row],
    statics: &[StaticColumn],
    columns: &[Column],
) -> ResolvedEdits {
    let mut resolved = ResolvedEdits::default();
    if edit.region.is_empty() {
        return resolved;
    }

    for r in 0..edit.region.row_count {
        let Some(row) = rows.get(edit.region.start_row + r) else {
            continue;
        };
        let row_id = row.id.clone();
        let Some(row_values) = edit.values.get(r) else {
            continue;
        };

        for (c, prop) in edit.region.props.iter().enumerate() {
            let Some(Some(value)) = row_values.get(c) else {
                continue;
            };
            // Explicit null source data also leaves the target unchanged.
            if value.is_null() {
                continue;
            }
            match classify_prop(prop, statics, columns) {
                PropKind::Static(sc) => {
                    if sc.read_only {
                        continue;
                    }
                    resolved
                        .field_updates
                        .push((row_id.clone(), sc.field.clone(), value.clone()));
                }
                PropKind::Whole(column) => {
                    if column.read_only {
                        continue;
                    }
                    resolved.mapping_updates.push(MappingUpdate {
                        row: row_id.clone(),
                        column: column.id.clone(),
                        part: None,
                        value: value.clone(),
                    });
                }
                PropKind::Part(column, part_index) => {
                    if column.read_only {
                        continue;
                    }
                    resolved.mapping_updates.push(MappingUpdate {
                        row: row_id.clone(),
                        column: column.id.clone(),
                        part: Some(part_index),
                        value: value.clone(),
                    });
                }
                PropKind::Unknown => {}
            }
        }
    }
    resolved
}
