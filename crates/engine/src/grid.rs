//! The grid engine facade.
//!
//! A framework-agnostic state object binding the row store, mapping store,
//! history, edit resolver, and column layout behind explicit transition
//! methods. Every committed edit captures both snapshot halves together;
//! internal arrays leave this type only as clones, so no mutable reference
//! bypasses the commit path. Bind it to a reactive system with a thin
//! adapter over the event callback.

use mapgrid_config::EngineSettings;
use mapgrid_core::{ColumnId, EditRegion, RowId, Zone};
use serde_json::Value;
use std::collections::HashMap;

use crate::column::{Column, StaticColumn};
use crate::edits::{classify_prop, resolve_region, PropKind, RegionEdit};
use crate::events::{EventCallback, GridEvent};
use crate::history::{History, Snapshot};
use crate::layout::{ColumnDef, ColumnLayout};
use crate::mapping::{MappingCell, MappingStore};
use crate::rows::{ExternalUpdate, Row, RowStore};

pub struct GridEngine {
    rows: RowStore,
    mappings: MappingStore,
    columns: Vec<Column>,
    statics: Vec<StaticColumn>,
    layout: ColumnLayout,
    history: History,
    column_widths: HashMap<String, f32>,
    on_event: Option<EventCallback>,
}

impl GridEngine {
    /// Seed the engine from host-supplied arrays. Cells referencing
    /// unknown rows or columns are dropped before the initial snapshot is
    /// captured.
    pub fn new(
        rows: Vec<Row>,
        cells: Vec<MappingCell>,
        columns: Vec<Column>,
        statics: Vec<StaticColumn>,
        layout: ColumnLayout,
        settings: &EngineSettings,
    ) -> Self {
        let rows = RowStore::new(rows);
        let mut mappings = MappingStore::new(cells, settings.pair_delimiter.clone());
        mappings.prune(rows.rows(), &columns);
        let history = History::new(
            Snapshot::new(rows.snapshot(), mappings.snapshot()),
            settings.history_cap,
        );
        Self {
            rows,
            mappings,
            columns,
            statics,
            layout,
            history,
            column_widths: settings.column_widths.clone(),
            on_event: None,
        }
    }

    /// Standalone mode: no mapping columns, only direct row-field edits.
    pub fn standalone(
        rows: Vec<Row>,
        statics: Vec<StaticColumn>,
        layout: ColumnLayout,
        settings: &EngineSettings,
    ) -> Self {
        Self::new(rows, Vec::new(), Vec::new(), statics, layout, settings)
    }

    /// Register the change-notification callback.
    pub fn set_on_event(&mut self, callback: EventCallback) {
        self.on_event = Some(callback);
    }

    fn emit(&mut self, event: GridEvent) {
        if let Some(callback) = self.on_event.as_mut() {
            callback(event);
        }
    }

    // ---- Read surface ----

    pub fn rows(&self) -> &[Row] {
        self.rows.rows()
    }

    pub fn cells(&self) -> &[MappingCell] {
        self.mappings.cells()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn layout(&self) -> &ColumnLayout {
        &self.layout
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    #[cfg(test)]
    pub(crate) fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Mapping value for one cell; missing mappings yield an empty string.
    pub fn get(&self, row: &RowId, column: &ColumnId) -> Value {
        self.mappings.get(row, column)
    }

    /// Dense display rows: row fields merged with resolved mapping values
    /// under synthetic keys.
    pub fn display_rows(&self) -> Vec<serde_json::Map<String, Value>> {
        self.mappings.display_rows(self.rows.rows(), &self.columns)
    }

    /// Flattened column definitions with user-adjusted widths layered on.
    pub fn column_defs(&self) -> Vec<ColumnDef> {
        self.layout
            .flatten()
            .into_iter()
            .map(|prop| {
                let (label, read_only) = match classify_prop(prop, &self.statics, &self.columns)
                {
                    PropKind::Static(sc) => (sc.label.clone(), sc.read_only),
                    PropKind::Whole(col) => (col.label.clone(), col.read_only),
                    PropKind::Part(col, part_index) => {
                        let name = col
                            .parts
                            .as_ref()
                            .and_then(|p| p.get(part_index))
                            .cloned()
                            .unwrap_or_default();
                        (format!("{} {}", col.label, name), col.read_only)
                    }
                    PropKind::Unknown => (prop.to_string(), false),
                };
                ColumnDef {
                    prop: prop.to_string(),
                    label,
                    read_only,
                    width: self.column_widths.get(prop).copied(),
                }
            })
            .collect()
    }

    /// Record a user width adjustment (persisted by the host via
    /// `mapgrid-config`).
    pub fn set_column_width(&mut self, prop: impl Into<String>, width: f32) {
        self.column_widths.insert(prop.into(), width);
    }

    /// Build the region for a zone-relative column span, translating to
    /// flat properties before any edit resolution.
    pub fn region_for_span(
        &self,
        start_row: usize,
        row_count: usize,
        zone: Zone,
        from_col: usize,
        to_col: usize,
    ) -> EditRegion {
        EditRegion::new(
            start_row,
            row_count,
            self.layout.props_in_span(zone, from_col, to_col),
        )
    }

    // ---- Transitions ----

    fn commit_current(&mut self) {
        self.history
            .commit(Snapshot::new(self.rows.snapshot(), self.mappings.snapshot()));
        self.emit(GridEvent::HistoryChanged {
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        });
    }

    fn notify_rows_changed(&mut self) {
        self.rows.arm_echo_guard();
        let rows = self.rows.snapshot();
        self.emit(GridEvent::RowDataChanged(rows));
    }

    fn notify_mappings_changed(&mut self) {
        let cells = self.mappings.len();
        self.emit(GridEvent::MappingsChanged { cells });
    }

    /// Single-cell edit. Returns false (and creates no history entry) for
    /// read-only or unresolvable properties.
    pub fn set_cell(&mut self, row: &RowId, prop: &str, value: Value) -> bool {
        // Unresolvable rows are rejected up front, like the batch path's
        // per-cell skip: a phantom id must never reach the stores or
        // history.
        if self.rows.get(row).is_none() {
            return false;
        }

        enum Write {
            Field(String),
            Whole(ColumnId),
            Part(Column, usize),
        }
        let write = match classify_prop(prop, &self.statics, &self.columns) {
            PropKind::Static(sc) if !sc.read_only => Write::Field(sc.field.clone()),
            PropKind::Whole(column) if !column.read_only => Write::Whole(column.id.clone()),
            PropKind::Part(column, part_index) if !column.read_only => {
                Write::Part(column.clone(), part_index)
            }
            // Read-only or unresolvable: rejected before any mutation.
            _ => return false,
        };

        match write {
            Write::Field(field) => {
                let rows = self.rows.update_field(row, &field, value);
                self.rows.update_batch(rows);
                self.notify_rows_changed();
            }
            Write::Whole(column_id) => {
                let cells = self.mappings.set(row, &column_id, value);
                self.mappings.replace(cells);
                self.notify_mappings_changed();
            }
            Write::Part(column, part_index) => {
                let cells = self.mappings.set_part(
                    row,
                    &column,
                    part_index,
                    crate::value::value_text(&value),
                );
                self.mappings.replace(cells);
                self.notify_mappings_changed();
            }
        }
        self.commit_current();
        true
    }

    /// Apply one rectangular edit as a single history entry, however many
    /// cells it covers. An empty effective region is a no-op with no
    /// history entry.
    pub fn apply_region(&mut self, edit: &RegionEdit) -> bool {
        let resolved = resolve_region(edit, self.rows.rows(), &self.statics, &self.columns);
        if resolved.is_empty() {
            return false;
        }

        let rows_affected = !resolved.field_updates.is_empty();
        let mappings_affected = !resolved.mapping_updates.is_empty();

        if rows_affected {
            // Group all static updates into one array replacement.
            let mut rows = self.rows.snapshot();
            for (id, field, value) in &resolved.field_updates {
                if let Some(row) = rows.iter_mut().find(|r| &r.id == id) {
                    row.set_field(field.clone(), value.clone());
                }
            }
            self.rows.update_batch(rows);
        }
        if mappings_affected {
            let cells = self
                .mappings
                .set_batch(&resolved.mapping_updates, &self.columns);
            self.mappings.replace(cells);
        }

        if rows_affected {
            self.notify_rows_changed();
        }
        if mappings_affected {
            self.notify_mappings_changed();
        }
        self.commit_current();
        true
    }

    /// Range clear: blank every writable cell in the region.
    pub fn clear_region(&mut self, region: EditRegion) -> bool {
        self.apply_region(&RegionEdit::clear(region))
    }

    /// Blank every mapping cell's value, keeping the records. A no-op
    /// (empty store, or values already blank) creates no history entry.
    pub fn clear_all_mappings(&mut self) {
        let cells = self.mappings.clear_all();
        if cells == self.mappings.cells() {
            return;
        }
        self.mappings.replace(cells);
        self.notify_mappings_changed();
        self.commit_current();
    }

    /// Step back one history entry, restoring both snapshot halves.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo().cloned() else {
            return false;
        };
        self.restore(snapshot);
        true
    }

    /// Step forward one history entry, restoring both snapshot halves.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo().cloned() else {
            return false;
        };
        self.restore(snapshot);
        true
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.rows.update_batch(snapshot.rows);
        self.mappings.replace(snapshot.cells);
        self.notify_rows_changed();
        self.notify_mappings_changed();
        self.emit(GridEvent::HistoryChanged {
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        });
    }

    /// Accept a host-supplied row array.
    ///
    /// Echoes of our own last notification are skipped entirely.
    /// Structural changes (row id set differs) are adopted, orphaned
    /// mappings pruned, and the result captured into history. Content-only
    /// changes are adopted without a history entry so host re-renders
    /// cannot pollute the undo stack.
    pub fn sync_rows(&mut self, incoming: Vec<Row>) {
        match self.rows.classify_external(&incoming) {
            ExternalUpdate::Echo => {}
            ExternalUpdate::Structural => {
                self.rows.update_batch(incoming);
                self.mappings.prune(self.rows.rows(), &self.columns);
                self.commit_current();
            }
            ExternalUpdate::ContentOnly => {
                self.rows.update_batch(incoming);
            }
        }
    }

    /// Accept a host-supplied column array. A shrink drops orphaned
    /// mapping cells and captures the result into history.
    pub fn sync_columns(&mut self, incoming: Vec<Column>) {
        self.columns = incoming;
        if self.mappings.prune(self.rows.rows(), &self.columns) {
            self.notify_mappings_changed();
            self.commit_current();
        }
    }
}
