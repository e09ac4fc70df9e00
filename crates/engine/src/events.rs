//! Change notifications emitted by the grid engine.
//!
//! The host binds its `onRowDataChange` hook to `RowDataChanged`; the
//! test suite uses `EventCollector` to assert emission order and that a
//! batch produces exactly one notification per affected store.

use crate::rows::Row;

/// Events emitted by `GridEngine` on committed state changes.
#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    /// Row data changed via an engine-driven commit (not a host echo).
    /// Carries the full new row array for the host supplier.
    RowDataChanged(Vec<Row>),

    /// The mapping cell array changed. Carries the new cell count.
    MappingsChanged { cells: usize },

    /// The history cursor or stack changed (commit, undo, or redo).
    HistoryChanged { can_undo: bool, can_redo: bool },
}

/// Callback type for receiving grid events.
pub type EventCallback = Box<dyn FnMut(GridEvent)>;

/// Simple event collector for testing.
#[derive(Default)]
pub struct EventCollector {
    events: Vec<GridEvent>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: GridEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[GridEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Row arrays delivered so far, in order.
    pub fn row_updates(&self) -> Vec<&Vec<Row>> {
        self.events
            .iter()
            .filter_map(|e| match e {
                GridEvent::RowDataChanged(rows) => Some(rows),
                _ => None,
            })
            .collect()
    }
}
