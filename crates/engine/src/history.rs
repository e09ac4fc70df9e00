//! Linear undo/redo history of paired snapshots.
//!
//! One stack, one cursor. Every entry pairs a row-data snapshot with a
//! mapping snapshot captured from the same commit, so undo/redo always
//! restores a mutually consistent state across both stores. Committing
//! truncates everything past the cursor (no redo survives a fresh edit)
//! and evicts the oldest entry when the cap is exceeded.

use serde::{Deserialize, Serialize};

use crate::mapping::MappingCell;
use crate::rows::Row;

/// One history entry: both halves captured together, never independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub rows: Vec<Row>,
    pub cells: Vec<MappingCell>,
}

impl Snapshot {
    pub fn new(rows: Vec<Row>, cells: Vec<MappingCell>) -> Self {
        Self { rows, cells }
    }
}

/// Snapshot stack with cursor.
///
/// Invariants: `index` stays in `[0, len - 1]`; `can_undo == index > 0`;
/// `can_redo == index < len - 1`; after any commit `can_redo` is false.
#[derive(Debug)]
pub struct History {
    snapshots: Vec<Snapshot>,
    index: usize,
    cap: usize,
}

impl History {
    /// Seed the stack with the initial state so undoing the first edit
    /// restores it.
    pub fn new(initial: Snapshot, cap: usize) -> Self {
        Self {
            snapshots: vec![initial],
            index: 0,
            cap: cap.max(1),
        }
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.snapshots.len()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Snapshot at the cursor (the current committed state).
    pub fn current(&self) -> &Snapshot {
        &self.snapshots[self.index]
    }

    /// Append a new snapshot pair, discarding any redo tail and evicting
    /// the oldest pair once the cap is exceeded.
    pub fn commit(&mut self, snapshot: Snapshot) {
        self.snapshots.truncate(self.index + 1);
        self.snapshots.push(snapshot);
        self.index += 1;

        if self.snapshots.len() > self.cap {
            self.snapshots.remove(0);
            self.index -= 1;
        }
    }

    /// Step back one entry. No-op when nothing can be undone.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        Some(&self.snapshots[self.index])
    }

    /// Step forward one entry. No-op when nothing can be redone.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        Some(&self.snapshots[self.index])
    }
}
