//! Column zones and rectangular edit regions.
//!
//! The presentation layer reports column positions relative to one of three
//! zones (pinned-start, unpinned, pinned-end). The engine's own model is a
//! single flat ordered column list, so zone-relative positions must be
//! translated before any edit resolution (see `mapgrid-engine::layout`).

use serde::{Deserialize, Serialize};

/// One of the three column zones, in fixed display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    PinnedStart,
    Unpinned,
    PinnedEnd,
}

impl Zone {
    /// Fixed zone walk order used when flattening columns.
    pub const ORDER: [Zone; 3] = [Zone::PinnedStart, Zone::Unpinned, Zone::PinnedEnd];
}

/// A column position relative to a zone, as reported by the presentation
/// layer. `index` counts flattened columns within the zone (group children
/// expanded in declared order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZonePos {
    pub zone: Zone,
    pub index: usize,
}

impl ZonePos {
    pub fn new(zone: Zone, index: usize) -> Self {
        Self { zone, index }
    }
}

/// A rectangular edit region: `row_count` display rows starting at
/// `start_row`, across the named column properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditRegion {
    /// First display-row index (positional, into the current display array).
    pub start_row: usize,
    /// Number of display rows covered.
    pub row_count: usize,
    /// Column properties covered, in flat order.
    pub props: Vec<String>,
}

impl EditRegion {
    pub fn new(start_row: usize, row_count: usize, props: Vec<String>) -> Self {
        Self {
            start_row,
            row_count,
            props,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0 || self.props.is_empty()
    }

    pub fn cell_count(&self) -> usize {
        self.row_count * self.props.len()
    }
}
