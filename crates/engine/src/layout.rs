//! Column layout: zones, groups, and zone-relative index translation.
//!
//! Columns live in three zones walked in fixed order (pinned-start,
//! unpinned, pinned-end), and any entry may be a group of ordered
//! children. Flattening with groups expanded is the canonical flat index
//! space; edit events arrive zone-relative and must be translated before
//! any region resolution, or edits silently land on the wrong columns.

use mapgrid_core::{Zone, ZonePos};
use serde::{Deserialize, Serialize};

/// One layout entry: a single column property or an ordered group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutEntry {
    Column(String),
    Group { id: String, children: Vec<String> },
}

impl LayoutEntry {
    pub fn column(prop: impl Into<String>) -> Self {
        LayoutEntry::Column(prop.into())
    }

    pub fn group(id: impl Into<String>, children: &[&str]) -> Self {
        LayoutEntry::Group {
            id: id.into(),
            children: children.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn flat_len(&self) -> usize {
        match self {
            LayoutEntry::Column(_) => 1,
            LayoutEntry::Group { children, .. } => children.len(),
        }
    }
}

/// Zone-organized column layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnLayout {
    #[serde(default)]
    pub pinned_start: Vec<LayoutEntry>,
    #[serde(default)]
    pub unpinned: Vec<LayoutEntry>,
    #[serde(default)]
    pub pinned_end: Vec<LayoutEntry>,
}

impl ColumnLayout {
    /// A layout with everything unpinned, one entry per property.
    pub fn flat(props: &[&str]) -> Self {
        Self {
            unpinned: props.iter().map(|p| LayoutEntry::column(*p)).collect(),
            ..Self::default()
        }
    }

    fn zone_entries(&self, zone: Zone) -> &[LayoutEntry] {
        match zone {
            Zone::PinnedStart => &self.pinned_start,
            Zone::Unpinned => &self.unpinned,
            Zone::PinnedEnd => &self.pinned_end,
        }
    }

    /// Flattened length of one zone (group children counted individually).
    pub fn zone_len(&self, zone: Zone) -> usize {
        self.zone_entries(zone).iter().map(LayoutEntry::flat_len).sum()
    }

    /// The canonical flat property list: zones in fixed order, groups
    /// expanded in declared order.
    pub fn flatten(&self) -> Vec<&str> {
        let mut props = Vec::new();
        for zone in Zone::ORDER {
            for entry in self.zone_entries(zone) {
                match entry {
                    LayoutEntry::Column(prop) => props.push(prop.as_str()),
                    LayoutEntry::Group { children, .. } => {
                        props.extend(children.iter().map(String::as_str));
                    }
                }
            }
        }
        props
    }

    /// Translate a zone-relative position into the flat index space.
    /// Positions beyond the zone's flattened length are invalid.
    pub fn flat_index(&self, pos: ZonePos) -> Option<usize> {
        if pos.index >= self.zone_len(pos.zone) {
            return None;
        }
        let offset: usize = Zone::ORDER
            .iter()
            .take_while(|z| **z != pos.zone)
            .map(|z| self.zone_len(*z))
            .sum();
        Some(offset + pos.index)
    }

    /// Property at a zone-relative position.
    pub fn prop_at(&self, pos: ZonePos) -> Option<&str> {
        let flat = self.flat_index(pos)?;
        self.flatten().get(flat).copied()
    }

    /// Properties covered by a zone-relative column span, used when a
    /// range edit reports `(zone, from..=to)`.
    pub fn props_in_span(&self, zone: Zone, from: usize, to: usize) -> Vec<String> {
        let flat = self.flatten();
        (from..=to)
            .filter_map(|index| self.flat_index(ZonePos::new(zone, index)))
            .filter_map(|i| flat.get(i).map(|p| p.to_string()))
            .collect()
    }
}

/// A flattened, presentation-facing column definition with any
/// user-adjusted width layered on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub prop: String,
    pub label: String,
    pub read_only: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// pinned-start: 1 column; unpinned: 3 columns, the third a 2-child
    /// group; pinned-end: 1 column.
    fn layout() -> ColumnLayout {
        ColumnLayout {
            pinned_start: vec![LayoutEntry::column("name")],
            unpinned: vec![
                LayoutEntry::column("a"),
                LayoutEntry::column("b"),
                LayoutEntry::group("g", &["g1", "g2"]),
            ],
            pinned_end: vec![LayoutEntry::column("notes")],
        }
    }

    #[test]
    fn test_flatten_expands_groups_in_zone_order() {
        assert_eq!(
            layout().flatten(),
            vec!["name", "a", "b", "g1", "g2", "notes"]
        );
    }

    #[test]
    fn test_zone_len_counts_children() {
        let layout = layout();
        assert_eq!(layout.zone_len(Zone::PinnedStart), 1);
        assert_eq!(layout.zone_len(Zone::Unpinned), 4);
        assert_eq!(layout.zone_len(Zone::PinnedEnd), 1);
    }

    #[test]
    fn test_flat_index_offsets_by_preceding_zones() {
        let layout = layout();
        assert_eq!(layout.flat_index(ZonePos::new(Zone::PinnedStart, 0)), Some(0));
        // (unpinned, 2) lands on the group's first child at flat 1 + 2 = 3.
        assert_eq!(layout.flat_index(ZonePos::new(Zone::Unpinned, 2)), Some(3));
        assert_eq!(layout.prop_at(ZonePos::new(Zone::Unpinned, 2)), Some("g1"));
        assert_eq!(layout.flat_index(ZonePos::new(Zone::PinnedEnd, 0)), Some(5));
    }

    #[test]
    fn test_flat_index_out_of_zone_is_invalid() {
        let layout = layout();
        assert_eq!(layout.flat_index(ZonePos::new(Zone::PinnedStart, 1)), None);
        assert_eq!(layout.flat_index(ZonePos::new(Zone::Unpinned, 4)), None);
    }

    #[test]
    fn test_props_in_span() {
        let layout = layout();
        assert_eq!(
            layout.props_in_span(Zone::Unpinned, 1, 3),
            vec!["b".to_string(), "g1".to_string(), "g2".to_string()]
        );
        // Span running past the zone keeps only the valid positions.
        assert_eq!(layout.props_in_span(Zone::PinnedEnd, 0, 3), vec!["notes".to_string()]);
    }
}
