//! Column entity types.
//!
//! Two kinds of column exist: mapping columns (backed by the sparse cell
//! table, present only in mapping mode) and static columns (rendered
//! straight from a row-entity field). A mapping column may declare a
//! decomposition into two named parts, in which case its cell values are
//! 2-part pairs (see `value::PairValue`).

use mapgrid_core::ColumnId;
use serde::{Deserialize, Serialize};

/// A mapping column entity supplied by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub read_only: bool,
    /// Part names for a decomposed column, in declared order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parts: Option<[String; 2]>,
}

impl Column {
    pub fn new(id: impl Into<ColumnId>) -> Self {
        let id = id.into();
        let label = id.as_str().to_string();
        Self {
            id,
            label,
            read_only: false,
            parts: None,
        }
    }

    pub fn decomposed(id: impl Into<ColumnId>, first: &str, second: &str) -> Self {
        Self {
            parts: Some([first.to_string(), second.to_string()]),
            ..Self::new(id)
        }
    }

    pub fn is_decomposed(&self) -> bool {
        self.parts.is_some()
    }

    /// Synthetic display-row key for one part of a decomposed column,
    /// e.g. `"X_spec"`.
    pub fn part_prop(&self, part_index: usize) -> Option<String> {
        let parts = self.parts.as_ref()?;
        let name = parts.get(part_index)?;
        Some(format!("{}_{}", self.id.as_str(), name))
    }

    /// Part names as string slices, for `PairValue::parse`.
    pub fn part_names(&self) -> Option<[&str; 2]> {
        self.parts
            .as_ref()
            .map(|p| [p[0].as_str(), p[1].as_str()])
    }
}

/// A column rendered directly from a row-entity field, not a mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticColumn {
    /// Row-entity field this column reads and writes.
    pub field: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub read_only: bool,
}

impl StaticColumn {
    pub fn new(field: impl Into<String>) -> Self {
        let field = field.into();
        let label = field.clone();
        Self {
            field,
            label,
            read_only: false,
        }
    }

    pub fn read_only(field: impl Into<String>) -> Self {
        Self {
            read_only: true,
            ..Self::new(field)
        }
    }
}
