pub mod ids;
pub mod region;

pub use ids::{CellKey, ColumnId, RowId};
pub use region::{EditRegion, Zone, ZonePos};
