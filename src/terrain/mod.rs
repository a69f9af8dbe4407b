pub mod constants;
pub mod coordinates;
pub mod slope;

pub use coordinates::{GridCell, NEIGHBOR_OFFSETS, neighbor_offsets};
pub use slope::{SlopeMap, max_slope_at, slope_between, slope_map};
