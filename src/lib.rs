pub mod cli_utils;
pub mod config;
pub mod errors;
pub mod export;
pub mod heightfield;
pub mod pathfinding;
pub mod terrain;
pub mod terrain_generation;

// Selective re-exports for external consumers

pub use errors::{TerrainError, TerrainResult};
pub use heightfield::HeightField;
pub use pathfinding::{
    PathResult, PathfindingConfig, PathfindingConfigPatch, PathfindingEngine, find_path,
};
pub use terrain::{GridCell, SlopeMap};
pub use terrain_generation::{NoiseConfig, TerrainNoiseGenerator, get_terrain_preset};
