//! Constants shared by terrain generation and pathfinding

/// Default values for the pathfinding cost model
pub const DEFAULT_MAX_SLOPE_DEGREES: f32 = 30.0;
pub const DEFAULT_SLOPE_WEIGHT: f32 = 2.0;
pub const DEFAULT_DISTANCE_WEIGHT: f32 = 1.0;

/// Default values for noise generation
pub const DEFAULT_NOISE_SCALE: f64 = 0.05;
pub const DEFAULT_OCTAVES: u32 = 4;
pub const DEFAULT_PERSISTENCE: f64 = 0.5;
pub const DEFAULT_LACUNARITY: f64 = 2.0;
pub const DEFAULT_AMPLITUDE_SCALE: f32 = 10.0;

/// Guard against dividing by a zero elevation range when normalizing
pub const NORMALIZE_EPSILON: f64 = 1e-9;

/// Planar distance of a diagonal step in grid units
pub const DIAGONAL_DISTANCE: f32 = std::f32::consts::SQRT_2;
