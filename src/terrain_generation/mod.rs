use crate::errors::{TerrainError, TerrainResult};
use crate::heightfield::HeightField;
use crate::terrain::constants::*;
use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use validator::Validate;

/// Parameters for multi-octave gradient noise terrain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct NoiseConfig {
    /// Selects the permutation table; the same seed always yields the same terrain
    pub seed: u32,
    /// Spatial frequency of the base octave
    #[validate(range(min = 0.000001))]
    pub noise_scale: f64,
    /// Number of summed noise layers
    #[validate(range(min = 1, max = 16))]
    pub octaves: u32,
    /// Amplitude multiplier applied per octave
    pub persistence: f64,
    /// Frequency multiplier applied per octave
    pub lacunarity: f64,
    pub amplitude_scale: f32,
    pub vertical_offset: f32,
    /// Rescale raw noise to [0, 1] before scaling and offsetting
    pub normalize: bool,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            seed: Perlin::DEFAULT_SEED,
            noise_scale: DEFAULT_NOISE_SCALE,
            octaves: DEFAULT_OCTAVES,
            persistence: DEFAULT_PERSISTENCE,
            lacunarity: DEFAULT_LACUNARITY,
            amplitude_scale: DEFAULT_AMPLITUDE_SCALE,
            vertical_offset: 0.0,
            normalize: true,
        }
    }
}

/// Produces heightfields from layered Perlin noise
#[derive(Debug, Clone, Default)]
pub struct TerrainNoiseGenerator {
    pub config: NoiseConfig,
}

impl TerrainNoiseGenerator {
    /// Create a new terrain generator
    pub fn new(config: NoiseConfig) -> Self {
        Self { config }
    }

    /// Generate a `width` x `height` heightfield.
    ///
    /// Regenerated wholesale on every parameter change; there is no
    /// incremental path.
    pub fn generate(&self, width: u32, height: u32) -> TerrainResult<HeightField> {
        if width == 0 || height == 0 {
            return Err(TerrainError::InvalidHeightField {
                reason: format!("Cannot generate terrain of size {width}x{height}"),
            });
        }

        self.config
            .validate()
            .map_err(|e| TerrainError::InvalidConfig {
                reason: format!("Noise configuration failed validation: {e}"),
            })?;

        let perlin = Perlin::new(self.config.seed);
        let mut raw = Vec::with_capacity(width as usize * height as usize);

        for y in 0..height {
            for x in 0..width {
                raw.push(self.sample(&perlin, x as f64, y as f64));
            }
        }

        let (raw_min, raw_max) = raw
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });

        let range = if raw_max - raw_min > 0.0 {
            raw_max - raw_min
        } else {
            NORMALIZE_EPSILON
        };

        debug!(
            "Raw noise range [{raw_min:.4}, {raw_max:.4}] over {} octaves",
            self.config.octaves
        );

        let samples = raw
            .into_iter()
            .map(|v| {
                let v = if self.config.normalize {
                    (v - raw_min) / range
                } else {
                    v
                };
                v as f32 * self.config.amplitude_scale + self.config.vertical_offset
            })
            .collect();

        let field = HeightField::new(width, height, samples)?;

        info!(
            "Generated {}x{} terrain (seed {}), elevation range [{:.2}, {:.2}]",
            width,
            height,
            self.config.seed,
            field.min_elevation(),
            field.max_elevation()
        );

        Ok(field)
    }

    /// Sum all octaves at one grid position
    fn sample(&self, perlin: &Perlin, x: f64, y: f64) -> f64 {
        let mut value = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = self.config.noise_scale;

        for _ in 0..self.config.octaves {
            value += perlin.get([x * frequency, y * frequency]) * amplitude;
            amplitude *= self.config.persistence;
            frequency *= self.config.lacunarity;
        }

        value
    }
}

/// Get a predefined terrain preset
pub fn get_terrain_preset(name: &str, seed: Option<u32>) -> Option<TerrainNoiseGenerator> {
    let seed = seed.unwrap_or_else(rand::random);

    let config = match name {
        "flat" => NoiseConfig {
            seed,
            amplitude_scale: 0.0,
            ..NoiseConfig::default()
        },
        "hills" => NoiseConfig {
            seed,
            noise_scale: 0.03,
            octaves: 4,
            persistence: 0.5,
            amplitude_scale: 8.0,
            ..NoiseConfig::default()
        },
        "mountains" => NoiseConfig {
            seed,
            noise_scale: 0.02,
            octaves: 6,
            persistence: 0.55,
            amplitude_scale: 40.0,
            ..NoiseConfig::default()
        },
        "dunes" => NoiseConfig {
            seed,
            noise_scale: 0.08,
            octaves: 2,
            persistence: 0.3,
            amplitude_scale: 3.0,
            ..NoiseConfig::default()
        },
        _ => return None,
    };

    Some(TerrainNoiseGenerator::new(config))
}
