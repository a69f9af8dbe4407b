use crate::errors::{TerrainError, TerrainResult};
use crate::terrain::coordinates::GridCell;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;
use validator::Validate;

/// Immutable rectangular grid of elevation samples.
///
/// Samples are stored in a single row-major buffer (`y * width + x`). The
/// cached extrema always bound every sample; a field is replaced wholesale
/// rather than edited when terrain parameters change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(try_from = "RawHeightField")]
pub struct HeightField {
    #[validate(range(min = 1))]
    width: u32,
    #[validate(range(min = 1))]
    height: u32,
    samples: Vec<f32>, // Flattened 2D array (row-major)
    min_elevation: f32,
    max_elevation: f32,
}

/// Serialized form of [`HeightField`]; stored extrema are ignored and
/// recomputed on the way in
#[derive(Deserialize)]
struct RawHeightField {
    width: u32,
    height: u32,
    samples: Vec<f32>,
    #[allow(dead_code)]
    min_elevation: f32,
    #[allow(dead_code)]
    max_elevation: f32,
}

impl TryFrom<RawHeightField> for HeightField {
    type Error = TerrainError;

    fn try_from(raw: RawHeightField) -> TerrainResult<Self> {
        Self::new(raw.width, raw.height, raw.samples)
    }
}

impl HeightField {
    /// Create a new heightfield with validation, computing the elevation extrema
    pub fn new(width: u32, height: u32, samples: Vec<f32>) -> TerrainResult<Self> {
        let expected_size = width as usize * height as usize;
        if samples.len() != expected_size {
            return Err(TerrainError::InvalidHeightField {
                reason: format!(
                    "Samples array size {} does not match dimensions {}x{} (expected {})",
                    samples.len(),
                    width,
                    height,
                    expected_size
                ),
            });
        }

        if let Some(index) = samples.iter().position(|s| !s.is_finite()) {
            return Err(TerrainError::InvalidHeightField {
                reason: format!("Non-finite elevation at sample index {index}"),
            });
        }

        let (min_elevation, max_elevation) = samples
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &s| {
                (lo.min(s), hi.max(s))
            });

        let field = Self {
            width,
            height,
            samples,
            min_elevation,
            max_elevation,
        };

        field
            .validate()
            .map_err(|_| TerrainError::InvalidHeightField {
                reason: format!("Dimensions must be positive, got {width}x{height}"),
            })?;

        Ok(field)
    }

    /// Build a heightfield from a grid of rows, rejecting ragged input
    pub fn from_rows(rows: Vec<Vec<f32>>) -> TerrainResult<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);

        if let Some(y) = rows.iter().position(|row| row.len() != width) {
            return Err(TerrainError::InvalidHeightField {
                reason: format!(
                    "Row {y} has {} samples, expected {width}",
                    rows[y].len()
                ),
            });
        }

        let samples = rows.into_iter().flatten().collect();
        Self::new(width as u32, height as u32, samples)
    }

    /// Create flat terrain, mostly useful for tests
    pub fn flat(width: u32, height: u32, elevation: f32) -> TerrainResult<Self> {
        let samples = vec![elevation; width as usize * height as usize];
        Self::new(width, height, samples)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Row-major sample buffer
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn min_elevation(&self) -> f32 {
        self.min_elevation
    }

    pub fn max_elevation(&self) -> f32 {
        self.max_elevation
    }

    /// Check if a cell lies within `[0, width) x [0, height)`
    pub fn contains(&self, cell: GridCell) -> bool {
        cell.x >= 0 && cell.y >= 0 && (cell.x as u32) < self.width && (cell.y as u32) < self.height
    }

    /// Linear index of a cell, or `None` when out of bounds
    pub fn index_of(&self, cell: GridCell) -> Option<usize> {
        self.contains(cell)
            .then(|| cell.y as usize * self.width as usize + cell.x as usize)
    }

    /// Inverse of [`HeightField::index_of`]
    pub fn cell_at(&self, index: usize) -> GridCell {
        let width = self.width as usize;
        GridCell::new((index % width) as i32, (index / width) as i32)
    }

    /// Get the elevation at a cell (no interpolation)
    pub fn elevation(&self, cell: GridCell) -> Option<f32> {
        self.index_of(cell).map(|index| self.samples[index])
    }

    /// Iterate over every cell in row-major order
    pub fn cells(&self) -> impl Iterator<Item = GridCell> + '_ {
        (0..self.samples.len()).map(|index| self.cell_at(index))
    }

    /// Iterate over rows of samples
    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        self.samples.chunks(self.width as usize)
    }

    /// Load a heightfield previously written by [`HeightField::save_to_file`]
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> TerrainResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(TerrainError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let data = std::fs::read(path)?;
        let (field, _): (HeightField, usize) =
            bincode::serde::decode_from_slice(&data, bincode::config::standard()).map_err(
                |e| TerrainError::CorruptedHeightFieldFile {
                    reason: format!("Failed to deserialize heightfield: {e}"),
                },
            )?;

        debug!(
            "Loaded {}x{} heightfield from {}",
            field.width,
            field.height,
            path.display()
        );
        Ok(field)
    }

    /// Save the heightfield in a compact binary encoding
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> TerrainResult<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let data =
            bincode::serde::encode_to_vec(self, bincode::config::standard()).map_err(|e| {
                TerrainError::InvalidHeightField {
                    reason: format!("Failed to serialize heightfield: {e}"),
                }
            })?;

        std::fs::write(path, data)?;
        Ok(())
    }
}
