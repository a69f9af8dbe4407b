//! Slope analysis over a heightfield.
//!
//! Slopes are angles in degrees between the horizontal plane and the line
//! joining two cell centers, using grid-cell units for planar distance.
//! All functions are pure reads of the heightfield.

use crate::heightfield::HeightField;
use crate::terrain::coordinates::{GridCell, NEIGHBOR_OFFSETS};

/// Slope in degrees between two cells.
///
/// Returns 0.0 when either cell is out of bounds or both are the same cell.
pub fn slope_between(field: &HeightField, from: GridCell, to: GridCell) -> f32 {
    let (Some(from_height), Some(to_height)) = (field.elevation(from), field.elevation(to)) else {
        return 0.0;
    };

    let planar_distance = from.euclidean_distance(&to);
    if planar_distance == 0.0 {
        return 0.0;
    }

    ((to_height - from_height).abs() / planar_distance)
        .atan()
        .to_degrees()
}

/// Steepest slope from `cell` to any of its in-bounds neighbors (up to 8).
pub fn max_slope_at(field: &HeightField, cell: GridCell) -> f32 {
    if !field.contains(cell) {
        return 0.0;
    }

    NEIGHBOR_OFFSETS
        .iter()
        .map(|&(dx, dy)| cell.offset(dx, dy))
        .filter(|neighbor| field.contains(*neighbor))
        .map(|neighbor| slope_between(field, cell, neighbor))
        .fold(0.0, f32::max)
}

/// Per-cell maximum slope, same dimensions as the source heightfield
#[derive(Debug, Clone, PartialEq)]
pub struct SlopeMap {
    width: u32,
    height: u32,
    values: Vec<f32>,
}

impl SlopeMap {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major slope values in degrees
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn get(&self, cell: GridCell) -> Option<f32> {
        if cell.x < 0 || cell.y < 0 || cell.x as u32 >= self.width || cell.y as u32 >= self.height
        {
            return None;
        }
        self.values
            .get(cell.y as usize * self.width as usize + cell.x as usize)
            .copied()
    }

    /// Steepest slope anywhere on the map
    pub fn max(&self) -> f32 {
        self.values.iter().copied().fold(0.0, f32::max)
    }

    pub fn mean(&self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().sum::<f32>() / self.values.len() as f32
    }

    /// Fraction of cells whose slope exceeds `threshold` degrees
    pub fn fraction_above(&self, threshold: f32) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        let steep = self.values.iter().filter(|&&v| v > threshold).count();
        steep as f32 / self.values.len() as f32
    }
}

/// Compute the slope map of a whole heightfield
pub fn slope_map(field: &HeightField) -> SlopeMap {
    let values = field.cells().map(|cell| max_slope_at(field, cell)).collect();
    SlopeMap {
        width: field.width(),
        height: field.height(),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> HeightField {
        // Rises by 1.0 per cell along x
        HeightField::new(3, 3, vec![0.0, 1.0, 2.0, 0.0, 1.0, 2.0, 0.0, 1.0, 2.0]).unwrap()
    }

    #[test]
    fn test_orthogonal_slope() {
        let field = ramp();
        let slope = slope_between(&field, GridCell::new(0, 0), GridCell::new(1, 0));
        assert!((slope - 45.0).abs() < 1e-4, "Expected 45 degrees, got {slope}");

        let flat = slope_between(&field, GridCell::new(0, 0), GridCell::new(0, 1));
        assert_eq!(flat, 0.0);
    }

    #[test]
    fn test_diagonal_slope_uses_planar_distance() {
        let field = ramp();
        let slope = slope_between(&field, GridCell::new(0, 0), GridCell::new(1, 1));
        let expected = (1.0f32 / std::f32::consts::SQRT_2).atan().to_degrees();
        assert!((slope - expected).abs() < 1e-4);
    }

    #[test]
    fn test_slope_symmetry() {
        let field = HeightField::new(2, 2, vec![0.0, 3.5, -1.25, 7.0]).unwrap();
        for a in field.cells() {
            for b in field.cells() {
                assert_eq!(slope_between(&field, a, b), slope_between(&field, b, a));
            }
        }
    }

    #[test]
    fn test_out_of_bounds_slope_is_zero() {
        let field = ramp();
        assert_eq!(
            slope_between(&field, GridCell::new(0, 0), GridCell::new(-1, 0)),
            0.0
        );
        assert_eq!(max_slope_at(&field, GridCell::new(3, 0)), 0.0);
    }

    #[test]
    fn test_max_slope_at_corner_and_center() {
        let mut samples = vec![0.0; 9];
        samples[4] = 1.0; // Bump at the center
        let field = HeightField::new(3, 3, samples).unwrap();

        // The center sees orthogonal neighbors at distance 1: 45 degrees
        let center = max_slope_at(&field, GridCell::new(1, 1));
        assert!((center - 45.0).abs() < 1e-4);

        // A corner only touches the center diagonally
        let corner = max_slope_at(&field, GridCell::new(0, 0));
        let expected = (1.0f32 / std::f32::consts::SQRT_2).atan().to_degrees();
        assert!((corner - expected).abs() < 1e-4);
    }

    #[test]
    fn test_single_cell_field() {
        let field = HeightField::flat(1, 1, 5.0).unwrap();
        assert_eq!(max_slope_at(&field, GridCell::new(0, 0)), 0.0);
        assert_eq!(slope_map(&field).values(), &[0.0]);
    }

    #[test]
    fn test_slope_map_dimensions_and_stats() {
        let field = ramp();
        let map = slope_map(&field);
        assert_eq!(map.width(), 3);
        assert_eq!(map.height(), 3);
        assert_eq!(map.values().len(), 9);
        assert!((map.max() - 45.0).abs() < 1e-4);
        assert_eq!(map.get(GridCell::new(1, 1)), Some(max_slope_at(&field, GridCell::new(1, 1))));
        assert_eq!(map.get(GridCell::new(3, 3)), None);
        assert_eq!(map.fraction_above(50.0), 0.0);
        assert_eq!(map.fraction_above(10.0), 1.0);
    }
}
