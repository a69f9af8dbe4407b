use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// Offsets to the 8 surrounding cells, orthogonal directions first.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (0, -1),
    (1, 0),
    (0, 1),
    (-1, 0),
    (1, -1),
    (1, 1),
    (-1, 1),
    (-1, -1),
];

/// Integer grid coordinate into a heightfield.
///
/// Components are signed so that callers can express (and the engine can
/// reject) coordinates that fall outside the grid on either side.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Serialize, Deserialize,
)]
#[display("({x}, {y})")]
pub struct GridCell {
    pub x: i32,
    pub y: i32,
}

impl GridCell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Cell displaced by `(dx, dy)`; may fall outside any grid
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }

    /// Calculate Euclidean distance to another cell in grid units
    pub fn euclidean_distance(&self, other: &GridCell) -> f32 {
        let dx = self.x.abs_diff(other.x) as f32;
        let dy = self.y.abs_diff(other.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }

    /// Chebyshev (king-move) distance to another cell
    pub fn chebyshev_distance(&self, other: &GridCell) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    /// True when `other` is one of the 8 cells surrounding this one
    pub fn is_adjacent(&self, other: &GridCell) -> bool {
        self.chebyshev_distance(other) == 1
    }
}

/// Neighbor offsets for a 4- or 8-connected grid.
pub fn neighbor_offsets(allow_diagonal: bool) -> &'static [(i32, i32)] {
    if allow_diagonal {
        &NEIGHBOR_OFFSETS
    } else {
        &NEIGHBOR_OFFSETS[..4]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_cell_display_and_from() {
        let cell: GridCell = (3, -2).into();
        assert_eq!(cell, GridCell::new(3, -2));
        assert_eq!(cell.to_string(), "(3, -2)");
    }

    #[test]
    fn test_euclidean_distance() {
        let a = GridCell::new(0, 0);
        let b = GridCell::new(3, 4);
        assert!((a.euclidean_distance(&b) - 5.0).abs() < 1e-6);
        assert!((a.euclidean_distance(&GridCell::new(1, 1)) - std::f32::consts::SQRT_2).abs() < 1e-6);
    }

    #[test]
    fn test_euclidean_distance_at_extremes() {
        let a = GridCell::new(i32::MIN, 0);
        let b = GridCell::new(i32::MAX, 0);
        assert_eq!(a.euclidean_distance(&b), u32::MAX as f32);
        assert_eq!(b.euclidean_distance(&a), a.euclidean_distance(&b));
    }

    #[test]
    fn test_adjacency() {
        let c = GridCell::new(5, 5);
        assert!(c.is_adjacent(&GridCell::new(6, 6)));
        assert!(c.is_adjacent(&GridCell::new(5, 4)));
        assert!(!c.is_adjacent(&c));
        assert!(!c.is_adjacent(&GridCell::new(7, 5)));
    }

    #[test]
    fn test_neighbor_offsets() {
        assert_eq!(neighbor_offsets(false).len(), 4);
        assert_eq!(neighbor_offsets(true).len(), 8);
        // Orthogonal moves come first
        assert!(
            neighbor_offsets(true)[..4]
                .iter()
                .all(|(dx, dy)| dx.abs() + dy.abs() == 1)
        );
    }
}
