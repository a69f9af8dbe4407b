use crate::heightfield::HeightField;
use crate::terrain::coordinates::GridCell;
use crate::terrain::slope::max_slope_at;
use tracing::debug;

/// Cells visited by a straight walk from `from` to `to`.
///
/// Takes `ceil(distance)` unit-ish steps (both endpoints included) and
/// rounds each sample to the nearest cell.
pub fn line_samples(from: GridCell, to: GridCell) -> impl Iterator<Item = GridCell> {
    let steps = from.euclidean_distance(&to).ceil() as u32;
    let (dx, dy) = (to.x as f32 - from.x as f32, to.y as f32 - from.y as f32);

    (0..=steps).map(move |step| {
        let t = if steps == 0 {
            0.0
        } else {
            step as f32 / steps as f32
        };
        GridCell::new(
            (from.x as f32 + dx * t).round() as i32,
            (from.y as f32 + dy * t).round() as i32,
        )
    })
}

/// Check that every sampled cell on the segment is in bounds and no steeper
/// than `max_slope_degrees`
pub fn has_clear_line(
    field: &HeightField,
    from: GridCell,
    to: GridCell,
    max_slope_degrees: f32,
) -> bool {
    if !field.contains(from) || !field.contains(to) {
        return false;
    }

    line_samples(from, to)
        .all(|cell| field.contains(cell) && max_slope_at(field, cell) <= max_slope_degrees)
}

/// Drop interior waypoints that can be skipped by a straight line.
///
/// Single greedy pass: a waypoint is removed when the last kept waypoint
/// has a clear line to the waypoint after it. The first and last waypoints
/// are always kept. Only slope-at-sample is checked, so the result is not
/// cost-optimal under the full edge cost model.
pub fn smooth_path(field: &HeightField, path: &[GridCell], max_slope_degrees: f32) -> Vec<GridCell> {
    if path.len() <= 2 {
        return path.to_vec();
    }

    let mut smoothed = Vec::with_capacity(path.len());
    smoothed.push(path[0]);

    for window in path.windows(3) {
        let (waypoint, next) = (window[1], window[2]);
        let anchor = smoothed[smoothed.len() - 1];
        if !has_clear_line(field, anchor, next, max_slope_degrees) {
            smoothed.push(waypoint);
        }
    }

    smoothed.push(path[path.len() - 1]);

    debug!(
        "Path smoothing: raw_path={} waypoints, smoothed_path={} waypoints",
        path.len(),
        smoothed.len()
    );

    smoothed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight(from: (i32, i32), to: (i32, i32)) -> Vec<GridCell> {
        line_samples(from.into(), to.into()).collect()
    }

    #[test]
    fn test_line_samples_endpoints() {
        let cells = straight((0, 0), (4, 0));
        assert_eq!(cells.len(), 5);
        assert_eq!(cells[0], GridCell::new(0, 0));
        assert_eq!(cells[4], GridCell::new(4, 0));

        let single = straight((2, 2), (2, 2));
        assert_eq!(single, vec![GridCell::new(2, 2)]);
    }

    #[test]
    fn test_line_samples_diagonal() {
        // Distance 2*sqrt(2) -> 3 steps
        let cells = straight((0, 0), (2, 2));
        assert_eq!(cells.len(), 4);
        assert_eq!(cells.first(), Some(&GridCell::new(0, 0)));
        assert_eq!(cells.last(), Some(&GridCell::new(2, 2)));
    }

    #[test]
    fn test_smoothing_collapses_flat_staircase() {
        let field = HeightField::flat(6, 6, 0.0).unwrap();
        let path: Vec<GridCell> = [(0, 0), (1, 0), (1, 1), (2, 1), (2, 2), (3, 2), (3, 3)]
            .into_iter()
            .map(GridCell::from)
            .collect();

        let smoothed = smooth_path(&field, &path, 30.0);
        assert_eq!(smoothed, vec![GridCell::new(0, 0), GridCell::new(3, 3)]);
    }

    #[test]
    fn test_smoothing_keeps_waypoints_around_steep_cells() {
        let mut samples = vec![0.0; 25];
        samples[2 * 5 + 2] = 100.0; // Spike at (2, 2)
        let field = HeightField::new(5, 5, samples).unwrap();

        // Detour hugging the spike's neighborhood from the left/top
        let path: Vec<GridCell> = [(0, 2), (0, 1), (0, 0), (1, 0), (2, 0), (3, 0), (4, 0), (4, 1), (4, 2)]
            .into_iter()
            .map(GridCell::from)
            .collect();
        let smoothed = smooth_path(&field, &path, 30.0);

        assert_eq!(smoothed.first(), path.first());
        assert_eq!(smoothed.last(), path.last());
        assert!(smoothed.len() >= 3, "Must not cut straight through the spike");
        for pair in smoothed.windows(2) {
            if !pair[0].is_adjacent(&pair[1]) {
                assert!(has_clear_line(&field, pair[0], pair[1], 30.0));
            }
        }
    }

    #[test]
    fn test_out_of_range_waypoints_are_kept() {
        let field = HeightField::flat(5, 5, 0.0).unwrap();
        let far = GridCell::new(i32::MIN, 0);
        assert!(!has_clear_line(&field, GridCell::new(0, 0), far, 30.0));
        assert!(!has_clear_line(&field, far, GridCell::new(4, 4), 30.0));

        let path = vec![GridCell::new(0, 0), GridCell::new(1, 1), far];
        assert_eq!(smooth_path(&field, &path, 30.0), path);
    }

    #[test]
    fn test_short_paths_are_unchanged() {
        let field = HeightField::flat(3, 3, 0.0).unwrap();
        let path = vec![GridCell::new(0, 0), GridCell::new(1, 1)];
        assert_eq!(smooth_path(&field, &path, 30.0), path);
        assert!(smooth_path(&field, &[], 30.0).is_empty());
    }
}
