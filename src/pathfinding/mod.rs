use crate::heightfield::HeightField;
use crate::terrain::constants::*;
use crate::terrain::coordinates::{GridCell, neighbor_offsets};
use crate::terrain::slope::{SlopeMap, max_slope_at, slope_between, slope_map};
use pathfinding::prelude::bfs_reach;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

mod frontier;
pub mod smoothing;

use frontier::Frontier;
pub use smoothing::{has_clear_line, line_samples, smooth_path};

const NO_PREDECESSOR: usize = usize::MAX;

/// Configuration for the slope-aware cost model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathfindingConfig {
    /// Steepest slope in degrees an edge may have and still be traversable
    pub max_slope_degrees: f32,
    /// Allow 8-directional movement
    pub allow_diagonal_moves: bool,
    /// Weight of the normalized slope term in edge cost
    pub slope_weight: f32,
    /// Weight of the planar distance term in edge cost (and the heuristic)
    pub distance_weight: f32,
}

impl Default for PathfindingConfig {
    fn default() -> Self {
        Self {
            max_slope_degrees: DEFAULT_MAX_SLOPE_DEGREES,
            allow_diagonal_moves: true,
            slope_weight: DEFAULT_SLOPE_WEIGHT,
            distance_weight: DEFAULT_DISTANCE_WEIGHT,
        }
    }
}

impl PathfindingConfig {
    /// Return a new config with every field present in `patch` overridden
    pub fn merged(&self, patch: &PathfindingConfigPatch) -> Self {
        Self {
            max_slope_degrees: patch.max_slope_degrees.unwrap_or(self.max_slope_degrees),
            allow_diagonal_moves: patch
                .allow_diagonal_moves
                .unwrap_or(self.allow_diagonal_moves),
            slope_weight: patch.slope_weight.unwrap_or(self.slope_weight),
            distance_weight: patch.distance_weight.unwrap_or(self.distance_weight),
        }
    }
}

/// Partial override of a [`PathfindingConfig`]; `None` keeps the prior value
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PathfindingConfigPatch {
    pub max_slope_degrees: Option<f32>,
    pub allow_diagonal_moves: Option<bool>,
    pub slope_weight: Option<f32>,
    pub distance_weight: Option<f32>,
}

/// Outcome of a single search
#[derive(Debug, Clone, PartialEq)]
pub struct PathResult {
    /// Cells from start to goal inclusive; empty when unsuccessful
    pub path: Vec<GridCell>,
    pub total_cost: f32,
    pub success: bool,
    /// Cells taken off the frontier, the goal included
    pub nodes_explored: usize,
    pub elapsed: Duration,
}

impl PathResult {
    fn failed(nodes_explored: usize, elapsed: Duration) -> Self {
        Self {
            path: Vec::new(),
            total_cost: 0.0,
            success: false,
            nodes_explored,
            elapsed,
        }
    }
}

/// Cost of moving between two adjacent cells, or `None` if the edge is
/// steeper than the configured ceiling.
pub fn edge_cost(
    field: &HeightField,
    from: GridCell,
    to: GridCell,
    config: &PathfindingConfig,
) -> Option<f32> {
    let slope = slope_between(field, from, to);
    if slope > config.max_slope_degrees {
        return None;
    }

    let distance = if from.x != to.x && from.y != to.y {
        DIAGONAL_DISTANCE
    } else {
        1.0
    };

    // A flat edge under a zero ceiling stays passable and costs distance only
    let slope_ratio = if slope == 0.0 {
        0.0
    } else {
        slope / config.max_slope_degrees
    };

    Some(distance * config.distance_weight + slope_ratio * config.slope_weight)
}

/// Passable neighbors of `cell` with the cost of stepping to each
pub fn successors<'a>(
    field: &'a HeightField,
    cell: GridCell,
    config: &'a PathfindingConfig,
) -> impl Iterator<Item = (GridCell, f32)> + 'a {
    neighbor_offsets(config.allow_diagonal_moves)
        .iter()
        .map(move |&(dx, dy)| cell.offset(dx, dy))
        .filter(move |neighbor| field.contains(*neighbor))
        .filter_map(move |neighbor| {
            edge_cost(field, cell, neighbor, config).map(|cost| (neighbor, cost))
        })
}

/// Euclidean distance to the goal scaled by the distance weight
fn heuristic(cell: GridCell, goal: GridCell, config: &PathfindingConfig) -> f32 {
    cell.euclidean_distance(&goal) * config.distance_weight
}

/// Find the minimum-cost path between two cells using A*.
///
/// Out-of-bounds endpoints and unreachable goals are reported through
/// `success = false`; this never panics on caller input.
pub fn find_path(
    field: &HeightField,
    start: GridCell,
    goal: GridCell,
    config: &PathfindingConfig,
) -> PathResult {
    let started = Instant::now();

    let (Some(start_index), Some(goal_index)) = (field.index_of(start), field.index_of(goal))
    else {
        warn!(
            "Pathfinding rejected: start={} goal={} outside {}x{} grid",
            start,
            goal,
            field.width(),
            field.height()
        );
        return PathResult::failed(0, started.elapsed());
    };

    // Per-cell bookkeeping lives in flat arrays indexed by y * width + x
    let cell_count = field.len();
    let mut g_score = vec![f32::INFINITY; cell_count];
    let mut came_from = vec![NO_PREDECESSOR; cell_count];
    let mut closed = vec![false; cell_count];
    let mut frontier = Frontier::new(cell_count);

    g_score[start_index] = 0.0;
    frontier.push(start_index, heuristic(start, goal, config));

    let mut nodes_explored = 0;

    while let Some((current_index, _)) = frontier.pop() {
        nodes_explored += 1;

        if current_index == goal_index {
            let path = reconstruct_path(field, &came_from, goal_index);
            let total_cost = g_score[goal_index];
            let elapsed = started.elapsed();

            debug!(
                "Pathfinding success: {} -> {} with {} waypoints, cost={:.3}, explored={} in {:?}",
                start,
                goal,
                path.len(),
                total_cost,
                nodes_explored,
                elapsed
            );

            return PathResult {
                path,
                total_cost,
                success: true,
                nodes_explored,
                elapsed,
            };
        }

        closed[current_index] = true;
        let current = field.cell_at(current_index);
        let current_g = g_score[current_index];

        for (neighbor, step_cost) in successors(field, current, config) {
            let Some(neighbor_index) = field.index_of(neighbor) else {
                continue;
            };
            if closed[neighbor_index] {
                continue;
            }

            let tentative_g = current_g + step_cost;
            if tentative_g >= g_score[neighbor_index] {
                continue;
            }

            came_from[neighbor_index] = current_index;
            g_score[neighbor_index] = tentative_g;
            let f = tentative_g + heuristic(neighbor, goal, config);

            if frontier.contains(neighbor_index) {
                frontier.decrease_key(neighbor_index, f);
            } else {
                frontier.push(neighbor_index, f);
            }
        }

        trace!(
            "Expanded {} (g={:.3}), frontier size {}",
            current,
            current_g,
            frontier.len()
        );
    }

    let elapsed = started.elapsed();
    debug!(
        "Pathfinding failed: {} unreachable from {} under {:.1} degree ceiling after exploring {} cells",
        goal, start, config.max_slope_degrees, nodes_explored
    );

    PathResult::failed(nodes_explored, elapsed)
}

/// Walk predecessors back from the goal and return the path start -> goal
fn reconstruct_path(field: &HeightField, came_from: &[usize], goal_index: usize) -> Vec<GridCell> {
    let mut path = Vec::new();
    let mut index = goal_index;

    while index != NO_PREDECESSOR {
        path.push(field.cell_at(index));
        index = came_from[index];
    }

    path.reverse();
    path
}

/// Total cost of a cell sequence under the cost model, or `None` if any step
/// leaves the grid, is not between adjacent cells, or is impassable.
pub fn path_cost(field: &HeightField, path: &[GridCell], config: &PathfindingConfig) -> Option<f32> {
    if path.is_empty() || !path.iter().all(|cell| field.contains(*cell)) {
        return None;
    }

    path.windows(2).try_fold(0.0, |total, step| {
        if !step[0].is_adjacent(&step[1]) {
            return None;
        }
        let diagonal = step[0].x != step[1].x && step[0].y != step[1].y;
        if diagonal && !config.allow_diagonal_moves {
            return None;
        }
        edge_cost(field, step[0], step[1], config).map(|cost| total + cost)
    })
}

/// Slope-aware pathfinder bound to one immutable heightfield.
///
/// Searches take `&self` and allocate their own working state, so a single
/// engine can serve concurrent searches from several threads. Option
/// updates require `&mut self` and apply to the next search.
#[derive(Debug, Clone)]
pub struct PathfindingEngine {
    field: Arc<HeightField>,
    config: PathfindingConfig,
}

impl PathfindingEngine {
    pub fn new(field: Arc<HeightField>, config: PathfindingConfig) -> Self {
        Self { field, config }
    }

    /// Create with default configuration
    pub fn with_defaults(field: Arc<HeightField>) -> Self {
        Self::new(field, PathfindingConfig::default())
    }

    pub fn height_field(&self) -> &Arc<HeightField> {
        &self.field
    }

    /// Find a path from start to goal using the active options
    pub fn find_path(&self, start: GridCell, goal: GridCell) -> PathResult {
        find_path(&self.field, start, goal, &self.config)
    }

    /// Steepest slope around a cell; 0.0 when out of bounds
    pub fn get_slope_at(&self, cell: GridCell) -> f32 {
        max_slope_at(&self.field, cell)
    }

    pub fn generate_slope_map(&self) -> SlopeMap {
        slope_map(&self.field)
    }

    /// Greedy straight-line simplification respecting the slope ceiling
    pub fn smooth_path(&self, path: &[GridCell]) -> Vec<GridCell> {
        smooth_path(&self.field, path, self.config.max_slope_degrees)
    }

    /// Re-evaluate a path under the active cost model
    pub fn path_cost(&self, path: &[GridCell]) -> Option<f32> {
        path_cost(&self.field, path, &self.config)
    }

    /// Every cell reachable from `start` without crossing an impassable edge
    pub fn reachable_cells(&self, start: GridCell) -> Vec<GridCell> {
        if !self.field.contains(start) {
            return Vec::new();
        }

        let field = self.field.as_ref();
        let config = &self.config;
        bfs_reach(start, |&cell| {
            successors(field, cell, config).map(|(neighbor, _)| neighbor)
        })
        .collect()
    }

    /// Merge a partial override into the active options
    pub fn update_options(&mut self, patch: &PathfindingConfigPatch) {
        self.config = self.config.merged(patch);
        debug!("Pathfinding options updated: {:?}", self.config);
    }

    pub fn options(&self) -> PathfindingConfig {
        self.config
    }
}
