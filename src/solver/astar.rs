use crate::pathing_grid::Grid;
use crate::search::{astar, SearchOutcome};
use crate::solver::{passable_neighbours, GridSolver};
use crate::Point;

#[derive(Clone, Debug)]
pub struct AstarSolver {
    /// Scales the heuristic. Above 1.0 this is weighted A*, which expands fewer cells but may
    /// return a longer path.
    pub heuristic_factor: f32,
}

impl Default for AstarSolver {
    fn default() -> AstarSolver {
        AstarSolver::new()
    }
}

impl AstarSolver {
    pub fn new() -> AstarSolver {
        AstarSolver {
            heuristic_factor: 1.0,
        }
    }

    /// Manhattan distance times the heuristic factor. The unscaled distance is returned exactly
    /// so the default factor never overestimates.
    pub fn heuristic(&self, p1: &Point, p2: &Point) -> usize {
        let distance = p1.manhattan_distance(p2) as usize;
        if self.heuristic_factor == 1.0 {
            distance
        } else {
            (distance as f64 * self.heuristic_factor as f64) as usize
        }
    }
}

impl GridSolver for AstarSolver {
    fn name(&self) -> &'static str {
        "A*"
    }

    fn search<G: Grid>(&self, grid: &G, start: Point, end: Point) -> SearchOutcome<Point, usize> {
        astar(
            &start,
            |node| {
                passable_neighbours(grid, *node, start, end)
                    .into_iter()
                    .map(|p| (p, 1))
            },
            |point| self.heuristic(point, &end),
            |point| *point == end,
        )
    }
}
