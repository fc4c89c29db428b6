use crate::pathing_grid::Grid;
use crate::search::{bfs, SearchOutcome};
use crate::solver::{passable_neighbours, GridSolver};
use crate::Point;

/// Uniform-cost breadth-first search. The first path to reach the end is a shortest one.
#[derive(Clone, Copy, Debug, Default)]
pub struct BfsSolver;

impl GridSolver for BfsSolver {
    fn name(&self) -> &'static str {
        "BFS"
    }

    fn search<G: Grid>(&self, grid: &G, start: Point, end: Point) -> SearchOutcome<Point, usize> {
        bfs(
            &start,
            |node| passable_neighbours(grid, *node, start, end),
            |point| *point == end,
        )
    }
}
