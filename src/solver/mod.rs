use crate::pathing_grid::Grid;
use crate::search::SearchOutcome;
use crate::{Point, SearchResult};
use log::debug;
use smallvec::SmallVec;

pub mod astar;
pub mod bfs;

/// The in-bounds 4-neighbours of `node` that a search may step onto. The endpoints count as
/// passable whatever their paint state.
pub fn passable_neighbours<G: Grid>(
    grid: &G,
    node: Point,
    start: Point,
    end: Point,
) -> SmallVec<[Point; 4]> {
    grid.neighborhood_points(node)
        .into_iter()
        .filter(|p| *p == start || *p == end || !grid.is_blocked(*p))
        .collect()
}

/// A search strategy over a [Grid]. Solvers hold configuration only, so one solver can serve any
/// number of grids and calls.
pub trait GridSolver {
    /// Short name used in log records.
    fn name(&self) -> &'static str;

    /// Runs the search from `start` to `end`, both of which must be in bounds. The path cost in
    /// the outcome is the number of steps.
    fn search<G: Grid>(&self, grid: &G, start: Point, end: Point) -> SearchOutcome<Point, usize>;

    /// Computes a shortest path from `start` to `end`, both included.
    fn get_path_single_goal<G: Grid>(&self, grid: &G, start: Point, end: Point) -> SearchResult {
        debug!(
            "{} search from {} to {} on {}x{} grid",
            self.name(),
            start,
            end,
            grid.width(),
            grid.height()
        );
        let outcome = self.search(grid, start, end);
        match outcome.path {
            Some((path, steps)) => {
                debug!(
                    "{} found a {} step path after expanding {} cells",
                    self.name(),
                    steps,
                    outcome.expanded
                );
                SearchResult::Found(path)
            }
            None => {
                debug!(
                    "{} found no path after expanding {} cells",
                    self.name(),
                    outcome.expanded
                );
                SearchResult::NotFound
            }
        }
    }
}
