//! # grid_route
//!
//! Shortest routes on a painted grid. Cells are either open or blocked, moves go to the four
//! orthogonal neighbours at unit cost, and a route is searched with either
//! [breadth-first search](https://en.wikipedia.org/wiki/Breadth-first_search) or
//! [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) guided by the
//! [Manhattan distance](https://en.wikipedia.org/wiki/Taxicab_geometry). Both return a shortest
//! path by cell count.
//!
//! The designated start and end cells are always passable, even when painted as obstacles.
//! Searches hold no state between calls; every call works on the grid it is handed.
//!
//! ```
//! use grid_route::{find_path, PathingGrid, Point, SearchMode};
//!
//! let grid: PathingGrid = "....\n.##.\n....".parse().unwrap();
//! let result = find_path(&grid, Some(Point::new(0, 1)), Some(Point::new(3, 1)), SearchMode::Astar)
//!     .unwrap();
//! assert_eq!(result.len(), Some(6));
//! ```
pub mod editor;
pub mod error;
pub mod pathing_grid;
pub mod point;
pub mod search;
pub mod solver;

pub use crate::editor::GridEditor;
pub use crate::error::{PathfindingError, Result};
pub use crate::pathing_grid::{parse_map, Grid, ParsedMap, PathingGrid, PredicateGrid};
pub use crate::point::Point;
pub use crate::solver::{astar::AstarSolver, bfs::BfsSolver, GridSolver};

use core::fmt;
use core::str::FromStr;
use itertools::Itertools;
use std::collections::VecDeque;

/// Outcome of a search. Not finding a route is a normal result, not an error.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchResult {
    /// Cells from start to end, both included.
    Found(Vec<Point>),
    NotFound,
}

impl SearchResult {
    pub fn is_found(&self) -> bool {
        matches!(self, SearchResult::Found(_))
    }
    pub fn path(&self) -> Option<&Vec<Point>> {
        match self {
            SearchResult::Found(path) => Some(path),
            SearchResult::NotFound => None,
        }
    }
    pub fn into_path(self) -> Option<Vec<Point>> {
        match self {
            SearchResult::Found(path) => Some(path),
            SearchResult::NotFound => None,
        }
    }
    /// Number of cells on the path.
    pub fn len(&self) -> Option<usize> {
        self.path().map(Vec::len)
    }
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SearchResult::Found(path) => {
                write!(f, "path of {} cells:", path.len())?;
                for p in path {
                    write!(f, " {}", p)?;
                }
                Ok(())
            }
            SearchResult::NotFound => write!(f, "no path found"),
        }
    }
}

/// Which search strategy [find_path] runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchMode {
    /// Unweighted breadth-first search.
    #[default]
    Bfs,
    /// A* with the Manhattan distance heuristic.
    Astar,
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SearchMode::Bfs => write!(f, "bfs"),
            SearchMode::Astar => write!(f, "astar"),
        }
    }
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<SearchMode, String> {
        match s.to_ascii_lowercase().as_str() {
            "bfs" => Ok(SearchMode::Bfs),
            "astar" | "a*" => Ok(SearchMode::Astar),
            other => Err(format!("unknown search mode {:?}, expected bfs or astar", other)),
        }
    }
}

/// Computes a shortest path between the designated endpoints. Fails with
/// [PathfindingError::InvalidEndpoints] if either endpoint is missing and with
/// [PathfindingError::OutOfBounds] if one lies off the grid; otherwise the search runs to
/// completion and reports [SearchResult::Found] or [SearchResult::NotFound].
pub fn find_path<G: Grid>(
    grid: &G,
    start: Option<Point>,
    end: Option<Point>,
    mode: SearchMode,
) -> Result<SearchResult> {
    let (start, end) = start.zip(end).ok_or(PathfindingError::InvalidEndpoints)?;
    grid.check_bounds(start)?;
    grid.check_bounds(end)?;
    Ok(match mode {
        SearchMode::Bfs => BfsSolver.get_path_single_goal(grid, start, end),
        SearchMode::Astar => AstarSolver::new().get_path_single_goal(grid, start, end),
    })
}

/// Checks that `path` runs from `start` to `end` in orthogonal unit steps and that every cell
/// other than the endpoints is open.
pub fn is_valid_path<G: Grid>(grid: &G, path: &[Point], start: Point, end: Point) -> bool {
    path.first() == Some(&start)
        && path.last() == Some(&end)
        && path.iter().all(|p| grid.in_bounds(*p))
        && path
            .iter()
            .all(|p| *p == start || *p == end || !grid.is_blocked(*p))
        && path.iter().tuple_windows().all(|(a, b)| a.is_adjacent(b))
}

/// Reduces a path to its endpoints and the cells where it turns.
pub fn path_to_waypoints(path: &[Point]) -> Vec<Point> {
    let mut waypoints: Vec<Point> = path.first().copied().into_iter().collect();
    for (prev, cur, next) in path.iter().tuple_windows() {
        if prev.dir(cur) != cur.dir(next) {
            waypoints.push(*cur);
        }
    }
    if path.len() > 1 {
        waypoints.extend(path.last().copied());
    }
    waypoints
}

/// Turns axis-aligned waypoints into a path on the grid which can be followed step by step.
/// Consecutive waypoints that are not on a common row or column are joined by moving along x
/// first.
pub fn waypoints_to_path(waypoints: Vec<Point>) -> Vec<Point> {
    let mut waypoint_queue = waypoints.into_iter().collect::<VecDeque<Point>>();
    let mut path: Vec<Point> = Vec::new();
    let Some(mut current) = waypoint_queue.pop_front() else {
        return path;
    };
    path.push(current);
    for next in waypoint_queue {
        while current != next {
            let delta = current.dir(&next);
            current = if delta.x != 0 {
                current + Point::new(delta.x, 0)
            } else {
                current + Point::new(0, delta.y)
            };
            path.push(current);
        }
    }
    path
}
