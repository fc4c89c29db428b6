use crate::error::{PathfindingError, Result};
use crate::Point;
use core::fmt;
use core::str::FromStr;
use log::{info, warn};
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;

/// Read-only view of a rectangular grid of blocked and open cells. This is all the searches need.
pub trait Grid {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    /// Whether the in-bounds cell `point` is painted as an obstacle.
    fn is_blocked(&self, point: Point) -> bool;

    fn in_bounds(&self, point: Point) -> bool {
        point.x >= 0
            && point.y >= 0
            && (point.x as usize) < self.width()
            && (point.y as usize) < self.height()
    }
    fn can_move_to(&self, point: Point) -> bool {
        self.in_bounds(point) && !self.is_blocked(point)
    }
    /// The in-bounds members of the 4-neighbourhood of `point`, blocked or not.
    fn neighborhood_points(&self, point: Point) -> SmallVec<[Point; 4]> {
        point
            .neumann_neighborhood()
            .into_iter()
            .filter(|p| self.in_bounds(*p))
            .collect()
    }
    /// Errors with [PathfindingError::OutOfBounds] unless `point` lies on the grid.
    fn check_bounds(&self, point: Point) -> Result<()> {
        if self.in_bounds(point) {
            Ok(())
        } else {
            warn!(
                "{} is outside the {}x{} grid",
                point,
                self.width(),
                self.height()
            );
            Err(PathfindingError::OutOfBounds {
                point,
                width: self.width(),
                height: self.height(),
            })
        }
    }
}

/// Adapts a passability predicate into a [Grid]. The closure returns [true] for blocked cells and
/// is only ever called with in-bounds points.
#[derive(Clone, Debug)]
pub struct PredicateGrid<F> {
    width: usize,
    height: usize,
    blocked: F,
}

impl<F> PredicateGrid<F>
where
    F: Fn(Point) -> bool,
{
    pub fn new(width: usize, height: usize, blocked: F) -> PredicateGrid<F> {
        PredicateGrid {
            width,
            height,
            blocked,
        }
    }
}

impl<F> Grid for PredicateGrid<F>
where
    F: Fn(Point) -> bool,
{
    fn width(&self) -> usize {
        self.width
    }
    fn height(&self) -> usize {
        self.height
    }
    fn is_blocked(&self, point: Point) -> bool {
        (self.blocked)(point)
    }
}

/// Coordinates are [i32], so neither dimension may exceed [i32::MAX].
fn check_dimensions(width: usize, height: usize) -> Result<()> {
    if width > i32::MAX as usize || height > i32::MAX as usize {
        Err(PathfindingError::GridTooLarge { width, height })
    } else {
        Ok(())
    }
}

/// Cell glyphs of the text map format.
pub const BLOCKED_GLYPH: char = '#';
pub const OPEN_GLYPH: char = '.';
pub const START_GLYPH: char = 'S';
pub const END_GLYPH: char = 'E';
pub const PATH_GLYPH: char = '*';

/// [PathingGrid] keeps the raw [bool] cell values, row-major, that determine whether a cell is
/// blocked ([true]) or open ([false]), and maintains information about connected components of
/// open cells using a [UnionFind] structure.
#[derive(Clone, Debug)]
pub struct PathingGrid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
    pub components: UnionFind<usize>,
    pub components_dirty: bool,
}

impl Default for PathingGrid {
    fn default() -> PathingGrid {
        PathingGrid::new(0, 0, false)
    }
}

impl PathingGrid {
    /// Creates a grid with every cell set to `blocked` and components already generated.
    ///
    /// # Panics
    ///
    /// If either dimension does not fit in an [i32] coordinate; see [try_new](Self::try_new).
    pub fn new(width: usize, height: usize, blocked: bool) -> PathingGrid {
        match PathingGrid::try_new(width, height, blocked) {
            Ok(grid) => grid,
            Err(err) => panic!("{}", err),
        }
    }

    /// Like [new](Self::new), but reports oversized dimensions as
    /// [PathfindingError::GridTooLarge].
    pub fn try_new(width: usize, height: usize, blocked: bool) -> Result<PathingGrid> {
        check_dimensions(width, height)?;
        let mut grid = PathingGrid {
            width,
            height,
            cells: vec![blocked; width * height],
            components: UnionFind::new(width * height),
            components_dirty: false,
        };
        if !blocked {
            grid.generate_components();
        }
        Ok(grid)
    }

    /// Builds a grid from already-decoded RGBA pixels, row-major. A pixel darker than half
    /// brightness (`r + g + b < 382.5`) becomes an obstacle; alpha is ignored.
    pub fn from_rgba(width: usize, height: usize, pixels: &[u8]) -> Result<PathingGrid> {
        check_dimensions(width, height)?;
        let expected = width * height * 4;
        if pixels.len() != expected {
            return Err(PathfindingError::PixelBuffer {
                expected,
                actual: pixels.len(),
            });
        }
        let cells = pixels
            .chunks_exact(4)
            .map(|px| 2 * (px[0] as u32 + px[1] as u32 + px[2] as u32) < 3 * 255)
            .collect();
        let mut grid = PathingGrid {
            width,
            height,
            cells,
            components: UnionFind::new(width * height),
            components_dirty: true,
        };
        grid.generate_components();
        Ok(grid)
    }

    fn ix(&self, point: Point) -> usize {
        point.y as usize * self.width + point.x as usize
    }

    /// Returns the value at `point`. Out-of-bounds points read as blocked.
    pub fn get(&self, point: Point) -> bool {
        !self.in_bounds(point) || self.cells[self.ix(point)]
    }

    /// Updates a cell. Joins newly connected components and flags the components as dirty if
    /// they are (potentially) broken apart into multiple.
    pub fn set(&mut self, point: Point, blocked: bool) -> Result<()> {
        self.check_bounds(point)?;
        let ix = self.ix(point);
        if self.cells[ix] == blocked {
            return Ok(());
        }
        self.cells[ix] = blocked;
        if blocked {
            self.components_dirty = true;
        } else {
            for n in self.neighborhood_points(point) {
                if !self.is_blocked(n) {
                    let n_ix = self.ix(n);
                    self.components.union(ix, n_ix);
                }
            }
        }
        Ok(())
    }

    /// Sets every cell of the `w` by `h` rectangle with top-left corner `corner`, clipped to the
    /// grid.
    pub fn set_rect(&mut self, corner: Point, w: i32, h: i32, blocked: bool) {
        // Dimensions fit in i32, see check_dimensions.
        let x_range = corner.x.max(0)..corner.x.saturating_add(w).min(self.width as i32);
        let y_range = corner.y.max(0)..corner.y.saturating_add(h).min(self.height as i32);
        for y in y_range {
            for x in x_range.clone() {
                // In bounds after clipping.
                let _ = self.set(Point::new(x, y), blocked);
            }
        }
    }

    pub fn blocked_count(&self) -> usize {
        self.cells.iter().filter(|b| **b).count()
    }

    /// Retrieves the component id a given [Point] belongs to. Only meaningful for open cells.
    pub fn get_component(&self, point: &Point) -> Option<usize> {
        self.in_bounds(*point)
            .then(|| self.components.find(self.ix(*point)))
    }

    /// Checks if start and goal are open and on the same component. Components must be up to
    /// date, see [update](Self::update).
    pub fn reachable(&self, start: &Point, goal: &Point) -> bool {
        !self.unreachable(start, goal)
    }

    /// Checks if start and goal are not on the same open component.
    pub fn unreachable(&self, start: &Point, goal: &Point) -> bool {
        if self.can_move_to(*start) && self.can_move_to(*goal) {
            !self.components.equiv(self.ix(*start), self.ix(*goal))
        } else {
            true
        }
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            self.generate_components();
        }
    }

    /// Generates a new [UnionFind] structure and links up open 4-neighbours to the same
    /// components. Looking right and down from every cell covers every edge once.
    pub fn generate_components(&mut self) {
        info!(
            "Generating connected components for {}x{} grid",
            self.width, self.height
        );
        let mut components = UnionFind::new(self.width * self.height);
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                let point = Point::new(x, y);
                if self.is_blocked(point) {
                    continue;
                }
                let parent_ix = self.ix(point);
                for n in [Point::new(x + 1, y), Point::new(x, y + 1)] {
                    if self.can_move_to(n) {
                        components.union(parent_ix, self.ix(n));
                    }
                }
            }
        }
        self.components = components;
        self.components_dirty = false;
    }

    /// Renders the grid in the text map format with `path` drawn over it. Start and end are taken
    /// from the ends of the path.
    pub fn render_path(&self, path: &[Point]) -> String {
        let mut glyphs: Vec<char> = self
            .cells
            .iter()
            .map(|b| if *b { BLOCKED_GLYPH } else { OPEN_GLYPH })
            .collect();
        for p in path.iter().filter(|p| self.in_bounds(**p)) {
            glyphs[self.ix(*p)] = PATH_GLYPH;
        }
        if let (Some(first), Some(last)) = (path.first(), path.last()) {
            if self.in_bounds(*last) {
                glyphs[self.ix(*last)] = END_GLYPH;
            }
            if self.in_bounds(*first) {
                glyphs[self.ix(*first)] = START_GLYPH;
            }
        }
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for row in glyphs.chunks(self.width.max(1)) {
            out.extend(row);
            out.push('\n');
        }
        out
    }
}

impl Grid for PathingGrid {
    fn width(&self) -> usize {
        self.width
    }
    fn height(&self) -> usize {
        self.height
    }
    fn is_blocked(&self, point: Point) -> bool {
        self.cells[self.ix(point)]
    }
}

impl fmt::Display for PathingGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for y in 0..self.height as i32 {
            let row = (0..self.width as i32)
                .map(|x| {
                    if self.is_blocked(Point::new(x, y)) {
                        BLOCKED_GLYPH
                    } else {
                        OPEN_GLYPH
                    }
                })
                .collect::<String>();
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}

/// A grid read from the text map format together with the endpoints marked on it.
#[derive(Clone, Debug)]
pub struct ParsedMap {
    pub grid: PathingGrid,
    pub start: Option<Point>,
    pub end: Option<Point>,
}

/// Reads a text map: one line per row, top row first. `#`, `@`, `T` and `O` are obstacles, `.`
/// and space are open, `S` and `E` (or `G`) mark the open start and end cells. Blank lines at
/// the edges are ignored; a row of spaces is a row of open cells.
pub fn parse_map(s: &str) -> Result<ParsedMap> {
    let lines: Vec<(usize, &str)> = s
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim_end_matches('\r')))
        .skip_while(|(_, l)| l.is_empty())
        .collect();
    let last_content = lines
        .iter()
        .rposition(|(_, l)| !l.is_empty())
        .ok_or_else(|| PathfindingError::Parse {
            line: 1,
            message: "map is empty".to_owned(),
        })?;
    let lines = &lines[..=last_content];

    let width = lines[0].1.chars().count();
    let height = lines.len();
    check_dimensions(width, height)?;
    let mut cells = Vec::with_capacity(width * height);
    let mut start = None;
    let mut end = None;
    for (y, (line_no, line)) in lines.iter().enumerate() {
        let parse_err = |message: String| PathfindingError::Parse {
            line: *line_no,
            message,
        };
        if line.chars().count() != width {
            return Err(parse_err(format!(
                "row has {} cells, expected {}",
                line.chars().count(),
                width
            )));
        }
        for (x, c) in line.chars().enumerate() {
            let point = Point::new(x as i32, y as i32);
            let blocked = match c {
                '#' | '@' | 'T' | 'O' => true,
                '.' | ' ' | PATH_GLYPH => false,
                START_GLYPH => {
                    if start.replace(point).is_some() {
                        return Err(parse_err("more than one start cell".to_owned()));
                    }
                    false
                }
                END_GLYPH | 'G' => {
                    if end.replace(point).is_some() {
                        return Err(parse_err("more than one end cell".to_owned()));
                    }
                    false
                }
                other => return Err(parse_err(format!("unknown cell glyph {:?}", other))),
            };
            cells.push(blocked);
        }
    }
    let mut grid = PathingGrid {
        width,
        height,
        cells,
        components: UnionFind::new(width * height),
        components_dirty: true,
    };
    grid.generate_components();
    Ok(ParsedMap { grid, start, end })
}

impl FromStr for PathingGrid {
    type Err = PathfindingError;

    fn from_str(s: &str) -> Result<PathingGrid> {
        parse_map(s).map(|parsed| parsed.grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests whether points are correctly mapped to different connected components
    #[test]
    fn test_component_generation() {
        // .#.
        // .#.
        let mut grid = PathingGrid::new(3, 2, false);
        grid.set(Point::new(1, 0), true).unwrap();
        grid.set(Point::new(1, 1), true).unwrap();
        assert!(grid.components_dirty);
        grid.update();
        assert!(grid.reachable(&Point::new(0, 0), &Point::new(0, 1)));
        assert!(grid.unreachable(&Point::new(0, 0), &Point::new(2, 0)));
        // Blocked cells are never reachable
        assert!(grid.unreachable(&Point::new(0, 0), &Point::new(1, 1)));
    }

    #[test]
    fn opening_a_cell_joins_components() {
        let mut grid: PathingGrid = "..#..".parse().unwrap();
        assert!(grid.unreachable(&Point::new(0, 0), &Point::new(4, 0)));
        grid.set(Point::new(2, 0), false).unwrap();
        assert!(!grid.components_dirty);
        assert!(grid.reachable(&Point::new(0, 0), &Point::new(4, 0)));
    }

    /// Diagonal contact does not connect cells on a 4-grid.
    #[test]
    fn diagonal_cells_are_separate() {
        // .#
        // #.
        let grid: PathingGrid = ".#\n#.".parse().unwrap();
        assert!(grid.unreachable(&Point::new(0, 0), &Point::new(1, 1)));
    }

    #[test]
    fn out_of_bounds_set_is_rejected() {
        let mut grid = PathingGrid::new(2, 2, false);
        let err = grid.set(Point::new(2, 0), true).unwrap_err();
        assert_eq!(
            err,
            PathfindingError::OutOfBounds {
                point: Point::new(2, 0),
                width: 2,
                height: 2
            }
        );
        assert!(grid.get(Point::new(-1, 0)));
    }

    #[test]
    fn parse_reads_endpoints_and_round_trips() {
        let map = "\nS..#\n.#..\n...E\n";
        let parsed = parse_map(map).unwrap();
        assert_eq!(parsed.start, Some(Point::new(0, 0)));
        assert_eq!(parsed.end, Some(Point::new(3, 2)));
        assert_eq!(parsed.grid.width(), 4);
        assert_eq!(parsed.grid.height(), 3);
        assert_eq!(parsed.grid.blocked_count(), 2);
        assert_eq!(parsed.grid.to_string(), "...#\n.#..\n....\n");
    }

    #[test]
    fn parse_rejects_ragged_rows() {
        let err = parse_map("...\n..\n").unwrap_err();
        assert!(matches!(err, PathfindingError::Parse { line: 2, .. }));
        assert!(parse_map("S.S").is_err());
        assert!(parse_map("..x").is_err());
        assert!(parse_map("\n\n").is_err());
    }

    #[test]
    fn rows_of_spaces_are_open_cells() {
        let parsed = parse_map("   \nS.E\n   ").unwrap();
        assert_eq!(parsed.grid.height(), 3);
        assert_eq!(parsed.grid.blocked_count(), 0);
        assert_eq!(parsed.start, Some(Point::new(0, 1)));
        assert_eq!(parsed.end, Some(Point::new(2, 1)));
        let blank = parse_map("\n  \n").unwrap();
        assert_eq!((blank.grid.width(), blank.grid.height()), (2, 1));
    }

    #[test]
    fn set_rect_clips_extreme_arguments() {
        let mut grid = PathingGrid::new(3, 2, false);
        grid.set_rect(Point::new(i32::MAX - 1, i32::MAX - 1), i32::MAX, i32::MAX, true);
        assert_eq!(grid.blocked_count(), 0);
        grid.set_rect(Point::new(i32::MIN, 1), i32::MAX, 1, true);
        assert_eq!(grid.blocked_count(), 0);
        grid.set_rect(Point::new(-4, 1), i32::MAX, i32::MAX, true);
        assert_eq!(grid.to_string(), "...\n###\n");
    }

    #[test]
    fn oversized_dimensions_are_rejected() {
        let too_wide = i32::MAX as usize + 1;
        assert_eq!(
            PathingGrid::try_new(too_wide, 0, false).unwrap_err(),
            PathfindingError::GridTooLarge {
                width: too_wide,
                height: 0
            }
        );
        assert!(PathingGrid::from_rgba(0, too_wide, &[]).is_err());
    }

    #[test]
    fn rgba_threshold_is_half_brightness() {
        // black, white, just below half, exactly half-ish above
        let pixels = [
            0, 0, 0, 255, //
            255, 255, 255, 255, //
            127, 127, 128, 0, //
            128, 128, 127, 0,
        ];
        let grid = PathingGrid::from_rgba(2, 2, &pixels).unwrap();
        assert!(grid.get(Point::new(0, 0)));
        assert!(!grid.get(Point::new(1, 0)));
        assert!(grid.get(Point::new(0, 1)));
        assert!(!grid.get(Point::new(1, 1)));
        assert_eq!(
            PathingGrid::from_rgba(2, 2, &pixels[..12]).unwrap_err(),
            PathfindingError::PixelBuffer {
                expected: 16,
                actual: 12
            }
        );
    }

    #[test]
    fn render_marks_path_and_endpoints() {
        let grid: PathingGrid = "...\n.#.\n...".parse().unwrap();
        let path = [
            Point::new(0, 0),
            Point::new(1, 0),
            Point::new(2, 0),
            Point::new(2, 1),
        ];
        assert_eq!(grid.render_path(&path), "S**\n.#E\n...\n");
    }

    #[test]
    fn predicate_grid_uses_closure() {
        let grid = PredicateGrid::new(3, 3, |p: Point| p.x == 1);
        assert!(!grid.can_move_to(Point::new(1, 2)));
        assert!(grid.can_move_to(Point::new(0, 2)));
        assert!(!grid.can_move_to(Point::new(3, 0)));
        assert_eq!(grid.neighborhood_points(Point::new(0, 0)).len(), 2);
    }
}
