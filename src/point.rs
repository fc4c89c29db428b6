use core::fmt;
use core::ops::{Add, Sub};
use smallvec::SmallVec;

/// A cell coordinate on the grid. `x` grows to the right, `y` grows downwards, so the first line
/// of a text map is `y = 0`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// Offsets of the 4-neighbourhood in the order the searches expand them.
pub const NEUMANN_OFFSETS: [Point; 4] = [
    Point { x: 1, y: 0 },
    Point { x: -1, y: 0 },
    Point { x: 0, y: 1 },
    Point { x: 0, y: -1 },
];

impl Point {
    pub const fn new(x: i32, y: i32) -> Point {
        Point { x, y }
    }
    /// The [Manhattan distance](https://en.wikipedia.org/wiki/Taxicab_geometry), which is the
    /// exact unobstructed distance on a 4-connected grid.
    pub fn manhattan_distance(&self, other: &Point) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
    /// Whether `other` is exactly one orthogonal step away.
    pub fn is_adjacent(&self, other: &Point) -> bool {
        self.manhattan_distance(other) == 1
    }
    /// The four orthogonal neighbours, without any bounds check.
    pub fn neumann_neighborhood(&self) -> SmallVec<[Point; 4]> {
        NEUMANN_OFFSETS.iter().map(|d| *self + *d).collect()
    }
    /// Unit step (each component in -1..=1) pointing from `self` towards `other`.
    pub fn dir(&self, other: &Point) -> Point {
        Point::new((other.x - self.x).signum(), (other.y - self.y).signum())
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Point {
        Point::new(x, y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manhattan_is_symmetric() {
        let a = Point::new(0, 0);
        let b = Point::new(4, -3);
        assert_eq!(a.manhattan_distance(&b), 7);
        assert_eq!(b.manhattan_distance(&a), 7);
    }

    #[test]
    fn neighbourhood_is_adjacent() {
        let p = Point::new(2, 2);
        let n = p.neumann_neighborhood();
        assert_eq!(n.len(), 4);
        assert!(n.iter().all(|q| p.is_adjacent(q)));
        assert!(!p.is_adjacent(&Point::new(3, 3)));
    }
}
