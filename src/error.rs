use crate::Point;

/// Errors reported before a search runs or while building a grid. Failing to find a route is not
/// an error; see [SearchResult::NotFound](crate::SearchResult::NotFound).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PathfindingError {
    /// Start or end has not been designated.
    #[error("set both start and end points")]
    InvalidEndpoints,

    #[error("{point} is outside the {width}x{height} grid")]
    OutOfBounds {
        point: Point,
        width: usize,
        height: usize,
    },

    /// A dimension does not fit in an [i32] coordinate.
    #[error("{width}x{height} grid is too large")]
    GridTooLarge { width: usize, height: usize },

    /// A text map could not be read. `line` is 1-based.
    #[error("map line {line}: {message}")]
    Parse { line: usize, message: String },

    /// An RGBA buffer does not hold `width * height` pixels.
    #[error("pixel buffer has {actual} bytes, expected {expected}")]
    PixelBuffer { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, PathfindingError>;
