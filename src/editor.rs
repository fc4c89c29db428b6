use crate::error::Result;
use crate::pathing_grid::{Grid, PathingGrid};
use crate::Point;
use fxhash::FxBuildHasher;
use indexmap::IndexMap;
use log::debug;

/// Cell states as they were before a stroke first touched them.
type Stroke = IndexMap<Point, bool, FxBuildHasher>;

/// Paints cells of a [PathingGrid] in strokes and undoes whole strokes. A stroke is everything
/// painted between [begin_stroke](Self::begin_stroke) and [end_stroke](Self::end_stroke), like
/// one press-drag-release of a brush.
#[derive(Clone, Debug, Default)]
pub struct GridEditor {
    grid: PathingGrid,
    history: Vec<Stroke>,
    current: Option<Stroke>,
}

impl GridEditor {
    pub fn new(grid: PathingGrid) -> GridEditor {
        GridEditor {
            grid,
            history: Vec::new(),
            current: None,
        }
    }

    /// The grid with components brought up to date.
    pub fn grid(&mut self) -> &PathingGrid {
        self.grid.update();
        &self.grid
    }

    pub fn into_grid(mut self) -> PathingGrid {
        self.end_stroke();
        self.grid.update();
        self.grid
    }

    /// Number of strokes that can be undone.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn begin_stroke(&mut self) {
        self.end_stroke();
        self.current = Some(Stroke::default());
    }

    /// Closes the open stroke. Strokes that touched nothing are dropped.
    pub fn end_stroke(&mut self) {
        if let Some(stroke) = self.current.take() {
            if !stroke.is_empty() {
                debug!("Recorded stroke over {} cells", stroke.len());
                self.history.push(stroke);
            }
        }
    }

    /// Sets `point` to `blocked`. Outside a stroke this is a stroke of its own.
    pub fn paint(&mut self, point: Point, blocked: bool) -> Result<()> {
        self.grid.check_bounds(point)?;
        let standalone = self.current.is_none();
        if standalone {
            self.begin_stroke();
        }
        let previous = self.grid.get(point);
        if let Some(stroke) = self.current.as_mut() {
            stroke.entry(point).or_insert(previous);
        }
        self.grid.set(point, blocked)?;
        if standalone {
            self.end_stroke();
        }
        Ok(())
    }

    /// Flips `point` between blocked and open as a single stroke and returns the new state.
    pub fn toggle(&mut self, point: Point) -> Result<bool> {
        self.grid.check_bounds(point)?;
        let blocked = !self.grid.get(point);
        self.end_stroke();
        self.paint(point, blocked)?;
        Ok(blocked)
    }

    /// Reverts the most recent stroke, closing an open one first. Returns [false] if there was
    /// nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.end_stroke();
        let Some(stroke) = self.history.pop() else {
            return false;
        };
        for (point, blocked) in stroke {
            // Every recorded point passed the bounds check when it was painted.
            let _ = self.grid.set(point, blocked);
        }
        self.grid.update();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undo_restores_whole_stroke() {
        let original: PathingGrid = "....\n.#..\n....".parse().unwrap();
        let mut editor = GridEditor::new(original.clone());
        editor.begin_stroke();
        for x in 0..4 {
            editor.paint(Point::new(x, 1), true).unwrap();
        }
        // Going back over a cell keeps its state from before the stroke.
        editor.paint(Point::new(1, 1), false).unwrap();
        editor.paint(Point::new(1, 1), true).unwrap();
        editor.end_stroke();
        assert_eq!(editor.history_len(), 1);
        assert!(editor
            .grid()
            .unreachable(&Point::new(0, 0), &Point::new(0, 2)));

        assert!(editor.undo());
        assert_eq!(editor.grid().to_string(), original.to_string());
        assert!(editor.grid().reachable(&Point::new(0, 0), &Point::new(0, 2)));
        assert!(!editor.undo());
    }

    #[test]
    fn strokes_undo_in_reverse_order() {
        let mut editor = GridEditor::new(PathingGrid::new(3, 1, false));
        assert!(editor.toggle(Point::new(0, 0)).unwrap());
        editor.paint(Point::new(2, 0), true).unwrap();
        assert_eq!(editor.history_len(), 2);
        assert_eq!(editor.grid().to_string(), "#.#\n");
        editor.undo();
        assert_eq!(editor.grid().to_string(), "#..\n");
        editor.undo();
        assert_eq!(editor.into_grid().to_string(), "...\n");
    }

    #[test]
    fn empty_and_rejected_strokes_leave_no_history() {
        let mut editor = GridEditor::new(PathingGrid::new(2, 2, false));
        editor.begin_stroke();
        assert!(editor.paint(Point::new(5, 5), true).is_err());
        editor.end_stroke();
        assert_eq!(editor.history_len(), 0);
        assert!(editor.toggle(Point::new(-1, 0)).is_err());
        assert_eq!(editor.history_len(), 0);
    }
}
