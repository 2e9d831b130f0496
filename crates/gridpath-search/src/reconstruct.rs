//! Path recovery from predecessor links.

use gridpath_core::{CellState, Grid, GridError, Point};

use crate::state::CameFrom;

/// Lazy walk over a `came_from` chain, from the cell before `end` back to the
/// cell after the start. Neither endpoint is yielded.
///
/// The walk is capped at `came_from.len()` steps, so it terminates even on
/// links that do not lead back to a start.
#[derive(Debug, Clone)]
pub struct PathIter<'a> {
    came_from: &'a CameFrom,
    current: Point,
    remaining: usize,
}

impl Iterator for PathIter<'_> {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.remaining == 0 {
            return None;
        }
        let prev = *self.came_from.get(&self.current)?;
        // The start is the one cell on the chain without a predecessor.
        if !self.came_from.contains_key(&prev) {
            self.remaining = 0;
            return None;
        }
        self.remaining -= 1;
        self.current = prev;
        Some(prev)
    }
}

/// Walk `came_from` backwards from `end`. See [`PathIter`].
pub fn reconstruct(came_from: &CameFrom, end: Point) -> PathIter<'_> {
    PathIter {
        came_from,
        current: end,
        remaining: came_from.len(),
    }
}

/// Marks and recovers the path found by a successful search.
///
/// Only meaningful for links from a run that ended in
/// [`Outcome::Found`](crate::Outcome::Found).
#[derive(Debug, Clone, Copy)]
pub struct PathReconstructor<'a> {
    came_from: &'a CameFrom,
    end: Point,
}

impl<'a> PathReconstructor<'a> {
    pub fn new(came_from: &'a CameFrom, end: Point) -> Self {
        Self { came_from, end }
    }

    /// Intermediate cells from end back to start, endpoints excluded.
    pub fn iter(&self) -> PathIter<'a> {
        reconstruct(self.came_from, self.end)
    }

    /// Mark every intermediate cell as [`CellState::Path`], calling
    /// `on_mark` after each one. Returns the number of cells marked.
    ///
    /// Marking is idempotent: a second call on the same links marks the same
    /// cells.
    pub fn mark(
        &self,
        grid: &mut Grid,
        mut on_mark: impl FnMut(&Grid),
    ) -> Result<usize, GridError> {
        let mut marked = 0;
        for p in self.iter() {
            grid.set_state(p, CellState::Path)?;
            on_mark(grid);
            marked += 1;
        }
        log::debug!("marked {marked} path cells ending at {}", self.end);
        Ok(marked)
    }

    /// The full path, start to end inclusive.
    pub fn path(&self) -> Vec<Point> {
        let mut path = vec![self.end];
        let mut current = self.end;
        for _ in 0..self.came_from.len() {
            let Some(&prev) = self.came_from.get(&current) else {
                break;
            };
            path.push(prev);
            current = prev;
        }
        path.reverse();
        path
    }
}
