//! The [`Grid`] type: a fixed-size rectangle of [`Cell`]s with
//! 4-directional adjacency.
//!
//! The grid tracks which cell (if any) is the start and which is the end, so
//! the "at most one of each" rule is enforced by every state write rather
//! than by the caller.
//!
//! Grids also have a one-character-per-cell text form (see [`CellState::glyph`])
//! used by tests and debugging output:
//!
//! ```text
//! S..#.
//! .#.#.
//! .#...
//! ...#E
//! ```

use std::fmt;
use std::ops::Index;
use std::str::FromStr;

use crate::cell::{Cell, CellState};
use crate::geom::Point;

// ---------------------------------------------------------------------------
// GridError
// ---------------------------------------------------------------------------

/// Errors from checked grid access and from parsing a text layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// A coordinate outside `[0, rows) × [0, cols)`.
    OutOfBounds { point: Point, rows: i32, cols: i32 },
    /// A layout line whose width differs from the first line.
    Ragged {
        line: usize,
        expected: usize,
        found: usize,
    },
    /// A layout character that is not a cell glyph.
    InvalidChar { ch: char, point: Point },
    /// A second `S` or `E` in a layout.
    DuplicateMarker { marker: CellState, point: Point },
    /// A layout with no cells.
    Empty,
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { point, rows, cols } => {
                write!(f, "grid: point {point} outside {rows}x{cols} grid")
            }
            Self::Ragged {
                line,
                expected,
                found,
            } => write!(
                f,
                "grid: line {line} has {found} cells, expected {expected}"
            ),
            Self::InvalidChar { ch, point } => {
                write!(f, "grid: invalid cell \u{201c}{ch}\u{201d} at {point}")
            }
            Self::DuplicateMarker { marker, point } => {
                write!(f, "grid: second {marker:?} marker at {point}")
            }
            Self::Empty => f.write_str("grid: empty layout"),
        }
    }
}

impl std::error::Error for GridError {}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// A `rows × cols` grid owning one [`Cell`] per coordinate.
#[derive(Debug, Clone)]
pub struct Grid {
    rows: i32,
    cols: i32,
    cells: Vec<Cell>,
    start: Option<Point>,
    end: Option<Point>,
    // Per-cell neighbour lists from the last `update_neighbors`. Dropped
    // whenever a cell becomes or stops being a barrier.
    adjacency: Option<Vec<Vec<Point>>>,
}

impl Grid {
    /// Create a grid of free cells. Negative dimensions are clamped to 0.
    pub fn new(rows: i32, cols: i32) -> Self {
        let rows = rows.max(0);
        let cols = cols.max(0);
        let mut cells = Vec::with_capacity((rows as usize) * (cols as usize));
        for row in 0..rows {
            for col in 0..cols {
                cells.push(Cell::new(Point::new(row, col)));
            }
        }
        Self {
            rows,
            cols,
            cells,
            start: None,
            end: None,
            adjacency: None,
        }
    }

    #[inline]
    pub fn rows(&self) -> i32 {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> i32 {
        self.cols
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether `p` is inside the grid.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.row >= 0 && p.row < self.rows && p.col >= 0 && p.col < self.cols
    }

    /// Row-major flat index of `p`, or `None` if out of bounds.
    #[inline]
    pub fn idx(&self, p: Point) -> Option<usize> {
        if !self.contains(p) {
            return None;
        }
        Some((p.row as usize) * (self.cols as usize) + (p.col as usize))
    }

    /// Inverse of [`idx`](Grid::idx).
    #[inline]
    pub fn point(&self, idx: usize) -> Point {
        let cols = self.cols.max(1) as usize;
        Point::new((idx / cols) as i32, (idx % cols) as i32)
    }

    fn checked_idx(&self, p: Point) -> Result<usize, GridError> {
        self.idx(p).ok_or(GridError::OutOfBounds {
            point: p,
            rows: self.rows,
            cols: self.cols,
        })
    }

    /// The cell at `p`.
    pub fn get(&self, p: Point) -> Result<&Cell, GridError> {
        let i = self.checked_idx(p)?;
        Ok(&self.cells[i])
    }

    /// The state of the cell at `p`.
    pub fn state(&self, p: Point) -> Result<CellState, GridError> {
        self.get(p).map(|c| c.state)
    }

    /// The current start cell, if one is marked.
    #[inline]
    pub fn start(&self) -> Option<Point> {
        self.start
    }

    /// The current end cell, if one is marked.
    #[inline]
    pub fn end(&self) -> Option<Point> {
        self.end
    }

    /// Row-major iterator over all cells.
    pub fn iter(&self) -> std::slice::Iter<'_, Cell> {
        self.cells.iter()
    }

    /// Row-major iterator over all coordinates.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.cells.iter().map(|c| c.pos)
    }

    /// Write a cell state.
    ///
    /// Marking a cell Start (or End) demotes any previous start (or end) to
    /// Free; overwriting the current start or end forgets it.
    pub fn set_state(&mut self, p: Point, state: CellState) -> Result<(), GridError> {
        let i = self.checked_idx(p)?;
        let old = self.cells[i].state;
        if old == state {
            return Ok(());
        }

        if old == CellState::Start && self.start == Some(p) {
            self.start = None;
        }
        if old == CellState::End && self.end == Some(p) {
            self.end = None;
        }
        match state {
            CellState::Start => {
                if let Some(prev) = self.start.replace(p) {
                    self.demote(prev);
                }
            }
            CellState::End => {
                if let Some(prev) = self.end.replace(p) {
                    self.demote(prev);
                }
            }
            _ => {}
        }

        if old.is_barrier() != state.is_barrier() {
            self.adjacency = None;
        }
        self.cells[i].state = state;
        Ok(())
    }

    fn demote(&mut self, p: Point) {
        if let Some(i) = self.idx(p) {
            self.cells[i].state = CellState::Free;
        }
    }

    /// Primary edit action: the first placement marks the start, the second
    /// the end, every later one a barrier. Placing on the current start or
    /// end does nothing.
    ///
    /// Returns the resulting state of the cell.
    pub fn place(&mut self, p: Point) -> Result<CellState, GridError> {
        let i = self.checked_idx(p)?;
        let is_start = self.start == Some(p);
        let is_end = self.end == Some(p);
        if self.start.is_none() && !is_end {
            self.set_state(p, CellState::Start)?;
        } else if self.end.is_none() && !is_start {
            self.set_state(p, CellState::End)?;
        } else if !is_start && !is_end {
            self.set_state(p, CellState::Barrier)?;
        }
        Ok(self.cells[i].state)
    }

    /// Secondary edit action: free the cell, forgetting it as start or end.
    pub fn erase(&mut self, p: Point) -> Result<(), GridError> {
        self.set_state(p, CellState::Free)
    }

    /// Return every cell to Free and forget start, end and adjacency.
    pub fn reset(&mut self) {
        for c in self.cells.iter_mut() {
            c.state = CellState::Free;
        }
        self.start = None;
        self.end = None;
        self.adjacency = None;
    }

    /// Return Open, Closed and Path cells to Free, keeping the edited layout.
    pub fn clear_search(&mut self) {
        for c in self.cells.iter_mut() {
            if c.state.is_search_mark() {
                c.state = CellState::Free;
            }
        }
    }

    // -----------------------------------------------------------------------
    // Adjacency
    // -----------------------------------------------------------------------

    fn compute_neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        for n in p.neighbors_4() {
            if let Some(ni) = self.idx(n) {
                if !self.cells[ni].state.is_barrier() {
                    buf.push(n);
                }
            }
        }
    }

    /// Precompute the neighbour list of every cell.
    pub fn update_neighbors(&mut self) {
        let mut adjacency = Vec::with_capacity(self.cells.len());
        for c in &self.cells {
            let mut buf = Vec::with_capacity(4);
            self.compute_neighbors(c.pos, &mut buf);
            adjacency.push(buf);
        }
        log::trace!("adjacency rebuilt for {}x{} grid", self.rows, self.cols);
        self.adjacency = Some(adjacency);
    }

    /// Whether adjacency is cached and still matches the barrier layout.
    #[inline]
    pub fn has_adjacency(&self) -> bool {
        self.adjacency.is_some()
    }

    /// Append the non-barrier orthogonal neighbours of `p` to `buf`, in the
    /// order down, up, right, left. The caller clears `buf` before calling.
    ///
    /// # Panics
    ///
    /// Panics if `p` is outside the grid.
    pub fn neighbors_into(&self, p: Point, buf: &mut Vec<Point>) {
        let Some(i) = self.idx(p) else {
            panic!("neighbors of {p} requested outside {}x{} grid", self.rows, self.cols);
        };
        match &self.adjacency {
            Some(adj) => buf.extend_from_slice(&adj[i]),
            None => self.compute_neighbors(p, buf),
        }
    }

    /// The non-barrier orthogonal neighbours of `p` (down, up, right, left).
    ///
    /// # Panics
    ///
    /// Panics if `p` is outside the grid.
    pub fn neighbors(&self, p: Point) -> Vec<Point> {
        let mut buf = Vec::with_capacity(4);
        self.neighbors_into(p, &mut buf);
        buf
    }
}

impl Index<Point> for Grid {
    type Output = Cell;

    /// # Panics
    ///
    /// Panics if `p` is outside the grid.
    fn index(&self, p: Point) -> &Cell {
        match self.idx(p) {
            Some(i) => &self.cells[i],
            None => panic!("point {p} outside {}x{} grid", self.rows, self.cols),
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.cols.max(1) as usize) {
            for c in row {
                write!(f, "{}", c.state.glyph())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl FromStr for Grid {
    type Err = GridError;

    /// Parse a text layout. Leading and trailing whitespace on each line is
    /// ignored, as are blank lines.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        let Some(first) = lines.first() else {
            return Err(GridError::Empty);
        };
        let cols = first.chars().count();
        for (line, l) in lines.iter().enumerate() {
            let found = l.chars().count();
            if found != cols {
                return Err(GridError::Ragged {
                    line,
                    expected: cols,
                    found,
                });
            }
        }

        let mut grid = Grid::new(lines.len() as i32, cols as i32);
        for (row, l) in lines.iter().enumerate() {
            for (col, ch) in l.chars().enumerate() {
                let point = Point::new(row as i32, col as i32);
                let state =
                    CellState::from_glyph(ch).ok_or(GridError::InvalidChar { ch, point })?;
                let duplicate = match state {
                    CellState::Start => grid.start.is_some(),
                    CellState::End => grid.end.is_some(),
                    _ => false,
                };
                if duplicate {
                    return Err(GridError::DuplicateMarker {
                        marker: state,
                        point,
                    });
                }
                grid.set_state(point, state)?;
            }
        }
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(row: i32, col: i32) -> Point {
        Point::new(row, col)
    }

    #[test]
    fn new_grid_is_all_free() {
        let g = Grid::new(3, 4);
        assert_eq!((g.rows(), g.cols(), g.len()), (3, 4, 12));
        assert!(g.iter().all(|c| c.state == CellState::Free));
        assert_eq!(g[p(2, 3)].pos, p(2, 3));
        assert_eq!(g.start(), None);
        assert_eq!(g.end(), None);
    }

    #[test]
    fn idx_and_point_are_inverse() {
        let g = Grid::new(3, 5);
        for (i, q) in g.points().enumerate() {
            assert_eq!(g.idx(q), Some(i));
            assert_eq!(g.point(i), q);
        }
        assert_eq!(g.idx(p(3, 0)), None);
        assert_eq!(g.idx(p(0, -1)), None);
    }

    #[test]
    fn checked_access_reports_out_of_bounds() {
        let mut g = Grid::new(2, 2);
        let err = g.set_state(p(2, 0), CellState::Barrier).unwrap_err();
        assert_eq!(
            err,
            GridError::OutOfBounds {
                point: p(2, 0),
                rows: 2,
                cols: 2
            }
        );
        assert!(g.get(p(-1, 0)).is_err());
    }

    #[test]
    #[should_panic(expected = "outside 2x2 grid")]
    fn index_out_of_bounds_panics() {
        let g = Grid::new(2, 2);
        let _cell = g[p(5, 5)];
    }

    #[test]
    fn neighbors_follow_down_up_right_left_and_skip_barriers() {
        let mut g = Grid::new(3, 3);
        assert_eq!(g.neighbors(p(1, 1)), vec![p(2, 1), p(0, 1), p(1, 2), p(1, 0)]);
        g.set_state(p(0, 1), CellState::Barrier).unwrap();
        assert_eq!(g.neighbors(p(1, 1)), vec![p(2, 1), p(1, 2), p(1, 0)]);
        // Corner: only in-bounds neighbours.
        assert_eq!(g.neighbors(p(0, 0)), vec![p(1, 0)]);
    }

    #[test]
    fn left_neighbor_on_first_row_is_included() {
        let g = Grid::new(2, 3);
        assert_eq!(g.neighbors(p(0, 2)), vec![p(1, 2), p(0, 1)]);
    }

    #[test]
    fn cached_adjacency_matches_on_demand() {
        let mut g: Grid = "\
            ..#.
            .#..
            ....
        "
        .parse()
        .unwrap();
        let fresh: Vec<Vec<Point>> = g.points().map(|q| g.neighbors(q)).collect();
        g.update_neighbors();
        assert!(g.has_adjacency());
        let cached: Vec<Vec<Point>> = g.points().map(|q| g.neighbors(q)).collect();
        assert_eq!(fresh, cached);
    }

    #[test]
    fn barrier_change_drops_adjacency() {
        let mut g = Grid::new(3, 3);
        g.update_neighbors();
        g.set_state(p(1, 1), CellState::Open).unwrap();
        assert!(g.has_adjacency());
        g.set_state(p(1, 1), CellState::Barrier).unwrap();
        assert!(!g.has_adjacency());
        assert!(!g.neighbors(p(0, 1)).contains(&p(1, 1)));
    }

    #[test]
    fn place_marks_start_then_end_then_barriers() {
        let mut g = Grid::new(3, 3);
        assert_eq!(g.place(p(0, 0)).unwrap(), CellState::Start);
        assert_eq!(g.place(p(2, 2)).unwrap(), CellState::End);
        assert_eq!(g.place(p(1, 1)).unwrap(), CellState::Barrier);
        // Placing on start or end leaves them alone.
        assert_eq!(g.place(p(0, 0)).unwrap(), CellState::Start);
        assert_eq!(g.place(p(2, 2)).unwrap(), CellState::End);
        assert_eq!(g.start(), Some(p(0, 0)));
        assert_eq!(g.end(), Some(p(2, 2)));
    }

    #[test]
    fn erase_forgets_start_so_next_place_restores_it() {
        let mut g = Grid::new(3, 3);
        g.place(p(0, 0)).unwrap();
        g.place(p(2, 2)).unwrap();
        g.erase(p(0, 0)).unwrap();
        assert_eq!(g.start(), None);
        assert_eq!(g[p(0, 0)].state, CellState::Free);
        assert_eq!(g.place(p(1, 2)).unwrap(), CellState::Start);
        assert_eq!(g.start(), Some(p(1, 2)));
    }

    #[test]
    fn place_on_end_with_no_start_is_a_noop() {
        let mut g = Grid::new(2, 2);
        g.set_state(p(1, 1), CellState::End).unwrap();
        assert_eq!(g.place(p(1, 1)).unwrap(), CellState::End);
        assert_eq!(g.start(), None);
    }

    #[test]
    fn second_start_demotes_the_first() {
        let mut g = Grid::new(2, 2);
        g.set_state(p(0, 0), CellState::Start).unwrap();
        g.set_state(p(1, 1), CellState::Start).unwrap();
        assert_eq!(g[p(0, 0)].state, CellState::Free);
        assert_eq!(g.start(), Some(p(1, 1)));
        let starts = g.iter().filter(|c| c.state == CellState::Start).count();
        assert_eq!(starts, 1);
    }

    #[test]
    fn barrier_over_end_forgets_end() {
        let mut g = Grid::new(2, 2);
        g.set_state(p(0, 1), CellState::End).unwrap();
        g.set_state(p(0, 1), CellState::Barrier).unwrap();
        assert_eq!(g.end(), None);
    }

    #[test]
    fn reset_and_clear_search() {
        let mut g: Grid = "S o\n#x*\n..E".replace(' ', ".").parse().unwrap();
        g.clear_search();
        assert_eq!(g.to_string(), "S..\n#..\n..E\n");
        g.reset();
        assert_eq!(g.to_string(), "...\n...\n...\n");
        assert_eq!(g.start(), None);
        assert_eq!(g.end(), None);
    }

    #[test]
    fn layout_round_trip() {
        let text = "S..#.\n.#.#.\n.#...\n...#E\n";
        let g: Grid = text.parse().unwrap();
        assert_eq!(g.rows(), 4);
        assert_eq!(g.cols(), 5);
        assert_eq!(g.start(), Some(p(0, 0)));
        assert_eq!(g.end(), Some(p(3, 4)));
        assert_eq!(g.to_string(), text);
    }

    #[test]
    fn layout_errors() {
        assert_eq!("".parse::<Grid>().unwrap_err(), GridError::Empty);
        assert_eq!(
            "...\n..".parse::<Grid>().unwrap_err(),
            GridError::Ragged {
                line: 1,
                expected: 3,
                found: 2
            }
        );
        assert_eq!(
            "..\n.?".parse::<Grid>().unwrap_err(),
            GridError::InvalidChar {
                ch: '?',
                point: p(1, 1)
            }
        );
        assert_eq!(
            "S.\n.S".parse::<Grid>().unwrap_err(),
            GridError::DuplicateMarker {
                marker: CellState::Start,
                point: p(1, 1)
            }
        );
    }

    #[test]
    fn error_messages() {
        let e = GridError::OutOfBounds {
            point: p(7, 1),
            rows: 5,
            cols: 5,
        };
        assert_eq!(e.to_string(), "grid: point (7, 1) outside 5x5 grid");
        assert_eq!(GridError::Empty.to_string(), "grid: empty layout");
    }
}
