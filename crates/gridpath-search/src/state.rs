use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use gridpath_core::{Grid, Point};

use crate::distance::manhattan;

/// Sentinel meaning "+∞" for g- and f-scores.
pub const UNREACHABLE: i32 = i32::MAX;

/// Predecessor links recorded by relaxation. Only cells reached through a
/// relaxing edge have an entry, so the start never does.
pub type CameFrom = HashMap<Point, Point>;

// ---------------------------------------------------------------------------
// Frontier entries
// ---------------------------------------------------------------------------

/// A frontier entry ordered by `(f, order)`.
///
/// `order` is unique per run, so the ordering is total and never looks at
/// the cell itself.
#[derive(Clone, Copy, Debug)]
pub(crate) struct FrontierEntry {
    pub(crate) f: i32,
    pub(crate) order: u64,
    pub(crate) pos: Point,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f && self.order == other.order
    }
}

impl Eq for FrontierEntry {}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse so BinaryHeap (max-heap) pops smallest (f, order) first.
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.order.cmp(&self.order))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Result of relaxing one edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Relaxed {
    /// The edge did not improve the neighbour's g-score.
    No,
    /// The g-score improved; the neighbour already had a frontier entry.
    Improved,
    /// The g-score improved and the neighbour was pushed onto the frontier.
    Pushed,
}

// ---------------------------------------------------------------------------
// SearchState
// ---------------------------------------------------------------------------

/// Bookkeeping for a single A* run: g/f-scores, predecessor links and the
/// frontier with its membership mirror.
///
/// Scores are stored in flat row-major arrays sized to the grid. A cell is
/// flagged in the membership mirror exactly while it has an unpopped
/// frontier entry.
#[derive(Debug, Clone)]
pub struct SearchState {
    rows: i32,
    cols: i32,
    goal: Point,
    g: Vec<i32>,
    f: Vec<i32>,
    came_from: CameFrom,
    frontier: BinaryHeap<FrontierEntry>,
    in_frontier: Vec<bool>,
    counter: u64,
}

impl SearchState {
    /// Fresh state for a run from `start` to `goal` on `grid`: every score
    /// is +∞ except `g[start] = 0`, and the frontier holds only `start`
    /// with insertion order 0.
    ///
    /// # Panics
    ///
    /// Panics if `start` is outside `grid`.
    pub fn new(grid: &Grid, start: Point, goal: Point) -> Self {
        let len = grid.len();
        let mut state = Self {
            rows: grid.rows(),
            cols: grid.cols(),
            goal,
            g: vec![UNREACHABLE; len],
            f: vec![UNREACHABLE; len],
            came_from: CameFrom::new(),
            frontier: BinaryHeap::new(),
            in_frontier: vec![false; len],
            counter: 0,
        };
        let si = state.idx(start);
        state.g[si] = 0;
        state.f[si] = manhattan(start, goal);
        state.push(start, 0);
        state
    }

    #[inline]
    fn idx(&self, p: Point) -> usize {
        if p.row < 0 || p.row >= self.rows || p.col < 0 || p.col >= self.cols {
            panic!("search state queried at {p} outside {}x{} grid", self.rows, self.cols);
        }
        (p.row as usize) * (self.cols as usize) + (p.col as usize)
    }

    fn push(&mut self, p: Point, order: u64) {
        let i = self.idx(p);
        self.frontier.push(FrontierEntry {
            f: self.f[i],
            order,
            pos: p,
        });
        self.in_frontier[i] = true;
    }

    /// Pop the frontier entry with the smallest `(f, order)` and drop the
    /// cell from the membership mirror.
    pub fn pop(&mut self) -> Option<Point> {
        let entry = self.frontier.pop()?;
        let i = self.idx(entry.pos);
        self.in_frontier[i] = false;
        Some(entry.pos)
    }

    /// Relax the unit-cost edge `from → to`.
    ///
    /// On improvement, records the predecessor and new scores; if `to` has
    /// no frontier entry it is pushed with the next insertion order. An
    /// existing entry keeps the priority it was pushed with.
    ///
    /// # Panics
    ///
    /// Panics if either point is outside the grid.
    pub fn relax(&mut self, from: Point, to: Point) -> Relaxed {
        let candidate = self.g[self.idx(from)].saturating_add(1);
        let ti = self.idx(to);
        if candidate >= self.g[ti] {
            return Relaxed::No;
        }
        self.came_from.insert(to, from);
        self.g[ti] = candidate;
        self.f[ti] = candidate + manhattan(to, self.goal);
        if self.in_frontier[ti] {
            return Relaxed::Improved;
        }
        self.counter += 1;
        self.push(to, self.counter);
        Relaxed::Pushed
    }

    /// Best known cost from the start, or [`UNREACHABLE`].
    ///
    /// # Panics
    ///
    /// Panics if `p` is outside the grid.
    #[inline]
    pub fn g_score(&self, p: Point) -> i32 {
        self.g[self.idx(p)]
    }

    /// Last computed `g + h`, or [`UNREACHABLE`].
    ///
    /// # Panics
    ///
    /// Panics if `p` is outside the grid.
    #[inline]
    pub fn f_score(&self, p: Point) -> i32 {
        self.f[self.idx(p)]
    }

    /// Whether `p` currently has an unpopped frontier entry.
    ///
    /// # Panics
    ///
    /// Panics if `p` is outside the grid.
    #[inline]
    pub fn in_frontier(&self, p: Point) -> bool {
        self.in_frontier[self.idx(p)]
    }

    /// Number of unpopped frontier entries.
    #[inline]
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Total frontier pushes so far, the start included.
    #[inline]
    pub fn pushes(&self) -> u64 {
        self.counter + 1
    }

    #[inline]
    pub fn came_from(&self) -> &CameFrom {
        &self.came_from
    }

    /// Consume the state, keeping only what path reconstruction needs.
    pub fn into_came_from(self) -> CameFrom {
        self.came_from
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(row: i32, col: i32) -> Point {
        Point::new(row, col)
    }

    #[test]
    fn fresh_state_scores() {
        let g = Grid::new(3, 3);
        let s = SearchState::new(&g, p(0, 0), p(2, 2));
        assert_eq!(s.g_score(p(0, 0)), 0);
        assert_eq!(s.f_score(p(0, 0)), 4);
        assert_eq!(s.g_score(p(1, 1)), UNREACHABLE);
        assert_eq!(s.f_score(p(2, 2)), UNREACHABLE);
        assert!(s.in_frontier(p(0, 0)));
        assert_eq!(s.frontier_len(), 1);
        assert!(s.came_from().is_empty());
    }

    #[test]
    fn frontier_ties_pop_in_insertion_order() {
        let mut heap = BinaryHeap::new();
        for (order, col) in [(3, 0), (1, 1), (2, 2)] {
            heap.push(FrontierEntry {
                f: 5,
                order,
                pos: p(0, col),
            });
        }
        heap.push(FrontierEntry {
            f: 4,
            order: 9,
            pos: p(9, 9),
        });
        let popped: Vec<Point> = std::iter::from_fn(|| heap.pop().map(|e| e.pos)).collect();
        assert_eq!(popped, vec![p(9, 9), p(0, 1), p(0, 2), p(0, 0)]);
    }

    #[test]
    fn relax_pushes_once_and_tracks_membership() {
        let g = Grid::new(3, 3);
        let mut s = SearchState::new(&g, p(1, 1), p(2, 2));
        assert_eq!(s.pop(), Some(p(1, 1)));
        assert!(!s.in_frontier(p(1, 1)));

        assert_eq!(s.relax(p(1, 1), p(2, 1)), Relaxed::Pushed);
        assert_eq!(s.g_score(p(2, 1)), 1);
        assert_eq!(s.f_score(p(2, 1)), 2);
        assert_eq!(s.came_from()[&p(2, 1)], p(1, 1));
        assert!(s.in_frontier(p(2, 1)));

        // Same cost again is not an improvement.
        assert_eq!(s.relax(p(1, 1), p(2, 1)), Relaxed::No);
        assert_eq!(s.frontier_len(), 1);
        assert_eq!(s.pushes(), 2);
    }

    #[test]
    fn improvement_while_queued_keeps_single_entry() {
        let g = Grid::new(1, 4);
        let mut s = SearchState::new(&g, p(0, 0), p(0, 3));
        s.pop();
        s.relax(p(0, 0), p(0, 1));
        // Pretend a worse route found (0, 2) first.
        s.g[2] = 5;
        s.counter += 1;
        s.push(p(0, 2), s.counter);
        assert_eq!(s.relax(p(0, 1), p(0, 2)), Relaxed::Improved);
        assert_eq!(s.g_score(p(0, 2)), 2);
        assert_eq!(s.came_from()[&p(0, 2)], p(0, 1));
        assert_eq!(s.frontier_len(), 2);
    }

    #[test]
    #[should_panic(expected = "outside 3x3 grid")]
    fn score_outside_grid_panics() {
        let g = Grid::new(3, 3);
        let s = SearchState::new(&g, p(0, 0), p(2, 2));
        s.g_score(p(0, 3));
    }

    #[test]
    #[should_panic(expected = "outside 3x3 grid")]
    fn negative_point_panics() {
        let g = Grid::new(3, 3);
        let s = SearchState::new(&g, p(0, 0), p(2, 2));
        s.in_frontier(p(-1, 0));
    }

    #[test]
    fn into_came_from_keeps_links() {
        let g = Grid::new(2, 2);
        let mut s = SearchState::new(&g, p(0, 0), p(1, 1));
        s.pop();
        s.relax(p(0, 0), p(1, 0));
        let links = s.into_came_from();
        assert_eq!(links.len(), 1);
        assert_eq!(links[&p(1, 0)], p(0, 0));
    }
}
