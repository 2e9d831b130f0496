use std::fmt;

use gridpath_core::{CellState, Grid, GridError, Point};

use crate::reconstruct::PathReconstructor;
use crate::state::{CameFrom, Relaxed, SearchState};

// ---------------------------------------------------------------------------
// Step / Outcome / SearchReport
// ---------------------------------------------------------------------------

/// What the step callback asks the engine to do next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Continue,
    Cancel,
}

/// How a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    /// The end cell was popped from the frontier.
    Found,
    /// The frontier emptied without reaching the end.
    Exhausted,
    /// The step callback returned [`Step::Cancel`].
    Cancelled,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Found => "path found",
            Self::Exhausted => "no path",
            Self::Cancelled => "cancelled",
        })
    }
}

/// Result of one engine run.
#[derive(Clone, Debug)]
pub struct SearchReport {
    pub outcome: Outcome,
    pub start: Point,
    pub end: Point,
    /// Cells popped from the frontier, the end included when found.
    pub expansions: usize,
    /// Frontier pushes, the start included.
    pub pushes: u64,
    pub came_from: CameFrom,
}

impl SearchReport {
    #[inline]
    pub fn is_found(&self) -> bool {
        self.outcome == Outcome::Found
    }

    /// Reconstructor over this run's links, if the end was found.
    pub fn reconstructor(&self) -> Option<PathReconstructor<'_>> {
        self.is_found()
            .then(|| PathReconstructor::new(&self.came_from, self.end))
    }

    /// The path start to end inclusive, if the end was found.
    pub fn path(&self) -> Option<Vec<Point>> {
        self.reconstructor().map(|r| r.path())
    }
}

// ---------------------------------------------------------------------------
// SearchError
// ---------------------------------------------------------------------------

/// Precondition violations detected before a run starts.
///
/// "No path" and "cancelled" are not errors; see [`Outcome`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    MissingStart,
    MissingEnd,
    StartIsEnd(Point),
    OutOfBounds(Point),
    BarrierEndpoint(Point),
    Grid(GridError),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingStart => f.write_str("search: no start cell marked"),
            Self::MissingEnd => f.write_str("search: no end cell marked"),
            Self::StartIsEnd(p) => write!(f, "search: start and end are both {p}"),
            Self::OutOfBounds(p) => write!(f, "search: endpoint {p} is outside the grid"),
            Self::BarrierEndpoint(p) => write!(f, "search: endpoint {p} is a barrier"),
            Self::Grid(e) => write!(f, "search: {e}"),
        }
    }
}

impl std::error::Error for SearchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Grid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GridError> for SearchError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Step-driven A* over a [`Grid`] with unit edge costs and the Manhattan
/// heuristic.
///
/// The engine paints its progress into the grid (frontier cells Open,
/// expanded cells Closed; the start and end keep their own states) and
/// hands control to a step callback after every expansion, so the caller can
/// redraw and ask for cancellation. Identical inputs give identical
/// expansion sequences.
#[derive(Debug, Default)]
pub struct Engine {
    // scratch buffer for neighbour queries
    nbuf: Vec<Point>,
}

impl Engine {
    pub fn new() -> Self {
        Self {
            nbuf: Vec::with_capacity(4),
        }
    }

    /// Run from the grid's marked start to its marked end.
    pub fn run_marked<F>(
        &mut self,
        grid: &mut Grid,
        on_step: F,
    ) -> Result<SearchReport, SearchError>
    where
        F: FnMut(&Grid) -> Step,
    {
        let start = grid.start().ok_or(SearchError::MissingStart)?;
        let end = grid.end().ok_or(SearchError::MissingEnd)?;
        self.run(grid, start, end, on_step)
    }

    /// Search from `start` to `end`, calling `on_step` once per expanded
    /// cell after its neighbours are relaxed.
    ///
    /// Adjacency is computed first if the grid has none cached. The grid is
    /// borrowed mutably for the whole run, so it cannot be edited meanwhile.
    pub fn run<F>(
        &mut self,
        grid: &mut Grid,
        start: Point,
        end: Point,
        mut on_step: F,
    ) -> Result<SearchReport, SearchError>
    where
        F: FnMut(&Grid) -> Step,
    {
        check_endpoint(grid, start)?;
        check_endpoint(grid, end)?;
        if start == end {
            return Err(SearchError::StartIsEnd(start));
        }
        if !grid.has_adjacency() {
            grid.update_neighbors();
        }

        log::debug!(
            "search {start} -> {end} on {}x{} grid",
            grid.rows(),
            grid.cols()
        );

        let mut state = SearchState::new(grid, start, end);
        let mut nbuf = std::mem::take(&mut self.nbuf);
        let mut expansions = 0;

        let outcome = loop {
            let Some(current) = state.pop() else {
                break Outcome::Exhausted;
            };
            expansions += 1;
            if current == end {
                break Outcome::Found;
            }
            log::trace!(
                "expand {current} g={} f={}",
                state.g_score(current),
                state.f_score(current)
            );

            nbuf.clear();
            grid.neighbors_into(current, &mut nbuf);
            for &n in nbuf.iter() {
                if state.relax(current, n) == Relaxed::Pushed && n != end {
                    grid.set_state(n, CellState::Open)?;
                }
            }

            if on_step(grid) == Step::Cancel {
                break Outcome::Cancelled;
            }

            if current != start {
                grid.set_state(current, CellState::Closed)?;
            }
        };

        self.nbuf = nbuf;
        let pushes = state.pushes();
        log::debug!(
            "search {start} -> {end}: {outcome} after {expansions} expansions, {pushes} pushes"
        );

        Ok(SearchReport {
            outcome,
            start,
            end,
            expansions,
            pushes,
            came_from: state.into_came_from(),
        })
    }

    /// Shortest path from `start` to `end` inclusive, or `None` if no path
    /// exists. Runs on a copy of `grid`, leaving `grid` itself unpainted.
    pub fn find_path(
        &mut self,
        grid: &Grid,
        start: Point,
        end: Point,
    ) -> Result<Option<Vec<Point>>, SearchError> {
        let mut scratch = grid.clone();
        let report = self.run(&mut scratch, start, end, |_| Step::Continue)?;
        Ok(report.path())
    }
}

fn check_endpoint(grid: &Grid, p: Point) -> Result<(), SearchError> {
    match grid.state(p) {
        Err(_) => Err(SearchError::OutOfBounds(p)),
        Ok(CellState::Barrier) => Err(SearchError::BarrierEndpoint(p)),
        Ok(_) => Ok(()),
    }
}
