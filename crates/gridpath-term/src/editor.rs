//! The edit loop model: user actions applied to a grid, and search runs
//! driven through a [`Frontend`].

use std::error::Error;
use std::fmt;
use std::io;
use std::time::Duration;

use gridpath_core::{CellState, Grid, GridError, Point};
use gridpath_search::{Engine, Outcome, SearchReport, Step};
use rand::rngs::StdRng;
use rand::{Rng, RngExt, SeedableRng};

use crate::config::Config;

/// A user request, already mapped from raw input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Mark start, then end, then barriers.
    Place(Point),
    /// Free a cell.
    Erase(Point),
    /// Search from start to end.
    Run,
    /// Reset every cell.
    Clear,
    /// Turn random free cells into barriers.
    Scatter,
    Quit,
}

/// What the status line reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Editing,
    NeedEndpoints,
    Searching,
    Finished {
        outcome: Outcome,
        expansions: usize,
        /// Step count of the marked path.
        path_len: Option<usize>,
    },
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Editing => f.write_str("click: start/end/wall  right-click: erase"),
            Self::NeedEndpoints => f.write_str("mark a start and an end first"),
            Self::Searching => f.write_str("searching... q to stop"),
            Self::Finished {
                outcome,
                expansions,
                path_len: Some(len),
            } => write!(f, "{outcome}: {len} steps, {expansions} expanded"),
            Self::Finished {
                outcome,
                expansions,
                path_len: None,
            } => write!(f, "{outcome}: {expansions} expanded"),
        }
    }
}

/// Rendering and cancellation polling, as seen by the editor.
pub trait Frontend {
    /// Draw the whole grid and the status line.
    fn draw(&mut self, grid: &Grid, status: &Status) -> io::Result<()>;

    /// Non-blocking check whether the user asked to stop the current run.
    fn cancel_requested(&mut self) -> io::Result<bool>;
}

/// Grid editor state.
pub struct Editor<R: Rng = StdRng> {
    grid: Grid,
    engine: Engine,
    rng: R,
    status: Status,
    step_delay: Duration,
    barrier_density: f64,
}

impl Editor<StdRng> {
    /// Create an editor with an empty grid sized by `config`.
    pub fn new(config: &Config) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> Editor<R> {
    /// Create an editor using `rng` for barrier scattering.
    pub fn with_rng(config: &Config, rng: R) -> Self {
        Self {
            grid: Grid::new(config.rows, config.cols),
            engine: Engine::new(),
            rng,
            status: Status::Editing,
            step_delay: config.step_delay,
            barrier_density: config.barrier_density,
        }
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Apply one action. [`Action::Quit`] is a no-op here; the caller's
    /// loop decides when to stop.
    pub fn apply<F: Frontend>(
        &mut self,
        action: Action,
        frontend: &mut F,
    ) -> Result<(), Box<dyn Error>> {
        match action {
            Action::Place(p) => {
                self.forget_search();
                self.grid.place(p)?;
            }
            Action::Erase(p) => {
                self.forget_search();
                self.grid.erase(p)?;
            }
            Action::Run => {
                self.run_search(frontend)?;
            }
            Action::Clear => {
                log::info!("grid cleared");
                self.grid.reset();
                self.status = Status::Editing;
            }
            Action::Scatter => {
                self.forget_search();
                let placed = self.scatter()?;
                log::info!("scattered {placed} barriers");
            }
            Action::Quit => {}
        }
        Ok(())
    }

    // Editing after a run wipes the previous run's marks.
    fn forget_search(&mut self) {
        if matches!(self.status, Status::Finished { .. }) {
            self.grid.clear_search();
            self.status = Status::Editing;
        }
    }

    fn scatter(&mut self) -> Result<usize, GridError> {
        let free: Vec<Point> = self
            .grid
            .iter()
            .filter(|c| c.state == CellState::Free)
            .map(|c| c.pos)
            .collect();
        let mut placed = 0;
        for p in free {
            if self.rng.random_bool(self.barrier_density) {
                self.grid.set_state(p, CellState::Barrier)?;
                placed += 1;
            }
        }
        Ok(placed)
    }

    /// Search from the marked start to the marked end, drawing after every
    /// expansion and after every path cell. Returns `None` without searching
    /// if either endpoint is missing.
    pub fn run_search<F: Frontend>(
        &mut self,
        frontend: &mut F,
    ) -> Result<Option<SearchReport>, Box<dyn Error>> {
        if self.grid.start().is_none() || self.grid.end().is_none() {
            self.status = Status::NeedEndpoints;
            return Ok(None);
        }

        self.grid.clear_search();
        self.grid.update_neighbors();
        self.status = Status::Searching;

        let status = self.status;
        let delay = self.step_delay;
        let mut failure: Option<io::Error> = None;
        let report = self.engine.run_marked(&mut self.grid, |grid| {
            let polled = frontend.draw(grid, &status).and_then(|()| {
                if !delay.is_zero() {
                    std::thread::sleep(delay);
                }
                frontend.cancel_requested()
            });
            match polled {
                Ok(false) => Step::Continue,
                Ok(true) => Step::Cancel,
                Err(e) => {
                    failure = Some(e);
                    Step::Cancel
                }
            }
        })?;
        if let Some(e) = failure {
            return Err(e.into());
        }

        let mut path_len = None;
        if let Some(r) = report.reconstructor() {
            let mut failure: Option<io::Error> = None;
            r.mark(&mut self.grid, |grid| {
                if failure.is_none() {
                    failure = frontend.draw(grid, &status).err();
                }
            })?;
            if let Some(e) = failure {
                return Err(e.into());
            }
            path_len = Some(r.path().len() - 1);
        }

        self.status = Status::Finished {
            outcome: report.outcome,
            expansions: report.expansions,
            path_len,
        };
        log::info!("{}", self.status);
        Ok(Some(report))
    }
}
