//! Front-end settings.

use std::time::Duration;

/// Settings for the terminal pathfinder.
///
/// Grid size, animation speed and barrier scattering belong to the
/// front-end; the search engine never sees them.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub rows: i32,
    pub cols: i32,
    /// Pause after every expansion so the search can be watched.
    pub step_delay: Duration,
    /// Probability that `r` turns a free cell into a barrier.
    pub barrier_density: f64,
    /// Seed for barrier scattering. `None` seeds from the thread-local generator.
    pub seed: Option<u64>,
    pub mouse: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rows: 30,
            cols: 30,
            step_delay: Duration::from_millis(8),
            barrier_density: 0.3,
            seed: None,
            mouse: true,
        }
    }
}

impl Config {
    /// Set the grid dimensions (builder). Values below 2 are raised to 2 so
    /// a start and an end always fit.
    pub fn with_size(mut self, rows: i32, cols: i32) -> Self {
        self.rows = rows.max(2);
        self.cols = cols.max(2);
        self
    }

    pub fn with_step_delay(mut self, delay: Duration) -> Self {
        self.step_delay = delay;
        self
    }

    /// Set the scatter density (builder), clamped to `[0, 1]`.
    pub fn with_barrier_density(mut self, density: f64) -> Self {
        self.barrier_density = density.clamp(0.0, 1.0);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Configure whether mouse events are captured.
    pub fn with_mouse(mut self, enabled: bool) -> Self {
        self.mouse = enabled;
        self
    }

    /// Shrink the grid to fit a `width × height` terminal, leaving one line
    /// for the status bar. Each cell is two columns wide.
    pub fn fit_to(mut self, width: u16, height: u16) -> Self {
        let max_cols = (width as i32 / crate::render::CELL_WIDTH as i32).max(2);
        let max_rows = (height as i32 - 1).max(2);
        self.rows = self.rows.min(max_rows);
        self.cols = self.cols.min(max_cols);
        self
    }
}
