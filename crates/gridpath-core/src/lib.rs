//! **gridpath-core**: the grid model of the gridpath visual pathfinder.
//!
//! This crate provides the types the search engine and the front-end share:
//! grid coordinates, cell lifecycle states, and a rectangular grid that
//! computes 4-directional adjacency and enforces the single-start /
//! single-end editing rules.

pub mod cell;
pub mod geom;
pub mod grid;

pub use cell::{Cell, CellState};
pub use geom::Point;
pub use grid::{Grid, GridError};
