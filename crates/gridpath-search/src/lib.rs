//! Step-driven A* search for the gridpath visual pathfinder.
//!
//! - [`Engine`] runs A* over a [`gridpath_core::Grid`] with unit edge costs
//!   and the [`manhattan`] heuristic, painting Open/Closed cells and handing
//!   control to a step callback after every expansion.
//! - [`SearchState`] holds one run's g/f-scores, predecessor links and
//!   frontier. Frontier entries are ordered by `(f, insertion order)`, so
//!   ties always go to the earlier push.
//! - [`PathReconstructor`] walks the predecessor links of a successful run
//!   and marks the path.
//! - [`bfs_map`] / [`bfs_distance`] give reference step distances on the same
//!   adjacency.
//!
//! A run ends in one of three [`Outcome`]s. Finding no path and being
//! cancelled are outcomes, not errors; [`SearchError`] is reserved for
//! precondition violations such as a missing start or a barrier endpoint.

mod astar;
mod bfs;
mod distance;
mod reconstruct;
mod state;

pub use astar::{Engine, Outcome, SearchError, SearchReport, Step};
pub use bfs::{bfs_distance, bfs_map};
pub use distance::manhattan;
pub use reconstruct::{PathIter, PathReconstructor, reconstruct};
pub use state::{CameFrom, Relaxed, SearchState, UNREACHABLE};
