use std::collections::VecDeque;

use gridpath_core::{Grid, Point};

use crate::state::UNREACHABLE;

/// Breadth-first step distances from `source` to every cell, indexed
/// row-major like [`Grid::idx`]. Unreached cells hold [`UNREACHABLE`].
///
/// Uses the same adjacency as the A* engine, so it is the reference for
/// shortest step counts on the free-cell graph.
pub fn bfs_map(grid: &Grid, source: Point) -> Vec<i32> {
    let mut dist = vec![UNREACHABLE; grid.len()];
    let Some(si) = grid.idx(source) else {
        return dist;
    };
    dist[si] = 0;

    let mut queue = VecDeque::from([source]);
    let mut nbuf = Vec::with_capacity(4);
    while let Some(cp) = queue.pop_front() {
        let Some(ci) = grid.idx(cp) else {
            continue;
        };
        let current = dist[ci];
        nbuf.clear();
        grid.neighbors_into(cp, &mut nbuf);
        for &np in nbuf.iter() {
            let Some(ni) = grid.idx(np) else {
                continue;
            };
            if dist[ni] != UNREACHABLE {
                continue;
            }
            dist[ni] = current + 1;
            queue.push_back(np);
        }
    }
    dist
}

/// Shortest step count from `from` to `to`, or `None` if unreachable.
pub fn bfs_distance(grid: &Grid, from: Point, to: Point) -> Option<i32> {
    let ti = grid.idx(to)?;
    let d = bfs_map(grid, from)[ti];
    (d != UNREACHABLE).then_some(d)
}
