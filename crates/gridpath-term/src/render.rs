//! Cell colours and screen ↔ grid coordinate mapping.

use crossterm::style::Color;
use gridpath_core::{CellState, Grid, Point};

/// Terminal columns per grid cell, so cells look roughly square.
pub const CELL_WIDTH: u16 = 2;

/// Background colour for a cell state.
pub fn cell_color(state: CellState) -> Color {
    match state {
        CellState::Free => Color::Rgb {
            r: 255,
            g: 255,
            b: 255,
        },
        CellState::Barrier => Color::Rgb { r: 0, g: 0, b: 0 },
        CellState::Start => Color::Rgb {
            r: 255,
            g: 165,
            b: 0,
        },
        CellState::End => Color::Rgb {
            r: 64,
            g: 224,
            b: 208,
        },
        CellState::Open => Color::Rgb { r: 0, g: 255, b: 0 },
        CellState::Closed => Color::Rgb { r: 255, g: 0, b: 0 },
        CellState::Path => Color::Rgb {
            r: 128,
            g: 0,
            b: 128,
        },
    }
}

/// The grid cell under terminal position `(column, row)`, if any.
pub fn cell_at(grid: &Grid, column: u16, row: u16) -> Option<Point> {
    let p = Point::new(row as i32, (column / CELL_WIDTH) as i32);
    grid.contains(p).then_some(p)
}

/// Terminal position `(column, row)` of the left half of cell `p`.
pub fn screen_pos(p: Point) -> (u16, u16) {
    ((p.col as u16) * CELL_WIDTH, p.row as u16)
}
