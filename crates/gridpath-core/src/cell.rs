//! The [`Cell`] type and its lifecycle [`CellState`].

use crate::geom::Point;

/// Lifecycle state of a grid cell.
///
/// Start, End and Barrier are set by the editor before a run; Open and
/// Closed by the search engine during a run; Path by path reconstruction
/// afterwards.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellState {
    #[default]
    Free,
    Barrier,
    Start,
    End,
    /// Discovered, waiting in the frontier.
    Open,
    /// Expanded.
    Closed,
    Path,
}

impl CellState {
    /// All states, in declaration order.
    pub const ALL: [CellState; 7] = [
        Self::Free,
        Self::Barrier,
        Self::Start,
        Self::End,
        Self::Open,
        Self::Closed,
        Self::Path,
    ];

    /// Single-character form used by the text grid layout.
    pub const fn glyph(self) -> char {
        match self {
            Self::Free => '.',
            Self::Barrier => '#',
            Self::Start => 'S',
            Self::End => 'E',
            Self::Open => 'o',
            Self::Closed => 'x',
            Self::Path => '*',
        }
    }

    /// Inverse of [`glyph`](CellState::glyph).
    pub const fn from_glyph(ch: char) -> Option<Self> {
        match ch {
            '.' => Some(Self::Free),
            '#' => Some(Self::Barrier),
            'S' => Some(Self::Start),
            'E' => Some(Self::End),
            'o' => Some(Self::Open),
            'x' => Some(Self::Closed),
            '*' => Some(Self::Path),
            _ => None,
        }
    }

    /// Whether the cell blocks movement.
    #[inline]
    pub const fn is_barrier(self) -> bool {
        matches!(self, Self::Barrier)
    }

    /// Whether the state was written by a search run (Open, Closed, Path)
    /// rather than by the editor.
    #[inline]
    pub const fn is_search_mark(self) -> bool {
        matches!(self, Self::Open | Self::Closed | Self::Path)
    }
}

/// A single addressable grid position.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub pos: Point,
    pub state: CellState,
}

impl Cell {
    /// A free cell at `pos`.
    #[inline]
    pub const fn new(pos: Point) -> Self {
        Self {
            pos,
            state: CellState::Free,
        }
    }

    /// Set the state (builder).
    #[inline]
    pub const fn with_state(mut self, state: CellState) -> Self {
        self.state = state;
        self
    }

    #[inline]
    pub const fn row(&self) -> i32 {
        self.pos.row
    }

    #[inline]
    pub const fn col(&self) -> i32 {
        self.pos.col
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyphs_round_trip_for_every_state() {
        for s in CellState::ALL {
            assert_eq!(CellState::from_glyph(s.glyph()), Some(s));
        }
        assert_eq!(CellState::from_glyph('?'), None);
    }

    #[test]
    fn new_cell_is_free() {
        let c = Cell::new(Point::new(3, 1));
        assert_eq!(c.state, CellState::Free);
        assert_eq!((c.row(), c.col()), (3, 1));
        assert_eq!(c.with_state(CellState::Path).state, CellState::Path);
    }

    #[test]
    fn search_marks() {
        assert!(CellState::Open.is_search_mark());
        assert!(CellState::Path.is_search_mark());
        assert!(!CellState::Start.is_search_mark());
        assert!(!CellState::Barrier.is_search_mark());
        assert!(CellState::Barrier.is_barrier());
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn cell_serializes_with_state_name() {
        let c = Cell::new(Point::new(1, 2)).with_state(CellState::Barrier);
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, r#"{"pos":{"row":1,"col":2},"state":"Barrier"}"#);
        let back: Cell = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }
}
