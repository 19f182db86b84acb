//! Grid positions, bounds and movement directions.

use serde::{Deserialize, Serialize};

/// A cell on the grid, addressed as `(row, col)`.
///
/// On the wire a position is a two-element array `[row, col]`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(from = "[u16; 2]", into = "[u16; 2]")]
pub struct Position {
    /// Row index (0 at the top).
    pub row: u16,
    /// Column index (0 at the left).
    pub col: u16,
}

impl Position {
    /// The ship's starting cell.
    pub const ORIGIN: Position = Position::new(0, 0);

    /// Create a new position.
    #[must_use]
    pub const fn new(row: u16, col: u16) -> Self {
        Self { row, col }
    }
}

impl From<[u16; 2]> for Position {
    fn from([row, col]: [u16; 2]) -> Self {
        Self::new(row, col)
    }
}

impl From<Position> for [u16; 2] {
    fn from(pos: Position) -> Self {
        [pos.row, pos.col]
    }
}

/// Side length of the square game grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridSize(u16);

impl GridSize {
    /// Grid side used by the current server.
    pub const DEFAULT_SIDE: u16 = 20;

    /// Create a grid size, or `None` if `side` is zero.
    #[must_use]
    pub const fn new(side: u16) -> Option<Self> {
        if side == 0 { None } else { Some(Self(side)) }
    }

    /// Number of rows (and columns).
    #[must_use]
    pub const fn side(self) -> u16 {
        self.0
    }

    /// Check if a position is within the grid bounds.
    #[must_use]
    pub const fn contains(self, pos: Position) -> bool {
        pos.row < self.0 && pos.col < self.0
    }

    /// The bottom-right cell, where the treasure sits unless told otherwise.
    #[must_use]
    pub const fn far_corner(self) -> Position {
        Position::new(self.0 - 1, self.0 - 1)
    }

    /// Iterate over every cell in row-major order.
    pub fn cells(self) -> impl Iterator<Item = Position> {
        let side = self.0;
        (0..side).flat_map(move |row| (0..side).map(move |col| Position::new(row, col)))
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self(Self::DEFAULT_SIDE)
    }
}

/// A directional move intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards row 0.
    Up,
    /// Towards the last row.
    Down,
    /// Towards column 0.
    Left,
    /// Towards the last column.
    Right,
}

impl Direction {
    /// All four directions.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Value of the `direction` request parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}
