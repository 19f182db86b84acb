//! Plain-text rendering of a snapshot.

use std::fmt::Write as _;

use crate::game::{GameState, GridSize, PirateKind, Position};

/// What occupies a cell, in drawing priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// The player's ship.
    Ship,
    /// The treasure.
    Treasure,
    /// A pirate ship.
    Pirate(PirateKind),
    /// A sea monster.
    Monster,
    /// An island.
    Island,
    /// Open water.
    Water,
}

impl Cell {
    /// Classify a cell. The ship hides anything under it, then treasure,
    /// pirates, monsters and islands in that order.
    #[must_use]
    pub fn at(state: &GameState, pos: Position) -> Self {
        if state.ship == pos {
            Cell::Ship
        } else if state.treasure == pos {
            Cell::Treasure
        } else if let Some(pirate) = state.pirate_at(pos) {
            Cell::Pirate(pirate.kind)
        } else if state.has_monster_at(pos) {
            Cell::Monster
        } else if state.is_island(pos) {
            Cell::Island
        } else {
            Cell::Water
        }
    }

    /// Single-character glyph for this cell.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Cell::Ship => 'C',
            Cell::Treasure => '$',
            Cell::Pirate(PirateKind::Slow) => 'p',
            Cell::Pirate(PirateKind::Fast) => 'P',
            Cell::Pirate(PirateKind::Patrol) => 'R',
            Cell::Monster => 'M',
            Cell::Island => '#',
            Cell::Water => '.',
        }
    }
}

/// Render a snapshot as a bordered ASCII grid with a legend.
///
/// ```text
/// ┌─────────────────────┐
/// │ C . . . . . . . . . │
/// │ . # # . . p . . . . │
/// ...
/// │ . . . . . . . . . $ │
/// └─────────────────────┘
/// ```
#[must_use]
pub fn render_ascii(state: &GameState, grid: GridSize) -> String {
    let side = usize::from(grid.side());
    let border = "─".repeat(side * 2 + 1);
    let mut output = String::new();

    let _ = writeln!(output, "┌{border}┐");
    for row in 0..grid.side() {
        output.push_str("│ ");
        for col in 0..grid.side() {
            output.push(Cell::at(state, Position::new(row, col)).glyph());
            output.push(' ');
        }
        output.push_str("│\n");
    }
    let _ = writeln!(output, "└{border}┘");

    output.push_str("\nLegend: C=Columbus  $=Treasure  p/P/R=Pirate (slow/fast/patrol)  M=Monster  #=Island\n");
    if state.invisible {
        output.push_str("Columbus is cloaked.\n");
    }
    if let Some(kind) = state.collision {
        let _ = writeln!(output, "Pending collision: {kind:?}");
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Pirate, SeaMonster};

    #[test]
    fn test_ship_hides_pirate_underneath() {
        let mut state = GameState::empty(GridSize::default());
        state.pirates.push(Pirate {
            position: Position::ORIGIN,
            kind: PirateKind::Fast,
        });
        assert_eq!(Cell::at(&state, Position::ORIGIN), Cell::Ship);
    }

    #[test]
    fn test_render_small_grid() {
        let grid = GridSize::new(3).unwrap();
        let mut state = GameState::empty(grid);
        state.islands.insert(Position::new(0, 2));
        state.sea_monsters.push(SeaMonster {
            position: Position::new(1, 1),
        });

        let text = render_ascii(&state, grid);
        let rows: Vec<&str> = text.lines().collect();

        assert_eq!(rows[0], "┌───────┐");
        assert_eq!(rows[1], "│ C . # │");
        assert_eq!(rows[2], "│ . M . │");
        assert_eq!(rows[3], "│ . . $ │");
        assert_eq!(rows[4], "└───────┘");
    }
}
