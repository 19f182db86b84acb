//! Collision classification.
//!
//! The server computes collisions, but pirates move between polls and the
//! server may not have flagged an overlap yet. The client therefore checks
//! ship/pirate overlap itself first, against the pirates of the same
//! snapshot, and only then falls back to the server's `collision` field.

use crate::game::{CollisionKind, GameState};

/// How a snapshot should be surfaced to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Nothing happened.
    Clear,
    /// Show a short-lived notice; the session carries on.
    Transient(CollisionKind),
    /// Open a notification that must be acknowledged.
    Blocking(CollisionKind),
}

impl Verdict {
    /// The collision behind this verdict, if any.
    #[must_use]
    pub const fn kind(self) -> Option<CollisionKind> {
        match self {
            Verdict::Clear => None,
            Verdict::Transient(kind) | Verdict::Blocking(kind) => Some(kind),
        }
    }
}

/// Classify a snapshot. First match wins:
///
/// 1. ship shares a cell with any pirate: blocking `pirate`, whatever the
///    server reported;
/// 2. otherwise the server's `collision` field, with `island` transient and
///    everything else blocking.
#[must_use]
pub fn classify(state: &GameState) -> Verdict {
    if state.pirate_at(state.ship).is_some() {
        return Verdict::Blocking(CollisionKind::Pirate);
    }

    match state.collision {
        None => Verdict::Clear,
        Some(kind) if kind.is_blocking() => Verdict::Blocking(kind),
        Some(kind) => Verdict::Transient(kind),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GridSize, Pirate, PirateKind, Position};

    fn state_with_ship(row: u16, col: u16) -> GameState {
        let mut state = GameState::empty(GridSize::default());
        state.ship = Position::new(row, col);
        state
    }

    #[test]
    fn test_pirate_overlap_wins_over_server_field() {
        let mut state = state_with_ship(2, 2);
        state.pirates.push(Pirate {
            position: Position::new(2, 2),
            kind: PirateKind::Slow,
        });

        assert_eq!(classify(&state), Verdict::Blocking(CollisionKind::Pirate));

        state.collision = Some(CollisionKind::Island);
        assert_eq!(classify(&state), Verdict::Blocking(CollisionKind::Pirate));

        state.collision = Some(CollisionKind::Treasure);
        assert_eq!(classify(&state), Verdict::Blocking(CollisionKind::Pirate));
    }

    #[test]
    fn test_adjacent_pirate_is_not_a_collision() {
        let mut state = state_with_ship(2, 2);
        state.pirates.push(Pirate {
            position: Position::new(2, 3),
            kind: PirateKind::Fast,
        });
        assert_eq!(classify(&state), Verdict::Clear);
    }

    #[test]
    fn test_island_is_transient() {
        let mut state = state_with_ship(1, 1);
        state.collision = Some(CollisionKind::Island);
        assert_eq!(classify(&state), Verdict::Transient(CollisionKind::Island));
    }

    #[test]
    fn test_server_collisions_are_blocking() {
        for kind in [CollisionKind::Treasure, CollisionKind::Monster, CollisionKind::Pirate] {
            let mut state = state_with_ship(4, 4);
            state.collision = Some(kind);
            assert_eq!(classify(&state), Verdict::Blocking(kind));
            assert_eq!(classify(&state).kind(), Some(kind));
        }
    }
}
