//! Game layer for the Columbus client.
//!
//! Everything the client knows about a game:
//! - Grid positions and move directions
//! - Server snapshots and their lenient decoding
//! - Collision classification
//! - Plain-text rendering

mod collision;
mod position;
mod render;
mod state;

pub use collision::{classify, Verdict};
pub use position::{Direction, GridSize, Position};
pub use render::{render_ascii, Cell};
pub use state::{
    is_falsy, CollisionKind, GameState, MalformedField, Pirate, PirateKind, SeaMonster,
};
