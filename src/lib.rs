// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Columbus: terminal client for a server-run treasure-hunt grid game.
//!
//! The player steers Columbus's ship towards the treasure while pirates,
//! sea monsters and islands get in the way. The server owns the game; this
//! crate keeps a client session in sync with it:
//! - Periodic polling of the authoritative state
//! - A local pirate-overlap check between polls
//! - Blocking notifications vs. transient notices
//! - Input gating while a notification is open
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   Terminal UI (ratatui/crossterm)   │
//! ├─────────────────────────────────────┤
//! │   Driver (tokio: polling, timers)   │
//! ├──────────────────┬──────────────────┤
//! │  Session (pure)  │ Transport (HTTP) │
//! ├──────────────────┴──────────────────┤
//! │   Game (snapshots, collisions)      │
//! └─────────────────────────────────────┘
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod game;
pub mod session;
pub mod transport;

pub use config::ClientConfig;
pub use driver::Driver;
pub use error::{TransportError, TransportResult};

// Re-export key types at crate root for convenience
pub use game::{CollisionKind, Direction, GameState, GridSize, Position, Verdict};
pub use session::{Effect, Notification, Session, SessionEvent, SessionPhase};
pub use transport::{GameServer, HttpServer};
