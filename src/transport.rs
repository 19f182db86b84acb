//! Transport to the game server.
//!
//! One method per server capability. Implementations return errors rather
//! than swallowing them; deciding that a failure means "no state change" is
//! the [`crate::driver`]'s job.

mod http;

pub use http::HttpServer;

use std::future::Future;

use crate::error::TransportResult;
use crate::game::{Direction, GameState};

/// The remote game server.
///
/// Cloned into the polling task, so implementations should be cheap to clone
/// and share their connection pool.
pub trait GameServer: Clone + Send + Sync + 'static {
    /// `POST start`: begin a new game.
    fn start(&self) -> impl Future<Output = TransportResult<()>> + Send;

    /// `GET state`: fetch the current snapshot.
    fn state(&self) -> impl Future<Output = TransportResult<GameState>> + Send;

    /// `POST move`: move the ship.
    ///
    /// `Ok(None)` means the server refused the move (island in the way).
    fn move_ship(
        &self,
        direction: Direction,
    ) -> impl Future<Output = TransportResult<Option<GameState>>> + Send;

    /// `POST pause`: stop pirates and monsters from advancing.
    fn pause(&self) -> impl Future<Output = TransportResult<()>> + Send;

    /// `POST resume`: let pirates and monsters advance again.
    fn resume(&self) -> impl Future<Output = TransportResult<()>> + Send;

    /// `POST reset`: restart the game from scratch.
    fn reset(&self) -> impl Future<Output = TransportResult<()>> + Send;

    /// `POST clear-collision`: acknowledge the pending collision.
    fn clear_collision(&self) -> impl Future<Output = TransportResult<()>> + Send;

    /// `GET currentStrategy`: label of the pirates' chase strategy.
    fn current_strategy(&self) -> impl Future<Output = TransportResult<String>> + Send;

    /// `POST toggleStrategy`: switch the pirates' chase strategy.
    fn toggle_strategy(&self) -> impl Future<Output = TransportResult<()>> + Send;

    /// `POST activateInvisibility`: cloak the ship from pirates for a while.
    fn activate_invisibility(&self) -> impl Future<Output = TransportResult<()>> + Send;
}
