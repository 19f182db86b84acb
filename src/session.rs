//! Client-side game session.
//!
//! Owns the session phase and the notification on screen, decides which
//! snapshots block the player and which only deserve a toast, and gates
//! move input. Pure state: the [`crate::driver`] performs the effects.

mod machine;
mod notification;

pub use machine::{Effect, Generation, Session, SessionEvent, SessionPhase};
pub use notification::{Notification, NoticeId, MOVE_DENIED_MESSAGE};
