//! Notifications shown to the player.

use crate::game::CollisionKind;

/// Shown when the server refuses a move because an island is in the way.
pub const MOVE_DENIED_MESSAGE: &str = "Oops! Island! Change your way.";

/// Identifies one transient notice so a stale expiry cannot clear a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoticeId(pub u64);

/// A message currently on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    /// Modal message that blocks input until acknowledged.
    Blocking {
        /// Collision that raised it; decides what acknowledgement does.
        kind: CollisionKind,
        /// Text to display.
        message: &'static str,
    },
    /// Toast that expires on its own.
    Transient {
        /// Identity of this notice, matched against its expiry timer.
        id: NoticeId,
        /// Text to display.
        message: &'static str,
    },
}

impl Notification {
    /// Create the blocking notification for a collision.
    #[must_use]
    pub const fn blocking(kind: CollisionKind) -> Self {
        Notification::Blocking {
            kind,
            message: kind.message(),
        }
    }

    /// Text to display.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Notification::Blocking { message, .. } | Notification::Transient { message, .. } => {
                message
            }
        }
    }

    /// Whether this notification needs acknowledgement.
    #[must_use]
    pub const fn is_blocking(&self) -> bool {
        matches!(self, Notification::Blocking { .. })
    }
}
