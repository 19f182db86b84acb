//! Background tasks: the polling loop and the notice expiry timer.
//!
//! Both are plain tokio tasks that report back through the driver's event
//! channel. Aborting the returned handle cancels them; anything they already
//! queued carries a generation or notice id the session checks on arrival.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use crate::session::{Generation, NoticeId, SessionEvent};
use crate::transport::GameServer;

/// Poll `state` every `period`, starting immediately.
///
/// A failed poll is logged and skipped. The task ends on its own once the
/// event channel closes.
pub(crate) fn spawn_poller<S: GameServer>(
    server: S,
    generation: Generation,
    period: Duration,
    events: UnboundedSender<SessionEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match server.state().await {
                Ok(state) => {
                    if events.send(SessionEvent::Polled { generation, state }).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    tracing::warn!(
                        operation = "state",
                        generation = generation.0,
                        "poll failed: {err}"
                    );
                }
            }
        }
    })
}

/// Report `NoticeExpired(id)` after `after` has elapsed.
pub(crate) fn spawn_notice_timer(
    id: NoticeId,
    after: Duration,
    events: UnboundedSender<SessionEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        time::sleep(after).await;
        let _ = events.send(SessionEvent::NoticeExpired(id));
    })
}
