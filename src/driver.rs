//! Runs a [`Session`] against a [`GameServer`].
//!
//! The driver is the only place where effects turn into network calls and
//! timers. Everything happens on one logical thread of control:
//! [`Driver::dispatch`] applies an event, performs the resulting effects in
//! order (awaiting each call before the next), and feeds any follow-up
//! event back into the session before returning. Background work (polling,
//! notice expiry) reports through an internal channel that the caller
//! drains with [`Driver::next_event`].
//!
//! Transport failures never escape: they are logged and treated as "no
//! state change".

mod tasks;

use std::collections::VecDeque;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::config::ClientConfig;
use crate::error::TransportResult;
use crate::session::{Effect, Generation, Session, SessionEvent};
use crate::transport::GameServer;

/// Drives one client session.
#[derive(Debug)]
pub struct Driver<S: GameServer> {
    server: S,
    config: ClientConfig,
    session: Session,
    events_tx: UnboundedSender<SessionEvent>,
    events_rx: UnboundedReceiver<SessionEvent>,
    poller: Option<JoinHandle<()>>,
    notice_timer: Option<JoinHandle<()>>,
}

impl<S: GameServer> Driver<S> {
    /// Create a driver with an idle session.
    #[must_use]
    pub fn new(server: S, config: ClientConfig) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            server,
            session: Session::new(config.notice_duration),
            config,
            events_tx,
            events_rx,
            poller: None,
            notice_timer: None,
        }
    }

    /// The session being driven.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Whether the polling task is currently running.
    #[must_use]
    pub fn is_polling(&self) -> bool {
        self.poller.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Wait for the next event produced by a background task.
    ///
    /// Never resolves to `None` while the driver is alive, since it keeps a
    /// sender of its own.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        self.events_rx.recv().await
    }

    /// Wait for one background event and dispatch it.
    pub async fn pump(&mut self) {
        if let Some(event) = self.next_event().await {
            self.dispatch(event).await;
        }
    }

    /// Apply an event and perform every effect it causes.
    pub async fn dispatch(&mut self, event: SessionEvent) {
        let mut pending = VecDeque::from([event]);

        while let Some(event) = pending.pop_front() {
            for effect in self.session.apply(event) {
                if let Some(follow_up) = self.perform(effect).await {
                    pending.push_back(follow_up);
                }
            }
        }
    }

    async fn perform(&mut self, effect: Effect) -> Option<SessionEvent> {
        match effect {
            Effect::StartGame { generation } => {
                logged("start", self.server.start().await);
                logged("currentStrategy", self.server.current_strategy().await)
                    .map(|label| SessionEvent::StrategyLoaded { generation, label })
            }
            Effect::SendMove {
                generation,
                direction,
            } => logged("move", self.server.move_ship(direction).await)
                .map(|state| SessionEvent::MoveResolved { generation, state }),
            Effect::Pause => {
                logged("pause", self.server.pause().await);
                None
            }
            Effect::Resume => {
                logged("resume", self.server.resume().await);
                None
            }
            Effect::ClearCollision => {
                logged("clear-collision", self.server.clear_collision().await);
                None
            }
            Effect::StartPolling { generation } => {
                self.stop_polling();
                self.poller = Some(tasks::spawn_poller(
                    self.server.clone(),
                    generation,
                    self.config.poll_interval,
                    self.events_tx.clone(),
                ));
                None
            }
            Effect::StopPolling => {
                self.stop_polling();
                None
            }
            Effect::ScheduleNoticeExpiry { id, after } => {
                self.cancel_notice_timer();
                self.notice_timer = Some(tasks::spawn_notice_timer(
                    id,
                    after,
                    self.events_tx.clone(),
                ));
                None
            }
            Effect::CancelNoticeExpiry => {
                self.cancel_notice_timer();
                None
            }
            Effect::ResetGame { generation } => self.reset(generation).await,
            Effect::ToggleStrategy { generation } => {
                logged("toggleStrategy", self.server.toggle_strategy().await)?;
                logged("currentStrategy", self.server.current_strategy().await)
                    .map(|label| SessionEvent::StrategyLoaded { generation, label })
            }
            Effect::ActivateCloak => {
                logged("activateInvisibility", self.server.activate_invisibility().await);
                None
            }
        }
    }

    /// `reset` must succeed before the two fetches are issued, and the
    /// fetches are applied together or not at all.
    async fn reset(&self, generation: Generation) -> Option<SessionEvent> {
        logged("reset", self.server.reset().await)?;

        let fetched = tokio::try_join!(self.server.state(), self.server.current_strategy());
        let (state, strategy) = logged("reset-fetch", fetched)?;

        Some(SessionEvent::ResetCompleted {
            generation,
            state,
            strategy,
        })
    }

    fn stop_polling(&mut self) {
        if let Some(handle) = self.poller.take() {
            handle.abort();
        }
    }

    fn cancel_notice_timer(&mut self) {
        if let Some(handle) = self.notice_timer.take() {
            handle.abort();
        }
    }
}

impl<S: GameServer> Drop for Driver<S> {
    fn drop(&mut self) {
        self.stop_polling();
        self.cancel_notice_timer();
    }
}

/// Log a failed call and turn it into "nothing happened".
fn logged<T>(op: &'static str, result: TransportResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(operation = op, "server call failed: {err}");
            None
        }
    }
}
