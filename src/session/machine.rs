//! The session state machine.
//!
//! [`Session::apply`] takes one event and returns the side effects the
//! caller must perform, in order. It never does I/O itself, so every
//! transition can be exercised without a server or a terminal.

use std::time::Duration;

use tracing::{debug, trace};

use crate::config::DEFAULT_NOTICE_DURATION;
use crate::game::{classify, CollisionKind, Direction, GameState, Position, Verdict};
use crate::session::{Notification, NoticeId, MOVE_DENIED_MESSAGE};

/// Sync epoch of a session.
///
/// Bumped whenever the session starts, blocks, resumes, resets or ends.
/// Asynchronous results carry the generation they were requested under and
/// are dropped if it is no longer current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Generation(pub u64);

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    /// No session running.
    Idle,
    /// Polling, input enabled.
    Active,
    /// A blocking notification is open; polling is paused and input dropped.
    Blocked,
    /// The client shut down. Terminal: every further event is ignored.
    Ended,
}

/// Something that happened to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Player asked to start a session.
    Start,
    /// Player asked to move the ship.
    Move(Direction),
    /// A move request came back. `None` means the server refused the move.
    MoveResolved {
        /// Generation the move was sent under.
        generation: Generation,
        /// New snapshot, or `None` if the move was denied.
        state: Option<GameState>,
    },
    /// A background poll came back.
    Polled {
        /// Generation of the polling task that fetched it.
        generation: Generation,
        /// Fetched snapshot.
        state: GameState,
    },
    /// Player dismissed the blocking notification.
    Acknowledge,
    /// A transient notice's timer fired.
    NoticeExpired(NoticeId),
    /// Player asked for a full reset.
    Reset,
    /// The server reset and both follow-up fetches succeeded.
    ResetCompleted {
        /// Generation the reset was requested under.
        generation: Generation,
        /// Fresh snapshot.
        state: GameState,
        /// Fresh strategy label.
        strategy: String,
    },
    /// A strategy label was fetched.
    StrategyLoaded {
        /// Generation the fetch was issued under.
        generation: Generation,
        /// Fetched label.
        label: String,
    },
    /// Player asked to switch the pirates' strategy.
    ToggleStrategy,
    /// Player asked to cloak the ship.
    ActivateCloak,
    /// Player left the game screen.
    GoBack,
    /// The client is exiting.
    Shutdown,
}

impl SessionEvent {
    /// Short name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            SessionEvent::Start => "start",
            SessionEvent::Move(_) => "move",
            SessionEvent::MoveResolved { .. } => "move-resolved",
            SessionEvent::Polled { .. } => "polled",
            SessionEvent::Acknowledge => "acknowledge",
            SessionEvent::NoticeExpired(_) => "notice-expired",
            SessionEvent::Reset => "reset",
            SessionEvent::ResetCompleted { .. } => "reset-completed",
            SessionEvent::StrategyLoaded { .. } => "strategy-loaded",
            SessionEvent::ToggleStrategy => "toggle-strategy",
            SessionEvent::ActivateCloak => "activate-cloak",
            SessionEvent::GoBack => "go-back",
            SessionEvent::Shutdown => "shutdown",
        }
    }
}

/// A side effect requested by the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// `POST start`, then fetch the strategy label.
    StartGame {
        /// Generation to stamp on the label.
        generation: Generation,
    },
    /// `POST move` and feed the answer back as [`SessionEvent::MoveResolved`].
    SendMove {
        /// Generation to stamp on the answer.
        generation: Generation,
        /// Requested direction.
        direction: Direction,
    },
    /// `POST pause`.
    Pause,
    /// `POST resume`.
    Resume,
    /// `POST clear-collision`.
    ClearCollision,
    /// (Re)start the polling task for this generation.
    StartPolling {
        /// Generation to stamp on every snapshot.
        generation: Generation,
    },
    /// Cancel the polling task.
    StopPolling,
    /// Arm the expiry timer of a transient notice, replacing any armed one.
    ScheduleNoticeExpiry {
        /// Notice to expire.
        id: NoticeId,
        /// Time until expiry.
        after: Duration,
    },
    /// Disarm the notice expiry timer.
    CancelNoticeExpiry,
    /// `POST reset`, then fetch state and strategy together.
    ResetGame {
        /// Generation to stamp on the result.
        generation: Generation,
    },
    /// `POST toggleStrategy`, then fetch the strategy label.
    ToggleStrategy {
        /// Generation to stamp on the label.
        generation: Generation,
    },
    /// `POST activateInvisibility`.
    ActivateCloak,
}

/// Client-side view of one play-through.
#[derive(Debug, Clone)]
pub struct Session {
    phase: SessionPhase,
    generation: Generation,
    next_notice: u64,
    state: Option<GameState>,
    strategy: Option<String>,
    notification: Option<Notification>,
    celebrating: bool,
    notice_duration: Duration,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_NOTICE_DURATION)
    }
}

impl Session {
    /// Create an idle session whose transient notices last `notice_duration`.
    #[must_use]
    pub fn new(notice_duration: Duration) -> Self {
        Self {
            phase: SessionPhase::Idle,
            generation: Generation::default(),
            next_notice: 0,
            state: None,
            strategy: None,
            notification: None,
            celebrating: false,
            notice_duration,
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Current generation.
    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.generation
    }

    /// Latest snapshot, if one has arrived this session.
    #[must_use]
    pub const fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    /// Latest pirate strategy label.
    #[must_use]
    pub fn strategy(&self) -> Option<&str> {
        self.strategy.as_deref()
    }

    /// Notification currently on screen.
    #[must_use]
    pub const fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    /// Whether the win animation should be playing.
    #[must_use]
    pub const fn is_celebrating(&self) -> bool {
        self.celebrating
    }

    /// Apply one event and return the effects to perform, in order.
    pub fn apply(&mut self, event: SessionEvent) -> Vec<Effect> {
        if self.phase == SessionPhase::Ended {
            trace!(event = event.name(), "session ended, dropping event");
            return Vec::new();
        }

        let before = self.phase;
        let name = event.name();

        let effects = match event {
            SessionEvent::Start => self.start(),
            SessionEvent::Move(direction) => self.request_move(direction),
            SessionEvent::MoveResolved { generation, state } => {
                if !self.is_current(generation, name) {
                    return Vec::new();
                }
                match state {
                    Some(state) => self.absorb(state),
                    None => self.show_notice(MOVE_DENIED_MESSAGE),
                }
            }
            SessionEvent::Polled { generation, state } => {
                if !self.is_current(generation, name) {
                    return Vec::new();
                }
                self.absorb(state)
            }
            SessionEvent::Acknowledge => self.acknowledge(),
            SessionEvent::NoticeExpired(id) => {
                self.expire_notice(id);
                Vec::new()
            }
            SessionEvent::Reset => vec![Effect::ResetGame {
                generation: self.generation,
            }],
            SessionEvent::ResetCompleted {
                generation,
                state,
                strategy,
            } => self.complete_reset(generation, state, strategy),
            SessionEvent::StrategyLoaded { generation, label } => {
                if self.is_current(generation, name) {
                    self.strategy = Some(label);
                }
                Vec::new()
            }
            SessionEvent::ToggleStrategy => self.when_active(Effect::ToggleStrategy {
                generation: self.generation,
            }),
            SessionEvent::ActivateCloak => self.when_active(Effect::ActivateCloak),
            SessionEvent::GoBack => self.go_back(),
            SessionEvent::Shutdown => self.shutdown(),
        };

        if self.phase != before {
            debug!(from = ?before, to = ?self.phase, event = name, "session phase changed");
        }

        effects
    }

    fn advance(&mut self) -> Generation {
        self.generation = Generation(self.generation.0 + 1);
        self.generation
    }

    /// Snapshots only count while active and only from the current generation.
    fn is_current(&self, generation: Generation, what: &'static str) -> bool {
        let current = self.phase == SessionPhase::Active && generation == self.generation;
        if !current {
            trace!(
                event = what,
                stale = generation.0,
                current = self.generation.0,
                phase = ?self.phase,
                "dropping stale result"
            );
        }
        current
    }

    fn when_active(&self, effect: Effect) -> Vec<Effect> {
        if self.phase == SessionPhase::Active {
            vec![effect]
        } else {
            Vec::new()
        }
    }

    fn start(&mut self) -> Vec<Effect> {
        if self.phase != SessionPhase::Idle {
            return Vec::new();
        }

        self.clear();
        let generation = self.advance();
        self.phase = SessionPhase::Active;

        vec![
            Effect::CancelNoticeExpiry,
            Effect::StartGame { generation },
            Effect::StartPolling { generation },
        ]
    }

    fn request_move(&self, direction: Direction) -> Vec<Effect> {
        if self.phase != SessionPhase::Active {
            trace!(?direction, phase = ?self.phase, "move intent dropped");
            return Vec::new();
        }

        vec![Effect::SendMove {
            generation: self.generation,
            direction,
        }]
    }

    /// Replace the snapshot wholesale and react to whatever it contains.
    fn absorb(&mut self, state: GameState) -> Vec<Effect> {
        let verdict = classify(&state);
        self.state = Some(state);

        match verdict {
            Verdict::Clear => Vec::new(),
            Verdict::Transient(kind) => {
                let mut effects = self.show_notice(kind.message());
                effects.push(Effect::ClearCollision);
                effects
            }
            Verdict::Blocking(kind) => self.block(kind),
        }
    }

    fn show_notice(&mut self, message: &'static str) -> Vec<Effect> {
        let id = NoticeId(self.next_notice);
        self.next_notice += 1;
        self.notification = Some(Notification::Transient { id, message });

        vec![Effect::ScheduleNoticeExpiry {
            id,
            after: self.notice_duration,
        }]
    }

    fn expire_notice(&mut self, id: NoticeId) {
        if let Some(Notification::Transient { id: shown, .. }) = self.notification
            && shown == id
        {
            self.notification = None;
        }
    }

    fn block(&mut self, kind: CollisionKind) -> Vec<Effect> {
        self.advance();
        self.phase = SessionPhase::Blocked;
        self.notification = Some(Notification::blocking(kind));
        self.celebrating = kind == CollisionKind::Treasure;

        vec![Effect::CancelNoticeExpiry, Effect::StopPolling, Effect::Pause]
    }

    fn acknowledge(&mut self) -> Vec<Effect> {
        if self.phase != SessionPhase::Blocked {
            return Vec::new();
        }
        let Some(Notification::Blocking { kind, .. }) = self.notification else {
            return Vec::new();
        };

        self.notification = None;

        match kind {
            CollisionKind::Pirate | CollisionKind::Treasure => {
                self.end_session();
                vec![Effect::StopPolling]
            }
            CollisionKind::Monster => {
                if let Some(state) = self.state.as_mut() {
                    state.ship = Position::ORIGIN;
                    state.collision = None;
                }
                let generation = self.advance();
                self.phase = SessionPhase::Active;
                vec![
                    Effect::ClearCollision,
                    Effect::Resume,
                    Effect::StartPolling { generation },
                ]
            }
            CollisionKind::Island => {
                let generation = self.advance();
                self.phase = SessionPhase::Active;
                vec![Effect::Resume, Effect::StartPolling { generation }]
            }
        }
    }

    fn complete_reset(
        &mut self,
        generation: Generation,
        state: GameState,
        strategy: String,
    ) -> Vec<Effect> {
        if generation != self.generation {
            trace!(
                stale = generation.0,
                current = self.generation.0,
                "dropping stale reset"
            );
            return Vec::new();
        }

        let previous = self.phase;
        let generation = self.advance();
        self.phase = SessionPhase::Active;
        self.notification = None;
        self.celebrating = false;
        self.strategy = Some(strategy);

        let mut effects = vec![Effect::CancelNoticeExpiry];
        if previous == SessionPhase::Blocked {
            effects.push(Effect::Resume);
        }
        effects.push(Effect::StartPolling { generation });
        effects.extend(self.absorb(state));
        effects
    }

    fn go_back(&mut self) -> Vec<Effect> {
        if !matches!(self.phase, SessionPhase::Active | SessionPhase::Blocked) {
            return Vec::new();
        }

        self.end_session();
        vec![Effect::StopPolling, Effect::CancelNoticeExpiry]
    }

    fn shutdown(&mut self) -> Vec<Effect> {
        self.clear();
        self.advance();
        self.phase = SessionPhase::Ended;
        vec![Effect::StopPolling, Effect::CancelNoticeExpiry]
    }

    fn end_session(&mut self) {
        self.clear();
        self.advance();
        self.phase = SessionPhase::Idle;
    }

    fn clear(&mut self) {
        self.state = None;
        self.strategy = None;
        self.notification = None;
        self.celebrating = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GridSize, Pirate, PirateKind};

    fn snapshot(ship: (u16, u16)) -> GameState {
        let mut state = GameState::empty(GridSize::default());
        state.ship = Position::new(ship.0, ship.1);
        state
    }

    fn active_session() -> Session {
        let mut session = Session::default();
        session.apply(SessionEvent::Start);
        session
    }

    fn poll(session: &mut Session, state: GameState) -> Vec<Effect> {
        let generation = session.generation();
        session.apply(SessionEvent::Polled { generation, state })
    }

    fn blocked_on(kind: CollisionKind) -> Session {
        let mut session = active_session();
        let mut state = snapshot((3, 4));
        state.collision = Some(kind);
        poll(&mut session, state);
        assert_eq!(session.phase(), SessionPhase::Blocked);
        session
    }

    #[test]
    fn test_start_begins_polling() {
        let mut session = Session::default();
        let effects = session.apply(SessionEvent::Start);

        assert_eq!(session.phase(), SessionPhase::Active);
        assert_eq!(
            effects,
            vec![
                Effect::CancelNoticeExpiry,
                Effect::StartGame {
                    generation: session.generation()
                },
                Effect::StartPolling {
                    generation: session.generation()
                },
            ]
        );
    }

    #[test]
    fn test_start_ignored_while_active() {
        let mut session = active_session();
        assert!(session.apply(SessionEvent::Start).is_empty());
    }

    #[test]
    fn test_pirate_overlap_blocks() {
        let mut session = active_session();
        let mut state = snapshot((2, 2));
        state.pirates.push(Pirate {
            position: Position::new(2, 2),
            kind: PirateKind::Slow,
        });

        let effects = poll(&mut session, state);

        assert_eq!(session.phase(), SessionPhase::Blocked);
        assert_eq!(
            session.notification(),
            Some(&Notification::blocking(CollisionKind::Pirate))
        );
        assert_eq!(
            effects,
            vec![Effect::CancelNoticeExpiry, Effect::StopPolling, Effect::Pause]
        );
    }

    #[test]
    fn test_island_collision_is_transient() {
        let mut session = active_session();
        let mut state = snapshot((1, 1));
        state.collision = Some(CollisionKind::Island);

        let effects = poll(&mut session, state);

        assert_eq!(session.phase(), SessionPhase::Active);
        let Some(Notification::Transient { id, message }) = session.notification().copied() else {
            panic!("expected a transient notice");
        };
        assert_eq!(message, "Island ahead! Change your way.");
        assert_eq!(
            effects,
            vec![
                Effect::ScheduleNoticeExpiry {
                    id,
                    after: Duration::from_millis(1500)
                },
                Effect::ClearCollision,
            ]
        );
    }

    #[test]
    fn test_blocked_ignores_repeated_polls() {
        let mut session = blocked_on(CollisionKind::Monster);
        let generation = session.generation();
        let notification = session.notification().copied();

        let mut state = snapshot((3, 4));
        state.collision = Some(CollisionKind::Monster);
        let effects = session.apply(SessionEvent::Polled { generation, state });

        assert!(effects.is_empty());
        assert_eq!(session.notification().copied(), notification);
        assert_eq!(session.phase(), SessionPhase::Blocked);
    }

    #[test]
    fn test_moves_dropped_while_blocked() {
        let mut session = blocked_on(CollisionKind::Treasure);
        assert!(session.apply(SessionEvent::Move(Direction::Up)).is_empty());
    }

    #[test]
    fn test_move_sent_while_active() {
        let mut session = active_session();
        let effects = session.apply(SessionEvent::Move(Direction::Left));
        assert_eq!(
            effects,
            vec![Effect::SendMove {
                generation: session.generation(),
                direction: Direction::Left
            }]
        );
    }

    #[test]
    fn test_denied_move_shows_notice_without_state_change() {
        let mut session = active_session();
        poll(&mut session, snapshot((5, 5)));
        let before = session.state().cloned();

        let generation = session.generation();
        session.apply(SessionEvent::MoveResolved {
            generation,
            state: None,
        });

        assert_eq!(session.state().cloned(), before);
        assert_eq!(
            session.notification().map(Notification::message),
            Some(MOVE_DENIED_MESSAGE)
        );
        assert_eq!(session.phase(), SessionPhase::Active);
    }

    #[test]
    fn test_monster_acknowledge_resets_ship_and_resumes() {
        let mut session = blocked_on(CollisionKind::Monster);
        let effects = session.apply(SessionEvent::Acknowledge);

        assert_eq!(session.phase(), SessionPhase::Active);
        assert_eq!(session.state().unwrap().ship, Position::ORIGIN);
        assert!(session.notification().is_none());
        assert_eq!(
            effects,
            vec![
                Effect::ClearCollision,
                Effect::Resume,
                Effect::StartPolling {
                    generation: session.generation()
                },
            ]
        );
    }

    #[test]
    fn test_pirate_acknowledge_ends_session() {
        let mut session = blocked_on(CollisionKind::Pirate);
        session.apply(SessionEvent::Acknowledge);
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(session.state().is_none());
    }

    #[test]
    fn test_treasure_acknowledge_stops_celebration() {
        let mut session = blocked_on(CollisionKind::Treasure);
        assert!(session.is_celebrating());

        session.apply(SessionEvent::Acknowledge);

        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(!session.is_celebrating());
    }

    #[test]
    fn test_stale_notice_expiry_keeps_newer_notice() {
        let mut session = active_session();
        let generation = session.generation();
        session.apply(SessionEvent::MoveResolved {
            generation,
            state: None,
        });
        let Some(Notification::Transient { id: first, .. }) = session.notification().copied()
        else {
            panic!("expected a transient notice");
        };
        session.apply(SessionEvent::MoveResolved {
            generation,
            state: None,
        });

        session.apply(SessionEvent::NoticeExpired(first));
        assert!(session.notification().is_some());
    }

    #[test]
    fn test_stale_generation_snapshot_dropped() {
        let mut session = blocked_on(CollisionKind::Monster);
        let old = Generation(session.generation().0 - 1);
        session.apply(SessionEvent::Acknowledge);

        let mut state = snapshot((3, 4));
        state.collision = Some(CollisionKind::Monster);
        let effects = session.apply(SessionEvent::Polled {
            generation: old,
            state,
        });

        assert!(effects.is_empty());
        assert_eq!(session.phase(), SessionPhase::Active);
    }

    #[test]
    fn test_strategy_label_needs_current_generation() {
        let mut session = active_session();
        let started = session.generation();
        session.apply(SessionEvent::StrategyLoaded {
            generation: started,
            label: "slow".to_string(),
        });
        assert_eq!(session.strategy(), Some("slow"));

        let effects = session.apply(SessionEvent::ToggleStrategy);
        assert_eq!(
            effects,
            vec![Effect::ToggleStrategy {
                generation: started
            }]
        );

        session.apply(SessionEvent::GoBack);
        session.apply(SessionEvent::Start);
        session.apply(SessionEvent::StrategyLoaded {
            generation: started,
            label: "fast".to_string(),
        });
        assert_eq!(session.strategy(), None);
    }

    #[test]
    fn test_reset_from_blocked_resumes() {
        let mut session = blocked_on(CollisionKind::Monster);
        let generation = session.generation();
        assert_eq!(
            session.apply(SessionEvent::Reset),
            vec![Effect::ResetGame { generation }]
        );

        let effects = session.apply(SessionEvent::ResetCompleted {
            generation,
            state: snapshot((0, 0)),
            strategy: "Chase".to_string(),
        });

        assert_eq!(session.phase(), SessionPhase::Active);
        assert_eq!(session.strategy(), Some("Chase"));
        assert!(session.notification().is_none());
        assert!(effects.contains(&Effect::Resume));
        assert!(effects.contains(&Effect::StartPolling {
            generation: session.generation()
        }));
    }

    #[test]
    fn test_go_back_stops_polling() {
        let mut session = active_session();
        let effects = session.apply(SessionEvent::GoBack);
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert_eq!(effects, vec![Effect::StopPolling, Effect::CancelNoticeExpiry]);
    }

    #[test]
    fn test_ended_ignores_everything() {
        let mut session = active_session();
        session.apply(SessionEvent::Shutdown);
        assert_eq!(session.phase(), SessionPhase::Ended);
        assert!(session.apply(SessionEvent::Start).is_empty());
        assert!(session.apply(SessionEvent::Reset).is_empty());
    }
}
