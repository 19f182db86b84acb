//! Keyboard mapping for the play screen.

use columbus::{Direction, SessionEvent, SessionPhase};
use crossterm::event::KeyCode;

/// What a key press asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Intent {
    /// Leave the program.
    Quit,
    /// Feed an event to the session.
    Session(SessionEvent),
    /// Nothing bound to this key.
    None,
}

/// Map a key to an intent for the given phase.
///
/// Move keys are always forwarded; the session itself drops them while a
/// notification is open.
pub(crate) fn intent_for(code: KeyCode, phase: SessionPhase) -> Intent {
    if phase == SessionPhase::Idle {
        return match code {
            KeyCode::Enter | KeyCode::Char('s') => Intent::Session(SessionEvent::Start),
            KeyCode::Char('q') | KeyCode::Esc => Intent::Quit,
            _ => Intent::None,
        };
    }

    if let Some(direction) = direction_for(code) {
        return Intent::Session(SessionEvent::Move(direction));
    }

    match code {
        KeyCode::Char('q') => Intent::Quit,
        KeyCode::Enter => Intent::Session(SessionEvent::Acknowledge),
        KeyCode::Char('r') => Intent::Session(SessionEvent::Reset),
        KeyCode::Char('t') => Intent::Session(SessionEvent::ToggleStrategy),
        KeyCode::Char('i') => Intent::Session(SessionEvent::ActivateCloak),
        KeyCode::Char('b') | KeyCode::Esc => Intent::Session(SessionEvent::GoBack),
        _ => Intent::None,
    }
}

fn direction_for(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Up | KeyCode::Char('w') => Some(Direction::Up),
        KeyCode::Down | KeyCode::Char('s') => Some(Direction::Down),
        KeyCode::Left | KeyCode::Char('a') => Some(Direction::Left),
        KeyCode::Right | KeyCode::Char('d') => Some(Direction::Right),
        _ => None,
    }
}
