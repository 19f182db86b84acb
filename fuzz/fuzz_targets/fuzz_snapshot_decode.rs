#![no_main]

use columbus::game::{classify, is_falsy, render_ascii};
use columbus::{GameState, GridSize, Session, SessionEvent};
use libfuzzer_sys::fuzz_target;
use serde_json::Value;

fuzz_target!(|data: &[u8]| {
    // First byte picks the grid side, the rest is the response body
    let Some((&side, body)) = data.split_first() else {
        return;
    };
    let Some(grid) = GridSize::new(u16::from(side % 32)) else {
        return;
    };
    let Ok(value) = serde_json::from_slice::<Value>(body) else {
        return;
    };

    // A denied move never reaches the decoder
    let _ = is_falsy(&value);

    let (state, malformed) = GameState::from_value(&value, grid);

    // Decoded positions must stay on the grid
    assert!(grid.contains(state.ship), "ship off grid: {:?}", state.ship);
    assert!(grid.contains(state.treasure), "treasure off grid");
    assert!(state.pirates.iter().all(|p| grid.contains(p.position)));
    assert!(state.sea_monsters.iter().all(|m| grid.contains(m.position)));
    assert!(state.islands.iter().all(|i| grid.contains(*i)));
    assert!(malformed.len() <= 8, "field reported twice: {malformed:?}");

    let _ = render_ascii(&state, grid);

    // Whatever the snapshot, the session must end up in a coherent phase
    let verdict = classify(&state);
    let mut session = Session::default();
    session.apply(SessionEvent::Start);
    let generation = session.generation();
    session.apply(SessionEvent::Polled { generation, state });
    assert_eq!(
        session.notification().is_some_and(|n| n.is_blocking()),
        matches!(verdict, columbus::Verdict::Blocking(_)),
    );
});
