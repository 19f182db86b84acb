//! Server snapshots and their lenient decoding.
//!
//! The server owns the authoritative game; the client only ever holds the
//! latest snapshot it received. Decoding never fails: each field that is
//! missing, mistyped or out of bounds falls back to its default on its own,
//! and the substitution is reported so the caller can log it.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::game::{GridSize, Position};

/// Pirate ship variety. Only affects how the ship is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PirateKind {
    /// Chases slowly.
    #[default]
    Slow,
    /// Chases every turn.
    Fast,
    /// Walks a fixed route.
    Patrol,
}

/// A pirate ship in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Pirate {
    /// Cell occupied by the pirate.
    pub position: Position,
    /// Which kind of pirate this is.
    #[serde(rename = "type")]
    pub kind: PirateKind,
}

/// A sea monster in a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SeaMonster {
    /// Cell occupied by the monster.
    pub position: Position,
}

/// What the ship ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionKind {
    /// Reached the treasure. Ends the session as a win.
    Treasure,
    /// Eaten by a sea monster. The ship restarts from the origin.
    Monster,
    /// Caught by pirates. Ends the session.
    Pirate,
    /// Bumped into an island. Only worth a passing notice.
    Island,
}

impl CollisionKind {
    /// Whether this collision needs an explicit acknowledgement.
    #[must_use]
    pub const fn is_blocking(self) -> bool {
        !matches!(self, CollisionKind::Island)
    }

    /// Whether acknowledging this collision ends the session.
    #[must_use]
    pub const fn ends_session(self) -> bool {
        matches!(self, CollisionKind::Treasure | CollisionKind::Pirate)
    }

    /// Text shown to the player for this collision.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            CollisionKind::Treasure => "Yay!! You have arrived.",
            CollisionKind::Monster => "Chomp! The sea monster got you. Restart your voyage.",
            CollisionKind::Pirate => "Hijacked! Your voyage ends in pirate chains.. Begin again!",
            CollisionKind::Island => "Island ahead! Change your way.",
        }
    }
}

/// A snapshot field that had to be replaced by its default while decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MalformedField {
    /// The payload was not a JSON object at all.
    Payload,
    /// `ccPosition`.
    Ship,
    /// `treasurePosition`.
    Treasure,
    /// `pirates`, or one of its entries.
    Pirates,
    /// `seaMonsters`, or one of its entries.
    SeaMonsters,
    /// `islands`, or one of its entries.
    Islands,
    /// `collision`.
    Collision,
    /// The invisibility flag.
    Invisible,
}

impl fmt::Display for MalformedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MalformedField::Payload => "payload",
            MalformedField::Ship => "ccPosition",
            MalformedField::Treasure => "treasurePosition",
            MalformedField::Pirates => "pirates",
            MalformedField::SeaMonsters => "seaMonsters",
            MalformedField::Islands => "islands",
            MalformedField::Collision => "collision",
            MalformedField::Invisible => "columbusInvisible",
        };
        f.write_str(name)
    }
}

/// One snapshot of the game as reported by the server.
///
/// Serializes back to the server's wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// The player's ship.
    #[serde(rename = "ccPosition")]
    pub ship: Position,
    /// Where the treasure is buried.
    #[serde(rename = "treasurePosition")]
    pub treasure: Position,
    /// All pirate ships.
    pub pirates: Vec<Pirate>,
    /// All sea monsters.
    pub sea_monsters: Vec<SeaMonster>,
    /// Impassable island cells.
    pub islands: BTreeSet<Position>,
    /// Pending collision, set by the server until acknowledged.
    pub collision: Option<CollisionKind>,
    /// Whether the ship is currently cloaked from pirates.
    #[serde(rename = "columbusInvisible")]
    pub invisible: bool,
}

impl GameState {
    /// The state shown before any snapshot has arrived.
    #[must_use]
    pub fn empty(grid: GridSize) -> Self {
        Self {
            ship: Position::ORIGIN,
            treasure: grid.far_corner(),
            pirates: Vec::new(),
            sea_monsters: Vec::new(),
            islands: BTreeSet::new(),
            collision: None,
            invisible: false,
        }
    }

    /// Decode a snapshot, substituting defaults field by field.
    ///
    /// Returns the decoded state and the fields that were substituted.
    #[must_use]
    pub fn from_value(value: &Value, grid: GridSize) -> (Self, Vec<MalformedField>) {
        let mut state = Self::empty(grid);
        let mut malformed = Vec::new();

        let Some(obj) = value.as_object() else {
            malformed.push(MalformedField::Payload);
            return (state, malformed);
        };

        match decode_position(obj.get("ccPosition"), grid) {
            Some(pos) => state.ship = pos,
            None => malformed.push(MalformedField::Ship),
        }
        match decode_position(obj.get("treasurePosition"), grid) {
            Some(pos) => state.treasure = pos,
            None => malformed.push(MalformedField::Treasure),
        }

        // An unknown pirate type only changes the glyph, never the pirate's presence
        let mut unknown_kind = false;
        let (pirates, clean) = decode_list(obj.get("pirates"), |entry| {
            let position = decode_position(entry.get("position"), grid)?;
            let kind = match entry.get("type") {
                None | Some(Value::Null) => PirateKind::default(),
                Some(kind) => PirateKind::deserialize(kind).unwrap_or_else(|_| {
                    unknown_kind = true;
                    PirateKind::default()
                }),
            };
            Some(Pirate { position, kind })
        });
        state.pirates = pirates;
        if !clean || unknown_kind {
            malformed.push(MalformedField::Pirates);
        }

        let (sea_monsters, clean) = decode_list(obj.get("seaMonsters"), |entry| {
            decode_position(entry.get("position"), grid).map(|position| SeaMonster { position })
        });
        state.sea_monsters = sea_monsters;
        if !clean {
            malformed.push(MalformedField::SeaMonsters);
        }

        let (islands, clean) =
            decode_list(obj.get("islands"), |entry| decode_position(Some(entry), grid));
        state.islands = islands.into_iter().collect();
        if !clean {
            malformed.push(MalformedField::Islands);
        }

        match obj.get("collision") {
            None | Some(Value::Null) => {}
            Some(Value::String(s)) if s.is_empty() => {}
            Some(kind) => match CollisionKind::deserialize(kind) {
                Ok(kind) => state.collision = Some(kind),
                Err(_) => malformed.push(MalformedField::Collision),
            },
        }

        match invisibility_flag(obj) {
            None | Some(Value::Null) => {}
            Some(Value::Bool(flag)) => state.invisible = *flag,
            Some(_) => malformed.push(MalformedField::Invisible),
        }

        (state, malformed)
    }

    /// Get the pirate occupying a cell, if any.
    #[must_use]
    pub fn pirate_at(&self, pos: Position) -> Option<&Pirate> {
        self.pirates.iter().find(|p| p.position == pos)
    }

    /// Check whether a sea monster occupies a cell.
    #[must_use]
    pub fn has_monster_at(&self, pos: Position) -> bool {
        self.sea_monsters.iter().any(|m| m.position == pos)
    }

    /// Check whether a cell is an island.
    #[must_use]
    pub fn is_island(&self, pos: Position) -> bool {
        self.islands.contains(&pos)
    }
}

/// Whether a move response means "move denied".
///
/// An empty body or a JSON-falsy value (`null`, `false`, `0`, `""`) is a
/// refusal; anything else is a new snapshot.
#[must_use]
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() < f64::EPSILON),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn invisibility_flag(obj: &Map<String, Value>) -> Option<&Value> {
    obj.get("columbusInvisible").or_else(|| obj.get("invisible"))
}

fn decode_position(value: Option<&Value>, grid: GridSize) -> Option<Position> {
    let pos = Position::deserialize(value?).ok()?;
    grid.contains(pos).then_some(pos)
}

/// Decode a JSON array entry by entry, dropping entries that fail.
///
/// The flag is `false` when the list was missing, not an array, or lost entries.
fn decode_list<T>(
    value: Option<&Value>,
    decode: impl FnMut(&Value) -> Option<T>,
) -> (Vec<T>, bool) {
    let Some(Value::Array(entries)) = value else {
        return (Vec::new(), false);
    };

    let decoded: Vec<T> = entries.iter().filter_map(decode).collect();
    let clean = decoded.len() == entries.len();
    (decoded, clean)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn grid() -> GridSize {
        GridSize::new(10).unwrap()
    }

    #[test]
    fn test_decode_full_snapshot() {
        let value = json!({
            "ccPosition": [2, 3],
            "treasurePosition": [9, 9],
            "pirates": [
                {"position": [4, 4], "type": "fast"},
                {"position": [5, 1], "type": "patrol"}
            ],
            "seaMonsters": [{"position": [7, 2]}],
            "islands": [[1, 1], [1, 2]],
            "collision": "monster",
            "columbusInvisible": true
        });

        let (state, malformed) = GameState::from_value(&value, grid());

        assert!(malformed.is_empty());
        assert_eq!(state.ship, Position::new(2, 3));
        assert_eq!(state.pirates.len(), 2);
        assert_eq!(state.pirate_at(Position::new(5, 1)).unwrap().kind, PirateKind::Patrol);
        assert!(state.has_monster_at(Position::new(7, 2)));
        assert!(state.is_island(Position::new(1, 2)));
        assert_eq!(state.collision, Some(CollisionKind::Monster));
        assert!(state.invisible);
    }

    #[test]
    fn test_missing_arrays_fall_back_independently() {
        let value = json!({
            "ccPosition": [3, 3],
            "treasurePosition": [9, 9],
            "pirates": "nope",
            "collision": null
        });

        let (state, malformed) = GameState::from_value(&value, grid());

        assert_eq!(state.ship, Position::new(3, 3));
        assert!(state.pirates.is_empty());
        assert!(state.sea_monsters.is_empty());
        assert!(state.islands.is_empty());
        assert_eq!(state.collision, None);
        assert!(malformed.contains(&MalformedField::Pirates));
        assert!(malformed.contains(&MalformedField::SeaMonsters));
        assert!(malformed.contains(&MalformedField::Islands));
        assert!(!malformed.contains(&MalformedField::Ship));
    }

    #[test]
    fn test_out_of_bounds_positions_are_malformed() {
        let value = json!({
            "ccPosition": [12, 0],
            "treasurePosition": [9, 9],
            "pirates": [{"position": [1, 1], "type": "slow"}, {"position": [10, 10], "type": "slow"}],
            "seaMonsters": [],
            "islands": [[0, 99]]
        });

        let (state, malformed) = GameState::from_value(&value, grid());

        assert_eq!(state.ship, Position::ORIGIN);
        assert_eq!(state.pirates.len(), 1);
        assert!(state.islands.is_empty());
        assert!(malformed.contains(&MalformedField::Ship));
        assert!(malformed.contains(&MalformedField::Pirates));
        assert!(malformed.contains(&MalformedField::Islands));
    }

    #[test]
    fn test_non_object_payload() {
        let (state, malformed) = GameState::from_value(&json!([1, 2, 3]), grid());
        assert_eq!(state, GameState::empty(grid()));
        assert_eq!(malformed, vec![MalformedField::Payload]);
    }

    #[test]
    fn test_unknown_collision_is_dropped() {
        let value = json!({
            "ccPosition": [0, 0],
            "treasurePosition": [9, 9],
            "pirates": [],
            "seaMonsters": [],
            "islands": [],
            "collision": "kraken"
        });

        let (state, malformed) = GameState::from_value(&value, grid());
        assert_eq!(state.collision, None);
        assert_eq!(malformed, vec![MalformedField::Collision]);
    }

    #[test]
    fn test_pirate_type_missing_defaults_to_slow() {
        let value = json!({"pirates": [{"position": [1, 1]}]});
        let (state, _) = GameState::from_value(&value, grid());
        assert_eq!(state.pirates[0].kind, PirateKind::Slow);
    }

    #[test]
    fn test_unknown_pirate_type_keeps_pirate() {
        let value = json!({
            "ccPosition": [2, 2],
            "pirates": [{"position": [2, 2], "type": "ghost"}],
            "collision": null
        });
        let (state, malformed) = GameState::from_value(&value, grid());

        assert_eq!(state.pirates.len(), 1);
        assert_eq!(state.pirate_at(Position::new(2, 2)).unwrap().kind, PirateKind::Slow);
        assert!(malformed.contains(&MalformedField::Pirates));
        assert_eq!(
            crate::game::classify(&state),
            crate::game::Verdict::Blocking(CollisionKind::Pirate)
        );
    }

    #[test]
    fn test_serializes_to_wire_names() {
        let mut state = GameState::empty(grid());
        state.pirates.push(Pirate {
            position: Position::new(1, 2),
            kind: PirateKind::Patrol,
        });
        state.collision = Some(CollisionKind::Island);

        let value = serde_json::to_value(&state).unwrap();

        assert_eq!(value["ccPosition"], json!([0, 0]));
        assert_eq!(value["treasurePosition"], json!([9, 9]));
        assert_eq!(value["pirates"][0]["type"], json!("patrol"));
        assert_eq!(value["seaMonsters"], json!([]));
        assert_eq!(value["collision"], json!("island"));
        assert_eq!(GameState::from_value(&value, grid()), (state, Vec::new()));
    }

    #[test]
    fn test_falsy_move_responses() {
        assert!(is_falsy(&Value::Null));
        assert!(is_falsy(&json!(false)));
        assert!(is_falsy(&json!(0)));
        assert!(is_falsy(&json!("")));
        assert!(!is_falsy(&json!({})));
        assert!(!is_falsy(&json!({"ccPosition": [0, 1]})));
    }

    #[test]
    fn test_only_island_is_transient() {
        assert!(CollisionKind::Treasure.is_blocking());
        assert!(CollisionKind::Monster.is_blocking());
        assert!(CollisionKind::Pirate.is_blocking());
        assert!(!CollisionKind::Island.is_blocking());
        assert!(CollisionKind::Pirate.ends_session());
        assert!(!CollisionKind::Monster.ends_session());
    }
}
