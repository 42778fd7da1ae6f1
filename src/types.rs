// Battlesnake API Types
// See https://docs.battlesnake.com/api

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Game metadata including ID, ruleset, and timeout
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Game {
    pub id: String,
    #[serde(default)]
    pub ruleset: Value,
    pub timeout: u32,
    #[serde(default)]
    pub source: String,
}

/// Board state including dimensions, food, snakes, and hazards
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Board {
    pub height: i32,
    pub width: i32,
    #[serde(default)]
    pub food: Vec<Coord>,
    pub snakes: Vec<Battlesnake>,
    #[serde(default)]
    pub hazards: Vec<Coord>,
}

/// Snake representation with all state information
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Battlesnake {
    pub id: String,
    pub name: String,
    pub health: i32,
    pub body: Vec<Coord>,
    pub head: Coord,
    pub length: i32,
    #[serde(default)]
    pub latency: String,
    #[serde(default)]
    pub shout: String,
}

/// 2D coordinate on the board
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub fn new(x: i32, y: i32) -> Self {
        Coord { x, y }
    }
}

/// Represents the four possible movement directions for a Battlesnake
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns all possible directions
    pub fn all() -> [Direction; 4] {
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
    }

    /// Converts direction to string representation for API response
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Parses an API token, ignoring case
    pub fn parse(s: &str) -> Result<Direction, String> {
        match s.to_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(format!("Invalid direction: {}", s)),
        }
    }

    /// Unit vector `(dx, dy)` of one step in this direction
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Calculates the next coordinate when moving in this direction
    pub fn apply(&self, coord: &Coord) -> Option<Coord> {
        self.advance(coord, 1)
    }

    /// Coordinate reached after `steps` straight moves in this direction
    ///
    /// `None` when the result does not fit in `i32`; such a cell is off any board.
    pub fn advance(&self, coord: &Coord, steps: i32) -> Option<Coord> {
        let (dx, dy) = self.delta();
        Some(Coord {
            x: coord.x.checked_add(dx.checked_mul(steps)?)?,
            y: coord.y.checked_add(dy.checked_mul(steps)?)?,
        })
    }
}

/// Complete game state received from the API
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct GameState {
    pub game: Game,
    pub turn: i32,
    pub board: Board,
    pub you: Battlesnake,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_scales_unit_vector() {
        let head = Coord::new(3, 3);
        assert_eq!(Direction::Up.advance(&head, 2), Some(Coord::new(3, 5)));
        assert_eq!(Direction::Down.advance(&head, 2), Some(Coord::new(3, 1)));
        assert_eq!(Direction::Left.apply(&head), Some(Coord::new(2, 3)));
        assert_eq!(Direction::Right.apply(&head), Some(Coord::new(4, 3)));
    }

    #[test]
    fn test_advance_past_i32_range_is_none() {
        let edge = Coord::new(i32::MAX - 1, i32::MIN + 1);
        assert_eq!(Direction::Right.advance(&edge, 1), Some(Coord::new(i32::MAX, i32::MIN + 1)));
        assert_eq!(Direction::Right.advance(&edge, 2), None);
        assert_eq!(Direction::Down.advance(&edge, 2), None);
        assert_eq!(Direction::Left.advance(&Coord::new(i32::MIN, 0), 1), None);
    }

    #[test]
    fn test_parse_direction() {
        assert_eq!(Direction::parse("up").unwrap(), Direction::Up);
        assert_eq!(Direction::parse("Down").unwrap(), Direction::Down);
        assert_eq!(Direction::parse("LEFT").unwrap(), Direction::Left);
        assert_eq!(Direction::parse("right").unwrap(), Direction::Right);
        assert!(Direction::parse("sideways").is_err());
    }

    #[test]
    fn test_game_state_deserializes_engine_payload() {
        let payload = r#"{
            "game": {"id": "g1", "ruleset": {"name": "standard", "version": "v1"}, "timeout": 500},
            "turn": 3,
            "board": {
                "height": 11, "width": 11,
                "food": [{"x": 5, "y": 5}],
                "hazards": [],
                "snakes": [{
                    "id": "me", "name": "me", "health": 90,
                    "body": [{"x": 1, "y": 1}, {"x": 1, "y": 0}],
                    "head": {"x": 1, "y": 1}, "length": 2, "latency": "12", "shout": ""
                }]
            },
            "you": {
                "id": "me", "name": "me", "health": 90,
                "body": [{"x": 1, "y": 1}, {"x": 1, "y": 0}],
                "head": {"x": 1, "y": 1}, "length": 2
            }
        }"#;

        let state: GameState = serde_json::from_str(payload).unwrap();
        assert_eq!(state.turn, 3);
        assert_eq!(state.board.width, 11);
        assert_eq!(state.you.body[1], Coord::new(1, 0));
        assert_eq!(state.you.latency, "");
    }

    #[test]
    fn test_direction_serializes_as_lowercase_token() {
        assert_eq!(serde_json::to_string(&Direction::Left).unwrap(), "\"left\"");
    }
}
