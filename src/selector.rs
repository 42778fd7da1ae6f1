// Move selection for a single turn
//
// Starts from all four directions and strikes out the unsafe ones:
// reversing onto the neck, leaving the board, and running into any body
// segment one or two cells straight ahead. A random survivor is returned,
// or `FALLBACK_DIRECTION` when nothing survives.
//
// Everything here is pure: randomness and diagnostics are supplied by the caller.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::types::{Battlesnake, Board, Coord, Direction};

/// Move returned when every direction has been eliminated
pub const FALLBACK_DIRECTION: Direction = Direction::Down;

/// Precondition violations detected by `TurnContext::validate`
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectorError {
    #[error("invalid state: {0}")]
    InvalidState(String),
}

/// Why a direction was struck out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    /// Moving this way puts the head back onto the neck
    Neck,
    OutOfBounds,
    /// Next cell is one of our own segments
    OwnBody,
    /// Cell two steps ahead is one of our own segments
    OwnBodyAhead,
    OpponentBody,
    OpponentBodyAhead,
}

/// A single elimination decision, reported to the caller's sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Elimination {
    pub direction: Direction,
    pub reason: Reason,
}

impl fmt::Display for Elimination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir = self.direction.as_str().to_uppercase();
        match self.reason {
            Reason::Neck => write!(f, "{} isn't safe, neck is in the way", dir),
            Reason::OutOfBounds => write!(f, "{} isn't safe, off of board", dir),
            Reason::OwnBody => write!(f, "{} isn't safe, body in way", dir),
            Reason::OwnBodyAhead => write!(f, "Two {} isn't safe, body in way", dir),
            Reason::OpponentBody | Reason::OpponentBodyAhead => {
                write!(f, "{} isn't safe, another snake in way", dir)
            }
        }
    }
}

/// Read-only view of everything the selector looks at for one turn
#[derive(Debug, Clone)]
pub struct TurnContext<'a> {
    /// Only used for diagnostics
    pub turn: i32,
    pub you: &'a [Coord],
    pub width: i32,
    pub height: i32,
    pub opponents: Vec<&'a [Coord]>,
}

impl<'a> TurnContext<'a> {
    /// Creates a context with no opponents
    pub fn new(turn: i32, you: &'a [Coord], width: i32, height: i32) -> Self {
        TurnContext {
            turn,
            you,
            width,
            height,
            opponents: Vec::new(),
        }
    }

    /// Adds an opponent body
    pub fn with_opponent(mut self, body: &'a [Coord]) -> Self {
        self.opponents.push(body);
        self
    }

    /// Builds the context from an engine payload
    ///
    /// The engine lists our own snake in `board.snakes` too; it is skipped by id
    /// since its body is already checked as `you`.
    pub fn from_board(turn: i32, board: &'a Board, you: &'a Battlesnake) -> Self {
        TurnContext {
            turn,
            you: &you.body,
            width: board.width,
            height: board.height,
            opponents: board
                .snakes
                .iter()
                .filter(|s| s.id != you.id)
                .map(|s| s.body.as_slice())
                .collect(),
        }
    }

    /// Head coordinate, if the body is non-empty
    pub fn head(&self) -> Option<Coord> {
        self.you.first().copied()
    }

    /// Checks the preconditions the plain selector assumes
    pub fn validate(&self) -> Result<(), SelectorError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(SelectorError::InvalidState(format!(
                "board dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }

        if self.you.len() < 2 {
            return Err(SelectorError::InvalidState(format!(
                "agent body needs a head and a neck, got {} segment(s)",
                self.you.len()
            )));
        }

        let (head, neck) = (self.you[0], self.you[1]);
        let distance = u64::from(head.x.abs_diff(neck.x)) + u64::from(head.y.abs_diff(neck.y));
        if distance != 1 {
            return Err(SelectorError::InvalidState(format!(
                "neck ({}, {}) is not adjacent to head ({}, {})",
                neck.x, neck.y, head.x, head.y
            )));
        }

        Ok(())
    }

    fn in_bounds(&self, coord: &Coord) -> bool {
        coord.x >= 0 && coord.x < self.width && coord.y >= 0 && coord.y < self.height
    }
}

/// Per-direction safety flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafetyMap {
    safe: [bool; 4],
}

impl SafetyMap {
    /// Every direction marked safe
    pub fn all_safe() -> Self {
        SafetyMap { safe: [true; 4] }
    }

    fn index(dir: Direction) -> usize {
        match dir {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }

    pub fn is_safe(&self, dir: Direction) -> bool {
        self.safe[Self::index(dir)]
    }

    fn mark_unsafe(&mut self, dir: Direction) {
        self.safe[Self::index(dir)] = false;
    }

    /// Rebuilds the map from the events `evaluate` reported
    pub fn from_eliminations(eliminations: &[Elimination]) -> Self {
        let mut map = Self::all_safe();
        for e in eliminations {
            map.mark_unsafe(e.direction);
        }
        map
    }

    /// Surviving directions in up, down, left, right order
    pub fn safe_moves(&self) -> Vec<Direction> {
        Direction::all()
            .iter()
            .copied()
            .filter(|&dir| self.is_safe(dir))
            .collect()
    }

    /// Directions that were struck out
    pub fn eliminated(&self) -> Vec<Direction> {
        Direction::all()
            .iter()
            .copied()
            .filter(|&dir| !self.is_safe(dir))
            .collect()
    }
}

/// Runs every elimination rule and returns the resulting safety map
///
/// Each decision is passed to `sink` as it is made. A direction can be
/// reported more than once when several rules apply to it.
pub fn evaluate<F>(ctx: &TurnContext<'_>, mut sink: F) -> SafetyMap
where
    F: FnMut(Elimination),
{
    let mut map = SafetyMap::all_safe();

    let head = match ctx.head() {
        Some(head) => head,
        None => return SafetyMap { safe: [false; 4] },
    };

    let mut strike = |map: &mut SafetyMap, direction: Direction, reason: Reason| {
        map.mark_unsafe(direction);
        sink(Elimination { direction, reason });
    };

    // Reversal: only the first axis that differs counts
    if let Some(neck) = ctx.you.get(1) {
        let reversal = if neck.x < head.x {
            Some(Direction::Left)
        } else if neck.x > head.x {
            Some(Direction::Right)
        } else if neck.y < head.y {
            Some(Direction::Down)
        } else if neck.y > head.y {
            Some(Direction::Up)
        } else {
            None
        };

        if let Some(dir) = reversal {
            strike(&mut map, dir, Reason::Neck);
        }
    }

    // A cell that doesn't fit in i32 is off the board and can't hold a segment
    for dir in Direction::all() {
        let on_board = dir.apply(&head).map_or(false, |next| ctx.in_bounds(&next));
        if !on_board {
            strike(&mut map, dir, Reason::OutOfBounds);
        }
    }

    let occupies = |body: &[Coord], cell: Option<Coord>| cell.map_or(false, |c| body.contains(&c));

    for dir in Direction::all() {
        if occupies(ctx.you, dir.advance(&head, 1)) {
            strike(&mut map, dir, Reason::OwnBody);
        }
        if occupies(ctx.you, dir.advance(&head, 2)) {
            strike(&mut map, dir, Reason::OwnBodyAhead);
        }
    }

    for &body in &ctx.opponents {
        for dir in Direction::all() {
            if occupies(body, dir.advance(&head, 1)) {
                strike(&mut map, dir, Reason::OpponentBody);
            }
            if occupies(body, dir.advance(&head, 2)) {
                strike(&mut map, dir, Reason::OpponentBodyAhead);
            }
        }
    }

    map
}

/// Picks the move for this turn
///
/// Returns `FALLBACK_DIRECTION` when no direction is safe, otherwise a
/// uniformly random safe direction drawn from `rng`.
pub fn select_move<R, F>(ctx: &TurnContext<'_>, rng: &mut R, sink: F) -> Direction
where
    R: Rng,
    F: FnMut(Elimination),
{
    let safe_moves = evaluate(ctx, sink).safe_moves();
    pick(&safe_moves, rng)
}

/// Same as `select_move`, but rejects malformed input first
pub fn select_move_checked<R, F>(
    ctx: &TurnContext<'_>,
    rng: &mut R,
    sink: F,
) -> Result<Direction, SelectorError>
where
    R: Rng,
    F: FnMut(Elimination),
{
    ctx.validate()?;
    Ok(select_move(ctx, rng, sink))
}

/// Chooses uniformly among `safe_moves`, or the fallback if there are none
pub fn pick<R: Rng>(safe_moves: &[Direction], rng: &mut R) -> Direction {
    if safe_moves.is_empty() {
        return FALLBACK_DIRECTION;
    }
    safe_moves[rng.random_range(0..safe_moves.len())]
}
