// Battlesnake bot facade
//
// Owns the per-process random generator and the decision logger, and turns
// engine callbacks into calls on the move selector.

use log::{info, warn};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::{json, Value};

use crate::config::Config;
use crate::debug_logger::{DebugLogger, DecisionLogEntry};
use crate::selector::{self, SafetyMap, TurnContext, FALLBACK_DIRECTION};
use crate::types::{Battlesnake, Board, Direction, Game};

/// Battlesnake Bot with OOP-style API
/// Takes static configuration dependencies and exposes methods corresponding to API endpoints
pub struct Bot {
    config: Config,
    rng: Mutex<StdRng>,
    debug_logger: DebugLogger,
}

impl Bot {
    /// Creates a new Bot instance with the given configuration
    ///
    /// The generator is seeded once here, from `selector.seed` when configured
    /// and from OS entropy otherwise.
    pub fn new(config: Config) -> Self {
        Self::with_debug_logger(config, DebugLogger::disabled())
    }

    /// Creates a Bot that records every decision through `debug_logger`
    pub fn with_debug_logger(config: Config, debug_logger: DebugLogger) -> Self {
        let rng = match config.selector.seed {
            Some(seed) => {
                info!("Seeding move selector with {}", seed);
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_os_rng(),
        };

        Bot {
            config,
            rng: Mutex::new(rng),
            debug_logger,
        }
    }

    /// Returns bot metadata and appearance
    /// Corresponds to GET / endpoint
    pub fn info(&self) -> Value {
        info!("INFO");

        let appearance = &self.config.appearance;
        json!({
            "apiversion": appearance.apiversion,
            "author": appearance.author,
            "color": appearance.color,
            "head": appearance.head,
            "tail": appearance.tail,
        })
    }

    /// Called when a game starts
    /// Corresponds to POST /start endpoint
    pub fn start(&self, game: &Game, _turn: &i32, _board: &Board, _you: &Battlesnake) {
        info!("GAME START {}", game.id);
    }

    /// Called when a game ends
    /// Corresponds to POST /end endpoint
    pub fn end(&self, game: &Game, turn: &i32, _board: &Board, _you: &Battlesnake) {
        info!("GAME OVER {} after {} turns", game.id, turn);
    }

    /// Computes and returns the next move
    /// Corresponds to POST /move endpoint
    ///
    /// # Returns
    /// * `Value` - JSON response containing the chosen move direction
    pub async fn get_move(
        &self,
        _game: &Game,
        turn: &i32,
        board: &Board,
        you: &Battlesnake,
    ) -> Value {
        let chosen_move = self.choose_move(*turn, board, you);
        json!({ "move": chosen_move.as_str() })
    }

    /// Runs the selector for one turn and records the decision
    ///
    /// Malformed state is answered with `FALLBACK_DIRECTION` and still logged,
    /// so every turn the engine sent shows up in the decision log.
    pub fn choose_move(&self, turn: i32, board: &Board, you: &Battlesnake) -> Direction {
        let ctx = TurnContext::from_board(turn, board, you);

        let mut eliminations = Vec::new();
        let selected = selector::select_move_checked(&ctx, &mut *self.rng.lock(), |e| {
            info!("{}", e);
            eliminations.push(e);
        });

        let (chosen_move, safe_moves, invalid_state) = match selected {
            Ok(dir) => {
                let safe_moves = SafetyMap::from_eliminations(&eliminations).safe_moves();
                if safe_moves.is_empty() {
                    info!(
                        "MOVE {}: No safe moves detected! Moving {}",
                        turn,
                        dir.as_str()
                    );
                } else {
                    let head = you.body[0];
                    info!("MOVE {}: {} X:{} Y:{}", turn, dir.as_str(), head.x, head.y);
                }
                (dir, safe_moves, None)
            }
            Err(e) => {
                warn!("MOVE {}: {}, moving {}", turn, e, FALLBACK_DIRECTION.as_str());
                (FALLBACK_DIRECTION, Vec::new(), Some(e.to_string()))
            }
        };

        if self.debug_logger.is_enabled() {
            let mut entry = DecisionLogEntry::new(
                turn,
                chosen_move,
                safe_moves,
                eliminations,
                you.clone(),
                board.clone(),
            );
            entry.invalid_state = invalid_state;
            self.debug_logger.log_decision(entry);
        }

        chosen_move
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Coord;

    fn snake(id: &str, body: Vec<Coord>) -> Battlesnake {
        Battlesnake {
            id: id.to_string(),
            name: id.to_string(),
            health: 100,
            head: body[0],
            length: body.len() as i32,
            body,
            latency: String::new(),
            shout: String::new(),
        }
    }

    fn seeded_bot(seed: u64) -> Bot {
        let mut config = Config::default_hardcoded();
        config.selector.seed = Some(seed);
        Bot::new(config)
    }

    #[test]
    fn test_info_reflects_appearance_config() {
        let bot = seeded_bot(0);
        let info = bot.info();
        assert_eq!(info["apiversion"], "1");
        assert_eq!(info["color"], "#20b2aa");
        assert_eq!(info["head"], "gamer");
        assert_eq!(info["tail"], "rbc-necktie");
    }

    #[test]
    fn test_malformed_body_gets_fallback() {
        let bot = seeded_bot(0);
        let you = snake("me", vec![Coord::new(2, 2)]);
        let board = Board {
            height: 5,
            width: 5,
            food: vec![],
            snakes: vec![you.clone()],
            hazards: vec![],
        };
        assert_eq!(bot.choose_move(0, &board, &you), FALLBACK_DIRECTION);
    }

    #[test]
    fn test_far_apart_neck_gets_fallback() {
        let bot = seeded_bot(0);
        let you = snake("me", vec![Coord::new(i32::MAX, 0), Coord::new(i32::MIN, 0)]);
        let board = Board {
            height: 5,
            width: 5,
            food: vec![],
            snakes: vec![you.clone()],
            hazards: vec![],
        };
        assert_eq!(bot.choose_move(0, &board, &you), FALLBACK_DIRECTION);
    }

    #[test]
    fn test_same_seed_same_game() {
        let you = snake("me", vec![Coord::new(5, 5), Coord::new(5, 4)]);
        let board = Board {
            height: 11,
            width: 11,
            food: vec![],
            snakes: vec![you.clone()],
            hazards: vec![],
        };

        let a = seeded_bot(77);
        let b = seeded_bot(77);
        for turn in 0..20 {
            assert_eq!(
                a.choose_move(turn, &board, &you),
                b.choose_move(turn, &board, &you)
            );
        }
    }
}
