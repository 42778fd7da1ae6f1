// Replay module for checking logged decisions against the current selector
//
// This module provides functionality to:
// 1. Parse JSONL decision logs
// 2. Re-run the elimination rules on each logged state
// 3. Check the logged move against the recomputed safe set
// 4. Generate analysis reports

use log::{info, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::debug_logger::DecisionLogEntry;
use crate::selector::{self, TurnContext, FALLBACK_DIRECTION};
use crate::types::Direction;

/// Result of replaying a single turn
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub turn: i32,
    pub logged_move: Direction,
    pub logged_safe_moves: Vec<Direction>,
    pub replayed_safe_moves: Vec<Direction>,
    /// The logged move is one the selector could have returned
    pub consistent: bool,
    pub safe_set_matches: bool,
    /// The logged state fails validation; only the fallback move is acceptable
    pub invalid_state: bool,
}

/// Statistics for a complete replay session
#[derive(Debug, Default)]
pub struct ReplayStats {
    pub total_turns: usize,
    pub consistent: usize,
    pub inconsistent: usize,
    pub safe_set_mismatches: usize,
    pub fallback_turns: usize,
    pub invalid_turns: usize,
    pub consistency_rate: f64,
}

/// Replay engine for analyzing decision logs
pub struct ReplayEngine {
    verbose: bool,
}

impl ReplayEngine {
    pub fn new(verbose: bool) -> Self {
        ReplayEngine { verbose }
    }

    /// Loads all log entries from a JSONL file
    pub fn load_log_file<P: AsRef<Path>>(&self, log_path: P) -> Result<Vec<DecisionLogEntry>, String> {
        let file = File::open(log_path.as_ref())
            .map_err(|e| format!("Failed to open log file: {}", e))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 1, e))?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: DecisionLogEntry = serde_json::from_str(&line)
                .map_err(|e| format!("Failed to parse JSON on line {}: {}", line_num + 1, e))?;

            entries.push(entry);
        }

        info!("Loaded {} log entries", entries.len());
        Ok(entries)
    }

    /// Replays a single log entry and compares the result
    ///
    /// A state that fails validation replays to an empty safe set, so the
    /// logged move must be the fallback.
    pub fn replay_entry(&self, entry: &DecisionLogEntry) -> ReplayResult {
        let ctx = TurnContext::from_board(entry.turn, &entry.board, &entry.you);
        let invalid_state = match ctx.validate() {
            Ok(()) => false,
            Err(e) => {
                if self.verbose {
                    warn!("Turn {}: {}", entry.turn, e);
                }
                true
            }
        };

        let replayed_safe_moves = if invalid_state {
            Vec::new()
        } else {
            selector::evaluate(&ctx, |_| {}).safe_moves()
        };

        let consistent = if replayed_safe_moves.is_empty() {
            entry.chosen_move == FALLBACK_DIRECTION
        } else {
            replayed_safe_moves.contains(&entry.chosen_move)
        };
        let safe_set_matches = replayed_safe_moves == entry.safe_moves;

        if self.verbose {
            if consistent {
                info!(
                    "Turn {}: ✓ {} (safe: {})",
                    entry.turn,
                    entry.chosen_move.as_str(),
                    format_moves(&replayed_safe_moves)
                );
            } else {
                warn!(
                    "Turn {}: ✗ {} not in replayed safe set {}",
                    entry.turn,
                    entry.chosen_move.as_str(),
                    format_moves(&replayed_safe_moves)
                );
            }
        }

        ReplayResult {
            turn: entry.turn,
            logged_move: entry.chosen_move,
            logged_safe_moves: entry.safe_moves.clone(),
            replayed_safe_moves,
            consistent,
            safe_set_matches,
            invalid_state,
        }
    }

    /// Replays all entries in a log file
    pub fn replay_all(&self, entries: &[DecisionLogEntry]) -> Vec<ReplayResult> {
        entries.iter().map(|entry| self.replay_entry(entry)).collect()
    }

    /// Replays specific turns from a log file
    pub fn replay_turns(
        &self,
        entries: &[DecisionLogEntry],
        turn_numbers: &[i32],
    ) -> Result<Vec<ReplayResult>, String> {
        let mut results = Vec::new();

        for turn_num in turn_numbers {
            let entry = entries
                .iter()
                .find(|e| e.turn == *turn_num)
                .ok_or_else(|| format!("Turn {} not found in log file", turn_num))?;

            results.push(self.replay_entry(entry));
        }

        Ok(results)
    }

    /// Generates statistics from replay results
    pub fn generate_stats(&self, results: &[ReplayResult]) -> ReplayStats {
        let total_turns = results.len();
        let consistent = results.iter().filter(|r| r.consistent).count();
        let consistency_rate = if total_turns > 0 {
            (consistent as f64 / total_turns as f64) * 100.0
        } else {
            0.0
        };

        ReplayStats {
            total_turns,
            consistent,
            inconsistent: total_turns - consistent,
            safe_set_mismatches: results.iter().filter(|r| !r.safe_set_matches).count(),
            fallback_turns: results
                .iter()
                .filter(|r| r.replayed_safe_moves.is_empty())
                .count(),
            invalid_turns: results.iter().filter(|r| r.invalid_state).count(),
            consistency_rate,
        }
    }

    /// Prints a detailed report of replay results
    pub fn print_report(&self, results: &[ReplayResult]) {
        let stats = self.generate_stats(results);

        println!("\n═══════════════════════════════════════════════════════════");
        println!("                    REPLAY REPORT");
        println!("═══════════════════════════════════════════════════════════");
        println!("Total Turns:        {}", stats.total_turns);
        println!(
            "Consistent:         {} ({:.1}%)",
            stats.consistent, stats.consistency_rate
        );
        println!("Inconsistent:       {}", stats.inconsistent);
        println!("Safe Set Changed:   {}", stats.safe_set_mismatches);
        println!("Fallback Turns:     {}", stats.fallback_turns);
        println!("Invalid States:     {}", stats.invalid_turns);
        println!("═══════════════════════════════════════════════════════════\n");

        let flagged: Vec<_> = results
            .iter()
            .filter(|r| !r.consistent || !r.safe_set_matches)
            .collect();
        if !flagged.is_empty() {
            println!("═══════════════════════════════════════════════════════════");
            println!("                  DETAILED MISMATCHES");
            println!("═══════════════════════════════════════════════════════════");

            for result in flagged {
                println!(
                    "Turn {}: chose {}, logged safe {}, replayed safe {}",
                    result.turn,
                    result.logged_move.as_str(),
                    format_moves(&result.logged_safe_moves),
                    format_moves(&result.replayed_safe_moves)
                );
            }
            println!();
        }
    }

    /// Validates that specific expected moves were made
    pub fn validate_expected_moves(
        &self,
        entries: &[DecisionLogEntry],
        expected_moves: &[(i32, Vec<Direction>)], // (turn, acceptable_moves)
    ) -> Result<(), String> {
        for (turn, acceptable) in expected_moves {
            let entry = entries
                .iter()
                .find(|e| e.turn == *turn)
                .ok_or_else(|| format!("Turn {} not found in log", turn))?;

            if !acceptable.contains(&entry.chosen_move) {
                return Err(format!(
                    "Turn {}: Expected one of {:?}, but got {}",
                    turn,
                    acceptable.iter().map(|d| d.as_str()).collect::<Vec<_>>(),
                    entry.chosen_move.as_str()
                ));
            }
        }

        Ok(())
    }
}

fn format_moves(moves: &[Direction]) -> String {
    if moves.is_empty() {
        return "[]".to_string();
    }
    let names: Vec<_> = moves.iter().map(|d| d.as_str()).collect();
    format!("[{}]", names.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_moves() {
        assert_eq!(format_moves(&[]), "[]");
        assert_eq!(
            format_moves(&[Direction::Up, Direction::Left]),
            "[up, left]"
        );
    }

    #[test]
    fn test_stats_on_empty_results() {
        let stats = ReplayEngine::new(false).generate_stats(&[]);
        assert_eq!(stats.total_turns, 0);
        assert_eq!(stats.consistency_rate, 0.0);
    }
}
