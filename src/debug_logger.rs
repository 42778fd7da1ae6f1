// Debug logging module for asynchronous decision logging
//
// This module provides fire-and-forget async logging to avoid blocking
// the main request/response cycle. Each turn's decision is written as one line of a JSONL file.

use log::error;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::selector::Elimination;
use crate::types::{Battlesnake, Board, Direction};

/// A single decision log entry
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DecisionLogEntry {
    pub turn: i32,
    pub chosen_move: Direction,
    pub safe_moves: Vec<Direction>,
    #[serde(default)]
    pub eliminations: Vec<Elimination>,
    pub you: Battlesnake,
    pub board: Board,
    pub timestamp: String,
    /// Set when the state failed validation and the fallback was sent unchecked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalid_state: Option<String>,
}

impl DecisionLogEntry {
    /// Builds an entry stamped with the current UTC time
    pub fn new(
        turn: i32,
        chosen_move: Direction,
        safe_moves: Vec<Direction>,
        eliminations: Vec<Elimination>,
        you: Battlesnake,
        board: Board,
    ) -> Self {
        DecisionLogEntry {
            turn,
            chosen_move,
            safe_moves,
            eliminations,
            you,
            board,
            timestamp: chrono::Utc::now().to_rfc3339(),
            invalid_state: None,
        }
    }
}

/// Shared debug logger state
/// Uses Arc<Mutex<File>> to allow concurrent async writes from multiple tasks
#[derive(Clone)]
pub struct DebugLogger {
    file: Arc<Mutex<Option<File>>>,
    enabled: bool,
}

impl DebugLogger {
    /// Creates a new debug logger
    /// If enabled is true, initializes the log file (truncating if it exists)
    pub async fn new(enabled: bool, log_file_path: &str) -> Self {
        if !enabled {
            return Self::disabled();
        }

        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_file_path)
            .await
        {
            Ok(file) => {
                log::info!("Debug logging enabled: {}", log_file_path);
                DebugLogger {
                    file: Arc::new(Mutex::new(Some(file))),
                    enabled: true,
                }
            }
            Err(e) => {
                error!("Failed to create debug log file '{}': {}", log_file_path, e);
                Self::disabled()
            }
        }
    }

    /// Creates a disabled debug logger (no-op)
    pub fn disabled() -> Self {
        DebugLogger {
            file: Arc::new(Mutex::new(None)),
            enabled: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Logs a decision asynchronously (fire-and-forget)
    /// This spawns a tokio task that writes to the file without blocking
    pub fn log_decision(&self, entry: DecisionLogEntry) {
        if !self.enabled {
            return;
        }

        let file_handle = self.file.clone();
        tokio::spawn(async move {
            Self::write_entry(file_handle, entry).await;
        });
    }

    /// Appends one entry to the file and flushes it
    async fn write_entry(file_handle: Arc<Mutex<Option<File>>>, entry: DecisionLogEntry) {
        let mut file_guard = file_handle.lock().await;

        if let Some(file) = file_guard.as_mut() {
            match serde_json::to_string(&entry) {
                Ok(json_line) => {
                    let line_with_newline = format!("{}\n", json_line);
                    if let Err(e) = file.write_all(line_with_newline.as_bytes()).await {
                        error!("Failed to write debug log entry: {}", e);
                    } else if let Err(e) = file.flush().await {
                        error!("Failed to flush debug log: {}", e);
                    }
                }
                Err(e) => {
                    error!("Failed to serialize debug log entry: {}", e);
                }
            }
        }
    }

    /// Writes an entry and waits for it to land, for callers that need ordering
    pub async fn log_decision_now(&self, entry: DecisionLogEntry) {
        if self.enabled {
            Self::write_entry(self.file.clone(), entry).await;
        }
    }
}
