// Library exports for the Battlesnake bot
// This allows the replay tool and integration tests to use the core bot logic

pub mod bot;
pub mod config;
pub mod debug_logger;
pub mod replay;
pub mod selector;
pub mod types;
