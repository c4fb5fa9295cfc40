//! Core game logic module for Snake
//!
//! Everything here is pure state and rules with no I/O or rendering, so the
//! engine can be driven synchronously from tests as well as from the
//! terminal front-end.

pub mod action;
pub mod config;
pub mod engine;
pub mod grid;
pub mod state;

// Re-export commonly used types
pub use action::{Action, Direction};
pub use config::{ConfigError, GameConfig};
pub use engine::{GameEngine, TickInfo};
pub use state::{CollisionType, Controls, Coordinate, GameState, Phase, Snake};
