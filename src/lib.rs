//! Grid Snake - a single-player snake game on a pixel grid
//!
//! This library provides:
//! - Core game logic (game module): board geometry and the tick engine
//! - Keyboard mapping (input module)
//! - TUI rendering (render module)
//! - Session statistics (metrics module)
//! - The interactive driver loop (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
