use std::time::{Duration, Instant};

use crate::game::Phase;

/// Per-session play statistics. Nothing here outlives the process.
pub struct GameMetrics {
    /// Set while the current game is running
    running_since: Option<Instant>,
    /// Running time banked before the last pause
    banked: Duration,
    pub elapsed_time: Duration,
    pub best_score: u32,
    pub games_played: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            running_since: None,
            banked: Duration::ZERO,
            elapsed_time: Duration::ZERO,
            best_score: 0,
            games_played: 0,
        }
    }

    /// Advance the play clock; it only counts while `phase` is Running
    pub fn update(&mut self, phase: Phase) {
        match (phase, self.running_since) {
            (Phase::Running, None) => self.running_since = Some(Instant::now()),
            (Phase::Running, Some(_)) => {}
            (_, Some(since)) => {
                self.banked += since.elapsed();
                self.running_since = None;
            }
            (_, None) => {}
        }

        self.elapsed_time = self.banked
            + self
                .running_since
                .map(|since| since.elapsed())
                .unwrap_or_default();
    }

    pub fn on_game_start(&mut self) {
        self.running_since = None;
        self.banked = Duration::ZERO;
        self.elapsed_time = Duration::ZERO;
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.games_played += 1;
        if final_score > self.best_score {
            self.best_score = final_score;
        }
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
