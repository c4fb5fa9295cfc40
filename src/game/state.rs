use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::action::Direction;
use super::config::{GameConfig, INITIAL_SNAKE_LENGTH, START_CELL};

/// Top-left corner of a cell, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move coordinate by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn is_aligned(&self, cell_size: i32) -> bool {
        self.x % cell_size == 0 && self.y % cell_size == 0
    }
}

impl From<(i32, i32)> for Coordinate {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// The snake's body, head first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    body: VecDeque<Coordinate>,
}

impl Snake {
    /// Lay out `length` segments in a straight line trailing behind `head`
    pub fn new(head: Coordinate, direction: Direction, length: usize, cell_size: i32) -> Self {
        let (dx, dy) = direction.delta();
        let (back_dx, back_dy) = (-dx * cell_size, -dy * cell_size);

        let mut body = VecDeque::with_capacity(length);
        let mut segment = head;
        for _ in 0..length.max(1) {
            body.push_back(segment);
            segment = segment.moved_by(back_dx, back_dy);
        }

        Self { body }
    }

    /// Build a snake from explicit segments. Returns `None` for an empty list.
    pub fn from_segments(segments: impl IntoIterator<Item = Coordinate>) -> Option<Self> {
        let body: VecDeque<Coordinate> = segments.into_iter().collect();
        if body.is_empty() {
            None
        } else {
            Some(Self { body })
        }
    }

    pub fn head(&self) -> Coordinate {
        self.body[0]
    }

    /// All segments after the head
    pub fn body_segments(&self) -> impl Iterator<Item = &Coordinate> {
        self.body.iter().skip(1)
    }

    pub fn segments(&self) -> impl Iterator<Item = &Coordinate> {
        self.body.iter()
    }

    pub fn contains(&self, coordinate: Coordinate) -> bool {
        self.body.contains(&coordinate)
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false; a snake keeps at least its head
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub(crate) fn push_head(&mut self, head: Coordinate) {
        self.body.push_front(head);
    }

    /// Drop the last segment unless it is the only one left
    pub(crate) fn drop_tail(&mut self) {
        if self.body.len() > 1 {
            self.body.pop_back();
        }
    }
}

/// Lifecycle of a single game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Ready,
    Running,
    Paused,
    GameOver,
}

/// Which front-end buttons are usable in a phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub play: bool,
    pub continue_game: bool,
    pub new_game: bool,
}

impl Phase {
    pub fn controls(self) -> Controls {
        match self {
            Phase::Ready => Controls {
                play: true,
                continue_game: false,
                new_game: false,
            },
            Phase::Running | Phase::Paused => Controls {
                play: false,
                continue_game: true,
                new_game: true,
            },
            Phase::GameOver => Controls {
                play: true,
                continue_game: false,
                new_game: true,
            },
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Ready => "Ready",
            Phase::Running => "Running",
            Phase::Paused => "Paused",
            Phase::GameOver => "Game Over",
        }
    }
}

/// Why a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionType {
    /// Head left the board
    Wall,
    /// Head ran into the body
    SelfCollision,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Coordinate,
    /// Direction used by the last tick
    pub direction: Direction,
    /// Direction the next tick will commit
    pub pending_direction: Direction,
    pub score: u32,
    pub ticks: u32,
    pub phase: Phase,
    /// Set once the game is over
    pub collision: Option<CollisionType>,
}

impl GameState {
    /// Create a new game state
    pub fn new(snake: Snake, food: Coordinate, direction: Direction) -> Self {
        Self {
            snake,
            food,
            direction,
            pending_direction: direction,
            score: 0,
            ticks: 0,
            phase: Phase::Ready,
            collision: None,
        }
    }

    /// The snake every game starts with: three segments heading right from
    /// cell (5, 5)
    pub fn starting_snake(config: &GameConfig) -> Snake {
        let head = Coordinate::new(START_CELL * config.cell_size, START_CELL * config.cell_size);
        Snake::new(head, Direction::Right, INITIAL_SNAKE_LENGTH, config.cell_size)
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }
}
