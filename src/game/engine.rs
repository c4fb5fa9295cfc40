use std::collections::HashSet;

use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, info, trace};

use super::{
    action::{Action, Direction},
    config::{ConfigError, GameConfig},
    grid,
    state::{CollisionType, Controls, Coordinate, GameState, Phase},
};

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickInfo {
    /// Whether the snake ate food this tick
    pub ate_food: bool,
    /// Set when this tick ended the game
    pub collision: Option<CollisionType>,
}

/// Owns the game state and advances it one tick at a time.
///
/// The engine never schedules itself: a driver calls [`GameEngine::tick`]
/// every `tick_delay` while the phase is [`Phase::Running`] and stops once
/// it turns into [`Phase::GameOver`]. Commands that arrive in a phase where
/// they make no sense are ignored and report `false`.
pub struct GameEngine {
    config: GameConfig,
    state: GameState,
    rng: StdRng,
}

impl GameEngine {
    /// Create an engine with entropy-seeded food placement
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::from_rng(config, StdRng::from_entropy())
    }

    /// Create an engine whose food placement is reproducible
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::from_rng(config, StdRng::seed_from_u64(seed))
    }

    fn from_rng(config: GameConfig, mut rng: StdRng) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = Self::fresh_state(&config, &mut rng);
        debug!(
            width = config.width,
            height = config.height,
            cell_size = config.cell_size,
            "engine created"
        );
        Ok(Self { config, state, rng })
    }

    fn fresh_state(config: &GameConfig, rng: &mut StdRng) -> GameState {
        let snake = GameState::starting_snake(config);
        let occupied: HashSet<Coordinate> = snake.segments().copied().collect();
        let food = grid::place_food(
            &occupied,
            config.width,
            config.height,
            config.cell_size,
            rng,
        );
        GameState::new(snake, food, Direction::Right)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    /// Button enablement for the current phase
    pub fn controls(&self) -> Controls {
        self.state.phase.controls()
    }

    /// Ready -> Running. A finished game stays finished until `reset`.
    pub fn start(&mut self) -> bool {
        match self.state.phase {
            Phase::Ready => {
                self.state.phase = Phase::Running;
                debug!("game started");
                true
            }
            Phase::GameOver => {
                trace!(score = self.state.score, "start ignored, game is over");
                false
            }
            phase => {
                trace!(?phase, "start ignored");
                false
            }
        }
    }

    /// Running -> Paused
    pub fn pause(&mut self) -> bool {
        if self.state.phase != Phase::Running {
            trace!(phase = ?self.state.phase, "pause ignored");
            return false;
        }
        self.state.phase = Phase::Paused;
        debug!(ticks = self.state.ticks, "game paused");
        true
    }

    /// Paused -> Running
    pub fn resume(&mut self) -> bool {
        if self.state.phase != Phase::Paused {
            trace!(phase = ?self.state.phase, "resume ignored");
            return false;
        }
        self.state.phase = Phase::Running;
        debug!(ticks = self.state.ticks, "game resumed");
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        match self.state.phase {
            Phase::Running => self.pause(),
            Phase::Paused => self.resume(),
            _ => false,
        }
    }

    /// Replace the whole state with a fresh game, whatever the phase
    pub fn reset(&mut self) -> bool {
        self.state = Self::fresh_state(&self.config, &mut self.rng);
        debug!(food = ?self.state.food, "game reset");
        true
    }

    /// Queue a direction for the next tick. The last accepted call before a
    /// tick wins; a reversal of the committed direction is dropped.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.state.phase == Phase::GameOver {
            trace!(?direction, "turn ignored, game is over");
            return false;
        }
        if direction.is_opposite(self.state.direction) {
            trace!(?direction, current = ?self.state.direction, "reversal ignored");
            return false;
        }
        let changed = self.state.pending_direction != direction;
        self.state.pending_direction = direction;
        changed
    }

    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::Turn(direction) => self.set_direction(direction),
            Action::Start => self.start(),
            Action::Pause => self.pause(),
            Action::Resume => self.resume(),
            Action::TogglePause => self.toggle_pause(),
            Action::Reset => self.reset(),
        }
    }

    /// Advance the game by one cell. Returns `None` unless the game is
    /// running.
    pub fn tick(&mut self) -> Option<TickInfo> {
        if self.state.phase != Phase::Running {
            return None;
        }

        let GameConfig {
            width,
            height,
            cell_size,
            ..
        } = self.config;
        let state = &mut self.state;

        state.direction = state.pending_direction;
        let new_head = grid::next_head(state.snake.head(), state.direction, cell_size);
        state.snake.push_head(new_head);

        let ate_food = new_head == state.food;
        if ate_food {
            state.score += 1;
            let occupied: HashSet<Coordinate> = state.snake.segments().copied().collect();
            if occupied.len() as u64 >= self.config.cell_count() {
                state.ticks += 1;
                state.phase = Phase::GameOver;
                info!(score = state.score, "board filled");
                return Some(TickInfo {
                    ate_food,
                    collision: None,
                });
            }
            state.food = grid::place_food(&occupied, width, height, cell_size, &mut self.rng);
        } else {
            state.snake.drop_tail();
        }
        state.ticks += 1;

        // Checked after the tail moved, so the head may take the cell the
        // tail just left.
        let collision = if grid::is_out_of_bounds(new_head, width, height) {
            Some(CollisionType::Wall)
        } else if grid::is_self_collision(new_head, state.snake.body_segments()) {
            Some(CollisionType::SelfCollision)
        } else {
            None
        };

        if let Some(collision) = collision {
            state.phase = Phase::GameOver;
            state.collision = Some(collision);
            info!(
                score = state.score,
                ticks = state.ticks,
                ?collision,
                head = ?new_head,
                "game over"
            );
        }

        Some(TickInfo {
            ate_food,
            collision,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::Snake;
    use rand::Rng;

    fn segments(engine: &GameEngine) -> Vec<(i32, i32)> {
        engine
            .state()
            .snake
            .segments()
            .map(|c| (c.x, c.y))
            .collect()
    }

    /// Running engine on the default 400x400 board with a hand-placed snake
    fn engine_with(body: &[(i32, i32)], direction: Direction, food: (i32, i32)) -> GameEngine {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 1).unwrap();
        let snake = Snake::from_segments(body.iter().map(|&c| Coordinate::from(c))).unwrap();
        engine.state = GameState::new(snake, food.into(), direction);
        assert!(engine.start());
        engine
    }

    #[test]
    fn test_new_engine_is_ready() {
        let engine = GameEngine::with_seed(GameConfig::default(), 3).unwrap();
        let state = engine.state();

        assert_eq!(engine.phase(), Phase::Ready);
        assert_eq!(engine.score(), 0);
        assert_eq!(state.direction, Direction::Right);
        assert_eq!(segments(&engine), vec![(100, 100), (80, 100), (60, 100)]);
        assert!(!state.snake.contains(state.food));
        assert!(state.food.is_aligned(20));
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let config = GameConfig {
            width: 410,
            ..GameConfig::default()
        };
        assert!(matches!(
            GameEngine::new(config),
            Err(ConfigError::Misaligned { .. })
        ));
    }

    #[test]
    fn test_tick_outside_running_is_noop() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 3).unwrap();
        let before = engine.state().clone();

        assert_eq!(engine.tick(), None);
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = engine_with(&[(100, 100), (80, 100), (60, 100)], Direction::Right, (300, 300));

        let info = engine.tick().unwrap();

        assert_eq!(
            info,
            TickInfo {
                ate_food: false,
                collision: None
            }
        );
        assert_eq!(segments(&engine), vec![(120, 100), (100, 100), (80, 100)]);
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.phase(), Phase::Running);
        assert_eq!(engine.state().ticks, 1);
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = engine_with(&[(100, 100), (80, 100), (60, 100)], Direction::Right, (120, 100));

        let info = engine.tick().unwrap();

        assert!(info.ate_food);
        assert_eq!(engine.score(), 1);
        assert_eq!(
            segments(&engine),
            vec![(120, 100), (100, 100), (80, 100), (60, 100)]
        );
        let state = engine.state();
        assert!(!state.snake.contains(state.food));
        assert!(state.food.is_aligned(20));
        assert_eq!(engine.phase(), Phase::Running);
    }

    #[test]
    fn test_wall_collision() {
        let mut engine = engine_with(&[(380, 100), (360, 100), (340, 100)], Direction::Right, (0, 0));

        let info = engine.tick().unwrap();

        assert_eq!(info.collision, Some(CollisionType::Wall));
        assert_eq!(engine.phase(), Phase::GameOver);
        assert_eq!(engine.state().collision, Some(CollisionType::Wall));
        // the fatal move stays visible for the last frame
        assert_eq!(segments(&engine), vec![(400, 100), (380, 100), (360, 100)]);
    }

    #[test]
    fn test_wall_collision_top_edge() {
        let mut engine = engine_with(&[(100, 0), (100, 20), (100, 40)], Direction::Up, (0, 0));

        engine.tick();

        assert_eq!(engine.phase(), Phase::GameOver);
        assert_eq!(engine.state().snake.head(), Coordinate::new(100, -20));
    }

    #[test]
    fn test_self_collision() {
        // Head at (40,20) came up from (40,40); turning left lands on (20,20)
        let mut engine = engine_with(
            &[(40, 20), (40, 40), (20, 40), (20, 20), (20, 0)],
            Direction::Up,
            (300, 300),
        );
        engine.set_direction(Direction::Left);

        let info = engine.tick().unwrap();

        assert_eq!(info.collision, Some(CollisionType::SelfCollision));
        assert_eq!(engine.phase(), Phase::GameOver);
        assert_eq!(engine.state().snake.head(), Coordinate::new(20, 20));
    }

    #[test]
    fn test_head_may_enter_vacated_tail_cell() {
        // A tight 2x2 loop: the head chases the tail into (20,20)
        let mut engine = engine_with(&[(40, 20), (40, 40), (20, 40), (20, 20)], Direction::Up, (300, 300));
        engine.set_direction(Direction::Left);

        let info = engine.tick().unwrap();

        assert_eq!(info.collision, None);
        assert_eq!(engine.phase(), Phase::Running);
        assert_eq!(segments(&engine), vec![(20, 20), (40, 20), (40, 40), (20, 40)]);
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let mut engine = engine_with(&[(100, 100), (80, 100), (60, 100)], Direction::Right, (300, 300));

        assert!(!engine.set_direction(Direction::Left));
        engine.tick();

        assert_eq!(engine.state().direction, Direction::Right);
        assert_eq!(engine.state().snake.head(), Coordinate::new(120, 100));
    }

    #[test]
    fn test_last_direction_wins() {
        let mut engine = engine_with(&[(100, 100), (80, 100), (60, 100)], Direction::Right, (300, 300));

        assert!(engine.set_direction(Direction::Up));
        // checked against the committed direction, not the pending one
        assert!(engine.set_direction(Direction::Down));
        assert!(!engine.set_direction(Direction::Left));
        engine.tick();

        assert_eq!(engine.state().direction, Direction::Down);
        assert_eq!(engine.state().snake.head(), Coordinate::new(100, 120));
    }

    #[test]
    fn test_pause_and_resume() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 5).unwrap();

        assert!(!engine.pause());
        assert!(!engine.resume());
        assert!(engine.start());
        assert!(!engine.start());
        assert!(!engine.resume());

        assert!(engine.pause());
        assert_eq!(engine.phase(), Phase::Paused);
        let before = engine.state().clone();
        assert_eq!(engine.tick(), None);
        assert_eq!(engine.state(), &before);

        assert!(engine.resume());
        assert_eq!(engine.phase(), Phase::Running);
        assert!(engine.tick().is_some());
    }

    #[test]
    fn test_toggle_pause() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 5).unwrap();
        assert!(!engine.toggle_pause());

        engine.start();
        assert!(engine.toggle_pause());
        assert_eq!(engine.phase(), Phase::Paused);
        assert!(engine.toggle_pause());
        assert_eq!(engine.phase(), Phase::Running);
    }

    #[test]
    fn test_turn_while_paused_applies_on_resume() {
        let mut engine = engine_with(&[(100, 100), (80, 100), (60, 100)], Direction::Right, (300, 300));
        engine.pause();

        assert!(engine.set_direction(Direction::Down));
        engine.resume();
        engine.tick();

        assert_eq!(engine.state().snake.head(), Coordinate::new(100, 120));
    }

    #[test]
    fn test_game_over_is_terminal() {
        let mut engine = engine_with(&[(380, 100), (360, 100), (340, 100)], Direction::Right, (0, 0));
        engine.tick();
        let finished = engine.state().clone();

        assert_eq!(engine.tick(), None);
        assert!(!engine.start());
        assert!(!engine.pause());
        assert!(!engine.resume());
        assert!(!engine.set_direction(Direction::Up));
        assert_eq!(engine.state(), &finished);
        assert_eq!(engine.controls(), Phase::GameOver.controls());
    }

    #[test]
    fn test_reset_from_game_over() {
        let mut engine = engine_with(&[(380, 100), (360, 100), (340, 100)], Direction::Right, (380, 120));
        engine.state.score = 7;
        engine.tick();
        assert_eq!(engine.phase(), Phase::GameOver);

        assert!(engine.reset());

        let state = engine.state();
        assert_eq!(state.phase, Phase::Ready);
        assert_eq!(state.score, 0);
        assert_eq!(state.ticks, 0);
        assert_eq!(state.collision, None);
        assert_eq!(state.direction, Direction::Right);
        assert_eq!(segments(&engine), vec![(100, 100), (80, 100), (60, 100)]);
        assert!(!engine.state().snake.contains(engine.state().food));
    }

    #[test]
    fn test_apply_dispatches_actions() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 9).unwrap();

        assert!(engine.apply(Action::Start));
        assert!(engine.apply(Action::Turn(Direction::Down)));
        assert!(engine.apply(Action::Pause));
        assert!(engine.apply(Action::Resume));
        assert!(engine.apply(Action::TogglePause));
        assert!(engine.apply(Action::Reset));
        assert_eq!(engine.phase(), Phase::Ready);
    }

    #[test]
    fn test_filling_the_board_ends_the_game() {
        let config = GameConfig::new(120, 120, 20, 100).unwrap();
        let mut engine = GameEngine::with_seed(config, 1).unwrap();

        // Boustrophedon path over the 6x6 board starting at (0,0)
        let mut path = Vec::new();
        for row in 0..6 {
            let cols: Vec<i32> = if row % 2 == 0 {
                (0..6).collect()
            } else {
                (0..6).rev().collect()
            };
            for col in cols {
                path.push(Coordinate::new(col * 20, row * 20));
            }
        }
        let food = path[0];
        let snake = Snake::from_segments(path[1..].iter().copied()).unwrap();
        engine.state = GameState::new(snake, food, Direction::Left);
        engine.start();

        let info = engine.tick().unwrap();

        assert!(info.ate_food);
        assert_eq!(info.collision, None);
        assert_eq!(engine.phase(), Phase::GameOver);
        assert_eq!(engine.state().snake.len(), 36);
    }

    #[test]
    fn test_eating_on_huge_board_keeps_running() {
        let config = GameConfig::new(65536, 65536, 1, 100).unwrap();
        let mut engine = GameEngine::with_seed(config, 2).unwrap();
        let snake = Snake::from_segments([
            Coordinate::new(10, 10),
            Coordinate::new(9, 10),
            Coordinate::new(8, 10),
        ])
        .unwrap();
        engine.state = GameState::new(snake, Coordinate::new(11, 10), Direction::Right);
        engine.start();

        let info = engine.tick().unwrap();

        assert!(info.ate_food);
        assert_eq!(info.collision, None);
        assert_eq!(engine.phase(), Phase::Running);
        assert_eq!(engine.score(), 1);
        assert_eq!(engine.state().snake.len(), 4);
        assert!(!engine.state().snake.contains(engine.state().food));
    }

    #[test]
    fn test_random_play_keeps_invariants() {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 11).unwrap();
        let mut rng = StdRng::seed_from_u64(12);
        let directions = [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ];
        engine.start();

        for _ in 0..2_000 {
            if engine.phase() == Phase::GameOver {
                engine.reset();
                engine.start();
            }
            if rng.gen_bool(0.3) {
                engine.set_direction(directions[rng.gen_range(0..4)]);
            }

            let len_before = engine.state().snake.len();
            let info = engine.tick().unwrap();
            let state = engine.state();

            let expected = if info.ate_food { len_before + 1 } else { len_before };
            assert_eq!(state.snake.len(), expected);
            assert!(state.snake.segments().all(|c| c.is_aligned(20)));
            assert!(state.food.is_aligned(20));
            if info.ate_food {
                assert!(!state.snake.contains(state.food));
            }
        }
    }
}
