use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info};

use crate::game::{Action, GameEngine};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// Interactive terminal session: keyboard in, one frame out per change.
pub struct PlayMode {
    engine: GameEngine,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl PlayMode {
    pub fn new(engine: GameEngine) -> Self {
        Self {
            engine,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        info!(
            games_played = self.metrics.games_played,
            best_score = self.metrics.best_score,
            "session ended"
        );
        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Fixed delay between ticks; a late tick pushes the next one back
        // instead of bursting to catch up
        let mut tick_timer = interval(self.engine.config().tick_delay());
        tick_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        self.draw(terminal)?;

        loop {
            let redraw = tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => return Err(err).context("Failed to read terminal event"),
                        None => {
                            self.should_quit = true;
                            false
                        }
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => self.update_game(),

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                    false
                }
            };

            if self.should_quit {
                break;
            }

            if redraw {
                self.draw(terminal)?;
            }
        }

        Ok(())
    }

    /// Returns true when the event changed something on screen
    fn handle_event(&mut self, event: Event) -> bool {
        match event {
            // Only process key press events, not release
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                let key_action = self.input_handler.handle_key_event(key);
                if key_action == KeyAction::Quit {
                    self.should_quit = true;
                    return false;
                }

                let Some(action) = key_action.to_action(self.engine.controls()) else {
                    return false;
                };

                let changed = self.engine.apply(action);
                if changed && action == Action::Reset {
                    self.metrics.on_game_start();
                }
                self.metrics.update(self.engine.phase());
                changed
            }
            Event::Resize(_, _) => true,
            _ => false,
        }
    }

    /// Runs one tick if the game is running; true when a tick ran
    fn update_game(&mut self) -> bool {
        let Some(info) = self.engine.tick() else {
            return false;
        };

        if info.ate_food {
            debug!(score = self.engine.score(), "food eaten");
        }

        self.metrics.update(self.engine.phase());
        if self.engine.state().is_over() {
            self.metrics.on_game_over(self.engine.score());
        }

        true
    }

    fn draw(&mut self, terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
        self.metrics.update(self.engine.phase());

        let (engine, metrics, renderer) = (&self.engine, &self.metrics, &self.renderer);
        terminal
            .draw(|frame| renderer.render(frame, engine.state(), engine.config(), metrics))
            .context("Failed to draw frame")?;
        Ok(())
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
