use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::game::{Coordinate, GameConfig, GameState, Phase};
use crate::metrics::GameMetrics;

/// Cell (column, row) holding a pixel coordinate
pub fn cell_of(coordinate: Coordinate, cell_size: i32) -> (i32, i32) {
    (
        coordinate.x.div_euclid(cell_size),
        coordinate.y.div_euclid(cell_size),
    )
}

pub fn game_over_message(score: u32) -> String {
    format!("Game Over! Score: {}", score)
}

/// Draws a complete frame from the current state. Reads only; the engine is
/// never touched from here.
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        state: &GameState,
        config: &GameConfig,
        metrics: &GameMetrics,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Board
                Constraint::Length(3), // Buttons
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(state, metrics), chunks[0]);

        // Center the board horizontally
        let board_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        frame.render_widget(self.render_board(state, config), board_area);

        if state.phase == Phase::GameOver {
            let message = game_over_message(state.score);
            let overlay = centered_rect(message.chars().count() as u16 + 4, 3, board_area);
            frame.render_widget(Clear, overlay);
            frame.render_widget(self.render_game_over(message), overlay);
        }

        frame.render_widget(self.render_controls(state.phase), chunks[2]);
    }

    fn render_board(&self, state: &GameState, config: &GameConfig) -> Paragraph<'static> {
        let head = cell_of(state.snake.head(), config.cell_size);
        let food = cell_of(state.food, config.cell_size);
        let body: Vec<(i32, i32)> = state
            .snake
            .body_segments()
            .map(|segment| cell_of(*segment, config.cell_size))
            .collect();

        let mut lines = Vec::with_capacity(config.rows() as usize);
        for row in 0..config.rows() {
            let mut spans = Vec::with_capacity(config.columns() as usize);

            for column in 0..config.columns() {
                let cell = (column, row);

                let span = if cell == head {
                    Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if body.contains(&cell) {
                    Span::styled("□ ", Style::default().fg(Color::Green))
                } else if cell == food {
                    Span::styled(
                        "● ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(span);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Snake "),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, state: &GameState, metrics: &GameMetrics) -> Paragraph<'static> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let text = vec![Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(state.score.to_string(), value.add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(metrics.best_score.max(state.score).to_string(), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), value),
            Span::raw("    "),
            Span::styled(state.phase.label(), phase_style(state.phase)),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_game_over(&self, message: String) -> Paragraph<'static> {
        Paragraph::new(Line::from(Span::styled(
            message,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, phase: Phase) -> Paragraph<'static> {
        let controls = phase.controls();
        let continue_label = if phase == Phase::Paused {
            " Continue "
        } else {
            " Pause "
        };

        let mut spans = Vec::new();
        for (key, label, enabled) in [
            ("P", " Play ", controls.play),
            ("Space", continue_label, controls.continue_game),
            ("N", " New Game ", controls.new_game),
            ("Q", " Quit ", true),
        ] {
            spans.extend(button(key, label, enabled));
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled("↑↓←→", Style::default().fg(Color::Cyan)));
        spans.push(Span::raw(" or "));
        spans.push(Span::styled("WASD", Style::default().fg(Color::Cyan)));
        spans.push(Span::raw(" to move"));

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn button(key: &'static str, label: &'static str, enabled: bool) -> [Span<'static>; 2] {
    if enabled {
        [
            Span::styled(
                format!("[{}]", key),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(label, Style::default().fg(Color::White)),
        ]
    } else {
        let dim = Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::DIM);
        [
            Span::styled(format!("[{}]", key), dim),
            Span::styled(label, dim),
        ]
    }
}

fn phase_style(phase: Phase) -> Style {
    let color = match phase {
        Phase::Ready => Color::Cyan,
        Phase::Running => Color::Green,
        Phase::Paused => Color::Yellow,
        Phase::GameOver => Color::Red,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
