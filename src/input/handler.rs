use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Action, Controls, Direction};

/// What a key press asks for, before phase checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Turn(Direction),
    /// "Play" button
    Play,
    /// "Continue" button: pause or resume
    Continue,
    /// "New Game" button
    NewGame,
    Quit,
    None,
}

impl KeyAction {
    /// The engine command for this key, or `None` if the key is not a game
    /// command or its button is disabled under `controls`.
    pub fn to_action(self, controls: Controls) -> Option<Action> {
        match self {
            KeyAction::Turn(direction) => Some(Action::Turn(direction)),
            KeyAction::Play if controls.play => Some(Action::Start),
            KeyAction::Continue if controls.continue_game => Some(Action::TogglePause),
            KeyAction::NewGame if controls.new_game => Some(Action::Reset),
            _ => None,
        }
    }
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => KeyAction::Turn(Direction::Up),
            KeyCode::Down => KeyAction::Turn(Direction::Down),
            KeyCode::Left => KeyAction::Turn(Direction::Left),
            KeyCode::Right => KeyAction::Turn(Direction::Right),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => KeyAction::Turn(Direction::Up),
            KeyCode::Char('s') | KeyCode::Char('S') => KeyAction::Turn(Direction::Down),
            KeyCode::Char('a') | KeyCode::Char('A') => KeyAction::Turn(Direction::Left),
            KeyCode::Char('d') | KeyCode::Char('D') => KeyAction::Turn(Direction::Right),

            // Buttons
            KeyCode::Enter | KeyCode::Char('p') | KeyCode::Char('P') => KeyAction::Play,
            KeyCode::Char(' ') | KeyCode::Char('c') | KeyCode::Char('C') => KeyAction::Continue,
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Char('r') | KeyCode::Char('R') => {
                KeyAction::NewGame
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,

            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Phase;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_arrow_keys() {
        let handler = InputHandler::new();

        assert_eq!(handler.handle_key_event(press(KeyCode::Up)), KeyAction::Turn(Direction::Up));
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Down)),
            KeyAction::Turn(Direction::Down)
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Left)),
            KeyAction::Turn(Direction::Left)
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Right)),
            KeyAction::Turn(Direction::Right)
        );
    }

    #[test]
    fn test_wasd_keys() {
        let handler = InputHandler::new();

        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('w'))),
            KeyAction::Turn(Direction::Up)
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('a'))),
            KeyAction::Turn(Direction::Left)
        );
        assert_eq!(
            handler.handle_key_event(press(KeyCode::Char('s'))),
            KeyAction::Turn(Direction::Down)
        );

        let d_upper = KeyEvent::new(KeyCode::Char('D'), KeyModifiers::SHIFT);
        assert_eq!(handler.handle_key_event(d_upper), KeyAction::Turn(Direction::Right));
    }

    #[test]
    fn test_button_keys() {
        let handler = InputHandler::new();

        assert_eq!(handler.handle_key_event(press(KeyCode::Enter)), KeyAction::Play);
        assert_eq!(handler.handle_key_event(press(KeyCode::Char('p'))), KeyAction::Play);
        assert_eq!(handler.handle_key_event(press(KeyCode::Char(' '))), KeyAction::Continue);
        assert_eq!(handler.handle_key_event(press(KeyCode::Char('n'))), KeyAction::NewGame);
        assert_eq!(handler.handle_key_event(press(KeyCode::Char('r'))), KeyAction::NewGame);
    }

    #[test]
    fn test_quit_keys() {
        let handler = InputHandler::new();

        assert_eq!(handler.handle_key_event(press(KeyCode::Char('q'))), KeyAction::Quit);
        assert_eq!(handler.handle_key_event(press(KeyCode::Esc)), KeyAction::Quit);

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handler.handle_key_event(ctrl_c), KeyAction::Quit);
    }

    #[test]
    fn test_unknown_key() {
        let handler = InputHandler::new();
        assert_eq!(handler.handle_key_event(press(KeyCode::Char('x'))), KeyAction::None);
    }

    #[test]
    fn test_disabled_buttons_are_dropped() {
        let ready = Phase::Ready.controls();
        assert_eq!(KeyAction::Play.to_action(ready), Some(Action::Start));
        assert_eq!(KeyAction::Continue.to_action(ready), None);
        assert_eq!(KeyAction::NewGame.to_action(ready), None);

        let running = Phase::Running.controls();
        assert_eq!(KeyAction::Play.to_action(running), None);
        assert_eq!(KeyAction::Continue.to_action(running), Some(Action::TogglePause));
        assert_eq!(KeyAction::NewGame.to_action(running), Some(Action::Reset));

        let over = Phase::GameOver.controls();
        assert_eq!(KeyAction::Play.to_action(over), Some(Action::Start));
        assert_eq!(KeyAction::Continue.to_action(over), None);
        assert_eq!(KeyAction::NewGame.to_action(over), Some(Action::Reset));
    }

    #[test]
    fn test_turns_and_quit_ignore_controls() {
        let over = Phase::GameOver.controls();
        assert_eq!(
            KeyAction::Turn(Direction::Up).to_action(over),
            Some(Action::Turn(Direction::Up))
        );
        assert_eq!(KeyAction::Quit.to_action(over), None);
        assert_eq!(KeyAction::None.to_action(over), None);
    }
}
