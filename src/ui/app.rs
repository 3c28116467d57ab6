//! Application loop and keyboard handling

use std::io;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{backend::Backend, Terminal};

use crate::board::Pos;

use super::board_view;
use super::game_state::GameSession;

/// What the keyboard currently controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Cursor movement and stone placement.
    Game,
    /// Typing a chat message.
    Chat,
}

pub struct App {
    pub(crate) session: GameSession,
    pub(crate) cursor: Pos,
    pub(crate) input_mode: InputMode,
    pub(crate) chat_input: String,
    pub(crate) show_help: bool,
    pub(crate) message: Option<String>,
    pub(crate) thinking: bool,
    should_quit: bool,
}

impl App {
    #[must_use]
    pub fn new(session: GameSession) -> Self {
        let cursor = session.board.center();
        Self {
            session,
            cursor,
            input_mode: InputMode::Game,
            chat_input: String::new(),
            show_help: false,
            message: None,
            thinking: false,
            should_quit: false,
        }
    }

    /// Main application loop.
    ///
    /// The AI reply is computed synchronously between frames: the board
    /// is drawn with a thinking notice, the engine (or provider) runs to
    /// completion on this thread, and the next frame shows the move.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|frame| board_view::render(frame, self))?;

            if self.should_quit {
                break;
            }

            if !self.session.is_over() && !self.session.is_human_turn() {
                self.thinking = true;
                terminal.draw(|frame| board_view::render(frame, self))?;
                self.session.ai_turn();
                self.thinking = false;
                continue;
            }

            self.handle_events()?;
        }
        Ok(())
    }

    fn handle_events(&mut self) -> io::Result<()> {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                self.handle_key(key);
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.show_help {
            // Any key closes the help overlay
            self.show_help = false;
            return;
        }

        match self.input_mode {
            InputMode::Game => self.handle_game_key(key),
            InputMode::Chat => self.handle_chat_key(key),
        }
    }

    fn handle_game_key(&mut self, key: KeyEvent) {
        self.message = None;

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.session.reset();
                self.cursor = self.session.board.center();
                self.message = Some("New game started".to_string());
            }
            KeyCode::Char('h') | KeyCode::Char('H') => {
                self.show_help = true;
            }
            KeyCode::Char('c') | KeyCode::Char('C') | KeyCode::Char('/') => {
                self.input_mode = InputMode::Chat;
            }
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => self.move_cursor(-1, 0),
            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => self.move_cursor(1, 0),
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => self.move_cursor(0, -1),
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => self.move_cursor(0, 1),
            KeyCode::Enter | KeyCode::Char(' ') => self.place_stone(),
            _ => {}
        }
    }

    fn handle_chat_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Game;
                self.chat_input.clear();
            }
            KeyCode::Enter => {
                let message = self.chat_input.trim().to_string();
                self.chat_input.clear();
                if !message.is_empty() {
                    // Synchronous request; the reply shows on the next frame
                    self.session.send_chat(message);
                }
            }
            KeyCode::Backspace => {
                self.chat_input.pop();
            }
            KeyCode::Char(c) => {
                self.chat_input.push(c);
            }
            _ => {}
        }
    }

    fn move_cursor(&mut self, dr: i32, dc: i32) {
        let size = self.session.board.size() as i32;
        let row = (i32::from(self.cursor.row) + dr).clamp(0, size - 1);
        let col = (i32::from(self.cursor.col) + dc).clamp(0, size - 1);
        self.cursor = Pos::new(row as u8, col as u8);
    }

    fn place_stone(&mut self) {
        if self.session.is_over() {
            self.message = Some("Game over - press 'r' for a new game".to_string());
            return;
        }

        if self.session.try_place(self.cursor).is_err() {
            self.message = Some("That cell is taken".to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameSettings;
    use crate::engine::Difficulty;

    fn app() -> App {
        App::new(GameSession::new(
            Difficulty::Easy,
            GameSettings::default(),
            None,
            false,
            None,
        ))
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::from(code));
    }

    #[test]
    fn test_cursor_starts_at_center() {
        let app = app();
        assert_eq!(app.cursor, Pos::new(12, 12));
    }

    #[test]
    fn test_cursor_movement_and_clamping() {
        let mut app = app();
        press(&mut app, KeyCode::Up);
        assert_eq!(app.cursor, Pos::new(11, 12));
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.cursor, Pos::new(11, 13));

        for _ in 0..40 {
            press(&mut app, KeyCode::Left);
        }
        assert_eq!(app.cursor.col, 0);
    }

    #[test]
    fn test_enter_places_stone() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.session.board.stone_count(), 1);
        assert!(!app.session.is_human_turn());
    }

    #[test]
    fn test_placing_on_taken_cell_sets_message() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        app.session.ai_turn();

        press(&mut app, KeyCode::Enter);
        assert!(app.message.is_some());
    }

    #[test]
    fn test_chat_mode_editing() {
        let mut app = app();
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.input_mode, InputMode::Chat);

        for c in "hi!".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.chat_input, "hi");

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.input_mode, InputMode::Game);
        assert!(app.chat_input.is_empty());
    }

    #[test]
    fn test_chat_enter_sends_message() {
        let mut app = app();
        press(&mut app, KeyCode::Char('c'));
        for c in "hello".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);

        // User message plus the no-service hint
        assert_eq!(app.session.chat.messages().len(), 2);
        assert!(app.chat_input.is_empty());
    }

    #[test]
    fn test_help_overlay_closes_on_any_key() {
        let mut app = app();
        press(&mut app, KeyCode::Char('h'));
        assert!(app.show_help);
        press(&mut app, KeyCode::Char('x'));
        assert!(!app.show_help);
        // The closing key is swallowed, not interpreted
        assert_eq!(app.session.board.stone_count(), 0);
    }

    #[test]
    fn test_restart_resets_board_and_cursor() {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        app.session.ai_turn();
        press(&mut app, KeyCode::Up);

        press(&mut app, KeyCode::Char('r'));
        assert!(app.session.board.is_board_empty());
        assert_eq!(app.cursor, Pos::new(12, 12));
    }
}
