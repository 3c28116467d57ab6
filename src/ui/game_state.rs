//! Game session state: board, turn flow, AI integration and chat

use crate::board::{Board, GameOutcome, Pos, Stone};
use crate::chat::ChatLog;
use crate::config::GameSettings;
use crate::engine::{Difficulty, Engine};
use crate::error::GameError;
use crate::provider::{AiProvider, ChatRequest, MoveRequest};

/// The human always plays Black (and moves first).
pub const HUMAN: Stone = Stone::Black;
/// The AI always plays White.
pub const AI: Stone = Stone::White;

/// One running game: the board, whose turn it is, the configured AI and
/// the chat history. The session applies every move, human or AI, through
/// [`Board::place`].
pub struct GameSession {
    pub board: Board,
    pub current_turn: Stone,
    pub outcome: GameOutcome,
    /// Completed full moves (incremented when the human plays).
    pub turn: u32,
    pub chat: ChatLog,
    engine: Engine,
    provider: Option<Box<dyn AiProvider>>,
    /// Route moves through the provider (`-d ai`); chat works either way.
    use_service: bool,
    provider_label: Option<String>,
}

impl GameSession {
    pub fn new(
        difficulty: Difficulty,
        game: GameSettings,
        provider: Option<Box<dyn AiProvider>>,
        use_service: bool,
        provider_label: Option<String>,
    ) -> Self {
        Self {
            board: Board::new(game.board_size),
            current_turn: HUMAN,
            outcome: GameOutcome::InProgress,
            turn: 0,
            chat: ChatLog::new(),
            engine: Engine::with_depth(difficulty, game.search_depth),
            provider,
            use_service,
            provider_label,
        }
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.outcome.is_over()
    }

    #[must_use]
    pub fn is_human_turn(&self) -> bool {
        self.current_turn == HUMAN
    }

    /// Label shown in the status pane: either the provider in use or the
    /// traditional difficulty.
    #[must_use]
    pub fn mode_label(&self) -> String {
        match (&self.provider_label, self.use_service) {
            (Some(label), true) => label.clone(),
            _ => self.engine.difficulty().to_string(),
        }
    }

    /// Apply the human move at `pos`.
    ///
    /// Rejected moves leave the session unchanged; the caller re-prompts.
    pub fn try_place(&mut self, pos: Pos) -> Result<(), GameError> {
        if self.is_over() || !self.is_human_turn() {
            return Err(GameError::IllegalMove {
                row: pos.row,
                col: pos.col,
            });
        }

        self.outcome = self.board.place(pos, HUMAN)?;
        self.turn += 1;
        if !self.is_over() {
            self.current_turn = AI;
        }
        Ok(())
    }

    /// Compute and apply the AI reply, synchronously.
    ///
    /// The provider is consulted first in service mode; any failure falls
    /// back to the traditional engine. A full board ends the game as a
    /// draw.
    pub fn ai_turn(&mut self) {
        if self.is_over() || self.is_human_turn() {
            return;
        }

        let mut chosen = if self.use_service {
            self.service_move()
        } else {
            None
        };

        if chosen.is_none() {
            match self.engine.choose_move(&self.board, AI) {
                Ok(pos) => {
                    log::info!("engine move: ({}, {})", pos.row, pos.col);
                    chosen = Some(pos);
                }
                Err(GameError::NoLegalMove) => {
                    self.outcome = GameOutcome::Draw;
                    return;
                }
                Err(err) => {
                    log::error!("engine failed to move: {err}");
                    return;
                }
            }
        }

        if let Some(pos) = chosen {
            match self.board.place(pos, AI) {
                Ok(outcome) => {
                    self.outcome = outcome;
                    if !self.is_over() {
                        self.current_turn = HUMAN;
                    }
                }
                Err(err) => {
                    // Should not happen: both sources return empty cells.
                    log::error!("AI move rejected: {err}");
                }
            }
        }
    }

    /// Ask the configured provider for a move. `None` means: fall back to
    /// the traditional engine.
    fn service_move(&self) -> Option<Pos> {
        let provider = self.provider.as_deref()?;

        // A medium-strength suggestion gives the model a sane anchor.
        let suggested = Engine::new(Difficulty::Medium)
            .choose_move(&self.board, AI)
            .ok();
        let instruction = self.chat.find_move_instruction();

        let req = MoveRequest {
            board: &self.board,
            color: AI,
            suggested,
            instruction,
        };

        match provider.request_move(&req) {
            Ok(reply) => {
                log::info!(
                    "{} move: ({}, {}){}",
                    provider.name(),
                    reply.pos.row,
                    reply.pos.col,
                    reply
                        .reasoning
                        .as_deref()
                        .map(|r| format!(" - {r}"))
                        .unwrap_or_default()
                );
                Some(reply.pos)
            }
            Err(err) => {
                log::warn!(
                    "{} move failed ({err}); falling back to the built-in engine",
                    provider.name()
                );
                None
            }
        }
    }

    /// Send a chat message and record the assistant reply.
    pub fn send_chat(&mut self, message: String) {
        self.chat.push_user(message.clone());

        let reply = match self.provider.as_deref() {
            Some(provider) => {
                let history = self.chat.messages();
                let req = ChatRequest {
                    message: &message,
                    // Exclude the message we just appended
                    history: &history[..history.len() - 1],
                    board: Some(&self.board),
                    color: Some(self.current_turn),
                };
                match provider.chat(&req) {
                    Ok(reply) => reply,
                    Err(err) => {
                        log::error!("chat failed: {err}");
                        format!("Sorry, the chat request failed: {err}")
                    }
                }
            }
            None => "No AI service is configured. Run 'gomoku --config' to set one up."
                .to_string(),
        };

        self.chat.push_assistant(reply);
    }

    /// Start a fresh game, keeping the configuration.
    pub fn reset(&mut self) {
        self.board.reset();
        self.chat.clear();
        self.current_turn = HUMAN;
        self.outcome = GameOutcome::InProgress;
        self.turn = 0;
        log::info!("game reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameSettings;
    use crate::error::ProviderError;
    use crate::provider::SuggestedMove;

    fn session(difficulty: Difficulty) -> GameSession {
        GameSession::new(difficulty, GameSettings::default(), None, false, None)
    }

    #[test]
    fn test_human_then_ai_turn() {
        let mut session = session(Difficulty::Easy);
        session.try_place(Pos::new(12, 12)).unwrap();
        assert_eq!(session.current_turn, AI);
        assert_eq!(session.turn, 1);

        session.ai_turn();
        assert_eq!(session.current_turn, HUMAN);
        assert_eq!(session.board.stone_count(), 2);
        assert!(!session.is_over());
    }

    #[test]
    fn test_rejects_occupied_cell() {
        let mut session = session(Difficulty::Easy);
        session.try_place(Pos::new(12, 12)).unwrap();
        session.ai_turn();

        let err = session.try_place(Pos::new(12, 12)).unwrap_err();
        assert!(matches!(err, GameError::IllegalMove { .. }));
        // Turn flow is unchanged
        assert!(session.is_human_turn());
    }

    #[test]
    fn test_rejects_moves_after_game_over() {
        let mut session = session(Difficulty::Easy);
        session.outcome = GameOutcome::BlackWins;
        assert!(session.try_place(Pos::new(0, 0)).is_err());
    }

    #[test]
    fn test_human_win_ends_game() {
        let mut session = session(Difficulty::Easy);
        // Pre-build four in a row, then play the fifth as a normal move
        for col in 0..4 {
            session.board.set_stone(Pos::new(0, col), HUMAN);
        }
        session.try_place(Pos::new(0, 4)).unwrap();

        assert_eq!(session.outcome, GameOutcome::BlackWins);
        assert!(session.is_over());
    }

    #[test]
    fn test_ai_blocks_open_four_in_session() {
        let mut session = session(Difficulty::Medium);
        for col in 10..14 {
            session.board.set_stone(Pos::new(10, col), HUMAN);
        }
        session.current_turn = AI;

        session.ai_turn();
        let last = session.board.last_move().unwrap();
        assert_eq!(last.stone, AI);
        assert!(
            last.pos == Pos::new(10, 9) || last.pos == Pos::new(10, 14),
            "AI played {:?} instead of blocking",
            last.pos
        );
    }

    #[test]
    fn test_reset_clears_session() {
        let mut session = session(Difficulty::Easy);
        session.try_place(Pos::new(12, 12)).unwrap();
        session.ai_turn();
        session.chat.push_user("hello");

        session.reset();
        assert!(session.board.is_board_empty());
        assert!(session.chat.is_empty());
        assert_eq!(session.turn, 0);
        assert!(session.is_human_turn());
        assert!(!session.is_over());
    }

    #[test]
    fn test_chat_without_provider_gets_hint() {
        let mut session = session(Difficulty::Easy);
        session.send_chat("hello there".to_string());

        let messages = session.chat.messages();
        assert_eq!(messages.len(), 2);
        assert!(messages[1].content.contains("--config"));
    }

    /// Provider double that always proposes the same cell.
    #[derive(Debug)]
    struct FixedProvider(Pos);

    impl AiProvider for FixedProvider {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn request_move(&self, req: &MoveRequest<'_>) -> Result<SuggestedMove, ProviderError> {
            if req.board.is_empty_at(self.0) {
                Ok(SuggestedMove {
                    pos: self.0,
                    reasoning: None,
                })
            } else {
                Err(ProviderError::InvalidPosition {
                    row: self.0.row as usize,
                    col: self.0.col as usize,
                })
            }
        }

        fn chat(&self, req: &ChatRequest<'_>) -> Result<String, ProviderError> {
            Ok(format!("echo: {}", req.message))
        }

        fn validate_connection(&self) -> Result<(), ProviderError> {
            Ok(())
        }
    }

    #[test]
    fn test_service_move_is_used() {
        let mut session = GameSession::new(
            Difficulty::Hard,
            GameSettings::default(),
            Some(Box::new(FixedProvider(Pos::new(0, 0)))),
            true,
            Some("fixed".to_string()),
        );

        session.try_place(Pos::new(12, 12)).unwrap();
        session.ai_turn();
        assert_eq!(session.board.get(Pos::new(0, 0)), AI);
        assert_eq!(session.mode_label(), "fixed");
    }

    #[test]
    fn test_service_failure_falls_back_to_engine() {
        // The fixed cell is pre-occupied, so the provider errors and the
        // traditional engine must take over.
        let mut session = GameSession::new(
            Difficulty::Hard,
            GameSettings::default(),
            Some(Box::new(FixedProvider(Pos::new(0, 0)))),
            true,
            None,
        );
        session.board.set_stone(Pos::new(0, 0), HUMAN);

        session.try_place(Pos::new(12, 12)).unwrap();
        session.ai_turn();

        assert!(session.is_human_turn(), "AI should still have moved");
        let last = session.board.last_move().unwrap();
        assert_eq!(last.stone, AI);
    }

    #[test]
    fn test_chat_with_provider_round_trip() {
        let mut session = GameSession::new(
            Difficulty::Easy,
            GameSettings::default(),
            Some(Box::new(FixedProvider(Pos::new(0, 0)))),
            false,
            None,
        );

        session.send_chat("what should I play?".to_string());
        let messages = session.chat.messages();
        assert_eq!(messages[1].content, "echo: what should I play?");
    }
}
