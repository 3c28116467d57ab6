//! LLM provider integration
//!
//! The [`AiProvider`] trait is the minimal contract the game needs from a
//! remote model: produce a move for the current position, answer a chat
//! message, and validate the connection. Concrete clients exist for
//! OpenAI-compatible and Anthropic endpoints; both share the prompt
//! construction and reply parsing in [`prompt`] and [`parse`].
//!
//! Every failure in this layer is recoverable: the game falls back to the
//! traditional engine, which is always available as a pure, synchronous
//! move source.

pub mod anthropic;
pub mod openai;
pub mod parse;
pub mod prompt;

pub use anthropic::AnthropicProvider;
pub use openai::OpenAiProvider;

use crate::board::{Board, Pos, Stone};
use crate::chat::ChatMessage;
use crate::config::{AiSettings, ProviderKind};
use crate::error::{ConfigError, ProviderError};

use self::parse::ResponseParser;
use self::prompt::PromptBuilder;

/// Chat history window forwarded to the remote model.
const CHAT_HISTORY_WINDOW: usize = 10;

/// A move request for the remote model.
pub struct MoveRequest<'a> {
    pub board: &'a Board,
    pub color: Stone,
    /// Move suggested by the traditional engine, offered to the model as
    /// a hint.
    pub suggested: Option<Pos>,
    /// Free-form instruction picked up from the chat (e.g. "play H8").
    pub instruction: Option<&'a str>,
}

/// A chat request with optional board context.
pub struct ChatRequest<'a> {
    pub message: &'a str,
    pub history: &'a [ChatMessage],
    pub board: Option<&'a Board>,
    pub color: Option<Stone>,
}

/// Move proposed by the remote model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestedMove {
    pub pos: Pos,
    /// The model's stated reasoning, when it offered any.
    pub reasoning: Option<String>,
}

/// Contract implemented by each remote model client.
pub trait AiProvider: std::fmt::Debug {
    fn name(&self) -> &'static str;

    /// Ask the model for a move. Implementations retry internally on
    /// parse failures and occupied cells, up to their configured limit.
    fn request_move(&self, req: &MoveRequest<'_>) -> Result<SuggestedMove, ProviderError>;

    /// Send a chat message with the recent history and board context.
    fn chat(&self, req: &ChatRequest<'_>) -> Result<String, ProviderError>;

    /// Cheap round-trip to confirm credentials and connectivity.
    fn validate_connection(&self) -> Result<(), ProviderError>;
}

/// Build the provider selected by the settings. `Traditional` yields
/// `None`: the built-in engine needs no client.
pub fn create_provider(
    settings: &AiSettings,
) -> Result<Option<Box<dyn AiProvider>>, ConfigError> {
    match settings.provider {
        ProviderKind::Traditional => Ok(None),
        ProviderKind::OpenAi => Ok(Some(Box::new(OpenAiProvider::new(settings)?))),
        ProviderKind::Anthropic => Ok(Some(Box::new(AnthropicProvider::new(settings)?))),
    }
}

/// Shared retry loop around a raw completion call.
///
/// Re-asks the model when the reply cannot be parsed or names a cell that
/// is occupied or out of range; transport errors are retried after a
/// short pause. The last error is returned once attempts are exhausted.
fn fetch_move(
    send: impl Fn(&str) -> Result<String, ProviderError>,
    req: &MoveRequest<'_>,
    max_retries: u32,
) -> Result<SuggestedMove, ProviderError> {
    let prompt = PromptBuilder::build_move_prompt(req);
    let attempts = max_retries.max(1);
    let mut last_err = ProviderError::UnparseableMove;

    for attempt in 0..attempts {
        let reply = match send(&prompt) {
            Ok(reply) => reply,
            Err(err) => {
                log::warn!("provider request failed (attempt {}): {err}", attempt + 1);
                last_err = err;
                if attempt + 1 < attempts {
                    std::thread::sleep(std::time::Duration::from_secs(1));
                }
                continue;
            }
        };

        let Some(parsed) = ResponseParser::parse_move_response(&reply, req.board.size()) else {
            last_err = ProviderError::UnparseableMove;
            continue;
        };

        if !req.board.is_empty_at(parsed.pos) {
            last_err = ProviderError::InvalidPosition {
                row: parsed.pos.row as usize,
                col: parsed.pos.col as usize,
            };
            continue;
        }

        return Ok(SuggestedMove {
            pos: parsed.pos,
            reasoning: (!parsed.reasoning.is_empty()).then_some(parsed.reasoning),
        });
    }

    Err(last_err)
}

/// Trim the chat history to the window the providers forward.
fn history_window(history: &[ChatMessage]) -> &[ChatMessage] {
    let start = history.len().saturating_sub(CHAT_HISTORY_WINDOW);
    &history[start..]
}
