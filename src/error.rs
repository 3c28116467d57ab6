//! Error taxonomy for the game core, configuration and AI providers

use std::path::PathBuf;

/// Errors raised by the game core.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// Cell occupied or coordinates out of range. Recovered locally by
    /// rejecting the move and re-prompting.
    #[error("illegal move at ({row}, {col}): cell occupied or out of range")]
    IllegalMove { row: u8, col: u8 },

    /// The board is completely full; surfaced to the caller as a draw.
    #[error("no legal move: the board is full")]
    NoLegalMove,

    /// Unrecognized difficulty name. Fatal at startup: silently defaulting
    /// could mask a configuration bug.
    #[error("invalid difficulty '{0}' (expected easy, medium, hard or ai)")]
    InvalidDifficulty(String),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write config file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("unknown AI provider '{0}' (valid: openai, anthropic, traditional)")]
    UnknownProvider(String),

    #[error("an API key is required for the '{0}' provider (set AI_API_KEY)")]
    MissingApiKey(&'static str),

    #[error("invalid {field}: '{value}' ({reason})")]
    InvalidValue {
        field: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Errors from the LLM provider layer.
///
/// Every failure here resolves to the traditional engine taking over;
/// none of these abort a game.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Transport(#[from] Box<ureq::Error>),

    #[error("service returned status {status}: {body}")]
    BadStatus { status: u16, body: String },

    #[error("failed to decode response: {0}")]
    Decode(#[from] std::io::Error),

    #[error("service reply carried no message content")]
    EmptyReply,

    #[error("could not parse a move from the model reply")]
    UnparseableMove,

    #[error("model proposed an occupied or out-of-range cell ({row}, {col})")]
    InvalidPosition { row: usize, col: usize },
}
