//! Anthropic Messages API client

use std::time::Duration;

use serde_json::{json, Value};

use crate::config::AiSettings;
use crate::error::{ConfigError, ProviderError};

use super::prompt::PromptBuilder;
use super::{fetch_move, history_window, AiProvider, ChatRequest, MoveRequest, SuggestedMove};

const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";

const MOVE_MAX_TOKENS: u32 = 200;
const CHAT_MAX_TOKENS: u32 = 150;

#[derive(Debug)]
pub struct AnthropicProvider {
    agent: ureq::Agent,
    api_key: String,
    model: String,
    endpoint: String,
    max_retries: u32,
}

impl AnthropicProvider {
    pub fn new(settings: &AiSettings) -> Result<Self, ConfigError> {
        let api_key = settings
            .api_key
            .clone()
            .ok_or(ConfigError::MissingApiKey("anthropic"))?;

        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build();

        Ok(Self {
            agent,
            api_key,
            model: settings
                .model_or_default()
                .unwrap_or("claude-3-5-sonnet-20241022")
                .to_string(),
            endpoint: settings
                .endpoint
                .clone()
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            max_retries: settings.max_retries,
        })
    }

    /// One Messages API round trip; returns the reply text.
    fn send_messages(
        &self,
        system: &str,
        messages: Vec<Value>,
        max_tokens: u32,
    ) -> Result<String, ProviderError> {
        let url = format!("{}/v1/messages", self.endpoint.trim_end_matches('/'));

        let response = self
            .agent
            .post(&url)
            .set("x-api-key", &self.api_key)
            .set("anthropic-version", API_VERSION)
            .send_json(json!({
                "model": self.model,
                "max_tokens": max_tokens,
                "system": system,
                "messages": messages,
            }));

        let response = match response {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) => {
                return Err(ProviderError::BadStatus {
                    status,
                    body: response.into_string().unwrap_or_default(),
                });
            }
            Err(err) => return Err(ProviderError::Transport(Box::new(err))),
        };

        let body: MessagesReply = response.into_json()?;
        let text: String = body
            .content
            .into_iter()
            .map(|block| block.text)
            .collect::<Vec<_>>()
            .join("");
        if text.is_empty() {
            Err(ProviderError::EmptyReply)
        } else {
            Ok(text)
        }
    }
}

impl AiProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    fn request_move(&self, req: &MoveRequest<'_>) -> Result<SuggestedMove, ProviderError> {
        fetch_move(
            |prompt| {
                self.send_messages(
                    "You are a professional Gomoku engine. Analyze the position and \
reply with the best move in the requested format.",
                    vec![json!({"role": "user", "content": prompt})],
                    MOVE_MAX_TOKENS,
                )
            },
            req,
            self.max_retries,
        )
    }

    fn chat(&self, req: &ChatRequest<'_>) -> Result<String, ProviderError> {
        let system = PromptBuilder::build_chat_prompt(req.board, req.color);

        let mut messages = Vec::new();
        for msg in history_window(req.history) {
            messages.push(json!({"role": msg.role.as_str(), "content": msg.content}));
        }
        messages.push(json!({"role": "user", "content": req.message}));

        self.send_messages(&system, messages, CHAT_MAX_TOKENS)
    }

    fn validate_connection(&self) -> Result<(), ProviderError> {
        self.send_messages(
            "Reply briefly.",
            vec![json!({"role": "user", "content": "Hi"})],
            5,
        )
        .map(|_| ())
    }
}

#[derive(serde::Deserialize)]
struct MessagesReply {
    content: Vec<ContentBlock>,
}

#[derive(serde::Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}
