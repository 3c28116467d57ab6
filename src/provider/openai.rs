//! OpenAI-compatible chat-completions client
//!
//! Talks to `POST {endpoint}/chat/completions` with bearer auth, which
//! also covers the many OpenAI-compatible gateways (set `AI_ENDPOINT`).

use std::time::Duration;

use serde_json::{json, Value};

use crate::config::AiSettings;
use crate::error::{ConfigError, ProviderError};

use super::prompt::PromptBuilder;
use super::{fetch_move, history_window, AiProvider, ChatRequest, MoveRequest, SuggestedMove};

const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1";

const MOVE_MAX_TOKENS: u32 = 200;
const CHAT_MAX_TOKENS: u32 = 150;

#[derive(Debug)]
pub struct OpenAiProvider {
    agent: ureq::Agent,
    api_key: String,
    model: String,
    endpoint: String,
    max_retries: u32,
}

impl OpenAiProvider {
    pub fn new(settings: &AiSettings) -> Result<Self, ConfigError> {
        let api_key = settings
            .api_key
            .clone()
            .ok_or(ConfigError::MissingApiKey("openai"))?;

        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build();

        Ok(Self {
            agent,
            api_key,
            model: settings
                .model_or_default()
                .unwrap_or("gpt-4o")
                .to_string(),
            endpoint: settings
                .endpoint
                .clone()
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            max_retries: settings.max_retries,
        })
    }

    /// One chat-completions round trip; returns the reply text.
    fn chat_completion(
        &self,
        messages: Vec<Value>,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, ProviderError> {
        let url = format!("{}/chat/completions", self.endpoint.trim_end_matches('/'));

        let response = self
            .agent
            .post(&url)
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .send_json(json!({
                "model": self.model,
                "messages": messages,
                "max_tokens": max_tokens,
                "temperature": temperature,
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

        let body: ChatCompletion = response.into_json()?;
        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(ProviderError::EmptyReply)
    }
}

impl AiProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn request_move(&self, req: &MoveRequest<'_>) -> Result<SuggestedMove, ProviderError> {
        fetch_move(
            |prompt| {
                self.chat_completion(
                    vec![
                        json!({
                            "role": "system",
                            "content": "You are a professional Gomoku engine. Analyze the \
position and reply with the best move in the requested format.",
                        }),
                        json!({"role": "user", "content": prompt}),
                    ],
                    MOVE_MAX_TOKENS,
                    0.3,
                )
            },
            req,
            self.max_retries,
        )
    }

    fn chat(&self, req: &ChatRequest<'_>) -> Result<String, ProviderError> {
        let system = PromptBuilder::build_chat_prompt(req.board, req.color);

        let mut messages = vec![json!({"role": "system", "content": system})];
        for msg in history_window(req.history) {
            messages.push(json!({"role": msg.role.as_str(), "content": msg.content}));
        }
        messages.push(json!({"role": "user", "content": req.message}));

        self.chat_completion(messages, CHAT_MAX_TOKENS, 0.7)
    }

    fn validate_connection(&self) -> Result<(), ProviderError> {
        self.chat_completion(vec![json!({"role": "user", "content": "Hi"})], 5, 0.0)
            .map(|_| ())
    }
}

#[derive(serde::Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(serde::Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(serde::Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderKind;

    fn settings() -> AiSettings {
        AiSettings {
            provider: ProviderKind::OpenAi,
            api_key: Some("sk-test".to_string()),
            ..AiSettings::default()
        }
    }

    #[test]
    fn test_new_requires_api_key() {
        let mut settings = settings();
        settings.api_key = None;
        assert!(matches!(
            OpenAiProvider::new(&settings),
            Err(ConfigError::MissingApiKey("openai"))
        ));
    }

    #[test]
    fn test_defaults_applied() {
        let provider = OpenAiProvider::new(&settings()).unwrap();
        assert_eq!(provider.model, "gpt-4o");
        assert_eq!(provider.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(provider.name(), "openai");
    }

    #[test]
    fn test_custom_model_and_endpoint() {
        let mut settings = settings();
        settings.model = Some("gpt-4o-mini".to_string());
        settings.endpoint = Some("https://proxy.example/v1/".to_string());

        let provider = OpenAiProvider::new(&settings).unwrap();
        assert_eq!(provider.model, "gpt-4o-mini");
        // Trailing slash is tolerated when building URLs
        let url = format!("{}/chat/completions", provider.endpoint.trim_end_matches('/'));
        assert_eq!(url, "https://proxy.example/v1/chat/completions");
    }

    #[test]
    fn test_completion_deserializes() {
        let raw = r#"{
            "choices": [
                {"message": {"role": "assistant", "content": "MOVE: H8"}}
            ]
        }"#;
        let parsed: ChatCompletion = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices[0].message.content, "MOVE: H8");
    }
}
