//! Game and AI-service configuration
//!
//! Settings are resolved from three layers, later layers winning:
//! defaults, the config file (`~/.gomoku/config.toml`), environment
//! variables (`AI_PROVIDER`, `AI_API_KEY`, `AI_MODEL`, `AI_ENDPOINT`,
//! `AI_TIMEOUT`, `AI_MAX_RETRIES`), and finally command-line flags.
//! Invalid values are fatal at startup rather than silently defaulted.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::board::DEFAULT_BOARD_SIZE;
use crate::engine::{Difficulty, DEFAULT_SEARCH_DEPTH};
use crate::error::{ConfigError, GameError};

/// AI provider backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
    /// Built-in heuristic/minimax engine; no remote service involved.
    Traditional,
}

impl ProviderKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Traditional => "traditional",
        }
    }

    /// Model used when none is configured.
    #[must_use]
    pub fn default_model(self) -> Option<&'static str> {
        match self {
            ProviderKind::OpenAi => Some("gpt-4o"),
            ProviderKind::Anthropic => Some("claude-3-5-sonnet-20241022"),
            ProviderKind::Traditional => None,
        }
    }
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "anthropic" => Ok(ProviderKind::Anthropic),
            "traditional" => Ok(ProviderKind::Traditional),
            other => Err(ConfigError::UnknownProvider(other.to_string())),
        }
    }
}

/// How the opponent's moves are produced.
///
/// `-d easy|medium|hard` selects a traditional difficulty; `-d ai` routes
/// moves through the configured LLM provider with the traditional engine
/// as fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayMode {
    Traditional(Difficulty),
    Service,
}

impl FromStr for PlayMode {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("ai") {
            Ok(PlayMode::Service)
        } else {
            s.parse::<Difficulty>().map(PlayMode::Traditional)
        }
    }
}

/// Resolved AI-service settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiSettings {
    pub provider: ProviderKind,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub endpoint: Option<String>,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Traditional,
            api_key: None,
            model: None,
            endpoint: None,
            timeout_secs: 30,
            max_retries: 3,
        }
    }
}

impl AiSettings {
    /// The configured model, falling back to the provider default.
    #[must_use]
    pub fn model_or_default(&self) -> Option<&str> {
        self.model.as_deref().or_else(|| self.provider.default_model())
    }

    /// Reject settings that would fail at first use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.provider != ProviderKind::Traditional
            && self.api_key.as_deref().map_or(true, str::is_empty)
        {
            return Err(ConfigError::MissingApiKey(self.provider.as_str()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout",
                value: "0".to_string(),
                reason: "must be a positive number of seconds",
            });
        }
        Ok(())
    }

    /// Human-readable summary for `--show-config` (API key truncated).
    #[must_use]
    pub fn summary(&self) -> String {
        if self.provider == ProviderKind::Traditional {
            return "provider: traditional (built-in engine)".to_string();
        }

        let key = self.api_key.as_deref().map_or_else(
            || "unset".to_string(),
            |k| format!("{}...", &k[..k.len().min(8)]),
        );
        format!(
            "provider: {}\nmodel: {}\nendpoint: {}\napi key: {}\ntimeout: {}s\nmax retries: {}",
            self.provider.as_str(),
            self.model_or_default().unwrap_or("unset"),
            self.endpoint.as_deref().unwrap_or("default"),
            key,
            self.timeout_secs,
            self.max_retries,
        )
    }
}

/// Board and engine settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSettings {
    pub board_size: usize,
    pub search_depth: u8,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            search_depth: DEFAULT_SEARCH_DEPTH,
        }
    }
}

impl GameSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_size < 5 || self.board_size > 26 {
            return Err(ConfigError::InvalidValue {
                field: "board_size",
                value: self.board_size.to_string(),
                reason: "must be between 5 and 26",
            });
        }
        if self.search_depth == 0 || self.search_depth > 8 {
            return Err(ConfigError::InvalidValue {
                field: "search_depth",
                value: self.search_depth.to_string(),
                reason: "must be between 1 and 8",
            });
        }
        Ok(())
    }
}

/// On-disk configuration, loadable from TOML. Every field is optional;
/// unset fields fall through to the next layer.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub ai: AiSection,
    pub game: GameSection,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AiSection {
    pub provider: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub endpoint: Option<String>,
    pub timeout: Option<u64>,
    pub max_retries: Option<u32>,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GameSection {
    pub board_size: Option<usize>,
    pub search_depth: Option<u8>,
}

/// Command-line overrides for the AI service (highest precedence).
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub model: Option<String>,
}

/// Path of the config file (`~/.gomoku/config.toml`).
#[must_use]
pub fn config_file_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".gomoku").join("config.toml"))
}

/// Load the config file if it exists.
pub fn load_file_config(path: &Path) -> Result<Option<FileConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(Some(toml::from_str(&content)?))
}

/// Write the config file, creating parent directories as needed.
pub fn save_file_config(path: &Path, config: &FileConfig) -> Result<(), ConfigError> {
    let write = |p: &Path| -> io::Result<()> {
        if let Some(parent) = p.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let rendered = toml::to_string_pretty(config)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        std::fs::write(p, rendered)
    };
    write(path).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Delete the config file. Returns whether a file was removed.
pub fn delete_file_config(path: &Path) -> io::Result<bool> {
    if path.exists() {
        std::fs::remove_file(path)?;
        Ok(true)
    } else {
        Ok(false)
    }
}

/// Resolve AI settings from the file, the process environment and CLI
/// overrides.
pub fn resolve(file: Option<&FileConfig>, cli: &CliOverrides) -> Result<AiSettings, ConfigError> {
    resolve_with_env(file, cli, |key| std::env::var(key).ok())
}

/// Same as [`resolve`] but with an injected environment lookup, so the
/// precedence rules are testable without touching process globals.
pub fn resolve_with_env(
    file: Option<&FileConfig>,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> Result<AiSettings, ConfigError> {
    let mut settings = AiSettings::default();

    if let Some(file) = file {
        let ai = &file.ai;
        if let Some(provider) = nonempty(ai.provider.clone()) {
            settings.provider = provider.parse()?;
        }
        settings.api_key = nonempty(ai.api_key.clone()).or(settings.api_key);
        settings.model = nonempty(ai.model.clone()).or(settings.model);
        settings.endpoint = nonempty(ai.endpoint.clone()).or(settings.endpoint);
        settings.timeout_secs = ai.timeout.unwrap_or(settings.timeout_secs);
        settings.max_retries = ai.max_retries.unwrap_or(settings.max_retries);
    }

    if let Some(provider) = nonempty(env("AI_PROVIDER")) {
        settings.provider = provider.parse()?;
    }
    settings.api_key = nonempty(env("AI_API_KEY")).or(settings.api_key);
    settings.model = nonempty(env("AI_MODEL")).or(settings.model);
    settings.endpoint = nonempty(env("AI_ENDPOINT")).or(settings.endpoint);
    if let Some(timeout) = nonempty(env("AI_TIMEOUT")) {
        settings.timeout_secs = parse_number(&timeout, "AI_TIMEOUT")?;
    }
    if let Some(retries) = nonempty(env("AI_MAX_RETRIES")) {
        settings.max_retries = parse_number(&retries, "AI_MAX_RETRIES")?;
    }

    settings.api_key = cli.api_key.clone().or(settings.api_key);
    settings.endpoint = cli.endpoint.clone().or(settings.endpoint);
    settings.model = cli.model.clone().or(settings.model);

    settings.validate()?;
    Ok(settings)
}

/// Resolve board and engine settings from the file.
pub fn resolve_game(file: Option<&FileConfig>) -> Result<GameSettings, ConfigError> {
    let mut settings = GameSettings::default();
    if let Some(file) = file {
        settings.board_size = file.game.board_size.unwrap_or(settings.board_size);
        settings.search_depth = file.game.search_depth.unwrap_or(settings.search_depth);
    }
    settings.validate()?;
    Ok(settings)
}

fn nonempty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn parse_number<T: FromStr>(value: &str, field: &'static str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        field,
        value: value.to_string(),
        reason: "expected a non-negative integer",
    })
}

/// Line-based interactive setup. Reads answers from `input`, writes
/// prompts to `output`, and returns the config to save, or `None` if the
/// user aborted by entering nothing for the provider.
pub fn run_wizard(
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> io::Result<Option<FileConfig>> {
    let mut ask = |prompt: &str, output: &mut dyn Write| -> io::Result<String> {
        write!(output, "{prompt}")?;
        output.flush()?;
        let mut line = String::new();
        input.read_line(&mut line)?;
        Ok(line.trim().to_string())
    };

    writeln!(output, "Gomoku AI service setup")?;
    writeln!(output, "-----------------------")?;

    let provider = ask("Provider [openai/anthropic/traditional]: ", output)?;
    if provider.is_empty() {
        writeln!(output, "Aborted; nothing written.")?;
        return Ok(None);
    }

    let kind: ProviderKind = match provider.parse() {
        Ok(kind) => kind,
        Err(err) => {
            writeln!(output, "{err}")?;
            return Ok(None);
        }
    };

    let mut config = FileConfig::default();
    config.ai.provider = Some(kind.as_str().to_string());

    if kind != ProviderKind::Traditional {
        let key = ask("API key: ", output)?;
        if key.is_empty() {
            writeln!(output, "An API key is required for remote providers; aborted.")?;
            return Ok(None);
        }
        config.ai.api_key = Some(key);

        let default_model = kind.default_model().unwrap_or("");
        let model = ask(&format!("Model [{default_model}]: "), output)?;
        if !model.is_empty() {
            config.ai.model = Some(model);
        }

        let endpoint = ask("Endpoint (blank for default): ", output)?;
        if !endpoint.is_empty() {
            config.ai.endpoint = Some(endpoint);
        }
    }

    Ok(Some(config))
}
