//! Configuration loading for medassist.
//! Reads medassist.toml from the current directory or the path in MEDASSIST_CONFIG,
//! then applies environment overrides.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Placeholder shipped in `.env.example`; treated as "no key".
pub const API_KEY_PLACEHOLDER: &str = "your_gemini_api_key_here";

pub const DEFAULT_CONFIG_FILE: &str = "medassist.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(String),
    #[error("Could not read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("No API key for provider '{provider}' (set llm.api_key or {env_var})")]
    MissingApiKey { provider: &'static str, env_var: &'static str },
    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_max_message_chars")]
    pub max_message_chars: usize,
}

fn default_bind()              -> String { "127.0.0.1:5000".to_string() }
fn default_max_message_chars() -> usize  { 1000 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind(), max_message_chars: default_max_message_chars() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Gemini,
    OpenAi,
    Anthropic,
    Ollama,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Gemini    => "gemini",
            Provider::OpenAi    => "openai",
            Provider::Anthropic => "anthropic",
            Provider::Ollama    => "ollama",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "gemini"               => Some(Provider::Gemini),
            "openai" | "open_ai"   => Some(Provider::OpenAi),
            "anthropic"            => Some(Provider::Anthropic),
            "ollama"               => Some(Provider::Ollama),
            _                      => None,
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::Gemini    => "gemini-1.5-flash",
            Provider::OpenAi    => "gpt-4o-mini",
            Provider::Anthropic => "claude-3-5-haiku-latest",
            Provider::Ollama    => "llama3:8b",
        }
    }

    /// Environment variable consulted for this provider's key.
    pub fn api_key_env(&self) -> Option<&'static str> {
        match self {
            Provider::Gemini    => Some("GEMINI_API_KEY"),
            Provider::OpenAi    => Some("OPENAI_API_KEY"),
            Provider::Anthropic => Some("ANTHROPIC_API_KEY"),
            Provider::Ollama    => None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub provider: Provider,
    pub model: Option<String>,
    pub api_key: Option<SecretString>,
    pub base_url: Option<String>,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_max_output_tokens() -> u32 { 2048 }
fn default_temperature()       -> f32 { 0.4 }

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: Provider::default(),
            model: None,
            api_key: None,
            base_url: None,
            max_output_tokens: default_max_output_tokens(),
            temperature: default_temperature(),
        }
    }
}

impl LlmConfig {
    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or_else(|| self.provider.default_model())
    }

    /// Returns the usable API key, or `None` for providers that need none.
    /// Empty keys and the template placeholder count as missing.
    pub fn resolve_api_key(&self) -> Result<Option<String>, ConfigError> {
        let Some(env_var) = self.provider.api_key_env() else {
            return Ok(None);
        };
        let key = self.api_key
            .as_ref()
            .map(|k| k.expose_secret().trim().to_string())
            .filter(|k| !k.is_empty() && k != API_KEY_PLACEHOLDER);
        match key {
            Some(k) => Ok(Some(k)),
            None => Err(ConfigError::MissingApiKey {
                provider: self.provider.as_str(),
                env_var,
            }),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String { "medassist=info,tower_http=info".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: default_log_filter() }
    }
}

mod tests;

impl Config {
    /// Load configuration from medassist.toml and the process environment.
    /// Checks MEDASSIST_CONFIG first; a missing default file yields defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let explicit = std::env::var("MEDASSIST_CONFIG").ok();
        let path = explicit.clone().unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());

        let mut config = if Path::new(&path).exists() {
            let content = std::fs::read_to_string(&path)?;
            Self::from_toml_str(&content)?
        } else if explicit.is_some() {
            return Err(ConfigError::NotFound(path));
        } else {
            Self::default()
        };

        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply environment overrides through `lookup` so callers can supply
    /// something other than the process environment.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup("MEDASSIST_BIND") {
            self.server.bind = bind;
        }
        if let Some(provider) = lookup("MEDASSIST_LLM_PROVIDER") {
            self.llm.provider = Provider::parse(&provider).ok_or_else(|| ConfigError::Invalid {
                field: "MEDASSIST_LLM_PROVIDER",
                reason: format!("unknown provider '{provider}'"),
            })?;
        }
        if let Some(model) = lookup("MEDASSIST_LLM_MODEL") {
            self.llm.model = Some(model);
        }
        // File key wins over the environment
        if self.llm.api_key.is_none() {
            if let Some(env_var) = self.llm.provider.api_key_env() {
                self.llm.api_key = lookup(env_var).map(SecretString::from);
            }
        }
        Ok(())
    }

    /// Structural checks only; a missing API key is reported later, per request.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.max_message_chars == 0 {
            return Err(ConfigError::Invalid {
                field: "server.max_message_chars",
                reason: "must be greater than zero".to_string(),
            });
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::Invalid {
                field: "llm.temperature",
                reason: format!("{} is outside [0, 2]", self.llm.temperature),
            });
        }
        Ok(())
    }
}
