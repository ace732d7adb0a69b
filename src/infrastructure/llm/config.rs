//! LLM Configuration

use serde::{Deserialize, Serialize};

/// GitHub Models / Azure AI inference endpoint, which serves every model in the menu
pub const DEFAULT_API_BASE: &str = "https://models.inference.ai.azure.com";

/// LLM Configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct LLMConfig {
    /// OpenAI-compatible base URL, without the `/chat/completions` suffix
    pub api_base: String,
    pub api_key: Option<String>,

    /// Model used until a user picks one
    pub default_model: String,

    /// Default settings
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub system_prompt: String,

    /// Conversation turns kept per user (user and assistant messages)
    pub max_history: usize,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: None,
            default_model: "gpt-4.1-mini".to_string(),
            temperature: 0.5,
            max_tokens: None,
            system_prompt: "You are a helpful assistant. Answer concisely and use Markdown when it helps.".to_string(),
            max_history: 20,
        }
    }
}

impl LLMConfig {
    /// Override fields from environment variables
    pub fn apply_env(&mut self) {
        if let Ok(base) = std::env::var("LLM_API_BASE") {
            self.api_base = base;
        }

        if let Ok(key) = std::env::var("LLM_API_KEY") {
            self.api_key = Some(key);
        } else if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            if self.api_key.is_none() {
                self.api_key = Some(key);
            }
        }

        if let Ok(model) = std::env::var("LLM_MODEL") {
            self.default_model = model;
        }

        if let Ok(prompt) = std::env::var("LLM_SYSTEM_PROMPT") {
            self.system_prompt = prompt;
        }

        if let Ok(temp) = std::env::var("LLM_TEMPERATURE") {
            match temp.parse() {
                Ok(t) => self.temperature = t,
                Err(_) => tracing::warn!("Ignoring invalid LLM_TEMPERATURE: {}", temp),
            }
        }
    }
}
