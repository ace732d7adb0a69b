//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::application::errors::ConfigError;
use crate::domain::entities::{AllowList, UserId};
use crate::infrastructure::llm::LLMConfig;

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Bot configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub bot: BotConfig,
    pub telegram: TelegramConfig,
    pub access: AccessConfig,
    pub llm: LLMConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BotConfig {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct TelegramConfig {
    pub token: Option<String>,
    pub api_url: String,
    /// Long-polling timeout passed to getUpdates
    pub poll_timeout_secs: u64,
    /// Pause after a failed poll before trying again
    pub retry_delay_secs: u64,
}

/// Users allowed to talk to the bot
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct AccessConfig {
    pub allowed_users: Vec<UserId>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "relay-bot".to_string(),
        }
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: DEFAULT_API_URL.to_string(),
            poll_timeout_secs: 30,
            retry_delay_secs: 5,
        }
    }
}

impl Config {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    /// Load the file if it exists, then layer environment variables on top
    pub fn load_with_env(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let mut config = if path.exists() {
            Self::load(&path)?
        } else {
            tracing::debug!("Config file {} not found, using defaults", path.display());
            Self::default()
        };
        config.apply_env()?;
        Ok(config)
    }

    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(token) = std::env::var("TELEGRAM_TOKEN") {
            self.telegram.token = Some(token);
        }

        if let Ok(url) = std::env::var("TELEGRAM_API_URL") {
            self.telegram.api_url = url;
        }

        if let Ok(users) = std::env::var("ALLOWED_USER_IDS") {
            let mut ids: Vec<UserId> = AllowList::parse(&users)?.iter().collect();
            ids.sort_unstable();
            self.access.allowed_users = ids;
        }

        self.llm.apply_env();
        Ok(())
    }

    /// The token, or an error if none was configured
    pub fn token(&self) -> Result<&str, ConfigError> {
        self.telegram
            .token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingField("telegram.token (TELEGRAM_TOKEN)".to_string()))
    }

    /// The allow-list, or an error if it is empty
    pub fn allow_list(&self) -> Result<AllowList, ConfigError> {
        let list = AllowList::new(self.access.allowed_users.iter().copied());
        if list.is_empty() {
            return Err(ConfigError::MissingField(
                "access.allowed-users (ALLOWED_USER_IDS)".to_string(),
            ));
        }
        Ok(list)
    }

    /// Check startup preconditions
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.token()?;
        self.allow_list()?;
        if self.telegram.poll_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "telegram.poll-timeout-secs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Default config rendered as YAML, for `init-config`
    pub fn template() -> Result<String, ConfigError> {
        serde_yaml::to_string(&Self::default())
            .map_err(|e| ConfigError::Parse(format!("Failed to render config: {}", e)))
    }
}
