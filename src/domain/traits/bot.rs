use async_trait::async_trait;
use crate::domain::entities::{BotCommand, UserId};
use crate::application::errors::BotError;

/// Bot trait - abstraction for the messaging platform transport
#[async_trait]
pub trait Bot: Send + Sync {
    /// Send a Markdown-formatted message to a chat, returning the message id
    async fn send_message(&self, chat_id: UserId, text: &str) -> Result<i64, BotError>;

    /// Send a message with inline keyboard
    async fn send_with_keyboard(
        &self,
        chat_id: UserId,
        text: &str,
        buttons: Vec<Vec<KeyboardButton>>,
    ) -> Result<i64, BotError>;

    /// Answer a callback query so the client clears its loading indicator
    async fn answer_callback(&self, callback_id: &str) -> Result<(), BotError>;

    /// Register the command menu shown by the client
    async fn set_commands(&self, commands: &[BotCommand]) -> Result<(), BotError>;

    /// Send chat action (typing, upload_photo, etc.)
    async fn send_chat_action(&self, chat_id: UserId, action: &str) -> Result<(), BotError>;

    /// Get bot info
    fn bot_info(&self) -> BotInfo;
}

/// Keyboard button for inline keyboards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardButton {
    pub text: String,
    pub callback_data: Option<String>,
}

impl KeyboardButton {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            callback_data: None,
        }
    }

    pub fn with_callback(mut self, data: impl Into<String>) -> Self {
        self.callback_data = Some(data.into());
        self
    }
}

/// Bot information
#[derive(Debug, Clone)]
pub struct BotInfo {
    pub id: String,
    pub name: String,
    pub username: String,
}
