//! Fire-and-forget outbound messaging
//!
//! Every method returns `()`: transport failures are logged here and never
//! reach the caller. There is no retry.

use std::sync::Arc;

use crate::domain::entities::UserId;
use crate::domain::traits::{Bot, KeyboardButton};

/// Best-effort sender wrapping the transport
#[derive(Clone)]
pub struct Messenger {
    bot: Arc<dyn Bot>,
}

impl Messenger {
    pub fn new(bot: Arc<dyn Bot>) -> Self {
        Self { bot }
    }

    /// Send Markdown text to a user
    pub async fn send(&self, user_id: UserId, text: &str) {
        if let Err(e) = self.bot.send_message(user_id, text).await {
            tracing::error!("Failed to send message to {}: {}", user_id, e);
        }
    }

    /// Send a prompt with an inline keyboard
    pub async fn send_menu(&self, user_id: UserId, prompt: &str, rows: Vec<Vec<KeyboardButton>>) {
        if let Err(e) = self.bot.send_with_keyboard(user_id, prompt, rows).await {
            tracing::error!("Failed to send menu to {}: {}", user_id, e);
        }
    }

    pub async fn acknowledge(&self, callback_id: &str) {
        if let Err(e) = self.bot.answer_callback(callback_id).await {
            tracing::warn!("Failed to answer callback {}: {}", callback_id, e);
        }
    }

    pub async fn typing(&self, user_id: UserId) {
        if let Err(e) = self.bot.send_chat_action(user_id, "typing").await {
            tracing::debug!("Failed to send typing action to {}: {}", user_id, e);
        }
    }
}
