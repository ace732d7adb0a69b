//! Recording test doubles for the transport and chat collaborators

use std::sync::Mutex;

use async_trait::async_trait;

use crate::application::errors::BotError;
use crate::domain::entities::{BotCommand, UserId};
use crate::domain::traits::{Bot, BotInfo, ConversationHandler, KeyboardButton, PreferenceStore};

/// Outbound transport call observed by [`RecordingBot`]
#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Text { chat_id: UserId, text: String },
    Menu { chat_id: UserId, text: String, rows: Vec<Vec<KeyboardButton>> },
    Ack(String),
    Commands(Vec<BotCommand>),
    Action { chat_id: UserId, action: String },
}

#[derive(Default)]
pub struct RecordingBot {
    sent: Mutex<Vec<Sent>>,
    attempts: Mutex<usize>,
    fail: bool,
}

impl RecordingBot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails with a network error
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    /// Sent calls other than acknowledgements and chat actions
    pub fn messages(&self) -> Vec<Sent> {
        self.sent()
            .into_iter()
            .filter(|s| matches!(s, Sent::Text { .. } | Sent::Menu { .. }))
            .collect()
    }

    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }

    fn record(&self, sent: Sent) -> Result<(), BotError> {
        *self.attempts.lock().unwrap() += 1;
        if self.fail {
            return Err(BotError::Network("connection refused".to_string()));
        }
        self.sent.lock().unwrap().push(sent);
        Ok(())
    }
}

#[async_trait]
impl Bot for RecordingBot {
    async fn send_message(&self, chat_id: UserId, text: &str) -> Result<i64, BotError> {
        self.record(Sent::Text { chat_id, text: text.to_string() })?;
        Ok(1)
    }

    async fn send_with_keyboard(
        &self,
        chat_id: UserId,
        text: &str,
        buttons: Vec<Vec<KeyboardButton>>,
    ) -> Result<i64, BotError> {
        self.record(Sent::Menu { chat_id, text: text.to_string(), rows: buttons })?;
        Ok(1)
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<(), BotError> {
        self.record(Sent::Ack(callback_id.to_string()))
    }

    async fn set_commands(&self, commands: &[BotCommand]) -> Result<(), BotError> {
        self.record(Sent::Commands(commands.to_vec()))
    }

    async fn send_chat_action(&self, chat_id: UserId, action: &str) -> Result<(), BotError> {
        self.record(Sent::Action { chat_id, action: action.to_string() })
    }

    fn bot_info(&self) -> BotInfo {
        BotInfo {
            id: "0".to_string(),
            name: "test".to_string(),
            username: "test_bot".to_string(),
        }
    }
}

/// Collaborator call observed by [`RecordingChat`]
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCall {
    Start { user_id: UserId, first_name: Option<String>, last_name: Option<String> },
    Stop(UserId),
    Message { user_id: UserId, text: String },
    SetModel { user_id: UserId, model: String },
    SetTemperature { user_id: UserId, temperature: f32 },
}

#[derive(Default)]
pub struct RecordingChat {
    calls: Mutex<Vec<ChatCall>>,
}

impl RecordingChat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<ChatCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: ChatCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ConversationHandler for RecordingChat {
    async fn on_start(&self, user_id: UserId, first_name: Option<&str>, last_name: Option<&str>) {
        self.record(ChatCall::Start {
            user_id,
            first_name: first_name.map(str::to_string),
            last_name: last_name.map(str::to_string),
        });
    }

    async fn on_stop(&self, user_id: UserId) {
        self.record(ChatCall::Stop(user_id));
    }

    async fn on_message(&self, user_id: UserId, text: &str) {
        self.record(ChatCall::Message { user_id, text: text.to_string() });
    }
}

#[async_trait]
impl PreferenceStore for RecordingChat {
    async fn set_model_name(&self, user_id: UserId, model: &str) {
        self.record(ChatCall::SetModel { user_id, model: model.to_string() });
    }

    async fn set_temperature(&self, user_id: UserId, temperature: f32) {
        self.record(ChatCall::SetTemperature { user_id, temperature });
    }
}
