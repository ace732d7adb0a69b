//! Message dispatcher - Routes inbound events to handlers

use std::sync::Arc;

use super::menus::{self, MODEL_PROMPT, TEMPERATURE_PROMPT};
use super::messenger::Messenger;
use super::parser::MessageParser;
use crate::domain::entities::{AllowList, CallbackPayload, Command, InboundEvent, User, UserId};
use crate::domain::traits::{ConversationHandler, PreferenceStore};

pub const UNAUTHORIZED_NOTICE: &str = "Sorry, you are not allowed to use this bot.";
pub const TEXT_ONLY_NOTICE: &str =
    "This bot only accepts text messages. Please do not send images, stickers or other files.";
pub const INVALID_TEMPERATURE_NOTICE: &str =
    "That temperature is not valid. Please pick one from /temperature.";

/// Routes events from the transport to the conversation handler, the
/// preference store and the selection menus.
pub struct MessageDispatcher {
    parser: MessageParser,
    allow_list: AllowList,
    messenger: Messenger,
    conversation: Arc<dyn ConversationHandler>,
    preferences: Arc<dyn PreferenceStore>,
}

impl MessageDispatcher {
    pub fn new(
        allow_list: AllowList,
        messenger: Messenger,
        conversation: Arc<dyn ConversationHandler>,
        preferences: Arc<dyn PreferenceStore>,
    ) -> Self {
        Self {
            parser: MessageParser::default(),
            allow_list,
            messenger,
            conversation,
            preferences,
        }
    }

    pub async fn handle_event(&self, event: InboundEvent) {
        tracing::debug!("Handling {} from {}", event.kind(), event.user_id());
        match event {
            InboundEvent::TextMessage { user, text } => self.handle_message(user, text).await,
            InboundEvent::CallbackEvent { user_id, callback_id, payload } => {
                self.handle_callback(user_id, &callback_id, &payload).await
            }
        }
    }

    async fn handle_message(&self, user: User, text: Option<String>) {
        if !self.allow_list.contains(user.id) {
            tracing::warn!("Rejected message from unauthorized user {} ({})", user.id, user);
            self.messenger.send(user.id, UNAUTHORIZED_NOTICE).await;
            return;
        }

        let Some(text) = text else {
            self.messenger.send(user.id, TEXT_ONLY_NOTICE).await;
            return;
        };

        let command = self.parser.classify(&text);
        tracing::debug!("[{}] {}", user.id, command.name());

        match command {
            Command::Start => {
                self.conversation
                    .on_start(user.id, user.first_name.as_deref(), user.last_name.as_deref())
                    .await
            }
            Command::Stop => self.conversation.on_stop(user.id).await,
            Command::Models => {
                self.messenger.send_menu(user.id, MODEL_PROMPT, menus::model_keyboard()).await
            }
            Command::Temperature => {
                self.messenger
                    .send_menu(user.id, TEMPERATURE_PROMPT, menus::temperature_keyboard())
                    .await
            }
            Command::UnknownSlash(cmd) => {
                tracing::debug!("Ignoring unknown command from {}: {}", user.id, cmd);
            }
            Command::PlainText(text) => self.conversation.on_message(user.id, &text).await,
        }
    }

    async fn handle_callback(&self, user_id: UserId, callback_id: &str, payload: &str) {
        self.messenger.acknowledge(callback_id).await;

        if !self.allow_list.contains(user_id) {
            tracing::warn!("Ignoring callback from unauthorized user {}", user_id);
            return;
        }

        match self.parser.parse_callback(payload) {
            CallbackPayload::Model(model) => {
                self.preferences.set_model_name(user_id, &model).await;
                self.messenger
                    .send(user_id, &format!("Model switched to: {}", model))
                    .await;
            }
            CallbackPayload::Temperature(temperature) => {
                self.preferences.set_temperature(user_id, temperature).await;
                self.messenger
                    .send(user_id, &format!("Temperature set to: {}", temperature))
                    .await;
            }
            CallbackPayload::MalformedTemperature(raw) => {
                tracing::warn!("Malformed temperature payload from {}: {:?}", user_id, raw);
                self.messenger.send(user_id, INVALID_TEMPERATURE_NOTICE).await;
            }
            CallbackPayload::Unrecognized => {
                tracing::debug!("Unrecognized callback payload from {}: {:?}", user_id, payload);
            }
        }
    }
}
