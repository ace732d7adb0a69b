//! Telegram adapter

mod poller;

pub use poller::UpdatePoller;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::errors::BotError;
use crate::domain::entities::{BotCommand, InboundEvent, User as DomainUser, UserId};
use crate::domain::traits::{Bot, BotInfo, KeyboardButton};

/// Extra time on top of the long-polling timeout before a getUpdates request is abandoned
const POLL_GRACE_SECS: u64 = 10;

/// Bot API description when the Markdown in a message does not parse
const MARKDOWN_REJECTED: &str = "can't parse entities";

/// Telegram update type
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Message {
    pub message_id: i64,
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    pub message: Option<Message>,
    pub data: Option<String>,
}

impl Update {
    /// Convert to a transport-neutral event. Updates of other kinds yield `None`.
    ///
    /// Replies go to the chat, so the chat id is used as the user id.
    pub fn into_event(self) -> Option<InboundEvent> {
        if let Some(message) = self.message {
            let mut user = DomainUser::new(message.chat.id);
            if let Some(from) = message.from {
                user.username = from.username;
                user.first_name = from.first_name;
                user.last_name = from.last_name;
            }
            return Some(InboundEvent::TextMessage {
                user,
                text: message.text,
            });
        }

        self.callback_query.map(|query| {
            let user_id = query
                .message
                .as_ref()
                .map(|m| m.chat.id)
                .unwrap_or(query.from.id);
            InboundEvent::callback(user_id, query.id, query.data.unwrap_or_default())
        })
    }
}

/// Envelope of every Bot API response
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Serialize)]
struct InlineKeyboardButton {
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    callback_data: Option<String>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum ReplyMarkup {
    Inline { inline_keyboard: Vec<Vec<InlineKeyboardButton>> },
}

#[derive(Deserialize)]
struct MessageResult {
    message_id: i64,
}

/// Telegram bot adapter
pub struct TelegramAdapter {
    token: String,
    api_url: String,
    client: Client,
    info: BotInfo,
}

impl TelegramAdapter {
    pub fn new(token: impl Into<String>, api_url: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_url: api_url.into(),
            client: Client::new(),
            info: BotInfo {
                id: "unknown".to_string(),
                name: "relay-bot".to_string(),
                username: "relay_bot".to_string(),
            },
        }
    }

    /// Get the API URL for a method
    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_url.trim_end_matches('/'), self.token, method)
    }

    /// POST a JSON request and unwrap the `{ok, result}` envelope
    async fn call<Req, Res>(
        &self,
        method: &str,
        request: &Req,
        timeout: Option<Duration>,
    ) -> Result<Res, BotError>
    where
        Req: Serialize + ?Sized + Sync,
        Res: DeserializeOwned,
    {
        let mut builder = self.client.post(self.api_url(method)).json(request);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| BotError::Network(e.to_string()))?;

        let status = response.status();
        let envelope: ApiResponse<Res> = response.json().await.map_err(|e| {
            if status.is_success() {
                BotError::Parse(e.to_string())
            } else {
                BotError::Network(format!("{} failed with status {}", method, status))
            }
        })?;

        if !envelope.ok {
            let description = envelope.description.unwrap_or_else(|| status.to_string());
            return Err(BotError::Api(format!("{}: {}", method, description)));
        }

        envelope
            .result
            .ok_or_else(|| BotError::Parse(format!("{} returned no result", method)))
    }

    /// Fetch bot info from Telegram API
    pub async fn fetch_bot_info(&mut self) -> Result<(), BotError> {
        #[derive(Deserialize)]
        struct BotInfoResponse {
            id: i64,
            first_name: String,
            username: Option<String>,
        }

        let me: BotInfoResponse = self.call("getMe", &serde_json::json!({}), None).await?;

        self.info = BotInfo {
            id: me.id.to_string(),
            name: me.first_name,
            username: me.username.unwrap_or_default(),
        };

        Ok(())
    }

    /// Get updates from Telegram using getUpdates API
    pub async fn get_updates(&self, offset: i64, timeout: u64) -> Result<Vec<Update>, BotError> {
        #[derive(Serialize)]
        struct GetUpdatesRequest {
            offset: i64,
            timeout: u64,
            allowed_updates: Vec<String>,
        }

        let request = GetUpdatesRequest {
            offset,
            timeout,
            allowed_updates: vec!["message".to_string(), "callback_query".to_string()],
        };

        self.call("getUpdates", &request, Some(Duration::from_secs(timeout + POLL_GRACE_SECS)))
            .await
    }

    /// Get the next update offset
    pub fn get_next_offset(updates: &[Update]) -> Option<i64> {
        updates.iter().map(|u| u.update_id + 1).max()
    }
}

#[async_trait]
impl Bot for TelegramAdapter {
    async fn send_message(&self, chat_id: UserId, text: &str) -> Result<i64, BotError> {
        #[derive(Serialize)]
        struct SendMessageRequest<'a> {
            chat_id: UserId,
            text: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            parse_mode: Option<&'static str>,
        }

        tracing::debug!("Sending to {}: {}", chat_id, text);

        let request = SendMessageRequest {
            chat_id,
            text,
            parse_mode: Some("Markdown"),
        };
        let first: Result<MessageResult, BotError> = self.call("sendMessage", &request, None).await;
        let sent = match first {
            Ok(sent) => sent,
            Err(BotError::Api(description)) if description.contains(MARKDOWN_REJECTED) => {
                tracing::warn!(
                    "Markdown rejected for {}, sending plain text: {}",
                    chat_id,
                    description
                );
                let plain = SendMessageRequest {
                    parse_mode: None,
                    ..request
                };
                self.call("sendMessage", &plain, None).await?
            }
            Err(e) => return Err(e),
        };
        Ok(sent.message_id)
    }

    async fn send_with_keyboard(
        &self,
        chat_id: UserId,
        text: &str,
        buttons: Vec<Vec<KeyboardButton>>,
    ) -> Result<i64, BotError> {
        #[derive(Serialize)]
        struct SendMessageRequest<'a> {
            chat_id: UserId,
            text: &'a str,
            reply_markup: ReplyMarkup,
        }

        tracing::debug!("Sending with keyboard to {}: {}", chat_id, text);

        let inline_keyboard = buttons
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|btn| InlineKeyboardButton {
                        text: btn.text,
                        callback_data: btn.callback_data,
                    })
                    .collect()
            })
            .collect();

        let request = SendMessageRequest {
            chat_id,
            text,
            reply_markup: ReplyMarkup::Inline { inline_keyboard },
        };
        let sent: MessageResult = self.call("sendMessage", &request, None).await?;
        Ok(sent.message_id)
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct AnswerRequest<'a> {
            callback_query_id: &'a str,
        }

        let _: bool = self
            .call("answerCallbackQuery", &AnswerRequest { callback_query_id: callback_id }, None)
            .await?;
        Ok(())
    }

    async fn set_commands(&self, commands: &[BotCommand]) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct Command<'a> {
            command: &'a str,
            description: &'a str,
        }

        #[derive(Serialize)]
        struct SetMyCommandsRequest<'a> {
            commands: Vec<Command<'a>>,
        }

        // The Bot API wants command names without the leading slash
        let request = SetMyCommandsRequest {
            commands: commands
                .iter()
                .map(|c| Command {
                    command: c.command.trim_start_matches('/'),
                    description: &c.description,
                })
                .collect(),
        };

        let _: bool = self.call("setMyCommands", &request, None).await?;
        tracing::info!("Registered {} bot commands with Telegram", commands.len());
        Ok(())
    }

    async fn send_chat_action(&self, chat_id: UserId, action: &str) -> Result<(), BotError> {
        #[derive(Serialize)]
        struct SendChatActionRequest<'a> {
            chat_id: UserId,
            action: &'a str,
        }

        let _: bool = self
            .call("sendChatAction", &SendChatActionRequest { chat_id, action }, None)
            .await?;
        Ok(())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}
