use super::{User, UserId};

/// An event delivered by the messaging transport. Consumed exactly once.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    /// A chat message. `text` is `None` for attachment-only messages.
    TextMessage { user: User, text: Option<String> },
    /// An inline button press.
    CallbackEvent {
        user_id: UserId,
        callback_id: String,
        payload: String,
    },
}

impl InboundEvent {
    pub fn text(user: User, text: impl Into<String>) -> Self {
        InboundEvent::TextMessage {
            user,
            text: Some(text.into()),
        }
    }

    pub fn callback(
        user_id: UserId,
        callback_id: impl Into<String>,
        payload: impl Into<String>,
    ) -> Self {
        InboundEvent::CallbackEvent {
            user_id,
            callback_id: callback_id.into(),
            payload: payload.into(),
        }
    }

    pub fn user_id(&self) -> UserId {
        match self {
            InboundEvent::TextMessage { user, .. } => user.id,
            InboundEvent::CallbackEvent { user_id, .. } => *user_id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            InboundEvent::TextMessage { .. } => "message",
            InboundEvent::CallbackEvent { .. } => "callback",
        }
    }
}
