use async_trait::async_trait;
use crate::domain::entities::UserId;

/// Receives conversation lifecycle events and plain text from the dispatcher.
///
/// Implementations own any reply they produce; the dispatcher never waits on
/// a result.
#[async_trait]
pub trait ConversationHandler: Send + Sync {
    async fn on_start(&self, user_id: UserId, first_name: Option<&str>, last_name: Option<&str>);

    async fn on_stop(&self, user_id: UserId);

    async fn on_message(&self, user_id: UserId, text: &str);
}

/// Per-user chat preferences, owned by the chat backend
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn set_model_name(&self, user_id: UserId, model: &str);

    async fn set_temperature(&self, user_id: UserId, temperature: f32);
}
