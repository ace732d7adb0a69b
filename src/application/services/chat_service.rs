//! Chat service - per-user conversations backed by an LLM provider

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::messaging::Messenger;
use crate::domain::entities::UserId;
use crate::domain::traits::{ConversationHandler, PreferenceStore};
use crate::infrastructure::llm::{LLMConfig, LLMMessage, LLM};

pub const STOP_NOTICE: &str = "Conversation stopped. Send a new message or /start to begin again.";
pub const FAILURE_NOTICE: &str =
    "Sorry, I could not get a response right now. Please try again later.";

/// Conversation state for one user
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub model: String,
    pub temperature: f32,
    pub history: Vec<LLMMessage>,
    /// Bumped whenever the history is reset, so late replies do not leak into a new conversation
    epoch: u64,
}

impl Session {
    fn new(config: &LLMConfig) -> Self {
        Self {
            model: config.default_model.clone(),
            temperature: config.temperature,
            history: Vec::new(),
            epoch: 0,
        }
    }

    fn reset(&mut self) {
        self.history.clear();
        self.epoch += 1;
    }
}

/// Relays plain text to the LLM and owns each user's model and temperature
pub struct ChatService {
    llm: Arc<dyn LLM>,
    messenger: Messenger,
    config: LLMConfig,
    sessions: RwLock<HashMap<UserId, Session>>,
}

impl ChatService {
    pub fn new(llm: Arc<dyn LLM>, messenger: Messenger, config: LLMConfig) -> Self {
        Self {
            llm,
            messenger,
            config,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Snapshot of a user's session, if one exists
    pub async fn session(&self, user_id: UserId) -> Option<Session> {
        self.sessions.read().await.get(&user_id).cloned()
    }

    async fn with_session<R>(&self, user_id: UserId, f: impl FnOnce(&mut Session) -> R) -> R {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .entry(user_id)
            .or_insert_with(|| Session::new(&self.config));
        f(session)
    }

    fn trim_history(&self, history: &mut Vec<LLMMessage>) {
        if history.len() > self.config.max_history {
            let excess = history.len() - self.config.max_history;
            history.drain(..excess);
        }
    }
}

#[async_trait]
impl ConversationHandler for ChatService {
    async fn on_start(&self, user_id: UserId, first_name: Option<&str>, last_name: Option<&str>) {
        let (model, temperature) = self
            .with_session(user_id, |s| {
                s.reset();
                (s.model.clone(), s.temperature)
            })
            .await;

        let name = match (first_name, last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.to_string(),
            (None, Some(last)) => last.to_string(),
            (None, None) => "there".to_string(),
        };

        tracing::info!("Conversation started for {}", user_id);
        let greeting = format!(
            "Hello, {}! Current model: {}, temperature: {}.\nSend me a message to begin.",
            name, model, temperature
        );
        self.messenger.send(user_id, &greeting).await;
    }

    async fn on_stop(&self, user_id: UserId) {
        self.with_session(user_id, Session::reset).await;
        tracing::info!("Conversation stopped for {}", user_id);
        self.messenger.send(user_id, STOP_NOTICE).await;
    }

    async fn on_message(&self, user_id: UserId, text: &str) {
        self.messenger.typing(user_id).await;

        let (request, model, temperature, epoch) = self
            .with_session(user_id, |s| {
                let mut request = Vec::with_capacity(s.history.len() + 2);
                request.push(LLMMessage::system(&self.config.system_prompt));
                request.extend(s.history.iter().cloned());
                request.push(LLMMessage::user(text));
                (request, s.model.clone(), s.temperature, s.epoch)
            })
            .await;

        tracing::debug!("Routing message from {} to {} (t={})", user_id, model, temperature);

        let response = match self
            .llm
            .chat(request, Some(&model), Some(temperature), self.config.max_tokens)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("LLM request for {} failed: {}", user_id, e);
                self.messenger.send(user_id, FAILURE_NOTICE).await;
                return;
            }
        };

        if let Some(usage) = &response.usage {
            tracing::debug!(
                "Reply for {} from {}: prompt={:?} completion={:?} total={:?} finish={:?}",
                user_id,
                response.model,
                usage.prompt_tokens,
                usage.completion_tokens,
                usage.total_tokens,
                response.finish_reason
            );
        }

        self.with_session(user_id, |s| {
            if s.epoch == epoch {
                s.history.push(LLMMessage::user(text));
                s.history.push(LLMMessage::assistant(&response.content));
                self.trim_history(&mut s.history);
            }
        })
        .await;

        self.messenger.send(user_id, &response.content).await;
    }
}

#[async_trait]
impl PreferenceStore for ChatService {
    async fn set_model_name(&self, user_id: UserId, model: &str) {
        self.with_session(user_id, |s| s.model = model.to_string()).await;
        tracing::info!("User {} switched model to {}", user_id, model);
    }

    async fn set_temperature(&self, user_id: UserId, temperature: f32) {
        self.with_session(user_id, |s| s.temperature = temperature).await;
        tracing::info!("User {} set temperature to {}", user_id, temperature);
    }
}
