//! Long-polling loop feeding the dispatcher

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use super::{TelegramAdapter, Update};
use crate::application::errors::BotError;
use crate::application::messaging::MessageDispatcher;
use crate::domain::entities::InboundEvent;
use crate::infrastructure::config::TelegramConfig;

/// Pulls updates with getUpdates and hands each event to the dispatcher
pub struct UpdatePoller {
    adapter: Arc<TelegramAdapter>,
    offset: i64,
    timeout_secs: u64,
    retry_delay: Duration,
}

impl UpdatePoller {
    pub fn new(adapter: Arc<TelegramAdapter>, config: &TelegramConfig) -> Self {
        Self {
            adapter,
            offset: 0,
            timeout_secs: config.poll_timeout_secs,
            retry_delay: Duration::from_secs(config.retry_delay_secs),
        }
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// One getUpdates round trip. Advances the offset past everything received,
    /// including updates that do not convert to an event.
    pub async fn poll_once(&mut self) -> Result<Vec<InboundEvent>, BotError> {
        let updates = self.adapter.get_updates(self.offset, self.timeout_secs).await?;
        if let Some(next) = TelegramAdapter::get_next_offset(&updates) {
            self.offset = next;
        }
        if !updates.is_empty() {
            tracing::debug!("Received {} updates", updates.len());
        }
        Ok(updates.into_iter().filter_map(Update::into_event).collect())
    }

    /// Poll until `shutdown` resolves. Each event runs in its own task so a
    /// slow send never blocks intake; polling errors are logged and retried.
    pub async fn run<S>(mut self, dispatcher: Arc<MessageDispatcher>, shutdown: S)
    where
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let retry_delay = self.retry_delay;

        tracing::info!("Starting message loop...");
        loop {
            let result = tokio::select! {
                _ = &mut shutdown => break,
                result = self.poll_once() => result,
            };

            match result {
                Ok(events) => {
                    for event in events {
                        let dispatcher = dispatcher.clone();
                        tokio::spawn(async move {
                            dispatcher.handle_event(event).await;
                        });
                    }
                }
                Err(e) => {
                    tracing::error!("Polling error occurred: {}", e);
                    tokio::select! {
                        _ = &mut shutdown => break,
                        _ = tokio::time::sleep(retry_delay) => {}
                    }
                }
            }
        }
        tracing::info!("Message loop stopped at offset {}", self.offset());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::messaging::Messenger;
    use crate::application::testing::{ChatCall, RecordingBot, RecordingChat};
    use crate::domain::entities::{AllowList, User};
    use mockito::Matcher;
    use serde_json::json;

    const TOKEN: &str = "123:test";

    fn config() -> TelegramConfig {
        TelegramConfig {
            poll_timeout_secs: 1,
            retry_delay_secs: 0,
            ..TelegramConfig::default()
        }
    }

    fn updates_body() -> String {
        json!({
            "ok": true,
            "result": [
                {
                    "update_id": 500,
                    "message": {
                        "message_id": 1,
                        "from": {"id": 7, "is_bot": false, "first_name": "Ada"},
                        "chat": {"id": 7, "type": "private"},
                        "date": 0,
                        "text": "hello"
                    }
                },
                {
                    "update_id": 501,
                    "edited_message": {"message_id": 1, "chat": {"id": 7, "type": "private"}, "date": 0}
                },
                {
                    "update_id": 502,
                    "callback_query": {
                        "id": "cb",
                        "from": {"id": 7, "is_bot": false, "first_name": "Ada"},
                        "chat_instance": "ci",
                        "data": "model:gpt-4o"
                    }
                }
            ]
        })
        .to_string()
    }

    #[tokio::test]
    async fn poll_once_converts_updates_and_advances_offset() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", format!("/bot{}/getUpdates", TOKEN).as_str())
            .match_body(Matcher::PartialJson(json!({"offset": 0, "timeout": 1})))
            .with_status(200)
            .with_body(updates_body())
            .create_async()
            .await;

        let adapter = Arc::new(TelegramAdapter::new(TOKEN, server.url()));
        let mut poller = UpdatePoller::new(adapter, &config());
        let events = poller.poll_once().await.unwrap();

        mock.assert_async().await;
        assert_eq!(
            events,
            vec![
                InboundEvent::text(User::new(7).with_name("Ada", None::<String>), "hello"),
                InboundEvent::callback(7, "cb", "model:gpt-4o"),
            ]
        );
        assert_eq!(poller.offset(), 503);
    }

    #[tokio::test]
    async fn polling_error_keeps_offset() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", format!("/bot{}/getUpdates", TOKEN).as_str())
            .with_status(409)
            .with_body(json!({
                "ok": false,
                "error_code": 409,
                "description": "Conflict: terminated by other getUpdates request"
            }).to_string())
            .create_async()
            .await;

        let adapter = Arc::new(TelegramAdapter::new(TOKEN, server.url()));
        let mut poller = UpdatePoller::new(adapter, &config());
        assert!(matches!(poller.poll_once().await, Err(BotError::Api(_))));
        assert_eq!(poller.offset(), 0);
    }

    #[tokio::test]
    async fn run_dispatches_events_until_shutdown() {
        let mut server = mockito::Server::new_async().await;
        let _first = server
            .mock("POST", format!("/bot{}/getUpdates", TOKEN).as_str())
            .match_body(Matcher::PartialJson(json!({"offset": 0})))
            .with_status(200)
            .with_body(updates_body())
            .create_async()
            .await;
        let _rest = server
            .mock("POST", format!("/bot{}/getUpdates", TOKEN).as_str())
            .match_body(Matcher::PartialJson(json!({"offset": 503})))
            .with_status(200)
            .with_body(r#"{"ok": true, "result": []}"#)
            .create_async()
            .await;

        let adapter = Arc::new(TelegramAdapter::new(TOKEN, server.url()));
        let chat = Arc::new(RecordingChat::new());
        let dispatcher = Arc::new(MessageDispatcher::new(
            AllowList::new([7]),
            Messenger::new(Arc::new(RecordingBot::new())),
            chat.clone(),
            chat.clone(),
        ));

        let poller = UpdatePoller::new(adapter, &config());
        poller
            .run(dispatcher, tokio::time::sleep(Duration::from_millis(300)))
            .await;
        // let spawned handlers finish
        tokio::time::sleep(Duration::from_millis(50)).await;

        let calls = chat.calls();
        assert!(calls.contains(&ChatCall::Message { user_id: 7, text: "hello".to_string() }));
        assert!(calls.contains(&ChatCall::SetModel { user_id: 7, model: "gpt-4o".to_string() }));
    }

    #[tokio::test]
    async fn run_keeps_polling_after_an_error() {
        let mut server = mockito::Server::new_async().await;
        let outage = server
            .mock("POST", format!("/bot{}/getUpdates", TOKEN).as_str())
            .with_status(502)
            .with_body("bad gateway")
            .expect(1)
            .create_async()
            .await;
        let _recovered = server
            .mock("POST", format!("/bot{}/getUpdates", TOKEN).as_str())
            .match_body(Matcher::PartialJson(json!({"offset": 0})))
            .with_status(200)
            .with_body(updates_body())
            .create_async()
            .await;
        let _rest = server
            .mock("POST", format!("/bot{}/getUpdates", TOKEN).as_str())
            .match_body(Matcher::PartialJson(json!({"offset": 503})))
            .with_status(200)
            .with_body(r#"{"ok": true, "result": []}"#)
            .create_async()
            .await;

        let adapter = Arc::new(TelegramAdapter::new(TOKEN, server.url()));
        let chat = Arc::new(RecordingChat::new());
        let dispatcher = Arc::new(MessageDispatcher::new(
            AllowList::new([7]),
            Messenger::new(Arc::new(RecordingBot::new())),
            chat.clone(),
            chat.clone(),
        ));

        let poller = UpdatePoller::new(adapter, &config());
        poller
            .run(dispatcher, tokio::time::sleep(Duration::from_millis(300)))
            .await;
        tokio::time::sleep(Duration::from_millis(50)).await;

        outage.assert_async().await;
        let hello = ChatCall::Message { user_id: 7, text: "hello".to_string() };
        let delivered = chat.calls().into_iter().filter(|c| *c == hello).count();
        assert_eq!(delivered, 1);
    }
}
