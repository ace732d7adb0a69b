//! OpenAI-compatible provider - any `/chat/completions` endpoint

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::infrastructure::llm::{
    LLMConfig, LLMError, LLMMessage, LLMResponse, LLMResult, LLMUsage, LLM,
};

/// OpenAI-compatible provider
pub struct OpenAIProvider {
    api_key: Option<String>,
    api_base: String,
    client: Client,
    model: String,
}

impl OpenAIProvider {
    pub fn new(
        api_base: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            api_key,
            api_base: api_base.into(),
            client: Client::new(),
            model: model.into(),
        }
    }

    pub fn from_config(config: &LLMConfig) -> Self {
        Self::new(&config.api_base, config.api_key.clone(), &config.default_model)
    }

    /// Get base URL for API
    fn base_url(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }
}

/// API request structure
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<LLMMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

/// API response structure
#[derive(Deserialize, Debug)]
struct ChatResponse {
    model: Option<String>,
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

/// Choice in response
#[derive(Deserialize, Debug)]
struct Choice {
    message: ResponseMessage,
    finish_reason: Option<String>,
}

/// Response message
#[derive(Deserialize, Debug)]
struct ResponseMessage {
    content: Option<String>,
}

/// Usage information
#[derive(Deserialize, Debug)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[async_trait]
impl LLM for OpenAIProvider {
    fn name(&self) -> &str {
        "openai-compatible"
    }

    async fn chat(
        &self,
        messages: Vec<LLMMessage>,
        model: Option<&str>,
        temperature: Option<f32>,
        max_tokens: Option<u32>,
    ) -> LLMResult<LLMResponse> {
        let api_key = self.api_key.as_deref().ok_or(LLMError::MissingApiKey)?;
        let model = model.unwrap_or(&self.model);

        let request = ChatRequest {
            model: model.to_string(),
            messages,
            temperature,
            max_tokens,
            stream: false,
        };

        let response = self.client
            .post(self.base_url())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LLMError::NetworkError(e.to_string()))?;

        if response.status() == 429 {
            return Err(LLMError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LLMError::ApiError(format!("status: {}, body: {}", status, body)));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| LLMError::ParseError(e.to_string()))?;

        let choice = chat_response.choices
            .into_iter()
            .next()
            .ok_or(LLMError::EmptyResponse)?;

        let content = choice.message.content
            .filter(|c| !c.trim().is_empty())
            .ok_or(LLMError::EmptyResponse)?;

        let usage = chat_response.usage.map(|u| LLMUsage {
            prompt_tokens: Some(u.prompt_tokens),
            completion_tokens: Some(u.completion_tokens),
            total_tokens: Some(u.total_tokens),
        });

        Ok(LLMResponse {
            content,
            model: chat_response.model.unwrap_or_else(|| model.to_string()),
            usage,
            finish_reason: choice.finish_reason,
        })
    }
}
