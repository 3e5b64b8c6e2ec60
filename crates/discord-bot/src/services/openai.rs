use eyre::{Result, WrapErr, eyre};
use medley_core::models::llm::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};

use crate::config::OpenAiConfig;

pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    config: OpenAiConfig,
}

impl OpenAiClient {
    pub fn new(http: reqwest::Client, base_url: &str, config: OpenAiConfig) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            config,
        }
    }

    /// Send a single user message and return the first reply.
    pub async fn ask(&self, question: &str) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage::user(question)],
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()
            .wrap_err("Completion request failed")?
            .json::<ChatCompletionResponse>()
            .await
            .wrap_err("Failed to decode completion")?;

        response
            .first_reply()
            .map(str::to_string)
            .ok_or_else(|| eyre!("Completion contained no reply"))
    }
}
