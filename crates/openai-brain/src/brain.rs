//! OpenAiBrain implementation.

use brain_core::{async_trait, Brain, BrainError, CompletionRequest};
use reqwest::{Client, Response};
use tracing::{debug, info, warn};

use crate::api_types::{
    ApiError, ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ModelList,
};
use crate::config::OpenAiBrainConfig;

/// A brain that forwards conversations to an OpenAI-compatible API.
///
/// OpenAiBrain holds no conversation state; every call carries the full
/// window supplied by the caller.
pub struct OpenAiBrain {
    client: Client,
    config: OpenAiBrainConfig,
}

impl OpenAiBrain {
    /// Create a new OpenAiBrain with the given configuration.
    pub fn new(config: OpenAiBrainConfig) -> Result<Self, BrainError> {
        if config.api_key.trim().is_empty() {
            return Err(BrainError::Configuration("API key is empty".to_string()));
        }

        let client = Client::builder()
            .build()
            .map_err(|e| {
                BrainError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        info!(
            "OpenAiBrain initialized with api: {}, default model: {}",
            config.api_url, config.model
        );

        Ok(Self { client, config })
    }

    /// Create an OpenAiBrain from environment variables.
    ///
    /// See [`OpenAiBrainConfig::from_env`] for required environment variables.
    pub fn from_env() -> Result<Self, BrainError> {
        Self::new(OpenAiBrainConfig::from_env()?)
    }

    /// Get the configuration.
    pub fn config(&self) -> &OpenAiBrainConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/v1/{}", self.config.api_url, path)
    }

    /// Turn a non-success response into a `BrainError`.
    async fn error_from_response(response: Response) -> BrainError {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();

        if let Ok(api_error) = serde_json::from_str::<ApiError>(&error_text) {
            let kind = api_error.error.error_type.unwrap_or_else(|| "error".to_string());
            return BrainError::ProcessingFailed(format!(
                "API error ({} {}): {}",
                status.as_u16(),
                kind,
                api_error.error.message
            ));
        }

        BrainError::ProcessingFailed(format!("API error ({}): {}", status.as_u16(), error_text))
    }

    async fn chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, BrainError> {
        debug!(
            "Sending chat completion: model={}, messages={}",
            request.model,
            request.messages.len()
        );

        let response = self
            .client
            .post(self.endpoint("chat/completions"))
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| BrainError::Network(format!("Failed to send request: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        response
            .json()
            .await
            .map_err(|e| BrainError::ProcessingFailed(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl Brain for OpenAiBrain {
    async fn complete(&self, request: CompletionRequest) -> Result<String, BrainError> {
        let model = if request.model.is_empty() {
            self.config.model.clone()
        } else {
            request.model
        };

        let api_request = ChatCompletionRequest {
            model,
            messages: request.messages.iter().map(ChatMessage::from).collect(),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let completion = self.chat_completion(&api_request).await?;

        if let Some(usage) = &completion.usage {
            debug!(
                "Token usage ({}) - prompt: {}, completion: {}, total: {}",
                completion.model, usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        let choice = completion.choices.into_iter().next();
        if let Some(reason) = choice.as_ref().and_then(|c| c.finish_reason.as_deref()) {
            if reason != "stop" {
                warn!("Completion finished with reason: {}", reason);
            }
        }

        Ok(choice
            .and_then(|c| c.message.content)
            .map(|text| text.trim().to_string())
            .unwrap_or_default())
    }

    async fn list_models(&self) -> Result<Vec<String>, BrainError> {
        let response = self
            .client
            .get(self.endpoint("models"))
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(|e| BrainError::Network(format!("Failed to list models: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let list: ModelList = response
            .json()
            .await
            .map_err(|e| {
                BrainError::ProcessingFailed(format!("Failed to parse model list: {}", e))
            })?;

        let mut ids: Vec<String> = list.data.into_iter().map(|m| m.id).collect();
        ids.sort();
        Ok(ids)
    }

    fn name(&self) -> &str {
        "OpenAiBrain"
    }
}
