use palaver_core::{ProviderConfig, ProviderError, Result, Turn};
use reqwest::Client as HttpClient;
use std::sync::Arc;

use crate::mock::MockProvider;
use crate::types::*;

/// Produces the next turn of a conversation
///
/// Implementations see the whole transcript, which always ends with a
/// non-assistant turn.
#[async_trait::async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, transcript: &[Turn]) -> Result<Turn>;
}

/// OpenAI-compatible chat completions client
pub struct OpenAiProvider {
    client: HttpClient,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
}

impl OpenAiProvider {
    pub fn new(api_key: String, model: String, base_url: Option<String>) -> Self {
        Self {
            client: HttpClient::new(),
            api_key,
            model,
            base_url: base_url.unwrap_or_else(|| palaver_core::config::DEFAULT_OPENAI_BASE_URL.to_string()),
            max_tokens: None,
            temperature: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    fn to_chat_request(&self, transcript: &[Turn]) -> ChatRequest {
        ChatRequest::builder()
            .model(self.model.clone())
            .transcript(transcript)
            .max_tokens(self.max_tokens)
            .temperature(self.temperature)
            .build()
    }
}

#[async_trait::async_trait]
impl CompletionService for OpenAiProvider {
    #[tracing::instrument(skip_all, fields(model = %self.model, turns = transcript.len()))]
    async fn complete(&self, transcript: &[Turn]) -> Result<Turn> {
        let request = self.to_chat_request(transcript);

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::transport(e.to_string()))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| ProviderError::transport(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "completion request rejected");
            return Err(ProviderError::status(status.as_u16(), body).into());
        }

        let parsed = ChatResponse::parse(&body)?;
        if let Some(usage) = &parsed.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "completion usage"
            );
        }
        Ok(parsed.into_turn()?)
    }
}

/// Factory to create completion services from config
pub struct ProviderFactory;

impl ProviderFactory {
    pub fn create_from_config(config: &ProviderConfig) -> Result<Arc<dyn CompletionService>> {
        match config {
            ProviderConfig::OpenAi { api_key, model, base_url, max_tokens, temperature, .. } => Ok(Arc::new(
                OpenAiProvider::new(api_key.clone(), model.clone(), Some(base_url.clone()))
                    .with_max_tokens(*max_tokens)
                    .with_temperature(*temperature),
            )),
            ProviderConfig::Mock { responses_file, .. } => Ok(Arc::new(MockProvider::new(responses_file.as_deref())?)),
        }
    }
}
