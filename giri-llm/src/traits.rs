use async_trait::async_trait;
use giri_common::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmResponse {
    pub text: String,
    pub model: Option<String>,
    pub tokens_used: Option<u32>,
}

impl LlmResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            model: None,
            tokens_used: None,
        }
    }
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate a response to the given prompt with optional system prompt
    async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        max_tokens: Option<u32>,
        temperature: Option<f32>,
    ) -> Result<LlmResponse>;

    /// Get the model name being used
    fn model_name(&self) -> &str;

    /// Single prompt in, single completion out, provider defaults for the rest.
    async fn complete(&self, prompt: &str) -> Result<LlmResponse> {
        tracing::debug!(model = self.model_name(), prompt_len = prompt.len(), "llm.complete");
        self.generate(prompt, None, None, None).await
    }
}
