use super::types::{ChatCompletionRequest, ChatCompletionResponse};
use copygen_errors::AppError;
use std::time::Duration;

pub struct OpenRouterClient {
    http_client: reqwest::Client,
    api_key: String,
    endpoint: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenRouterClient {
    pub fn new(api_key: String, endpoint: String, timeout: Duration) -> Result<Self, AppError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key,
            endpoint,
            temperature: 0.9,
            max_tokens: 2048,
        })
    }

    pub fn with_generation(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    pub async fn generate(&self, model: &str, prompt: &str) -> Result<String, AppError> {
        let request = ChatCompletionRequest::new(model, prompt, self.max_tokens, self.temperature);

        let response = self
            .http_client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .header("X-Title", "Copygen")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::Timeout
                } else {
                    AppError::GenerationFailed(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("OpenRouter error for {}: {} - {}", model, status, body);
            return Err(AppError::GenerationFailed(format!("API error: {}", status)));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AppError::GenerationFailed(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AppError::GenerationFailed("No response from AI".to_string()))
    }
}
