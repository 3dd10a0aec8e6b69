use super::types::{GenerateContentRequest, GenerateContentResponse};
use copygen_errors::AppError;
use std::time::Duration;

pub struct GeminiClient {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
    temperature: f32,
    max_tokens: u32,
}

impl GeminiClient {
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> Result<Self, AppError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
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
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, model);
        let request = GenerateContentRequest::new(prompt, self.temperature, self.max_tokens);

        let response = self
            .http_client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
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
            tracing::error!("Gemini error for {}: {} - {}", model, status, body);
            return Err(AppError::GenerationFailed(format!("API error: {}", status)));
        }

        let completion: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AppError::GenerationFailed(e.to_string()))?;

        completion
            .text()
            .ok_or_else(|| AppError::GenerationFailed("No candidates in response".to_string()))
    }
}
