use copygen_errors::AppError;
use std::future::Future;

/// Ordered, de-duplicated, never-empty list of model identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCandidates(Vec<String>);

impl ModelCandidates {
    pub fn new<I, S>(models: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ordered: Vec<String> = Vec::new();
        for model in models {
            let model = model.as_ref().trim();
            if !model.is_empty() && !ordered.iter().any(|m| m == model) {
                ordered.push(model.to_string());
            }
        }

        if ordered.is_empty() {
            return Err(AppError::Config("model candidate list is empty".to_string()));
        }

        Ok(Self(ordered))
    }

    /// Parses a comma-separated list such as `gemini-2.0-flash,gemini-1.5-flash`.
    pub fn parse(list: &str) -> Result<Self, AppError> {
        Self::new(list.split(','))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }
}

/// Runs `attempt` against each candidate in order and returns the first
/// model whose response is non-empty, together with that response.
pub async fn try_in_order<F, Fut>(
    candidates: &ModelCandidates,
    mut attempt: F,
) -> Result<(String, String), AppError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<String, AppError>>,
{
    let mut last_failure = String::new();

    for model in candidates.iter() {
        match attempt(model.clone()).await {
            Ok(text) if !text.trim().is_empty() => {
                tracing::info!("Model {} answered", model);
                return Ok((model.clone(), text));
            }
            Ok(_) => {
                tracing::warn!("Model {} returned an empty response, trying next", model);
                last_failure = format!("{}: empty response", model);
            }
            Err(e) => {
                tracing::warn!("Model {} failed: {}, trying next", model, e);
                last_failure = format!("{}: {}", model, e);
            }
        }
    }

    Err(AppError::NoModelAvailable(last_failure))
}
