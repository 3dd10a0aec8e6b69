use super::post_process::post_process;
use super::prompt::{build_copy_prompt, PromptContext};
use crate::config::{LlmProvider, Settings};
use crate::domain::{CopyPlan, CopyRequest, TextLimits};
use crate::infrastructure::fallback::{try_in_order, ModelCandidates};
use crate::infrastructure::gemini::GeminiClient;
use crate::infrastructure::news::{render_news, NewsSearch};
use crate::infrastructure::openrouter::OpenRouterClient;
use crate::infrastructure::security::InputSanitizer;
use crate::infrastructure::sheet::SheetFetcher;
use copygen_errors::AppError;

pub const NO_SHEET_DATA: &str = "데이터 없음.";
pub const NO_NEWS: &str = "검색 결과 없음";
pub const NEWS_UNAVAILABLE: &str = "뉴스 검색 실패 (기본 정보로 진행)";

pub enum LlmBackend {
    Gemini(GeminiClient),
    OpenRouter(OpenRouterClient),
}

impl LlmBackend {
    pub async fn generate(&self, model: &str, prompt: &str) -> Result<String, AppError> {
        match self {
            LlmBackend::Gemini(client) => client.generate(model, prompt).await,
            LlmBackend::OpenRouter(client) => client.generate(model, prompt).await,
        }
    }

    /// Returns the first candidate model that produced text, and that text.
    pub async fn generate_with_fallback(
        &self,
        candidates: &ModelCandidates,
        prompt: &str,
    ) -> Result<(String, String), AppError> {
        try_in_order(candidates, |model| async move {
            self.generate(&model, prompt).await
        })
        .await
    }
}

pub struct GenerateCopy {
    sheet: SheetFetcher,
    news: NewsSearch,
    backend: LlmBackend,
    candidates: ModelCandidates,
    limits: TextLimits,
    row_count: usize,
    default_sheet_id: Option<String>,
    default_sheet_gid: String,
}

impl GenerateCopy {
    pub fn new(
        sheet: SheetFetcher,
        news: NewsSearch,
        backend: LlmBackend,
        candidates: ModelCandidates,
    ) -> Self {
        Self {
            sheet,
            news,
            backend,
            candidates,
            limits: TextLimits::default(),
            row_count: 10,
            default_sheet_id: None,
            default_sheet_gid: "0".to_string(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, AppError> {
        let llm = &settings.llm;
        let backend = match llm.provider {
            LlmProvider::Gemini => LlmBackend::Gemini(
                GeminiClient::new(llm.api_key.clone(), llm.endpoint.clone(), llm.timeout)?
                    .with_generation(llm.temperature, llm.max_tokens),
            ),
            LlmProvider::OpenRouter => LlmBackend::OpenRouter(
                OpenRouterClient::new(llm.api_key.clone(), llm.endpoint.clone(), llm.timeout)?
                    .with_generation(llm.temperature, llm.max_tokens),
            ),
        };

        let sheet = SheetFetcher::new(
            settings.sheet.base_url.clone(),
            settings.sheet.max_rows,
            settings.http_timeout,
        )?;
        let news = NewsSearch::new(settings.news.clone().into(), settings.http_timeout)?;

        Ok(Self::new(sheet, news, backend, llm.candidates.clone())
            .with_limits(settings.limits, settings.row_count)
            .with_default_sheet(
                settings.sheet.default_id.clone(),
                settings.sheet.default_gid.clone(),
            ))
    }

    pub fn with_limits(mut self, limits: TextLimits, row_count: usize) -> Self {
        self.limits = limits;
        self.row_count = row_count;
        self
    }

    pub fn with_default_sheet(mut self, sheet_id: Option<String>, gid: String) -> Self {
        self.default_sheet_id = sheet_id;
        self.default_sheet_gid = gid;
        self
    }

    /// Expects a request that already went through `InputSanitizer::validate_request`.
    pub async fn execute(&self, request: CopyRequest) -> Result<CopyPlan, AppError> {
        let news = self.gather_news(&request.topic).await;
        let reference = self.gather_sheet(&request).await;

        let prompt = build_copy_prompt(
            &request,
            &PromptContext {
                reference: &reference,
                news: &news,
                limits: self.limits,
                row_count: self.row_count,
            },
        );

        let (model, raw) = self
            .backend
            .generate_with_fallback(&self.candidates, &prompt)
            .await?;

        let rows = post_process(&raw, self.limits)?;
        tracing::info!(
            "Generated {} rows for '{}' with {}",
            rows.len(),
            request.topic,
            model
        );

        Ok(CopyPlan::new(request.topic, model, rows))
    }

    async fn gather_news(&self, topic: &str) -> String {
        match self.news.search(topic).await {
            Ok(items) if items.is_empty() => NO_NEWS.to_string(),
            Ok(items) => InputSanitizer::sanitize_context(&render_news(&items)),
            Err(e) => {
                tracing::warn!("News search failed for '{}': {}", topic, e);
                NEWS_UNAVAILABLE.to_string()
            }
        }
    }

    async fn gather_sheet(&self, request: &CopyRequest) -> String {
        let Some(sheet_id) = request
            .sheet_id
            .as_deref()
            .or(self.default_sheet_id.as_deref())
        else {
            tracing::info!("No sheet configured, generating without reference rows");
            return NO_SHEET_DATA.to_string();
        };
        let gid = request
            .sheet_gid
            .as_deref()
            .unwrap_or(&self.default_sheet_gid);

        match self.sheet.fetch(sheet_id, gid).await {
            Ok(Some(table)) => InputSanitizer::sanitize_table(&table),
            Ok(None) => NO_SHEET_DATA.to_string(),
            Err(e) => {
                tracing::warn!("Sheet fetch failed for {} (gid {}): {}", sheet_id, gid, e);
                NO_SHEET_DATA.to_string()
            }
        }
    }
}
