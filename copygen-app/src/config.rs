use crate::domain::TextLimits;
use crate::infrastructure::fallback::ModelCandidates;
use copygen_errors::AppError;
use std::time::Duration;

const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const DEFAULT_SHEET_BASE_URL: &str = "https://docs.google.com";
const DEFAULT_NEWS_SEARCH_URL: &str = "https://search.naver.com/search.naver";
const DEFAULT_NEWS_API_URL: &str = "https://openapi.naver.com/v1/search/news.json";

const DEFAULT_GEMINI_MODELS: &str = "gemini-2.0-flash,gemini-1.5-flash,gemini-1.5-pro";
const DEFAULT_OPENROUTER_MODELS: &str = "google/gemini-2.0-flash-001,deepseek/deepseek-chat";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    Gemini,
    OpenRouter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewsSourceSettings {
    Scrape {
        search_url: String,
    },
    Api {
        api_url: String,
        client_id: String,
        client_secret: String,
    },
}

#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub provider: LlmProvider,
    pub api_key: String,
    pub endpoint: String,
    pub candidates: ModelCandidates,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct SheetSettings {
    pub base_url: String,
    pub default_id: Option<String>,
    pub default_gid: String,
    pub max_rows: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct GuardSettings {
    pub per_minute: u32,
    pub per_hour: u32,
    pub daily_requests: u32,
    pub daily_cost_cents: u32,
    pub cost_per_request_cents: u32,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub llm: LlmSettings,
    pub sheet: SheetSettings,
    pub news: NewsSourceSettings,
    pub guard: GuardSettings,
    pub http_timeout: Duration,
    pub limits: TextLimits,
    pub row_count: usize,
}

impl Settings {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let provider = match get("LLM_PROVIDER").as_deref().map(str::to_lowercase).as_deref() {
            None | Some("gemini") => LlmProvider::Gemini,
            Some("openrouter") => LlmProvider::OpenRouter,
            Some(other) => {
                return Err(AppError::Config(format!("unknown LLM_PROVIDER '{}'", other)))
            }
        };

        let (key_var, endpoint, default_models) = match provider {
            LlmProvider::Gemini => (
                "GEMINI_API_KEY",
                get("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
                DEFAULT_GEMINI_MODELS,
            ),
            LlmProvider::OpenRouter => (
                "OPENROUTER_API_KEY",
                get("OPENROUTER_BASE_URL").unwrap_or_else(|| DEFAULT_OPENROUTER_URL.to_string()),
                DEFAULT_OPENROUTER_MODELS,
            ),
        };

        let api_key = get(key_var)
            .ok_or_else(|| AppError::Config(format!("{} must be set", key_var)))?;

        let candidates = ModelCandidates::parse(
            get("MODEL_CANDIDATES").as_deref().unwrap_or(default_models),
        )?;

        let news = match get("NEWS_SOURCE").as_deref().map(str::to_lowercase).as_deref() {
            None | Some("scrape") => NewsSourceSettings::Scrape {
                search_url: get("NEWS_SEARCH_URL")
                    .unwrap_or_else(|| DEFAULT_NEWS_SEARCH_URL.to_string()),
            },
            Some("api") => NewsSourceSettings::Api {
                api_url: get("NEWS_API_URL").unwrap_or_else(|| DEFAULT_NEWS_API_URL.to_string()),
                client_id: get("NAVER_CLIENT_ID").ok_or_else(|| {
                    AppError::Config("NAVER_CLIENT_ID must be set for NEWS_SOURCE=api".to_string())
                })?,
                client_secret: get("NAVER_CLIENT_SECRET").ok_or_else(|| {
                    AppError::Config(
                        "NAVER_CLIENT_SECRET must be set for NEWS_SOURCE=api".to_string(),
                    )
                })?,
            },
            Some(other) => {
                return Err(AppError::Config(format!("unknown NEWS_SOURCE '{}'", other)))
            }
        };

        let limits = TextLimits {
            title_max_chars: parse_or(&get, "TITLE_MAX_CHARS", TextLimits::default().title_max_chars)?,
            body_max_chars: parse_or(&get, "BODY_MAX_CHARS", TextLimits::default().body_max_chars)?,
        };
        if limits.title_max_chars == 0 || limits.body_max_chars == 0 {
            return Err(AppError::Config(
                "TITLE_MAX_CHARS and BODY_MAX_CHARS must be positive".to_string(),
            ));
        }

        Ok(Self {
            llm: LlmSettings {
                provider,
                api_key,
                endpoint,
                candidates,
                temperature: parse_or(&get, "LLM_TEMPERATURE", 0.9)?,
                max_tokens: parse_or(&get, "LLM_MAX_TOKENS", 2048)?,
                timeout: Duration::from_secs(parse_or(&get, "LLM_TIMEOUT_SECS", 60)?),
            },
            sheet: SheetSettings {
                base_url: get("SHEET_BASE_URL").unwrap_or_else(|| DEFAULT_SHEET_BASE_URL.to_string()),
                default_id: get("SHEET_ID"),
                default_gid: get("SHEET_GID").unwrap_or_else(|| "0".to_string()),
                max_rows: parse_or(&get, "SHEET_MAX_ROWS", 30)?,
            },
            news,
            guard: GuardSettings {
                per_minute: parse_or(&get, "RATE_LIMIT_PER_MINUTE", 5)?,
                per_hour: parse_or(&get, "RATE_LIMIT_PER_HOUR", 20)?,
                daily_requests: parse_or(&get, "DAILY_REQUEST_LIMIT", 100)?,
                daily_cost_cents: parse_or(&get, "DAILY_COST_LIMIT_CENTS", 500)?,
                cost_per_request_cents: parse_or(&get, "COST_PER_REQUEST_CENTS", 5)?,
            },
            http_timeout: Duration::from_secs(parse_or(&get, "HTTP_TIMEOUT_SECS", 5)?),
            limits,
            row_count: parse_or(&get, "ROW_COUNT", 10)?,
        })
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .parse()
            .map_err(|_| AppError::Config(format!("{} has an invalid value '{}'", key, raw))),
        None => Ok(default),
    }
}
