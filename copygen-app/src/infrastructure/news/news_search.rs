use crate::config::NewsSourceSettings;
use crate::domain::NewsItem;
use copygen_errors::AppError;
use scraper::{Html, Selector};
use serde::Deserialize;
use std::time::Duration;

const MAX_ITEMS: usize = 5;
const USER_AGENT: &str = concat!("copygen/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewsSource {
    /// Scrapes the public news search results page.
    Scrape { search_url: String },
    /// Uses the JSON news search API.
    Api {
        api_url: String,
        client_id: String,
        client_secret: String,
    },
}

impl From<NewsSourceSettings> for NewsSource {
    fn from(settings: NewsSourceSettings) -> Self {
        match settings {
            NewsSourceSettings::Scrape { search_url } => Self::Scrape { search_url },
            NewsSourceSettings::Api {
                api_url,
                client_id,
                client_secret,
            } => Self::Api {
                api_url,
                client_id,
                client_secret,
            },
        }
    }
}

#[derive(Deserialize)]
struct NewsApiResponse {
    #[serde(default)]
    items: Vec<NewsApiItem>,
}

#[derive(Deserialize)]
struct NewsApiItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
}

pub struct NewsSearch {
    http_client: reqwest::Client,
    source: NewsSource,
}

impl NewsSearch {
    pub fn new(source: NewsSource, timeout: Duration) -> Result<Self, AppError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::Internal(e.to_string()))?;

        Ok(Self {
            http_client,
            source,
        })
    }

    /// Latest news for `keyword`, newest first, at most five items.
    pub async fn search(&self, keyword: &str) -> Result<Vec<NewsItem>, AppError> {
        match &self.source {
            NewsSource::Scrape { search_url } => {
                let html = self
                    .get_text(
                        self.http_client.get(search_url).query(&[
                            ("where", "news"),
                            ("query", keyword),
                            ("sm", "tab_opt"),
                            ("sort", "1"),
                        ]),
                    )
                    .await?;
                Ok(parse_search_page(&html))
            }
            NewsSource::Api {
                api_url,
                client_id,
                client_secret,
            } => {
                let display = MAX_ITEMS.to_string();
                let body = self
                    .get_text(
                        self.http_client
                            .get(api_url)
                            .header("X-Naver-Client-Id", client_id)
                            .header("X-Naver-Client-Secret", client_secret)
                            .query(&[
                                ("query", keyword),
                                ("display", display.as_str()),
                                ("sort", "date"),
                            ]),
                    )
                    .await?;
                parse_api_response(&body)
            }
        }
    }

    async fn get_text(&self, request: reqwest::RequestBuilder) -> Result<String, AppError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                AppError::Timeout
            } else {
                AppError::NewsSearchFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::NewsSearchFailed(format!("HTTP {}", status)));
        }

        response
            .text()
            .await
            .map_err(|e| AppError::NewsSearchFailed(e.to_string()))
    }
}

/// Renders items one per line as `[title]: description`.
pub fn render_news(items: &[NewsItem]) -> String {
    items
        .iter()
        .map(NewsItem::to_prompt_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn parse_search_page(html: &str) -> Vec<NewsItem> {
    let document = Html::parse_document(html);
    let (Ok(area_sel), Ok(title_sel), Ok(desc_sel)) = (
        Selector::parse(".news_area"),
        Selector::parse(".news_tit"),
        Selector::parse(".news_dsc"),
    ) else {
        return Vec::new();
    };

    document
        .select(&area_sel)
        .filter_map(|item| {
            let title = item
                .select(&title_sel)
                .next()
                .map(|el| collapse(&el.text().collect::<String>()))?;
            let description = item
                .select(&desc_sel)
                .next()
                .map(|el| collapse(&el.text().collect::<String>()))
                .unwrap_or_default();
            (!title.is_empty()).then(|| NewsItem::new(title, description))
        })
        .take(MAX_ITEMS)
        .collect()
}

fn parse_api_response(body: &str) -> Result<Vec<NewsItem>, AppError> {
    let response: NewsApiResponse =
        serde_json::from_str(body).map_err(|e| AppError::NewsSearchFailed(e.to_string()))?;

    Ok(response
        .items
        .into_iter()
        .map(|item| NewsItem::new(strip_markup(&item.title), strip_markup(&item.description)))
        .filter(|item| !item.title.is_empty())
        .take(MAX_ITEMS)
        .collect())
}

/// Drops inline tags like `<b>` and decodes entities.
fn strip_markup(text: &str) -> String {
    let fragment = Html::parse_fragment(text);
    collapse(&fragment.root_element().text().collect::<String>())
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
