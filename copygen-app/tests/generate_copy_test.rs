use copygen_app::application::{GenerateCopy, LlmBackend, NEWS_UNAVAILABLE, NO_SHEET_DATA};
use copygen_app::config::Settings;
use copygen_app::domain::CopyRequest;
use copygen_app::infrastructure::fallback::ModelCandidates;
use copygen_app::infrastructure::gemini::GeminiClient;
use copygen_app::infrastructure::news::{NewsSearch, NewsSource};
use copygen_app::infrastructure::sheet::SheetFetcher;
use copygen_app::AppContext;
use copygen_errors::AppError;
use mockito::{Matcher, ServerGuard};
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

const MODEL_OUTPUT: &str = "```
대분류|캠페인|상세타겟|추천 콘텐츠|제목|내용
예능|런칭알림|30대 직장인|환승연애4|💘 드디어 공개!|지금 바로 확인하세요 🔥
예능|런칭알림|20대 여성|환승연애4|다시 만난 그들|X의 마음을 확인해보세요
```";

fn gemini_body(text: &str) -> String {
    serde_json::json!({
        "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}}]
    })
    .to_string()
}

fn generator(server: &ServerGuard, models: &str) -> GenerateCopy {
    let sheet = SheetFetcher::new(server.url(), 30, TIMEOUT).unwrap();
    let news = NewsSearch::new(
        NewsSource::Scrape {
            search_url: format!("{}/search.naver", server.url()),
        },
        TIMEOUT,
    )
    .unwrap();
    let backend =
        LlmBackend::Gemini(GeminiClient::new("test-key".to_string(), server.url(), TIMEOUT).unwrap());

    GenerateCopy::new(sheet, news, backend, ModelCandidates::parse(models).unwrap())
        .with_default_sheet(Some("SHEET".to_string()), "0".to_string())
}

#[tokio::test]
async fn test_generation_falls_back_and_uses_context() {
    let mut server = mockito::Server::new_async().await;

    let _sheet = server
        .mock("GET", "/spreadsheets/d/SHEET/export")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("제목,내용\n지난주 인기작,놓치면 후회할 이야기\n")
        .create_async()
        .await;
    let _news = server
        .mock("GET", "/search.naver")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            r#"<div class="news_area"><a class="news_tit">시청률 1위</a><div class="news_dsc">역대급 반응</div></div>"#,
        )
        .create_async()
        .await;

    let retired = server
        .mock("POST", "/v1beta/models/old-model:generateContent")
        .with_status(404)
        .expect(1)
        .create_async()
        .await;
    let working = server
        .mock("POST", "/v1beta/models/new-model:generateContent")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("환승연애4".to_string()),
            Matcher::Regex(r"\| 지난주 인기작 \| 놓치면 후회할 이야기 \|".to_string()),
            Matcher::Regex(r"\[시청률 1위\]: 역대급 반응".to_string()),
            Matcher::Regex("- 타겟: 30대 직장인".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(gemini_body(MODEL_OUTPUT))
        .expect(1)
        .create_async()
        .await;

    let plan = generator(&server, "old-model,new-model")
        .execute(CopyRequest::new("환승연애4").with_target("30대 직장인"))
        .await
        .unwrap();

    assert_eq!(plan.topic, "환승연애4");
    assert_eq!(plan.model, "new-model");
    assert_eq!(plan.rows.len(), 2);
    assert_eq!(plan.rows[0].title, "💘 드디어 공개!");
    assert_eq!(
        plan.rows[0].body,
        "(광고) 지금 바로 확인하세요 🔥\n*수신거부:설정>변경"
    );
    assert_eq!(plan.rows[1].target, "20대 여성");

    retired.assert_async().await;
    working.assert_async().await;
}

#[tokio::test]
async fn test_context_failures_use_placeholders() {
    let mut server = mockito::Server::new_async().await;

    let _sheet = server
        .mock("GET", "/spreadsheets/d/SHEET/export")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;
    let _news = server
        .mock("GET", "/search.naver")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;
    let model = server
        .mock("POST", "/v1beta/models/only-model:generateContent")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(regex_lite::escape(NO_SHEET_DATA)),
            Matcher::Regex(regex_lite::escape(NEWS_UNAVAILABLE)),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(gemini_body("예능|알림|전체|쇼|제목|본문"))
        .create_async()
        .await;

    let plan = generator(&server, "only-model")
        .execute(CopyRequest::new("신규 예능"))
        .await
        .unwrap();

    assert_eq!(plan.rows.len(), 1);
    model.assert_async().await;
}

#[tokio::test]
async fn test_wide_sheet_sends_newest_rows() {
    let mut server = mockito::Server::new_async().await;

    let mut csv_body = String::from("제목,내용\n");
    for i in 1..=30 {
        csv_body.push_str(&format!("행{:02},{}\n", i, "나".repeat(150)));
    }

    let _sheet = server
        .mock("GET", "/spreadsheets/d/SHEET/export")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(csv_body)
        .create_async()
        .await;
    let _news = server
        .mock("GET", "/search.naver")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html></html>")
        .create_async()
        .await;
    let model = server
        .mock("POST", "/v1beta/models/m:generateContent")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r"\| 행30 \|".to_string()),
            Matcher::Regex(r"\| 제목 \| 내용 \|".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(gemini_body("예능|알림|전체|쇼|제목|본문"))
        .expect(1)
        .create_async()
        .await;

    generator(&server, "m")
        .execute(CopyRequest::new("주제"))
        .await
        .unwrap();

    model.assert_async().await;
}

#[tokio::test]
async fn test_all_models_failing_is_no_model_available() {
    let mut server = mockito::Server::new_async().await;

    let _sheet = server
        .mock("GET", "/spreadsheets/d/SHEET/export")
        .match_query(Matcher::Any)
        .with_status(404)
        .create_async()
        .await;
    let _news = server
        .mock("GET", "/search.naver")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html></html>")
        .create_async()
        .await;
    let _first = server
        .mock("POST", "/v1beta/models/a:generateContent")
        .with_status(404)
        .create_async()
        .await;
    let _second = server
        .mock("POST", "/v1beta/models/b:generateContent")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(gemini_body("   "))
        .create_async()
        .await;

    let err = generator(&server, "a,b")
        .execute(CopyRequest::new("주제"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NoModelAvailable(_)));
}

#[tokio::test]
async fn test_prose_output_is_malformed() {
    let mut server = mockito::Server::new_async().await;

    let _sheet = server
        .mock("GET", "/spreadsheets/d/SHEET/export")
        .match_query(Matcher::Any)
        .with_status(404)
        .create_async()
        .await;
    let _news = server
        .mock("GET", "/search.naver")
        .match_query(Matcher::Any)
        .with_status(404)
        .create_async()
        .await;
    let _model = server
        .mock("POST", "/v1beta/models/m:generateContent")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(gemini_body("죄송하지만 도와드릴 수 없습니다."))
        .create_async()
        .await;

    let err = generator(&server, "m")
        .execute(CopyRequest::new("주제"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::MalformedOutput(_)));
}

#[tokio::test]
async fn test_app_context_validates_and_rate_limits() {
    let mut server = mockito::Server::new_async().await;

    let _news = server
        .mock("GET", "/search.naver")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html></html>")
        .create_async()
        .await;
    let model = server
        .mock("POST", "/v1beta/models/m:generateContent")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(gemini_body("a|b|c|d|제목|본문"))
        .expect(1)
        .create_async()
        .await;

    let env: HashMap<&str, String> = HashMap::from([
        ("GEMINI_API_KEY", "test-key".to_string()),
        ("GEMINI_BASE_URL", server.url()),
        ("MODEL_CANDIDATES", "m".to_string()),
        ("NEWS_SEARCH_URL", format!("{}/search.naver", server.url())),
        ("RATE_LIMIT_PER_MINUTE", "1".to_string()),
    ]);
    let settings = Settings::from_lookup(|key| env.get(key).cloned()).unwrap();
    let context = AppContext::from_settings(&settings).unwrap();
    let ip = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));

    let err = context.generate(ip, CopyRequest::new("  ")).await.unwrap_err();
    assert_eq!(err, AppError::InvalidInput("주제를 입력해주세요.".to_string()));

    let plan = context.generate(ip, CopyRequest::new("주제")).await.unwrap();
    assert_eq!(plan.rows.len(), 1);

    let err = context.generate(ip, CopyRequest::new("주제")).await.unwrap_err();
    assert!(matches!(err, AppError::RateLimited(_)));

    model.assert_async().await;
}
