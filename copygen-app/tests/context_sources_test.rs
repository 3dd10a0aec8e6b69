use copygen_app::domain::NewsItem;
use copygen_app::infrastructure::news::{NewsSearch, NewsSource};
use copygen_app::infrastructure::sheet::SheetFetcher;
use copygen_errors::AppError;
use mockito::Matcher;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn test_sheet_fetch_renders_tail_as_markdown() {
    let mut server = mockito::Server::new_async().await;

    let mut csv_body = String::from("제목,내용\n");
    for i in 1..=35 {
        csv_body.push_str(&format!("제목{},내용{}\n", i, i));
    }

    let mock = server
        .mock("GET", "/spreadsheets/d/SHEET_1/export")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("format".into(), "csv".into()),
            Matcher::UrlEncoded("gid".into(), "7".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "text/csv")
        .with_body(csv_body)
        .create_async()
        .await;

    let fetcher = SheetFetcher::new(server.url(), 30, TIMEOUT).unwrap();
    let table = fetcher.fetch("SHEET_1", "7").await.unwrap().unwrap();

    assert!(table.starts_with("| 제목 | 내용 |\n| --- | --- |\n| 제목6 | 내용6 |"));
    assert!(table.ends_with("| 제목35 | 내용35 |"));
    assert!(!table.contains("| 제목5 |"));

    mock.assert_async().await;
}

#[tokio::test]
async fn test_sheet_fetch_empty_and_errors() {
    let mut server = mockito::Server::new_async().await;

    let _empty = server
        .mock("GET", "/spreadsheets/d/EMPTY/export")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("제목,내용\n")
        .create_async()
        .await;
    let _missing = server
        .mock("GET", "/spreadsheets/d/MISSING/export")
        .match_query(Matcher::Any)
        .with_status(404)
        .create_async()
        .await;
    let _private = server
        .mock("GET", "/spreadsheets/d/PRIVATE/export")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<!DOCTYPE html><html><body>Sign in</body></html>")
        .create_async()
        .await;

    let fetcher = SheetFetcher::new(server.url(), 30, TIMEOUT).unwrap();

    assert_eq!(fetcher.fetch("EMPTY", "0").await.unwrap(), None);
    assert!(matches!(
        fetcher.fetch("MISSING", "0").await,
        Err(AppError::SheetFetchFailed(msg)) if msg.contains("404")
    ));
    assert!(matches!(
        fetcher.fetch("PRIVATE", "0").await,
        Err(AppError::SheetFetchFailed(_))
    ));
}

#[tokio::test]
async fn test_news_scrape_with_mock() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/search.naver")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("where".into(), "news".into()),
            Matcher::UrlEncoded("query".into(), "환승연애4".into()),
            Matcher::UrlEncoded("sort".into(), "1".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(
            r#"<html><body>
                <div class="news_area"><a class="news_tit">환승연애4 첫 방송</a><div class="news_dsc">화제의 첫 회</div></div>
                <div class="news_area"><a class="news_tit">출연진 공개</a><div class="news_dsc">새 얼굴들</div></div>
            </body></html>"#,
        )
        .create_async()
        .await;

    let search = NewsSearch::new(
        NewsSource::Scrape {
            search_url: format!("{}/search.naver", server.url()),
        },
        TIMEOUT,
    )
    .unwrap();

    let items = search.search("환승연애4").await.unwrap();
    assert_eq!(
        items,
        vec![
            NewsItem::new("환승연애4 첫 방송", "화제의 첫 회"),
            NewsItem::new("출연진 공개", "새 얼굴들"),
        ]
    );

    mock.assert_async().await;
}

#[tokio::test]
async fn test_news_api_with_mock() {
    let mut server = mockito::Server::new_async().await;

    let mock = server
        .mock("GET", "/v1/search/news.json")
        .match_header("x-naver-client-id", "cid")
        .match_header("x-naver-client-secret", "secret")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("query".into(), "신제품".into()),
            Matcher::UrlEncoded("display".into(), "5".into()),
            Matcher::UrlEncoded("sort".into(), "date".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"total":1,"items":[{"title":"<b>신제품</b> 출시","description":"드디어 &amp; 마침내","pubDate":"Mon, 12 Oct 2026 09:00:00 +0900"}]}"#,
        )
        .create_async()
        .await;

    let search = NewsSearch::new(
        NewsSource::Api {
            api_url: format!("{}/v1/search/news.json", server.url()),
            client_id: "cid".to_string(),
            client_secret: "secret".to_string(),
        },
        TIMEOUT,
    )
    .unwrap();

    let items = search.search("신제품").await.unwrap();
    assert_eq!(items, vec![NewsItem::new("신제품 출시", "드디어 & 마침내")]);

    mock.assert_async().await;
}

#[tokio::test]
async fn test_news_blocked_is_error() {
    let mut server = mockito::Server::new_async().await;

    let _mock = server
        .mock("GET", "/search.naver")
        .match_query(Matcher::Any)
        .with_status(403)
        .create_async()
        .await;

    let search = NewsSearch::new(
        NewsSource::Scrape {
            search_url: format!("{}/search.naver", server.url()),
        },
        TIMEOUT,
    )
    .unwrap();

    assert!(matches!(
        search.search("키워드").await,
        Err(AppError::NewsSearchFailed(msg)) if msg.contains("403")
    ));
}
