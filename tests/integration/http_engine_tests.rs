//! Integration tests for the HTTP engine
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! crawl cycle through `HttpEngine`.

use cookie_ripple::browser::{BrowserEngine, BrowserSession, EngineError, HttpEngine};
use cookie_ripple::config::{BrowserSettings, Config, EngineKind};
use cookie_ripple::crawler::{crawl, CookieStep};
use cookie_ripple::output::{JsonOutputHandler, OutputHandler};
use cookie_ripple::state::VisitStatus;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

fn create_test_config(start_url: &str) -> Config {
    let mut config = Config::with_start_url(start_url);
    config.crawl.max_pages = 10;
    config.crawl.wait_after_interaction_ms = 0;
    config.crawl.navigation_timeout_ms = 5_000;
    config.browser.engine = EngineKind::Http;
    config
}

fn engine() -> Arc<HttpEngine> {
    Arc::new(HttpEngine::new(&BrowserSettings::default()).unwrap())
}

#[tokio::test]
async fn test_full_crawl_records_set_cookie_headers() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            html(r#"<a href="/page1">Page 1</a> <a href="/page2">Page 2</a>"#)
                .insert_header("set-cookie", "session=abc; Path=/; HttpOnly"),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(
            html(r#"<a href="/">Home</a>"#).insert_header("set-cookie", "theme=dark; Path=/page1"),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(html("<p>No cookies here</p>"))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&format!("{}/", base_url));
    let report = crawl(&config, engine()).await.unwrap();

    assert_eq!(
        report.result.visited,
        vec![
            format!("{}/", base_url),
            format!("{}/page1", base_url),
            format!("{}/page2", base_url),
        ]
    );
    assert_eq!(report.statistics.succeeded, 3);

    let log = &report.result.cookie_log;
    assert_eq!(log.len(), 2);
    assert!(log.iter().all(|e| e.step == CookieStep::InitialLoad));

    let session = log
        .iter()
        .flat_map(|e| e.cookies.iter())
        .find(|c| c.name == "session")
        .unwrap();
    assert_eq!(session.value, "abc");
    assert_eq!(session.domain, "127.0.0.1");
    assert!(session.http_only);
    assert!(session.session);

    let theme = log
        .iter()
        .flat_map(|e| e.cookies.iter())
        .find(|c| c.name == "theme")
        .unwrap();
    assert_eq!(theme.path, "/page1");
}

#[tokio::test]
async fn test_http_errors_fail_the_visit_only() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"<a href="/gone">Gone</a> <a href="/fine">Fine</a>"#))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/fine"))
        .respond_with(html("ok"))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&format!("{}/", base_url));
    let report = crawl(&config, engine()).await.unwrap();

    assert_eq!(report.result.visited.len(), 3);
    assert_eq!(
        report.visit_statuses[&format!("{}/gone", base_url)],
        VisitStatus::Failed
    );
    assert_eq!(
        report.visit_statuses[&format!("{}/fine", base_url)],
        VisitStatus::Succeeded
    );
}

#[tokio::test]
async fn test_redirect_hops_keep_their_cookies() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/start"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("location", "/landing")
                .insert_header("set-cookie", "hop=1; Path=/"),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/landing"))
        .and(header("cookie", "hop=1"))
        .respond_with(html("landed").insert_header("set-cookie", "landed=1; Path=/"))
        .mount(&mock_server)
        .await;

    let engine = engine();
    let mut session = engine.new_session().await.unwrap();

    let final_url = session
        .navigate(&format!("{}/start", base_url), Duration::from_secs(5))
        .await
        .unwrap();
    assert_eq!(final_url, format!("{}/landing", base_url));

    let mut names: Vec<_> = session
        .cookies()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    names.sort();
    assert_eq!(names, vec!["hop", "landed"]);

    session.close().await.unwrap();
}

#[tokio::test]
async fn test_sessions_do_not_share_cookies() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html("hi").insert_header("set-cookie", "session=abc"))
        .mount(&mock_server)
        .await;

    let engine = engine();
    let mut first = engine.new_session().await.unwrap();
    first
        .navigate(&format!("{}/", mock_server.uri()), Duration::from_secs(5))
        .await
        .unwrap();
    assert_eq!(first.cookies().await.unwrap().len(), 1);

    let second = engine.new_session().await.unwrap();
    assert!(second.cookies().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_link_targets_come_from_the_loaded_document() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<a href="/one">1</a> <a href="two">2</a> <a href="/file.zip" download>zip</a>"#,
        ))
        .mount(&mock_server)
        .await;

    let engine = engine();
    let mut session = engine.new_session().await.unwrap();

    assert!(matches!(
        session.link_targets().await,
        Err(EngineError::NotLoaded)
    ));

    session
        .navigate(&format!("{}/", mock_server.uri()), Duration::from_secs(5))
        .await
        .unwrap();
    assert_eq!(session.link_targets().await.unwrap(), vec!["/one", "two"]);
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html("late").set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;

    let engine = engine();
    let mut session = engine.new_session().await.unwrap();

    let result = session
        .navigate(
            &format!("{}/slow", mock_server.uri()),
            Duration::from_millis(200),
        )
        .await;
    assert!(matches!(result, Err(ref e) if e.is_timeout()));
}

#[tokio::test]
async fn test_crawl_result_written_as_json() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html("home").insert_header("set-cookie", "session=abc; Path=/"))
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("out").join("cookies.json");

    let config = create_test_config(&format!("{}/", base_url));
    let report = crawl(&config, engine()).await.unwrap();
    JsonOutputHandler::new(&output_path)
        .write_report(&report)
        .unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output_path).unwrap()).unwrap();
    assert!(json["startedAt"].is_string());
    assert_eq!(json["visited"][0], format!("{}/", base_url));
    assert_eq!(json["cookieLog"][0]["step"], "initial load");
    assert_eq!(json["cookieLog"][0]["cookies"][0]["name"], "session");
}

#[tokio::test]
async fn test_huge_max_age_keeps_page_and_links() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            html(r#"<a href="/next">Next</a>"#)
                .insert_header("set-cookie", "sid=1; Path=/; Max-Age=99999999999999999999"),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/next"))
        .respond_with(html("<p>end</p>"))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&format!("{}/", base_url));
    let report = crawl(&config, engine()).await.unwrap();

    assert_eq!(report.statistics.succeeded, 2);
    assert_eq!(report.statistics.failed, 0);
    assert_eq!(report.result.cookie_log.len(), 1);

    let sid = &report.result.cookie_log[0].cookies[0];
    assert_eq!(sid.name, "sid");
    assert!(!sid.session);
}
