//! End-to-end tests for the fetch-and-render client against a local server

use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use twinfetch_core::page::{self, Element, ElementKind};
use twinfetch_core::{DiagnosticSink, FetchError, FetcherConfig, Page, TwinFetcher};

const REFERENCE_BODY: &str = r#"{"Source":{"name":"A","image":"a.png","owner":"Alice","id":"1","hyperlink":"http://x/1"},"Twin":{"name":"B","image":"b.png","owner":"Bob","id":"2","hyperlink":"http://x/2"}}"#;

/// Sink that remembers every report
#[derive(Default)]
struct RecordingSink {
    reports: Mutex<Vec<String>>,
}

impl RecordingSink {
    fn reports(&self) -> Vec<String> {
        self.reports.lock().unwrap().clone()
    }
}

impl DiagnosticSink for RecordingSink {
    fn report(&self, error: &FetchError) {
        self.reports.lock().unwrap().push(error.to_string());
    }
}

/// Serve canned bodies keyed by token id. Unknown ids get a 400 with no body.
async fn serve(bodies: HashMap<&'static str, (u64, &'static str)>) -> SocketAddr {
    let bodies = Arc::new(bodies);
    let app = Router::new().route(
        "/twin",
        get(move |Query(params): Query<HashMap<String, String>>| {
            let bodies = bodies.clone();
            async move {
                let token = params.get("token_id").cloned().unwrap_or_default();
                match bodies.get(token.as_str()) {
                    Some((delay_ms, body)) => {
                        tokio::time::sleep(Duration::from_millis(*delay_ms)).await;
                        (StatusCode::OK, body.to_string())
                    }
                    None => (StatusCode::BAD_REQUEST, String::new()),
                }
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn fetcher_for(addr: SocketAddr, page: Page, sink: Arc<RecordingSink>) -> TwinFetcher {
    let config = FetcherConfig {
        endpoint: format!("http://{addr}/twin"),
        ..FetcherConfig::default()
    };
    TwinFetcher::new(config, page)
        .unwrap()
        .with_diagnostics(sink)
}

fn text(page: &Page, id: &str) -> String {
    page.element(id).unwrap().text
}

fn attr(page: &Page, id: &str, name: &str) -> Option<String> {
    page.element(id)
        .unwrap()
        .attribute(name)
        .map(str::to_string)
}

#[tokio::test]
async fn test_reference_body_renders_all_fields() {
    let addr = serve(HashMap::from([("1", (0, REFERENCE_BODY))])).await;
    let page = Page::twin_template();
    page.set_value(page::TOKEN_ID, "1").unwrap();
    let sink = Arc::new(RecordingSink::default());

    fetcher_for(addr, page.clone(), sink.clone())
        .fetch_and_render()
        .await;

    assert!(sink.reports().is_empty());
    assert_eq!(text(&page, "source_name"), "A");
    assert_eq!(attr(&page, "source_img", "src").as_deref(), Some("a.png"));
    assert_eq!(text(&page, "source_owner"), "Alice");
    assert_eq!(text(&page, "source_hyperlink"), "Opensea.io/.../1");
    assert_eq!(
        attr(&page, "source_hyperlink", "href").as_deref(),
        Some("http://x/1")
    );
    assert_eq!(text(&page, "twin_name"), "B");
    assert_eq!(attr(&page, "twin_img", "src").as_deref(), Some("b.png"));
    assert_eq!(text(&page, "twin_owner"), "Bob");
    assert_eq!(text(&page, "twin_hyperlink"), "Opensea.io/.../2");
    assert_eq!(
        attr(&page, "twin_hyperlink", "href").as_deref(),
        Some("http://x/2")
    );
}

#[tokio::test]
async fn test_unparseable_body_leaves_page_untouched() {
    let addr = serve(HashMap::from([("1", (0, "<html>oops</html>"))])).await;
    let page = Page::twin_template();
    page.set_value(page::TOKEN_ID, "1").unwrap();
    let before = page.to_html();
    let sink = Arc::new(RecordingSink::default());

    fetcher_for(addr, page.clone(), sink.clone())
        .fetch_and_render()
        .await;

    assert_eq!(page.to_html(), before);
    assert_eq!(sink.reports().len(), 1);
}

#[tokio::test]
async fn test_array_body_leaves_page_untouched() {
    let body = r#"[{"name":"Deathbat #1","id":1},{"name":"Deathbat #2","id":2}]"#;
    let addr = serve(HashMap::from([("1", (0, body))])).await;
    let page = Page::twin_template();
    page.set_value(page::TOKEN_ID, "1").unwrap();
    let before = page.to_html();
    let sink = Arc::new(RecordingSink::default());

    fetcher_for(addr, page.clone(), sink.clone())
        .fetch_and_render()
        .await;

    assert_eq!(page.to_html(), before);
    assert_eq!(sink.reports().len(), 1);
}

#[tokio::test]
async fn test_error_status_leaves_page_untouched() {
    let addr = serve(HashMap::new()).await;
    let page = Page::twin_template();
    page.set_value(page::TOKEN_ID, "abc").unwrap();
    let before = page.to_html();
    let sink = Arc::new(RecordingSink::default());

    let fetcher = fetcher_for(addr, page.clone(), sink.clone());
    let err = fetcher.try_fetch_and_render().await.unwrap_err();
    assert!(matches!(err, FetchError::Status { status, .. } if status == 400));

    fetcher.fetch_and_render().await;
    assert_eq!(page.to_html(), before);
    assert_eq!(sink.reports().len(), 1);
}

#[tokio::test]
async fn test_connection_refused_is_reported_once() {
    // Bind then drop so nothing listens on the port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let page = Page::twin_template();
    page.set_value(page::TOKEN_ID, "1").unwrap();
    let before = page.to_html();
    let sink = Arc::new(RecordingSink::default());

    fetcher_for(addr, page.clone(), sink.clone())
        .fetch_and_render()
        .await;

    assert_eq!(page.to_html(), before);
    let reports = sink.reports();
    assert_eq!(reports.len(), 1);
    assert!(reports[0].contains("failed"));
}

#[tokio::test]
async fn test_missing_twin_writes_source_only() {
    let body = r#"{"Source":{"name":"A","image":"a.png","owner":"Alice","id":1,"hyperlink":"http://x/1"}}"#;
    let addr = serve(HashMap::from([("1", (0, body))])).await;
    let page = Page::twin_template();
    page.set_value(page::TOKEN_ID, "1").unwrap();
    let sink = Arc::new(RecordingSink::default());

    fetcher_for(addr, page.clone(), sink.clone())
        .fetch_and_render()
        .await;

    assert_eq!(text(&page, "source_name"), "A");
    assert_eq!(text(&page, "source_hyperlink"), "Opensea.io/.../1");
    assert_eq!(text(&page, "twin_name"), "");
    assert_eq!(attr(&page, "twin_img", "src"), None);
    assert_eq!(sink.reports(), vec!["response has no `Twin` record".to_string()]);
}

#[tokio::test]
async fn test_missing_element_halts_remaining_writes() {
    let addr = serve(HashMap::from([("1", (0, REFERENCE_BODY))])).await;
    let page = Page::twin_template();
    page.set_value(page::TOKEN_ID, "1").unwrap();
    page.remove(page::TWIN_IMG);
    let sink = Arc::new(RecordingSink::default());

    fetcher_for(addr, page.clone(), sink.clone())
        .fetch_and_render()
        .await;

    assert_eq!(text(&page, "source_name"), "A");
    assert_eq!(text(&page, "twin_name"), "B");
    assert_eq!(text(&page, "twin_owner"), "");
    assert_eq!(text(&page, "twin_hyperlink"), "");
    assert_eq!(
        sink.reports(),
        vec!["page has no element with id `twin_img`".to_string()]
    );
}

#[tokio::test]
async fn test_missing_fields_render_empty() {
    let body = r#"{"Source":{"name":"A"},"Twin":{}}"#;
    let addr = serve(HashMap::from([("1", (0, body))])).await;
    let page = Page::twin_template();
    page.set_value(page::TOKEN_ID, "1").unwrap();
    page.set_text(page::TWIN_NAME, "stale").unwrap();
    let sink = Arc::new(RecordingSink::default());

    fetcher_for(addr, page.clone(), sink.clone())
        .fetch_and_render()
        .await;

    assert!(sink.reports().is_empty());
    assert_eq!(text(&page, "source_name"), "A");
    assert_eq!(text(&page, "twin_name"), "");
    assert_eq!(text(&page, "twin_hyperlink"), "Opensea.io/.../");
    assert_eq!(attr(&page, "twin_hyperlink", "href").as_deref(), Some(""));
}

#[tokio::test]
async fn test_last_response_to_arrive_wins() {
    let slow = r#"{"Source":{"name":"slow"},"Twin":{"name":"slow twin"}}"#;
    let fast = r#"{"Source":{"name":"fast"},"Twin":{"name":"fast twin"}}"#;
    let addr = serve(HashMap::from([("slow", (300, slow)), ("fast", (0, fast))])).await;

    let page = Page::twin_template();
    let sink = Arc::new(RecordingSink::default());
    let fetcher = fetcher_for(addr, page.clone(), sink.clone());

    page.set_value(page::TOKEN_ID, "slow").unwrap();
    let first = fetcher.spawn();
    tokio::time::sleep(Duration::from_millis(50)).await;

    page.set_value(page::TOKEN_ID, "fast").unwrap();
    let second = fetcher.spawn();

    second.await.unwrap();
    assert_eq!(text(&page, "source_name"), "fast");

    first.await.unwrap();
    assert_eq!(text(&page, "source_name"), "slow");
    assert_eq!(text(&page, "twin_name"), "slow twin");
    assert!(sink.reports().is_empty());
}

#[tokio::test]
async fn test_custom_input_element() {
    let addr = serve(HashMap::from([("1", (0, REFERENCE_BODY))])).await;
    let page = Page::twin_template();
    page.insert("lookup", Element::new(ElementKind::Input));
    page.set_value("lookup", "1").unwrap();
    let sink = Arc::new(RecordingSink::default());

    let config = FetcherConfig {
        endpoint: format!("http://{addr}/twin"),
        input: "lookup".to_string(),
        ..FetcherConfig::default()
    };
    TwinFetcher::new(config, page.clone())
        .unwrap()
        .with_diagnostics(sink.clone())
        .fetch_and_render()
        .await;

    assert!(sink.reports().is_empty());
    assert_eq!(text(&page, "twin_name"), "B");
}
