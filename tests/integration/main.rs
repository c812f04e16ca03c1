//! Integration tests for the status page.
//!
//! Each test starts a fake backend on 127.0.0.1 and points a real
//! `StatusClient` at it.
//!
//! Run with: cargo test --test integration

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use pretty_assertions::assert_eq;
use tokio::net::TcpListener;
use tower::ServiceExt;
use url::Url;

use dark_search_status::api::{create_router, AppState};
use dark_search_status::status::{StatusClient, StatusPage, MAX_BODY_BYTES};
use dark_search_status::{FailureKind, FetchError};

/// Fake backend: serves `(status, body)` produced by `respond` for the nth call.
#[derive(Clone)]
struct Backend {
    calls: Arc<AtomicUsize>,
    respond: Arc<dyn Fn(usize) -> (StatusCode, String) + Send + Sync>,
}

async fn backend_handler(State(backend): State<Backend>) -> impl IntoResponse {
    let n = backend.calls.fetch_add(1, Ordering::SeqCst);
    let (status, body) = (backend.respond)(n);
    (status, [("content-type", "application/json")], body)
}

async fn spawn_backend(
    respond: impl Fn(usize) -> (StatusCode, String) + Send + Sync + 'static,
) -> (Url, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let backend = Backend {
        calls: Arc::clone(&calls),
        respond: Arc::new(respond),
    };

    let app = Router::new()
        .route("/api/status", get(backend_handler))
        .with_state(backend);

    (serve_backend(app).await, calls)
}

async fn serve_backend(app: Router) -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    base_url(addr)
}

fn base_url(addr: SocketAddr) -> Url {
    Url::parse(&format!("http://{}/api/status", addr)).unwrap()
}

fn client(url: Url) -> StatusClient {
    StatusClient::new(url, Duration::from_secs(2)).unwrap()
}

fn unreachable_url() -> Url {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    base_url(addr)
}

#[tokio::test]
async fn renders_counters_from_backend() {
    let (url, calls) = spawn_backend(|_| {
        (
            StatusCode::OK,
            r#"{"current_num_of_domains":10,"current_num_of_crawled_domains":3,"current_num_of_webpages":120}"#
                .to_string(),
        )
    })
    .await;

    let page = StatusPage::new(client(url), "Dark Search");
    let rendered = page.render().await;

    assert_eq!(rendered.status, StatusCode::OK);
    assert!(rendered.html.contains("Domains known: 10"));
    assert!(rendered.html.contains("Domains crawled: 3"));
    assert!(rendered.html.contains("Webpages known: 120"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn renders_message_from_backend() {
    let (url, _) = spawn_backend(|_| (StatusCode::OK, r#"{"message":"ok"}"#.to_string())).await;

    let rendered = StatusPage::new(client(url), "Dark Search").render().await;

    assert!(rendered.html.contains("Message: ok"));
}

#[tokio::test]
async fn unreachable_backend_renders_fallback() {
    let status_client = client(unreachable_url());

    let err = status_client.fetch().await.unwrap_err();
    assert!(matches!(err, FetchError::Network(_)));

    let rendered = StatusPage::new(status_client, "Dark Search").render().await;
    assert_eq!(rendered.status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(rendered.html.contains("Status is currently unavailable."));
    assert!(rendered.html.contains(FailureKind::Network.describe()));
}

#[tokio::test]
async fn slow_backend_times_out_as_network_failure() {
    let app = Router::new().route(
        "/api/status",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            r#"{"current_num_of_domains":1}"#
        }),
    );
    let url = serve_backend(app).await;
    let status_client = StatusClient::new(url, Duration::from_millis(300)).unwrap();

    let started = std::time::Instant::now();
    let err = status_client.fetch().await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::Network);
    assert!(started.elapsed() < Duration::from_secs(5));

    let rendered = StatusPage::new(status_client, "Dark Search").render().await;
    assert_eq!(rendered.status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(rendered.html.contains(FailureKind::Network.describe()));
}

#[tokio::test]
async fn oversized_body_renders_fallback() {
    let (url, _) = spawn_backend(|_| {
        let message = "x".repeat(MAX_BODY_BYTES);
        (StatusCode::OK, format!(r#"{{"message":"{}"}}"#, message))
    })
    .await;

    let status_client = client(url);
    match status_client.fetch().await {
        Err(FetchError::BodyTooLarge { limit }) => assert_eq!(limit, MAX_BODY_BYTES),
        other => panic!("expected BodyTooLarge, got {:?}", other),
    }

    let rendered = StatusPage::new(status_client, "Dark Search").render().await;
    assert!(rendered.is_fallback());
    assert!(rendered.html.contains(FailureKind::Parse.describe()));
    assert!(!rendered.html.contains("xxxx"));
}

#[tokio::test]
async fn body_under_cap_is_accepted() {
    let (url, _) = spawn_backend(|_| {
        let message = "y".repeat(MAX_BODY_BYTES / 2);
        (StatusCode::OK, format!(r#"{{"message":"{}"}}"#, message))
    })
    .await;

    let snapshot = client(url).fetch().await.unwrap();
    assert_eq!(snapshot.message.map(|m| m.len()), Some(MAX_BODY_BYTES / 2));
}

#[tokio::test]
async fn invalid_json_renders_fallback() {
    let (url, _) = spawn_backend(|_| (StatusCode::OK, "<html>oops</html>".to_string())).await;

    let status_client = client(url);
    let err = status_client.fetch().await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::Parse);

    let rendered = StatusPage::new(status_client, "Dark Search").render().await;
    assert!(rendered.is_fallback());
    assert!(rendered.html.contains(FailureKind::Parse.describe()));
    assert!(!rendered.html.contains("Domains known"));
}

#[tokio::test]
async fn error_status_renders_fallback() {
    let (url, _) = spawn_backend(|_| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"current_num_of_domains":1}"#.to_string(),
        )
    })
    .await;

    let status_client = client(url);
    match status_client.fetch().await {
        Err(FetchError::UnexpectedStatus(status)) => {
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR)
        }
        other => panic!("expected UnexpectedStatus, got {:?}", other),
    }

    let rendered = StatusPage::new(status_client, "Dark Search").render().await;
    assert!(rendered.is_fallback());
}

#[tokio::test]
async fn successive_renders_fetch_independently() {
    let (url, calls) = spawn_backend(|n| {
        let body = if n == 0 {
            r#"{"current_num_of_domains":5,"current_num_of_crawled_domains":1,"current_num_of_webpages":40}"#
        } else {
            r#"{"current_num_of_domains":6,"current_num_of_crawled_domains":2,"current_num_of_webpages":55}"#
        };
        (StatusCode::OK, body.to_string())
    })
    .await;

    let page = StatusPage::new(client(url), "Dark Search");
    let first = page.render().await;
    let second = page.render().await;

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(first.html.contains("Webpages known: 40"));
    assert!(second.html.contains("Domains known: 6"));
    assert!(second.html.contains("Domains crawled: 2"));
    assert!(second.html.contains("Webpages known: 55"));
    assert!(!second.html.contains("Webpages known: 40"));
}

#[tokio::test]
async fn router_serves_page_end_to_end() {
    let (url, calls) = spawn_backend(|_| {
        (
            StatusCode::OK,
            r#"{"current_num_of_domains":10,"current_num_of_crawled_domains":3,"current_num_of_webpages":120}"#
                .to_string(),
        )
    })
    .await;

    let app = create_router(AppState::new(StatusPage::new(client(url), "Dark Search")));

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("<h1>Dark Search</h1>"));
    assert!(html.contains("Webpages known: 120"));

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn router_degrades_when_backend_is_down() {
    let app = create_router(AppState::new(StatusPage::new(
        client(unreachable_url()),
        "Dark Search",
    )));

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("Status is currently unavailable."));
}
