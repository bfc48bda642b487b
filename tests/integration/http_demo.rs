//! The HTTP demo against an in-process echo server shaped like httpbin's
//! `/post`: raw body under `data`, request headers under `headers`.

use axum::http::HeaderMap;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Map, Value};

use simrun::demo::DemoClient;

/// `content-type` -> `Content-Type`.
fn canonical(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

async fn echo(headers: HeaderMap, body: String) -> Json<Value> {
    let headers: Map<String, Value> = headers
        .iter()
        .map(|(k, v)| {
            (
                canonical(k.as_str()),
                Value::String(v.to_str().unwrap_or_default().to_string()),
            )
        })
        .collect();
    Json(json!({ "data": body, "headers": headers }))
}

async fn not_json() -> &'static str {
    "plain text"
}

async fn spawn_server() -> String {
    let app = Router::new()
        .route("/post", post(echo))
        .route("/text", post(not_json));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn test_echo_server_round_trip() {
    let base = spawn_server().await;
    let client = DemoClient::new(format!("{base}/post")).unwrap();
    let resp = client.post().await.unwrap();

    assert_eq!(resp.status, 200);
    assert_eq!(resp.data(), &json!("id=1&name=Jessa"));
    assert_eq!(resp.content_type(), Some("application/json"));
    assert_eq!(resp.body["headers"]["Content-Type"], "application/json");
    assert_eq!(resp.body["headers"]["Accept"], "text/plain");
}

#[tokio::test]
async fn test_report_against_echo_server() {
    let base = spawn_server().await;
    let client = DemoClient::new(format!("{base}/post")).unwrap();
    let report = client.post().await.unwrap().report();

    assert!(report.starts_with("Status code:  200\n"));
    assert!(report.contains("\nid=1&name=Jessa\n"));
    assert!(report.ends_with("Content-Type is  application/json"));
}

#[tokio::test]
async fn test_non_json_reply_is_an_error() {
    let base = spawn_server().await;
    let client = DemoClient::new(format!("{base}/text")).unwrap();
    assert!(client.post().await.is_err());
}

#[tokio::test]
async fn test_unreachable_endpoint_is_an_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = DemoClient::new(format!("http://{addr}/post")).unwrap();
    assert!(client.post().await.is_err());
}
