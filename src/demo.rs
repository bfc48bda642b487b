//! One-shot HTTP POST demo.
//!
//! Sends `id=1&name=Jessa` form-encoded to an echo endpoint while declaring
//! `Content-type: application/json`, then reports the status code, the
//! `data` field of the JSON reply and the reply's `Content-Type`.
//! The mismatched content type is intentional and kept as-is.

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};

/// Default echo endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://httpbin.org/post";

const FORM_FIELDS: [(&str, &str); 2] = [("id", "1"), ("name", "Jessa")];

/// `Content-type: application/json` and `Accept: text/plain`.
pub fn request_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("text/plain"));
    headers
}

/// The fixed body, `application/x-www-form-urlencoded` style.
pub fn form_body() -> String {
    FORM_FIELDS
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// What the demo prints, collected from one response.
#[derive(Debug, Clone)]
pub struct DemoResponse {
    pub status: u16,
    pub body: Value,
    header_content_type: Option<String>,
}

impl DemoResponse {
    /// The echoed `data` field, `Null` if the server sent none.
    pub fn data(&self) -> &Value {
        self.body.get("data").unwrap_or(&Value::Null)
    }

    /// The response `Content-Type` header. Falls back to the echoed request
    /// header under `headers` when the server omitted its own.
    pub fn content_type(&self) -> Option<&str> {
        self.header_content_type
            .as_deref()
            .or_else(|| echoed_header(&self.body, "content-type"))
    }

    /// The lines printed to stdout.
    pub fn report(&self) -> String {
        let data = match self.data() {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        format!(
            "Status code:  {}\nPrinting Post JSON data\n{}\nContent-Type is  {}",
            self.status,
            data,
            self.content_type().unwrap_or("")
        )
    }
}

/// Case-insensitive lookup in the `headers` object of an echo reply.
fn echoed_header<'a>(body: &'a Value, name: &str) -> Option<&'a str> {
    body.get("headers")?
        .as_object()?
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .and_then(|(_, v)| v.as_str())
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct DemoClient {
    http: Client,
    endpoint: String,
}

impl DemoClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent("simrun-http-demo/0.1.0")
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send the single POST. Network and decode errors are returned as-is;
    /// there is no retry.
    pub async fn post(&self) -> Result<DemoResponse> {
        let body = form_body();
        debug!(url = %self.endpoint, body = %body, "Sending demo POST");

        let resp = self
            .http
            .post(&self.endpoint)
            .headers(request_headers())
            .body(body)
            .send()
            .await
            .with_context(|| format!("POST to {} failed", self.endpoint))?;

        let status = resp.status().as_u16();
        let header_content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body: Value = resp
            .json()
            .await
            .context("Failed to decode response body as JSON")?;

        info!(status, content_type = ?header_content_type, "Demo POST complete");

        Ok(DemoResponse {
            status,
            body,
            header_content_type,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
