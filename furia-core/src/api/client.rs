//! reqwest-backed [`HttpTransport`].

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, Url};
use serde_json::Value;
use tracing::{debug, warn};

use super::{ApiResponse, HttpTransport, TransportError};
use crate::config::ApiConfig;
use crate::error::{FuriaError, Result};

const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// HTTP client bound to one API base URL
#[derive(Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    auth_token: RwLock<Option<String>>,
}

impl ApiClient {
    /// Build a client from the `[api]` configuration section
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base_url = normalize_base_url(&config.base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| {
                FuriaError::configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            http,
            base_url,
            auth_token: RwLock::new(None),
        })
    }

    /// Base URL every request path is resolved against (always ends with `/`)
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Whether a bearer token is currently installed
    pub fn has_auth_token(&self) -> bool {
        self.auth_token.read().is_some()
    }
}

#[async_trait]
impl HttpTransport for ApiClient {
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> std::result::Result<ApiResponse, TransportError> {
        let url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| TransportError::Setup(format!("invalid path '{}': {}", path, e)))?;

        debug!(%method, %url, "API request");

        // `RequestBuilder::json` would override the charset content type
        let mut builder = self.http.request(method.clone(), url);
        if let Some(body) = &body {
            let bytes = serde_json::to_vec(body)
                .map_err(|e| TransportError::Setup(format!("unencodable body: {}", e)))?;
            builder = builder.header(CONTENT_TYPE, JSON_CONTENT_TYPE).body(bytes);
        }
        let token = self.auth_token.read().clone();
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(|e| {
            warn!(%method, path, error = %e, "API request failed without response");
            classify(e)
        })?;

        let status = response.status().as_u16();
        let data = match response.text().await {
            Ok(text) => decode_body(&text),
            Err(e) => {
                warn!(path, status, error = %e, "Failed to read response body");
                Value::Null
            }
        };

        debug!(path, status, "API response");
        Ok(ApiResponse::new(status, data))
    }

    fn set_auth_token(&self, token: Option<&str>) {
        *self.auth_token.write() = token.map(str::to_string);
    }
}

fn normalize_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FuriaError::configuration("API base URL cannot be empty"));
    }

    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    };

    Url::parse(&with_slash).map_err(|e| {
        FuriaError::configuration(format!("Invalid API base URL '{}': {}", trimmed, e))
    })
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(err.to_string())
    } else if err.is_builder() {
        TransportError::Setup(err.to_string())
    } else {
        TransportError::Connect(err.to_string())
    }
}

/// JSON when possible, raw text otherwise, `null` for an empty body
fn decode_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
