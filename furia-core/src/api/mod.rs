//! # API Transport
//!
//! JSON-over-HTTP contract with the FURIA backend.
//!
//! Every caller talks to the backend through [`HttpTransport`]. A transport
//! returns `Ok(ApiResponse)` for any HTTP answer, success or not; `Err` is
//! reserved for requests that never produced a response (offline, timeout,
//! malformed URL). Callers decide what a status code means.

mod client;

pub use client::ApiClient;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use reqwest::Method;

/// `POST {login, password}` -> `{accessToken}`
pub const LOGIN_PATH: &str = "auth/login";
/// `POST {name, login, password}` -> 201 Created
pub const REGISTER_PATH: &str = "auth/register";
/// `POST {email}` -> resend the account activation link
pub const ACTIVATE_PATH: &str = "auth/activate";
/// `POST {email}` -> send the password reset e-mail
pub const FORGOT_PASSWORD_PATH: &str = "auth/password/forget";
/// `POST {email, password}` -> set the new password
pub const RESET_PASSWORD_PATH: &str = "auth/password/reset";
/// `POST {email}` -> 200 "email activated." once the link was clicked
pub const EMAIL_CONFIRMED_PATH: &str = "auth/email/confirmed";
/// `POST {accessToken}` -> profile of the logged-in user
pub const PROFILE_PATH: &str = "auth/me";

/// Failure to obtain any response from the backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Connection refused, DNS failure, TLS failure...
    #[error("connection failed: {0}")]
    Connect(String),

    /// No answer within the configured timeout
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The request could not be built (bad URL, body encoding)
    #[error("request setup failed: {0}")]
    Setup(String),
}

/// Status and decoded body of one backend answer
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub data: Value,
}

impl ApiResponse {
    pub fn new(status: u16, data: Value) -> Self {
        Self { status, data }
    }

    /// 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Human-readable message sent by the backend.
    ///
    /// The backend wraps messages as `{"message": "..."}`; plain string bodies
    /// are accepted as-is.
    pub fn message(&self) -> Option<&str> {
        match &self.data {
            Value::String(s) => Some(s.as_str()),
            Value::Object(map) => map.get("message").and_then(Value::as_str),
            _ => None,
        }
    }

    /// String field of a JSON object body
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.data.get(name).and_then(Value::as_str)
    }
}

/// Generic request function consumed by the auth flows and the recovery workflow
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Issue one request. `path` is relative to the API base URL.
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> std::result::Result<ApiResponse, TransportError>;

    /// Install (or clear) the bearer token sent with subsequent requests
    fn set_auth_token(&self, _token: Option<&str>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_success() {
        assert!(ApiResponse::new(200, Value::Null).is_success());
        assert!(ApiResponse::new(201, Value::Null).is_success());
        assert!(!ApiResponse::new(400, Value::Null).is_success());
        assert!(!ApiResponse::new(302, Value::Null).is_success());
    }

    #[test]
    fn test_message_extraction() {
        let resp = ApiResponse::new(200, json!({"message": "email activated."}));
        assert_eq!(resp.message(), Some("email activated."));

        let resp = ApiResponse::new(200, json!("Application is working."));
        assert_eq!(resp.message(), Some("Application is working."));

        let resp = ApiResponse::new(500, json!({"error": "x"}));
        assert_eq!(resp.message(), None);

        let resp = ApiResponse::new(204, Value::Null);
        assert_eq!(resp.message(), None);
    }

    #[test]
    fn test_field_str() {
        let resp = ApiResponse::new(200, json!({"accessToken": "abc", "n": 1}));
        assert_eq!(resp.field_str("accessToken"), Some("abc"));
        assert_eq!(resp.field_str("n"), None);
        assert_eq!(resp.field_str("missing"), None);
    }
}
