use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};

use super::MockCallTracker;
use crate::api::{ApiResponse, HttpTransport, Method, TransportError};

type Scripted = std::result::Result<ApiResponse, TransportError>;

/// Transport answering from per-path scripts.
///
/// Each path first drains its queue of scripted answers, then falls back to
/// its default answer, then to `404 {"message": "not found"}`.
#[derive(Default)]
pub struct MockTransport {
    tracker: MockCallTracker,
    queues: Mutex<HashMap<String, VecDeque<Scripted>>>,
    defaults: Mutex<HashMap<String, Scripted>>,
    bodies: Mutex<Vec<(String, Option<Value>)>>,
    auth_token: Mutex<Option<String>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one answer for `path`
    pub fn respond(&self, path: &str, status: u16, data: Value) -> &Self {
        self.push(path, Ok(ApiResponse::new(status, data)))
    }

    /// Queue one transport failure for `path`
    pub fn fail(&self, path: &str, error: TransportError) -> &Self {
        self.push(path, Err(error))
    }

    /// Answer used once the queue for `path` is empty
    pub fn set_default(&self, path: &str, status: u16, data: Value) -> &Self {
        self.defaults
            .lock()
            .insert(path.to_string(), Ok(ApiResponse::new(status, data)));
        self
    }

    /// Failure used once the queue for `path` is empty
    pub fn set_default_failure(&self, path: &str, error: TransportError) -> &Self {
        self.defaults.lock().insert(path.to_string(), Err(error));
        self
    }

    pub fn tracker(&self) -> &MockCallTracker {
        &self.tracker
    }

    pub fn calls(&self, path: &str) -> usize {
        self.tracker.call_count(path)
    }

    pub fn total_calls(&self) -> usize {
        self.tracker.get_calls().len()
    }

    /// Body of the most recent request to `path`
    pub fn last_body(&self, path: &str) -> Option<Value> {
        self.bodies
            .lock()
            .iter()
            .rev()
            .find(|(p, _)| p == path)
            .and_then(|(_, body)| body.clone())
    }

    /// Token installed through `set_auth_token`
    pub fn auth_token(&self) -> Option<String> {
        self.auth_token.lock().clone()
    }

    fn push(&self, path: &str, answer: Scripted) -> &Self {
        self.queues
            .lock()
            .entry(path.to_string())
            .or_default()
            .push_back(answer);
        self
    }

    fn next_answer(&self, path: &str) -> Scripted {
        if let Some(answer) = self.queues.lock().get_mut(path).and_then(VecDeque::pop_front) {
            return answer;
        }
        self.defaults
            .lock()
            .get(path)
            .cloned()
            .unwrap_or_else(|| Ok(ApiResponse::new(404, json!({ "message": "not found" }))))
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> std::result::Result<ApiResponse, TransportError> {
        let rendered = body.as_ref().map(Value::to_string).unwrap_or_default();
        self.tracker
            .record(path, vec![method.to_string(), rendered]);
        self.bodies.lock().push((path.to_string(), body));
        self.next_answer(path)
    }

    fn set_auth_token(&self, token: Option<&str>) {
        *self.auth_token.lock() = token.map(str::to_string);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_queue_then_default_then_404() {
        let transport = MockTransport::new();
        transport
            .respond("auth/email/confirmed", 400, json!({"message": "email not activated."}))
            .fail("auth/email/confirmed", TransportError::Timeout("slow".into()))
            .set_default("auth/email/confirmed", 200, json!({"message": "email activated."}));

        let first = transport
            .request(Method::POST, "auth/email/confirmed", Some(json!({"email": "a@b.c"})))
            .await
            .unwrap();
        assert_eq!(first.status, 400);

        let second = transport
            .request(Method::POST, "auth/email/confirmed", None)
            .await;
        assert!(second.is_err());

        for _ in 0..2 {
            let answer = transport
                .request(Method::POST, "auth/email/confirmed", None)
                .await
                .unwrap();
            assert_eq!(answer.status, 200);
        }

        let unknown = transport.request(Method::GET, "auth/cron", None).await.unwrap();
        assert_eq!(unknown.status, 404);

        assert_eq!(transport.calls("auth/email/confirmed"), 4);
        assert_eq!(transport.total_calls(), 5);
    }

    #[tokio::test]
    async fn test_records_bodies_and_token() {
        let transport = MockTransport::new();
        transport
            .request(Method::POST, "auth/activate", Some(json!({"email": "fan@furia.gg"})))
            .await
            .unwrap();
        assert_eq!(
            transport.last_body("auth/activate"),
            Some(json!({"email": "fan@furia.gg"}))
        );
        assert_eq!(transport.last_body("auth/login"), None);
        let calls = transport.tracker().get_calls_for("auth/activate");
        assert_eq!(
            calls[0].args,
            vec!["POST".to_string(), r#"{"email":"fan@furia.gg"}"#.to_string()]
        );

        transport.set_auth_token(Some("jwt"));
        assert_eq!(transport.auth_token().as_deref(), Some("jwt"));
        transport.set_auth_token(None);
        assert_eq!(transport.auth_token(), None);
    }
}
