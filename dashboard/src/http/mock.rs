//! In-memory transport serving canned responses

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::errors::DashboardError;
use crate::http::Transport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Put,
}

/// Canned response for one method and path
#[derive(Debug, Clone)]
pub enum MockResponse {
    Json(serde_json::Value),
    NotFound,
    Failure(String),
}

/// A request seen by the mock
#[derive(Debug, Clone, PartialEq)]
pub struct MockRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
}

/// Transport answering from a response table
///
/// Unknown GET paths answer 404; unknown PUT paths answer with an empty
/// acknowledgement.
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<HashMap<(Method, String), MockResponse>>,
    requests: Mutex<Vec<MockRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, method: Method, path: &str, response: MockResponse) -> Self {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert((method, path.to_string()), response);
        self
    }

    pub fn with_json(self, path: &str, body: serde_json::Value) -> Self {
        self.respond(Method::Get, path, MockResponse::Json(body))
    }

    pub fn with_not_found(self, path: &str) -> Self {
        self.respond(Method::Get, path, MockResponse::NotFound)
    }

    pub fn with_failure(self, path: &str, message: &str) -> Self {
        self.respond(Method::Get, path, MockResponse::Failure(message.to_string()))
    }

    /// Requests received so far, in arrival order
    pub fn requests(&self) -> Vec<MockRequest> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Requests received so far with the given method
    pub fn requests_with(&self, method: Method) -> Vec<MockRequest> {
        self.requests().into_iter().filter(|r| r.method == method).collect()
    }

    fn answer(&self, method: Method, path: &str, body: Option<serde_json::Value>) -> Result<serde_json::Value, DashboardError> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(MockRequest {
                method,
                path: path.to_string(),
                body,
            });

        let response = self
            .responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&(method, path.to_string()))
            .cloned();

        match (method, response) {
            (_, Some(MockResponse::Json(value))) => Ok(value),
            (_, Some(MockResponse::NotFound)) | (Method::Get, None) => Err(DashboardError::NotFound(path.to_string())),
            (_, Some(MockResponse::Failure(message))) => Err(DashboardError::FetchError(message)),
            (Method::Put, None) => Ok(serde_json::Value::Null),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, path: &str) -> Result<serde_json::Value, DashboardError> {
        self.answer(Method::Get, path, None)
    }

    async fn put(&self, path: &str, body: serde_json::Value) -> Result<serde_json::Value, DashboardError> {
        self.answer(Method::Put, path, Some(body))
    }
}
