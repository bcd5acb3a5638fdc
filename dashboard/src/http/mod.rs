//! HTTP transport for the Gozer API

pub mod client;
pub mod mock;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::errors::DashboardError;

pub use client::HttpClient;
pub use mock::MockTransport;

/// Request/response transport used by the services
///
/// A 404 surfaces as [`DashboardError::NotFound`], every other failure as
/// [`DashboardError::FetchError`]. An empty response body is `Value::Null`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `path` and return the JSON body
    async fn get(&self, path: &str) -> Result<serde_json::Value, DashboardError>;

    /// PUT a JSON body to `path` and return the JSON acknowledgement
    async fn put(&self, path: &str, body: serde_json::Value) -> Result<serde_json::Value, DashboardError>;
}

/// Decode a response body into a typed model
pub fn decode<T: DeserializeOwned>(value: serde_json::Value, path: &str) -> Result<T, DashboardError> {
    serde_json::from_value(value)
        .map_err(|e| DashboardError::FetchError(format!("malformed response from {}: {}", path, e)))
}

/// Encode a name for use as a single path segment
pub fn path_segment(name: &str) -> String {
    url::form_urlencoded::byte_serialize(name.as_bytes()).collect()
}
