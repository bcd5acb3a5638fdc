//! HTTP client implementation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error};

use crate::errors::DashboardError;
use crate::http::Transport;

/// HTTP client for the Gozer web API
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: Option<SecretString>,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, DashboardError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Create a new HTTP client that sends a bearer token
    pub fn with_token(base_url: &str, timeout: Duration, token: SecretString) -> Result<Self, DashboardError> {
        let mut client = Self::new(base_url, timeout)?;
        client.token = Some(token);
        Ok(client)
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, method: &str, url: &str, request: RequestBuilder) -> Result<serde_json::Value, DashboardError> {
        let mut request = request.header(header::ACCEPT, "application/json");
        if let Some(token) = &self.token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token.expose_secret()));
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            debug!("HTTP {} {}: not found", method, url);
            return Err(DashboardError::NotFound(url.to_string()));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("HTTP {} failed: {} - {}", method, status, body);
            return Err(DashboardError::FetchError(format!("{}: {}", status, body)));
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }

        serde_json::from_str(&body)
            .map_err(|e| DashboardError::FetchError(format!("malformed response from {}: {}", url, e)))
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn get(&self, path: &str) -> Result<serde_json::Value, DashboardError> {
        let url = self.url(path);
        debug!("GET {}", url);

        self.send("GET", &url, self.client.get(&url)).await
    }

    async fn put(&self, path: &str, body: serde_json::Value) -> Result<serde_json::Value, DashboardError> {
        let url = self.url(path);
        debug!("PUT {}", url);

        self.send("PUT", &url, self.client.put(&url).json(&body)).await
    }
}
