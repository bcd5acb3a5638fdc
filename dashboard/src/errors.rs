//! Error types for the Gozer dashboard

use thiserror::Error;

/// Main error type for the Gozer dashboard
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Transport failure, non-success status or malformed response body
    #[error("Fetch error: {0}")]
    FetchError(String),

    /// Well-formed response indicating absence
    #[error("Not found: {0}")]
    NotFound(String),

    /// No container of a deployment resolves to known image data
    #[error("Aggregation error: {0}")]
    AggregationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DashboardError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, DashboardError::NotFound(_))
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(err: reqwest::Error) -> Self {
        DashboardError::FetchError(err.to_string())
    }
}

impl From<anyhow::Error> for DashboardError {
    fn from(err: anyhow::Error) -> Self {
        DashboardError::Internal(err.to_string())
    }
}
