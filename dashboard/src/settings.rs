//! Settings file management

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::fs;

use crate::errors::DashboardError;
use crate::http::{HttpClient, Transport};
use crate::logs::{LogLevel, LogOptions};

/// Dashboard settings
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Log output
    #[serde(default)]
    pub log: LogSettings,

    /// Backend configuration
    #[serde(default)]
    pub backend: BackendSettings,

    /// Where image history is read from
    #[serde(default)]
    pub images_source: ImagesSource,
}

impl Settings {
    /// Read settings from a JSON file
    pub async fn load(path: &Path) -> Result<Self, DashboardError> {
        let contents = fs::read_to_string(path).await?;
        let settings = serde_json::from_str(&contents)?;
        Ok(settings)
    }

    /// Logging options for [`crate::logs::init_logging`]
    pub fn log_options(&self) -> LogOptions {
        LogOptions {
            log_level: self.log_level,
            console: self.log.console,
            log_dir: self.log.dir.clone(),
            json_format: self.log.json,
        }
    }
}

/// Log output settings
#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// Log to stderr
    #[serde(default = "default_true")]
    pub console: bool,

    /// JSON lines instead of plain text on the console
    #[serde(default)]
    pub json: bool,

    /// Directory for daily rolling log files
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

fn default_true() -> bool {
    true
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            console: true,
            json: false,
            dir: None,
        }
    }
}

/// Backend API settings
#[derive(Debug, Deserialize)]
pub struct BackendSettings {
    /// Base URL of the Gozer web API
    #[serde(default = "default_backend_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Optional bearer token
    #[serde(default, deserialize_with = "deserialize_token")]
    pub token: Option<SecretString>,
}

fn default_backend_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn deserialize_token<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(SecretString::from))
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
            timeout_secs: default_timeout_secs(),
            token: None,
        }
    }
}

impl BackendSettings {
    /// Build the HTTP transport described by these settings
    pub fn transport(&self) -> Result<Arc<dyn Transport>, DashboardError> {
        if self.base_url.trim().is_empty() {
            return Err(DashboardError::ConfigError("backend base_url is empty".to_string()));
        }

        let timeout = Duration::from_secs(self.timeout_secs);
        let client = match &self.token {
            Some(token) => HttpClient::with_token(
                &self.base_url,
                timeout,
                SecretString::from(token.expose_secret().to_string()),
            )?,
            None => HttpClient::new(&self.base_url, timeout)?,
        };
        Ok(Arc::new(client))
    }
}

/// Source of image history
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ImagesSource {
    /// `GET /images/{name}` and `GET /images/{name}/{version}`
    #[default]
    Api,

    /// A pre-baked `{images: [...]}` file filtered client-side
    Static {
        #[serde(default = "default_static_images_path")]
        path: String,
    },
}

fn default_static_images_path() -> String {
    "/static/images.json".to_string()
}
