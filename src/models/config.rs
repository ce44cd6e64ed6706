//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP client settings
    #[serde(default)]
    pub client: ClientConfig,

    /// Exam session page settings
    #[serde(default)]
    pub session: SessionConfig,

    /// Print/export settings
    #[serde(default)]
    pub export: ExportConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.client.base_url.trim().is_empty() {
            return Err(AppError::validation("client.base_url is empty"));
        }
        url::Url::parse(&self.client.base_url)?;
        if self.client.user_agent.trim().is_empty() {
            return Err(AppError::validation("client.user_agent is empty"));
        }
        if self.client.timeout_secs == 0 {
            return Err(AppError::validation("client.timeout_secs must be > 0"));
        }
        if self.session.subjects.is_empty() {
            return Err(AppError::validation("No session subjects defined"));
        }
        if self.session.subjects.iter().any(|s| s.trim().is_empty()) {
            return Err(AppError::validation("session.subjects contains a blank name"));
        }
        if !self.session.ranking_page.starts_with('/') {
            return Err(AppError::validation(
                "session.ranking_page must be an absolute path",
            ));
        }
        Ok(())
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server root, e.g. `http://localhost:5000`
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Exam session page settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Exam the session times are saved against
    #[serde(default)]
    pub exam_id: Option<i64>,

    /// Subject buttons offered during a session
    #[serde(default = "defaults::subjects")]
    pub subjects: Vec<String>,

    /// Page to open after a successful save
    #[serde(default = "defaults::ranking_page")]
    pub ranking_page: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            exam_id: None,
            subjects: defaults::subjects(),
            ranking_page: defaults::ranking_page(),
        }
    }
}

/// Print/export settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory printed reports are written to
    #[serde(default = "defaults::output_dir")]
    pub output_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: defaults::output_dir(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    pub fn base_url() -> String {
        "http://localhost:5000".into()
    }
    pub fn user_agent() -> String {
        "simulados-cli/0.1".into()
    }
    pub fn timeout() -> u64 {
        15
    }
    pub fn subjects() -> Vec<String> {
        [
            "Português",
            "Matemática",
            "Raciocínio Lógico",
            "Informática",
            "Direito Constitucional",
            "Direito Administrativo",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }
    pub fn ranking_page() -> String {
        "/ranking-simulados".into()
    }
    pub fn output_dir() -> PathBuf {
        PathBuf::from("reports")
    }
}
