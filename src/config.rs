//! Runtime configuration: provider endpoint, timings and local storage location.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the configuration is looked up.
const DEFAULT_CONFIG_PATH: &str = "config/quiz.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "TRIVIA_ROUND_CONFIG_PATH";

const DEFAULT_QUESTION_API_URL: &str = "https://opentdb.com/api.php";
const DEFAULT_AUTO_ADVANCE_MS: u64 = 1_500;
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Immutable runtime configuration of a quiz session.
pub struct QuizConfig {
    question_api_url: String,
    auto_advance_delay: Duration,
    request_timeout: Duration,
    storage_dir: Option<PathBuf>,
}

impl QuizConfig {
    /// Load the configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match Self::from_json(&contents) {
                Ok(config) => {
                    info!(path = %path.display(), "loaded quiz configuration");
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Parse a JSON document; absent fields keep their defaults.
    pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<RawConfig>(contents).map(Into::into)
    }

    /// Full URL of the question endpoint.
    pub fn question_api_url(&self) -> &str {
        &self.question_api_url
    }

    /// Delay between recording an answer and moving on automatically.
    pub fn auto_advance_delay(&self) -> Duration {
        self.auto_advance_delay
    }

    /// Timeout applied to every outgoing HTTP request.
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Directory for file-backed storage; `None` keeps everything in memory.
    pub fn storage_dir(&self) -> Option<&PathBuf> {
        self.storage_dir.as_ref()
    }

    /// Override the auto-advance delay.
    pub fn with_auto_advance_delay(mut self, delay: Duration) -> Self {
        self.auto_advance_delay = delay;
        self
    }

    /// Persist to files under `dir`.
    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = Some(dir.into());
        self
    }
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            question_api_url: DEFAULT_QUESTION_API_URL.into(),
            auto_advance_delay: Duration::from_millis(DEFAULT_AUTO_ADVANCE_MS),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            storage_dir: None,
        }
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    question_api_url: Option<String>,
    #[serde(default)]
    auto_advance_ms: Option<u64>,
    #[serde(default)]
    request_timeout_ms: Option<u64>,
    #[serde(default)]
    storage_dir: Option<PathBuf>,
}

impl From<RawConfig> for QuizConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = Self::default();
        Self {
            question_api_url: value
                .question_api_url
                .filter(|url| !url.trim().is_empty())
                .unwrap_or(defaults.question_api_url),
            auto_advance_delay: value
                .auto_advance_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.auto_advance_delay),
            request_timeout: value
                .request_timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.request_timeout),
            storage_dir: value.storage_dir.filter(|dir| !dir.as_os_str().is_empty()),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_public_trivia_api() {
        let config = QuizConfig::default();
        assert_eq!(config.question_api_url(), "https://opentdb.com/api.php");
        assert_eq!(config.auto_advance_delay(), Duration::from_millis(1500));
        assert_eq!(config.storage_dir(), None);
    }

    #[test]
    fn partial_documents_keep_defaults() {
        let config = QuizConfig::from_json(r#"{"auto_advance_ms": 250}"#).unwrap();
        assert_eq!(config.auto_advance_delay(), Duration::from_millis(250));
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.question_api_url(), DEFAULT_QUESTION_API_URL);
    }

    #[test]
    fn full_document_is_applied() {
        let config = QuizConfig::from_json(
            r#"{
                "question_api_url": "http://localhost:9000/api.php",
                "auto_advance_ms": 0,
                "request_timeout_ms": 2500,
                "storage_dir": "/var/lib/quiz"
            }"#,
        )
        .unwrap();
        assert_eq!(config.question_api_url(), "http://localhost:9000/api.php");
        assert_eq!(config.auto_advance_delay(), Duration::ZERO);
        assert_eq!(config.request_timeout(), Duration::from_millis(2500));
        assert_eq!(config.storage_dir(), Some(&PathBuf::from("/var/lib/quiz")));
    }

    #[test]
    fn malformed_document_is_an_error() {
        assert!(QuizConfig::from_json("[1, 2]").is_err());
    }
}
