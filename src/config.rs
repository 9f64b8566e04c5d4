//! Agent configuration.
//!
//! [`AgentConfig`] holds everything needed to reach the language model: the Ollama base
//! URL, the model name and the request timeout. It can only be obtained through
//! [`AgentConfig::new`] or [`AgentConfigBuilder::build`], both of which validate the values,
//! so a config in hand is always usable.

use crate::error::{ProjkilmatError, Result};
use std::time::Duration;

/// Base URL of a local Ollama server.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434/";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemma3:1b";

/// Timeout used by the application entry point.
pub const DEFAULT_APP_TIMEOUT: Duration = Duration::from_secs(120);

/// Timeout a builder starts with.
pub const DEFAULT_BUILDER_TIMEOUT: Duration = Duration::from_secs(60);

/// Immutable configuration for the agent and its Ollama backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    base_url: String,
    model_name: String,
    timeout: Duration,
}

impl AgentConfig {
    /// Create a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ProjkilmatError::ConfigError`] when the base URL or model name is blank,
    /// when the base URL is not an http(s) URL, or when the timeout is zero.
    pub fn new(
        base_url: impl Into<String>,
        model_name: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let base_url = base_url.into();
        let model_name = model_name.into();

        if base_url.trim().is_empty() || model_name.trim().is_empty() {
            return Err(ProjkilmatError::ConfigError(
                "Base URL and model name must not be blank".to_string(),
            ));
        }

        let parsed = reqwest::Url::parse(base_url.trim()).map_err(|e| {
            ProjkilmatError::ConfigError(format!("Invalid base URL '{}': {}", base_url, e))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ProjkilmatError::ConfigError(format!(
                "Base URL must use http or https, got '{}'",
                parsed.scheme()
            )));
        }

        if timeout.is_zero() {
            return Err(ProjkilmatError::ConfigError("Timeout must be positive".to_string()));
        }

        Ok(Self {
            base_url: base_url.trim().to_string(),
            model_name: model_name.trim().to_string(),
            timeout,
        })
    }

    /// Start building a configuration.
    pub fn builder() -> AgentConfigBuilder {
        AgentConfigBuilder::default()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Base URL without trailing slashes, ready to have `/api/...` appended.
    pub fn ollama_host(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

/// Add the `http://` scheme Ollama's own `OLLAMA_HOST` convention leaves out (`127.0.0.1:11434`).
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    }
}

/// Builder for [`AgentConfig`].
///
/// ```ignore
/// let config = AgentConfig::builder()
///     .base_url("http://localhost:11434/")
///     .model_name("gemma3:1b")
///     .timeout(Duration::from_secs(120))
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct AgentConfigBuilder {
    base_url: Option<String>,
    model_name: Option<String>,
    timeout: Duration,
}

impl Default for AgentConfigBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            model_name: None,
            timeout: DEFAULT_BUILDER_TIMEOUT,
        }
    }
}

impl AgentConfigBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = Some(model_name.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validate and build the configuration.
    pub fn build(self) -> Result<AgentConfig> {
        let base_url = self
            .base_url
            .ok_or_else(|| ProjkilmatError::ConfigError("Base URL cannot be null".to_string()))?;
        let model_name = self
            .model_name
            .ok_or_else(|| ProjkilmatError::ConfigError("Model name cannot be null".to_string()))?;

        AgentConfig::new(base_url, model_name, self.timeout)
    }
}
