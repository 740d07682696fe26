//! Endpoint configuration for the chat-completion backend.

use std::time::Duration;

/// Environment variable holding the bearer credential.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
/// Environment variable overriding the API base URL.
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";
/// Environment variable overriding the per-request timeout, in seconds.
pub const REQUEST_TIMEOUT_VAR: &str = "FANOUT_REQUEST_TIMEOUT_SECS";

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Errors raised while assembling configuration at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Chat-completion endpoint settings.
#[derive(Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl std::fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl LlmConfig {
    /// Config for `api_key` against the default endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: format!("fanout/{}", crate::VERSION),
        }
    }

    /// Create from environment variables
    ///
    /// Reads:
    /// - OPENAI_API_KEY (required)
    /// - OPENAI_BASE_URL (optional, default: "https://api.openai.com/v1")
    /// - FANOUT_REQUEST_TIMEOUT_SECS (optional, default: 60)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`LlmConfig::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingVar(API_KEY_VAR))?;

        let mut config = Self::new(api_key);

        if let Some(base_url) = lookup(BASE_URL_VAR).filter(|v| !v.trim().is_empty()) {
            config = config.with_base_url(base_url)?;
        }

        if let Some(raw) = lookup(REQUEST_TIMEOUT_VAR) {
            let secs: u64 = raw.trim().parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::InvalidValue {
                    key: REQUEST_TIMEOUT_VAR,
                    value: raw.clone(),
                    reason: e.to_string(),
                }
            })?;
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    key: REQUEST_TIMEOUT_VAR,
                    value: raw,
                    reason: "timeout must be positive".to_string(),
                });
            }
            config.request_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Point at a different OpenAI-compatible endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Result<Self, ConfigError> {
        let base_url = base_url.into();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                key: BASE_URL_VAR,
                value: base_url,
                reason: "expected an http(s) URL".to_string(),
            });
        }
        self.base_url = base_url.trim_end_matches('/').to_string();
        Ok(self)
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Full URL of the chat-completion route.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_missing_api_key_is_configuration_error() {
        let err = LlmConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(API_KEY_VAR)));

        let err = LlmConfig::from_lookup(lookup(&[(API_KEY_VAR, "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(_)));
    }

    #[test]
    fn test_defaults_apply() {
        let config = LlmConfig::from_lookup(lookup(&[(API_KEY_VAR, "sk-test")])).unwrap();
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(
            config.completions_url(),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_overrides_from_environment() {
        let config = LlmConfig::from_lookup(lookup(&[
            (API_KEY_VAR, "sk-test"),
            (BASE_URL_VAR, "https://openai.vocareum.com/v1/"),
            (REQUEST_TIMEOUT_VAR, "15"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "https://openai.vocareum.com/v1");
        assert_eq!(config.request_timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        let err = LlmConfig::from_lookup(lookup(&[
            (API_KEY_VAR, "sk-test"),
            (REQUEST_TIMEOUT_VAR, "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == REQUEST_TIMEOUT_VAR));

        let err = LlmConfig::from_lookup(lookup(&[
            (API_KEY_VAR, "sk-test"),
            (REQUEST_TIMEOUT_VAR, "0"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("positive"));
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let err = LlmConfig::new("sk").with_base_url("ftp://example").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == BASE_URL_VAR));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let rendered = format!("{:?}", LlmConfig::new("sk-secret"));
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
