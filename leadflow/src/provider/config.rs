//! Provider configuration loaded from the environment.

use std::time::Duration;

use crate::errors::ConfigError;

/// Environment variable holding the API credential.
pub const API_KEY_VAR: &str = "PERPLEXITY_API_KEY";

/// Environment variable holding the model identifier.
pub const MODEL_VAR: &str = "PERPLEXITY_MODEL_NAME";

/// Environment variable overriding the API base URL.
pub const BASE_URL_VAR: &str = "PERPLEXITY_BASE_URL";

/// Environment variable overriding the request timeout, in seconds.
pub const TIMEOUT_VAR: &str = "LEADFLOW_REQUEST_TIMEOUT_SECS";

const DEFAULT_BASE_URL: &str = "https://api.perplexity.ai";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration for the HTTP provider client.
///
/// The credential and model identifier are required; loading fails fast with
/// [`ConfigError::MissingConfiguration`] before any request is served.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// The API credential sent as a bearer token.
    pub api_key: String,
    /// The model identifier sent with every request.
    pub model: String,
    /// The API base URL.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl ProviderConfig {
    /// Creates a configuration with the default base URL and timeout.
    #[must_use]
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Overrides the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides the request timeout.
    #[must_use]
    pub fn with_timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Loads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingConfiguration`] when the credential or
    /// model identifier is absent or empty, and
    /// [`ConfigError::InvalidConfiguration`] when the timeout override is
    /// not a number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads the configuration through an arbitrary lookup function.
    ///
    /// # Errors
    ///
    /// Same as [`ProviderConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = required(&lookup, API_KEY_VAR)?;
        let model = required(&lookup, MODEL_VAR)?;

        let mut config = Self::new(api_key, model);

        if let Some(base_url) = optional(&lookup, BASE_URL_VAR) {
            config.base_url = base_url;
        }
        if let Some(timeout) = optional(&lookup, TIMEOUT_VAR) {
            config.timeout_seconds = timeout
                .parse()
                .map_err(|_| ConfigError::invalid(TIMEOUT_VAR, format!("not a number: '{timeout}'")))?;
        }

        Ok(config)
    }

    /// The request timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

fn required<F>(lookup: &F, name: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, name).ok_or_else(|| ConfigError::missing(name))
}

fn optional<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_from_lookup_full() {
        let vars = env(&[
            (API_KEY_VAR, "pplx-key"),
            (MODEL_VAR, "sonar-pro"),
            (BASE_URL_VAR, "https://proxy.local"),
            (TIMEOUT_VAR, "30"),
        ]);

        let config = ProviderConfig::from_lookup(|name| vars.get(name).cloned()).unwrap();
        assert_eq!(config.api_key, "pplx-key");
        assert_eq!(config.model, "sonar-pro");
        assert_eq!(config.base_url, "https://proxy.local");
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_missing_api_key_fails_fast() {
        let vars = env(&[(MODEL_VAR, "sonar-pro")]);
        let err = ProviderConfig::from_lookup(|name| vars.get(name).cloned()).unwrap_err();

        assert!(matches!(
            err,
            ConfigError::MissingConfiguration { ref name } if name == API_KEY_VAR
        ));
    }

    #[test]
    fn test_empty_model_counts_as_missing() {
        let vars = env(&[(API_KEY_VAR, "pplx-key"), (MODEL_VAR, "   ")]);
        let err = ProviderConfig::from_lookup(|name| vars.get(name).cloned()).unwrap_err();

        assert!(matches!(
            err,
            ConfigError::MissingConfiguration { ref name } if name == MODEL_VAR
        ));
    }

    #[test]
    fn test_invalid_timeout_rejected() {
        let vars = env(&[
            (API_KEY_VAR, "pplx-key"),
            (MODEL_VAR, "sonar-pro"),
            (TIMEOUT_VAR, "soon"),
        ]);
        let err = ProviderConfig::from_lookup(|name| vars.get(name).cloned()).unwrap_err();

        assert!(matches!(err, ConfigError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_defaults_applied() {
        let vars = env(&[(API_KEY_VAR, "k"), (MODEL_VAR, "m")]);
        let config = ProviderConfig::from_lookup(|name| vars.get(name).cloned()).unwrap();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_seconds, DEFAULT_TIMEOUT_SECS);
    }
}
