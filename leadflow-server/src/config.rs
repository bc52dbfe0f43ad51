//! Server configuration loaded from the environment.

use std::path::PathBuf;

use leadflow::errors::ConfigError;

/// Environment variable holding the listen address.
pub const ADDR_VAR: &str = "LEADFLOW_ADDR";

/// Environment variable selecting the response strategy.
pub const MODE_VAR: &str = "LEADFLOW_MODE";

/// Environment variable holding the fixture document path.
pub const FIXTURE_PATH_VAR: &str = "LEADFLOW_FIXTURE_PATH";

const DEFAULT_ADDR: &str = "0.0.0.0:8080";

/// Which backend answers research requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendMode {
    /// Run the live pipeline.
    Live,
    /// Serve the configured fixture document.
    Fixture,
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The listen address.
    pub addr: String,
    /// The selected backend mode.
    pub mode: BackendMode,
    /// The fixture path; required in fixture mode.
    pub fixture_path: Option<PathBuf>,
}

impl ServerConfig {
    /// Loads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidConfiguration`] for an unknown mode and
    /// [`ConfigError::MissingConfiguration`] when fixture mode is selected
    /// without a fixture path.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads the configuration through an arbitrary lookup function.
    ///
    /// # Errors
    ///
    /// Same as [`ServerConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let addr = non_empty(lookup(ADDR_VAR)).unwrap_or_else(|| DEFAULT_ADDR.to_string());

        let mode = match non_empty(lookup(MODE_VAR)).as_deref() {
            None => BackendMode::Live,
            Some(raw) => match raw.to_lowercase().as_str() {
                "live" => BackendMode::Live,
                "fixture" => BackendMode::Fixture,
                other => {
                    return Err(ConfigError::invalid(
                        MODE_VAR,
                        format!("expected 'live' or 'fixture', got '{other}'"),
                    ))
                }
            },
        };

        let fixture_path = non_empty(lookup(FIXTURE_PATH_VAR)).map(PathBuf::from);
        if mode == BackendMode::Fixture && fixture_path.is_none() {
            return Err(ConfigError::missing(FIXTURE_PATH_VAR));
        }

        Ok(Self {
            addr,
            mode,
            fixture_path,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
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
    fn test_defaults_to_live_mode() {
        let config = ServerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.mode, BackendMode::Live);
        assert_eq!(config.addr, DEFAULT_ADDR);
    }

    #[test]
    fn test_fixture_mode_requires_path() {
        let vars = env(&[(MODE_VAR, "fixture")]);
        let err = ServerConfig::from_lookup(|name| vars.get(name).cloned()).unwrap_err();

        assert!(matches!(
            err,
            ConfigError::MissingConfiguration { ref name } if name == FIXTURE_PATH_VAR
        ));
    }

    #[test]
    fn test_fixture_mode_with_path() {
        let vars = env(&[
            (MODE_VAR, "Fixture"),
            (FIXTURE_PATH_VAR, "/tmp/leads.json"),
            (ADDR_VAR, "127.0.0.1:9000"),
        ]);
        let config = ServerConfig::from_lookup(|name| vars.get(name).cloned()).unwrap();

        assert_eq!(config.mode, BackendMode::Fixture);
        assert_eq!(config.fixture_path, Some(PathBuf::from("/tmp/leads.json")));
        assert_eq!(config.addr, "127.0.0.1:9000");
    }

    #[test]
    fn test_unknown_mode_rejected() {
        let vars = env(&[(MODE_VAR, "demo")]);
        let err = ServerConfig::from_lookup(|name| vars.get(name).cloned()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfiguration { .. }));
    }
}
