//! Error types for the leadflow pipeline.
//!
//! Validation and normalization problems are absorbed close to where they
//! occur and become typed result values; only configuration-time failures and
//! provider errors escaping a direct generation call are surfaced as `Err`.

use thiserror::Error;

/// The main error type for leadflow operations.
#[derive(Debug, Error)]
pub enum LeadflowError {
    /// A configuration error occurred at startup.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// A pipeline run failed.
    #[error("{0}")]
    Pipeline(#[from] PipelineError),

    /// A provider call failed outside a pipeline run.
    #[error("{0}")]
    Provider(#[from] ProviderError),

    /// A stage chain failed validation.
    #[error("{0}")]
    Validation(#[from] ChainValidationError),
}

/// Errors raised while loading configuration.
///
/// These are fatal: they are detected at construction time, before any
/// request is served.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// A required setting is absent or empty.
    #[error("missing configuration: {name} must be set")]
    MissingConfiguration {
        /// The name of the missing setting.
        name: String,
    },

    /// A setting is present but cannot be used.
    #[error("invalid configuration for {name}: {reason}")]
    InvalidConfiguration {
        /// The name of the offending setting.
        name: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {reason}")]
    HttpClient {
        /// The underlying build error.
        reason: String,
    },
}

impl ConfigError {
    /// Creates a missing-configuration error.
    #[must_use]
    pub fn missing(name: impl Into<String>) -> Self {
        Self::MissingConfiguration { name: name.into() }
    }

    /// Creates an invalid-configuration error.
    #[must_use]
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Errors from the external intelligence provider.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// The request did not complete within the configured timeout.
    #[error("provider request timed out after {seconds}s")]
    Timeout {
        /// The configured timeout in seconds.
        seconds: u64,
    },

    /// The request could not be sent or the connection failed.
    #[error("provider request failed: {0}")]
    Request(String),

    /// The provider answered with a non-success status.
    #[error("provider returned status {status}: {message}")]
    Api {
        /// The HTTP status code.
        status: u16,
        /// The response body or error message.
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

/// Validation errors signalled by capability wrappers.
///
/// These never cross the wrapper boundary as `Err`; they are converted into
/// structured [`ToolOutput`](crate::tools::ToolOutput) error payloads. The
/// enum exists so the payloads carry a stable kind tag alongside the message.
#[derive(Debug, Clone, Error)]
pub enum ToolError {
    /// An enum-constrained parameter had a value outside the allowed set.
    #[error("invalid {field} '{value}'. Must be one of: {allowed}")]
    InvalidParameter {
        /// The parameter name.
        field: String,
        /// The rejected value.
        value: String,
        /// The allowed values, comma-joined.
        allowed: String,
    },

    /// No usable search parameter was provided.
    #[error("at least one search parameter must be provided ({expected})")]
    MissingCriteria {
        /// The accepted parameter names, comma-joined.
        expected: String,
    },
}

impl ToolError {
    /// Returns the stable kind tag used in structured error payloads.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidParameter { .. } => "invalid_parameter",
            Self::MissingCriteria { .. } => "missing_criteria",
        }
    }
}

/// Error raised when a prompt template references an unbound variable.
#[derive(Debug, Clone, Error)]
#[error("prompt template references unbound variable '{placeholder}'")]
pub struct TemplateError {
    /// The unresolved placeholder name.
    pub placeholder: String,
}

impl TemplateError {
    /// Creates a new template error.
    #[must_use]
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
        }
    }
}

/// Error raised when a stage chain fails validation.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ChainValidationError {
    /// The error message.
    pub message: String,
    /// The stages involved in the error.
    pub stages: Vec<String>,
}

impl ChainValidationError {
    /// Creates a new chain validation error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stages: Vec::new(),
        }
    }

    /// Sets the stages involved.
    #[must_use]
    pub fn with_stages(mut self, stages: Vec<String>) -> Self {
        self.stages = stages;
        self
    }
}

/// Errors that abort a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A stage template referenced an unbound variable. Detected before the
    /// stage's provider call is made.
    #[error("stage '{stage}': {source}")]
    Template {
        /// The stage whose template failed to render.
        stage: String,
        /// The underlying template error.
        #[source]
        source: TemplateError,
    },

    /// A generation call failed and the error escaped the stage. This is the
    /// one unrecoverable path: later stages are not attempted.
    #[error("stage '{stage}' failed: {source}")]
    StageFailed {
        /// The stage whose generation call failed.
        stage: String,
        /// The underlying provider error.
        #[source]
        source: ProviderError,
    },

    /// The chain failed validation before execution.
    #[error("{0}")]
    Validation(#[from] ChainValidationError),
}
