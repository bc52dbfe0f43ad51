//! Research backends: the injected live-vs-fixture strategy.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

use leadflow::errors::{ChainValidationError, PipelineError};
use leadflow::extract::CriteriaExtractor;
use leadflow::leadgen::LeadGenPipeline;
use leadflow::normalize::strip_code_fences;
use leadflow::provider::Provider;

/// Errors a backend can surface to the service boundary.
///
/// All of these map to a 5xx response; validation failures inside the
/// pipeline degrade to structured values long before they reach here.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The pipeline run was aborted.
    #[error("{0}")]
    Pipeline(#[from] PipelineError),

    /// The fixture document could not be read.
    #[error("failed to read fixture: {0}")]
    Io(#[from] std::io::Error),

    /// The fixture document is not valid JSON.
    #[error("fixture is not valid JSON: {0}")]
    Fixture(#[from] serde_json::Error),
}

/// Strategy answering research requests.
///
/// Selected once at construction from configuration; there is no runtime
/// flag flipping between implementations.
#[async_trait]
pub trait ResearchBackend: Send + Sync {
    /// Produces the response document for a free-form lead request.
    async fn research(&self, query: &str) -> Result<serde_json::Value, BackendError>;
}

/// Runs the live pipeline: extract criteria, execute the stage chain, and
/// return the final output as a JSON document.
pub struct LiveBackend {
    extractor: CriteriaExtractor,
    pipeline: LeadGenPipeline,
}

impl LiveBackend {
    /// Creates the live backend over a provider.
    ///
    /// # Errors
    ///
    /// Returns [`ChainValidationError`] if the pipeline chain fails to
    /// assemble.
    pub fn new(provider: Arc<dyn Provider>) -> Result<Self, ChainValidationError> {
        Ok(Self {
            extractor: CriteriaExtractor::new(provider.clone()),
            pipeline: LeadGenPipeline::new(provider)?,
        })
    }
}

impl std::fmt::Debug for LiveBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveBackend").finish_non_exhaustive()
    }
}

#[async_trait]
impl ResearchBackend for LiveBackend {
    async fn research(&self, query: &str) -> Result<serde_json::Value, BackendError> {
        let criteria = self.extractor.extract(query).await;
        tracing::info!(?criteria, "extracted search criteria");

        let raw = self.pipeline.run(&criteria).await?;

        // The final stage alone owns its output format. When it is not valid
        // JSON the text is passed through as a JSON string rather than
        // rejected.
        let cleaned = strip_code_fences(&raw);
        Ok(serde_json::from_str(&cleaned).unwrap_or(serde_json::Value::String(cleaned)))
    }
}

/// Serves a canned JSON document read verbatim from disk.
#[derive(Debug, Clone)]
pub struct FixtureBackend {
    path: PathBuf,
}

impl FixtureBackend {
    /// Creates a fixture backend for the given path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ResearchBackend for FixtureBackend {
    async fn research(&self, _query: &str) -> Result<serde_json::Value, BackendError> {
        let contents = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadflow::testing::ScriptedProvider;
    use pretty_assertions::assert_eq;
    use std::io::Write as _;

    #[tokio::test]
    async fn test_fixture_backend_returns_document_verbatim() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"company_name": "Canned Co", "subject": "Hello"}}]"#).unwrap();

        let backend = FixtureBackend::new(file.path());
        let value = backend.research("ignored").await.unwrap();

        assert_eq!(value[0]["company_name"], "Canned Co");
    }

    #[tokio::test]
    async fn test_fixture_backend_missing_file_errors() {
        let backend = FixtureBackend::new("/nonexistent/leads.json");
        let err = backend.research("ignored").await.unwrap_err();
        assert!(matches!(err, BackendError::Io(_)));
    }

    #[tokio::test]
    async fn test_fixture_backend_invalid_json_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let backend = FixtureBackend::new(file.path());
        let err = backend.research("ignored").await.unwrap_err();
        assert!(matches!(err, BackendError::Fixture(_)));
    }

    #[tokio::test]
    async fn test_live_backend_end_to_end_with_scripted_provider() {
        let provider = Arc::new(ScriptedProvider::new());
        // criteria extraction
        provider.push_response(r#"{"industry": "retail", "geography": "California"}"#);
        // company search tool
        provider.push_response(r#"[{"name": "Alpha", "website": "alpha.io"}]"#);
        // company research generation
        provider.push_response("Alpha analysis.");
        // market research tool
        provider.push_response("Retail insights.");
        // market research generation
        provider.push_response("[]");
        // outreach generation (empty: no word-contract pass needed)
        provider.push_response("[]");

        let backend = LiveBackend::new(provider.clone()).unwrap();
        let value = backend.research("retail companies in California").await.unwrap();

        assert_eq!(value, serde_json::json!([]));
        assert_eq!(provider.call_count(), 6);
    }

    #[tokio::test]
    async fn test_live_backend_passes_through_non_json_output() {
        let provider = Arc::new(ScriptedProvider::new());
        provider.push_response(r#"{"industry": "retail"}"#);
        provider.push_response("[]");
        provider.push_response("analysis");
        provider.push_response("insights");
        provider.push_response("[]");
        provider.push_response("Sorry, no leads were found this time.");

        let backend = LiveBackend::new(provider).unwrap();
        let value = backend.research("anything").await.unwrap();

        assert_eq!(
            value,
            serde_json::Value::String("Sorry, no leads were found this time.".to_string())
        );
    }
}
