//! Criteria extraction from free-form lead requests.

use regex::Regex;
use std::sync::Arc;
use std::sync::OnceLock;

use crate::criteria::SearchCriteria;
use crate::normalize::strip_code_fences;
use crate::prompts;
use crate::provider::{ChatMessage, ChatRequest, Provider};

const EXTRACTION_MAX_TOKENS: u32 = 200;

/// Matches a single brace-delimited fragment, used to recover a JSON object
/// embedded in surrounding prose.
fn fragment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{[^}]+\}").expect("fragment pattern is valid"))
}

/// Extracts structured search criteria from a natural-language query.
///
/// Extraction never fails the request: a provider error or an unparseable
/// reply degrades to all-empty criteria, which the downstream capability
/// will reject with its own missing-criteria signal.
pub struct CriteriaExtractor {
    provider: Arc<dyn Provider>,
}

impl CriteriaExtractor {
    /// Creates an extractor over a provider.
    #[must_use]
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }

    /// Extracts criteria from the query.
    pub async fn extract(&self, query: &str) -> SearchCriteria {
        let request = ChatRequest::new(vec![
            ChatMessage::system(prompts::extraction_system()),
            ChatMessage::user(prompts::extraction_prompt(query)),
        ])
        .with_max_tokens(EXTRACTION_MAX_TOKENS);

        match self.provider.complete(request).await {
            Ok(content) => parse_criteria(&content),
            Err(err) => {
                tracing::warn!(error = %err, "criteria extraction call failed, using empty criteria");
                SearchCriteria::default()
            }
        }
    }
}

impl std::fmt::Debug for CriteriaExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CriteriaExtractor").finish_non_exhaustive()
    }
}

/// Parses the extraction reply: direct JSON first, then a brace-delimited
/// fragment, then all-empty criteria.
fn parse_criteria(content: &str) -> SearchCriteria {
    let cleaned = strip_code_fences(content);

    if let Ok(criteria) = serde_json::from_str::<SearchCriteria>(&cleaned) {
        return criteria;
    }

    if let Some(fragment) = fragment_re().find(&cleaned) {
        if let Ok(criteria) = serde_json::from_str::<SearchCriteria>(fragment.as_str()) {
            return criteria;
        }
    }

    tracing::warn!(preview = %cleaned.chars().take(80).collect::<String>(),
        "failed to parse extraction reply, using empty criteria");
    SearchCriteria::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ProviderError;
    use crate::testing::ScriptedProvider;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_extracts_direct_json() {
        let provider = Arc::new(ScriptedProvider::new());
        provider.push_response(
            r#"{"industry": "retail", "company_stage": "startup", "geography": "California",
                "funding_stage": "seed", "product": "AI customer analytics"}"#,
        );

        let extractor = CriteriaExtractor::new(provider.clone());
        let criteria = extractor.extract("retail startups in California").await;

        assert_eq!(criteria.industry.as_deref(), Some("retail"));
        assert_eq!(criteria.product.as_deref(), Some("AI customer analytics"));

        let requests = provider.requests();
        assert_eq!(requests[0].max_tokens, Some(200));
        assert!(requests[0].messages[1]
            .content
            .contains("retail startups in California"));
    }

    #[tokio::test]
    async fn test_recovers_fragment_from_prose() {
        let provider = Arc::new(ScriptedProvider::new());
        provider.push_response(
            "Here is the JSON you asked for: {\"industry\": \"fintech\", \"geography\": \"Europe\"} hope it helps",
        );

        let extractor = CriteriaExtractor::new(provider);
        let criteria = extractor.extract("fintech in Europe").await;

        assert_eq!(criteria.industry.as_deref(), Some("fintech"));
        assert_eq!(criteria.geography.as_deref(), Some("Europe"));
    }

    #[tokio::test]
    async fn test_fenced_reply_is_cleaned() {
        let provider = Arc::new(ScriptedProvider::new());
        provider.push_response("```json\n{\"industry\": \"retail\"}\n```");

        let extractor = CriteriaExtractor::new(provider);
        let criteria = extractor.extract("anything").await;

        assert_eq!(criteria.industry.as_deref(), Some("retail"));
    }

    #[tokio::test]
    async fn test_unparseable_reply_degrades_to_empty() {
        let provider = Arc::new(ScriptedProvider::new());
        provider.push_response("I could not determine the criteria.");

        let extractor = CriteriaExtractor::new(provider);
        let criteria = extractor.extract("anything").await;

        assert!(criteria.is_empty());
    }

    #[tokio::test]
    async fn test_provider_failure_degrades_to_empty() {
        let provider = Arc::new(ScriptedProvider::new());
        provider.push_failure(ProviderError::Request("down".to_string()));

        let extractor = CriteriaExtractor::new(provider);
        let criteria = extractor.extract("anything").await;

        assert!(criteria.is_empty());
    }
}
