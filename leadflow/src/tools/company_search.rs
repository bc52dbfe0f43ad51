//! Company intelligence search capability.

use async_trait::async_trait;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use super::{cleaned_params, echo_params, Capability, ToolOutput};
use crate::criteria::{CompanyStage, SearchCriteria};
use crate::errors::ToolError;
use crate::normalize;
use crate::prompts;
use crate::provider::{ChatMessage, ChatRequest, Provider};
use crate::utils::iso_timestamp;

/// Parameters the company search recognizes.
const RECOGNIZED: [&str; 6] = [
    "industry",
    "company_name",
    "product",
    "company_stage",
    "geography",
    "funding_stage",
];

/// Low temperature keeps the JSON output shape stable.
const SEARCH_TEMPERATURE: f64 = 0.1;

/// Searches for companies matching the supplied criteria.
///
/// Validation order: an enum-constrained `company_stage` is checked first
/// (case-insensitively); then, after dropping empty values, at least one
/// parameter must remain. Validation failures are reported without invoking
/// the provider.
pub struct CompanySearchTool {
    provider: Arc<dyn Provider>,
}

impl CompanySearchTool {
    /// Creates the capability over a provider.
    #[must_use]
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }
}

impl std::fmt::Debug for CompanySearchTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompanySearchTool").finish_non_exhaustive()
    }
}

#[async_trait]
impl Capability for CompanySearchTool {
    fn name(&self) -> &str {
        "company_intelligence_search"
    }

    async fn invoke(&self, params: &HashMap<String, String>) -> ToolOutput {
        let attempted = echo_params(params, &RECOGNIZED);

        let stage = match params.get("company_stage").map(|v| v.trim()).filter(|v| !v.is_empty()) {
            Some(raw) => match CompanyStage::from_str(raw) {
                Ok(stage) => Some(stage),
                Err(err) => return ToolOutput::invalid(&err, attempted),
            },
            None => None,
        };

        let clean = cleaned_params(params, &RECOGNIZED);
        if clean.is_empty() {
            let err = ToolError::MissingCriteria {
                expected: RECOGNIZED.join(", "),
            };
            return ToolOutput::invalid(&err, attempted);
        }

        let criteria = SearchCriteria {
            industry: clean.get("industry").cloned(),
            company_name: clean.get("company_name").cloned(),
            product: clean.get("product").cloned(),
            company_stage: stage.map(|s| s.as_str().to_string()),
            geography: clean.get("geography").cloned(),
            funding_stage: clean.get("funding_stage").cloned(),
        };

        let request = ChatRequest::new(vec![
            ChatMessage::system(prompts::company_search_system()),
            ChatMessage::user(prompts::company_search_prompt(&criteria)),
        ])
        .with_temperature(SEARCH_TEMPERATURE);

        match self.provider.complete(request).await {
            Ok(raw) => {
                let companies = normalize::parse_company_records(&raw);
                let total_companies = companies.len();
                ToolOutput::ok(serde_json::json!({
                    "companies": companies,
                    "search_criteria": criteria,
                    "total_companies": total_companies,
                    "generated_at": iso_timestamp(),
                }))
            }
            Err(err) => {
                tracing::warn!(error = %err, "company search provider call failed");
                ToolOutput::fail("provider_error", err.to_string(), attempted)
            }
        }
    }
}
