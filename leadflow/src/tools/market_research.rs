//! Market research intelligence capability.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use super::{cleaned_params, echo_params, Capability, ToolOutput};
use crate::errors::ToolError;
use crate::prompts;
use crate::provider::{ChatMessage, ChatRequest, Provider};
use crate::utils::iso_timestamp;

const RECOGNIZED: [&str; 2] = ["industry", "product"];

/// Generates market-trend insights for an industry/product pair.
///
/// The result is narrative text; no structured parsing is applied beyond
/// wrapping it with the echoed criteria and a timestamp.
pub struct MarketResearchTool {
    provider: Arc<dyn Provider>,
}

impl MarketResearchTool {
    /// Creates the capability over a provider.
    #[must_use]
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }
}

impl std::fmt::Debug for MarketResearchTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketResearchTool").finish_non_exhaustive()
    }
}

#[async_trait]
impl Capability for MarketResearchTool {
    fn name(&self) -> &str {
        "market_research_intelligence"
    }

    async fn invoke(&self, params: &HashMap<String, String>) -> ToolOutput {
        let attempted = echo_params(params, &RECOGNIZED);

        let clean = cleaned_params(params, &RECOGNIZED);
        if clean.is_empty() {
            let err = ToolError::MissingCriteria {
                expected: RECOGNIZED.join(", "),
            };
            return ToolOutput::invalid(&err, attempted);
        }

        let industry = clean.get("industry").map(String::as_str);
        let product = clean.get("product").map(String::as_str);

        let request = ChatRequest::new(vec![
            ChatMessage::system(prompts::market_research_system()),
            ChatMessage::user(prompts::market_research_prompt(industry, product)),
        ]);

        match self.provider.complete(request).await {
            Ok(insights) => ToolOutput::ok(serde_json::json!({
                "insights": insights,
                "search_criteria": {
                    "industry": industry,
                    "product": product,
                },
                "generated_at": iso_timestamp(),
            })),
            Err(err) => {
                tracing::warn!(error = %err, "market research provider call failed");
                ToolOutput::fail("provider_error", err.to_string(), attempted)
            }
        }
    }
}
