//! Capability wrappers around provider-backed search operations.
//!
//! A capability validates caller-supplied parameters, delegates to the
//! prompt builder, provider, and normalizer, and returns a [`ToolOutput`].
//! Failures never cross this boundary as `Err` or panics; every failure
//! becomes a structured value that callers distinguish by the `success`
//! marker field.

mod company_search;
mod market_research;

pub use company_search::CompanySearchTool;
pub use market_research::MarketResearchTool;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::ToolError;

/// A validated, typed entry point around a provider-backed operation.
#[async_trait]
pub trait Capability: Send + Sync {
    /// The capability name, used when embedding results into stage prompts.
    fn name(&self) -> &str;

    /// Executes the capability with named parameters.
    ///
    /// Never returns `Err` and never panics; all failures are reported
    /// through the returned [`ToolOutput`].
    async fn invoke(&self, params: &HashMap<String, String>) -> ToolOutput;
}

/// The outcome of a capability invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutput {
    /// Whether the invocation succeeded. This marker field is how callers
    /// distinguish success from failure.
    pub success: bool,

    /// The result payload (for successful invocations).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    /// The failure message (for failed invocations).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// A stable tag identifying the failure kind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,

    /// Echo of the attempted parameters (for failed invocations).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_params: Option<serde_json::Value>,
}

impl ToolOutput {
    /// Creates a successful output.
    #[must_use]
    pub fn ok(data: serde_json::Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            error_kind: None,
            search_params: None,
        }
    }

    /// Creates a failure output from a validation error.
    #[must_use]
    pub fn invalid(error: &ToolError, params: serde_json::Value) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
            error_kind: Some(error.kind().to_string()),
            search_params: Some(params),
        }
    }

    /// Creates a failure output from a downstream error message.
    #[must_use]
    pub fn fail(
        kind: impl Into<String>,
        error: impl Into<String>,
        params: serde_json::Value,
    ) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            error_kind: Some(kind.into()),
            search_params: Some(params),
        }
    }

    /// Returns true if the failure carries the given kind tag.
    #[must_use]
    pub fn has_error_kind(&self, kind: &str) -> bool {
        self.error_kind.as_deref() == Some(kind)
    }
}

/// Drops empty and whitespace-only values from a parameter map, keeping only
/// the names a capability recognizes.
#[must_use]
pub fn cleaned_params(
    params: &HashMap<String, String>,
    recognized: &[&str],
) -> HashMap<String, String> {
    recognized
        .iter()
        .filter_map(|&name| {
            params
                .get(name)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(|v| (name.to_string(), v.to_string()))
        })
        .collect()
}

/// Echoes the recognized parameters as a JSON object, including empty ones.
#[must_use]
pub fn echo_params(params: &HashMap<String, String>, recognized: &[&str]) -> serde_json::Value {
    let map: serde_json::Map<String, serde_json::Value> = recognized
        .iter()
        .map(|&name| {
            (
                name.to_string(),
                serde_json::Value::String(params.get(name).cloned().unwrap_or_default()),
            )
        })
        .collect();
    serde_json::Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_output_ok() {
        let output = ToolOutput::ok(serde_json::json!({"companies": []}));
        assert!(output.success);
        assert!(output.error.is_none());
    }

    #[test]
    fn test_tool_output_invalid() {
        let err = ToolError::MissingCriteria {
            expected: "industry, product".to_string(),
        };
        let output = ToolOutput::invalid(&err, serde_json::json!({}));

        assert!(!output.success);
        assert!(output.has_error_kind("missing_criteria"));
        assert!(output.error.unwrap().contains("at least one search parameter"));
    }

    #[test]
    fn test_cleaned_params_drops_empties() {
        let mut params = HashMap::new();
        params.insert("industry".to_string(), "retail".to_string());
        params.insert("geography".to_string(), "  ".to_string());
        params.insert("unrelated".to_string(), "x".to_string());

        let cleaned = cleaned_params(&params, &["industry", "geography"]);
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned.get("industry"), Some(&"retail".to_string()));
    }

    #[test]
    fn test_echo_params_includes_empty_fields() {
        let mut params = HashMap::new();
        params.insert("industry".to_string(), "retail".to_string());

        let echo = echo_params(&params, &["industry", "geography"]);
        assert_eq!(echo["industry"], "retail");
        assert_eq!(echo["geography"], "");
    }

    #[test]
    fn test_tool_output_serialization_skips_absent_fields() {
        let output = ToolOutput::ok(serde_json::json!([]));
        let json = serde_json::to_string(&output).unwrap();
        assert!(!json.contains("error"));
        assert!(!json.contains("search_params"));
    }
}
