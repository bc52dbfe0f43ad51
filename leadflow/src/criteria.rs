//! Search criteria and the company-stage enum.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::errors::ToolError;

/// User-supplied search criteria for a lead-generation run.
///
/// All fields are optional; invoking a search capability requires at least
/// one non-empty field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    /// Target industry (e.g., "healthcare", "retail").
    #[serde(default)]
    pub industry: Option<String>,
    /// A specific company to include or find peers of.
    #[serde(default)]
    pub company_name: Option<String>,
    /// Product or technology focus.
    #[serde(default)]
    pub product: Option<String>,
    /// Company stage; must parse as a [`CompanyStage`] when present.
    #[serde(default)]
    pub company_stage: Option<String>,
    /// Location to search in (e.g., "Texas", "Europe").
    #[serde(default)]
    pub geography: Option<String>,
    /// Funding stage to search for (e.g., "seed", "series A").
    #[serde(default)]
    pub funding_stage: Option<String>,
}

impl SearchCriteria {
    /// Creates empty criteria.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the industry.
    #[must_use]
    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = Some(industry.into());
        self
    }

    /// Sets the company name.
    #[must_use]
    pub fn with_company_name(mut self, company_name: impl Into<String>) -> Self {
        self.company_name = Some(company_name.into());
        self
    }

    /// Sets the product focus.
    #[must_use]
    pub fn with_product(mut self, product: impl Into<String>) -> Self {
        self.product = Some(product.into());
        self
    }

    /// Sets the company stage.
    #[must_use]
    pub fn with_company_stage(mut self, company_stage: impl Into<String>) -> Self {
        self.company_stage = Some(company_stage.into());
        self
    }

    /// Sets the geography.
    #[must_use]
    pub fn with_geography(mut self, geography: impl Into<String>) -> Self {
        self.geography = Some(geography.into());
        self
    }

    /// Sets the funding stage.
    #[must_use]
    pub fn with_funding_stage(mut self, funding_stage: impl Into<String>) -> Self {
        self.funding_stage = Some(funding_stage.into());
        self
    }

    /// Returns true if every field is absent or whitespace-only.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields().iter().all(|(_, value)| {
            value.map_or(true, |v| v.trim().is_empty())
        })
    }

    /// Returns the field names paired with their values.
    #[must_use]
    pub fn fields(&self) -> Vec<(&'static str, Option<&str>)> {
        vec![
            ("industry", self.industry.as_deref()),
            ("company_name", self.company_name.as_deref()),
            ("product", self.product.as_deref()),
            ("company_stage", self.company_stage.as_deref()),
            ("geography", self.geography.as_deref()),
            ("funding_stage", self.funding_stage.as_deref()),
        ]
    }

    /// Converts the criteria into a parameter map, including empty fields
    /// as empty strings so templates always have a binding.
    #[must_use]
    pub fn to_params(&self) -> HashMap<String, String> {
        self.fields()
            .into_iter()
            .map(|(name, value)| (name.to_string(), value.unwrap_or("").trim().to_string()))
            .collect()
    }
}

/// The enumerated company stages accepted by the company-search capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompanyStage {
    /// Early-stage startups.
    Startup,
    /// Small and medium-sized businesses.
    Smb,
    /// Large enterprise companies.
    Enterprise,
    /// High-growth companies.
    Growing,
}

impl CompanyStage {
    /// All accepted stage values, in declaration order.
    pub const ALL: [Self; 4] = [Self::Startup, Self::Smb, Self::Enterprise, Self::Growing];

    /// The lowercase wire value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::Smb => "smb",
            Self::Enterprise => "enterprise",
            Self::Growing => "growing",
        }
    }

    /// A descriptive phrase used when building search prompts.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Startup => "early-stage startups",
            Self::Smb => "small and medium-sized businesses",
            Self::Enterprise => "large enterprise companies",
            Self::Growing => "high-growth companies",
        }
    }

    /// The accepted values, comma-joined, for error messages.
    #[must_use]
    pub fn allowed_values() -> String {
        Self::ALL
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for CompanyStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CompanyStage {
    type Err = ToolError;

    /// Parses a stage value case-insensitively.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "startup" => Ok(Self::Startup),
            "smb" => Ok(Self::Smb),
            "enterprise" => Ok(Self::Enterprise),
            "growing" => Ok(Self::Growing),
            other => Err(ToolError::InvalidParameter {
                field: "company_stage".to_string(),
                value: other.to_string(),
                allowed: Self::allowed_values(),
            }),
        }
    }
}
