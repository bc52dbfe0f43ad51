//! Prompt construction for the external intelligence provider.
//!
//! Every function here is a pure mapping from typed input to an instruction
//! string. The output-shape contracts embedded in the search prompts are the
//! only place where the expected field names and cardinality limits are
//! stated; the normalizer relies on the provider honoring them.

use std::fmt::Write as _;
use std::str::FromStr;

use crate::criteria::{CompanyStage, SearchCriteria};

/// Maximum number of company records a search response may contain.
pub const MAX_COMPANY_RECORDS: usize = 5;

/// System prompt for the company-search call site.
#[must_use]
pub fn company_search_system() -> &'static str {
    "You are a company research assistant. You MUST return ONLY valid JSON \
     arrays with no additional text."
}

/// Builds the company-search instruction from the criteria.
///
/// Only non-empty criteria contribute filter clauses; when nothing applies
/// the search defaults to the technology sector.
#[must_use]
pub fn company_search_prompt(criteria: &SearchCriteria) -> String {
    let mut clauses: Vec<String> = Vec::new();

    if let Some(industry) = non_empty(criteria.industry.as_deref()) {
        clauses.push(format!("in the {industry} industry"));
    }
    if let Some(company_name) = non_empty(criteria.company_name.as_deref()) {
        clauses.push(format!("including or similar to {company_name}"));
    }
    if let Some(product) = non_empty(criteria.product.as_deref()) {
        clauses.push(format!("related to {product}"));
    }
    if let Some(stage) = non_empty(criteria.company_stage.as_deref()) {
        if let Ok(stage) = CompanyStage::from_str(stage) {
            clauses.push(format!("focusing on {}", stage.description()));
        }
    }
    if let Some(geography) = non_empty(criteria.geography.as_deref()) {
        clauses.push(format!("located in {geography}"));
    }
    if let Some(funding_stage) = non_empty(criteria.funding_stage.as_deref()) {
        clauses.push(format!("at {funding_stage} funding stage"));
    }

    let scope = if clauses.is_empty() {
        "in the technology sector".to_string()
    } else {
        clauses.join(" ")
    };

    format!(
        r#"Return only a JSON array of companies {scope}. Each company should be a flat object with these exact fields:

{{
  "name": "Example Company Inc",
  "website": "www.example.com",
  "description": "Brief company description",
  "headquarters": "San Francisco, USA",
  "employee_count": "500",
  "funding_status": "Series A",
  "product_list": "Product1, Product2, Product3",
  "competitor_list": "Competitor1, Competitor2, Competitor3",
  "founded_year": "2020",
  "revenue_range": "$10M-$50M"
}}

Important instructions:
1. Return ONLY a JSON array of objects with the exact structure shown above
2. Do not use nested arrays or objects
3. Use comma-separated strings for lists (product_list and competitor_list)
4. Return only factual, verifiable information
5. Limit to {MAX_COMPANY_RECORDS} most relevant companies
6. The response must be valid JSON with no additional text
7. Do not include any markdown formatting or explanation"#
    )
}

/// System prompt for the market-research call site.
#[must_use]
pub fn market_research_system() -> &'static str {
    "You are an expert market research analyst providing strategic, \
     forward-looking business insights."
}

/// Builds the market-research instruction for an industry/product pair.
#[must_use]
pub fn market_research_prompt(industry: Option<&str>, product: Option<&str>) -> String {
    let mut query_parts: Vec<&str> = Vec::new();
    if let Some(product) = non_empty(product) {
        query_parts.push(product);
    }
    if let Some(industry) = non_empty(industry) {
        query_parts.push(industry);
    }

    let query = if query_parts.is_empty() {
        "technology innovation".to_string()
    } else {
        query_parts.join(" ")
    };

    let mut prompt = String::new();
    let _ = write!(
        prompt,
        "You are a top-tier market research analyst conducting an in-depth \
         strategic analysis on {query}.\n\n\
         Provide a comprehensive market research report that includes:\n\n"
    );
    prompt.push_str(
        "1. Market Landscape Analysis:\n\
         - Current market dynamics\n\
         - Emerging trends and innovations\n\
         - Key players and competitive ecosystem\n\n\
         2. Strategic Opportunities:\n\
         - Potential business opportunities\n\
         - Innovative application areas\n\
         - Untapped market segments\n\n\
         3. Technology and Innovation Insights:\n\
         - Cutting-edge technological developments\n\
         - Potential disruptive technologies\n\
         - Future technology trajectories\n\n\
         4. Business Strategy Recommendations:\n\
         - Strategic entry points\n\
         - Investment considerations\n\
         - Innovation and development strategies\n\n\
         5. Potential Challenges and Mitigation:\n\
         - Market barriers\n\
         - Potential risks\n\
         - Strategies for overcoming challenges\n\n\
         Ensure the analysis is forward-looking, backed by current market \
         intelligence, and actionable for strategic decision-makers. Provide \
         specific, data-driven insights with a clear, structured approach \
         that offers both macro and micro-level perspectives.\n",
    );
    prompt
}

/// System prompt for the criteria-extraction call site.
#[must_use]
pub fn extraction_system() -> &'static str {
    "You are an expert at extracting structured information from text. \
     Always respond with ONLY a valid JSON."
}

/// Builds the instruction that extracts search criteria from a free-form
/// lead request.
#[must_use]
pub fn extraction_prompt(query: &str) -> String {
    format!(
        r#"Extract structured information from the following prompt into a JSON format.
The JSON should have these exact keys: "industry", "company_stage", "geography", "funding_stage", "product".
If any information is not available, leave the value as an empty string.

Prompt: {query}

Output ONLY the valid JSON, nothing else.
Example output format:
{{
    "industry": "technology",
    "company_stage": "startup",
    "geography": "California",
    "funding_stage": "seed",
    "product": "AI customer analytics"
}}"#
    )
}

/// Builds a role-framed system prompt for a pipeline stage.
#[must_use]
pub fn stage_system_prompt(role: &str, goal: &str) -> String {
    if role.is_empty() {
        goal.to_string()
    } else if goal.is_empty() {
        format!("You are a {role}.")
    } else {
        format!("You are a {role}. Your goal: {goal}")
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
