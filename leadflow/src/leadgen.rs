//! The assembled lead-generation pipeline.
//!
//! A fixed three-stage chain: company research (backed by the company
//! intelligence search), market research (backed by the market research
//! intelligence, with the company results as context), and outreach drafting
//! (no tool, with both research results as context). The coordinator role
//! declared by earlier incarnations of this system had no effect on the
//! execution order and is not modeled.

use std::sync::Arc;

use crate::criteria::SearchCriteria;
use crate::errors::{ChainValidationError, PipelineError};
use crate::normalize::parse_outreach_records;
use crate::pipeline::{
    LoggingCallback, PipelineRun, PipelineRunner, StageCallback, StageChain, StageSpec,
    VariableBindings,
};
use crate::prompts::stage_system_prompt;
use crate::provider::{ChatMessage, ChatRequest, Provider};
use crate::tools::{CompanySearchTool, MarketResearchTool};

/// Name of the company research stage.
pub const STAGE_COMPANY_RESEARCH: &str = "company_research";
/// Name of the market research stage.
pub const STAGE_MARKET_RESEARCH: &str = "market_research";
/// Name of the outreach drafting stage.
pub const STAGE_OUTREACH: &str = "outreach";

/// Minimum words an outreach email body may contain.
pub const OUTREACH_MIN_WORDS: usize = 50;
/// Maximum words an outreach email body may contain.
pub const OUTREACH_MAX_WORDS: usize = 125;

const GENERATION_TEMPERATURE: f64 = 0.8;
const GENERATION_MAX_TOKENS: u32 = 5000;

const OUTREACH_ROLE: &str = "Outreach Specialist";
const OUTREACH_GOAL: &str = "Create compelling, personalized outreach emails";

const COMPANY_RESEARCH_TEMPLATE: &str = "\
Research companies by following these steps:

Step 1 - Initial Search:
The Company Intelligence Search tool was run with these exact parameters:
industry: {industry}
company_stage: {company_stage}
geography: {geography}
funding_stage: {funding_stage}
{product_info}
Step 2 - For ONLY the companies returned by the tool, analyze:
1. Business model and market fit
2. Growth potential and market opportunity
3. Team composition and experience
4. Financial health and funding history
5. Competitive advantages and unique value propositions

Important Rules:
- Only analyze companies that were returned in tool results
- Do not search for additional companies
- Use competitor information if direct data unavailable
- Do not make assumptions about missing data

For each company found by the tool, report its name, website, headquarters,
funding status, business overview, growth analysis, team info, financial
status and competitive position.";

const MARKET_RESEARCH_TEMPLATE: &str = "\
Step 1: The Market Research Intelligence tool was run with:
industry: {industry}
product: {product}

Step 2: For each company from the company research results:
1. Look at their specific business model and focus
2. Identify which market trends directly affect their business
3. Identify which opportunities match their capabilities
4. Identify which challenges specifically impact them
5. Assess how future market changes will affect them

Create a company-specific analysis connecting market insights to each
business. Use only the tool output and connect it to each company.

Respond with a JSON array holding one object per company with the keys
company_name, business_focus, relevant_trends, matched_opportunities,
specific_challenges and growth_potential.";

const OUTREACH_TEMPLATE: &str = "\
Using the provided research, create personalized outreach emails.
{product_info}Email body has to be elaborative with information from the research and market trends.
Email body has to be between 50 and 125 words.
Return a well structured JSON array where each element contains company_name,
website, headquarters, funding_status, subject and body.
Provide only the JSON array, no other text.";

/// The lead-generation pipeline over a provider.
pub struct LeadGenPipeline {
    provider: Arc<dyn Provider>,
    runner: PipelineRunner,
    chain: StageChain,
}

impl LeadGenPipeline {
    /// Assembles the three-stage chain over the given provider.
    ///
    /// # Errors
    ///
    /// Returns [`ChainValidationError`] if the built-in chain fails
    /// validation; with the fixed stage list this does not happen and the
    /// error exists to keep construction honest.
    pub fn new(provider: Arc<dyn Provider>) -> Result<Self, ChainValidationError> {
        let company_tool = Arc::new(CompanySearchTool::new(provider.clone()));
        let market_tool = Arc::new(MarketResearchTool::new(provider.clone()));

        let chain = StageChain::new(vec![
            StageSpec::new(STAGE_COMPANY_RESEARCH)
                .with_role("Company Research Specialist")
                .with_goal("Conduct comprehensive research on target companies")
                .with_template(COMPANY_RESEARCH_TEMPLATE)
                .with_tool(company_tool),
            StageSpec::new(STAGE_MARKET_RESEARCH)
                .with_role("Market Trends Analyst")
                .with_goal("Analyze current market trends and opportunities")
                .with_template(MARKET_RESEARCH_TEMPLATE)
                .with_context([STAGE_COMPANY_RESEARCH])
                .with_tool(market_tool),
            StageSpec::new(STAGE_OUTREACH)
                .with_role(OUTREACH_ROLE)
                .with_goal(OUTREACH_GOAL)
                .with_template(OUTREACH_TEMPLATE)
                .with_context([STAGE_COMPANY_RESEARCH, STAGE_MARKET_RESEARCH]),
        ])?;

        let runner = PipelineRunner::new(provider.clone())
            .with_callback(Arc::new(LoggingCallback))
            .with_temperature(GENERATION_TEMPERATURE)
            .with_max_tokens(GENERATION_MAX_TOKENS);

        Ok(Self {
            provider,
            runner,
            chain,
        })
    }

    /// Replaces the stage completion callback.
    #[must_use]
    pub fn with_callback(mut self, callback: Arc<dyn StageCallback>) -> Self {
        self.runner = PipelineRunner::new(self.provider.clone())
            .with_callback(callback)
            .with_temperature(GENERATION_TEMPERATURE)
            .with_max_tokens(GENERATION_MAX_TOKENS);
        self
    }

    /// Runs the pipeline for the given criteria and returns the final
    /// stage's output, after the word-contract check.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] when a stage template fails to render or a
    /// generation call fails; capability-level failures degrade inside the
    /// run instead of surfacing here.
    pub async fn run(&self, criteria: &SearchCriteria) -> Result<String, PipelineError> {
        let mut run = PipelineRun::new(VariableBindings::from_criteria(criteria));
        tracing::info!(run_id = %run.id, "starting lead generation run");

        let raw = self.runner.run(&self.chain, &mut run).await?;
        Ok(self.enforce_word_contract(raw).await)
    }

    /// Checks the outreach word contract and requests one regeneration on
    /// violation. Unparseable output is returned verbatim: the final stage
    /// alone is responsible for emitting well-formed records, and the
    /// contract check only tightens output it can read.
    async fn enforce_word_contract(&self, raw: String) -> String {
        let records = parse_outreach_records(&raw);
        if records.is_empty() {
            return raw;
        }

        let violations = records
            .iter()
            .filter(|r| {
                let words = r.body_word_count();
                words < OUTREACH_MIN_WORDS || words > OUTREACH_MAX_WORDS
            })
            .count();
        if violations == 0 {
            return raw;
        }

        tracing::warn!(
            violations,
            total = records.len(),
            "outreach bodies violate the word contract, requesting regeneration"
        );

        let correction = format!(
            "Some of the email bodies in the JSON array below are outside the \
             required length of {OUTREACH_MIN_WORDS} to {OUTREACH_MAX_WORDS} words. \
             Rewrite every body to fall within that range while keeping the \
             same companies, subjects and factual content. Provide only the \
             corrected JSON array, no other text.\n\n{raw}"
        );
        let request = ChatRequest::new(vec![
            ChatMessage::system(stage_system_prompt(OUTREACH_ROLE, OUTREACH_GOAL)),
            ChatMessage::user(correction),
        ])
        .with_temperature(GENERATION_TEMPERATURE)
        .with_max_tokens(GENERATION_MAX_TOKENS);

        match self.provider.complete(request).await {
            Ok(revised) => {
                let revised_records = parse_outreach_records(&revised);
                if revised_records.is_empty() {
                    tracing::warn!("regenerated outreach output is unparseable, keeping original");
                    return raw;
                }
                let still_violating = revised_records
                    .iter()
                    .filter(|r| {
                        let words = r.body_word_count();
                        words < OUTREACH_MIN_WORDS || words > OUTREACH_MAX_WORDS
                    })
                    .count();
                if still_violating > 0 {
                    tracing::warn!(
                        still_violating,
                        "regenerated outreach output still violates the word contract"
                    );
                }
                revised
            }
            Err(err) => {
                tracing::warn!(error = %err, "regeneration request failed, keeping original output");
                raw
            }
        }
    }

    /// The stage chain, mainly for inspection in tests.
    #[must_use]
    pub fn chain(&self) -> &StageChain {
        &self.chain
    }
}

impl std::fmt::Debug for LeadGenPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeadGenPipeline")
            .field("stages", &self.chain.len())
            .finish_non_exhaustive()
    }
}
