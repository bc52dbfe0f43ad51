//! # Leadflow
//!
//! A lead-generation pipeline over an LLM-backed search provider.
//!
//! Leadflow turns typed search criteria into personalized outreach drafts
//! through a fixed, strictly ordered stage chain:
//!
//! - **Capability wrappers**: validated entry points around provider-backed
//!   search operations that report failures as structured values
//! - **Parse-or-degrade normalization**: the single boundary where untrusted
//!   provider text becomes trusted records
//! - **Context propagation**: each stage receives the raw output of the
//!   stages it declares as context
//! - **Template bindings**: request-scoped variables substituted into stage
//!   prompts, with unresolved placeholders rejected before any provider call
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use leadflow::prelude::*;
//! use std::sync::Arc;
//!
//! let config = ProviderConfig::from_env()?;
//! let provider = Arc::new(HttpProvider::new(config)?);
//! let pipeline = LeadGenPipeline::new(provider)?;
//!
//! let criteria = SearchCriteria::new()
//!     .with_industry("retail")
//!     .with_geography("California");
//! let outreach = pipeline.run(&criteria).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod core;
pub mod criteria;
pub mod errors;
pub mod extract;
pub mod leadgen;
pub mod normalize;
pub mod pipeline;
pub mod prompts;
pub mod provider;
pub mod records;
pub mod testing;
pub mod tools;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{StageResult, StageStatus};
    pub use crate::criteria::{CompanyStage, SearchCriteria};
    pub use crate::errors::{
        ChainValidationError, ConfigError, LeadflowError, PipelineError, ProviderError,
        TemplateError, ToolError,
    };
    pub use crate::extract::CriteriaExtractor;
    pub use crate::leadgen::LeadGenPipeline;
    pub use crate::normalize::{
        parse_company_records, parse_outreach_records, strip_code_fences,
    };
    pub use crate::pipeline::{
        PipelineRun, PipelineRunner, StageCallback, StageChain, StageSpec, VariableBindings,
    };
    pub use crate::provider::{ChatMessage, ChatRequest, HttpProvider, Provider, ProviderConfig};
    pub use crate::records::{CompanyRecord, OutreachRecord};
    pub use crate::tools::{Capability, CompanySearchTool, MarketResearchTool, ToolOutput};
}

#[cfg(test)]
mod tests {
    #[test]
    fn library_compiles() {
        assert!(true);
    }
}
