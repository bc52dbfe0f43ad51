//! Stage specifications and the validated stage chain.

use std::collections::HashSet;
use std::sync::Arc;

use crate::errors::ChainValidationError;
use crate::tools::Capability;

/// Specification of a single pipeline stage.
///
/// A stage binds a role to a prompt template, an ordered list of upstream
/// stages whose results it receives as context, and optionally a capability
/// executed before its generation call.
#[derive(Clone)]
pub struct StageSpec {
    /// The unique stage name.
    pub name: String,
    /// The role framing the stage's generation call.
    pub role: String,
    /// The goal appended to the role framing.
    pub goal: String,
    /// The instruction template with `{placeholder}` variables.
    pub prompt_template: String,
    /// Names of upstream stages whose results are injected as context.
    /// Must reference only previously declared stages.
    pub context: Vec<String>,
    /// Capability executed before the generation call, if any.
    pub tool: Option<Arc<dyn Capability>>,
}

impl StageSpec {
    /// Creates a stage specification.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: String::new(),
            goal: String::new(),
            prompt_template: String::new(),
            context: Vec::new(),
            tool: None,
        }
    }

    /// Sets the role.
    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    /// Sets the goal.
    #[must_use]
    pub fn with_goal(mut self, goal: impl Into<String>) -> Self {
        self.goal = goal.into();
        self
    }

    /// Sets the prompt template.
    #[must_use]
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.prompt_template = template.into();
        self
    }

    /// Sets the context stage names.
    #[must_use]
    pub fn with_context(mut self, context: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.context = context.into_iter().map(Into::into).collect();
        self
    }

    /// Binds a capability.
    #[must_use]
    pub fn with_tool(mut self, tool: Arc<dyn Capability>) -> Self {
        self.tool = Some(tool);
        self
    }
}

impl std::fmt::Debug for StageSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageSpec")
            .field("name", &self.name)
            .field("role", &self.role)
            .field("context", &self.context)
            .field("tool", &self.tool.as_ref().map(|t| t.name().to_string()))
            .finish_non_exhaustive()
    }
}

/// An ordered, validated chain of stages.
///
/// The chain is deliberately not a general dependency graph: validation
/// asserts that each stage's context references only stages declared earlier
/// in the list, so execution order and dependency order coincide.
#[derive(Debug, Clone)]
pub struct StageChain {
    stages: Vec<StageSpec>,
}

impl StageChain {
    /// Validates and creates a chain.
    ///
    /// # Errors
    ///
    /// Returns [`ChainValidationError`] when the chain is empty, a stage
    /// name is blank or duplicated, or a stage's context references a stage
    /// that is not declared before it (the prefix rule).
    pub fn new(stages: Vec<StageSpec>) -> Result<Self, ChainValidationError> {
        if stages.is_empty() {
            return Err(ChainValidationError::new("stage chain cannot be empty"));
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for stage in &stages {
            let name = stage.name.trim();
            if name.is_empty() {
                return Err(ChainValidationError::new("stage name cannot be empty"));
            }
            if seen.contains(name) {
                return Err(ChainValidationError::new(format!(
                    "duplicate stage name '{name}'"
                ))
                .with_stages(vec![name.to_string()]));
            }

            for ctx in &stage.context {
                if !seen.contains(ctx.as_str()) {
                    return Err(ChainValidationError::new(format!(
                        "stage '{name}' references '{ctx}' which is not declared before it"
                    ))
                    .with_stages(vec![name.to_string(), ctx.clone()]));
                }
            }

            seen.insert(&stage.name);
        }

        Ok(Self { stages })
    }

    /// The stages in execution order.
    #[must_use]
    pub fn stages(&self) -> &[StageSpec] {
        &self.stages
    }

    /// Number of stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns true if the chain has no stages. Unreachable after
    /// construction, present for completeness.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// The name of the final stage.
    #[must_use]
    pub fn final_stage(&self) -> Option<&str> {
        self.stages.last().map(|s| s.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_accepts_prefix_context() {
        let chain = StageChain::new(vec![
            StageSpec::new("research"),
            StageSpec::new("market").with_context(["research"]),
            StageSpec::new("outreach").with_context(["research", "market"]),
        ])
        .unwrap();

        assert_eq!(chain.len(), 3);
        assert_eq!(chain.final_stage(), Some("outreach"));
    }

    #[test]
    fn test_chain_rejects_forward_reference() {
        let err = StageChain::new(vec![
            StageSpec::new("research").with_context(["market"]),
            StageSpec::new("market"),
        ])
        .unwrap_err();

        assert!(err.message.contains("not declared before"));
        assert_eq!(err.stages, vec!["research", "market"]);
    }

    #[test]
    fn test_chain_rejects_self_reference() {
        let err = StageChain::new(vec![StageSpec::new("solo").with_context(["solo"])])
            .unwrap_err();
        assert!(err.message.contains("not declared before"));
    }

    #[test]
    fn test_chain_rejects_duplicates_and_empty() {
        assert!(StageChain::new(vec![]).is_err());
        assert!(StageChain::new(vec![StageSpec::new("  ")]).is_err());
        assert!(
            StageChain::new(vec![StageSpec::new("a"), StageSpec::new("a")]).is_err()
        );
    }
}
