//! Sequential pipeline runner.

use std::sync::Arc;

use super::{NoOpCallback, PipelineRun, StageCallback, StageChain, StageSpec};
use crate::core::{StageResult, StageStatus};
use crate::errors::PipelineError;
use crate::prompts::stage_system_prompt;
use crate::provider::{ChatMessage, ChatRequest, Provider};

/// Executes a stage chain strictly in order on a single task.
///
/// Per stage: the prompt template is rendered from the run's bindings (an
/// unresolved placeholder aborts before any provider call), a bound
/// capability is invoked and its structured output embedded, upstream stage
/// results are appended as context, and one generation call produces the
/// stage's raw output. Stage *i+1* never begins before stage *i*'s result is
/// appended; that ordering is structural, there is no synchronization
/// primitive involved.
pub struct PipelineRunner {
    provider: Arc<dyn Provider>,
    callback: Arc<dyn StageCallback>,
    temperature: Option<f64>,
    max_tokens: Option<u32>,
}

impl PipelineRunner {
    /// Creates a runner over a provider.
    #[must_use]
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self {
            provider,
            callback: Arc::new(NoOpCallback),
            temperature: None,
            max_tokens: None,
        }
    }

    /// Sets the completion callback.
    #[must_use]
    pub fn with_callback(mut self, callback: Arc<dyn StageCallback>) -> Self {
        self.callback = callback;
        self
    }

    /// Sets the generation temperature.
    #[must_use]
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Sets the generation token limit.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Runs the chain to completion and returns the final stage's raw
    /// output verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Template`] when a stage template references
    /// an unbound variable (detected before that stage's provider call) and
    /// [`PipelineError::StageFailed`] when a generation call fails. Either
    /// aborts the run without attempting later stages. Capability failures
    /// do not abort; they are embedded as structured error payloads.
    pub async fn run(
        &self,
        chain: &StageChain,
        run: &mut PipelineRun,
    ) -> Result<String, PipelineError> {
        for stage in chain.stages() {
            self.execute_stage(stage, run).await?;
        }

        Ok(run.final_output().unwrap_or_default().to_string())
    }

    async fn execute_stage(
        &self,
        stage: &StageSpec,
        run: &mut PipelineRun,
    ) -> Result<(), PipelineError> {
        let name = stage.name.clone();
        run.set_status(&name, StageStatus::Running);
        tracing::info!(stage = %name, run_id = %run.id, "stage started");

        let instruction = match run.bindings().render(&stage.prompt_template) {
            Ok(instruction) => instruction,
            Err(source) => {
                run.set_status(&name, StageStatus::Failed);
                tracing::error!(stage = %name, placeholder = %source.placeholder, "stage template failed to render");
                return Err(PipelineError::Template { stage: name, source });
            }
        };

        let mut sections = vec![instruction];

        if let Some(tool) = &stage.tool {
            let output = tool.invoke(run.bindings().as_params()).await;
            if !output.success {
                tracing::warn!(
                    stage = %name,
                    tool = %tool.name(),
                    error = output.error.as_deref().unwrap_or("unknown"),
                    "capability reported a failure, continuing with its error payload"
                );
            }
            let payload = serde_json::to_string_pretty(&output)
                .unwrap_or_else(|_| "{\"success\": false}".to_string());
            sections.push(format!("Result of the {} tool:\n{payload}", tool.name()));
        }

        for ctx_name in &stage.context {
            if let Some(prior) = run.result_for(ctx_name) {
                sections.push(format!(
                    "Output of the {ctx_name} stage:\n{}",
                    prior.raw_output
                ));
            }
        }

        let mut request = ChatRequest::new(vec![
            ChatMessage::system(stage_system_prompt(&stage.role, &stage.goal)),
            ChatMessage::user(sections.join("\n\n")),
        ]);
        if let Some(temperature) = self.temperature {
            request = request.with_temperature(temperature);
        }
        if let Some(max_tokens) = self.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }

        let raw = match self.provider.complete(request).await {
            Ok(raw) => raw,
            Err(source) => {
                run.set_status(&name, StageStatus::Failed);
                tracing::error!(stage = %name, error = %source, "stage generation failed, aborting run");
                return Err(PipelineError::StageFailed { stage: name, source });
            }
        };

        run.record_result(StageResult::new(&name, raw));
        run.set_status(&name, StageStatus::Completed);
        tracing::info!(stage = %name, run_id = %run.id, "stage completed");

        let notice = if stage.role.is_empty() {
            "Task completed with output".to_string()
        } else {
            format!("{} has completed their task", stage.role)
        };
        self.callback.on_stage_complete(&notice);

        Ok(())
    }
}

impl std::fmt::Debug for PipelineRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineRunner")
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish_non_exhaustive()
    }
}
