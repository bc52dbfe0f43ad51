//! Per-invocation run state.

use std::collections::HashMap;
use uuid::Uuid;

use super::VariableBindings;
use crate::core::{StageResult, StageStatus};
use crate::utils::{now_utc, Timestamp};

/// One end-to-end execution of a stage chain.
///
/// The run exclusively owns its variable bindings and every appended
/// [`StageResult`]; it is created per invocation and discarded once the
/// final stage's output has been returned.
#[derive(Debug)]
pub struct PipelineRun {
    /// The run identifier.
    pub id: Uuid,
    /// When the run was created.
    pub started_at: Timestamp,
    bindings: VariableBindings,
    results: Vec<StageResult>,
    statuses: HashMap<String, StageStatus>,
}

impl PipelineRun {
    /// Creates a run with the given bindings.
    #[must_use]
    pub fn new(bindings: VariableBindings) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: now_utc(),
            bindings,
            results: Vec::new(),
            statuses: HashMap::new(),
        }
    }

    /// The run's variable bindings.
    #[must_use]
    pub fn bindings(&self) -> &VariableBindings {
        &self.bindings
    }

    /// Mutable access to the bindings. Only the runner writes, and only
    /// between stages.
    pub fn bindings_mut(&mut self) -> &mut VariableBindings {
        &mut self.bindings
    }

    /// Appends a stage result. Results are immutable once appended.
    pub fn record_result(&mut self, result: StageResult) {
        self.results.push(result);
    }

    /// The results appended so far, in completion order.
    #[must_use]
    pub fn results(&self) -> &[StageResult] {
        &self.results
    }

    /// The result of a specific stage, if it has completed.
    #[must_use]
    pub fn result_for(&self, stage: &str) -> Option<&StageResult> {
        self.results.iter().find(|r| r.stage == stage)
    }

    /// The final stage's raw output, if any stage has completed.
    #[must_use]
    pub fn final_output(&self) -> Option<&str> {
        self.results.last().map(|r| r.raw_output.as_str())
    }

    /// The status of a stage. Stages not yet touched are `Pending`.
    #[must_use]
    pub fn status(&self, stage: &str) -> StageStatus {
        self.statuses.get(stage).copied().unwrap_or_default()
    }

    /// Records a stage status transition.
    pub fn set_status(&mut self, stage: impl Into<String>, status: StageStatus) {
        self.statuses.insert(stage.into(), status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_starts_pending() {
        let run = PipelineRun::new(VariableBindings::new());
        assert_eq!(run.status("anything"), StageStatus::Pending);
        assert!(run.final_output().is_none());
    }

    #[test]
    fn test_run_records_results_in_order() {
        let mut run = PipelineRun::new(VariableBindings::new());
        run.record_result(StageResult::new("first", "one"));
        run.record_result(StageResult::new("second", "two"));

        assert_eq!(run.results().len(), 2);
        assert_eq!(run.final_output(), Some("two"));
        assert_eq!(run.result_for("first").unwrap().raw_output, "one");
    }

    #[test]
    fn test_run_status_transitions() {
        let mut run = PipelineRun::new(VariableBindings::new());
        run.set_status("stage", StageStatus::Running);
        assert_eq!(run.status("stage"), StageStatus::Running);

        run.set_status("stage", StageStatus::Completed);
        assert!(run.status("stage").is_success());
    }
}
