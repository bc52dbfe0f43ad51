//! Stage result value.

use crate::utils::{now_utc, Timestamp};
use serde::{Deserialize, Serialize};

/// The raw output of a completed stage.
///
/// A `StageResult` is immutable once appended to a
/// [`PipelineRun`](crate::pipeline::PipelineRun) and never outlives it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageResult {
    /// The name of the stage that produced this output.
    pub stage: String,
    /// The raw textual output, exactly as the provider returned it.
    pub raw_output: String,
    /// When the result was produced.
    pub produced_at: Timestamp,
}

impl StageResult {
    /// Creates a new stage result stamped with the current time.
    #[must_use]
    pub fn new(stage: impl Into<String>, raw_output: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            raw_output: raw_output.into(),
            produced_at: now_utc(),
        }
    }
}
