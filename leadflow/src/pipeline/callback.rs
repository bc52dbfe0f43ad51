//! Stage completion callbacks.

use parking_lot::RwLock;

/// Observer invoked synchronously when a stage completes.
pub trait StageCallback: Send + Sync {
    /// Called with a human-readable completion notice.
    fn on_stage_complete(&self, notice: &str);
}

/// A callback that discards all notices.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpCallback;

impl StageCallback for NoOpCallback {
    fn on_stage_complete(&self, _notice: &str) {}
}

/// A callback that logs notices through tracing.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingCallback;

impl StageCallback for LoggingCallback {
    fn on_stage_complete(&self, notice: &str) {
        tracing::info!(notice = %notice, "stage callback");
    }
}

/// A collecting callback for tests.
#[derive(Debug, Default)]
pub struct CollectingCallback {
    notices: RwLock<Vec<String>>,
}

impl CollectingCallback {
    /// Creates an empty collecting callback.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The notices received so far.
    #[must_use]
    pub fn notices(&self) -> Vec<String> {
        self.notices.read().clone()
    }
}

impl StageCallback for CollectingCallback {
    fn on_stage_complete(&self, notice: &str) {
        self.notices.write().push(notice.to_string());
    }
}
