//! Test support: an in-memory scripted provider.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

use crate::errors::ProviderError;
use crate::provider::{ChatRequest, Provider};

/// A provider that replays queued responses in order.
///
/// Every [`complete`](Provider::complete) call pops the next scripted entry
/// and records the request for later inspection. An exhausted script yields
/// a request error so a test that under-provisions responses fails loudly.
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Result<String, ProviderError>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedProvider {
    /// Creates an empty scripted provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful response.
    pub fn push_response(&self, content: impl Into<String>) {
        self.script.lock().push_back(Ok(content.into()));
    }

    /// Queues a failure.
    pub fn push_failure(&self, error: ProviderError) {
        self.script.lock().push_back(Err(error));
    }

    /// Number of calls made so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// The requests captured so far, in call order.
    #[must_use]
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().clone()
    }

    /// Number of scripted entries not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.lock().len()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn complete(&self, request: ChatRequest) -> Result<String, ProviderError> {
        self.requests.lock().push(request);
        self.script.lock().pop_front().unwrap_or_else(|| {
            Err(ProviderError::Request(
                "scripted provider has no response remaining".to_string(),
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ChatMessage;

    #[tokio::test]
    async fn test_replays_in_order() {
        let provider = ScriptedProvider::new();
        provider.push_response("first");
        provider.push_response("second");

        let req = || ChatRequest::new(vec![ChatMessage::user("hi")]);
        assert_eq!(provider.complete(req()).await.unwrap(), "first");
        assert_eq!(provider.complete(req()).await.unwrap(), "second");
        assert_eq!(provider.call_count(), 2);
        assert_eq!(provider.remaining(), 0);
    }

    #[tokio::test]
    async fn test_exhausted_script_errors() {
        let provider = ScriptedProvider::new();
        let result = provider
            .complete(ChatRequest::new(vec![ChatMessage::user("hi")]))
            .await;

        assert!(matches!(result, Err(ProviderError::Request(_))));
    }

    #[tokio::test]
    async fn test_scripted_failure() {
        let provider = ScriptedProvider::new();
        provider.push_failure(ProviderError::Timeout { seconds: 1 });

        let result = provider
            .complete(ChatRequest::new(vec![ChatMessage::user("hi")]))
            .await;

        assert!(matches!(result, Err(ProviderError::Timeout { .. })));
    }
}
