//! Mock completion services for testing
//!
//! These stand in for the HTTP service so gateway and orchestrator behaviour
//! can be exercised without real I/O.

use crate::llm::{CompletionRequest, CompletionService, ErrorInfo};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

// ============================================================================
// Mock Completion Service
// ============================================================================

/// Mock service that returns queued replies
pub struct MockCompletionService {
    responses: Mutex<VecDeque<Result<String, ErrorInfo>>>,
    model_id: String,
    /// Record of all requests made
    pub requests: Mutex<Vec<CompletionRequest>>,
}

#[allow(dead_code)]
impl MockCompletionService {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            model_id: model_id.into(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful reply
    pub fn queue_reply(&self, text: impl Into<String>) {
        self.responses.lock().unwrap().push_back(Ok(text.into()));
    }

    /// Queue an error
    pub fn queue_error(&self, error: ErrorInfo) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    /// Get recorded requests
    pub fn recorded_requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn next_response(&self) -> Result<String, ErrorInfo> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ErrorInfo::network("No mock response queued")))
    }
}

#[async_trait]
impl CompletionService for MockCompletionService {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ErrorInfo> {
        self.requests.lock().unwrap().push(request.clone());
        self.next_response()
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

// ============================================================================
// Delayed Mock Completion Service (for in-flight testing)
// ============================================================================

/// Mock service that waits before answering
pub struct DelayedMockCompletionService {
    inner: MockCompletionService,
    delay: Duration,
    /// Notified when a request starts (for test synchronization)
    pub request_started: Arc<Notify>,
}

#[allow(dead_code)]
impl DelayedMockCompletionService {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: MockCompletionService::new("delayed-model"),
            delay,
            request_started: Arc::new(Notify::new()),
        }
    }

    pub fn queue_reply(&self, text: impl Into<String>) {
        self.inner.queue_reply(text);
    }

    pub fn recorded_requests(&self) -> Vec<CompletionRequest> {
        self.inner.recorded_requests()
    }
}

#[async_trait]
impl CompletionService for DelayedMockCompletionService {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, ErrorInfo> {
        self.inner.requests.lock().unwrap().push(request.clone());
        // notify_one keeps a permit if the test is not waiting yet
        self.request_started.notify_one();
        tokio::time::sleep(self.delay).await;
        self.inner.next_response()
    }

    fn model_id(&self) -> &str {
        self.inner.model_id()
    }
}

// ============================================================================
// Pending Completion Service (for timeout testing)
// ============================================================================

/// Mock service that never answers
#[derive(Default)]
pub struct PendingCompletionService {
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl PendingCompletionService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionService for PendingCompletionService {
    async fn complete(&self, _request: &CompletionRequest) -> Result<String, ErrorInfo> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        std::future::pending().await
    }

    fn model_id(&self) -> &str {
        "pending-model"
    }
}
