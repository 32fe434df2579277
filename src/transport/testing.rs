//! Mock workflow client for testing
//!
//! Returns queued replies in order and records every request it receives.

use super::{AttachmentRef, ServerReply, TransportError, TurnRequest, WorkflowClient};
use crate::conversation::Interrupt;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Mock client that returns queued replies
#[derive(Default)]
pub struct MockWorkflowClient {
    replies: Mutex<VecDeque<Result<ServerReply, TransportError>>>,
    uploads: Mutex<VecDeque<Result<AttachmentRef, TransportError>>>,
    /// Record of all turn requests made
    pub requests: Mutex<Vec<TurnRequest>>,
    /// Record of all upload paths
    pub uploaded: Mutex<Vec<PathBuf>>,
}

#[allow(dead_code)]
impl MockWorkflowClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_answer(&self, answer: impl Into<String>) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(ServerReply::Answer(answer.into())));
    }

    pub fn queue_interrupt(&self, interrupt: Interrupt) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(ServerReply::Interrupt(interrupt)));
    }

    pub fn queue_error(&self, error: TransportError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    pub fn queue_upload(&self, result: Result<AttachmentRef, TransportError>) {
        self.uploads.lock().unwrap().push_back(result);
    }

    pub fn recorded_requests(&self) -> Vec<TurnRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl WorkflowClient for MockWorkflowClient {
    async fn submit(&self, request: &TurnRequest) -> Result<ServerReply, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::network("No mock reply queued")))
    }

    async fn upload(&self, path: &Path) -> Result<AttachmentRef, TransportError> {
        self.uploaded.lock().unwrap().push(path.to_path_buf());
        self.uploads
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::network("No mock upload queued")))
    }
}
