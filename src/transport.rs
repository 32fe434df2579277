//! Workflow endpoint client
//!
//! One request/response call per user turn, plus a separate upload call that
//! exchanges a local file for a server-side reference.

mod error;
mod http;
mod wire;

#[cfg(test)]
pub mod testing;

pub use error::TransportError;
#[cfg(test)]
pub use error::TransportErrorKind;
pub use http::HttpWorkflowClient;
pub use wire::{AttachmentRef, ServerReply, TurnRequest};

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

/// Common interface for reaching the workflow server
#[async_trait]
pub trait WorkflowClient: Send + Sync {
    /// Submit one turn and wait for the server's reply
    async fn submit(&self, request: &TurnRequest) -> Result<ServerReply, TransportError>;

    /// Upload a single file and return its server reference
    async fn upload(&self, path: &Path) -> Result<AttachmentRef, TransportError>;
}

#[async_trait]
impl<T: WorkflowClient + ?Sized> WorkflowClient for Arc<T> {
    async fn submit(&self, request: &TurnRequest) -> Result<ServerReply, TransportError> {
        (**self).submit(request).await
    }

    async fn upload(&self, path: &Path) -> Result<AttachmentRef, TransportError> {
        (**self).upload(path).await
    }
}

/// Logging wrapper for workflow clients
pub struct LoggingClient<C> {
    inner: C,
}

impl<C: WorkflowClient> LoggingClient<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<C: WorkflowClient> WorkflowClient for LoggingClient<C> {
    async fn submit(&self, request: &TurnRequest) -> Result<ServerReply, TransportError> {
        let start = std::time::Instant::now();
        let result = self.inner.submit(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(reply) => {
                let outcome = match reply {
                    ServerReply::Answer(_) => "answer",
                    ServerReply::Interrupt(_) => "interrupt",
                };
                tracing::info!(
                    session = %request.session_id,
                    duration_ms = %duration.as_millis(),
                    outcome,
                    "Turn completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    session = %request.session_id,
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    retryable = e.kind.is_retryable(),
                    "Turn failed"
                );
            }
        }

        result
    }

    async fn upload(&self, path: &Path) -> Result<AttachmentRef, TransportError> {
        let start = std::time::Instant::now();
        let result = self.inner.upload(path).await;
        let duration = start.elapsed();

        match &result {
            Ok(attachment) => tracing::info!(
                file = %path.display(),
                reference = %attachment.path,
                duration_ms = %duration.as_millis(),
                "Upload completed"
            ),
            Err(e) => tracing::error!(
                file = %path.display(),
                duration_ms = %duration.as_millis(),
                error = %e.message,
                "Upload failed"
            ),
        }

        result
    }
}
