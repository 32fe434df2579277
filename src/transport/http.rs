//! HTTP workflow client

use super::wire::decode_reply;
use super::{AttachmentRef, ServerReply, TransportError, TurnRequest, WorkflowClient};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::path::Path;
use std::time::Duration;

const TURN_PATH: &str = "/travel";
const UPLOAD_PATH: &str = "/upload";
const UPLOAD_FIELD: &str = "file";

/// reqwest-backed client for the workflow server
pub struct HttpWorkflowClient {
    client: Client,
    base_url: String,
}

impl HttpWorkflowClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn read_body(response: reqwest::Response) -> Result<String, TransportError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(TransportError::from_status(status, &body));
        }
        Ok(body)
    }
}

fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

#[async_trait]
impl WorkflowClient for HttpWorkflowClient {
    async fn submit(&self, request: &TurnRequest) -> Result<ServerReply, TransportError> {
        let response = self
            .client
            .post(self.url(TURN_PATH))
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(&e))?;

        let body = Self::read_body(response).await?;
        decode_reply(&body)
    }

    async fn upload(&self, path: &Path) -> Result<AttachmentRef, TransportError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| TransportError::io(format!("Failed to read {}: {e}", path.display())))?;

        let file_name = path
            .file_name()
            .map_or_else(|| "upload".to_string(), |n| n.to_string_lossy().into_owned());

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(content_type_for(path))
            .map_err(|e| TransportError::io(format!("Invalid content type: {e}")))?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let response = self
            .client
            .post(self.url(UPLOAD_PATH))
            .multipart(form)
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(&e))?;

        let body = Self::read_body(response).await?;
        serde_json::from_str(&body)
            .map_err(|e| TransportError::malformed(format!("Failed to parse upload reply: {e} - body: {body}")))
    }
}
