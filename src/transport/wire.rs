//! Workflow endpoint request and response types

use super::TransportError;
use crate::conversation::{InputKind, Interrupt};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /travel`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRequest {
    pub user_query: Option<String>,
    pub interrupt_response: Option<String>,
    pub session_id: String,
    pub pdf: Option<String>,
}

/// Decoded outcome of a turn
#[derive(Debug, Clone, PartialEq)]
pub enum ServerReply {
    /// Terminal answer for this turn
    Answer(String),
    /// The workflow paused and is asking for input
    Interrupt(Interrupt),
}

/// Server-assigned reference for an uploaded file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AttachmentRef {
    pub path: String,
}

/// Raw reply shape; the `type` discriminant is optional on answers
#[derive(Debug, Deserialize)]
pub(crate) struct WireReply {
    #[serde(rename = "type")]
    kind: Option<String>,
    answer: Option<String>,
    key: Option<String>,
    question: Option<String>,
    input_type: Option<String>,
    options: Option<Vec<String>>,
    default: Option<String>,
    trip_plan: Option<String>,
    #[serde(default)]
    meta: Value,
}

impl WireReply {
    pub(crate) fn into_reply(self) -> Result<ServerReply, TransportError> {
        if self.kind.as_deref() != Some("interrupt") {
            return self
                .answer
                .map(ServerReply::Answer)
                .ok_or_else(|| TransportError::malformed("Reply has neither an interrupt nor an answer"));
        }

        let question = self
            .question
            .ok_or_else(|| TransportError::malformed("Interrupt reply is missing `question`"))?;

        let kind = match self.input_type.as_deref() {
            Some(raw) => InputKind::from_wire(raw)
                .ok_or_else(|| TransportError::malformed(format!("Unknown input_type `{raw}`")))?,
            None => InputKind::infer(self.key.as_deref(), self.options.as_deref()),
        };

        Ok(ServerReply::Interrupt(Interrupt {
            key: self.key,
            question,
            kind,
            options: self.options.unwrap_or_default(),
            plan: self.trip_plan.filter(|p| !p.trim().is_empty()),
            default: self.default,
            meta: self.meta,
        }))
    }
}

/// Decode a reply body
pub fn decode_reply(body: &str) -> Result<ServerReply, TransportError> {
    let wire: WireReply = serde_json::from_str(body)
        .map_err(|e| TransportError::malformed(format!("Failed to parse reply: {e} - body: {body}")))?;
    wire.into_reply()
}
