//! Conversation store
//!
//! Owns the transcript and the two flags that gate submissions. A turn is
//! submitted in two phases: [`ConversationStore::begin`] runs synchronously,
//! appends the optimistic user turn and claims the single in-flight slot;
//! [`ConversationStore::settle`] applies whatever the transport produced.
//! [`ConversationStore::submit_turn`] chains the two around one transport call.

use super::{SessionId, Submission, Turn};
use crate::interrupt::{awaited_interrupt, latest_open_interrupt};
use crate::transport::{ServerReply, TransportError, TurnRequest, WorkflowClient};

/// Bot turn appended when a submission fails for any reason
pub const FALLBACK_TEXT: &str = "Something went wrong. Please try again.";

/// Which outcome a settled submission produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    Answered,
    Interrupted,
    Failed,
    /// Arrived with nothing in flight; nothing was applied
    Ignored,
}

/// Read model for transcript renderers
#[derive(Debug, Clone, Copy)]
pub struct TranscriptView<'a> {
    pub turns: &'a [Turn],
    pub loading: bool,
    pub has_active_interrupt: bool,
}

impl TranscriptView<'_> {
    /// Whether the turn at `index` is an interrupt that may still be answered
    pub fn is_answerable(&self, index: usize) -> bool {
        latest_open_interrupt(self.turns, self.loading).is_some_and(|(open, _)| open == index)
    }

    /// Whether the turn at `index` is still awaited after a failed answer left a fallback turn behind it
    pub fn is_awaiting_retry(&self, index: usize) -> bool {
        !self.is_answerable(index)
            && awaited_interrupt(self.turns, self.has_active_interrupt, self.loading)
                .is_some_and(|(awaited, _)| awaited == index)
    }
}

/// Conversation state for one session
#[derive(Debug)]
pub struct ConversationStore {
    transcript: Vec<Turn>,
    in_flight: bool,
    /// Set by an interrupt, cleared by an answer. Kept while an answer is in
    /// flight so a failure can leave the interrupt open.
    has_open_interrupt: bool,
    session: SessionId,
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationStore {
    pub fn new() -> Self {
        Self {
            transcript: Vec::new(),
            in_flight: false,
            has_open_interrupt: false,
            session: SessionId::generate(),
        }
    }

    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Whether an interrupt is awaiting an answer; false while a submission is in flight
    pub fn has_open_interrupt(&self) -> bool {
        self.awaiting_answer()
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session
    }

    pub fn view(&self) -> TranscriptView<'_> {
        TranscriptView {
            turns: &self.transcript,
            loading: self.in_flight,
            has_active_interrupt: self.awaiting_answer(),
        }
    }

    /// Whether an answer submitted now would be routed to an interrupt
    pub fn awaiting_answer(&self) -> bool {
        self.has_open_interrupt && !self.in_flight
    }

    /// Submit one turn and settle it.
    ///
    /// Returns `None` when the submission is refused; the store is then unchanged.
    pub async fn submit_turn<C>(&mut self, client: &C, submission: Submission) -> Option<Settlement>
    where
        C: WorkflowClient + ?Sized,
    {
        let request = self.begin(submission)?;
        let outcome = client.submit(&request).await;
        Some(self.settle(outcome))
    }

    /// Optimistic phase: check preconditions, append the user turn, mark in flight.
    ///
    /// Returns the request to dispatch, or `None` if the submission is refused.
    pub fn begin(&mut self, submission: Submission) -> Option<TurnRequest> {
        if self.in_flight {
            tracing::debug!(session = %self.session, "Submission refused: turn already in flight");
            return None;
        }
        if submission.is_empty() {
            tracing::debug!(session = %self.session, "Submission refused: empty payload");
            return None;
        }
        if submission.is_answer() != self.awaiting_answer() {
            tracing::debug!(
                session = %self.session,
                answer = submission.is_answer(),
                awaiting = self.awaiting_answer(),
                "Submission refused: not addressed to the open interrupt"
            );
            return None;
        }

        let request = self.request_for(&submission);
        self.transcript.push(Turn::user(submission.display_text()));
        self.in_flight = true;
        tracing::debug!(
            session = %self.session,
            turns = self.transcript.len(),
            answer = submission.is_answer(),
            "Submission accepted"
        );
        Some(request)
    }

    /// Settle phase: apply the transport outcome and clear the in-flight flag.
    ///
    /// An outcome arriving with nothing in flight is dropped.
    pub fn settle(&mut self, outcome: Result<ServerReply, TransportError>) -> Settlement {
        if !self.in_flight {
            tracing::warn!(
                session = %self.session,
                ok = outcome.is_ok(),
                "Settle with no submission in flight; ignoring"
            );
            return Settlement::Ignored;
        }

        let settlement = match outcome {
            Ok(ServerReply::Answer(answer)) => {
                self.transcript.push(Turn::bot(answer));
                self.has_open_interrupt = false;
                Settlement::Answered
            }
            Ok(ServerReply::Interrupt(interrupt)) => {
                tracing::info!(
                    session = %self.session,
                    key = ?interrupt.key,
                    kind = ?interrupt.kind,
                    "Workflow paused on interrupt"
                );
                self.transcript.push(Turn::interrupt(interrupt));
                self.has_open_interrupt = true;
                Settlement::Interrupted
            }
            Err(e) => {
                // An interrupt that was open stays open so the answer can be retried
                tracing::warn!(
                    session = %self.session,
                    error = %e,
                    interrupt_kept = self.has_open_interrupt,
                    "Turn failed; appending fallback"
                );
                self.transcript.push(Turn::bot(FALLBACK_TEXT));
                Settlement::Failed
            }
        };
        self.in_flight = false;
        self.debug_check_consistency();
        settlement
    }

    /// Clear the transcript and start a new server-side thread
    pub fn reset(&mut self) {
        if self.in_flight {
            tracing::warn!(session = %self.session, "Reset while a turn is in flight");
        }
        let previous = self.session.clone();
        self.session = SessionId::regenerate(&previous);
        self.transcript.clear();
        self.in_flight = false;
        self.has_open_interrupt = false;
        tracing::info!(previous = %previous, session = %self.session, "Conversation reset");
    }

    fn request_for(&self, submission: &Submission) -> TurnRequest {
        let session_id = self.session.to_string();
        match submission {
            Submission::Text(text) => TurnRequest {
                user_query: Some(text.clone()),
                interrupt_response: None,
                session_id,
                pdf: None,
            },
            Submission::Answer(answer) => TurnRequest {
                user_query: None,
                interrupt_response: Some(answer.clone()),
                session_id,
                pdf: None,
            },
            Submission::Attachment { file_ref, text } => TurnRequest {
                user_query: text.clone().filter(|t| !t.trim().is_empty()),
                interrupt_response: None,
                session_id,
                pdf: Some(file_ref.clone()),
            },
        }
    }

    /// The stored flag is authoritative; the derived lookup must never contradict it
    fn debug_check_consistency(&self) {
        let derived = latest_open_interrupt(&self.transcript, self.in_flight);
        debug_assert!(
            derived.is_none() || self.has_open_interrupt,
            "open interrupt in transcript but flag cleared"
        );
        debug_assert!(
            derived.is_none()
                || derived.map(|(i, _)| i)
                    == awaited_interrupt(&self.transcript, self.has_open_interrupt, self.in_flight)
                        .map(|(i, _)| i),
            "derived and awaited interrupt disagree"
        );
    }
}
