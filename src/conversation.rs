//! Client-side conversation state
//!
//! An ordered transcript of turns plus the flags that keep exactly one
//! submission in flight and at most one interrupt awaiting an answer.

mod session;
mod store;
mod submission;
mod turn;

#[cfg(test)]
mod proptests;

pub use session::SessionId;
pub use store::{ConversationStore, Settlement, TranscriptView};
#[cfg(test)]
pub use store::FALLBACK_TEXT;
pub use submission::Submission;
pub use turn::{InputKind, Interrupt, Sender, Turn};
