//! Interrupt resolution
//!
//! Pure functions over the transcript: which interrupt may receive the next
//! answer, what bounds apply to its input, and how a raw answer is normalized
//! before it reaches the store.

pub mod dates;
mod resolver;

pub use resolver::{awaited_interrupt, latest_open_interrupt, minimum_date, prepare_answer, AnswerInput};
#[cfg(test)]
pub use resolver::{RANGE_END_KEY, RANGE_START_KEY};
