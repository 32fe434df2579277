//! Interrupt lookup, input constraints and answer preparation

use super::dates;
use crate::conversation::{InputKind, Interrupt, Turn};
use chrono::NaiveDate;

/// Key of the interrupt asking for the start of a date range
pub const RANGE_START_KEY: &str = "from_date";
/// Key of the interrupt asking for the end of a date range
pub const RANGE_END_KEY: &str = "to_date";

/// Raw answer as produced by an input surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerInput {
    /// Date picked in calendar form (`YYYY-MM-DD`)
    Calendar(String),
    /// One of the offered options, used verbatim
    Choice(String),
    /// Typed text
    Text(String),
}

/// The interrupt a renderer may show as answerable: the last turn, with nothing in flight.
///
/// Any earlier interrupt turn is frozen.
pub fn latest_open_interrupt(transcript: &[Turn], in_flight: bool) -> Option<(usize, &Interrupt)> {
    if in_flight {
        return None;
    }
    let index = transcript.len().checked_sub(1)?;
    transcript[index].as_interrupt().map(|i| (index, i))
}

/// The interrupt the server is parked on, if the store says it is still awaiting an answer.
///
/// Agrees with [`latest_open_interrupt`] whenever that returns something; it
/// additionally covers the retry case where a failed answer left a fallback
/// turn after the interrupt.
pub fn awaited_interrupt(
    transcript: &[Turn],
    has_open_interrupt: bool,
    in_flight: bool,
) -> Option<(usize, &Interrupt)> {
    if !has_open_interrupt || in_flight {
        return None;
    }
    transcript
        .iter()
        .enumerate()
        .rev()
        .find_map(|(index, turn)| turn.as_interrupt().map(|i| (index, i)))
}

/// Earliest date the interrupt at `interrupt_index` may accept.
///
/// For the end of a range this is the day after the most recent date the user
/// gave before that interrupt; otherwise `today`.
pub fn minimum_date(transcript: &[Turn], interrupt_index: usize, today: NaiveDate) -> NaiveDate {
    let is_range_end = transcript
        .get(interrupt_index)
        .and_then(Turn::as_interrupt)
        .is_some_and(|i| i.key_is(RANGE_END_KEY));
    if !is_range_end {
        return today;
    }

    transcript
        .get(..interrupt_index)
        .and_then(latest_user_date)
        .and_then(dates::next_day)
        .unwrap_or(today)
}

/// Most recent date-shaped user text in `history`
fn latest_user_date(history: &[Turn]) -> Option<NaiveDate> {
    history
        .iter()
        .rev()
        .filter_map(Turn::user_text)
        .find(|text| dates::is_display_date(text))
        .and_then(dates::parse_display)
}

/// Bring a raw answer into transcript form; `None` when nothing is left to send
pub fn normalize(input: &AnswerInput) -> Option<String> {
    match input {
        AnswerInput::Calendar(raw) => dates::calendar_to_display(raw.trim()),
        AnswerInput::Choice(option) => Some(option.clone()).filter(|o| !o.is_empty()),
        AnswerInput::Text(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
    }
}

/// Normalize and validate an answer for the awaited interrupt.
///
/// Returns the answer to submit, or `None` when it must be dropped: nothing
/// awaited, a submission in flight, an empty answer, or a date outside the
/// interrupt's bounds.
pub fn prepare_answer(
    transcript: &[Turn],
    has_open_interrupt: bool,
    in_flight: bool,
    input: &AnswerInput,
    today: NaiveDate,
) -> Option<String> {
    let Some((index, interrupt)) = awaited_interrupt(transcript, has_open_interrupt, in_flight) else {
        tracing::debug!(in_flight, "Answer dropped: no interrupt awaiting");
        return None;
    };

    let Some(answer) = normalize(input) else {
        tracing::debug!("Answer dropped: empty after normalization");
        return None;
    };

    match interrupt.kind {
        InputKind::Date => {
            let minimum = minimum_date(transcript, index, today);
            match dates::parse_display(&answer) {
                Some(picked) if picked >= minimum => Some(answer),
                Some(picked) => {
                    tracing::debug!(%picked, %minimum, "Answer dropped: date before minimum");
                    None
                }
                None => {
                    tracing::debug!(answer = %answer, "Answer dropped: not a date");
                    None
                }
            }
        }
        InputKind::Type | InputKind::Select | InputKind::Confirm => Some(answer),
    }
}
