//! Plain-text transcript rendering

use crate::conversation::{InputKind, Interrupt, Sender, TranscriptView, Turn};
use crate::interrupt::{dates, minimum_date};
use chrono::NaiveDate;
use std::io::{self, Write};

/// How an interrupt turn accepts input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InterruptState {
    Open,
    /// Awaited again after the last answer failed
    Retry,
    Closed,
}

impl InterruptState {
    fn of(view: &TranscriptView<'_>, index: usize) -> Self {
        if view.is_answerable(index) {
            InterruptState::Open
        } else if view.is_awaiting_retry(index) {
            InterruptState::Retry
        } else {
            InterruptState::Closed
        }
    }
}

pub fn write_turn<W: Write>(
    out: &mut W,
    view: &TranscriptView<'_>,
    index: usize,
    today: NaiveDate,
) -> io::Result<()> {
    match &view.turns[index] {
        Turn::Text { sender, text } => write_text(out, *sender, text),
        Turn::Interrupt { interrupt } => {
            let min_date = (interrupt.kind == InputKind::Date)
                .then(|| minimum_date(view.turns, index, today));
            write_interrupt(out, interrupt, InterruptState::of(view, index), min_date)
        }
    }
}

fn write_text<W: Write>(out: &mut W, sender: Sender, text: &str) -> io::Result<()> {
    let mut lines = text.lines();
    writeln!(out, "{}: {}", sender.label(), lines.next().unwrap_or_default())?;
    for line in lines {
        writeln!(out, "     {line}")?;
    }
    Ok(())
}

fn write_interrupt<W: Write>(
    out: &mut W,
    interrupt: &Interrupt,
    state: InterruptState,
    min_date: Option<NaiveDate>,
) -> io::Result<()> {
    if let Some(plan) = &interrupt.plan {
        writeln!(out, "Bot: Your Trip Plan")?;
        for line in plan.lines() {
            writeln!(out, "  | {line}")?;
        }
    }

    write_text(out, Sender::Bot, &interrupt.question)?;

    match state {
        InterruptState::Closed => return writeln!(out, "  [closed]"),
        InterruptState::Retry => writeln!(out, "  [awaiting your answer again; the last attempt failed]")?,
        InterruptState::Open => {}
    }

    for (n, option) in interrupt.offered_options().iter().enumerate() {
        writeln!(out, "  [{}] {option}", n + 1)?;
    }

    match interrupt.kind {
        InputKind::Select | InputKind::Confirm if !interrupt.options.is_empty() => {
            writeln!(out, "  (pick a number or type your own answer)")?;
        }
        InputKind::Date => {
            let earliest = min_date.map_or_else(String::new, |d| format!(" on or after {}", dates::format_calendar(d)));
            writeln!(out, "  (enter a date{earliest} as YYYY-MM-DD)")?;
        }
        InputKind::Type | InputKind::Select | InputKind::Confirm => {}
    }

    if let Some(default) = &interrupt.default {
        writeln!(out, "  Default: {default} (/default to accept)")?;
    }

    if let Some(meta) = interrupt.meta_entries() {
        for (key, value) in meta {
            match value.as_str() {
                Some(s) => writeln!(out, "  {key}: {s}")?,
                None => writeln!(out, "  {key}: {value}")?,
            }
        }
    }

    Ok(())
}
