//! Interactive terminal front end
//!
//! Reads one line at a time, routes it to the open interrupt or as a new
//! query, and prints whatever turns the store appended.

mod render;

use crate::conversation::{ConversationStore, InputKind, Interrupt, Settlement, Submission};
use crate::interrupt::{awaited_interrupt, dates, prepare_answer, AnswerInput};
use crate::transport::WorkflowClient;
use chrono::NaiveDate;
use std::io::{self, Write};
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

const HELP: &str = "\
Commands:
  /upload <path>  attach a file to your next message
  /default        accept the default answer of the open question
  /history        show the whole conversation
  /reset          start a new conversation
  /help           show this help
  /quit           exit";

/// A parsed input line
#[derive(Debug, PartialEq, Eq)]
enum Line {
    Empty,
    Input(String),
    Command(Command),
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Upload(PathBuf),
    Default,
    History,
    Reset,
    Help,
    Quit,
}

fn parse_line(raw: &str) -> Result<Line, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Line::Empty);
    }
    let Some(command) = trimmed.strip_prefix('/') else {
        return Ok(Line::Input(raw.to_string()));
    };

    let (name, arg) = command
        .split_once(char::is_whitespace)
        .map_or((command, ""), |(n, a)| (n, a.trim()));
    let command = match (name, arg) {
        ("upload", "") => return Err("usage: /upload <path>".to_string()),
        ("upload", path) => Command::Upload(PathBuf::from(path)),
        ("default", _) => Command::Default,
        ("history", _) => Command::History,
        ("reset", _) => Command::Reset,
        ("help", _) => Command::Help,
        ("quit" | "exit", _) => Command::Quit,
        (other, _) => return Err(format!("unknown command /{other} (try /help)")),
    };
    Ok(Line::Command(command))
}

/// Turn a typed line into the input surface's raw answer
fn answer_input_for(interrupt: &Interrupt, line: &str) -> AnswerInput {
    let trimmed = line.trim();
    match interrupt.kind {
        InputKind::Select | InputKind::Confirm => {
            let picked = trimmed
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| interrupt.offered_options().get(i));
            match picked {
                Some(option) => AnswerInput::Choice(option.clone()),
                None => AnswerInput::Text(line.to_string()),
            }
        }
        InputKind::Date if dates::is_calendar_date(trimmed) => AnswerInput::Calendar(trimmed.to_string()),
        InputKind::Date | InputKind::Type => AnswerInput::Text(line.to_string()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Terminal session over one conversation store
pub struct Repl<C> {
    client: C,
    store: ConversationStore,
    /// Reference returned by the last successful upload, sent with the next query
    pending_attachment: Option<String>,
    /// Number of transcript turns already printed
    rendered: usize,
    clock: fn() -> NaiveDate,
}

fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

impl<C: WorkflowClient> Repl<C> {
    pub fn new(client: C, store: ConversationStore) -> Self {
        Self {
            client,
            store,
            pending_attachment: None,
            rendered: 0,
            clock: local_today,
        }
    }

    #[cfg(test)]
    fn with_clock(mut self, clock: fn() -> NaiveDate) -> Self {
        self.clock = clock;
        self
    }

    pub async fn run<R, W>(&mut self, input: R, out: &mut W) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        writeln!(out, "Trip Planner (session {}). Type /help for commands.", self.store.session_id())?;
        let mut lines = input.lines();
        loop {
            write!(out, "> ")?;
            out.flush()?;
            let Some(line) = lines.next_line().await? else {
                break;
            };
            if self.handle_line(&line, out).await? == Flow::Quit {
                break;
            }
        }
        Ok(())
    }

    pub async fn handle_line<W: Write>(&mut self, raw: &str, out: &mut W) -> io::Result<Flow> {
        match parse_line(raw) {
            Ok(Line::Empty) => {}
            Ok(Line::Input(line)) => self.submit_line(&line, out).await?,
            Ok(Line::Command(command)) => return self.run_command(command, out).await,
            Err(message) => writeln!(out, "{message}")?,
        }
        Ok(Flow::Continue)
    }

    async fn run_command<W: Write>(&mut self, command: Command, out: &mut W) -> io::Result<Flow> {
        match command {
            Command::Upload(path) => self.upload(path, out).await?,
            Command::Default => self.submit_default(out).await?,
            Command::History => self.render_all(out)?,
            Command::Reset => {
                self.store.reset();
                self.pending_attachment = None;
                self.rendered = 0;
                writeln!(out, "Started a new conversation (session {}).", self.store.session_id())?;
            }
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    async fn submit_line<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<()> {
        if self.store.awaiting_answer() {
            let input = match awaited_interrupt(self.store.transcript(), true, false) {
                Some((_, interrupt)) => answer_input_for(interrupt, line),
                None => AnswerInput::Text(line.to_string()),
            };
            return self.submit_answer(&input, out).await;
        }

        let submission = match self.pending_attachment.take() {
            Some(file_ref) => Submission::attachment(file_ref, Some(line.trim().to_string())),
            None => Submission::text(line.trim()),
        };
        let attachment = match &submission {
            Submission::Attachment { file_ref, .. } => Some(file_ref.clone()),
            _ => None,
        };
        if self.submit(submission, out).await?.is_none() {
            self.pending_attachment = attachment;
        }
        Ok(())
    }

    async fn submit_default<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        let default = self
            .awaited()
            .and_then(|interrupt| interrupt.default.clone());
        match default {
            Some(default) => self.submit_answer(&AnswerInput::Choice(default), out).await,
            None => writeln!(out, "There is no default answer to accept."),
        }
    }

    async fn submit_answer<W: Write>(&mut self, input: &AnswerInput, out: &mut W) -> io::Result<()> {
        let prepared = prepare_answer(
            self.store.transcript(),
            self.store.has_open_interrupt(),
            self.store.in_flight(),
            input,
            (self.clock)(),
        );
        match prepared {
            Some(answer) => {
                self.submit(Submission::answer(answer), out).await?;
            }
            None => writeln!(out, "That answer can't be used here; please try again.")?,
        }
        Ok(())
    }

    /// Send one submission; the user's own line is not echoed back
    async fn submit<W: Write>(&mut self, submission: Submission, out: &mut W) -> io::Result<Option<Settlement>> {
        if submission.is_empty() {
            return Ok(None);
        }
        writeln!(out, "Bot: Processing...")?;
        out.flush()?;

        let before = self.store.transcript().len();
        let settlement = self.store.submit_turn(&self.client, submission).await;
        if settlement.is_some() {
            // Skip the optimistic user turn
            self.rendered = self.rendered.max(before + 1);
        }
        self.render_new(out)?;

        if settlement == Some(Settlement::Failed) && self.store.view().has_active_interrupt {
            if let Some(interrupt) = self.awaited() {
                writeln!(out, "  (still waiting for: {})", interrupt.question)?;
            }
        }
        Ok(settlement)
    }

    async fn upload<W: Write>(&mut self, path: PathBuf, out: &mut W) -> io::Result<()> {
        match self.client.upload(&path).await {
            Ok(attachment) => {
                writeln!(out, "Attached {}; it will be sent with your next message.", path.display())?;
                self.pending_attachment = Some(attachment.path);
            }
            Err(e) => {
                tracing::error!(file = %path.display(), error = %e, "Attachment not set");
                self.pending_attachment = None;
                writeln!(out, "Upload failed: {e}")?;
            }
        }
        Ok(())
    }

    fn awaited(&self) -> Option<&Interrupt> {
        awaited_interrupt(
            self.store.transcript(),
            self.store.has_open_interrupt(),
            self.store.in_flight(),
        )
        .map(|(_, interrupt)| interrupt)
    }

    fn render_new<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        let view = self.store.view();
        let today = (self.clock)();
        for index in self.rendered..view.turns.len() {
            render::write_turn(out, &view, index, today)?;
        }
        self.rendered = view.turns.len();
        Ok(())
    }

    fn render_all<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        if self.store.transcript().is_empty() {
            return writeln!(out, "(no messages yet)");
        }
        self.rendered = 0;
        self.render_new(out)
    }
}
