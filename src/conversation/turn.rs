//! Transcript entry types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Who authored a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    pub fn label(self) -> &'static str {
        match self {
            Sender::User => "You",
            Sender::Bot => "Bot",
        }
    }
}

/// Input surface an interrupt asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    /// Free text answer
    Type,
    /// Pick one of the offered options (free text also accepted)
    Select,
    /// Calendar date
    Date,
    /// Yes/no style confirmation over the offered options
    Confirm,
}

impl InputKind {
    /// Parse the wire value of `input_type`
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "type" => Some(InputKind::Type),
            "select" => Some(InputKind::Select),
            "date" => Some(InputKind::Date),
            "confirm" => Some(InputKind::Confirm),
            _ => None,
        }
    }

    /// Kind to assume when the server omits `input_type`
    pub fn infer(key: Option<&str>, options: Option<&[String]>) -> Self {
        match key {
            Some("from_date" | "to_date") => InputKind::Date,
            _ if options.is_some_and(|o| !o.is_empty()) => InputKind::Select,
            _ => InputKind::Type,
        }
    }

    /// Whether the option list is meaningful for this kind
    pub fn uses_options(self) -> bool {
        matches!(self, InputKind::Select | InputKind::Confirm)
    }
}

/// A server-issued request for structured input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interrupt {
    /// Stable key used to correlate interrupts semantically (e.g. `to_date`)
    pub key: Option<String>,
    pub question: String,
    pub kind: InputKind,
    #[serde(default)]
    pub options: Vec<String>,
    /// Rendered plan shown as supporting context
    pub plan: Option<String>,
    pub default: Option<String>,
    /// Free-form server context (detected values and the like)
    #[serde(default)]
    pub meta: Value,
}

#[allow(dead_code)] // Builders for fixtures and API completeness
impl Interrupt {
    pub fn new(question: impl Into<String>, kind: InputKind) -> Self {
        Self {
            key: None,
            question: question.into(),
            kind,
            options: Vec::new(),
            plan: None,
            default: None,
            meta: Value::Null,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_plan(mut self, plan: impl Into<String>) -> Self {
        self.plan = Some(plan.into());
        self
    }

    pub fn key_is(&self, key: &str) -> bool {
        self.key.as_deref() == Some(key)
    }

    /// Options relevant to this interrupt's kind; empty for kinds that ignore them
    pub fn offered_options(&self) -> &[String] {
        if self.kind.uses_options() {
            &self.options
        } else {
            &[]
        }
    }

    /// `meta` when it carries anything worth showing
    pub fn meta_entries(&self) -> Option<&serde_json::Map<String, Value>> {
        self.meta.as_object().filter(|m| !m.is_empty())
    }
}

/// One transcript entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Turn {
    Text { sender: Sender, text: String },
    /// The bot is asking rather than answering
    Interrupt { interrupt: Interrupt },
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Turn::Text {
            sender: Sender::User,
            text: text.into(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Turn::Text {
            sender: Sender::Bot,
            text: text.into(),
        }
    }

    pub fn interrupt(interrupt: Interrupt) -> Self {
        Turn::Interrupt { interrupt }
    }

    #[allow(dead_code)] // State query utility
    pub fn sender(&self) -> Sender {
        match self {
            Turn::Text { sender, .. } => *sender,
            Turn::Interrupt { .. } => Sender::Bot,
        }
    }

    /// Text of a user-authored text turn
    pub fn user_text(&self) -> Option<&str> {
        match self {
            Turn::Text {
                sender: Sender::User,
                text,
            } => Some(text),
            _ => None,
        }
    }

    pub fn as_interrupt(&self) -> Option<&Interrupt> {
        match self {
            Turn::Interrupt { interrupt } => Some(interrupt),
            Turn::Text { .. } => None,
        }
    }
}
