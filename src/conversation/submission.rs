//! User submissions accepted by the store

/// Payload of one submit-turn call; exactly one variant per call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// New free-text query
    Text(String),
    /// Answer to the interrupt the server is waiting on
    Answer(String),
    /// Uploaded attachment reference, optionally with accompanying text
    Attachment {
        file_ref: String,
        text: Option<String>,
    },
}

impl Submission {
    pub fn text(text: impl Into<String>) -> Self {
        Submission::Text(text.into())
    }

    pub fn answer(answer: impl Into<String>) -> Self {
        Submission::Answer(answer.into())
    }

    pub fn attachment(file_ref: impl Into<String>, text: Option<String>) -> Self {
        Submission::Attachment {
            file_ref: file_ref.into(),
            text,
        }
    }

    /// Nothing to send: blank text, blank answer, or blank file reference
    pub fn is_empty(&self) -> bool {
        match self {
            Submission::Text(text) | Submission::Answer(text) => text.trim().is_empty(),
            Submission::Attachment { file_ref, .. } => file_ref.trim().is_empty(),
        }
    }

    /// Whether this addresses the awaiting interrupt rather than opening a new query
    pub fn is_answer(&self) -> bool {
        matches!(self, Submission::Answer(_))
    }

    /// Text shown for the optimistic user turn
    pub fn display_text(&self) -> String {
        match self {
            Submission::Text(text) | Submission::Answer(text) => text.clone(),
            Submission::Attachment { file_ref, text } => {
                match text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
                    Some(text) => format!("{text}\n[attachment: {file_ref}]"),
                    None => format!("[attachment: {file_ref}]"),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_payloads() {
        assert!(Submission::text("   ").is_empty());
        assert!(Submission::answer("").is_empty());
        assert!(Submission::attachment(" ", Some("notes".into())).is_empty());
        assert!(!Submission::attachment("uploads/a.pdf", None).is_empty());
    }

    #[test]
    fn test_attachment_display_is_self_describing() {
        let with_text = Submission::attachment("uploads/a.pdf", Some("See this".into()));
        assert_eq!(with_text.display_text(), "See this\n[attachment: uploads/a.pdf]");

        let bare = Submission::attachment("uploads/a.pdf", Some("  ".into()));
        assert_eq!(bare.display_text(), "[attachment: uploads/a.pdf]");
    }
}
