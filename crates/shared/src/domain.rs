use serde::{Deserialize, Serialize};

/// User actions the client can orchestrate against the transcript service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptAction {
    Upload,
    Ask,
}

impl TranscriptAction {
    /// Path segment appended to the configured service base.
    pub fn endpoint(self) -> &'static str {
        match self {
            TranscriptAction::Upload => "upload",
            TranscriptAction::Ask => "ask-question",
        }
    }

    /// Toast shown when the input box is empty or whitespace-only.
    pub fn empty_input_message(self) -> &'static str {
        match self {
            TranscriptAction::Upload => "Please enter a YouTube video ID",
            TranscriptAction::Ask => "Please enter a question",
        }
    }

    pub fn idle_label(self) -> &'static str {
        match self {
            TranscriptAction::Upload => "Upload",
            TranscriptAction::Ask => "Ask",
        }
    }

    pub fn busy_label(self) -> &'static str {
        match self {
            TranscriptAction::Upload => "Uploading...",
            TranscriptAction::Ask => "Thinking...",
        }
    }

    /// Prefix for the user-facing toast after a transport failure.
    pub fn failure_prefix(self) -> &'static str {
        match self {
            TranscriptAction::Upload => "Upload Failed",
            TranscriptAction::Ask => "Question Failed",
        }
    }

    /// Prefix for the diagnostic error log entry after a transport failure.
    pub fn log_prefix(self) -> &'static str {
        match self {
            TranscriptAction::Upload => "Upload Error",
            TranscriptAction::Ask => "Question Error",
        }
    }

    /// Whether a successful response carries an answer for the result store.
    pub fn stores_result(self) -> bool {
        matches!(self, TranscriptAction::Ask)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TranscriptAction::Upload => "upload",
            TranscriptAction::Ask => "ask",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastKind {
    Success,
    Error,
}

/// Identity of a single toast; increases with every `show`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ToastId(pub u64);
