use serde::{Deserialize, Serialize};

use crate::domain::TranscriptAction;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadTranscriptRequest {
    #[serde(rename = "videoId")]
    pub video_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AskQuestionRequest {
    pub question: String,
}

/// A request to the transcript service. Serializes as the bare JSON body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TranscriptRequest {
    Upload(UploadTranscriptRequest),
    AskQuestion(AskQuestionRequest),
}

impl TranscriptRequest {
    /// Build the request body for `action` from the raw user input.
    pub fn for_action(action: TranscriptAction, input: impl Into<String>) -> Self {
        match action {
            TranscriptAction::Upload => TranscriptRequest::Upload(UploadTranscriptRequest {
                video_id: input.into(),
            }),
            TranscriptAction::Ask => TranscriptRequest::AskQuestion(AskQuestionRequest {
                question: input.into(),
            }),
        }
    }

    pub fn action(&self) -> TranscriptAction {
        match self {
            TranscriptRequest::Upload(_) => TranscriptAction::Upload,
            TranscriptRequest::AskQuestion(_) => TranscriptAction::Ask,
        }
    }

    pub fn endpoint(&self) -> &'static str {
        self.action().endpoint()
    }
}

/// Normalized answer of the transcript service.
///
/// `success = false` is a handled business outcome reported by the service,
/// not a transport failure. Upload responses carry no `data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainResponse {
    pub success: bool,
    pub message: String,
    pub status: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl DomainResponse {
    pub fn ok(message: impl Into<String>, status: i64) -> Self {
        Self {
            success: true,
            message: message.into(),
            status,
            data: None,
        }
    }

    pub fn failed(message: impl Into<String>, status: i64) -> Self {
        Self {
            success: false,
            message: message.into(),
            status,
            data: None,
        }
    }

    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }
}
