use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fallback message when neither the response nor the transport describe a failure.
pub const NETWORK_ERROR_FALLBACK: &str = "Network error occurred";

/// A call that produced no usable response body.
///
/// Displays as `API Error (<status>): <message>`, with `Unknown` when the
/// failure happened before any HTTP status was received.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("API Error ({}): {message}", StatusMarker(.status))]
pub struct TransportError {
    pub message: String,
    pub status: Option<u16>,
}

impl TransportError {
    pub fn new(message: impl Into<String>, status: Option<u16>) -> Self {
        Self {
            message: message.into(),
            status,
        }
    }

    /// Pick the most descriptive message available, in priority order:
    /// response `message` field, HTTP status text, transport error text,
    /// then [`NETWORK_ERROR_FALLBACK`]. Blank candidates are skipped.
    pub fn synthesize(
        body_message: Option<&str>,
        status_text: Option<&str>,
        transport_description: Option<&str>,
        status: Option<u16>,
    ) -> Self {
        let message = [body_message, status_text, transport_description]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|candidate| !candidate.is_empty())
            .unwrap_or(NETWORK_ERROR_FALLBACK);
        Self::new(message, status)
    }
}

struct StatusMarker<'a>(&'a Option<u16>);

impl fmt::Display for StatusMarker<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(code) => write!(f, "{code}"),
            None => f.write_str("Unknown"),
        }
    }
}

/// Why an orchestrated action did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionError {
    /// Empty or whitespace-only input, caught before any network call.
    #[error("{message}")]
    Validation { message: String },
    /// The service answered but reported `success = false`.
    #[error("{message}")]
    Domain { message: String, status: i64 },
    #[error(transparent)]
    Transport(TransportError),
}

impl ActionError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn domain(message: impl Into<String>, status: i64) -> Self {
        Self::Domain {
            message: message.into(),
            status,
        }
    }

    pub fn status(&self) -> Option<i64> {
        match self {
            ActionError::Validation { .. } => None,
            ActionError::Domain { status, .. } => Some(*status),
            ActionError::Transport(err) => err.status.map(i64::from),
        }
    }

    /// Whether this failure goes to the error log.
    pub fn is_logged(&self) -> bool {
        matches!(self, ActionError::Transport(_))
    }
}

impl From<TransportError> for ActionError {
    fn from(value: TransportError) -> Self {
        ActionError::Transport(value)
    }
}
