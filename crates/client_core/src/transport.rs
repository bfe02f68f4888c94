//! HTTP transport to the transcript service.
//!
//! Every call settles either as a [`DomainResponse`] (including handled
//! failures reported with `success = false`) or as a synthesized
//! [`TransportError`]. Nothing is retried.

use std::error::Error as _;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use shared::{
    error::TransportError,
    protocol::{DomainResponse, TranscriptRequest},
};
use tracing::{debug, error, info};

#[async_trait]
pub trait TranscriptTransport: Send + Sync {
    async fn send(&self, request: &TranscriptRequest) -> Result<DomainResponse, TransportError>;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.base_url)
    }

    /// Probe the service root. Returns the greeting the service answers with.
    pub async fn health(&self) -> Result<String, TransportError> {
        let url = self.endpoint_url("");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(request_failure)?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| body_failure(status, &err))?;

        if !status.is_success() {
            return Err(status_failure(status, &body));
        }

        let greeting = match serde_json::from_slice::<serde_json::Value>(&body) {
            Ok(serde_json::Value::String(text)) => text,
            Ok(other) => other.to_string(),
            Err(_) => String::from_utf8_lossy(&body).into_owned(),
        };
        debug!(%url, %greeting, "transcript service answered health probe");
        Ok(greeting)
    }
}

#[async_trait]
impl TranscriptTransport for HttpTransport {
    async fn send(&self, request: &TranscriptRequest) -> Result<DomainResponse, TransportError> {
        let url = self.endpoint_url(request.endpoint());
        info!(action = request.action().as_str(), %url, "sending transcript request");

        let response = match self.http.post(&url).json(request).send().await {
            Ok(response) => response,
            Err(err) => {
                let failure = request_failure(err);
                error!(action = request.action().as_str(), %url, error = %failure, "transcript request failed");
                return Err(failure);
            }
        };

        let status = response.status();
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(err) => {
                let failure = body_failure(status, &err);
                error!(action = request.action().as_str(), %url, error = %failure, "failed to read transcript response");
                return Err(failure);
            }
        };

        let normalized = normalize_response(status, &body);
        match &normalized {
            Ok(response) => debug!(
                action = request.action().as_str(),
                http_status = status.as_u16(),
                success = response.success,
                "transcript response received"
            ),
            Err(failure) => error!(
                action = request.action().as_str(),
                http_status = status.as_u16(),
                error = %failure,
                "transcript response unusable"
            ),
        }
        normalized
    }
}

/// Turn a completed HTTP exchange into a domain response or a transport error.
///
/// A body that parses as a [`DomainResponse`] wins regardless of status code.
/// An unusable 2xx body reports the decode failure, not the reason phrase.
pub(crate) fn normalize_response(
    status: StatusCode,
    body: &[u8],
) -> Result<DomainResponse, TransportError> {
    let code = Some(status.as_u16());

    if status.is_success() {
        if body.is_empty() {
            return Err(TransportError::synthesize(
                None,
                None,
                Some("empty response body"),
                code,
            ));
        }
        return serde_json::from_slice::<DomainResponse>(body).map_err(|err| {
            TransportError::synthesize(
                None,
                None,
                Some(&format!("malformed response body: {err}")),
                code,
            )
        });
    }

    if let Ok(handled) = serde_json::from_slice::<DomainResponse>(body) {
        return Ok(handled);
    }

    Err(status_failure(status, body))
}

fn status_failure(status: StatusCode, body: &[u8]) -> TransportError {
    let body_message = partial_message(body);
    TransportError::synthesize(
        body_message.as_deref(),
        status.canonical_reason(),
        Some(&format!("Request failed with status code {}", status.as_u16())),
        Some(status.as_u16()),
    )
}

/// `message` field of a JSON object body that is not a full domain response.
fn partial_message(body: &[u8]) -> Option<String> {
    let value = serde_json::from_slice::<serde_json::Value>(body).ok()?;
    value.get("message")?.as_str().map(str::to_owned)
}

fn request_failure(err: reqwest::Error) -> TransportError {
    let status = err.status().map(|status| status.as_u16());
    TransportError::synthesize(None, None, Some(&describe(&err)), status)
}

fn body_failure(status: StatusCode, err: &reqwest::Error) -> TransportError {
    let status_text = if status.is_success() {
        None
    } else {
        status.canonical_reason()
    };
    TransportError::synthesize(
        None,
        status_text,
        Some(&describe(err)),
        Some(status.as_u16()),
    )
}

fn describe(err: &reqwest::Error) -> String {
    let mut description = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        description.push_str(": ");
        description.push_str(&cause.to_string());
        source = cause.source();
    }
    description
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
