//! Scripted transport used by orchestrator and session tests.

use std::{
    collections::VecDeque,
    sync::Mutex,
};

use async_trait::async_trait;
use shared::{
    error::TransportError,
    protocol::{DomainResponse, TranscriptRequest},
};
use tokio::sync::oneshot;

use crate::transport::TranscriptTransport;

type Reply = Result<DomainResponse, TransportError>;

struct Gate {
    entered: oneshot::Sender<()>,
    release: oneshot::Receiver<()>,
}

#[derive(Default)]
pub(crate) struct ScriptedTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<TranscriptRequest>>,
    gate: Mutex<Option<Gate>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_reply(self, reply: Reply) -> Self {
        self.replies.lock().expect("replies").push_back(reply);
        self
    }

    pub(crate) fn with_replies(self, replies: impl IntoIterator<Item = Reply>) -> Self {
        self.replies.lock().expect("replies").extend(replies);
        self
    }

    /// Hold the next call until the returned sender fires. The receiver
    /// resolves once that call has started.
    pub(crate) fn hold_next_call(&self) -> (oneshot::Receiver<()>, oneshot::Sender<()>) {
        let (entered_tx, entered_rx) = oneshot::channel();
        let (release_tx, release_rx) = oneshot::channel();
        *self.gate.lock().expect("gate") = Some(Gate {
            entered: entered_tx,
            release: release_rx,
        });
        (entered_rx, release_tx)
    }

    pub(crate) fn calls(&self) -> usize {
        self.requests.lock().expect("requests").len()
    }

    pub(crate) fn requests(&self) -> Vec<TranscriptRequest> {
        self.requests.lock().expect("requests").clone()
    }
}

#[async_trait]
impl TranscriptTransport for ScriptedTransport {
    async fn send(&self, request: &TranscriptRequest) -> Result<DomainResponse, TransportError> {
        self.requests
            .lock()
            .expect("requests")
            .push(request.clone());

        let gate = self.gate.lock().expect("gate").take();
        if let Some(gate) = gate {
            let _ = gate.entered.send(());
            let _ = gate.release.await;
        }

        self.replies
            .lock()
            .expect("replies")
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::new("no scripted reply", None)))
    }
}

pub(crate) fn server_error() -> TransportError {
    TransportError::synthesize(None, Some("Internal Server Error"), None, Some(500))
}
