//! Per-action state machines: `Idle -> Busy -> Idle`.
//!
//! An orchestrator validates input, calls the transport, and turns the
//! settlement into a toast, an optional stored answer, and (for transport
//! failures only) an error log entry.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use serde::Serialize;
use shared::{
    domain::{ToastKind, TranscriptAction},
    error::{ActionError, TransportError},
    protocol::{DomainResponse, TranscriptRequest},
};
use tracing::{debug, error, info, warn};

use crate::{
    error_log::ErrorLog, notifications::NotificationCenter, results::ResultStore,
    transport::TranscriptTransport,
};

/// Collaborators shared by every orchestrator of a session.
#[derive(Clone)]
pub struct OrchestratorDeps {
    pub transport: Arc<dyn TranscriptTransport>,
    pub notifications: Arc<NotificationCenter>,
    pub error_log: Arc<ErrorLog>,
    pub results: Arc<ResultStore>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The same action was already in flight; nothing happened.
    Busy,
    Succeeded(DomainResponse),
    Failed(ActionError),
}

impl ActionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ActionOutcome::Succeeded(_))
    }

    pub fn error(&self) -> Option<&ActionError> {
        match self {
            ActionOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// What a presentation needs to render one action's trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionView {
    pub action: TranscriptAction,
    pub busy: bool,
    pub label: String,
}

pub struct ActionOrchestrator {
    action: TranscriptAction,
    busy: AtomicBool,
    deps: OrchestratorDeps,
}

impl ActionOrchestrator {
    pub fn new(action: TranscriptAction, deps: OrchestratorDeps) -> Self {
        Self {
            action,
            busy: AtomicBool::new(false),
            deps,
        }
    }

    pub fn action(&self) -> TranscriptAction {
        self.action
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Trigger label: the busy label while a request is in flight.
    pub fn label(&self) -> &'static str {
        self.label_for(self.is_busy())
    }

    pub fn view(&self) -> ActionView {
        let busy = self.is_busy();
        ActionView {
            action: self.action,
            busy,
            label: self.label_for(busy).to_string(),
        }
    }

    fn label_for(&self, busy: bool) -> &'static str {
        if busy {
            self.action.busy_label()
        } else {
            self.action.idle_label()
        }
    }

    /// Run the action for `input`. Always leaves the orchestrator idle.
    pub async fn submit(&self, input: &str) -> ActionOutcome {
        let action = self.action.as_str();
        if self.is_busy() {
            debug!(action, "ignoring submit while busy");
            return ActionOutcome::Busy;
        }

        if input.trim().is_empty() {
            let err = ActionError::validation(self.action.empty_input_message());
            self.deps
                .notifications
                .show(err.to_string(), ToastKind::Error);
            return ActionOutcome::Failed(err);
        }

        let Some(_busy) = BusyGuard::acquire(&self.busy) else {
            debug!(action, "lost race for busy flag");
            return ActionOutcome::Busy;
        };

        let request = TranscriptRequest::for_action(self.action, input);
        info!(action, "dispatching transcript action");
        match self.deps.transport.send(&request).await {
            Ok(response) => self.settle_response(response),
            Err(err) => self.settle_transport_failure(err),
        }
    }

    fn settle_response(&self, response: DomainResponse) -> ActionOutcome {
        let action = self.action.as_str();
        if response.success {
            info!(action, status = response.status, "transcript action succeeded");
            if self.action.stores_result() {
                self.deps
                    .results
                    .set(response.data.clone().unwrap_or_default());
            }
            self.deps
                .notifications
                .show(response.message.clone(), ToastKind::Success);
            return ActionOutcome::Succeeded(response);
        }

        warn!(
            action,
            status = response.status,
            reason = %response.message,
            "transcript service reported failure"
        );
        self.deps
            .notifications
            .show(response.message.clone(), ToastKind::Error);
        ActionOutcome::Failed(ActionError::domain(response.message, response.status))
    }

    fn settle_transport_failure(&self, err: TransportError) -> ActionOutcome {
        error!(action = self.action.as_str(), error = %err, "transcript action failed");
        self.deps
            .error_log
            .append(format!("{}: {err}", self.action.log_prefix()));
        self.deps.notifications.show(
            format!("{}: {err}", self.action.failure_prefix()),
            ToastKind::Error,
        );
        ActionOutcome::Failed(err.into())
    }
}

/// Holds the busy flag. Released on drop, including when the submit future
/// is dropped mid-flight.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
#[path = "tests/orchestrator_tests.rs"]
mod tests;
