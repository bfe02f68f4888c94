//! One user's view of the transcript service: both actions plus the shared
//! notification slot, error log and answer.

use std::{sync::Arc, time::Duration};

use serde::Serialize;
use shared::domain::TranscriptAction;
use tokio::sync::watch;

use crate::{
    config::ClientSettings,
    error_log::{ErrorLog, LogEntry},
    notifications::{NotificationCenter, Toast},
    orchestrator::{ActionOrchestrator, ActionOutcome, ActionView, OrchestratorDeps},
    results::ResultStore,
    transport::{HttpTransport, TranscriptTransport},
};

/// Everything a presentation renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub upload: ActionView,
    pub ask: ActionView,
    pub last_toast: Option<Toast>,
    pub last_result: Option<String>,
    pub error_log: Vec<LogEntry>,
}

pub struct TranscriptSession {
    upload: ActionOrchestrator,
    ask: ActionOrchestrator,
    notifications: Arc<NotificationCenter>,
    error_log: Arc<ErrorLog>,
    results: Arc<ResultStore>,
}

impl TranscriptSession {
    pub fn new(transport: Arc<dyn TranscriptTransport>) -> Self {
        Self::with_notifications(transport, NotificationCenter::new())
    }

    pub fn with_toast_ttl(transport: Arc<dyn TranscriptTransport>, ttl: Duration) -> Self {
        Self::with_notifications(transport, NotificationCenter::with_ttl(ttl))
    }

    /// Session talking HTTP to the configured service.
    pub fn connect(settings: &ClientSettings) -> Self {
        Self::with_toast_ttl(
            Arc::new(HttpTransport::new(settings.api_base.clone())),
            settings.toast_ttl(),
        )
    }

    fn with_notifications(
        transport: Arc<dyn TranscriptTransport>,
        notifications: NotificationCenter,
    ) -> Self {
        let deps = OrchestratorDeps {
            transport,
            notifications: Arc::new(notifications),
            error_log: Arc::new(ErrorLog::new()),
            results: Arc::new(ResultStore::new()),
        };
        Self {
            upload: ActionOrchestrator::new(TranscriptAction::Upload, deps.clone()),
            ask: ActionOrchestrator::new(TranscriptAction::Ask, deps.clone()),
            notifications: deps.notifications,
            error_log: deps.error_log,
            results: deps.results,
        }
    }

    pub async fn upload_transcript(&self, video_id: &str) -> ActionOutcome {
        self.upload.submit(video_id).await
    }

    pub async fn ask_question(&self, question: &str) -> ActionOutcome {
        self.ask.submit(question).await
    }

    pub fn orchestrator(&self, action: TranscriptAction) -> &ActionOrchestrator {
        match action {
            TranscriptAction::Upload => &self.upload,
            TranscriptAction::Ask => &self.ask,
        }
    }

    pub fn dismiss_toast(&self) -> Option<Toast> {
        self.notifications.dismiss()
    }

    pub fn subscribe_toasts(&self) -> watch::Receiver<Option<Toast>> {
        self.notifications.subscribe()
    }

    pub fn error_log(&self) -> &ErrorLog {
        &self.error_log
    }

    pub fn answer(&self) -> Option<String> {
        self.results.get()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            upload: self.upload.view(),
            ask: self.ask.view(),
            last_toast: self.notifications.current(),
            last_result: self.results.get(),
            error_log: self.error_log.entries(),
        }
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
