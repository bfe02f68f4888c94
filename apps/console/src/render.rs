//! Terminal rendering of session state.

use client_core::{ActionOutcome, LogEntry, Toast, TranscriptSession};
use shared::domain::{ToastKind, TranscriptAction};
use tokio::sync::watch;

pub fn format_toast(toast: &Toast) -> String {
    let glyph = match toast.kind {
        ToastKind::Success => "✅",
        ToastKind::Error => "❌",
    };
    format!("{glyph} {}", toast.message)
}

pub fn format_error_log(entries: &[LogEntry]) -> String {
    if entries.is_empty() {
        return "Error log is empty".to_string();
    }
    let mut out = format!("Recent errors ({}):", entries.len());
    for entry in entries {
        out.push_str("\n  ");
        out.push_str(&entry.to_string());
    }
    out
}

/// Print every change of the notification slot until the session goes away.
pub async fn print_toasts(mut toasts: watch::Receiver<Option<Toast>>) {
    while toasts.changed().await.is_ok() {
        let current = toasts.borrow_and_update().clone();
        match current {
            Some(toast) => println!("{}", format_toast(&toast)),
            None => println!("(notification cleared)"),
        }
    }
}

pub fn print_outcome(
    session: &TranscriptSession,
    action: TranscriptAction,
    outcome: &ActionOutcome,
    debug: bool,
) {
    match outcome {
        ActionOutcome::Busy => println!("[{}] already running", action.busy_label()),
        ActionOutcome::Succeeded(_) if action.stores_result() => {
            if let Some(answer) = session.answer().filter(|answer| !answer.is_empty()) {
                println!("Answer:\n{answer}");
            }
        }
        ActionOutcome::Succeeded(_) => {}
        ActionOutcome::Failed(err) => {
            if debug && err.is_logged() {
                println!("{}", format_error_log(&session.error_log().entries()));
            }
        }
    }
}
