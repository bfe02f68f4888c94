//! Single-slot toast notifications with auto-dismiss.
//!
//! Showing a toast replaces whatever occupies the slot and cancels the
//! replaced toast's timer. A timer only ever clears the toast it was armed
//! for, so a stale timer can never remove a newer toast.

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
    time::Duration,
};

use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::domain::{ToastId, ToastKind};
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, warn};

pub const DEFAULT_TOAST_TTL: Duration = Duration::from_millis(4000);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub id: ToastId,
    pub message: String,
    pub kind: ToastKind,
    pub created_at: DateTime<Utc>,
}

struct DismissTimer {
    toast_id: ToastId,
    handle: JoinHandle<()>,
}

pub struct NotificationCenter {
    slot: Arc<watch::Sender<Option<Toast>>>,
    timer: Mutex<Option<DismissTimer>>,
    next_id: AtomicU64,
    ttl: Duration,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TOAST_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        let (slot, _) = watch::channel(None);
        Self {
            slot: Arc::new(slot),
            timer: Mutex::new(None),
            next_id: AtomicU64::new(0),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Replace the current toast and arm its auto-dismiss timer.
    pub fn show(&self, message: impl Into<String>, kind: ToastKind) -> ToastId {
        let id = ToastId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let toast = Toast {
            id,
            message: message.into(),
            kind,
            created_at: Utc::now(),
        };

        let mut timer = self.lock_timer();
        if let Some(previous) = timer.take() {
            previous.handle.abort();
        }
        if let Some(replaced) = self.slot.send_replace(Some(toast)) {
            debug!(replaced = replaced.id.0, toast = id.0, "toast superseded");
        }
        *timer = self.arm_timer(id);
        id
    }

    /// Clear the slot now and cancel its pending timer.
    pub fn dismiss(&self) -> Option<Toast> {
        let mut timer = self.lock_timer();
        if let Some(pending) = timer.take() {
            pending.handle.abort();
        }
        self.slot.send_replace(None)
    }

    /// Clear the slot only if it still holds `id`.
    pub fn dismiss_toast(&self, id: ToastId) -> bool {
        let mut timer = self.lock_timer();
        let cleared = clear_if_current(&self.slot, id);
        if cleared && timer.as_ref().is_some_and(|pending| pending.toast_id == id) {
            if let Some(pending) = timer.take() {
                pending.handle.abort();
            }
        }
        cleared
    }

    pub fn current(&self) -> Option<Toast> {
        self.slot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Toast>> {
        self.slot.subscribe()
    }

    fn arm_timer(&self, id: ToastId) -> Option<DismissTimer> {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(toast = id.0, "no async runtime; toast will stay until dismissed");
            return None;
        };

        let slot = Arc::clone(&self.slot);
        let ttl = self.ttl;
        let handle = runtime.spawn(async move {
            tokio::time::sleep(ttl).await;
            if clear_if_current(&slot, id) {
                debug!(toast = id.0, "toast auto-dismissed");
            }
        });
        Some(DismissTimer {
            toast_id: id,
            handle,
        })
    }

    fn lock_timer(&self) -> MutexGuard<'_, Option<DismissTimer>> {
        self.timer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for NotificationCenter {
    fn drop(&mut self) {
        if let Some(pending) = self.lock_timer().take() {
            pending.handle.abort();
        }
    }
}

fn clear_if_current(slot: &watch::Sender<Option<Toast>>, id: ToastId) -> bool {
    slot.send_if_modified(|current| {
        if current.as_ref().is_some_and(|toast| toast.id == id) {
            *current = None;
            true
        } else {
            false
        }
    })
}

#[cfg(test)]
#[path = "tests/notifications_tests.rs"]
mod tests;
