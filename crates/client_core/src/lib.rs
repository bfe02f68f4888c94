//! Client-side orchestration for the transcript Q&A service.
//!
//! A [`TranscriptSession`] runs the upload and ask actions against an
//! injected [`TranscriptTransport`], reporting every outcome through a
//! single-slot [`NotificationCenter`] and keeping transport failures in a
//! bounded [`ErrorLog`].

pub mod config;
pub mod error_log;
pub mod notifications;
pub mod orchestrator;
pub mod results;
pub mod session;
pub mod transport;

pub use config::{load_settings, ClientSettings, ConfigError};
pub use error_log::{ErrorLog, LogEntry};
pub use notifications::{NotificationCenter, Toast};
pub use orchestrator::{ActionOrchestrator, ActionOutcome, ActionView, OrchestratorDeps};
pub use results::ResultStore;
pub use session::{SessionSnapshot, TranscriptSession};
pub use transport::{HttpTransport, TranscriptTransport};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
