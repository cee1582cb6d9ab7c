use serde::Serialize;
use std::fmt::Debug;

/// A trait for events that can be published on the EventBus.
pub trait Event: Send + Sync + Debug + 'static {
    /// Returns a unique identifier for this event type.
    fn event_type(&self) -> &'static str;
}

/// Notifications emitted by a refresh run, in order:
/// one `Started`, zero or more `Progress`, one `Finished`.
///
/// A run that fails to resolve its collection emits only `Finished { ok: false }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RefreshEvent {
    Started {
        collection: String,
        total: u64,
    },
    Progress {
        processed: u64,
        total: u64,
        percentage: u8,
    },
    Finished {
        ok: bool,
        message: String,
    },
}

impl Event for RefreshEvent {
    fn event_type(&self) -> &'static str {
        match self {
            RefreshEvent::Started { .. } => "refresh.started",
            RefreshEvent::Progress { .. } => "refresh.progress",
            RefreshEvent::Finished { .. } => "refresh.finished",
        }
    }
}
