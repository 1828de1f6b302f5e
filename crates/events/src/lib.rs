#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Event system for async communication in keg
//!
//! All user-visible progress goes through events - no direct logging or
//! printing is allowed outside the CLI. Events are grouped by functional
//! domain (Download, Install, Test) and flow over an unbounded channel
//! drained concurrently with the operation that emits them.

pub mod download;
pub mod general;
pub mod install;
pub mod smoke;

pub use download::DownloadEvent;
pub use general::GeneralEvent;
pub use install::InstallEvent;
pub use smoke::TestEvent;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

/// Top-level event wrapper grouping events by domain
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event")]
pub enum AppEvent {
    Download(DownloadEvent),
    Install(InstallEvent),
    Test(TestEvent),
    General(GeneralEvent),
}

impl From<DownloadEvent> for AppEvent {
    fn from(event: DownloadEvent) -> Self {
        Self::Download(event)
    }
}

impl From<InstallEvent> for AppEvent {
    fn from(event: InstallEvent) -> Self {
        Self::Install(event)
    }
}

impl From<TestEvent> for AppEvent {
    fn from(event: TestEvent) -> Self {
        Self::Test(event)
    }
}

impl From<GeneralEvent> for AppEvent {
    fn from(event: GeneralEvent) -> Self {
        Self::General(event)
    }
}

/// Type alias for event sender
pub type EventSender = UnboundedSender<AppEvent>;

/// Type alias for event receiver
pub type EventReceiver = tokio::sync::mpsc::UnboundedReceiver<AppEvent>;

/// Create a new event channel
#[must_use]
pub fn channel() -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

/// The unified trait for emitting events throughout keg
///
/// Provides a single API for emitting events regardless of whether the
/// caller holds a raw `EventSender` or a struct that contains one.
pub trait EventEmitter {
    /// Get the event sender for this emitter
    fn event_sender(&self) -> Option<&EventSender>;

    /// Emit an event through this emitter
    fn emit(&self, event: impl Into<AppEvent>) {
        if let Some(sender) = self.event_sender() {
            // Ignore send errors - if the receiver is dropped, we just continue
            let _ = sender.send(event.into());
        }
    }
}

impl EventEmitter for Option<EventSender> {
    fn event_sender(&self) -> Option<&EventSender> {
        self.as_ref()
    }
}

impl EventEmitter for Option<&EventSender> {
    fn event_sender(&self) -> Option<&EventSender> {
        *self
    }
}

impl EventEmitter for EventSender {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_channel_round_trip() {
        let (tx, mut rx) = channel();
        tx.emit(GeneralEvent::Message {
            text: "hello".to_string(),
        });

        match rx.recv().await {
            Some(AppEvent::General(GeneralEvent::Message { text })) => {
                assert_eq!(text, "hello");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_emit_with_dropped_receiver() {
        let (tx, rx) = channel();
        drop(rx);
        // Must not panic
        tx.emit(GeneralEvent::Message {
            text: "ignored".to_string(),
        });
    }

    #[test]
    fn test_event_serialization() {
        let event = AppEvent::Download(DownloadEvent::Started {
            url: "https://example.com/a.tar.gz".to_string(),
            formula: Some("ai-bot".to_string()),
            total_bytes: Some(1024),
        });
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"domain\":\"Download\""));
        let back: AppEvent = serde_json::from_str(&json).unwrap();
        assert!(matches!(back, AppEvent::Download(DownloadEvent::Started { .. })));
    }
}
