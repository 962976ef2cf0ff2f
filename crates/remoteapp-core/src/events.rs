//! Events emitted by view adapters to the surrounding shell
//!
//! Event names are part of the contract with shells: `startApplication`,
//! `error`, `entryClicked`.

use crate::StartingError;
use tokio::sync::mpsc;

/// Event emitted by a view adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// A start was initiated for an application
    StartApplication { name: String, mapping_id: String },
    /// An error to show in the host-level error surface
    Error(StartingError),
    /// An application was picked in the list
    EntryClicked { index: usize },
}

impl AppEvent {
    /// Contract name of the event
    pub fn name(&self) -> &'static str {
        match self {
            Self::StartApplication { .. } => "startApplication",
            Self::Error(_) => "error",
            Self::EntryClicked { .. } => "entryClicked",
        }
    }
}

pub type EventSender = mpsc::UnboundedSender<AppEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<AppEvent>;

/// Create the channel connecting view adapters to the shell
pub fn event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

/// Send an event if anyone is listening
pub(crate) fn emit(events: Option<&EventSender>, event: AppEvent) {
    if let Some(tx) = events {
        tracing::trace!("emit {}", event.name());
        let _ = tx.send(event);
    }
}
