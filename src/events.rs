use log::debug;
use serde::Serialize;
use tokio::sync::broadcast;

use crate::{models::CapturedRecord, timer::TimerSnapshot};

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AppEvent {
    TimerChanged { snapshot: TimerSnapshot },
    TimerExpired,
    CaptureStarted { id: u32 },
    CaptureSucceeded { record: CapturedRecord },
    CaptureFailed { message: String },
    GalleryToggled { open: bool },
}

impl AppEvent {
    pub fn name(&self) -> &'static str {
        match self {
            AppEvent::TimerChanged { .. } => "timer-changed",
            AppEvent::TimerExpired => "timer-expired",
            AppEvent::CaptureStarted { .. } => "capture-started",
            AppEvent::CaptureSucceeded { .. } => "capture-succeeded",
            AppEvent::CaptureFailed { .. } => "capture-failed",
            AppEvent::GalleryToggled { .. } => "gallery-toggled",
        }
    }
}

/// Fan-out of state changes to whoever renders them.
///
/// Emitting never fails: with no subscriber the event is simply dropped.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<AppEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }

    pub fn emit(&self, event: AppEvent) {
        debug!("emit {}", event.name());
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
