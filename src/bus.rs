//! Typed process-wide event bus
//!
//! Control signals fan out from the coordinator to decoupled collaborators
//! (worker supervisor, shortcut manager, auxiliary window managers) over a
//! tokio broadcast channel. The event set is closed: every event name and
//! payload is a variant of [`ControlEvent`], resolved at compile time.

use crate::config::Shortcuts;
use tokio::sync::broadcast;

/// Slow subscribers past this capacity miss events (lag) instead of
/// blocking the emitter.
const DEFAULT_CAPACITY: usize = 64;

/// The closed set of control signals broadcast within the backend process.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlEvent {
    /// Validate the worker environment and (re)start the worker.
    ValidateWorker,
    /// Show or hide the auxiliary extras window.
    ExtWin(bool),
    /// Show or hide the auxiliary statistics window.
    StatWin(bool),
    /// Apply the configured keyboard shortcut bindings.
    ApplyShortcuts(Shortcuts),
    /// An update has been downloaded; the next close request quits.
    UpdatePending,
    /// Shutdown signal for dependents before the process exits for an update.
    QuitForUpdate,
}

/// Broadcast bus for [`ControlEvent`]s.
///
/// Events reach every live subscriber in emit order; late subscribers miss
/// earlier events.
pub struct EventBus {
    sender: broadcast::Sender<ControlEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Emit an event to all subscribers. Returns how many received it;
    /// with no subscribers the event is dropped and 0 is returned.
    pub fn emit(&self, event: ControlEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Subscribe to all future events on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<ControlEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
