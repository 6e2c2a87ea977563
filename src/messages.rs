//! Messages crossing the backend/view channel
//!
//! The two sides run in separate execution contexts joined by asynchronous,
//! ordered mpsc channels: one topic type per direction. Delivery is
//! at-most-once in send order; there is no acknowledgment or backpressure.

use crate::config::Config;
use crate::snapshot::StatusSnapshot;
use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot};

/// Backend to view.
#[derive(Debug)]
pub enum ViewEvent {
    /// Drive reconciliation. `reset` forces a full rebuild of the view.
    StatusUpdated {
        snapshot: StatusSnapshot,
        reset: bool,
    },
    /// Uncaught process errors, forwarded unconditionally for display.
    Error(String),
    /// Re-show a window previously hidden by the close intercept.
    Show,
    /// Hide the window to the background.
    Hide,
    /// The window was destroyed; the view loop should terminate.
    Close,
}

/// View to backend.
#[derive(Debug)]
pub enum BackendEvent {
    /// The view tree is attached; safe to begin sending snapshots.
    ViewReady,
    /// Replace the stored configuration wholesale (last write wins).
    ConfigUpdated(Config),
    /// The user asked to dismiss the window.
    CloseRequested,
    /// The user asked to bring a hidden window back.
    ShowRequested,
    Query(Query),
}

/// Request/reply queries answered synchronously by the coordinator.
#[derive(Debug)]
pub enum Query {
    Version(oneshot::Sender<String>),
    Beta(oneshot::Sender<bool>),
    LaunchedAt(oneshot::Sender<DateTime<Utc>>),
}

pub type ViewSender = mpsc::UnboundedSender<ViewEvent>;
pub type ViewReceiver = mpsc::UnboundedReceiver<ViewEvent>;
pub type BackendSender = mpsc::UnboundedSender<BackendEvent>;
pub type BackendReceiver = mpsc::UnboundedReceiver<BackendEvent>;

pub fn view_channel() -> (ViewSender, ViewReceiver) {
    mpsc::unbounded_channel()
}

pub fn backend_channel() -> (BackendSender, BackendReceiver) {
    mpsc::unbounded_channel()
}
