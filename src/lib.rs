//! steamwatch library - TUI status monitor for a Steam achievement watcher worker

pub mod app;
pub mod bus;
pub mod clipboard;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod events;
pub mod messages;
pub mod snapshot;
pub mod steam;
pub mod ui;
pub mod window;
pub mod worker;

// Re-export commonly used types
pub use app::{App, ApplyMode, CopyFeedback};
pub use bus::{ControlEvent, EventBus};
pub use config::Config;
pub use coordinator::{BootOptions, Coordinator, Phase};
pub use error::StartupError;
pub use snapshot::{ProcessEntry, SlotKey, StatusSnapshot};
