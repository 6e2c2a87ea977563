//! Clipboard seam

use anyhow::{Context, Result};
use arboard::Clipboard;

/// Writable text clipboard. Success or failure is the only observable
/// outcome; there is no read-back verification.
pub trait ClipboardText: Send {
    fn set_text(&mut self, text: String) -> Result<()>;
}

/// System clipboard backed by arboard. Construction failure (e.g. no
/// display server) is deferred: every write then fails, which the caller
/// surfaces as transient per-row feedback.
pub struct SystemClipboard {
    inner: Option<Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self {
            inner: Clipboard::new().ok(),
        }
    }
}

impl Default for SystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipboardText for SystemClipboard {
    fn set_text(&mut self, text: String) -> Result<()> {
        self.inner
            .as_mut()
            .context("system clipboard unavailable")?
            .set_text(text)
            .context("clipboard write failed")
    }
}
