use crate::clipboard::{ClipboardText, SystemClipboard};
use crate::config::{Config, Shortcuts, Theme};
use crate::snapshot::{self, ProcessEntry, SlotKey, SlotValue, StatusSnapshot};
use std::time::{Duration, Instant};

/// How long a row shows copy feedback before reverting to neutral.
pub const COPY_FEEDBACK_TTL: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyMode {
    /// Full rebuild: clears the subprocess rows, rewrites every slot with
    /// no diffing. Used on first paint and explicit re-sync.
    Reset,
    /// Selective updates preserving unaffected state.
    Incremental,
}

/// Transient per-row interaction state. Not part of any snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyFeedback {
    Neutral,
    Copied,
    CopyFailed,
}

/// One bound display slot: a semantic key and the text currently shown for
/// it. Created once at view initialization; only the text mutates.
#[derive(Debug, Clone)]
pub struct DisplaySlot {
    pub key: SlotKey,
    pub text: String,
    /// Bumped on every actual text write, so redundant writes are visible.
    pub revision: u64,
}

/// One rendered subprocess row. Rows are appended, never recreated; the
/// copy payload is captured at append time.
#[derive(Debug, Clone)]
pub struct ProcessRow {
    pub exe: String,
    pub pid: u32,
    pub active: bool,
    pub feedback: CopyFeedback,
    payload: Option<serde_json::Value>,
}

impl ProcessRow {
    fn new(entry: &ProcessEntry, payload: Option<serde_json::Value>) -> Self {
        Self {
            exe: entry.exe.clone(),
            pid: entry.pid,
            active: entry.active,
            feedback: CopyFeedback::Neutral,
            payload,
        }
    }

    pub fn copy_armed(&self) -> bool {
        self.payload.is_some()
    }
}

/// View-side state: the live element tree the reconciler mutates and the
/// renderer draws.
pub struct App {
    pub should_quit: bool,
    pub hidden: bool,
    pub show_help: bool,

    // Status message (shows temporarily)
    pub status_message: Option<String>,
    pub status_is_error: bool,

    pub slots: Vec<DisplaySlot>,
    pub rows: Vec<ProcessRow>,

    pub process_list_state: ratatui::widgets::ListState,

    pub shortcuts: Shortcuts,
    pub theme: Theme,

    clipboard: Box<dyn ClipboardText>,
    clear_deadlines: Vec<(usize, Instant)>,
}

impl App {
    pub fn new(config: &Config) -> Self {
        Self::with_clipboard(config, Box::new(SystemClipboard::new()))
    }

    pub fn with_clipboard(config: &Config, clipboard: Box<dyn ClipboardText>) -> Self {
        let slots = SlotKey::ALL
            .iter()
            .map(|key| DisplaySlot {
                key: *key,
                text: String::new(),
                revision: 0,
            })
            .collect();

        Self {
            should_quit: false,
            hidden: config.startmin,
            show_help: false,
            status_message: None,
            status_is_error: false,
            slots,
            rows: Vec::new(),
            process_list_state: ratatui::widgets::ListState::default(),
            shortcuts: config.shortcuts.clone(),
            theme: config.theme.clone(),
            clipboard,
            clear_deadlines: Vec::new(),
        }
    }

    /// Apply one snapshot to the view. Never fails: a copy failure is
    /// routed into per-row feedback, everything else is infallible.
    pub fn apply_snapshot(&mut self, snapshot: &StatusSnapshot, mode: ApplyMode) {
        match mode {
            ApplyMode::Reset => {
                // Discard rows and their transient state, then rewrite every
                // slot to exactly this snapshot's value.
                self.rows.clear();
                self.clear_deadlines.clear();
                self.process_list_state.select(None);
                for slot in &mut self.slots {
                    slot.text = snapshot::resolve_reset(slot.key, snapshot);
                    slot.revision += 1;
                }
            }
            ApplyMode::Incremental => {
                for slot in &mut self.slots {
                    match snapshot::resolve(slot.key, snapshot) {
                        SlotValue::Show(value) => {
                            if value != slot.text {
                                slot.text = value;
                                slot.revision += 1;
                            }
                        }
                        SlotValue::Blank | SlotValue::Absent => {}
                    }
                }
            }
        }

        let Some(processes) = &snapshot.processes else {
            return;
        };

        // Positional reconciliation: update exe/activity in place, append
        // missing rows. Rows for subprocesses that disappear from later
        // snapshots are deliberately left behind; only Reset empties the
        // list. The backend is the sole producer, so indices stay stable
        // for the process lifetime.
        for (i, entry) in processes.iter().enumerate() {
            match self.rows.get_mut(i) {
                Some(row) => {
                    row.exe = entry.exe.clone();
                    row.active = entry.active;
                }
                None => {
                    self.rows.push(ProcessRow::new(entry, snapshot.vdf_entry.clone()));
                }
            }
        }

        if self.process_list_state.selected().is_none() && !self.rows.is_empty() {
            self.process_list_state.select(Some(0));
        }
    }

    /// Copy the selected row's launch payload to the clipboard.
    pub fn copy_selected(&mut self, now: Instant) {
        if let Some(i) = self.process_list_state.selected() {
            self.copy_row(i, now);
        }
    }

    /// Copy one row's payload. Rows without a payload ignore the action.
    /// Feedback reverts to neutral after [`COPY_FEEDBACK_TTL`]; a second
    /// copy before expiry schedules another clear, and the earliest
    /// deadline wins (clearing is idempotent).
    pub fn copy_row(&mut self, index: usize, now: Instant) {
        let Some(row) = self.rows.get_mut(index) else {
            return;
        };
        let Some(payload) = &row.payload else {
            return;
        };

        let outcome = serde_json::to_string_pretty(payload)
            .map_err(anyhow::Error::from)
            .and_then(|text| self.clipboard.set_text(text));

        row.feedback = match outcome {
            Ok(()) => CopyFeedback::Copied,
            Err(err) => {
                tracing::warn!(%err, pid = row.pid, "clipboard copy failed");
                CopyFeedback::CopyFailed
            }
        };

        self.clear_deadlines.push((index, now + COPY_FEEDBACK_TTL));
    }

    /// Advance the transient-state machine: rows whose clear deadline has
    /// passed revert to neutral.
    pub fn tick(&mut self, now: Instant) {
        let mut expired = Vec::new();
        self.clear_deadlines.retain(|(index, deadline)| {
            if *deadline <= now {
                expired.push(*index);
                false
            } else {
                true
            }
        });

        for index in expired {
            if let Some(row) = self.rows.get_mut(index) {
                row.feedback = CopyFeedback::Neutral;
            }
        }
    }

    /// Look up a slot by key. Every key in [`SlotKey::ALL`] has a slot;
    /// a miss is a programmer error.
    pub fn slot(&self, key: SlotKey) -> &DisplaySlot {
        self.slots
            .iter()
            .find(|slot| slot.key == key)
            .expect("a display slot exists for every slot key")
    }

    pub fn list_next(&mut self) {
        let len = self.rows.len();
        if len > 0 {
            let i = self.process_list_state.selected().unwrap_or(0);
            self.process_list_state.select(Some((i + 1) % len));
        }
    }

    pub fn list_prev(&mut self) {
        let len = self.rows.len();
        if len > 0 {
            let i = self.process_list_state.selected().unwrap_or(0);
            self.process_list_state
                .select(Some(if i == 0 { len - 1 } else { i - 1 }));
        }
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn set_status(&mut self, message: &str) {
        self.status_message = Some(message.to_string());
        self.status_is_error = false;
    }

    pub fn set_error(&mut self, message: &str) {
        self.status_message = Some(message.to_string());
        self.status_is_error = true;
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }
}
