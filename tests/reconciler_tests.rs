//! Tests for snapshot reconciliation and the transient copy interaction

use anyhow::Result;
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use steamwatch::app::{App, ApplyMode, CopyFeedback, COPY_FEEDBACK_TTL};
use steamwatch::clipboard::ClipboardText;
use steamwatch::config::Config;
use steamwatch::snapshot::{ProcessEntry, SlotKey, StatusSnapshot};

/// Clipboard fake that records every write.
#[derive(Clone, Default)]
struct RecordingClipboard {
    texts: Arc<Mutex<Vec<String>>>,
}

impl ClipboardText for RecordingClipboard {
    fn set_text(&mut self, text: String) -> Result<()> {
        self.texts.lock().unwrap().push(text);
        Ok(())
    }
}

/// Clipboard fake that always fails.
struct FailingClipboard;

impl ClipboardText for FailingClipboard {
    fn set_text(&mut self, _text: String) -> Result<()> {
        anyhow::bail!("clipboard unavailable")
    }
}

fn new_app() -> App {
    App::with_clipboard(&Config::default(), Box::new(RecordingClipboard::default()))
}

fn new_app_with(clipboard: RecordingClipboard) -> App {
    App::with_clipboard(&Config::default(), Box::new(clipboard))
}

fn entry(exe: &str, pid: u32, active: bool) -> ProcessEntry {
    ProcessEntry {
        exe: exe.to_string(),
        pid,
        active,
    }
}

#[cfg(test)]
mod reset_mode {
    use super::*;

    #[test]
    fn builds_one_row_per_entry_by_position() {
        let mut app = new_app();
        let snapshot = StatusSnapshot {
            processes: Some(vec![
                entry("game.exe", 100, true),
                entry("launcher.exe", 101, false),
                entry("overlay.exe", 102, true),
            ]),
            ..Default::default()
        };

        app.apply_snapshot(&snapshot, ApplyMode::Reset);

        assert_eq!(app.rows.len(), 3, "one row per process entry");
        assert_eq!(app.rows[0].exe, "game.exe");
        assert_eq!(app.rows[0].pid, 100);
        assert!(app.rows[0].active);
        assert_eq!(app.rows[1].exe, "launcher.exe");
        assert!(!app.rows[1].active);
        assert_eq!(app.rows[2].pid, 102);
    }

    #[test]
    fn spec_example_tf2() {
        let mut app = new_app();
        let snapshot = StatusSnapshot {
            appid: Some(440),
            status: Some("Released".to_string()),
            processes: Some(vec![entry("tf2.exe", 1234, true)]),
            ..Default::default()
        };

        app.apply_snapshot(&snapshot, ApplyMode::Reset);

        assert_eq!(app.rows.len(), 1);
        assert_eq!(app.rows[0].exe, "tf2.exe");
        assert_eq!(app.rows[0].pid, 1234);
        assert!(app.rows[0].active, "running process shows the active dot");
        assert_eq!(app.slot(SlotKey::AppId).text, "440");
        assert_eq!(app.slot(SlotKey::Status).text, "Released");
    }

    #[test]
    fn discards_previous_rows() {
        let mut app = new_app();
        let first = StatusSnapshot {
            processes: Some(vec![entry("a.exe", 1, true), entry("b.exe", 2, true)]),
            ..Default::default()
        };
        app.apply_snapshot(&first, ApplyMode::Incremental);
        assert_eq!(app.rows.len(), 2);

        let second = StatusSnapshot {
            processes: Some(vec![entry("c.exe", 3, false)]),
            ..Default::default()
        };
        app.apply_snapshot(&second, ApplyMode::Reset);

        assert_eq!(app.rows.len(), 1, "reset rebuilds the list from scratch");
        assert_eq!(app.rows[0].exe, "c.exe");
    }

    #[test]
    fn rewrites_every_slot_without_diffing() {
        let mut app = new_app();
        let first = StatusSnapshot {
            username: Some("alice".to_string()),
            appid: Some(440),
            ..Default::default()
        };
        app.apply_snapshot(&first, ApplyMode::Incremental);
        assert_eq!(app.slot(SlotKey::Username).text, "alice");

        // A reset with no username blanks the slot instead of preserving it.
        let second = StatusSnapshot {
            appid: Some(570),
            ..Default::default()
        };
        app.apply_snapshot(&second, ApplyMode::Reset);

        assert_eq!(app.slot(SlotKey::Username).text, "");
        assert_eq!(app.slot(SlotKey::AppId).text, "570");
        assert_eq!(app.slot(SlotKey::Status).text, "Released");
    }
}

#[cfg(test)]
mod incremental_mode {
    use super::*;

    #[test]
    fn equal_value_is_not_rewritten() {
        let mut app = new_app();
        let snapshot = StatusSnapshot {
            gamename: Some("Team Fortress 2".to_string()),
            ..Default::default()
        };

        app.apply_snapshot(&snapshot, ApplyMode::Incremental);
        let revision = app.slot(SlotKey::GameName).revision;

        app.apply_snapshot(&snapshot, ApplyMode::Incremental);

        assert_eq!(app.slot(SlotKey::GameName).text, "Team Fortress 2");
        assert_eq!(
            app.slot(SlotKey::GameName).revision,
            revision,
            "string-equal value must not touch the display node"
        );
    }

    #[test]
    fn changed_value_is_rewritten() {
        let mut app = new_app();
        app.apply_snapshot(
            &StatusSnapshot {
                gamename: Some("Team Fortress 2".to_string()),
                ..Default::default()
            },
            ApplyMode::Incremental,
        );
        let revision = app.slot(SlotKey::GameName).revision;

        app.apply_snapshot(
            &StatusSnapshot {
                gamename: Some("Dota 2".to_string()),
                ..Default::default()
            },
            ApplyMode::Incremental,
        );

        assert_eq!(app.slot(SlotKey::GameName).text, "Dota 2");
        assert_eq!(app.slot(SlotKey::GameName).revision, revision + 1);
    }

    #[test]
    fn absent_appid_never_overwrites() {
        let mut app = new_app();
        app.apply_snapshot(
            &StatusSnapshot {
                appid: Some(440),
                ..Default::default()
            },
            ApplyMode::Incremental,
        );

        app.apply_snapshot(&StatusSnapshot::default(), ApplyMode::Incremental);

        assert_eq!(
            app.slot(SlotKey::AppId).text,
            "440",
            "unset appid must preserve the previous display"
        );
    }

    #[test]
    fn blank_or_missing_string_preserves_previous_value() {
        let mut app = new_app();
        app.apply_snapshot(
            &StatusSnapshot {
                username: Some("alice".to_string()),
                ..Default::default()
            },
            ApplyMode::Incremental,
        );

        // Blank string in a later update
        app.apply_snapshot(
            &StatusSnapshot {
                username: Some(String::new()),
                ..Default::default()
            },
            ApplyMode::Incremental,
        );
        assert_eq!(app.slot(SlotKey::Username).text, "alice");

        // Missing entirely
        app.apply_snapshot(&StatusSnapshot::default(), ApplyMode::Incremental);
        assert_eq!(app.slot(SlotKey::Username).text, "alice");
    }

    #[test]
    fn worker_kind_has_exactly_two_labels() {
        let mut app = new_app();

        app.apply_snapshot(
            &StatusSnapshot {
                use_rust_worker: true,
                ..Default::default()
            },
            ApplyMode::Incremental,
        );
        assert_eq!(app.slot(SlotKey::WorkerKind).text, "Rust");

        app.apply_snapshot(
            &StatusSnapshot {
                use_rust_worker: false,
                ..Default::default()
            },
            ApplyMode::Incremental,
        );
        assert_eq!(app.slot(SlotKey::WorkerKind).text, "Node");
    }

    #[test]
    fn defaults_apply_when_fields_are_absent() {
        let mut app = new_app();
        app.apply_snapshot(&StatusSnapshot::default(), ApplyMode::Incremental);

        assert_eq!(app.slot(SlotKey::Status).text, "Released");
        assert_eq!(app.slot(SlotKey::PollRate).text, "250");
        assert_eq!(app.slot(SlotKey::ReleaseDelay).text, "0");
    }

    #[test]
    fn zero_pollrate_falls_back_to_default() {
        let mut app = new_app();
        app.apply_snapshot(
            &StatusSnapshot {
                pollrate: Some(0),
                ..Default::default()
            },
            ApplyMode::Incremental,
        );

        assert_eq!(app.slot(SlotKey::PollRate).text, "250");
    }

    #[test]
    fn numeric_zero_is_a_real_value() {
        let mut app = new_app();
        app.apply_snapshot(
            &StatusSnapshot {
                maxretries: Some(3),
                releasedelay: Some(10),
                ..Default::default()
            },
            ApplyMode::Incremental,
        );

        app.apply_snapshot(
            &StatusSnapshot {
                maxretries: Some(0),
                releasedelay: Some(0),
                ..Default::default()
            },
            ApplyMode::Incremental,
        );

        assert_eq!(app.slot(SlotKey::MaxRetries).text, "0");
        assert_eq!(app.slot(SlotKey::ReleaseDelay).text, "0");
    }

    #[test]
    fn rows_only_grow_and_keep_their_order() {
        let mut app = new_app();
        app.apply_snapshot(
            &StatusSnapshot {
                processes: Some(vec![entry("a.exe", 1, true)]),
                ..Default::default()
            },
            ApplyMode::Incremental,
        );

        app.apply_snapshot(
            &StatusSnapshot {
                processes: Some(vec![
                    entry("a.exe", 1, true),
                    entry("b.exe", 2, true),
                    entry("c.exe", 3, false),
                ]),
                ..Default::default()
            },
            ApplyMode::Incremental,
        );
        assert_eq!(app.rows.len(), 3);

        // A shorter sequence later never deletes or reorders rendered rows.
        app.apply_snapshot(
            &StatusSnapshot {
                processes: Some(vec![entry("a.exe", 1, false), entry("b.exe", 2, true)]),
                ..Default::default()
            },
            ApplyMode::Incremental,
        );

        assert_eq!(app.rows.len(), 3, "row count only increases until a reset");
        assert_eq!(app.rows[0].exe, "a.exe");
        assert!(!app.rows[0].active, "existing rows update in place");
        assert_eq!(app.rows[2].exe, "c.exe", "stale row is left behind");
    }

    #[test]
    fn existing_row_pid_is_not_rewritten() {
        let mut app = new_app();
        app.apply_snapshot(
            &StatusSnapshot {
                processes: Some(vec![entry("a.exe", 1, true)]),
                ..Default::default()
            },
            ApplyMode::Incremental,
        );

        // Only the executable name and the activity icon update in place.
        app.apply_snapshot(
            &StatusSnapshot {
                processes: Some(vec![entry("renamed.exe", 99, false)]),
                ..Default::default()
            },
            ApplyMode::Incremental,
        );

        assert_eq!(app.rows[0].exe, "renamed.exe");
        assert!(!app.rows[0].active);
        assert_eq!(app.rows[0].pid, 1, "pid is fixed at row creation");
    }
}

#[cfg(test)]
mod copy_feedback {
    use super::*;

    fn snapshot_with_payload() -> StatusSnapshot {
        StatusSnapshot {
            processes: Some(vec![entry("game.exe", 42, true)]),
            vdf_entry: Some(json!({
                "appid": 440,
                "launch": {"0": {"executable": "hl2.exe"}}
            })),
            ..Default::default()
        }
    }

    #[test]
    fn successful_copy_writes_pretty_payload() -> Result<()> {
        let clipboard = RecordingClipboard::default();
        let mut app = new_app_with(clipboard.clone());
        app.apply_snapshot(&snapshot_with_payload(), ApplyMode::Reset);

        app.copy_row(0, Instant::now());

        let texts = clipboard.texts.lock().unwrap();
        assert_eq!(texts.len(), 1);
        let expected = serde_json::to_string_pretty(&json!({
            "appid": 440,
            "launch": {"0": {"executable": "hl2.exe"}}
        }))?;
        assert_eq!(texts[0], expected, "payload is serialized in stable indented form");
        Ok(())
    }

    #[test]
    fn copied_state_clears_after_ttl() {
        let mut app = new_app();
        app.apply_snapshot(&snapshot_with_payload(), ApplyMode::Reset);

        let t0 = Instant::now();
        app.copy_row(0, t0);
        assert_eq!(app.rows[0].feedback, CopyFeedback::Copied);

        app.tick(t0 + COPY_FEEDBACK_TTL - Duration::from_millis(1));
        assert_eq!(
            app.rows[0].feedback,
            CopyFeedback::Copied,
            "feedback persists until the deadline"
        );

        app.tick(t0 + COPY_FEEDBACK_TTL);
        assert_eq!(app.rows[0].feedback, CopyFeedback::Neutral);
    }

    #[test]
    fn failed_copy_sets_failed_then_clears() {
        let mut app = App::with_clipboard(&Config::default(), Box::new(FailingClipboard));
        app.apply_snapshot(&snapshot_with_payload(), ApplyMode::Reset);

        let t0 = Instant::now();
        app.copy_row(0, t0);
        assert_eq!(app.rows[0].feedback, CopyFeedback::CopyFailed);

        app.tick(t0 + COPY_FEEDBACK_TTL);
        assert_eq!(app.rows[0].feedback, CopyFeedback::Neutral);
    }

    #[test]
    fn rows_without_payload_ignore_the_copy_action() {
        let clipboard = RecordingClipboard::default();
        let mut app = new_app_with(clipboard.clone());
        let snapshot = StatusSnapshot {
            processes: Some(vec![entry("game.exe", 42, true)]),
            ..Default::default()
        };
        app.apply_snapshot(&snapshot, ApplyMode::Reset);
        assert!(!app.rows[0].copy_armed());

        app.copy_row(0, Instant::now());

        assert_eq!(app.rows[0].feedback, CopyFeedback::Neutral);
        assert!(clipboard.texts.lock().unwrap().is_empty());
    }

    #[test]
    fn overlapping_copies_clear_at_the_earliest_deadline() {
        let mut app = new_app();
        app.apply_snapshot(&snapshot_with_payload(), ApplyMode::Reset);

        let t0 = Instant::now();
        app.copy_row(0, t0);
        app.copy_row(0, t0 + Duration::from_millis(300));

        // The first deadline fires and clears the flags; clearing is
        // idempotent so the later deadline is harmless.
        app.tick(t0 + COPY_FEEDBACK_TTL);
        assert_eq!(app.rows[0].feedback, CopyFeedback::Neutral);

        app.tick(t0 + Duration::from_millis(300) + COPY_FEEDBACK_TTL);
        assert_eq!(app.rows[0].feedback, CopyFeedback::Neutral);
    }

    #[test]
    fn reset_discards_transient_state() {
        let mut app = new_app();
        app.apply_snapshot(&snapshot_with_payload(), ApplyMode::Reset);

        let t0 = Instant::now();
        app.copy_row(0, t0);
        assert_eq!(app.rows[0].feedback, CopyFeedback::Copied);

        app.apply_snapshot(&snapshot_with_payload(), ApplyMode::Reset);
        assert_eq!(
            app.rows[0].feedback,
            CopyFeedback::Neutral,
            "rebuilt rows start neutral"
        );

        // The pre-reset deadline must not act on the rebuilt row.
        app.copy_row(0, t0 + Duration::from_millis(100));
        app.tick(t0 + COPY_FEEDBACK_TTL - Duration::from_millis(1));
        assert_eq!(app.rows[0].feedback, CopyFeedback::Copied);
    }
}
