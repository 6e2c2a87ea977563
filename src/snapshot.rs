//! Status snapshots sent from the backend to the view

use serde::{Deserialize, Serialize};

/// One monitored subprocess as reported by the worker.
///
/// Identity is positional: the Nth entry always maps to the Nth rendered row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessEntry {
    pub exe: String,
    pub pid: u32,
    pub active: bool,
}

/// Complete status payload emitted by the worker on every tick or state
/// change. All fields except `processes` and `vdf_entry` map to exactly one
/// display slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusSnapshot {
    pub username: Option<String>,
    pub steam3id: Option<String>,
    pub steam64id: Option<String>,
    pub appid: Option<u32>,
    pub status: Option<String>,
    pub gamename: Option<String>,
    pub pollrate: Option<u64>,
    pub releasedelay: Option<u64>,
    pub maxretries: Option<u32>,
    #[serde(rename = "userust")]
    pub use_rust_worker: bool,
    pub processes: Option<Vec<ProcessEntry>>,
    #[serde(rename = "vdfentry")]
    pub vdf_entry: Option<serde_json::Value>,
}

pub const STATUS_DEFAULT: &str = "Released";
pub const POLLRATE_DEFAULT: u64 = 250;
pub const RELEASEDELAY_DEFAULT: u64 = 0;

pub const WORKER_KIND_RUST: &str = "Rust";
pub const WORKER_KIND_NODE: &str = "Node";

/// The fixed set of scalar display slots. Known at compile time; each slot
/// resolves from exactly one snapshot field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SlotKey {
    Username,
    Steam3Id,
    Steam64Id,
    AppId,
    Status,
    GameName,
    PollRate,
    ReleaseDelay,
    MaxRetries,
    WorkerKind,
}

impl SlotKey {
    pub const ALL: [SlotKey; 10] = [
        SlotKey::Username,
        SlotKey::Steam3Id,
        SlotKey::Steam64Id,
        SlotKey::AppId,
        SlotKey::Status,
        SlotKey::GameName,
        SlotKey::PollRate,
        SlotKey::ReleaseDelay,
        SlotKey::MaxRetries,
        SlotKey::WorkerKind,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SlotKey::Username => "Username",
            SlotKey::Steam3Id => "Steam3 ID",
            SlotKey::Steam64Id => "Steam64 ID",
            SlotKey::AppId => "App ID",
            SlotKey::Status => "Status",
            SlotKey::GameName => "Game",
            SlotKey::PollRate => "Poll rate",
            SlotKey::ReleaseDelay => "Release delay",
            SlotKey::MaxRetries => "Max retries",
            SlotKey::WorkerKind => "Worker",
        }
    }
}

/// Outcome of resolving one slot against a snapshot.
///
/// `Blank` and `Absent` both mean "leave whatever is currently displayed":
/// a transient empty update never blanks a label. They are kept distinct so
/// the precedence rules stay auditable. A numeric zero is a real value and
/// resolves to `Show("0")`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotValue {
    /// Present and nonempty (or defaulted): display this text.
    Show(String),
    /// Present but empty: preserve the prior display.
    Blank,
    /// Not in the snapshot: preserve the prior display.
    Absent,
}

impl SlotValue {
    fn from_opt_str(value: &Option<String>) -> SlotValue {
        match value {
            Some(s) if !s.is_empty() => SlotValue::Show(s.clone()),
            Some(_) => SlotValue::Blank,
            None => SlotValue::Absent,
        }
    }
}

/// Resolve a slot's display value for incremental application.
///
/// `status`, `pollrate` and `releasedelay` carry defaults and therefore
/// always resolve to `Show`. A zero poll rate is treated as unset, matching
/// the worker's contract. `appid` and `maxretries` have no default: when the
/// snapshot omits them the previously displayed value stays.
pub fn resolve(key: SlotKey, snapshot: &StatusSnapshot) -> SlotValue {
    match key {
        SlotKey::Username => SlotValue::from_opt_str(&snapshot.username),
        SlotKey::Steam3Id => SlotValue::from_opt_str(&snapshot.steam3id),
        SlotKey::Steam64Id => SlotValue::from_opt_str(&snapshot.steam64id),
        SlotKey::GameName => SlotValue::from_opt_str(&snapshot.gamename),
        SlotKey::AppId => match snapshot.appid {
            Some(appid) => SlotValue::Show(appid.to_string()),
            None => SlotValue::Absent,
        },
        SlotKey::MaxRetries => match snapshot.maxretries {
            Some(n) => SlotValue::Show(n.to_string()),
            None => SlotValue::Absent,
        },
        SlotKey::Status => {
            let status = snapshot
                .status
                .as_deref()
                .filter(|s| !s.is_empty())
                .unwrap_or(STATUS_DEFAULT);
            SlotValue::Show(status.to_string())
        }
        SlotKey::PollRate => {
            let rate = snapshot.pollrate.filter(|r| *r != 0).unwrap_or(POLLRATE_DEFAULT);
            SlotValue::Show(rate.to_string())
        }
        SlotKey::ReleaseDelay => {
            let delay = snapshot.releasedelay.unwrap_or(RELEASEDELAY_DEFAULT);
            SlotValue::Show(delay.to_string())
        }
        SlotKey::WorkerKind => {
            let kind = if snapshot.use_rust_worker {
                WORKER_KIND_RUST
            } else {
                WORKER_KIND_NODE
            };
            SlotValue::Show(kind.to_string())
        }
    }
}

/// Resolve a slot for a full rewrite (Reset mode): skipped slots become
/// empty strings so every slot reflects exactly this snapshot.
pub fn resolve_reset(key: SlotKey, snapshot: &StatusSnapshot) -> String {
    match resolve(key, snapshot) {
        SlotValue::Show(value) => value,
        SlotValue::Blank | SlotValue::Absent => String::new(),
    }
}
