//! Steam installation discovery and app metadata helpers

use crate::error::StartupError;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Environment override for the Steam installation root.
pub const STEAM_ROOT_ENV: &str = "STEAM_ROOT";

const APPCACHE_DIR: &str = "appcache";
const APPINFO_FILE: &str = "appinfo.vdf";

/// Locate the Steam installation root: explicit hint, then the
/// `STEAM_ROOT` environment variable, then per-platform well-known paths.
pub fn discover_root(hint: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = hint {
        if path.is_dir() {
            return Some(path.to_path_buf());
        }
    }

    if let Ok(env_root) = std::env::var(STEAM_ROOT_ENV) {
        let path = PathBuf::from(env_root);
        if path.is_dir() {
            return Some(path);
        }
    }

    let candidates = [
        dirs::home_dir().map(|h| h.join(".steam/steam")),
        dirs::home_dir().map(|h| h.join(".local/share/Steam")),
        dirs::home_dir().map(|h| h.join("Library/Application Support/Steam")),
        Some(PathBuf::from("C:\\Program Files (x86)\\Steam")),
    ];

    candidates.into_iter().flatten().find(|p| p.is_dir())
}

/// Expected location of the app metadata file under an installation root.
pub fn appinfo_path(root: &Path) -> PathBuf {
    root.join(APPCACHE_DIR).join(APPINFO_FILE)
}

/// Boot-time environment checks: the installation root must be discoverable
/// and the metadata file must exist beneath it. Blocking filesystem access
/// is fine here; boot is sequential and single-shot.
pub fn preflight(hint: Option<&Path>) -> Result<PathBuf, StartupError> {
    let root = discover_root(hint).ok_or(StartupError::SteamNotFound)?;
    tracing::info!(root = %root.display(), "Steam installation path found");

    let appinfo = appinfo_path(&root);
    if !appinfo.exists() {
        return Err(StartupError::AppInfoMissing(appinfo));
    }
    tracing::info!(path = %appinfo.display(), "app metadata file present");

    Ok(root)
}

const LAUNCH_FIELDS: &[&str] = &["executable", "arguments", "workingdir"];

fn current_platform() -> Option<&'static str> {
    if cfg!(target_os = "windows") {
        Some("windows")
    } else if cfg!(target_os = "linux") {
        Some("linux")
    } else if cfg!(target_os = "macos") {
        Some("macos")
    } else {
        None
    }
}

fn oslist_matches(launch: &Map<String, Value>, platform: &str) -> bool {
    match launch
        .get("config")
        .and_then(Value::as_object)
        .and_then(|config| config.get("oslist"))
        .and_then(Value::as_str)
    {
        Some(oslist) => oslist.trim() == platform,
        // No os restriction applies everywhere.
        None => true,
    }
}

/// Filter one app's launch table down to the entries valid for the current
/// platform, keeping only the executable/arguments/workingdir fields. The
/// result is the opaque payload attached to snapshots for the copy action.
pub fn platform_launches(launch: &Map<String, Value>) -> Option<Value> {
    let platform = current_platform()?;

    let filtered: Map<String, Value> = launch
        .iter()
        .filter_map(|(key, value)| {
            let entry = value.as_object()?;
            if !oslist_matches(entry, platform) {
                return None;
            }

            let mut fields = Map::new();
            for prop in LAUNCH_FIELDS {
                if let Some(v) = entry.get(*prop) {
                    fields.insert((*prop).to_string(), v.clone());
                }
            }

            if fields.is_empty() {
                None
            } else {
                Some((key.clone(), Value::Object(fields)))
            }
        })
        .collect();

    if filtered.is_empty() {
        None
    } else {
        Some(Value::Object(filtered))
    }
}

/// Look up one app in a parsed metadata map (`{"entries": [{appid, config:
/// {launch: ...}}, ...]}`) and return its platform launch entry.
pub fn launch_entry_for(appinfo: &Map<String, Value>, appid: u32) -> Option<Value> {
    let entries = appinfo.get("entries").and_then(Value::as_array)?;

    entries.iter().find_map(|entry| {
        let app = entry.as_object()?;
        let id = app.get("appid").and_then(Value::as_u64)?;
        if id != u64::from(appid) {
            return None;
        }

        let launch = app
            .get("config")
            .and_then(Value::as_object)
            .and_then(|config| config.get("launch"))
            .and_then(Value::as_object)?;

        let mut result = Map::new();
        result.insert("appid".to_string(), Value::from(appid));
        result.insert("launch".to_string(), platform_launches(launch)?);
        Some(Value::Object(result))
    })
}
