//! Startup error taxonomy

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort the boot sequence. Anything else that escapes the boot
/// chain is normalized into `Unknown` so the user always sees one message.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Steam installation path not found. Please install Steam before running steamwatch")]
    SteamNotFound,

    #[error("\"{}\" not found in Steam installation directory. Please ensure the latest version of Steam is installed before running steamwatch", .0.display())]
    AppInfoMissing(PathBuf),

    #[error("Unable to start steamwatch: {0}")]
    Unknown(String),
}

impl StartupError {
    /// Wrap an arbitrary boot-phase failure, keeping typed variants as-is.
    pub fn wrap(err: anyhow::Error) -> Self {
        match err.downcast::<StartupError>() {
            Ok(startup) => startup,
            Err(other) => StartupError::Unknown(other.to_string()),
        }
    }
}
