// SPDX-License-Identifier: MPL-2.0
//! Session state that persists across runs, stored as CBOR.
//!
//! Unlike `settings.toml`, this file is written by the application only and
//! holds things like the last opened notes directory.

use super::paths;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// State file name within the app data directory.
const STATE_FILE: &str = "state.cbor";

/// Application state that persists across sessions.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppState {
    /// Directory the notes were last loaded from.
    #[serde(default)]
    pub last_directory: Option<PathBuf>,
}

impl AppState {
    /// Loads state from the default location.
    ///
    /// Returns the default state plus a warning when the file exists but
    /// cannot be read.
    pub fn load() -> (Self, Option<String>) {
        Self::load_from(None)
    }

    /// Loads state from `base_dir`, or the default data directory if `None`.
    pub fn load_from(base_dir: Option<PathBuf>) -> (Self, Option<String>) {
        let Some(path) = Self::state_file_path_with_override(base_dir) else {
            return (Self::default(), None);
        };
        if !path.exists() {
            return (Self::default(), None);
        }

        let state: crate::error::Result<Self> = fs::File::open(&path)
            .map_err(crate::error::Error::from)
            .and_then(|file| Ok(ciborium::from_reader(BufReader::new(file))?));
        match state {
            Ok(state) => (state, None),
            Err(err) => {
                tracing::warn!(%err, path = %path.display(), "failed to load session state");
                (
                    Self::default(),
                    Some("Session state could not be read".to_string()),
                )
            }
        }
    }

    /// Saves state to the default location. Returns a warning on failure.
    pub fn save(&self) -> Option<String> {
        self.save_to(None)
    }

    /// Saves state to `base_dir`, or the default data directory if `None`,
    /// creating it when needed.
    pub fn save_to(&self, base_dir: Option<PathBuf>) -> Option<String> {
        let Some(path) = Self::state_file_path_with_override(base_dir) else {
            return Some("No data directory available for session state".to_string());
        };

        match self.write(&path) {
            Ok(()) => None,
            Err(err) => {
                tracing::warn!(%err, path = %path.display(), "failed to save session state");
                Some("Session state could not be saved".to_string())
            }
        }
    }

    fn write(&self, path: &Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let writer = BufWriter::new(fs::File::create(path)?);
        ciborium::into_writer(self, writer)?;
        Ok(())
    }

    fn state_file_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
        paths::get_app_data_dir_with_override(base_dir).map(|dir| dir.join(STATE_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_state_has_no_last_directory() {
        assert!(AppState::default().last_directory.is_none());
    }

    #[test]
    fn save_and_load_round_trip() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let base = temp_dir.path().join("data");
        let state = AppState {
            last_directory: Some(PathBuf::from("/home/user/notes")),
        };

        assert!(state.save_to(Some(base.clone())).is_none());
        let (loaded, warning) = AppState::load_from(Some(base));

        assert!(warning.is_none());
        assert_eq!(loaded, state);
    }

    #[test]
    fn missing_file_is_silent_default() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let (state, warning) = AppState::load_from(Some(temp_dir.path().to_path_buf()));

        assert_eq!(state, AppState::default());
        assert!(warning.is_none());
    }

    #[test]
    fn corrupt_file_warns_and_defaults() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        fs::write(temp_dir.path().join(STATE_FILE), b"not cbor at all \xff").unwrap();

        let (state, warning) = AppState::load_from(Some(temp_dir.path().to_path_buf()));
        assert_eq!(state, AppState::default());
        assert!(warning.is_some());
    }
}
