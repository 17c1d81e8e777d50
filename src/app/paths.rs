// SPDX-License-Identifier: MPL-2.0
//! Resolution of the application's config and data directories.
//!
//! Each directory is resolved from the first source that yields a value:
//! 1. An explicit override passed to the `_with_override()` functions, which
//!    is how the `--config-dir` / `--data-dir` flags arrive
//! 2. The `MDNOTES_CONFIG_DIR` / `MDNOTES_DATA_DIR` environment variables
//! 3. The platform directory from `dirs`, with the application name appended
//!
//! The config directory holds user-editable files (`settings.toml`,
//! `storage.toml`); the data directory holds machine-written state
//! (`state.cbor`, `cookies.cbor`).

use std::path::PathBuf;

/// Directory name used under the platform config/data roots.
const APP_NAME: &str = "MdNotes";

/// Environment variable overriding the data directory.
pub const ENV_DATA_DIR: &str = "MDNOTES_DATA_DIR";

/// Environment variable overriding the config directory.
pub const ENV_CONFIG_DIR: &str = "MDNOTES_CONFIG_DIR";

fn resolve(
    override_path: Option<PathBuf>,
    env_var: &str,
    platform_root: Option<PathBuf>,
) -> Option<PathBuf> {
    if let Some(path) = override_path {
        return Some(path);
    }

    // Empty values count as unset.
    if let Ok(env_path) = std::env::var(env_var) {
        if !env_path.is_empty() {
            return Some(PathBuf::from(env_path));
        }
    }

    platform_root.map(|root| root.join(APP_NAME))
}

/// Returns the data directory (`~/.local/share/MdNotes` on Linux).
///
/// `None` only if the platform has no data directory.
pub fn get_app_data_dir() -> Option<PathBuf> {
    get_app_data_dir_with_override(None)
}

pub fn get_app_data_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    resolve(override_path, ENV_DATA_DIR, dirs::data_dir())
}

/// Returns the config directory (`~/.config/MdNotes` on Linux).
///
/// `None` only if the platform has no config directory.
pub fn get_app_config_dir() -> Option<PathBuf> {
    get_app_config_dir_with_override(None)
}

pub fn get_app_config_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    resolve(override_path, ENV_CONFIG_DIR, dirs::config_dir())
}
