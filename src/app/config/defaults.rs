// SPDX-License-Identifier: MPL-2.0
//! Default values for configuration settings.

// ==========================================================================
// Notification Defaults
// ==========================================================================

/// Default auto-dismiss delay for toasts, in milliseconds.
pub const DEFAULT_TOAST_DURATION_MS: u64 = 5_000;

/// Longest configurable auto-dismiss delay, in milliseconds.
/// Zero is allowed and keeps toasts until dismissed.
pub const MAX_TOAST_DURATION_MS: u64 = 60_000;

// ==========================================================================
// File Names
// ==========================================================================

/// User preferences, in the config directory.
pub const CONFIG_FILE: &str = "settings.toml";

/// Key-value store backing the theme preference, in the config directory.
pub const STORAGE_FILE: &str = "storage.toml";

/// Cookie jar, in the data directory.
pub const COOKIE_FILE: &str = "cookies.cbor";
