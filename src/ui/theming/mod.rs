// SPDX-License-Identifier: MPL-2.0
//! Light/dark theme selection and persistence.

mod store;

pub use store::{seed_attribute_from_cookie, ThemeStore};

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Key under which the theme is kept in the key-value store.
pub const THEME_STORAGE_KEY: &str = "theme";

/// Name of the theme cookie.
pub const THEME_COOKIE_NAME: &str = "theme";

/// Lifetime of the theme cookie: one year.
pub const THEME_COOKIE_MAX_AGE: Duration = Duration::from_secs(60 * 60 * 24 * 365);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    #[must_use]
    pub fn is_dark(self) -> bool {
        matches!(self, Theme::Dark)
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A string that is not one of the known themes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidTheme(pub String);

impl fmt::Display for InvalidTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid theme: {}", self.0)
    }
}

impl std::error::Error for InvalidTheme {}

impl FromStr for Theme {
    type Err = InvalidTheme;

    /// Only the exact lowercase names are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(InvalidTheme(other.to_string())),
        }
    }
}
