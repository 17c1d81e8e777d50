// SPDX-License-Identifier: MPL-2.0
//! Theme store: the current theme plus its persistence.

use super::{Theme, THEME_COOKIE_MAX_AGE, THEME_COOKIE_NAME, THEME_STORAGE_KEY};
use crate::storage::{Cookie, CookieJar, KeyValueStore, SameSite, ThemeAttribute};
use tokio::sync::watch;

/// Holds the current theme and mirrors every change to the key-value store,
/// the theme cookie and the theme attribute.
///
/// Persistence is best-effort: write failures are logged and otherwise
/// ignored, so changing the theme never fails.
pub struct ThemeStore {
    current: watch::Sender<Theme>,
    storage: Box<dyn KeyValueStore>,
    cookies: Box<dyn CookieJar>,
    attribute: Box<dyn ThemeAttribute>,
}

impl std::fmt::Debug for ThemeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeStore")
            .field("current", &*self.current.borrow())
            .finish_non_exhaustive()
    }
}

impl ThemeStore {
    /// Creates a store holding the default theme. Call [`initialize`](Self::initialize)
    /// once at startup to pick up the persisted value.
    pub fn new(
        storage: impl KeyValueStore + 'static,
        cookies: impl CookieJar + 'static,
        attribute: impl ThemeAttribute + 'static,
    ) -> Self {
        let (current, _) = watch::channel(Theme::default());
        Self {
            current,
            storage: Box::new(storage),
            cookies: Box::new(cookies),
            attribute: Box::new(attribute),
        }
    }

    #[must_use]
    pub fn get(&self) -> Theme {
        *self.current.borrow()
    }

    /// Receives the theme after every change.
    pub fn subscribe(&self) -> watch::Receiver<Theme> {
        self.current.subscribe()
    }

    /// Applies and persists `theme`.
    pub fn set(&mut self, theme: Theme) {
        self.current.send_replace(theme);

        if let Err(err) = self.storage.set(THEME_STORAGE_KEY, theme.as_str()) {
            tracing::warn!(%err, "failed to store theme preference");
        }

        let cookie = Cookie::new(THEME_COOKIE_NAME, theme.as_str(), THEME_COOKIE_MAX_AGE)
            .with_path("/")
            .with_same_site(SameSite::Lax);
        if let Err(err) = self.cookies.set_cookie(&cookie) {
            tracing::warn!(%err, "failed to write theme cookie");
        }

        self.attribute.set(theme.as_str());
        tracing::debug!(%theme, "theme changed");
    }

    /// Applies a theme given by name.
    ///
    /// Unknown names are logged and ignored, leaving the theme unchanged.
    /// Returns whether the theme was applied.
    pub fn set_from_str(&mut self, value: &str) -> bool {
        match value.parse::<Theme>() {
            Ok(theme) => {
                self.set(theme);
                true
            }
            Err(err) => {
                tracing::warn!(%err, "ignoring theme change");
                false
            }
        }
    }

    /// Switches between light and dark.
    pub fn toggle(&mut self) -> Theme {
        let next = self.get().toggled();
        self.set(next);
        next
    }

    /// Resolves the startup theme: stored value, then the current attribute,
    /// then the default. Invalid candidates are skipped. A storage fault is
    /// logged and the default used; this never fails.
    ///
    /// The result is written to the attribute but not persisted again.
    pub fn initialize(&mut self) -> Theme {
        let theme = match self.storage.get(THEME_STORAGE_KEY) {
            Ok(stored) => stored
                .and_then(|value| value.parse().ok())
                .or_else(|| self.attribute.get().and_then(|value| value.parse().ok()))
                .unwrap_or_default(),
            Err(err) => {
                tracing::warn!(%err, "failed to read theme preference, using default");
                Theme::default()
            }
        };

        self.current.send_replace(theme);
        self.attribute.set(theme.as_str());
        theme
    }
}

/// Sets the theme attribute from the theme cookie before anything renders,
/// so the first frame already uses the right theme. A missing, expired or
/// invalid cookie yields the default theme.
pub fn seed_attribute_from_cookie(
    cookies: &dyn CookieJar,
    attribute: &mut dyn ThemeAttribute,
) -> Theme {
    let theme = match cookies.get_cookie(THEME_COOKIE_NAME) {
        Ok(value) => value.and_then(|v| v.parse().ok()).unwrap_or_default(),
        Err(err) => {
            tracing::warn!(%err, "failed to read theme cookie");
            Theme::default()
        }
    };
    attribute.set(theme.as_str());
    theme
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use crate::storage::{MemoryCookieJar, MemoryStore, SharedAttribute};

    /// Store whose every access fails.
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(Error::Io("storage unavailable".into()))
        }
        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(Error::Io("storage unavailable".into()))
        }
        fn remove(&mut self, _key: &str) -> Result<()> {
            Err(Error::Io("storage unavailable".into()))
        }
        fn clear(&mut self) -> Result<()> {
            Err(Error::Io("storage unavailable".into()))
        }
    }

    fn memory_store() -> (ThemeStore, MemoryStore, MemoryCookieJar, SharedAttribute) {
        let storage = MemoryStore::new();
        let cookies = MemoryCookieJar::new();
        let attribute = SharedAttribute::new();
        let store = ThemeStore::new(storage.clone(), cookies.clone(), attribute.clone());
        (store, storage, cookies, attribute)
    }

    #[test]
    fn set_then_get_returns_theme() {
        let (mut store, ..) = memory_store();
        store.set(Theme::Dark);
        assert_eq!(store.get(), Theme::Dark);
        store.set(Theme::Light);
        assert_eq!(store.get(), Theme::Light);
    }

    #[test]
    fn set_persists_everywhere() {
        let (mut store, storage, cookies, attribute) = memory_store();
        store.set(Theme::Light);

        assert_eq!(
            storage.get(THEME_STORAGE_KEY).unwrap(),
            Some("light".to_string())
        );
        assert_eq!(
            cookies.get_cookie(THEME_COOKIE_NAME).unwrap(),
            Some("light".to_string())
        );
        assert_eq!(
            cookies.written(),
            vec!["theme=light; Max-Age=31536000; Path=/; SameSite=Lax".to_string()]
        );
        assert_eq!(attribute.get(), Some("light".to_string()));
    }

    #[test]
    fn invalid_name_leaves_theme_unchanged() {
        let (mut store, storage, ..) = memory_store();
        store.set(Theme::Light);

        assert!(!store.set_from_str("blue"));
        assert_eq!(store.get(), Theme::Light);
        assert_eq!(
            storage.get(THEME_STORAGE_KEY).unwrap(),
            Some("light".to_string())
        );

        assert!(store.set_from_str("dark"));
        assert_eq!(store.get(), Theme::Dark);
    }

    #[test]
    fn initialize_without_anything_yields_dark() {
        let (mut store, _, _, attribute) = memory_store();
        assert_eq!(store.initialize(), Theme::Dark);
        assert_eq!(store.get(), Theme::Dark);
        assert_eq!(attribute.get(), Some("dark".to_string()));
    }

    #[test]
    fn initialize_prefers_stored_value_over_attribute() {
        let mut storage = MemoryStore::new();
        storage.set(THEME_STORAGE_KEY, "light").unwrap();
        let attribute = SharedAttribute::with_value("dark");
        let mut store = ThemeStore::new(storage, MemoryCookieJar::new(), attribute);

        assert_eq!(store.initialize(), Theme::Light);
    }

    #[test]
    fn initialize_falls_back_to_attribute() {
        let attribute = SharedAttribute::with_value("light");
        let mut store = ThemeStore::new(MemoryStore::new(), MemoryCookieJar::new(), attribute);

        assert_eq!(store.initialize(), Theme::Light);
    }

    #[test]
    fn initialize_skips_invalid_stored_value() {
        let mut storage = MemoryStore::new();
        storage.set(THEME_STORAGE_KEY, "sepia").unwrap();
        let attribute = SharedAttribute::with_value("light");
        let mut store = ThemeStore::new(storage, MemoryCookieJar::new(), attribute);

        assert_eq!(store.initialize(), Theme::Light);
    }

    #[test]
    fn initialize_swallows_storage_fault() {
        let attribute = SharedAttribute::with_value("light");
        let mut store = ThemeStore::new(BrokenStore, MemoryCookieJar::new(), attribute);

        assert_eq!(store.initialize(), Theme::Dark);
    }

    #[test]
    fn set_survives_storage_fault() {
        let cookies = MemoryCookieJar::new();
        let mut store = ThemeStore::new(BrokenStore, cookies.clone(), SharedAttribute::new());

        store.set(Theme::Light);
        assert_eq!(store.get(), Theme::Light);
        assert_eq!(
            cookies.get_cookie(THEME_COOKIE_NAME).unwrap(),
            Some("light".to_string())
        );
    }

    #[test]
    fn toggle_flips_and_persists() {
        let (mut store, storage, ..) = memory_store();
        assert_eq!(store.toggle(), Theme::Light);
        assert_eq!(
            storage.get(THEME_STORAGE_KEY).unwrap(),
            Some("light".to_string())
        );
        assert_eq!(store.toggle(), Theme::Dark);
    }

    #[test]
    fn subscribers_see_changes() {
        let (mut store, ..) = memory_store();
        let mut receiver = store.subscribe();

        store.set(Theme::Light);
        assert!(receiver.has_changed().unwrap());
        assert_eq!(*receiver.borrow_and_update(), Theme::Light);
    }

    #[test]
    fn seed_uses_valid_cookie() {
        let mut cookies = MemoryCookieJar::new();
        cookies
            .set_cookie(&Cookie::new(THEME_COOKIE_NAME, "light", THEME_COOKIE_MAX_AGE))
            .unwrap();
        let mut attribute = SharedAttribute::new();

        assert_eq!(
            seed_attribute_from_cookie(&cookies, &mut attribute),
            Theme::Light
        );
        assert_eq!(attribute.get(), Some("light".to_string()));
    }

    #[test]
    fn seed_rejects_invalid_cookie() {
        let mut cookies = MemoryCookieJar::new();
        cookies
            .set_cookie(&Cookie::new(THEME_COOKIE_NAME, "neon", THEME_COOKIE_MAX_AGE))
            .unwrap();
        let mut attribute = SharedAttribute::new();

        assert_eq!(
            seed_attribute_from_cookie(&cookies, &mut attribute),
            Theme::Dark
        );
        assert_eq!(attribute.get(), Some("dark".to_string()));
    }
}
