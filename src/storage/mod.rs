// SPDX-License-Identifier: MPL-2.0
//! Durable storage capabilities used by the theme store.
//!
//! - [`KeyValueStore`] - small string key-value store (`storage.toml`)
//! - [`CookieJar`] - named values with a lifetime (`cookies.cbor`)
//! - [`ThemeAttribute`] - the theme indicator read by the rendering layer
//!
//! Each capability has a file-backed implementation for the application and
//! an in-memory one whose clones share state, for tests and embedding.

mod attribute;
mod cookies;
mod kv;

pub use attribute::{SharedAttribute, ThemeAttribute};
pub use cookies::{Cookie, CookieJar, FileCookieJar, MemoryCookieJar, SameSite};
pub use kv::{FileStore, KeyValueStore, MemoryStore, NoOpStore};
