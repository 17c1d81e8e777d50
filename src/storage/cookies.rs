// SPDX-License-Identifier: MPL-2.0
//! Cookie jar: named values that expire after a max-age.

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

/// Same-site policy attached to a cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SameSite {
    Strict,
    #[default]
    Lax,
    None,
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SameSite::Strict => write!(f, "Strict"),
            SameSite::Lax => write!(f, "Lax"),
            SameSite::None => write!(f, "None"),
        }
    }
}

/// A cookie to be written to a [`CookieJar`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub max_age: Duration,
    pub path: String,
    pub same_site: SameSite,
}

impl Cookie {
    /// Creates a cookie with path `/` and `Lax` same-site policy.
    pub fn new(name: impl Into<String>, value: impl Into<String>, max_age: Duration) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            max_age,
            path: "/".to_string(),
            same_site: SameSite::default(),
        }
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    #[must_use]
    pub fn with_same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = same_site;
        self
    }

    /// Formats the cookie the way a `Set-Cookie` header carries it.
    #[must_use]
    pub fn to_header_value(&self) -> String {
        format!(
            "{}={}; Max-Age={}; Path={}; SameSite={}",
            self.name,
            self.value,
            self.max_age.as_secs(),
            self.path,
            self.same_site
        )
    }
}

/// Stores cookies and hands back the values of those not yet expired.
pub trait CookieJar {
    fn set_cookie(&mut self, cookie: &Cookie) -> Result<()>;
    fn get_cookie(&self, name: &str) -> Result<Option<String>>;
}

impl<T: CookieJar + ?Sized> CookieJar for Box<T> {
    fn set_cookie(&mut self, cookie: &Cookie) -> Result<()> {
        (**self).set_cookie(cookie)
    }

    fn get_cookie(&self, name: &str) -> Result<Option<String>> {
        (**self).get_cookie(name)
    }
}

/// A cookie as kept on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct StoredCookie {
    value: String,
    /// Unix timestamp (seconds) after which the cookie is gone.
    expires_at: i64,
    path: String,
    same_site: SameSite,
}

impl StoredCookie {
    fn from_cookie(cookie: &Cookie, now: DateTime<Utc>) -> Self {
        let max_age = i64::try_from(cookie.max_age.as_secs()).unwrap_or(i64::MAX);
        Self {
            value: cookie.value.clone(),
            expires_at: now.timestamp().saturating_add(max_age),
            path: cookie.path.clone(),
            same_site: cookie.same_site,
        }
    }

    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now.timestamp()
    }
}

type CookieMap = BTreeMap<String, StoredCookie>;

fn live_value(cookies: &CookieMap, name: &str, now: DateTime<Utc>) -> Option<String> {
    cookies
        .get(name)
        .filter(|cookie| cookie.is_live(now))
        .map(|cookie| cookie.value.clone())
}

/// Cookie jar persisted as CBOR.
///
/// Expired cookies are dropped whenever the jar is rewritten.
#[derive(Debug, Clone)]
pub struct FileCookieJar {
    path: PathBuf,
}

impl FileCookieJar {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<CookieMap> {
        if !self.path.exists() {
            return Ok(CookieMap::new());
        }
        let reader = BufReader::new(fs::File::open(&self.path)?);
        Ok(ciborium::from_reader(reader)?)
    }

    fn write(&self, cookies: &CookieMap) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let writer = BufWriter::new(fs::File::create(&self.path)?);
        ciborium::into_writer(cookies, writer)?;
        Ok(())
    }

    fn set_cookie_at(&mut self, cookie: &Cookie, now: DateTime<Utc>) -> Result<()> {
        let mut cookies = self.read()?;
        cookies.retain(|_, stored| stored.is_live(now));
        cookies.insert(cookie.name.clone(), StoredCookie::from_cookie(cookie, now));
        self.write(&cookies)
    }

    fn get_cookie_at(&self, name: &str, now: DateTime<Utc>) -> Result<Option<String>> {
        Ok(live_value(&self.read()?, name, now))
    }
}

impl CookieJar for FileCookieJar {
    fn set_cookie(&mut self, cookie: &Cookie) -> Result<()> {
        self.set_cookie_at(cookie, Utc::now())
    }

    fn get_cookie(&self, name: &str) -> Result<Option<String>> {
        self.get_cookie_at(name, Utc::now())
    }
}

/// In-memory cookie jar. Clones share the same cookies.
#[derive(Debug, Clone, Default)]
pub struct MemoryCookieJar {
    cookies: Rc<RefCell<CookieMap>>,
    headers: Rc<RefCell<Vec<String>>>,
}

impl MemoryCookieJar {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every cookie written so far, formatted as header values.
    #[must_use]
    pub fn written(&self) -> Vec<String> {
        self.headers.borrow().clone()
    }
}

impl CookieJar for MemoryCookieJar {
    fn set_cookie(&mut self, cookie: &Cookie) -> Result<()> {
        self.cookies.borrow_mut().insert(
            cookie.name.clone(),
            StoredCookie::from_cookie(cookie, Utc::now()),
        );
        self.headers.borrow_mut().push(cookie.to_header_value());
        Ok(())
    }

    fn get_cookie(&self, name: &str) -> Result<Option<String>> {
        Ok(live_value(&self.cookies.borrow(), name, Utc::now()))
    }
}
