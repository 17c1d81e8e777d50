// SPDX-License-Identifier: MPL-2.0
//! Core toast data structures.
//!
//! This module defines the `Toast` struct and `ToastKind` enum used
//! throughout the notification system.

use std::fmt;
use std::time::Duration;

/// Unique identifier for a toast, stable for its whole lifetime.
///
/// Identifiers are allocated by the owning [`Manager`](super::Manager) and are
/// only unique within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToastId(u64);

impl ToastId {
    #[must_use]
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "toast-{}", self.0)
    }
}

impl std::str::FromStr for ToastId {
    type Err = std::num::ParseIntError;

    /// Accepts both `toast-7` and a bare `7`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.strip_prefix("toast-").unwrap_or(s);
        raw.parse().map(Self)
    }
}

/// Kind of toast, which drives its styling and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastKind {
    /// Informational message.
    #[default]
    Info,
    /// Operation completed successfully.
    Success,
    /// Something needs attention but nothing failed.
    Warning,
    /// An operation failed.
    Error,
}

impl ToastKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ToastKind::Info => "info",
            ToastKind::Success => "success",
            ToastKind::Warning => "warning",
            ToastKind::Error => "error",
        }
    }
}

impl fmt::Display for ToastKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A toast notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    id: ToastId,
    kind: ToastKind,
    message: String,
    /// Auto-dismiss delay; zero disables auto-dismiss.
    duration: Duration,
    dismissible: bool,
    is_closing: bool,
    /// Clock time at which the current timer (if any) was armed.
    pub(super) started_at: Duration,
    /// Length of the timer armed at `started_at`.
    pub(super) armed: Duration,
    /// Time left, captured when paused.
    pub(super) remaining: Option<Duration>,
    /// Bumped on every arm so a late expiry from an older timer is recognisable.
    pub(super) generation: u64,
}

impl Toast {
    pub(super) fn new(
        id: ToastId,
        kind: ToastKind,
        message: String,
        duration: Duration,
        dismissible: bool,
    ) -> Self {
        Self {
            id,
            kind,
            message,
            duration,
            dismissible,
            is_closing: false,
            started_at: Duration::ZERO,
            armed: Duration::ZERO,
            remaining: None,
            generation: 0,
        }
    }

    #[must_use]
    pub fn id(&self) -> ToastId {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> ToastKind {
        self.kind
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Whether a manual close control is offered.
    #[must_use]
    pub fn dismissible(&self) -> bool {
        self.dismissible
    }

    /// True while the exit window runs.
    #[must_use]
    pub fn is_closing(&self) -> bool {
        self.is_closing
    }

    pub(super) fn mark_closing(&mut self) {
        self.is_closing = true;
    }

    #[must_use]
    pub fn auto_dismisses(&self) -> bool {
        !self.duration.is_zero()
    }

    /// Time left before auto-dismiss, as captured by the last pause.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.remaining
    }
}
