// SPDX-License-Identifier: MPL-2.0
//! Clock and scheduler abstractions for timed UI behavior.
//!
//! Timers never run closures. A scheduled timer carries a message that is
//! delivered back to whoever owns the event loop, which then feeds it to the
//! component that armed it (e.g. [`crate::ui::notifications::Manager::handle_message`]).
//! This keeps all state mutation on the main execution context.
//!
//! # Implementations
//!
//! - [`ManualScheduler`] - virtual time, advanced explicitly (tests, replay)
//! - [`TokioScheduler`] - real timers backed by tokio tasks and a channel

mod manual;
mod runtime;

pub use manual::ManualScheduler;
pub use runtime::TokioScheduler;

use std::time::Duration;

/// A monotonic time source.
pub trait Clock {
    /// Time elapsed since the clock's origin.
    fn now(&self) -> Duration;
}

/// Opaque handle identifying one scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    /// Wraps a raw scheduler-specific value.
    #[must_use]
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Schedules messages for delivery after a delay.
pub trait Scheduler<M> {
    /// Arms a timer that delivers `message` once `delay` has elapsed.
    fn schedule(&mut self, message: M, delay: Duration) -> TimerHandle;

    /// Cancels a pending timer. Unknown or already-fired handles are ignored.
    fn cancel(&mut self, handle: TimerHandle);
}
