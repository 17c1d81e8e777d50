// SPDX-License-Identifier: MPL-2.0
//! Deterministic scheduler driven by explicit time advancement.

use super::{Clock, Scheduler, TimerHandle};
use std::collections::BTreeMap;
use std::time::Duration;

/// Scheduler with a virtual clock.
///
/// Nothing fires on its own: callers move time forward with [`advance`](Self::advance)
/// or step through due timers one at a time with [`pop_due`](Self::pop_due).
/// Timers due at the same instant fire in the order they were scheduled.
#[derive(Debug)]
pub struct ManualScheduler<M> {
    now: Duration,
    next_handle: u64,
    pending: BTreeMap<(Duration, TimerHandle), M>,
}

impl<M> ManualScheduler<M> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_handle: 0,
            pending: BTreeMap::new(),
        }
    }

    /// Removes and returns the earliest timer due at or before `deadline`,
    /// moving the clock to its due time.
    pub fn pop_due(&mut self, deadline: Duration) -> Option<M> {
        let key = *self.pending.keys().next()?;
        if key.0 > deadline {
            return None;
        }
        let message = self.pending.remove(&key)?;
        self.now = self.now.max(key.0);
        Some(message)
    }

    /// Moves the clock to `deadline` without firing anything.
    ///
    /// The clock never goes backwards.
    pub fn jump_to(&mut self, deadline: Duration) {
        self.now = self.now.max(deadline);
    }

    /// Advances time by `by`, returning every message that came due in fire order.
    pub fn advance(&mut self, by: Duration) -> Vec<M> {
        let deadline = self.now + by;
        let mut fired = Vec::new();
        while let Some(message) = self.pop_due(deadline) {
            fired.push(message);
        }
        self.jump_to(deadline);
        fired
    }

    /// Number of timers still waiting to fire.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.keys().any(|(_, h)| *h == handle)
    }
}

impl<M> Default for ManualScheduler<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> Clock for ManualScheduler<M> {
    fn now(&self) -> Duration {
        self.now
    }
}

impl<M> Scheduler<M> for ManualScheduler<M> {
    fn schedule(&mut self, message: M, delay: Duration) -> TimerHandle {
        let handle = TimerHandle::from_raw(self.next_handle);
        self.next_handle += 1;
        self.pending.insert((self.now + delay, handle), message);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.pending.retain(|(_, h), _| *h != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn nothing_fires_before_deadline() {
        let mut scheduler = ManualScheduler::new();
        scheduler.schedule("a", ms(100));

        assert!(scheduler.advance(ms(99)).is_empty());
        assert_eq!(scheduler.advance(ms(1)), vec!["a"]);
        assert_eq!(scheduler.now(), ms(100));
    }

    #[test]
    fn timers_fire_in_due_order_then_schedule_order() {
        let mut scheduler = ManualScheduler::new();
        scheduler.schedule("late", ms(300));
        scheduler.schedule("first", ms(100));
        scheduler.schedule("second", ms(100));

        assert_eq!(scheduler.advance(ms(500)), vec!["first", "second", "late"]);
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut scheduler = ManualScheduler::new();
        let handle = scheduler.schedule("a", ms(100));
        assert!(scheduler.is_pending(handle));

        scheduler.cancel(handle);
        assert!(!scheduler.is_pending(handle));
        assert!(scheduler.advance(ms(1_000)).is_empty());
    }

    #[test]
    fn pop_due_moves_clock_to_fire_time() {
        let mut scheduler = ManualScheduler::new();
        scheduler.schedule(1, ms(40));

        assert_eq!(scheduler.pop_due(ms(100)), Some(1));
        assert_eq!(scheduler.now(), ms(40));
        assert_eq!(scheduler.pop_due(ms(100)), None);
    }

    #[test]
    fn delays_are_relative_to_current_time() {
        let mut scheduler = ManualScheduler::new();
        scheduler.advance(ms(1_000));
        scheduler.schedule("a", ms(10));

        assert!(scheduler.advance(ms(9)).is_empty());
        assert_eq!(scheduler.advance(ms(1)), vec!["a"]);
    }
}
