// SPDX-License-Identifier: MPL-2.0
//! Scheduler backed by tokio timers.

use super::{Clock, Scheduler, TimerHandle};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Real-time scheduler delivering messages over an unbounded channel.
///
/// Each timer is a spawned task sleeping for its delay, so the scheduler must
/// be used from within a tokio runtime. Cancelling aborts the task; a message
/// that was already sent before the abort still reaches the receiver, so
/// consumers must tolerate stale deliveries.
#[derive(Debug)]
pub struct TokioScheduler<M> {
    sender: mpsc::UnboundedSender<M>,
    tasks: HashMap<TimerHandle, JoinHandle<()>>,
    next_handle: u64,
    origin: Instant,
}

impl<M: Send + 'static> TokioScheduler<M> {
    /// Creates a scheduler and the receiver its messages arrive on.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<M>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let scheduler = Self {
            sender,
            tasks: HashMap::new(),
            next_handle: 0,
            origin: Instant::now(),
        };
        (scheduler, receiver)
    }

    /// Number of timers that have neither fired nor been cancelled.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.tasks.values().filter(|task| !task.is_finished()).count()
    }
}

impl<M> Clock for TokioScheduler<M> {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

impl<M: Send + 'static> Scheduler<M> for TokioScheduler<M> {
    fn schedule(&mut self, message: M, delay: Duration) -> TimerHandle {
        self.tasks.retain(|_, task| !task.is_finished());

        let handle = TimerHandle::from_raw(self.next_handle);
        self.next_handle += 1;

        let sender = self.sender.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver gone means the event loop is shutting down.
            let _ = sender.send(message);
        });
        self.tasks.insert(handle, task);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if let Some(task) = self.tasks.remove(&handle) {
            task.abort();
        }
    }
}

impl<M> Drop for TokioScheduler<M> {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn message_arrives_after_delay() {
        let (mut scheduler, mut receiver) = TokioScheduler::new();
        scheduler.schedule("ping", Duration::from_millis(200));

        tokio::time::sleep(Duration::from_millis(199)).await;
        assert!(receiver.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(receiver.recv().await, Some("ping"));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_timer_is_silent() {
        let (mut scheduler, mut receiver) = TokioScheduler::new();
        let handle = scheduler.schedule("ping", Duration::from_millis(50));
        scheduler.cancel(handle);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(receiver.try_recv().is_err());
        assert_eq!(scheduler.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn clock_follows_tokio_time() {
        let (scheduler, _receiver) = TokioScheduler::<()>::new();
        tokio::time::sleep(Duration::from_millis(1_500)).await;
        assert!(scheduler.now() >= Duration::from_millis(1_500));
    }
}
