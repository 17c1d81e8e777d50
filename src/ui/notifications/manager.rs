// SPDX-License-Identifier: MPL-2.0
//! Toast lifecycle management.
//!
//! The `Manager` handles queuing, display timing, pause/resume and dismissal
//! of toasts. It limits the number of visible toasts and arms one
//! auto-dismiss timer per visible toast through an injected scheduler.

use super::notification::{Toast, ToastId, ToastKind};
use crate::timer::{Clock, ManualScheduler, Scheduler, TimerHandle};
use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Duration;
use tokio::sync::broadcast;

/// Maximum number of toasts visible at once, closing ones included.
pub const MAX_VISIBLE: usize = 3;

/// Auto-dismiss delay used when the caller gives none.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(5_000);

/// Time a closing toast stays in the visible set while its exit plays.
pub const EXIT_ANIMATION: Duration = Duration::from_millis(200);

const EVENT_CAPACITY: usize = 64;

/// Messages for toast state changes.
///
/// UI interactions and scheduler deliveries both arrive here and are applied
/// through [`Manager::handle_message`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Close control clicked.
    Dismiss(ToastId),
    /// Pointer entered the toast.
    Pause(ToastId),
    /// Pointer left the toast.
    Resume(ToastId),
    /// Auto-dismiss timer fired.
    Expire { id: ToastId, generation: u64 },
    /// Exit window elapsed.
    ExitFinished(ToastId),
}

/// Change notifications published to the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Shown(ToastId),
    Queued(ToastId),
    Closing(ToastId),
    Removed(ToastId),
    Paused(ToastId),
    Resumed(ToastId),
    Cleared,
}

/// Manages the toast queue and visible toasts.
#[derive(Debug)]
pub struct Manager<S> {
    scheduler: S,
    /// Currently visible toasts, oldest first.
    visible: Vec<Toast>,
    /// Toasts waiting for a visible slot.
    queue: VecDeque<Toast>,
    /// Running auto-dismiss timers.
    timers: HashMap<ToastId, TimerHandle>,
    /// Pending exit-window timers.
    exits: HashMap<ToastId, TimerHandle>,
    paused: HashSet<ToastId>,
    next_id: u64,
    default_duration: Duration,
    events: broadcast::Sender<Event>,
}

impl<S> Manager<S>
where
    S: Scheduler<Message> + Clock,
{
    /// Creates an empty manager driving its timers through `scheduler`.
    pub fn new(scheduler: S) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            scheduler,
            visible: Vec::new(),
            queue: VecDeque::new(),
            timers: HashMap::new(),
            exits: HashMap::new(),
            paused: HashSet::new(),
            next_id: 0,
            default_duration: DEFAULT_DURATION,
            events,
        }
    }

    /// Overrides the auto-dismiss delay applied when `add` gets no duration.
    #[must_use]
    pub fn with_default_duration(mut self, duration: Duration) -> Self {
        self.default_duration = duration;
        self
    }

    /// Subscribes to change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Adds a toast and returns its id.
    ///
    /// If fewer than `MAX_VISIBLE` toasts are showing it becomes visible and
    /// its auto-dismiss timer starts now. Otherwise it waits in the queue,
    /// without a timer, until a slot frees up.
    ///
    /// `duration` defaults to the manager default; zero disables auto-dismiss.
    /// `dismissible` defaults to `true`.
    pub fn add(
        &mut self,
        message: impl Into<String>,
        kind: ToastKind,
        duration: Option<Duration>,
        dismissible: Option<bool>,
    ) -> ToastId {
        let id = ToastId::new(self.next_id);
        self.next_id += 1;

        let message = message.into();
        match kind {
            ToastKind::Warning => tracing::warn!(toast = %id, "{message}"),
            ToastKind::Error => tracing::error!(toast = %id, "{message}"),
            ToastKind::Success | ToastKind::Info => {
                tracing::debug!(toast = %id, kind = %kind, "{message}");
            }
        }

        let toast = Toast::new(
            id,
            kind,
            message,
            duration.unwrap_or(self.default_duration),
            dismissible.unwrap_or(true),
        );

        if self.visible.len() < MAX_VISIBLE {
            self.show(toast);
        } else {
            self.queue.push_back(toast);
            self.publish(Event::Queued(id));
        }
        id
    }

    /// Adds a dismissible toast with the default duration.
    pub fn toast(&mut self, message: impl Into<String>, kind: ToastKind) -> ToastId {
        self.add(message, kind, None, Some(true))
    }

    pub fn info(&mut self, message: impl Into<String>) -> ToastId {
        self.toast(message, ToastKind::Info)
    }

    pub fn success(&mut self, message: impl Into<String>) -> ToastId {
        self.toast(message, ToastKind::Success)
    }

    pub fn warning(&mut self, message: impl Into<String>) -> ToastId {
        self.toast(message, ToastKind::Warning)
    }

    pub fn error(&mut self, message: impl Into<String>) -> ToastId {
        self.toast(message, ToastKind::Error)
    }

    /// Starts closing a visible toast.
    ///
    /// The toast is marked closing and its timer cancelled right away; it
    /// leaves the visible set once [`EXIT_ANIMATION`] has elapsed, at which
    /// point the oldest queued toast takes its slot. Unknown, queued and
    /// already-closing ids are ignored.
    pub fn remove(&mut self, id: ToastId) {
        let Some(toast) = self.visible.iter_mut().find(|t| t.id() == id) else {
            return;
        };
        if toast.is_closing() {
            return;
        }
        toast.mark_closing();

        self.disarm(id);
        self.paused.remove(&id);

        let handle = self
            .scheduler
            .schedule(Message::ExitFinished(id), EXIT_ANIMATION);
        self.exits.insert(id, handle);
        self.publish(Event::Closing(id));
    }

    /// Freezes a visible toast's countdown, keeping the time it had left.
    pub fn pause(&mut self, id: ToastId) {
        if self.paused.contains(&id) {
            return;
        }
        let now = self.scheduler.now();
        let Some(toast) = self
            .visible
            .iter_mut()
            .find(|t| t.id() == id && !t.is_closing())
        else {
            return;
        };

        let elapsed = now.saturating_sub(toast.started_at);
        toast.remaining = Some(toast.armed.saturating_sub(elapsed));

        self.disarm(id);
        self.paused.insert(id);
        self.publish(Event::Paused(id));
    }

    /// Restarts a paused toast's countdown for the time it had left.
    ///
    /// A toast with nothing left stays up until removed by hand.
    pub fn resume(&mut self, id: ToastId) {
        if !self.paused.remove(&id) {
            return;
        }
        let now = self.scheduler.now();
        let Some(toast) = self.visible.iter_mut().find(|t| t.id() == id) else {
            return;
        };

        let delay = toast.remaining.unwrap_or(toast.duration());
        toast.started_at = now;
        toast.armed = Duration::ZERO;
        if !delay.is_zero() {
            self.arm(id, delay);
        }
        self.publish(Event::Resumed(id));
    }

    /// Drops every toast immediately, cancelling all outstanding timers.
    pub fn clear_all(&mut self) {
        for (_, handle) in self.timers.drain().chain(self.exits.drain()) {
            self.scheduler.cancel(handle);
        }
        self.paused.clear();
        self.visible.clear();
        self.queue.clear();
        self.publish(Event::Cleared);
    }

    /// Handles a toast message.
    pub fn handle_message(&mut self, message: &Message) {
        match message {
            Message::Dismiss(id) => {
                if self.get(*id).is_some_and(Toast::dismissible) {
                    self.remove(*id);
                }
            }
            Message::Pause(id) => self.pause(*id),
            Message::Resume(id) => self.resume(*id),
            Message::Expire { id, generation } => self.expire(*id, *generation),
            Message::ExitFinished(id) => self.finish_exit(*id),
        }
    }

    /// Returns the visible toasts, oldest first.
    pub fn visible(&self) -> impl Iterator<Item = &Toast> {
        self.visible.iter()
    }

    /// Returns the queued toasts in admission order.
    pub fn queued(&self) -> impl Iterator<Item = &Toast> {
        self.queue.iter()
    }

    /// Looks up a visible toast.
    #[must_use]
    pub fn get(&self, id: ToastId) -> Option<&Toast> {
        self.visible.iter().find(|t| t.id() == id)
    }

    #[must_use]
    pub fn is_paused(&self, id: ToastId) -> bool {
        self.paused.contains(&id)
    }

    /// Returns the number of visible toasts.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    /// Returns the number of queued toasts.
    #[must_use]
    pub fn queued_count(&self) -> usize {
        self.queue.len()
    }

    /// Returns whether there are any toasts (visible or queued).
    #[must_use]
    pub fn has_toasts(&self) -> bool {
        !self.visible.is_empty() || !self.queue.is_empty()
    }

    fn show(&mut self, mut toast: Toast) {
        let id = toast.id();
        toast.started_at = self.scheduler.now();
        toast.armed = Duration::ZERO;
        let duration = toast.duration();
        self.visible.push(toast);
        if !duration.is_zero() {
            self.arm(id, duration);
        }
        self.publish(Event::Shown(id));
    }

    /// Arms the auto-dismiss timer of a visible toast. Any previous timer for
    /// the id must already be cancelled.
    fn arm(&mut self, id: ToastId, delay: Duration) {
        let Some(toast) = self.visible.iter_mut().find(|t| t.id() == id) else {
            return;
        };
        toast.generation += 1;
        toast.armed = delay;
        let generation = toast.generation;

        let handle = self
            .scheduler
            .schedule(Message::Expire { id, generation }, delay);
        self.timers.insert(id, handle);
    }

    fn disarm(&mut self, id: ToastId) {
        if let Some(handle) = self.timers.remove(&id) {
            self.scheduler.cancel(handle);
        }
    }

    fn expire(&mut self, id: ToastId, generation: u64) {
        let current = self
            .get(id)
            .is_some_and(|t| t.generation == generation && !t.is_closing());
        if !current || self.paused.contains(&id) {
            return;
        }
        self.timers.remove(&id);
        self.remove(id);
    }

    fn finish_exit(&mut self, id: ToastId) {
        if self.exits.remove(&id).is_none() {
            return;
        }
        if let Some(pos) = self.visible.iter().position(|t| t.id() == id) {
            self.visible.remove(pos);
            self.publish(Event::Removed(id));
        }
        self.promote_from_queue();
    }

    /// Promotes queued toasts, oldest first, while there is space.
    fn promote_from_queue(&mut self) {
        while self.visible.len() < MAX_VISIBLE {
            if let Some(toast) = self.queue.pop_front() {
                self.show(toast);
            } else {
                break;
            }
        }
    }

    fn publish(&self, event: Event) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

impl Manager<ManualScheduler<Message>> {
    /// Moves virtual time forward by `by`, handling each timer at its own
    /// instant so that timers armed along the way also fire in order.
    pub fn advance(&mut self, by: Duration) {
        let deadline = self.scheduler.now() + by;
        while let Some(message) = self.scheduler.pop_due(deadline) {
            self.handle_message(&message);
        }
        self.scheduler.jump_to(deadline);
    }
}

impl Default for Manager<ManualScheduler<Message>> {
    fn default() -> Self {
        Self::new(ManualScheduler::new())
    }
}
