// SPDX-License-Identifier: MPL-2.0
//! Toast notification system for user feedback.
//!
//! Toasts inform the user about the outcome of actions (note saved, file
//! deleted, errors) without blocking interaction.
//!
//! # Components
//!
//! - [`Toast`] - a single toast with its kind and timer bookkeeping
//! - [`Manager`] - queuing, timers and lifecycle management
//!
//! # Usage
//!
//! ```
//! use mdnotes::timer::ManualScheduler;
//! use mdnotes::ui::notifications::{Manager, EXIT_ANIMATION};
//!
//! let mut manager = Manager::new(ManualScheduler::new());
//! let id = manager.success("Note saved");
//!
//! manager.remove(id);
//! manager.advance(EXIT_ANIMATION);
//! assert!(!manager.has_toasts());
//! ```
//!
//! # Design Considerations
//!
//! - Default duration: 5s; zero disables auto-dismiss
//! - Max visible toasts: 3 (others are queued, oldest admitted first)
//! - Hovering pauses the countdown; leaving resumes it with the time left
//! - Closing toasts keep their slot for a 200ms exit window

mod manager;
mod notification;

pub use manager::{
    Event as NotificationEvent, Manager, Message as NotificationMessage, DEFAULT_DURATION,
    EXIT_ANIMATION, MAX_VISIBLE,
};
pub use notification::{Toast, ToastId, ToastKind};
