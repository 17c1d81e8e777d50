// SPDX-License-Identifier: MPL-2.0
//! `mdnotes` is a small markdown note editor core.
//!
//! It provides a directory-backed note editor, a queued toast notification
//! system driven by message-based timers, and a light/dark theme preference
//! persisted across sessions.

#![doc(html_root_url = "https://docs.rs/mdnotes/0.1.0")]

pub mod app;
pub mod editor;
pub mod error;
pub mod storage;
pub mod timer;
pub mod ui;
