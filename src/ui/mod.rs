// SPDX-License-Identifier: MPL-2.0
//! User-facing components shared by every view.

pub mod notifications;
pub mod theming;
