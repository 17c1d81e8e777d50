// SPDX-License-Identifier: MPL-2.0
//! Date formatting for note listings.

use chrono::{DateTime, TimeZone};
use std::fmt::Display;

/// Formats a date as `15 January 2025`.
pub fn format_date<Tz>(date: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    date.format("%d %B %Y").to_string()
}
