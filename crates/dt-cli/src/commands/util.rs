//! Shared utilities for CLI commands.

use std::sync::LazyLock;

use anyhow::Context;
use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, Utc};
use dt_core::OffsetMode;
use regex::Regex;

/// Pre-compiled regex for relative time parsing.
static RELATIVE_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+(minute|hour|day|week)s?\s+ago$").unwrap());

/// Conservative bounds for relative time parsing (~1000 years in minutes).
const MAX_RELATIVE_MINUTES: i64 = 1000 * 365 * 24 * 60;

/// Which end of a range a bare date stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// `2026-01-15` means 00:00:00 that day.
    Start,
    /// `2026-01-15` means 23:59:59 that day.
    End,
}

/// Parse a datetime string as an absolute or relative time.
///
/// Commit timestamps carry no timezone, so results are naive times on the
/// same clock as the commits: local wall-clock time for
/// [`OffsetMode::Discard`], UTC for [`OffsetMode::Normalize`].
///
/// Supports:
/// - ISO 8601: "2026-01-15T10:30:00Z"
/// - Git style: "2026-01-15 10:30:00"
/// - Date only: "2026-01-15" (start or end of day, per `bound`)
/// - Relative: "2 hours ago", "30 minutes ago", "1 day ago", "1 week ago"
pub fn parse_datetime(s: &str, mode: OffsetMode, bound: Bound) -> anyhow::Result<NaiveDateTime> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(match mode {
            OffsetMode::Discard => dt.naive_local(),
            OffsetMode::Normalize => dt.naive_utc(),
        });
    }

    for format in [dt_core::commit::TIMESTAMP_FORMAT, "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(naive);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        let (hour, minute, second) = match bound {
            Bound::Start => (0, 0, 0),
            Bound::End => (23, 59, 59),
        };
        return date
            .and_hms_opt(hour, minute, second)
            .context("invalid time of day");
    }

    // Try relative time: "N hours/minutes/days/weeks ago"
    let Some(caps) = RELATIVE_TIME_RE.captures(s) else {
        anyhow::bail!(
            "Invalid datetime: {s}. Use ISO 8601 (e.g., 2026-01-15T10:30:00Z), a date (e.g., 2026-01-15) or relative (e.g., '2 hours ago')"
        );
    };

    let n: i64 = caps[1]
        .parse()
        .context("failed to parse number in relative time")?;

    let (max_for_unit, minutes_per_unit) = match &caps[2] {
        "minute" => (MAX_RELATIVE_MINUTES, 1),
        "hour" => (MAX_RELATIVE_MINUTES / 60, 60),
        "day" => (MAX_RELATIVE_MINUTES / (60 * 24), 60 * 24),
        "week" => (MAX_RELATIVE_MINUTES / (60 * 24 * 7), 60 * 24 * 7),
        unit => anyhow::bail!("Unknown time unit: {unit}"),
    };

    if n > max_for_unit {
        anyhow::bail!("Relative time value too large: {n} {}", &caps[2]);
    }

    // Safe to create Duration now that we've validated the range
    let duration = Duration::minutes(n * minutes_per_unit);
    Ok(now(mode) - duration)
}

fn now(mode: OffsetMode) -> NaiveDateTime {
    match mode {
        OffsetMode::Discard => Local::now().naive_local(),
        OffsetMode::Normalize => Utc::now().naive_utc(),
    }
}
