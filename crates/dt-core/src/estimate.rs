//! Development time estimation.
//!
//! Estimates "keyboard time" from commit timestamps rather than wall-clock
//! time.
//!
//! # Algorithm Summary
//!
//! 1. Sort commits by timestamp and compute the gap between each consecutive pair
//! 2. Gaps shorter than the break threshold are active sessions; the rest are breaks
//! 3. Average the active sessions (or fall back to a fixed length when there are none)
//! 4. Sum active gaps as measured, substituting the average for every break
//! 5. Add one more average session for work after the final commit

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::timeline::CommitTimeline;

/// Gaps at or above this many seconds are breaks.
pub const DEFAULT_BREAK_THRESHOLD_SECS: i64 = 3600;

/// Session length assumed when no active sessions were measured.
pub const DEFAULT_FALLBACK_SESSION_SECS: i64 = 1800;

const SECS_PER_HOUR: f64 = 3600.0;

/// Errors that prevent a report from being produced.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EstimateError {
    /// The timeline had no commits.
    #[error("no commits to analyze")]
    InsufficientData,

    /// A configuration value was out of range.
    #[error("invalid estimator config: {field} {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },
}

/// Configuration for development time estimation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Gaps of at least this many seconds count as breaks.
    /// Default: 3600 (1 hour).
    pub break_threshold_secs: i64,

    /// Average session length used when every gap is a break.
    /// Default: 1800 (30 minutes).
    pub fallback_session_secs: i64,

    /// Add one average session after the last commit.
    /// Default: true.
    pub trailing_extrapolation: bool,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            break_threshold_secs: DEFAULT_BREAK_THRESHOLD_SECS,
            fallback_session_secs: DEFAULT_FALLBACK_SESSION_SECS,
            trailing_extrapolation: true,
        }
    }
}

impl EstimatorConfig {
    pub const fn validate(&self) -> Result<(), EstimateError> {
        if self.break_threshold_secs <= 0 {
            return Err(EstimateError::InvalidConfig {
                field: "break_threshold_secs",
                reason: "must be positive",
            });
        }
        if self.fallback_session_secs < 0 {
            return Err(EstimateError::InvalidConfig {
                field: "fallback_session_secs",
                reason: "must not be negative",
            });
        }
        Ok(())
    }
}

/// Time between two consecutive commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Gap {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Never negative.
    pub duration_secs: i64,
    pub is_break: bool,
}

impl Gap {
    fn between(start: NaiveDateTime, end: NaiveDateTime, break_threshold_secs: i64) -> Self {
        // Only reachable with unsorted input; clamp rather than go negative.
        let duration_secs = (end - start).num_seconds().max(0);
        Self {
            start,
            end,
            duration_secs,
            is_break: duration_secs >= break_threshold_secs,
        }
    }
}

/// Estimated development time and supporting statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DevelopmentTimeReport {
    pub commit_count: usize,
    pub first_commit_at: NaiveDateTime,
    pub last_commit_at: NaiveDateTime,

    /// Every gap in chronological order.
    pub gaps: Vec<Gap>,

    /// Durations of the gaps that were not breaks.
    pub active_session_durations: Vec<i64>,

    pub break_count: usize,

    /// Mean of `active_session_durations`, or the fallback if empty.
    pub average_session_secs: f64,

    pub total_estimated_secs: f64,

    /// Last commit minus first commit.
    pub wall_clock_secs: i64,

    /// Threshold the gaps were classified against.
    pub break_threshold_secs: i64,

    /// Whether the trailing session after the last commit was included.
    pub trailing_extrapolation: bool,
}

impl DevelopmentTimeReport {
    pub fn active_session_count(&self) -> usize {
        self.active_session_durations.len()
    }

    /// True when no active session was measured and the fallback was used.
    pub fn used_fallback_average(&self) -> bool {
        self.active_session_durations.is_empty()
    }

    /// Number of places the average was substituted for a measurement:
    /// every break, plus the trailing session.
    pub const fn substituted_session_count(&self) -> usize {
        if self.trailing_extrapolation {
            self.break_count + 1
        } else {
            self.break_count
        }
    }

    /// Number of separate working sessions the breaks divide the history into.
    pub const fn session_count(&self) -> usize {
        self.break_count + 1
    }

    /// Estimated time as a percentage of wall-clock time, or 0 without a span.
    #[allow(clippy::cast_precision_loss)]
    pub fn development_efficiency(&self) -> f64 {
        if self.wall_clock_secs > 0 {
            self.total_estimated_secs / self.wall_clock_secs as f64 * 100.0
        } else {
            0.0
        }
    }

    /// Commits per estimated hour, or 0 when nothing was estimated.
    #[allow(clippy::cast_precision_loss)]
    pub fn commits_per_hour(&self) -> f64 {
        let total_hours = self.total_estimated_secs / SECS_PER_HOUR;
        if total_hours > 0.0 {
            self.commit_count as f64 / total_hours
        } else {
            0.0
        }
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn average_secs_per_commit(&self) -> f64 {
        self.total_estimated_secs / self.commit_count as f64
    }
}

/// Estimate development time for a commit timeline.
///
/// The timeline is sorted by timestamp first if needed. A single commit
/// yields the fallback session length.
///
/// # Errors
///
/// Returns [`EstimateError::InsufficientData`] for an empty timeline and
/// [`EstimateError::InvalidConfig`] if `config` fails validation.
pub fn estimate(
    timeline: &CommitTimeline,
    config: &EstimatorConfig,
) -> Result<DevelopmentTimeReport, EstimateError> {
    config.validate()?;

    if !timeline.is_sorted() {
        tracing::debug!("commit timeline out of order, sorting before estimation");
    }
    let records = timeline.sorted_records();
    let (Some(first), Some(last)) = (records.first(), records.last()) else {
        return Err(EstimateError::InsufficientData);
    };

    let gaps: Vec<Gap> = records
        .windows(2)
        .map(|pair| {
            Gap::between(
                pair[0].timestamp,
                pair[1].timestamp,
                config.break_threshold_secs,
            )
        })
        .collect();

    let active_session_durations: Vec<i64> = gaps
        .iter()
        .filter(|gap| !gap.is_break)
        .map(|gap| gap.duration_secs)
        .collect();
    let break_count = gaps.len() - active_session_durations.len();

    // Must be fixed before the fold; breaks are filled with this value.
    let average_session_secs =
        average_session_secs(&active_session_durations, config.fallback_session_secs);

    let total_estimated_secs = measured_secs(&gaps, average_session_secs)
        + trailing_session_secs(average_session_secs, config);

    let report = DevelopmentTimeReport {
        commit_count: records.len(),
        first_commit_at: first.timestamp,
        last_commit_at: last.timestamp,
        gaps,
        active_session_durations,
        break_count,
        average_session_secs,
        total_estimated_secs,
        wall_clock_secs: (last.timestamp - first.timestamp).num_seconds(),
        break_threshold_secs: config.break_threshold_secs,
        trailing_extrapolation: config.trailing_extrapolation,
    };

    tracing::debug!(
        commits = report.commit_count,
        active = report.active_session_count(),
        breaks = report.break_count,
        average_session_secs,
        total_estimated_secs,
        "estimated development time"
    );

    Ok(report)
}

#[allow(clippy::cast_precision_loss)]
fn average_session_secs(active: &[i64], fallback_secs: i64) -> f64 {
    if active.is_empty() {
        return fallback_secs as f64;
    }
    active.iter().sum::<i64>() as f64 / active.len() as f64
}

/// Sum of gaps, with the average standing in for each break.
#[allow(clippy::cast_precision_loss)]
fn measured_secs(gaps: &[Gap], average_session_secs: f64) -> f64 {
    gaps.iter().fold(0.0, |total, gap| {
        if gap.is_break {
            total + average_session_secs
        } else {
            total + gap.duration_secs as f64
        }
    })
}

/// Unmeasured work after the final commit.
fn trailing_session_secs(average_session_secs: f64, config: &EstimatorConfig) -> f64 {
    if config.trailing_extrapolation {
        average_session_secs
    } else {
        0.0
    }
}
