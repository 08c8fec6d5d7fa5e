//! Core domain logic for devtime.
//!
//! This crate contains the fundamental types and logic for:
//! - Commit records: parsing `git log` lines into a timeline
//! - Timelines: ordering and filtering commits
//! - Estimation: turning commit gaps into an active development time estimate

pub mod commit;
mod estimate;
pub mod timeline;

pub use commit::{CommitRecord, LOG_FORMAT, OffsetMode, ParseError, parse_log};
pub use estimate::{
    DEFAULT_BREAK_THRESHOLD_SECS, DEFAULT_FALLBACK_SESSION_SECS, DevelopmentTimeReport,
    EstimateError, EstimatorConfig, Gap, estimate,
};
pub use timeline::{CommitTimeline, TimelineFilter};
