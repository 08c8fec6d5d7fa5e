//! Commit records and parsing of `git log` output.
//!
//! The expected input is one commit per line in the shape produced by
//! [`LOG_FORMAT`]: `hash|author-date|author-name|subject`.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::timeline::CommitTimeline;

/// Pretty-format string passed to `git log --pretty=format:`.
pub const LOG_FORMAT: &str = "%H|%ai|%an|%s";

/// Layout of the date/time prefix of an `%ai` timestamp.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Length of `YYYY-MM-DD HH:MM:SS`.
const TIMESTAMP_PREFIX_LEN: usize = 19;

/// Errors produced while reading commit log lines.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The line did not contain all four `|`-separated fields.
    #[error("line {line}: expected `hash|timestamp|author|message`, found {found} field(s)")]
    MissingFields { line: usize, found: usize },

    /// The timestamp field could not be parsed.
    #[error("line {line}: invalid timestamp {value:?}")]
    InvalidTimestamp { line: usize, value: String },
}

/// How UTC offsets on commit timestamps are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffsetMode {
    /// Keep the local wall-clock time and drop the offset.
    ///
    /// Commits authored under different offsets produce skewed gaps.
    #[default]
    Discard,
    /// Convert to UTC using the offset, then drop it.
    ///
    /// Timestamps without an offset are read as if they were already UTC.
    /// A malformed offset is an error.
    Normalize,
}

/// A single commit from the version-control log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// Commit hash or other opaque identifier.
    pub id: String,
    /// When the commit was authored, without timezone.
    pub timestamp: NaiveDateTime,
    /// Author name.
    pub author: String,
    /// Commit subject line.
    pub message: String,
}

impl CommitRecord {
    pub fn new(
        id: impl Into<String>,
        timestamp: NaiveDateTime,
        author: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            timestamp,
            author: author.into(),
            message: message.into(),
        }
    }

    /// First eight characters of the identifier, for display.
    pub fn short_id(&self) -> &str {
        self.id
            .char_indices()
            .nth(8)
            .map_or(self.id.as_str(), |(idx, _)| &self.id[..idx])
    }
}

/// Parses a git `%ai` timestamp such as `2026-01-29 13:03:12 +0100`.
///
/// Returns `None` if the date/time prefix is malformed. In
/// [`OffsetMode::Normalize`] a timestamp with nothing after the prefix is
/// read as UTC, and anything else after it must be a valid offset.
pub fn parse_timestamp(raw: &str, mode: OffsetMode) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    let prefix = raw.get(..TIMESTAMP_PREFIX_LEN)?;
    let naive = NaiveDateTime::parse_from_str(prefix, TIMESTAMP_FORMAT).ok()?;

    match mode {
        OffsetMode::Discard => Some(naive),
        OffsetMode::Normalize if raw[TIMESTAMP_PREFIX_LEN..].trim().is_empty() => Some(naive),
        OffsetMode::Normalize => DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S %z")
            .ok()
            .map(|dt| dt.naive_utc()),
    }
}

/// Parses one log line. `line` is the 1-based line number used in errors.
pub fn parse_log_line(
    text: &str,
    line: usize,
    mode: OffsetMode,
) -> Result<CommitRecord, ParseError> {
    let fields: Vec<&str> = text.splitn(4, '|').collect();
    let [id, timestamp, author, message] = fields[..] else {
        return Err(ParseError::MissingFields {
            line,
            found: fields.len(),
        });
    };

    let timestamp =
        parse_timestamp(timestamp, mode).ok_or_else(|| ParseError::InvalidTimestamp {
            line,
            value: timestamp.to_string(),
        })?;

    Ok(CommitRecord::new(id, timestamp, author, message))
}

/// Parses a whole log, skipping blank lines.
pub fn parse_log(input: &str, mode: OffsetMode) -> Result<CommitTimeline, ParseError> {
    input
        .lines()
        .enumerate()
        .filter(|(_, text)| !text.trim().is_empty())
        .map(|(idx, text)| parse_log_line(text, idx + 1, mode))
        .collect()
}
