//! Analyze command for estimating development time.
//!
//! This module implements `devtime analyze`: it reads commit history (from git
//! or a captured log), estimates active development time and renders the
//! result as a human-readable report or JSON.

use std::fmt::Write as _;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use dt_core::commit::TIMESTAMP_FORMAT;
use dt_core::{CommitRecord, DevelopmentTimeReport, OffsetMode, TimelineFilter};
use serde::Serialize;

use crate::Config;
use crate::commands::util::{Bound, parse_datetime};
use crate::git;

#[derive(Debug, Default, Args)]
pub struct AnalyzeArgs {
    /// Repository to analyze (defaults to the current directory).
    #[arg(long, conflicts_with = "input")]
    pub repo: Option<PathBuf>,

    /// Read `hash|timestamp|author|message` lines from a file ("-" for stdin)
    /// instead of running git.
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Only read the current branch instead of all refs.
    #[arg(long, conflicts_with = "input")]
    pub branch_only: bool,

    /// Ignore commits before this time (e.g. 2026-01-15, '2 weeks ago').
    #[arg(long)]
    pub since: Option<String>,

    /// Ignore commits after this time.
    #[arg(long)]
    pub until: Option<String>,

    /// Only count commits whose author contains this text (case-insensitive).
    #[arg(long)]
    pub author: Option<String>,

    /// Convert commit times to UTC before measuring gaps.
    #[arg(long)]
    pub normalize_offsets: bool,

    /// Hide the per-commit timeline.
    #[arg(long)]
    pub no_timeline: bool,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

// ========== Duration Formatting ==========

/// Formats seconds as "Xh Ym" if >= 1 hour, "Xm" if >= 1 minute, else "Xs".
/// Negative durations are treated as 0s.
pub fn format_duration(secs: i64) -> String {
    if secs < 60 {
        return format!("{}s", secs.max(0));
    }
    let total_minutes = secs / 60;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours >= 1 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Formats seconds as "H.HH hours (M.M minutes)".
pub fn format_hours(secs: f64) -> String {
    format!("{:.2} hours ({:.1} minutes)", secs / 3600.0, secs / 60.0)
}

#[allow(clippy::cast_possible_truncation)]
fn round_secs(secs: f64) -> i64 {
    secs.round() as i64
}

// ========== Text Output ==========

/// Formats the human-readable report.
///
/// `records` must be the chronologically sorted commits the report was
/// computed from.
pub fn format_report(
    records: &[&CommitRecord],
    report: &DevelopmentTimeReport,
    show_timeline: bool,
) -> String {
    let mut output = String::new();

    writeln!(output, "DEVELOPMENT TIME REPORT").unwrap();
    writeln!(output, "Commits:       {}", report.commit_count).unwrap();
    writeln!(
        output,
        "First commit:  {}",
        report.first_commit_at.format(TIMESTAMP_FORMAT)
    )
    .unwrap();
    writeln!(
        output,
        "Last commit:   {}",
        report.last_commit_at.format(TIMESTAMP_FORMAT)
    )
    .unwrap();

    if show_timeline {
        writeln!(output).unwrap();
        writeln!(output, "TIMELINE").unwrap();
        writeln!(output, "────────").unwrap();

        for (i, record) in records.iter().enumerate() {
            if let Some(gap) = i.checked_sub(1).and_then(|prev| report.gaps.get(prev)) {
                let duration = format_duration(gap.duration_secs);
                let label = if gap.is_break { "break" } else { "active" };
                writeln!(output, "    +{duration:<7} {label}").unwrap();
            }
            writeln!(
                output,
                "{:<8}  {}  {}: {}",
                record.short_id(),
                record.timestamp.format(TIMESTAMP_FORMAT),
                record.author,
                record.message
            )
            .unwrap();
        }
    }

    let average = format_duration(round_secs(report.average_session_secs));
    let threshold = format_duration(report.break_threshold_secs);

    writeln!(output).unwrap();
    writeln!(output, "SESSIONS").unwrap();
    writeln!(output, "────────").unwrap();
    if report.used_fallback_average() {
        writeln!(
            output,
            "Active sessions:  0 (none under {threshold}, using default {average})"
        )
        .unwrap();
    } else {
        writeln!(
            output,
            "Active sessions:  {} (average {average})",
            report.active_session_count()
        )
        .unwrap();
    }
    writeln!(
        output,
        "Breaks:           {} (each counted as {average}, threshold {threshold})",
        report.break_count
    )
    .unwrap();

    writeln!(output).unwrap();
    writeln!(output, "SUMMARY").unwrap();
    writeln!(output, "───────").unwrap();
    writeln!(
        output,
        "Estimated time:   {}",
        format_hours(report.total_estimated_secs)
    )
    .unwrap();
    #[allow(clippy::cast_precision_loss)]
    let wall_clock_hours = report.wall_clock_secs as f64 / 3600.0;
    writeln!(output, "Wall clock:       {wall_clock_hours:.2} hours").unwrap();
    writeln!(
        output,
        "Efficiency:       {:.1}%",
        report.development_efficiency()
    )
    .unwrap();
    writeln!(
        output,
        "Averages applied: {}",
        report.substituted_session_count()
    )
    .unwrap();
    writeln!(output, "Sessions:         {}", report.session_count()).unwrap();
    writeln!(
        output,
        "Commit rate:      {:.2} commits/hour",
        report.commits_per_hour()
    )
    .unwrap();
    writeln!(
        output,
        "Time per commit:  {:.1} minutes",
        report.average_secs_per_commit() / 60.0
    )
    .unwrap();

    output
}

// ========== JSON Output ==========

/// JSON report structure.
#[derive(Debug, Serialize)]
pub struct JsonReport {
    pub commit_count: usize,
    pub first_commit_at: String,
    pub last_commit_at: String,
    pub total_estimated_secs: f64,
    pub average_session_secs: f64,
    pub used_fallback_average: bool,
    pub active_session_count: usize,
    pub break_count: usize,
    pub substituted_session_count: usize,
    pub session_count: usize,
    pub wall_clock_secs: i64,
    pub development_efficiency_pct: f64,
    pub commits_per_hour: f64,
    pub average_secs_per_commit: f64,
    pub break_threshold_secs: i64,
    pub gaps: Vec<JsonGap>,
}

#[derive(Debug, Serialize)]
pub struct JsonGap {
    pub from: String,
    pub to: String,
    pub duration_secs: i64,
    pub is_break: bool,
}

/// Formats report data as JSON.
pub fn format_report_json(
    records: &[&CommitRecord],
    report: &DevelopmentTimeReport,
) -> Result<String> {
    let gaps = records
        .windows(2)
        .zip(&report.gaps)
        .map(|(pair, gap)| JsonGap {
            from: pair[0].id.clone(),
            to: pair[1].id.clone(),
            duration_secs: gap.duration_secs,
            is_break: gap.is_break,
        })
        .collect();

    let json = JsonReport {
        commit_count: report.commit_count,
        first_commit_at: report.first_commit_at.format(TIMESTAMP_FORMAT).to_string(),
        last_commit_at: report.last_commit_at.format(TIMESTAMP_FORMAT).to_string(),
        total_estimated_secs: report.total_estimated_secs,
        average_session_secs: report.average_session_secs,
        used_fallback_average: report.used_fallback_average(),
        active_session_count: report.active_session_count(),
        break_count: report.break_count,
        substituted_session_count: report.substituted_session_count(),
        session_count: report.session_count(),
        wall_clock_secs: report.wall_clock_secs,
        development_efficiency_pct: report.development_efficiency(),
        commits_per_hour: report.commits_per_hour(),
        average_secs_per_commit: report.average_secs_per_commit(),
        break_threshold_secs: report.break_threshold_secs,
        gaps,
    };

    Ok(serde_json::to_string_pretty(&json)?)
}

// ========== Public Interface ==========

/// Runs the analyze command.
pub fn run<W: Write>(writer: &mut W, args: &AnalyzeArgs, config: &Config) -> Result<()> {
    let offset_mode = if args.normalize_offsets {
        OffsetMode::Normalize
    } else {
        config.offset_mode
    };

    let log = match &args.input {
        Some(path) => read_input(path)?,
        None => git::read_log(args.repo.as_deref(), config.all_refs && !args.branch_only)?,
    };

    let filter = timeline_filter(args, offset_mode)?;
    let timeline = dt_core::parse_log(&log, offset_mode)
        .context("failed to parse commit log")?
        .filter(&filter);

    let report = dt_core::estimate(&timeline, &config.estimator)
        .context("failed to estimate development time")?;
    let records = timeline.sorted_records();

    if args.json {
        writeln!(writer, "{}", format_report_json(&records, &report)?)?;
    } else {
        write!(
            writer,
            "{}",
            format_report(&records, &report, !args.no_timeline)
        )?;
    }

    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("failed to read commit log from stdin")?;
        return Ok(input);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn timeline_filter(args: &AnalyzeArgs, mode: OffsetMode) -> Result<TimelineFilter> {
    let since = args
        .since
        .as_deref()
        .map(|s| parse_datetime(s, mode, Bound::Start))
        .transpose()
        .context("invalid --since")?;
    let until = args
        .until
        .as_deref()
        .map(|s| parse_datetime(s, mode, Bound::End))
        .transpose()
        .context("invalid --until")?;

    Ok(TimelineFilter {
        since,
        until,
        author: args.author.clone(),
    })
}
