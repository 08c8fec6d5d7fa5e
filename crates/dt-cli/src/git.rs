//! Commit history from the `git` executable.

use std::path::Path;
use std::process::Command;

use anyhow::{Result, bail};
use dt_core::LOG_FORMAT;

/// stderr fragment git prints for a repository without commits.
const NO_COMMITS_YET: &str = "does not have any commits yet";

/// Builds the `git log` arguments, oldest commit first.
pub fn log_args(all_refs: bool) -> Vec<String> {
    let mut args = vec!["log".to_string()];
    if all_refs {
        args.push("--all".to_string());
    }
    args.push(format!("--pretty=format:{LOG_FORMAT}"));
    args.push("--reverse".to_string());
    args
}

/// Runs `git log` and returns its raw output.
///
/// A repository without commits yields an empty string.
pub fn read_log(repo: Option<&Path>, all_refs: bool) -> Result<String> {
    let mut cmd = Command::new("git");
    if let Some(repo) = repo {
        cmd.arg("-C").arg(repo);
    }
    cmd.args(log_args(all_refs));

    tracing::info!(repo = ?repo, all_refs, "reading git log");

    let output = cmd.output().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            anyhow::anyhow!("git executable not found on PATH")
        } else {
            anyhow::Error::new(e).context("failed to run git log")
        }
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        if stderr.contains(NO_COMMITS_YET) {
            tracing::debug!("repository has no commits");
            return Ok(String::new());
        }
        bail!("git log exited with status {}: {}", output.status, stderr.trim());
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_args_all_refs() {
        assert_eq!(
            log_args(true),
            ["log", "--all", "--pretty=format:%H|%ai|%an|%s", "--reverse"]
        );
    }

    #[test]
    fn test_log_args_current_branch() {
        assert_eq!(
            log_args(false),
            ["log", "--pretty=format:%H|%ai|%an|%s", "--reverse"]
        );
    }
}
