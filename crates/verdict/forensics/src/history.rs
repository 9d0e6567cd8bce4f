//! Commit-history protocol.

use crate::error::ExtractionError;
use crate::failure::failure_record;
use crate::process::{excerpt, ProcessRunner};
use std::collections::HashSet;
use std::path::Path;
use verdict_types::{Confidence, Evidence};

pub const CRITERION: &str = "git_forensic_analysis";

/// Locator recorded on history evidence.
pub const HISTORY_LOCATION: &str = ".git/log";

/// Commits this close together (first to last) count as one upload.
const BULK_WINDOW_SECS: i64 = 60;

/// Commit subjects kept as raw content.
const PREVIEW_COMMITS: usize = 5;

const FIELD_SEPARATOR: char = '\u{1f}';

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Commit {
    pub hash: String,
    /// Author time, seconds since the epoch.
    pub timestamp: i64,
    pub subject: String,
}

/// Shape of a commit history.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HistoryShape {
    /// At most one commit, or every commit inside the bulk window.
    BulkUpload,
    /// Several commits but no visible progression.
    Flat,
    /// More than three commits with more than two distinct messages.
    Progression,
}

/// Oldest first.
pub async fn read_history(runner: &ProcessRunner, repo: &Path) -> Result<Vec<Commit>, ExtractionError> {
    let output = runner
        .run(
            "git",
            &["log", "--reverse", "--format=%H%x1f%at%x1f%s"],
            Some(repo),
        )
        .await?;
    if !output.success() {
        return Err(ExtractionError::SourceUnavailable(format!(
            "git log failed: {}",
            excerpt(&output.stderr, 200)
        )));
    }
    Ok(parse_log(&output.stdout))
}

/// Parse `%H%x1f%at%x1f%s` lines. Malformed lines are skipped.
pub fn parse_log(stdout: &str) -> Vec<Commit> {
    stdout
        .lines()
        .filter_map(|line| {
            let mut fields = line.splitn(3, FIELD_SEPARATOR);
            let hash = fields.next()?.trim();
            let timestamp = fields.next()?.trim().parse().ok()?;
            let subject = fields.next().unwrap_or("").trim();
            (!hash.is_empty()).then(|| Commit {
                hash: hash.to_string(),
                timestamp,
                subject: subject.to_string(),
            })
        })
        .collect()
}

pub fn classify(commits: &[Commit]) -> HistoryShape {
    if commits.len() <= 1 {
        return HistoryShape::BulkUpload;
    }
    let first = commits.iter().map(|c| c.timestamp).min().unwrap_or(0);
    let last = commits.iter().map(|c| c.timestamp).max().unwrap_or(0);
    if last - first <= BULK_WINDOW_SECS {
        return HistoryShape::BulkUpload;
    }
    if commits.len() > 3 && distinct_subjects(commits) > 2 {
        HistoryShape::Progression
    } else {
        HistoryShape::Flat
    }
}

/// A checkout without `.git`: there is no history to read.
pub fn unversioned_evidence(criterion_id: &str) -> Evidence {
    Evidence::absent(
        criterion_id,
        "no version-control history: repository supplied without .git",
        1.0,
    )
}

/// Evidence for one criterion from the outcome of [`read_history`].
///
/// Commit subjects are authored by the audited repository, so they travel
/// as raw content only; the rationale states counts and the shape.
/// A failed `git log` yields a failure record, not a negative finding.
pub fn history_evidence(criterion_id: &str, history: Result<Vec<Commit>, ExtractionError>) -> Evidence {
    let commits = match history {
        Ok(commits) => commits,
        Err(err) => return failure_record(criterion_id, &err),
    };

    let preview = commits
        .iter()
        .take(PREVIEW_COMMITS)
        .map(|c| c.subject.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    let total = commits.len();
    let distinct = distinct_subjects(&commits);

    let evidence = match classify(&commits) {
        HistoryShape::BulkUpload => Evidence::new(
            criterion_id,
            false,
            HISTORY_LOCATION,
            format!("bulk upload: {total} commit(s) within {BULK_WINDOW_SECS}s"),
            Confidence::saturating(0.95),
        ),
        HistoryShape::Flat => Evidence::located(
            criterion_id,
            HISTORY_LOCATION,
            format!("{total} commits, {distinct} distinct message(s), no clear progression"),
            0.7,
        ),
        HistoryShape::Progression => Evidence::located(
            criterion_id,
            HISTORY_LOCATION,
            format!("{total} commits, {distinct} distinct messages, clear progression"),
            1.0,
        ),
    };
    evidence.with_raw_content(preview)
}

fn distinct_subjects(commits: &[Commit]) -> usize {
    commits
        .iter()
        .map(|c| c.subject.to_lowercase())
        .collect::<HashSet<_>>()
        .len()
}
