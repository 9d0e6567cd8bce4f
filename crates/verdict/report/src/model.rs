//! The report document model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use verdict_justice::VerdictSummary;
use verdict_types::{Criterion, CriterionResult, JudgeFailure, Rubric};

/// Identity and provenance of one audit run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub run_id: String,
    pub repo_locator: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub rubric_name: String,
    pub rubric_version: String,
    /// Digest of the frozen evidence ledger the judges saw.
    pub evidence_digest: String,
}

impl RunMetadata {
    /// Stamp a fresh run. `finished_at` starts equal to `started_at`.
    pub fn begin(repo_locator: impl Into<String>, rubric: &Rubric) -> Self {
        let now = Utc::now();
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            repo_locator: repo_locator.into(),
            started_at: now,
            finished_at: now,
            rubric_name: rubric.name.clone(),
            rubric_version: rubric.version.clone(),
            evidence_digest: String::new(),
        }
    }

    pub fn with_evidence_digest(mut self, digest: impl Into<String>) -> Self {
        self.evidence_digest = digest.into();
        self
    }

    pub fn finish(mut self) -> Self {
        self.finished_at = Utc::now();
        self
    }
}

/// Everything a rendered report says.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    pub metadata: RunMetadata,
    pub summary: VerdictSummary,
    /// Rulings in rubric order.
    pub criteria: Vec<CriterionResult>,
    /// Evidence keys synthesised by the degraded path.
    pub degraded_keys: Vec<String>,
    pub judge_failures: Vec<JudgeFailure>,
    /// Extractor failures, one message each.
    pub extraction_failures: Vec<String>,
}

impl AuditReport {
    pub fn new(metadata: RunMetadata, criteria: Vec<CriterionResult>, rubric_criteria: &[Criterion]) -> Self {
        let summary = VerdictSummary::from_results(&criteria, rubric_criteria);
        Self {
            metadata,
            summary,
            criteria,
            degraded_keys: Vec::new(),
            judge_failures: Vec::new(),
            extraction_failures: Vec::new(),
        }
    }

    pub fn with_degraded_keys(mut self, keys: Vec<String>) -> Self {
        self.degraded_keys = keys;
        self
    }

    pub fn with_judge_failures(mut self, failures: Vec<JudgeFailure>) -> Self {
        self.judge_failures = failures;
        self
    }

    pub fn with_extraction_failures(mut self, failures: Vec<String>) -> Self {
        self.extraction_failures = failures;
        self
    }

    /// Criteria scoring 2 or less, in report order.
    pub fn critical(&self) -> impl Iterator<Item = &CriterionResult> {
        self.criteria.iter().filter(|r| r.is_critical())
    }

    pub fn has_forensic_notes(&self) -> bool {
        !(self.degraded_keys.is_empty() && self.judge_failures.is_empty() && self.extraction_failures.is_empty())
    }

    pub fn score_of(&self, criterion_id: &str) -> Option<f64> {
        self.criteria
            .iter()
            .find(|r| r.criterion_id == criterion_id)
            .map(|r| r.final_score)
    }
}
