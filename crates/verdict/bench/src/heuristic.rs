//! Evidence-driven judges that need no model.
//!
//! Every posture reads the same signal, the mean of `found × confidence`
//! over the criterion's evidence, and maps it onto `1..=5`. Postures differ
//! only in how they round and what they forgive.

use crate::error::JudgmentError;
use crate::judge::{Judge, JudgmentRequest};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use verdict_types::{JudgeEvidence, JudgeId, Opinion, Score, NOT_APPLICABLE};

/// Confidence at which a negative finding counts as a confirmed gap.
const CONFIRMED_GAP: f64 = 0.9;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Posture {
    /// Rounds down and penalises confirmed gaps.
    Strict,
    /// Rounds to nearest and rewards any located effort.
    Lenient,
    /// Rounds to nearest.
    Pragmatic,
}

impl fmt::Display for Posture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => write!(f, "strict"),
            Self::Lenient => write!(f, "lenient"),
            Self::Pragmatic => write!(f, "pragmatic"),
        }
    }
}

/// `mean(found × confidence)`; zero for no evidence.
pub fn signal(evidence: &[JudgeEvidence]) -> f64 {
    if evidence.is_empty() {
        return 0.0;
    }
    let total: f64 = evidence
        .iter()
        .map(|e| if e.found { e.confidence } else { 0.0 })
        .sum();
    total / evidence.len() as f64
}

fn verified_locations(evidence: &[JudgeEvidence]) -> Vec<String> {
    evidence
        .iter()
        .filter(|e| e.found && e.location != NOT_APPLICABLE)
        .map(|e| e.location.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub struct HeuristicJudge {
    id: JudgeId,
    posture: Posture,
}

impl HeuristicJudge {
    pub fn new(id: impl Into<JudgeId>, posture: Posture) -> Self {
        Self {
            id: id.into(),
            posture,
        }
    }

    pub fn posture(&self) -> Posture {
        self.posture
    }

    /// The score this judge gives `evidence`.
    pub fn score(&self, evidence: &[JudgeEvidence]) -> i64 {
        let base = 1.0 + 4.0 * signal(evidence);
        let score = match self.posture {
            Posture::Strict => {
                let gap = evidence.iter().any(|e| {
                    !e.found && e.confidence >= CONFIRMED_GAP && e.location != NOT_APPLICABLE
                });
                base.floor() as i64 - i64::from(gap)
            }
            Posture::Lenient => {
                let effort = evidence.iter().any(|e| e.found);
                base.round() as i64 + i64::from(effort)
            }
            Posture::Pragmatic => base.round() as i64,
        };
        score.clamp(1, 5)
    }

    fn argument(&self, evidence: &[JudgeEvidence], cited: &[String]) -> String {
        if evidence.is_empty() {
            return format!("{} reading: no forensic evidence to assess", self.posture);
        }
        let strongest = evidence
            .iter()
            .max_by(|a, b| {
                let sa = if a.found { a.confidence } else { 0.0 };
                let sb = if b.found { b.confidence } else { 0.0 };
                sa.total_cmp(&sb)
            })
            .map(|e| e.rationale.as_str())
            .unwrap_or_default();
        format!(
            "{} reading: signal {:.2} over {} record(s), {} verified location(s). Key finding: {}",
            self.posture,
            signal(evidence),
            evidence.len(),
            cited.len(),
            strongest
        )
    }
}

#[async_trait]
impl Judge for HeuristicJudge {
    fn id(&self) -> &JudgeId {
        &self.id
    }

    async fn judge(&self, request: &JudgmentRequest) -> Result<Opinion, JudgmentError> {
        let cited = verified_locations(&request.evidence);
        let score = Score::new(self.score(&request.evidence)).map_err(|message| {
            JudgmentError::Malformed {
                judge: self.id.clone(),
                message,
            }
        })?;
        let argument = self.argument(&request.evidence, &cited);
        Ok(Opinion::new(
            self.id.clone(),
            request.criterion.id.as_str(),
            score,
            argument,
            cited,
        ))
    }
}
