use crate::opinion::{JudgeId, Opinion};
use serde::{Deserialize, Serialize};

/// One side of a recorded disagreement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DissentVoice {
    pub judge_id: JudgeId,
    /// Score as submitted, before any overrule.
    pub score: u8,
    /// Argument excerpt as submitted.
    pub argument: String,
}

/// Structured disagreement summary attached when the judges' score range
/// exceeds the dissent threshold.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dissent {
    /// `max - min` of the submitted scores.
    pub range: u8,
    pub minority: Vec<DissentVoice>,
    pub majority: Vec<DissentVoice>,
    pub summary: String,
}

/// The Chief Justice's ruling on a single criterion. Immutable once built.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CriterionResult {
    pub criterion_id: String,
    pub criterion_name: String,
    /// `1.0..=5.0`, one decimal.
    pub final_score: f64,
    /// Effective opinions (after Fact Supremacy), in canonical judge order.
    pub opinions: Vec<Opinion>,
    pub dissent: Option<Dissent>,
    pub remediation: String,
    /// Security Rule clamped the score.
    pub security_capped: bool,
    /// Judges whose opinions were overruled.
    pub overruled: Vec<JudgeId>,
    /// Evidence for this criterion was synthesised after a forensic failure.
    pub degraded: bool,
}

/// A judge that produced no usable opinion for a criterion after every
/// attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JudgeFailure {
    pub judge_id: JudgeId,
    pub criterion_id: String,
    pub attempts: u32,
    pub message: String,
}

impl CriterionResult {
    pub fn has_dissent(&self) -> bool {
        self.dissent.is_some()
    }

    /// Score at or below the critical threshold.
    pub fn is_critical(&self) -> bool {
        self.final_score <= 2.0
    }
}
