//! The judge seam: a request carrying sanitised evidence, answered by one
//! opinion.

use crate::error::JudgmentError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use verdict_types::{Criterion, JudgeEvidence, JudgeId, Opinion, Score};

/// What a judge is told about the criterion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CriterionBrief {
    pub id: String,
    pub name: String,
    pub success_pattern: String,
    pub failure_pattern: String,
}

impl From<&Criterion> for CriterionBrief {
    fn from(c: &Criterion) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            success_pattern: c.success_pattern.clone(),
            failure_pattern: c.failure_pattern.clone(),
        }
    }
}

/// One judge, one criterion. Evidence is the judge-facing view only; raw
/// content cannot be expressed in this type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JudgmentRequest {
    pub judge_id: JudgeId,
    pub criterion: CriterionBrief,
    pub evidence: Vec<JudgeEvidence>,
}

/// The wire shape of an answer, before validation.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct JudgmentResponse {
    pub score: i64,
    pub argument: String,
    #[serde(default)]
    pub cited_evidence: Vec<String>,
}

impl JudgmentResponse {
    /// Validate into an opinion for `request`.
    pub fn into_opinion(self, request: &JudgmentRequest) -> Result<Opinion, JudgmentError> {
        let score = Score::new(self.score).map_err(|message| JudgmentError::Malformed {
            judge: request.judge_id.clone(),
            message,
        })?;
        Ok(Opinion::new(
            request.judge_id.clone(),
            request.criterion.id.as_str(),
            score,
            self.argument,
            self.cited_evidence,
        ))
    }
}

/// A member of the bench.
#[async_trait]
pub trait Judge: Send + Sync {
    fn id(&self) -> &JudgeId;

    async fn judge(&self, request: &JudgmentRequest) -> Result<Opinion, JudgmentError>;
}

/// Reject an opinion that answers a different judge or criterion.
pub fn check_addressed(request: &JudgmentRequest, opinion: &Opinion) -> Result<(), JudgmentError> {
    if opinion.judge_id == request.judge_id && opinion.criterion_id == request.criterion.id {
        return Ok(());
    }
    Err(JudgmentError::Mismatch {
        judge: request.judge_id.clone(),
        expected: format!("{}/{}", request.judge_id, request.criterion.id),
        got: format!("{}/{}", opinion.judge_id, opinion.criterion_id),
    })
}
