//! The judicial fan-out: every judge rules on every criterion against the
//! same frozen evidence snapshot.

use crate::error::JudgmentError;
use crate::judge::{check_addressed, CriterionBrief, Judge, JudgmentRequest};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};
use verdict_evidence::EvidenceSnapshot;
use verdict_types::{Criterion, JudgeFailure, JudgeId, Opinion};

/// Time box and retry budget for each judge invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts per invocation, including the first. At least one.
    pub max_attempts: u32,
    pub backoff: Duration,
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            backoff: Duration::from_millis(2000),
            timeout: Duration::from_secs(120),
        }
    }
}

/// Everything the bench produced: opinions in criterion-then-judge order,
/// plus the invocations that never yielded one.
#[derive(Clone, Debug, Default)]
pub struct BenchOutcome {
    pub opinions: Vec<Opinion>,
    pub failures: Vec<JudgeFailure>,
}

#[derive(Default)]
pub struct Bench {
    judges: Vec<Arc<dyn Judge>>,
    policy: RetryPolicy,
}

impl Bench {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            judges: Vec::new(),
            policy,
        }
    }

    pub fn with_judge(mut self, judge: Arc<dyn Judge>) -> Self {
        self.judges.push(judge);
        self
    }

    pub fn judge_ids(&self) -> Vec<JudgeId> {
        self.judges.iter().map(|j| j.id().clone()).collect()
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn is_empty(&self) -> bool {
        self.judges.is_empty()
    }

    /// Run every (criterion, judge) pair concurrently and wait for all of
    /// them.
    #[instrument(skip_all, fields(judges = self.judges.len(), criteria = criteria.len()))]
    pub async fn convene(&self, criteria: &[Criterion], snapshot: &EvidenceSnapshot) -> BenchOutcome {
        let requests: Vec<(&dyn Judge, JudgmentRequest)> = criteria
            .iter()
            .flat_map(|criterion| {
                let brief = CriterionBrief::from(criterion);
                let evidence = snapshot.judge_evidence_for(&criterion.id);
                self.judges.iter().map(move |judge| {
                    (
                        judge.as_ref(),
                        JudgmentRequest {
                            judge_id: judge.id().clone(),
                            criterion: brief.clone(),
                            evidence: evidence.clone(),
                        },
                    )
                })
            })
            .collect();

        let results = join_all(
            requests
                .iter()
                .map(|(judge, request)| self.invoke(*judge, request)),
        )
        .await;

        let mut outcome = BenchOutcome::default();
        for result in results {
            match result {
                Ok(opinion) => outcome.opinions.push(opinion),
                Err(failure) => outcome.failures.push(failure),
            }
        }
        info!(
            opinions = outcome.opinions.len(),
            failures = outcome.failures.len(),
            "bench adjourned"
        );
        outcome
    }

    /// One time-boxed, retried invocation.
    pub async fn invoke(&self, judge: &dyn Judge, request: &JudgmentRequest) -> Result<Opinion, JudgeFailure> {
        let attempts = self.policy.max_attempts.max(1);
        let mut last = None;
        for attempt in 1..=attempts {
            let outcome = match tokio::time::timeout(self.policy.timeout, judge.judge(request)).await {
                Ok(Ok(opinion)) => check_addressed(request, &opinion).map(|()| opinion),
                Ok(Err(err)) => Err(err),
                Err(_) => Err(JudgmentError::Timeout {
                    judge: request.judge_id.clone(),
                    timeout: self.policy.timeout,
                }),
            };
            match outcome {
                Ok(opinion) => return Ok(opinion),
                Err(err) => {
                    warn!(
                        judge = %request.judge_id,
                        criterion = %request.criterion.id,
                        attempt,
                        error = %err,
                        "judgment failed"
                    );
                    last = Some(err);
                }
            }
            if attempt < attempts {
                tokio::time::sleep(self.policy.backoff).await;
            }
        }
        Err(JudgeFailure {
            judge_id: request.judge_id.clone(),
            criterion_id: request.criterion.id.clone(),
            attempts,
            message: last.map(|e| e.to_string()).unwrap_or_default(),
        })
    }
}
