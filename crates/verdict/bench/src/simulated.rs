//! A scripted judge for testing.
//!
//! Produces fixed opinions per criterion and can be told to fail, stall or
//! answer for the wrong criterion a given number of times.

use crate::error::JudgmentError;
use crate::judge::{Judge, JudgmentRequest};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use verdict_types::{JudgeId, Opinion, Score};

#[derive(Clone, Debug)]
struct Scripted {
    score: Score,
    argument: String,
    cited: Vec<String>,
}

/// How a scripted failure manifests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimulatedFault {
    Malformed,
    Transport,
    /// Sleep past any reasonable timeout.
    Stall,
    /// Answer for a different criterion.
    Misaddressed,
}

pub struct SimulatedJudge {
    id: JudgeId,
    default: Scripted,
    opinions: BTreeMap<String, Scripted>,
    fault: SimulatedFault,
    failures_left: AtomicUsize,
    calls: AtomicUsize,
}

impl SimulatedJudge {
    /// Scores every criterion `score` with no citations.
    pub fn constant(id: impl Into<JudgeId>, score: Score) -> Self {
        let id = id.into();
        Self {
            default: Scripted {
                score,
                argument: format!("{id} scores {score}"),
                cited: Vec::new(),
            },
            id,
            opinions: BTreeMap::new(),
            fault: SimulatedFault::Transport,
            failures_left: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_opinion(
        mut self,
        criterion_id: impl Into<String>,
        score: Score,
        argument: impl Into<String>,
        cited: Vec<String>,
    ) -> Self {
        self.opinions.insert(
            criterion_id.into(),
            Scripted {
                score,
                argument: argument.into(),
                cited,
            },
        );
        self
    }

    /// Fail the first `times` calls with `fault`.
    pub fn failing_first(mut self, times: usize, fault: SimulatedFault) -> Self {
        self.fault = fault;
        self.failures_left = AtomicUsize::new(times);
        self
    }

    /// Fail every call with `fault`.
    pub fn always_failing(self, fault: SimulatedFault) -> Self {
        self.failing_first(usize::MAX, fault)
    }

    /// Calls received so far, failed ones included.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn take_failure(&self) -> bool {
        self.failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl Judge for SimulatedJudge {
    fn id(&self) -> &JudgeId {
        &self.id
    }

    async fn judge(&self, request: &JudgmentRequest) -> Result<Opinion, JudgmentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let criterion = request.criterion.id.as_str();
        if self.take_failure() {
            match self.fault {
                SimulatedFault::Malformed => {
                    return Err(JudgmentError::Malformed {
                        judge: self.id.clone(),
                        message: "simulated malformed response".into(),
                    })
                }
                SimulatedFault::Transport => {
                    return Err(JudgmentError::Transport {
                        judge: self.id.clone(),
                        message: "simulated transport failure".into(),
                    })
                }
                SimulatedFault::Stall => tokio::time::sleep(Duration::from_secs(3600)).await,
                SimulatedFault::Misaddressed => {
                    return Ok(Opinion::new(
                        self.id.clone(),
                        format!("{criterion}_elsewhere"),
                        self.default.score,
                        "answering another question",
                        Vec::new(),
                    ))
                }
            }
        }
        let scripted = self.opinions.get(criterion).unwrap_or(&self.default);
        Ok(Opinion::new(
            self.id.clone(),
            criterion,
            scripted.score,
            scripted.argument.clone(),
            scripted.cited.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::judge::fixtures::request;

    #[tokio::test]
    async fn scripted_opinions_and_failures() {
        let judge = SimulatedJudge::constant("defense", Score::MAX)
            .with_opinion("b", Score::MIN, "weak", vec!["src/b.py".into()])
            .failing_first(1, SimulatedFault::Malformed);

        let err = judge.judge(&request("defense", "a", vec![])).await.unwrap_err();
        assert!(matches!(err, JudgmentError::Malformed { .. }));

        let a = judge.judge(&request("defense", "a", vec![])).await.unwrap();
        assert_eq!(a.score, Score::MAX);
        let b = judge.judge(&request("defense", "b", vec![])).await.unwrap();
        assert_eq!(b.score, Score::MIN);
        assert_eq!(b.cited_evidence, vec!["src/b.py".to_string()]);
        assert_eq!(judge.calls(), 3);
    }
}
