use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a judge on the bench (e.g. `prosecutor`).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JudgeId(String);

impl JudgeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JudgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JudgeId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for JudgeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A rubric score, always within `1..=5`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Score(u8);

impl Score {
    pub const MIN: Score = Score(1);
    pub const MAX: Score = Score(5);

    pub fn new(value: i64) -> Result<Self, String> {
        if (1..=5).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(format!("score {} outside 1..=5", value))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Score {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Score> for i64 {
    fn from(s: Score) -> i64 {
        s.0 as i64
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One judge's assessment of one criterion. Untrusted input: citations may
/// point nowhere and the argument may misstate the evidence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Opinion {
    pub judge_id: JudgeId,
    pub criterion_id: String,
    pub score: Score,
    pub argument: String,
    /// `Evidence::location` values only.
    pub cited_evidence: Vec<String>,
}

impl Opinion {
    pub fn new(
        judge_id: impl Into<JudgeId>,
        criterion_id: impl Into<String>,
        score: Score,
        argument: impl Into<String>,
        cited_evidence: Vec<String>,
    ) -> Self {
        Self {
            judge_id: judge_id.into(),
            criterion_id: criterion_id.into(),
            score,
            argument: argument.into(),
            cited_evidence,
        }
    }
}
