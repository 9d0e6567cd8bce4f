//! Whole-audit verdict: weighted overall score, letter grade and standing.

use crate::rules::round_one_decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use verdict_types::{Criterion, CriterionResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 4.5 => Grade::A,
            s if s >= 3.5 => Grade::B,
            s if s >= 3.0 => Grade::C,
            s if s >= 2.0 => Grade::D,
            _ => Grade::F,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        f.write_str(letter)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Standing {
    MasterThinker,
    CompetentOrchestrator,
    VibeCoder,
}

impl Standing {
    pub fn from_score(score: f64) -> Self {
        if score >= 4.5 {
            Standing::MasterThinker
        } else if score >= 3.0 {
            Standing::CompetentOrchestrator
        } else {
            Standing::VibeCoder
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Standing::MasterThinker => "Master Thinker",
            Standing::CompetentOrchestrator => "Competent Orchestrator",
            Standing::VibeCoder => "Vibe Coder",
        }
    }
}

impl fmt::Display for Standing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VerdictSummary {
    /// Rubric-weighted mean of the final scores, one decimal.
    pub overall_score: f64,
    pub grade: Grade,
    pub standing: Standing,
    /// Names of criteria scoring 4 or more.
    pub strengths: Vec<String>,
    /// Names of criteria scoring 2 or less.
    pub critical_gaps: Vec<String>,
}

impl VerdictSummary {
    /// Summarise `results`, weighting each by its rubric criterion (1.0 when
    /// the criterion is not in `criteria`). An empty audit scores 1.0.
    pub fn from_results(results: &[CriterionResult], criteria: &[Criterion]) -> Self {
        let weight_of = |id: &str| {
            criteria
                .iter()
                .find(|c| c.id == id)
                .map(Criterion::weight)
                .unwrap_or(1.0)
                .max(0.0)
        };
        let total_weight: f64 = results.iter().map(|r| weight_of(&r.criterion_id)).sum();
        let overall_score = if total_weight > 0.0 {
            let weighted: f64 = results
                .iter()
                .map(|r| r.final_score * weight_of(&r.criterion_id))
                .sum();
            round_one_decimal(weighted / total_weight)
        } else {
            1.0
        };

        Self {
            overall_score,
            grade: Grade::from_score(overall_score),
            standing: Standing::from_score(overall_score),
            strengths: results
                .iter()
                .filter(|r| r.final_score >= 4.0)
                .map(|r| r.criterion_name.clone())
                .collect(),
            critical_gaps: results
                .iter()
                .filter(|r| r.is_critical())
                .map(|r| r.criterion_name.clone())
                .collect(),
        }
    }

    /// One-line prose form used at the top of reports.
    pub fn headline(&self) -> String {
        let mut line = format!(
            "Overall score {:.1}/5 (grade {}, {}).",
            self.overall_score, self.grade, self.standing
        );
        if !self.strengths.is_empty() {
            line.push_str(&format!(" Strengths: {}.", self.strengths.join(", ")));
        }
        if !self.critical_gaps.is_empty() {
            line.push_str(&format!(" Critical gaps: {}.", self.critical_gaps.join(", ")));
        }
        line
    }
}
