//! Rubric configuration: the read-only ground truth every stage references
//! by criterion id.

use crate::error::RubricError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

/// What kind of material a criterion is judged from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// The audited repository (source + history).
    GithubRepo,
    /// The supplementary report document (its text).
    PdfReport,
    /// Images extracted from the supplementary report.
    PdfImages,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GithubRepo => write!(f, "github_repo"),
            Self::PdfReport => write!(f, "pdf_report"),
            Self::PdfImages => write!(f, "pdf_images"),
        }
    }
}

/// A single rubric dimension.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub id: String,
    pub name: String,
    pub target_artifact: ArtifactKind,
    pub success_pattern: String,
    pub failure_pattern: String,
    /// Weight in the overall score. Defaults to 1.0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Whether the completeness gate requires evidence. Defaults to true.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// Remediation text used when the criterion scores critically.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl Criterion {
    pub fn weight(&self) -> f64 {
        self.weight.unwrap_or(1.0)
    }

    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(true)
    }
}

/// The criterion whose aggregation gives one judge a fixed share of the
/// weight.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightedCriterion {
    pub criterion_id: String,
    pub judge_id: String,
    /// Share carried by `judge_id`; the other judges split the rest.
    #[serde(default = "default_judge_weight")]
    pub weight: f64,
}

fn default_judge_weight() -> f64 {
    0.5
}

/// Parameters of the Chief Justice's deterministic rules.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisRules {
    /// Case-insensitive markers of a confirmed violation in forensic
    /// rationale text.
    pub security_markers: Vec<String>,
    /// Upper bound applied when a marker is present.
    pub security_cap: f64,
    /// Remediation appended when the cap fires.
    pub security_note: String,
    /// Dissent fires when `max - min` strictly exceeds this.
    pub dissent_threshold: u8,
    pub weighted_criterion: Option<WeightedCriterion>,
}

impl Default for SynthesisRules {
    fn default() -> Self {
        Self {
            security_markers: [
                "os.system",
                "shell injection",
                "unsanitized input",
                "command injection",
                "security vulnerability",
                "security flaw",
                "security negligence",
                "security violation",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            security_cap: 3.0,
            security_note: "Confirmed security violation in forensic evidence. Replace unchecked \
                            shell execution with argument-vector process calls that capture \
                            output, run inside an isolated temporary directory."
                .into(),
            dissent_threshold: 2,
            weighted_criterion: None,
        }
    }
}

/// An ordered set of criteria plus synthesis rules. Loaded once per run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rubric {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    pub dimensions: Vec<Criterion>,
    #[serde(default)]
    pub synthesis_rules: SynthesisRules,
}

fn default_version() -> String {
    "1.0".into()
}

impl Rubric {
    /// Parse and validate a rubric from JSON text.
    pub fn from_json(text: &str) -> Result<Self, RubricError> {
        let rubric: Rubric =
            serde_json::from_str(text).map_err(|e| RubricError::Parse(e.to_string()))?;
        rubric.validate()?;
        Ok(rubric)
    }

    /// Load and validate a rubric file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RubricError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| RubricError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<(), RubricError> {
        if self.dimensions.is_empty() {
            return Err(RubricError::Empty);
        }
        let mut seen = HashSet::new();
        for c in &self.dimensions {
            if c.id.trim().is_empty() {
                return Err(RubricError::Invalid("criterion with empty id".into()));
            }
            if !seen.insert(c.id.as_str()) {
                return Err(RubricError::DuplicateCriterion(c.id.clone()));
            }
            if let Some(w) = c.weight {
                if !w.is_finite() || w <= 0.0 {
                    return Err(RubricError::Invalid(format!(
                        "criterion {} has non-positive weight {}",
                        c.id, w
                    )));
                }
            }
        }
        let rules = &self.synthesis_rules;
        if !(1.0..=5.0).contains(&rules.security_cap) {
            return Err(RubricError::Invalid(format!(
                "security_cap {} outside 1..=5",
                rules.security_cap
            )));
        }
        if let Some(wc) = &rules.weighted_criterion {
            if !(0.0..=1.0).contains(&wc.weight) {
                return Err(RubricError::Invalid(format!(
                    "weighted judge share {} outside [0, 1]",
                    wc.weight
                )));
            }
            if self.criterion(&wc.criterion_id).is_none() {
                return Err(RubricError::UnknownCriterion(wc.criterion_id.clone()));
            }
        }
        Ok(())
    }

    pub fn criterion(&self, id: &str) -> Option<&Criterion> {
        self.dimensions.iter().find(|c| c.id == id)
    }

    /// Criteria judged from `artifact`, in rubric order.
    pub fn criteria_for(&self, artifact: ArtifactKind) -> Vec<&Criterion> {
        self.dimensions
            .iter()
            .filter(|c| c.target_artifact == artifact)
            .collect()
    }

    /// Position of a criterion in rubric order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.dimensions.iter().position(|c| c.id == id)
    }
}
