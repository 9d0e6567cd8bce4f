use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Location used when a forensic target could not be located.
pub const NOT_APPLICABLE: &str = "N/A";

/// Extractor confidence in a finding, always within `[0.0, 1.0]`.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Confidence(f64);

impl Confidence {
    /// Fully certain.
    pub const CERTAIN: Confidence = Confidence(1.0);
    /// No confidence at all (synthetic placeholders).
    pub const NONE: Confidence = Confidence(0.0);

    /// Validate a raw value.
    pub fn new(value: f64) -> Result<Self, String> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(format!("confidence {} outside [0.0, 1.0]", value))
        }
    }

    /// Clamp into range; NaN maps to zero.
    pub fn saturating(value: f64) -> Self {
        if value.is_nan() {
            Self(0.0)
        } else {
            Self(value.clamp(0.0, 1.0))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Confidence {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Confidence> for f64 {
    fn from(c: Confidence) -> f64 {
        c.0
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Namespaced evidence ledger key: `{extractor_id}_{criterion_id}`.
///
/// Distinct extractors can never produce the same key, so concurrent writers
/// never collide. Lookups by criterion compare the structured field rather
/// than string suffixes.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EvidenceKey {
    pub extractor_id: String,
    pub criterion_id: String,
}

impl EvidenceKey {
    pub fn new(extractor_id: impl Into<String>, criterion_id: impl Into<String>) -> Self {
        Self {
            extractor_id: extractor_id.into(),
            criterion_id: criterion_id.into(),
        }
    }
}

impl fmt::Display for EvidenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.extractor_id, self.criterion_id)
    }
}

/// An immutable forensic finding.
///
/// Fields are private: once built, a record cannot be altered. Corrections
/// go through the `with_*` methods, which return a new record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    criterion_id: String,
    found: bool,
    location: String,
    rationale: String,
    confidence: Confidence,
    /// Raw source excerpt. Never serialised and never forwarded to a judge.
    #[serde(skip_serializing, default)]
    raw_content: Option<String>,
}

impl Evidence {
    pub fn new(
        criterion_id: impl Into<String>,
        found: bool,
        location: impl Into<String>,
        rationale: impl Into<String>,
        confidence: Confidence,
    ) -> Self {
        Self {
            criterion_id: criterion_id.into(),
            found,
            location: location.into(),
            rationale: rationale.into(),
            confidence,
            raw_content: None,
        }
    }

    /// Artifact located at `location`.
    pub fn located(
        criterion_id: impl Into<String>,
        location: impl Into<String>,
        rationale: impl Into<String>,
        confidence: f64,
    ) -> Self {
        Self::new(
            criterion_id,
            true,
            location,
            rationale,
            Confidence::saturating(confidence),
        )
    }

    /// Artifact not located.
    pub fn absent(
        criterion_id: impl Into<String>,
        rationale: impl Into<String>,
        confidence: f64,
    ) -> Self {
        Self::new(
            criterion_id,
            false,
            NOT_APPLICABLE,
            rationale,
            Confidence::saturating(confidence),
        )
    }

    /// Attach a raw excerpt at construction time.
    pub fn with_raw_content(mut self, content: impl Into<String>) -> Self {
        self.raw_content = Some(content.into());
        self
    }

    /// A corrected copy with a new rationale.
    pub fn with_rationale(&self, rationale: impl Into<String>) -> Self {
        Self {
            rationale: rationale.into(),
            ..self.clone()
        }
    }

    /// A corrected copy with a new confidence.
    pub fn with_confidence(&self, confidence: Confidence) -> Self {
        Self {
            confidence,
            ..self.clone()
        }
    }

    pub fn criterion_id(&self) -> &str {
        &self.criterion_id
    }

    pub fn found(&self) -> bool {
        self.found
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn rationale(&self) -> &str {
        &self.rationale
    }

    pub fn confidence(&self) -> Confidence {
        self.confidence
    }

    pub fn raw_content(&self) -> Option<&str> {
        self.raw_content.as_deref()
    }

    /// Whether this record verifies its location: found and locatable.
    pub fn is_verified_location(&self) -> bool {
        self.found && self.location != NOT_APPLICABLE
    }

    /// The judge-facing view. Drops `raw_content`.
    pub fn for_judge(&self) -> JudgeEvidence {
        JudgeEvidence {
            criterion_id: self.criterion_id.clone(),
            found: self.found,
            location: self.location.clone(),
            rationale: self.rationale.clone(),
            confidence: self.confidence.value(),
        }
    }

    /// Total order used to canonicalise merged lists.
    pub fn canonical_cmp(&self, other: &Self) -> Ordering {
        self.criterion_id
            .cmp(&other.criterion_id)
            .then_with(|| self.location.cmp(&other.location))
            .then_with(|| self.rationale.cmp(&other.rationale))
            .then_with(|| self.found.cmp(&other.found))
            .then_with(|| self.confidence.value().total_cmp(&other.confidence.value()))
            .then_with(|| self.raw_content.cmp(&other.raw_content))
    }
}

/// Evidence as exposed to judges: `{criterion_id, found, location, rationale,
/// confidence}`. There is no content field on this type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JudgeEvidence {
    pub criterion_id: String,
    pub found: bool,
    pub location: String,
    pub rationale: String,
    pub confidence: f64,
}
