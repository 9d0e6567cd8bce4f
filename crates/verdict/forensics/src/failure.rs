//! Synthetic evidence standing in for an extractor that failed outright.

use crate::error::ExtractionError;
use verdict_evidence::EvidenceMap;
use verdict_types::{Confidence, Criterion, Evidence, EvidenceKey, NOT_APPLICABLE};

pub const FAILURE_PREFIX: &str = "extraction failed";
pub const FAILURE_CONFIDENCE: f64 = 0.1;

/// A low-confidence stand-in for one criterion whose protocol failed.
pub fn failure_record(criterion_id: &str, err: &ExtractionError) -> Evidence {
    Evidence::new(
        criterion_id,
        false,
        NOT_APPLICABLE,
        format!("{FAILURE_PREFIX}: {err}"),
        Confidence::saturating(FAILURE_CONFIDENCE),
    )
}

/// One low-confidence record per criterion the failed extractor owns.
pub fn failure_evidence(extractor_id: &str, criteria: &[Criterion], err: &ExtractionError) -> EvidenceMap {
    criteria
        .iter()
        .map(|c| {
            (
                EvidenceKey::new(extractor_id, c.id.as_str()),
                vec![failure_record(c.id.as_str(), err)],
            )
        })
        .collect()
}

/// Whether a record was synthesised by [`failure_evidence`].
pub fn is_failure_record(evidence: &Evidence) -> bool {
    !evidence.found() && evidence.rationale().starts_with(FAILURE_PREFIX)
}
