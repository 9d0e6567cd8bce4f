//! Evidence completeness gate.

use crate::error::CompletenessError;
use crate::store::EvidenceMap;
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;
use verdict_types::{ArtifactKind, Confidence, Evidence, EvidenceKey, Rubric, NOT_APPLICABLE};

/// Rationale prefix of every record the gate synthesises.
pub const MISSING_EVIDENCE_PREFIX: &str = "evidence missing";

/// Checks that every required `(extractor, criterion)` key holds at least one
/// record before judges run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompletenessGate {
    required: BTreeSet<EvidenceKey>,
}

impl CompletenessGate {
    pub fn new(required: impl IntoIterator<Item = EvidenceKey>) -> Self {
        Self {
            required: required.into_iter().collect(),
        }
    }

    /// Required keys derived from the rubric: every dimension not marked
    /// `required: false`, owned by the extractor registered for its artifact.
    /// Dimensions whose artifact has no registered owner are not required.
    pub fn from_rubric(rubric: &Rubric, owners: &BTreeMap<ArtifactKind, String>) -> Self {
        let required = rubric
            .dimensions
            .iter()
            .filter(|c| c.is_required())
            .filter_map(|c| {
                owners
                    .get(&c.target_artifact)
                    .map(|owner| EvidenceKey::new(owner.clone(), c.id.clone()))
            });
        Self::new(required)
    }

    pub fn required(&self) -> impl Iterator<Item = &EvidenceKey> {
        self.required.iter()
    }

    /// Pass, or the missing keys in key order. An empty list counts as missing.
    pub fn check(&self, map: &EvidenceMap) -> Result<(), CompletenessError> {
        let missing: Vec<EvidenceKey> = self
            .required
            .iter()
            .filter(|key| map.get(*key).map_or(true, Vec::is_empty))
            .cloned()
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            warn!(missing = missing.len(), "completeness gate failed");
            Err(CompletenessError { missing })
        }
    }

    /// One synthetic record per missing key, ready to merge.
    pub fn degraded_records(error: &CompletenessError) -> EvidenceMap {
        error
            .missing
            .iter()
            .map(|key| {
                let record = Evidence::new(
                    key.criterion_id.clone(),
                    false,
                    NOT_APPLICABLE,
                    format!("{MISSING_EVIDENCE_PREFIX}: no record under '{key}'"),
                    Confidence::NONE,
                );
                (key.clone(), vec![record])
            })
            .collect()
    }
}
