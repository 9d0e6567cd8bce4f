//! Error types for the evidence ledger.

use thiserror::Error;
use verdict_types::EvidenceKey;

/// Required evidence keys absent from the store.
///
/// Not fatal: the pipeline answers it by synthesising degraded records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("evidence incomplete: {} required key(s) missing: {}", .missing.len(), render_keys(.missing))]
pub struct CompletenessError {
    pub missing: Vec<EvidenceKey>,
}

fn render_keys(keys: &[EvidenceKey]) -> String {
    keys.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
