//! Evidence store: namespaced keys to evidence lists, merged by key-union.

use std::collections::BTreeMap;
use verdict_types::{Evidence, EvidenceKey};

/// Ordered so iteration (and therefore every downstream rendering) does not
/// depend on which writer arrived first.
pub type EvidenceMap = BTreeMap<EvidenceKey, Vec<Evidence>>;

/// Key-union merge.
///
/// Every key from both inputs survives. A key present on both sides gets
/// the concatenation of both lists, put in canonical order so the result
/// is the same whichever writer arrived first. Nothing is ever replaced.
///
/// No collision detection happens here: writers derive keys as
/// `{extractor_id}_{criterion_id}`, which cannot collide across extractors.
pub fn merge(mut existing: EvidenceMap, new_entries: EvidenceMap) -> EvidenceMap {
    for (key, mut incoming) in new_entries {
        match existing.get_mut(&key) {
            Some(current) => {
                current.append(&mut incoming);
                current.sort_by(Evidence::canonical_cmp);
            }
            None => {
                existing.insert(key, incoming);
            }
        }
    }
    existing
}

/// All evidence about `criterion_id`, across extractors, in key order.
pub fn evidence_for<'a>(map: &'a EvidenceMap, criterion_id: &str) -> Vec<&'a Evidence> {
    map.iter()
        .filter(|(key, _)| key.criterion_id == criterion_id)
        .flat_map(|(_, list)| list.iter())
        .collect()
}
