//! Opinion collector: pure append.

use std::collections::BTreeMap;
use verdict_types::Opinion;

/// `existing + [new_opinion]`. No dedup, no overwrite.
pub fn collect(mut existing: Vec<Opinion>, new_opinion: Opinion) -> Vec<Opinion> {
    existing.push(new_opinion);
    existing
}

/// Fold a batch through [`collect`].
pub fn collect_all(existing: Vec<Opinion>, batch: impl IntoIterator<Item = Opinion>) -> Vec<Opinion> {
    batch.into_iter().fold(existing, collect)
}

/// Group by criterion. Within a criterion, opinions are ordered by judge id
/// (stable), so readers see the same sequence regardless of arrival order.
pub fn group_by_criterion(opinions: &[Opinion]) -> BTreeMap<String, Vec<Opinion>> {
    let mut grouped: BTreeMap<String, Vec<Opinion>> = BTreeMap::new();
    for op in opinions {
        grouped
            .entry(op.criterion_id.clone())
            .or_default()
            .push(op.clone());
    }
    for list in grouped.values_mut() {
        list.sort_by(|a, b| a.judge_id.cmp(&b.judge_id));
    }
    grouped
}
