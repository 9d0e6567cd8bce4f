//! Property tests: evidence merges are order-independent and lossless;
//! opinions are only ever appended.

use proptest::prelude::*;
use verdict_evidence::{AuditState, EvidenceMap};
use verdict_types::{Evidence, EvidenceKey, Opinion, Score};

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

fn arb_evidence(criterion: &'static str) -> impl Strategy<Value = Evidence> {
    (any::<bool>(), "src/[a-z]{1,6}\\.py", 0.0f64..=1.0).prop_map(move |(found, location, confidence)| {
        if found {
            Evidence::located(criterion, location, "observed", confidence)
        } else {
            Evidence::absent(criterion, "not observed", confidence)
        }
    })
}

/// One extractor's write: a single key with one or two records.
fn arb_batch() -> impl Strategy<Value = EvidenceMap> {
    (
        prop_oneof![Just("repo_investigator"), Just("doc_analyst"), Just("vision_inspector")],
        prop_oneof![Just("state"), Just("graph"), Just("tools")],
    )
        .prop_flat_map(|(extractor, criterion)| {
            prop::collection::vec(arb_evidence(criterion), 1..3).prop_map(move |records| {
                let mut map = EvidenceMap::new();
                map.insert(EvidenceKey::new(extractor, criterion), records);
                map
            })
        })
}

fn arb_opinion() -> impl Strategy<Value = Opinion> {
    (
        prop_oneof![Just("prosecutor"), Just("defense"), Just("tech_lead")],
        prop_oneof![Just("state"), Just("graph")],
        1i64..=5,
    )
        .prop_map(|(judge, criterion, score)| Opinion::new(judge, criterion, Score::new(score).unwrap(), "argued", vec![]))
}

fn merged(batches: &[EvidenceMap]) -> EvidenceMap {
    let mut state = AuditState::new();
    for batch in batches {
        state.merge_evidence(batch.clone());
    }
    state.evidence().clone()
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn merge_order_does_not_matter(
        (batches, shuffled) in prop::collection::vec(arb_batch(), 1..8)
            .prop_flat_map(|b| (Just(b.clone()), Just(b).prop_shuffle()))
    ) {
        prop_assert_eq!(merged(&batches), merged(&shuffled));
    }

    #[test]
    fn merge_loses_no_record(batches in prop::collection::vec(arb_batch(), 0..8)) {
        let written: usize = batches.iter().flat_map(|b| b.values()).map(Vec::len).sum();
        let kept: usize = merged(&batches).values().map(Vec::len).sum();
        prop_assert_eq!(written, kept);
    }

    #[test]
    fn appending_n_opinions_yields_n(
        batches in prop::collection::vec(prop::collection::vec(arb_opinion(), 0..6), 0..5)
    ) {
        let total: usize = batches.iter().map(Vec::len).sum();
        let mut deliberation = AuditState::new().close_evidence();
        for batch in batches {
            deliberation.append_opinions(batch);
        }
        let frozen = deliberation.freeze();
        prop_assert_eq!(frozen.opinions().len(), total);
    }
}
