//! Property tests: adjudication is deterministic, bounded, and reports
//! dissent exactly when the spread of scores exceeds the threshold.

use proptest::prelude::*;
use verdict_justice::ChiefJustice;
use verdict_types::{ArtifactKind, Criterion, Evidence, Opinion, Score, SynthesisRules};

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

const CRITERION: &str = "graph_orchestration";

fn criterion() -> Criterion {
    Criterion {
        id: CRITERION.into(),
        name: "Graph Orchestration".into(),
        target_artifact: ArtifactKind::GithubRepo,
        success_pattern: "parallel fan-out".into(),
        failure_pattern: "linear pipeline".into(),
        weight: None,
        required: None,
        remediation: None,
    }
}

/// Opinions from distinct judges, some citing a verified location, some a
/// fabricated one, some nothing.
fn arb_opinions() -> impl Strategy<Value = Vec<Opinion>> {
    prop::collection::vec(
        (
            1i64..=5,
            prop_oneof![
                Just(Vec::<String>::new()),
                Just(vec!["src/graph.py".to_string()]),
                Just(vec!["src/imaginary.py".to_string()]),
            ],
        ),
        1..6,
    )
    .prop_map(|entries| {
        entries
            .into_iter()
            .enumerate()
            .map(|(i, (score, cited))| {
                let judge = if i == 0 { "tech_lead".to_string() } else { format!("judge_{i}") };
                Opinion::new(judge, CRITERION, Score::new(score).unwrap(), format!("argument {i}"), cited)
            })
            .collect()
    })
}

fn evidence() -> Vec<Evidence> {
    vec![Evidence::located(CRITERION, "src/graph.py", "fan-out with aggregator", 1.0)]
}

fn weighted_justice() -> ChiefJustice {
    ChiefJustice::from_rubric(&verdict_tests::workspace_rubric())
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn arrival_order_does_not_change_the_ruling(
        (opinions, shuffled) in arb_opinions().prop_flat_map(|o| (Just(o.clone()), Just(o).prop_shuffle()))
    ) {
        let justice = weighted_justice();
        let evidence = evidence();
        let ev: Vec<&Evidence> = evidence.iter().collect();
        let a = justice.adjudicate(&criterion(), &ev, &opinions.iter().collect::<Vec<_>>(), false);
        let b = justice.adjudicate(&criterion(), &ev, &shuffled.iter().collect::<Vec<_>>(), false);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn final_score_stays_within_bounds(opinions in arb_opinions()) {
        let evidence = evidence();
        let ev: Vec<&Evidence> = evidence.iter().collect();
        let refs: Vec<&Opinion> = opinions.iter().collect();
        for justice in [ChiefJustice::default(), weighted_justice()] {
            let result = justice.adjudicate(&criterion(), &ev, &refs, false);
            prop_assert!((1.0..=5.0).contains(&result.final_score));
            prop_assert_eq!((result.final_score * 10.0).round() / 10.0, result.final_score);
        }
    }

    #[test]
    fn fabricated_citations_are_always_overruled(opinions in arb_opinions()) {
        let evidence = evidence();
        let ev: Vec<&Evidence> = evidence.iter().collect();
        let result = ChiefJustice::default().adjudicate(&criterion(), &ev, &opinions.iter().collect::<Vec<_>>(), false);
        let fabricated = opinions
            .iter()
            .filter(|o| o.cited_evidence.iter().any(|c| c == "src/imaginary.py"))
            .count();
        prop_assert_eq!(result.overruled.len(), fabricated);
        for opinion in result.opinions.iter().filter(|o| result.overruled.contains(&o.judge_id)) {
            prop_assert_eq!(opinion.score, Score::MIN);
        }
    }

    #[test]
    fn dissent_iff_spread_exceeds_threshold(opinions in arb_opinions()) {
        let threshold = SynthesisRules::default().dissent_threshold;
        let scores: Vec<u8> = opinions.iter().map(|o| o.score.value()).collect();
        let spread = scores.iter().max().unwrap() - scores.iter().min().unwrap();
        let result = ChiefJustice::default().adjudicate(&criterion(), &[], &opinions.iter().collect::<Vec<_>>(), false);
        prop_assert_eq!(result.dissent.is_some(), spread > threshold);
        if let Some(dissent) = result.dissent {
            prop_assert_eq!(dissent.range, spread);
            prop_assert!(!dissent.minority.is_empty());
            prop_assert_eq!(dissent.minority.len() + dissent.majority.len(), opinions.len());
        }
    }

    #[test]
    fn security_cap_bounds_every_ruling(opinions in arb_opinions()) {
        let rules = SynthesisRules::default();
        let evidence = vec![Evidence::absent(CRITERION, "SECURITY VIOLATION: raw shell execution", 1.0)];
        let ev: Vec<&Evidence> = evidence.iter().collect();
        let result = ChiefJustice::new(rules.clone()).adjudicate(&criterion(), &ev, &opinions.iter().collect::<Vec<_>>(), false);
        prop_assert!(result.final_score <= rules.security_cap);
        prop_assert!(result.security_capped);
    }
}
