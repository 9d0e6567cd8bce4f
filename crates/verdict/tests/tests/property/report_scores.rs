//! Property tests: every score in a rendered report parses back, whatever
//! text the judges and the rubric put around it.

use proptest::prelude::*;
use verdict_report::{parse_scores, render_markdown, AuditReport, RunMetadata};
use verdict_types::{ArtifactKind, Criterion, CriterionResult, Opinion, Rubric, Score, SynthesisRules};

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

fn rubric() -> Rubric {
    Rubric {
        name: "property rubric".into(),
        version: "1.0".into(),
        dimensions: vec![],
        synthesis_rules: SynthesisRules::default(),
    }
}

/// Free text with the characters a forger would reach for.
fn arb_text() -> impl Strategy<Value = String> {
    "[a-z #*`()|>\n:/.0-9]{0,60}"
}

fn arb_result(index: usize) -> impl Strategy<Value = CriterionResult> {
    (10u8..=50, arb_text(), arb_text(), arb_text(), 1i64..=5).prop_map(
        move |(tenths, name, argument, remediation, score)| CriterionResult {
            criterion_id: format!("criterion_{index}"),
            criterion_name: name,
            final_score: f64::from(tenths) / 10.0,
            opinions: vec![Opinion::new("defense", format!("criterion_{index}"), Score::new(score).unwrap(), argument, vec![])],
            dissent: None,
            remediation,
            security_capped: false,
            overruled: vec![],
            degraded: false,
        },
    )
}

fn arb_results() -> impl Strategy<Value = Vec<CriterionResult>> {
    (1usize..6).prop_flat_map(|n| (0..n).map(arb_result).collect::<Vec<_>>())
}

fn report(results: Vec<CriterionResult>) -> AuditReport {
    let criteria: Vec<Criterion> = results
        .iter()
        .map(|r| Criterion {
            id: r.criterion_id.clone(),
            name: r.criterion_name.clone(),
            target_artifact: ArtifactKind::GithubRepo,
            success_pattern: String::new(),
            failure_pattern: String::new(),
            weight: None,
            required: None,
            remediation: None,
        })
        .collect();
    AuditReport::new(RunMetadata::begin("fixture", &rubric()), results, &criteria)
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn rendered_scores_round_trip(results in arb_results()) {
        let expected: Vec<(String, f64)> = results.iter().map(|r| (r.criterion_id.clone(), r.final_score)).collect();
        let markdown = render_markdown(&report(results));
        prop_assert_eq!(parse_scores(&markdown).unwrap(), expected);
    }

    #[test]
    fn one_heading_per_criterion(results in arb_results()) {
        let count = results.len();
        let markdown = render_markdown(&report(results));
        let headings = markdown.lines().filter(|l| l.starts_with("### ")).count();
        prop_assert_eq!(headings, count);
    }
}
