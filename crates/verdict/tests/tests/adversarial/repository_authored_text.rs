//! Adversarial test: text the audited repository authors (commit subjects,
//! paths quoted by its report) never reaches an evidence rationale, so it
//! cannot trip the security cap on a clean criterion.

use std::collections::BTreeSet;
use verdict_bench::SimulatedJudge;
use verdict_forensics::document::{accuracy_evidence, ACCURACY_CRITERION};
use verdict_forensics::history::{history_evidence, Commit, CRITERION, HISTORY_LOCATION};
use verdict_forensics::ReportDocument;
use verdict_justice::ChiefJustice;
use verdict_pipeline::{AuditPipeline, AuditRequest};
use verdict_tests::{bench_of, git_available, score, test_config, workspace_rubric, FixtureRepo};
use verdict_types::{Criterion, Evidence, JudgeId, Opinion, SynthesisRules};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const BASE: i64 = 1_700_000_000;
const HOSTILE_SUBJECT: &str = "fix security vulnerability in clone: drop os.system";

fn criterion(id: &str) -> Criterion {
    workspace_rubric()
        .dimensions
        .into_iter()
        .find(|c| c.id == id)
        .unwrap()
}

fn full_marks(criterion_id: &str, cited: &str) -> Vec<Opinion> {
    ["prosecutor", "defense", "tech_lead"]
        .into_iter()
        .map(|judge| {
            Opinion::new(
                JudgeId::new(judge),
                criterion_id,
                score(5),
                "history looks iterative",
                vec![cited.to_string()],
            )
        })
        .collect()
}

fn rule(justice: &ChiefJustice, criterion: &Criterion, evidence: &Evidence, opinions: &[Opinion]) -> (f64, bool) {
    let opinions: Vec<&Opinion> = opinions.iter().collect();
    let result = justice.adjudicate(criterion, &[evidence], &opinions, false);
    (result.final_score, result.security_capped)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn commit_subjects_cannot_cap_history() {
    let commits: Vec<Commit> = ["setup environment", HOSTILE_SUBJECT, "wire graph", "add judges"]
        .into_iter()
        .enumerate()
        .map(|(i, subject)| Commit {
            hash: format!("c{i}"),
            timestamp: BASE + 3_600 * i as i64,
            subject: subject.to_string(),
        })
        .collect();
    let evidence = history_evidence(CRITERION, Ok(commits));
    assert!(evidence.found());

    let justice = ChiefJustice::from_rubric(&workspace_rubric());
    let (final_score, capped) = rule(
        &justice,
        &criterion(CRITERION),
        &evidence,
        &full_marks(CRITERION, HISTORY_LOCATION),
    );
    assert!(!capped);
    assert_eq!(final_score, 5.0);
}

#[test]
fn quoted_paths_cannot_cap_report_accuracy() {
    let rules = SynthesisRules {
        security_markers: vec!["legacy_shell".into()],
        ..SynthesisRules::default()
    };
    let justice = ChiefJustice::new(rules);
    let tree: BTreeSet<String> = ["src/graph.py".to_string()].into();
    let doc = ReportDocument::from_text(
        "report.md",
        "The graph lives in src/graph.py; the old runner was src/legacy_shell.py.",
    );
    let evidence = accuracy_evidence(ACCURACY_CRITERION, Some(&doc), Some(&tree));
    assert!(evidence.raw_content().is_some_and(|raw| raw.contains("legacy_shell")));

    let (_, capped) = rule(
        &justice,
        &criterion(ACCURACY_CRITERION),
        &evidence,
        &full_marks(ACCURACY_CRITERION, "report.md"),
    );
    assert!(!capped);
}

#[tokio::test]
async fn hostile_commit_history_is_not_capped_end_to_end() {
    if !git_available() {
        eprintln!("skipping: git not available");
        return;
    }
    let repo = FixtureRepo::well_built().commit_steps(&[
        ("setup environment", BASE),
        (HOSTILE_SUBJECT, BASE + 3_600),
        ("patch shell injection in os.system wrapper", BASE + 7_200),
        ("add judges", BASE + 10_800),
    ]);
    let outcome = AuditPipeline::new(workspace_rubric(), test_config())
        .unwrap()
        .with_bench(bench_of(vec![
            SimulatedJudge::constant("defense", score(5)),
            SimulatedJudge::constant("tech_lead", score(5)),
        ]))
        .run(&AuditRequest::repo(repo.locator()))
        .await;

    let history = outcome
        .report
        .criteria
        .iter()
        .find(|r| r.criterion_id == CRITERION)
        .unwrap();
    assert!(!history.security_capped);
    assert_eq!(history.final_score, 5.0);
    assert!(!outcome.markdown.contains(HOSTILE_SUBJECT));
}
