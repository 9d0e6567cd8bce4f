//! End-to-end test: a version-controlled fixture is cloned and its commit
//! history judged. Skipped when no `git` binary is available.

use verdict_pipeline::{AuditPipeline, AuditRequest};
use verdict_tests::{git_available, test_config, workspace_rubric, FixtureRepo};

const CRITERION: &str = "git_forensic_analysis";
const BASE: i64 = 1_700_000_000;

fn pipeline() -> AuditPipeline {
    AuditPipeline::new(workspace_rubric(), test_config()).unwrap()
}

#[tokio::test]
async fn iterative_history_is_rewarded() {
    if !git_available() {
        eprintln!("skipping: git not available");
        return;
    }
    let repo = FixtureRepo::well_built().commit_steps(&[
        ("setup environment", BASE),
        ("add repo tools", BASE + 3_600),
        ("wire parallel graph", BASE + 7_200),
        ("add judicial personas", BASE + 10_800),
        ("deterministic chief justice", BASE + 14_400),
    ]);

    let outcome = pipeline().run(&AuditRequest::repo(repo.locator())).await;
    assert!(outcome.report.extraction_failures.is_empty());

    let history = outcome
        .report
        .criteria
        .iter()
        .find(|r| r.criterion_id == CRITERION)
        .unwrap();
    assert_eq!(history.final_score, 5.0);
    assert!(history
        .opinions
        .iter()
        .all(|o| o.cited_evidence == vec![".git/log".to_string()]));
    assert!(history.overruled.is_empty());
    // The clone still carries the source files.
    assert_eq!(outcome.report.score_of("state_management_rigor"), Some(5.0));
}

#[tokio::test]
async fn bulk_upload_is_penalised() {
    if !git_available() {
        eprintln!("skipping: git not available");
        return;
    }
    let repo = FixtureRepo::well_built().commit_steps(&[("initial commit", BASE), ("final", BASE + 5)]);

    let outcome = pipeline().run(&AuditRequest::repo(repo.locator())).await;
    let history = outcome
        .report
        .criteria
        .iter()
        .find(|r| r.criterion_id == CRITERION)
        .unwrap();
    assert_eq!(history.final_score, 1.0);
    assert!(outcome.report.critical().any(|r| r.criterion_id == CRITERION));
}

#[tokio::test]
async fn copied_directory_has_no_history() {
    let repo = FixtureRepo::well_built();
    let outcome = pipeline().run(&AuditRequest::repo(repo.locator())).await;
    let history = outcome
        .report
        .criteria
        .iter()
        .find(|r| r.criterion_id == CRITERION)
        .unwrap();
    // Absent evidence, not a forensic failure.
    assert!(!history.degraded);
    assert_eq!(history.final_score, 1.0);
}
