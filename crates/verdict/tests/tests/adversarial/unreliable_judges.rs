//! Adversarial test: judges that stall, fail or answer the wrong question
//! are retried, then recorded as forensic failures; the audit still
//! completes on the opinions that did arrive.

use std::sync::Arc;
use std::time::Duration;
use verdict_bench::{Bench, RetryPolicy, SimulatedFault, SimulatedJudge};
use verdict_pipeline::{AuditPipeline, AuditRequest};
use verdict_tests::{score, test_config, FixtureRepo};
use verdict_types::Rubric;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const RUBRIC: &str = r#"{
    "name": "single criterion",
    "version": "1.0",
    "dimensions": [
        {"id": "state_management_rigor", "name": "State Management Rigor", "target_artifact": "github_repo",
         "success_pattern": "typed state", "failure_pattern": "plain dicts"}
    ]
}"#;

fn policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 2,
        backoff: Duration::from_millis(5),
        timeout: Duration::from_millis(100),
    }
}

async fn audit(bench: Bench) -> verdict_pipeline::AuditOutcome {
    let repo = FixtureRepo::well_built();
    AuditPipeline::new(Rubric::from_json(RUBRIC).unwrap(), test_config())
        .unwrap()
        .with_bench(bench)
        .run(&AuditRequest::repo(repo.locator()))
        .await
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stalling_judge_times_out_and_is_reported() {
    let bench = Bench::new(policy())
        .with_judge(Arc::new(SimulatedJudge::constant("steady", score(4))))
        .with_judge(Arc::new(
            SimulatedJudge::constant("staller", score(5)).always_failing(SimulatedFault::Stall),
        ));

    let outcome = audit(bench).await;
    let report = &outcome.report;

    assert_eq!(report.criteria[0].final_score, 4.0);
    assert_eq!(report.criteria[0].opinions.len(), 1);
    assert_eq!(report.judge_failures.len(), 1);
    assert_eq!(report.judge_failures[0].judge_id.as_str(), "staller");
    assert_eq!(report.judge_failures[0].attempts, 2);
    assert!(outcome
        .markdown
        .contains("- Judge failure: staller on `state_management_rigor` after 2 attempt(s)"));
}

#[tokio::test]
async fn flaky_judge_recovers_on_retry() {
    let flaky = Arc::new(SimulatedJudge::constant("flaky", score(2)).failing_first(1, SimulatedFault::Transport));
    let bench = Bench::new(policy()).with_judge(flaky.clone());

    let outcome = audit(bench).await;

    assert_eq!(flaky.calls(), 2);
    assert!(outcome.report.judge_failures.is_empty());
    assert_eq!(outcome.report.criteria[0].final_score, 2.0);
}

#[tokio::test]
async fn misaddressed_and_malformed_answers_are_rejected() {
    let bench = Bench::new(policy())
        .with_judge(Arc::new(
            SimulatedJudge::constant("confused", score(5)).always_failing(SimulatedFault::Misaddressed),
        ))
        .with_judge(Arc::new(
            SimulatedJudge::constant("garbled", score(5)).always_failing(SimulatedFault::Malformed),
        ));

    let outcome = audit(bench).await;
    let report = &outcome.report;

    assert_eq!(report.judge_failures.len(), 2);
    let result = &report.criteria[0];
    assert!(result.opinions.is_empty());
    assert_eq!(result.final_score, 1.0);
    assert!(result
        .remediation
        .contains(verdict_justice::remediation::NO_OPINION));
    assert!(outcome.markdown.contains("- _No judicial opinion available._"));
}
