//! Adversarial test: raw shell execution caps the tool-safety criterion and
//! nothing else, however enthusiastic the judges are.

use verdict_bench::SimulatedJudge;
use verdict_pipeline::{AuditPipeline, AuditRequest};
use verdict_tests::{bench_of, score, test_config, workspace_rubric, FixtureRepo, UNSAFE_TOOLS_PY};

fn pipeline() -> AuditPipeline {
    AuditPipeline::new(workspace_rubric(), test_config())
        .unwrap()
        .with_bench(bench_of(vec![
            SimulatedJudge::constant("defense", score(5)),
            SimulatedJudge::constant("tech_lead", score(5)),
        ]))
}

#[tokio::test]
async fn shell_execution_caps_only_tool_safety() {
    let repo = FixtureRepo::well_built().with_file("src/tools/repo_tools.py", UNSAFE_TOOLS_PY);
    let outcome = pipeline().run(&AuditRequest::repo(repo.locator())).await;
    let report = &outcome.report;

    let tools = report
        .criteria
        .iter()
        .find(|r| r.criterion_id == "safe_tool_engineering")
        .unwrap();
    assert!(tools.security_capped);
    assert_eq!(tools.final_score, 3.0);
    assert!(tools.remediation.contains("[Rule of Security]"));
    assert!(outcome.markdown.contains("**Security cap applied.**"));

    for result in report.criteria.iter().filter(|r| r.criterion_id != "safe_tool_engineering") {
        assert!(!result.security_capped, "{}", result.criterion_id);
        assert_eq!(result.final_score, 5.0, "{}", result.criterion_id);
    }
}

#[tokio::test]
async fn shell_true_in_any_tool_module_is_caught() {
    let repo = FixtureRepo::well_built().with_file(
        "src/tools/helpers.py",
        "from subprocess import run\n\ndef ls(path):\n    run('ls ' + path, shell=True)\n",
    );
    let outcome = pipeline().run(&AuditRequest::repo(repo.locator())).await;
    assert_eq!(outcome.report.score_of("safe_tool_engineering"), Some(3.0));
    assert_eq!(outcome.report.score_of("state_management_rigor"), Some(5.0));
}

#[tokio::test]
async fn clean_tools_are_not_capped() {
    let repo = FixtureRepo::well_built();
    let outcome = pipeline().run(&AuditRequest::repo(repo.locator())).await;
    assert_eq!(outcome.report.score_of("safe_tool_engineering"), Some(5.0));
    assert!(outcome.report.criteria.iter().all(|r| !r.security_capped));
}
