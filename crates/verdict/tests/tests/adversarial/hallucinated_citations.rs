//! Adversarial test: a judge citing files that do not exist is overruled to
//! the minimum score, while judges citing real evidence stand.

use verdict_bench::SimulatedJudge;
use verdict_justice::rules::OVERRULE_TAG;
use verdict_pipeline::{AuditPipeline, AuditRequest};
use verdict_tests::{bench_of, score, test_config, workspace_rubric, FixtureRepo};
use verdict_types::JudgeId;

const CRITERION: &str = "state_management_rigor";

#[tokio::test]
async fn fabricated_citation_is_overruled_to_one() {
    let repo = FixtureRepo::well_built();
    let bench = bench_of(vec![
        SimulatedJudge::constant("defense", score(5)).with_opinion(
            CRITERION,
            score(5),
            "Flawless reducers in src/nonexistent.py",
            vec!["src/nonexistent.py".into()],
        ),
        SimulatedJudge::constant("prosecutor", score(4)).with_opinion(
            CRITERION,
            score(4),
            "Typed state with reducers",
            vec!["src/state.py".into()],
        ),
    ]);
    let pipeline = AuditPipeline::new(workspace_rubric(), test_config()).unwrap().with_bench(bench);

    let outcome = pipeline.run(&AuditRequest::repo(repo.locator())).await;
    let result = outcome
        .report
        .criteria
        .iter()
        .find(|r| r.criterion_id == CRITERION)
        .unwrap();

    assert_eq!(result.overruled, vec![JudgeId::new("defense")]);
    assert_eq!(result.final_score, 2.5);
    let defense = result.opinions.iter().find(|o| o.judge_id.as_str() == "defense").unwrap();
    assert_eq!(defense.score, verdict_types::Score::MIN);
    assert!(defense.argument.starts_with(OVERRULE_TAG));
    assert!(defense.argument.contains("src/nonexistent.py"));
    let prosecutor = result.opinions.iter().find(|o| o.judge_id.as_str() == "prosecutor").unwrap();
    assert_eq!(prosecutor.score, score(4));
    assert!(outcome.markdown.contains(OVERRULE_TAG));
}

#[tokio::test]
async fn a_lone_fabricating_judge_scores_one() {
    let repo = FixtureRepo::well_built();
    let bench = bench_of(vec![SimulatedJudge::constant("defense", score(5)).with_opinion(
        CRITERION,
        score(5),
        "see src/ghost.py",
        vec!["src/ghost.py".into()],
    )]);
    let pipeline = AuditPipeline::new(workspace_rubric(), test_config()).unwrap().with_bench(bench);

    let outcome = pipeline.run(&AuditRequest::repo(repo.locator())).await;
    assert_eq!(outcome.report.score_of(CRITERION), Some(1.0));
    // Other criteria were not cited and keep the constant score.
    assert_eq!(outcome.report.score_of("graph_orchestration"), Some(5.0));
}
