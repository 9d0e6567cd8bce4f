//! Adversarial test: keywords placed in comments, strings and variable
//! names earn no credit; only program structure counts.

use verdict_pipeline::{AuditPipeline, AuditRequest};
use verdict_tests::{test_config, workspace_rubric, FixtureRepo};

const DECOY_STATE: &str = "\
# class AgentState(TypedDict): evidences: Annotated[dict, operator.ior]
DOC = 'uses BaseModel, TypedDict and Annotated[list, operator.add] reducers'
operator_add = 1
state = {}
";

const DECOY_GRAPH: &str = "\
# builder = StateGraph(AgentState)
NOTE = \"builder.add_edge(START, 'a'); builder.add_edge(START, 'b'); evidence_aggregator\"
StateGraph_enabled = True
";

const DECOY_JUDGES: &str = "\
# llm.with_structured_output(JudicialOpinion)
HINT = 'with_structured_output(JudicialOpinion)'
";

#[tokio::test]
async fn mentions_without_structure_score_one() {
    let repo = FixtureRepo::empty()
        .with_file("src/state.py", DECOY_STATE)
        .with_file("src/graph.py", DECOY_GRAPH)
        .with_file("src/nodes/judges.py", DECOY_JUDGES);

    let outcome = AuditPipeline::new(workspace_rubric(), test_config())
        .unwrap()
        .run(&AuditRequest::repo(repo.locator()))
        .await;
    let report = &outcome.report;

    for id in ["state_management_rigor", "graph_orchestration", "structured_output_enforcement"] {
        assert_eq!(report.score_of(id), Some(1.0), "{id}");
    }
    assert!(report.critical().count() >= 3);
}

#[tokio::test]
async fn warning_about_os_system_is_not_a_violation() {
    let repo = FixtureRepo::well_built().with_file(
        "src/tools/policy.py",
        "# never call os.system()\nWARNING = 'os.system is forbidden'\nsystem = None\n",
    );
    let outcome = AuditPipeline::new(workspace_rubric(), test_config())
        .unwrap()
        .run(&AuditRequest::repo(repo.locator()))
        .await;
    let tools = outcome
        .report
        .criteria
        .iter()
        .find(|r| r.criterion_id == "safe_tool_engineering")
        .unwrap();
    assert!(!tools.security_capped);
    assert_eq!(tools.final_score, 5.0);
}
