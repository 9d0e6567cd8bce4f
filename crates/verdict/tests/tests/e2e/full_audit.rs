//! End-to-end test: a well-built repository, its report and its diagrams
//! audited by the default heuristic bench.

use std::sync::Arc;
use verdict_forensics::{DiagramKind, SimulatedClassifier};
use verdict_pipeline::{AuditPipeline, AuditRequest};
use verdict_report::parse_scores;
use verdict_tests::{test_config, workspace_rubric, FixtureRepo, REPORT_MD};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Artifacts {
    dir: tempfile::TempDir,
}

impl Artifacts {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("report.md"), REPORT_MD).unwrap();
        std::fs::create_dir_all(dir.path().join("images")).unwrap();
        std::fs::write(dir.path().join("images/architecture.png"), [0x89, b'P', b'N', b'G']).unwrap();
        Self { dir }
    }

    fn request(&self, repo: &FixtureRepo) -> AuditRequest {
        AuditRequest::repo(repo.locator())
            .with_document(self.dir.path().join("report.md"))
            .with_images(self.dir.path().join("images"))
    }
}

fn pipeline() -> AuditPipeline {
    AuditPipeline::new(workspace_rubric(), test_config())
        .unwrap()
        .with_classifier(Arc::new(SimulatedClassifier::uniform(DiagramKind::ParallelFanOut)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn well_built_repository_scores_high_across_the_rubric() {
    let repo = FixtureRepo::well_built();
    let artifacts = Artifacts::new();
    let out = tempfile::tempdir().unwrap();
    let md_path = out.path().join("audit/report.md");
    let json_path = out.path().join("audit/report.json");

    let outcome = pipeline()
        .run_and_write(&artifacts.request(&repo), Some(&md_path), Some(&json_path))
        .await
        .unwrap();
    let report = &outcome.report;

    assert_eq!(report.criteria.len(), 10);
    assert!(report.extraction_failures.is_empty());
    assert!(report.degraded_keys.is_empty());
    assert!(report.judge_failures.is_empty());
    assert!(report.criteria.iter().all(|r| !r.degraded && !r.security_capped));
    assert!(report.criteria.iter().all(|r| r.opinions.len() == 3));

    for id in [
        "state_management_rigor",
        "graph_orchestration",
        "safe_tool_engineering",
        "structured_output_enforcement",
        "swarm_visual",
    ] {
        assert_eq!(report.score_of(id), Some(5.0), "{id}");
    }
    for id in ["judicial_nuance", "chief_justice_synthesis", "theoretical_depth"] {
        assert!(report.score_of(id).unwrap() >= 4.0, "{id}");
    }

    let text = std::fs::read_to_string(&md_path).unwrap();
    assert_eq!(text, outcome.markdown);
    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(json["criteria"].as_array().unwrap().len(), 10);
    assert_eq!(json["metadata"]["run_id"], report.metadata.run_id.as_str());
}

#[tokio::test]
async fn rendered_scores_parse_back_to_the_report() {
    let repo = FixtureRepo::well_built();
    let artifacts = Artifacts::new();
    let outcome = pipeline().run(&artifacts.request(&repo)).await;

    let parsed = parse_scores(&outcome.markdown).unwrap();
    let expected: Vec<(String, f64)> = outcome
        .report
        .criteria
        .iter()
        .map(|r| (r.criterion_id.clone(), r.final_score))
        .collect();
    assert_eq!(parsed, expected);
}

#[tokio::test]
async fn repository_only_audit_skips_document_criteria() {
    let repo = FixtureRepo::well_built();
    let outcome = pipeline().run(&AuditRequest::repo(repo.locator())).await;

    let ids: Vec<&str> = outcome.report.criteria.iter().map(|r| r.criterion_id.as_str()).collect();
    assert_eq!(ids.len(), 7);
    assert!(!ids.contains(&"theoretical_depth"));
    assert!(!ids.contains(&"swarm_visual"));
    assert!(outcome.markdown.contains("## Executive Summary"));
    assert!(outcome.markdown.contains("## Forensic Notes"));
}

#[tokio::test]
async fn sparse_repository_lands_in_the_remediation_plan() {
    let repo = FixtureRepo::empty().with_file("main.py", "print('hello')\n");
    let outcome = pipeline().run(&AuditRequest::repo(repo.locator())).await;

    let state = outcome
        .report
        .criteria
        .iter()
        .find(|r| r.criterion_id == "state_management_rigor")
        .unwrap();
    assert_eq!(state.final_score, 1.0);
    assert!(state.is_critical());
    assert!(outcome.markdown.contains(&format!("- **{}** (1.0):", state.criterion_name)));
    assert!(outcome.report.summary.overall_score < 3.0);
}
