//! End-to-end test: missing or failed evidence degrades the affected
//! criteria without aborting the audit.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use verdict_bench::SimulatedJudge;
use verdict_evidence::EvidenceMap;
use verdict_forensics::{failure_record, ExtractionError, Extractor, Materials};
use verdict_justice::remediation::DEGRADED_NOTE;
use verdict_pipeline::{AuditPipeline, AuditRequest};
use verdict_tests::{bench_of, score, test_config, workspace_rubric, FixtureRepo};
use verdict_types::{ArtifactKind, Criterion, Evidence, EvidenceKey, Rubric};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const RUBRIC: &str = r#"{
    "name": "two criteria",
    "version": "1.0",
    "dimensions": [
        {"id": "a", "name": "Alpha", "target_artifact": "github_repo",
         "success_pattern": "present", "failure_pattern": "absent"},
        {"id": "b", "name": "Beta", "target_artifact": "github_repo",
         "success_pattern": "present", "failure_pattern": "absent"}
    ]
}"#;

/// Reports on the first criterion it owns and forgets the rest.
struct Forgetful;

#[async_trait]
impl Extractor for Forgetful {
    fn id(&self) -> &str {
        "forgetful"
    }

    fn artifact(&self) -> ArtifactKind {
        ArtifactKind::GithubRepo
    }

    async fn extract(&self, _materials: &Materials, criteria: &[Criterion]) -> Result<EvidenceMap, ExtractionError> {
        Ok(criteria
            .iter()
            .take(1)
            .map(|c| {
                (
                    EvidenceKey::new("forgetful", c.id.as_str()),
                    vec![Evidence::located(c.id.as_str(), "src/a.py", "seen", 1.0)],
                )
            })
            .collect())
    }
}

/// Completes the first criterion it owns; its protocol for the rest fails.
struct Stumbling;

#[async_trait]
impl Extractor for Stumbling {
    fn id(&self) -> &str {
        "stumbling"
    }

    fn artifact(&self) -> ArtifactKind {
        ArtifactKind::GithubRepo
    }

    async fn extract(&self, _materials: &Materials, criteria: &[Criterion]) -> Result<EvidenceMap, ExtractionError> {
        let timeout = ExtractionError::Timeout {
            command: "git log".into(),
            timeout: Duration::from_secs(5),
        };
        Ok(criteria
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let record = if i == 0 {
                    Evidence::located(c.id.as_str(), "src/a.py", "seen", 1.0)
                } else {
                    failure_record(c.id.as_str(), &timeout)
                };
                (EvidenceKey::new("stumbling", c.id.as_str()), vec![record])
            })
            .collect())
    }
}

fn two_criteria(extractor: Arc<dyn Extractor>) -> AuditPipeline {
    AuditPipeline::new(Rubric::from_json(RUBRIC).unwrap(), test_config())
        .unwrap()
        .with_extractors(vec![extractor])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn incomplete_evidence_degrades_only_the_missing_key() {
    let repo = FixtureRepo::empty();
    let outcome = two_criteria(Arc::new(Forgetful))
        .run(&AuditRequest::repo(repo.locator()))
        .await;
    let report = &outcome.report;

    assert_eq!(report.degraded_keys, vec!["forgetful_b".to_string()]);
    assert!(report.extraction_failures.is_empty());
    assert!(!report.criteria[0].degraded);
    assert!(report.criteria[1].degraded);
    assert!(report.criteria[1].remediation.contains(DEGRADED_NOTE));
    // The default bench still ruled on the degraded criterion, and scored it
    // on the synthetic record alone.
    assert_eq!(report.criteria[1].opinions.len(), 3);
    assert_eq!(report.score_of("a"), Some(5.0));
    assert_eq!(report.score_of("b"), Some(1.0));
    assert!(outcome.markdown.contains("- Degraded evidence: `forgetful_b`"));
    assert!(outcome.markdown.contains("**Degraded:**"));
}

#[tokio::test]
async fn failed_protocol_degrades_its_own_criterion() {
    let repo = FixtureRepo::empty();
    let outcome = two_criteria(Arc::new(Stumbling))
        .run(&AuditRequest::repo(repo.locator()))
        .await;
    let report = &outcome.report;

    assert!(report.extraction_failures.is_empty());
    assert_eq!(report.degraded_keys, vec!["stumbling_b".to_string()]);
    assert!(!report.criteria[0].degraded);
    assert!(report.criteria[1].degraded);
    assert_eq!(report.score_of("a"), Some(5.0));
    assert_eq!(report.score_of("b"), Some(1.0));
}

#[tokio::test]
async fn degraded_criterion_keeps_scripted_scores() {
    let repo = FixtureRepo::empty();
    let outcome = two_criteria(Arc::new(Forgetful))
        .with_bench(bench_of(vec![SimulatedJudge::constant("defense", score(4))]))
        .run(&AuditRequest::repo(repo.locator()))
        .await;
    let b = &outcome.report.criteria[1];
    assert!(b.degraded);
    assert_eq!(b.opinions.len(), 1);
    assert_eq!(b.final_score, 4.0);
}

#[tokio::test]
async fn unreadable_document_degrades_document_criteria_only() {
    let repo = FixtureRepo::well_built();
    let dir = tempfile::tempdir().unwrap();
    let request = AuditRequest::repo(repo.locator()).with_document(dir.path().join("missing.md"));

    let outcome = AuditPipeline::new(workspace_rubric(), test_config())
        .unwrap()
        .run(&request)
        .await;
    let report = &outcome.report;

    assert_eq!(report.extraction_failures.len(), 1);
    assert!(report.extraction_failures[0].starts_with("doc_analyst:"));
    assert_eq!(
        report.degraded_keys,
        vec![
            "doc_analyst_report_accuracy".to_string(),
            "doc_analyst_theoretical_depth".to_string()
        ]
    );
    for result in &report.criteria {
        let document_criterion = matches!(result.criterion_id.as_str(), "report_accuracy" | "theoretical_depth");
        assert_eq!(result.degraded, document_criterion, "{}", result.criterion_id);
    }
    assert_eq!(report.score_of("state_management_rigor"), Some(5.0));
}
