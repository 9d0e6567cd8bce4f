//! End-to-end orchestration of one audit.

use crate::config::AuditConfig;
use crate::error::PipelineError;
use futures::future::join_all;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use verdict_bench::Bench;
use verdict_evidence::{AuditState, CompletenessGate};
use verdict_forensics::{
    failure_evidence, is_failure_record, DiagramClassifier, DocAnalyst, Extractor, Materials, ProcessRunner,
    RepoInvestigator, VisionInspector,
};
use verdict_justice::ChiefJustice;
use verdict_report::{render_json, render_markdown, write_report, AuditReport, RunMetadata};
use verdict_types::{ArtifactKind, Criterion, Rubric};

/// What to audit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuditRequest {
    /// Git URL, or a local path (cloned if it is a git work tree, copied
    /// otherwise).
    pub repo_locator: String,
    pub document: Option<PathBuf>,
    pub images: Option<PathBuf>,
}

impl AuditRequest {
    pub fn repo(locator: impl Into<String>) -> Self {
        Self {
            repo_locator: locator.into(),
            document: None,
            images: None,
        }
    }

    pub fn with_document(mut self, path: impl Into<PathBuf>) -> Self {
        self.document = Some(path.into());
        self
    }

    pub fn with_images(mut self, dir: impl Into<PathBuf>) -> Self {
        self.images = Some(dir.into());
        self
    }

    /// Artifacts this request supplies. The repository is always one.
    pub fn artifacts(&self) -> BTreeSet<ArtifactKind> {
        let mut kinds = BTreeSet::from([ArtifactKind::GithubRepo]);
        if self.document.is_some() {
            kinds.insert(ArtifactKind::PdfReport);
        }
        if self.images.is_some() {
            kinds.insert(ArtifactKind::PdfImages);
        }
        kinds
    }
}

#[derive(Clone, Debug)]
pub struct AuditOutcome {
    pub report: AuditReport,
    pub markdown: String,
}

pub struct AuditPipeline {
    rubric: Rubric,
    config: AuditConfig,
    clone_runner: ProcessRunner,
    extractors: Vec<Arc<dyn Extractor>>,
    bench: Bench,
    justice: ChiefJustice,
}

impl AuditPipeline {
    /// The standard extractors and the configured bench.
    pub fn new(rubric: Rubric, config: AuditConfig) -> Result<Self, PipelineError> {
        let bench = config.build_bench()?;
        let clone_runner = ProcessRunner::new(config.clone_timeout());
        let git_log = clone_runner.clone().with_timeout(config.git_log_timeout());
        let extractors: Vec<Arc<dyn Extractor>> = vec![
            Arc::new(RepoInvestigator::new(git_log)),
            Arc::new(DocAnalyst),
            Arc::new(VisionInspector::new()),
        ];
        Ok(Self {
            clone_runner,
            justice: ChiefJustice::from_rubric(&rubric),
            extractors,
            bench,
            rubric,
            config,
        })
    }

    /// Load the rubric named by the config.
    pub fn from_config(config: AuditConfig) -> Result<Self, PipelineError> {
        let rubric = Rubric::load(&config.rubric_path)?;
        Self::new(rubric, config)
    }

    pub fn with_bench(mut self, bench: Bench) -> Self {
        self.bench = bench;
        self
    }

    pub fn with_extractors(mut self, extractors: Vec<Arc<dyn Extractor>>) -> Self {
        self.extractors = extractors;
        self
    }

    /// Give the vision inspector a diagram classifier.
    pub fn with_classifier(mut self, classifier: Arc<dyn DiagramClassifier>) -> Self {
        self.extractors.retain(|e| e.id() != VisionInspector::ID);
        self.extractors
            .push(Arc::new(VisionInspector::new().with_classifier(classifier)));
        self
    }

    pub fn rubric(&self) -> &Rubric {
        &self.rubric
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Rubric criteria judged for `request`, in rubric order.
    pub fn criteria_for(&self, request: &AuditRequest) -> Vec<Criterion> {
        let artifacts = request.artifacts();
        self.rubric
            .dimensions
            .iter()
            .filter(|c| artifacts.contains(&c.target_artifact))
            .cloned()
            .collect()
    }

    /// Run the audit. Always produces a report: extraction and judgment
    /// failures degrade it rather than abort it.
    #[instrument(skip_all, fields(repo = %request.repo_locator))]
    pub async fn run(&self, request: &AuditRequest) -> AuditOutcome {
        let metadata = RunMetadata::begin(request.repo_locator.as_str(), &self.rubric);
        let criteria = self.criteria_for(request);
        let artifacts = request.artifacts();

        let materials = Materials::materialise(
            &request.repo_locator,
            request.document.clone(),
            request.images.clone(),
            &self.clone_runner,
        )
        .await;

        // ── Extraction fan-out ──
        let active: Vec<(&dyn Extractor, Vec<Criterion>)> = self
            .extractors
            .iter()
            .filter(|e| artifacts.contains(&e.artifact()))
            .map(|e| {
                let owned = criteria
                    .iter()
                    .filter(|c| c.target_artifact == e.artifact())
                    .cloned()
                    .collect();
                (e.as_ref(), owned)
            })
            .collect();
        info!(extractors = active.len(), criteria = criteria.len(), "extraction started");
        let batches = join_all(
            active
                .iter()
                .map(|(extractor, owned)| extractor.extract(&materials, owned)),
        )
        .await;

        let mut state = AuditState::new();
        let mut degraded: BTreeSet<String> = BTreeSet::new();
        let mut degraded_keys: Vec<String> = Vec::new();
        let mut extraction_failures = Vec::new();
        for ((extractor, owned), batch) in active.iter().zip(batches) {
            let batch = match batch {
                Ok(batch) => batch,
                Err(err) => {
                    warn!(extractor = extractor.id(), error = %err, "extractor failed");
                    extraction_failures.push(format!("{}: {err}", extractor.id()));
                    failure_evidence(extractor.id(), owned, &err)
                }
            };
            // A protocol that failed on its own criterion degrades only that one.
            for (key, records) in &batch {
                if records.iter().any(is_failure_record) {
                    degraded.insert(key.criterion_id.clone());
                    degraded_keys.push(key.to_string());
                }
            }
            state.merge_evidence(batch);
        }

        // ── Completeness gate ──
        let owners: BTreeMap<ArtifactKind, String> = active
            .iter()
            .map(|(e, _)| (e.artifact(), e.id().to_string()))
            .collect();
        let gate = CompletenessGate::from_rubric(&self.rubric, &owners);
        match gate.check(state.evidence()) {
            Ok(()) => info!(version = state.version(), "evidence complete"),
            Err(err) => {
                degraded.extend(err.missing.iter().map(|k| k.criterion_id.clone()));
                degraded_keys.extend(err.missing.iter().map(ToString::to_string));
                state.merge_evidence(CompletenessGate::degraded_records(&err));
            }
        }

        // ── Judicial fan-out ──
        let mut deliberation = state.close_evidence();
        let snapshot = deliberation.snapshot();
        info!(judges = self.bench.judge_ids().len(), digest = %snapshot.digest(), "deliberation started");
        let bench = self.bench.convene(&criteria, &snapshot).await;
        deliberation.append_opinions(bench.opinions);
        let audit = deliberation.freeze();

        // ── Adjudication ──
        let results = self.justice.adjudicate_all(&criteria, &audit, &degraded);
        let metadata = metadata.with_evidence_digest(audit.digest()).finish();
        let report = AuditReport::new(metadata, results, &criteria)
            .with_degraded_keys(degraded_keys)
            .with_judge_failures(bench.failures)
            .with_extraction_failures(extraction_failures);
        let markdown = render_markdown(&report);
        info!(
            overall = report.summary.overall_score,
            grade = %report.summary.grade,
            "audit complete"
        );
        AuditOutcome { report, markdown }
    }

    /// Run, then write the Markdown and/or JSON report. Only an unwritable
    /// output path fails.
    pub async fn run_and_write(
        &self,
        request: &AuditRequest,
        markdown_path: Option<&Path>,
        json_path: Option<&Path>,
    ) -> Result<AuditOutcome, PipelineError> {
        let outcome = self.run(request).await;
        if let Some(path) = markdown_path {
            write_report(path, &outcome.markdown)?;
            info!(path = %path.display(), "markdown report written");
        }
        if let Some(path) = json_path {
            write_report(path, &render_json(&outcome.report)?)?;
            info!(path = %path.display(), "json report written");
        }
        Ok(outcome)
    }
}
