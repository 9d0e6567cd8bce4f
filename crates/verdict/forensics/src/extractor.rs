//! Extractors: one per evidence source, each owning the rubric criteria that
//! target its artifact.

use crate::detectors;
use crate::document::{self, ReportDocument};
use crate::error::ExtractionError;
use crate::history;
use crate::images::{self, DiagramClassifier};
use crate::materials::Materials;
use crate::process::ProcessRunner;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use verdict_evidence::EvidenceMap;
use verdict_types::{ArtifactKind, Criterion, Evidence, EvidenceKey};

/// Confidence of the placeholder emitted for a criterion no protocol covers.
pub const NO_PROTOCOL_CONFIDENCE: f64 = 0.5;

/// A forensic extractor.
///
/// `extract` returns one record per criterion in `criteria`, keyed under
/// this extractor's id. An `Err` means the source as a whole was
/// unusable; the caller synthesises failure evidence for every criterion.
#[async_trait]
pub trait Extractor: Send + Sync {
    fn id(&self) -> &str;

    fn artifact(&self) -> ArtifactKind;

    async fn extract(
        &self,
        materials: &Materials,
        criteria: &[Criterion],
    ) -> Result<EvidenceMap, ExtractionError>;
}

fn no_protocol(criterion_id: &str, extractor_id: &str) -> Evidence {
    Evidence::absent(
        criterion_id,
        format!("no forensic protocol for '{criterion_id}' in {extractor_id}"),
        NO_PROTOCOL_CONFIDENCE,
    )
}

fn keyed(extractor_id: &str, records: impl IntoIterator<Item = Evidence>) -> EvidenceMap {
    records
        .into_iter()
        .map(|ev| {
            (
                EvidenceKey::new(extractor_id, ev.criterion_id()),
                vec![ev],
            )
        })
        .collect()
}

// ── Repository Investigator ────────────────────────────────────────────

/// Source structure and commit history of the cloned repository.
pub struct RepoInvestigator {
    git: ProcessRunner,
}

impl RepoInvestigator {
    pub const ID: &'static str = "repo_investigator";

    /// `git` runs `git log` with its own timeout.
    pub fn new(git: ProcessRunner) -> Self {
        Self { git }
    }
}

#[async_trait]
impl Extractor for RepoInvestigator {
    fn id(&self) -> &str {
        Self::ID
    }

    fn artifact(&self) -> ArtifactKind {
        ArtifactKind::GithubRepo
    }

    #[instrument(skip_all, fields(extractor = "repo_investigator"))]
    async fn extract(
        &self,
        materials: &Materials,
        criteria: &[Criterion],
    ) -> Result<EvidenceMap, ExtractionError> {
        let repo = materials.repo()?;
        let mut records = Vec::with_capacity(criteria.len());
        for criterion in criteria {
            let id = criterion.id.as_str();
            let evidence = if id == history::CRITERION {
                if repo.has_dir(".git") {
                    let commits = history::read_history(&self.git, repo.path()).await;
                    history::history_evidence(id, commits)
                } else {
                    history::unversioned_evidence(id)
                }
            } else {
                detectors::detect(id, repo).unwrap_or_else(|| no_protocol(id, Self::ID))
            };
            debug!(criterion = id, found = evidence.found(), confidence = %evidence.confidence(), "protocol complete");
            records.push(evidence);
        }
        Ok(keyed(Self::ID, records))
    }
}

// ── Document Analyst ───────────────────────────────────────────────────

/// Theoretical depth and path accuracy of the report document.
#[derive(Default)]
pub struct DocAnalyst;

impl DocAnalyst {
    pub const ID: &'static str = "doc_analyst";
}

#[async_trait]
impl Extractor for DocAnalyst {
    fn id(&self) -> &str {
        Self::ID
    }

    fn artifact(&self) -> ArtifactKind {
        ArtifactKind::PdfReport
    }

    #[instrument(skip_all, fields(extractor = "doc_analyst"))]
    async fn extract(
        &self,
        materials: &Materials,
        criteria: &[Criterion],
    ) -> Result<EvidenceMap, ExtractionError> {
        let doc = materials.document().map(ReportDocument::load).transpose()?;
        let tree = match materials.repo().and_then(|r| r.file_tree()) {
            Ok(tree) => Some(tree),
            Err(err) => {
                warn!(error = %err, "repository file tree unavailable for cross-reference");
                None
            }
        };
        let records = criteria.iter().map(|criterion| {
            let id = criterion.id.as_str();
            match id {
                document::DEPTH_CRITERION => document::depth_evidence(id, doc.as_ref()),
                document::ACCURACY_CRITERION => {
                    document::accuracy_evidence(id, doc.as_ref(), tree.as_ref())
                }
                _ => no_protocol(id, Self::ID),
            }
        });
        Ok(keyed(Self::ID, records))
    }
}

// ── Vision Inspector ───────────────────────────────────────────────────

/// Architecture diagrams among the report's images.
#[derive(Default)]
pub struct VisionInspector {
    classifier: Option<Arc<dyn DiagramClassifier>>,
}

impl VisionInspector {
    pub const ID: &'static str = "vision_inspector";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn DiagramClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }
}

#[async_trait]
impl Extractor for VisionInspector {
    fn id(&self) -> &str {
        Self::ID
    }

    fn artifact(&self) -> ArtifactKind {
        ArtifactKind::PdfImages
    }

    #[instrument(skip_all, fields(extractor = "vision_inspector"))]
    async fn extract(
        &self,
        materials: &Materials,
        criteria: &[Criterion],
    ) -> Result<EvidenceMap, ExtractionError> {
        let found = match materials.images() {
            Some(dir) => images::scan_images(dir)?,
            None => Vec::new(),
        };
        let mut records = Vec::with_capacity(criteria.len());
        for criterion in criteria {
            let id = criterion.id.as_str();
            let evidence = if id == images::CRITERION {
                images::diagram_evidence(id, &found, self.classifier.as_deref()).await
            } else {
                no_protocol(id, Self::ID)
            };
            records.push(evidence);
        }
        Ok(keyed(Self::ID, records))
    }
}
