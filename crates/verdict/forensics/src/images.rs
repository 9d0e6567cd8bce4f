//! Architecture diagrams: image scanning and the diagram classifier
//! seam with its simulated implementation.
//!
//! Images are never decoded here. Classification is delegated to a
//! [`DiagramClassifier`]; without one, the inspector can only report that
//! images exist.

use crate::error::ExtractionError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use verdict_types::{Confidence, Evidence};

pub const CRITERION: &str = "swarm_visual";

pub const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "svg", "webp"];

// ── Classification ─────────────────────────────────────────────────────

/// What an image depicts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagramKind {
    /// Parallel branches that fan out and join again.
    ParallelFanOut,
    /// A sequential flowchart.
    Linear,
    /// Not an architecture diagram.
    Other,
}

/// Classifies a single image file.
#[async_trait]
pub trait DiagramClassifier: Send + Sync {
    async fn classify(&self, image: &Path) -> Result<DiagramKind, ExtractionError>;

    /// Name of this classifier for logging.
    fn name(&self) -> &str;
}

// ── Simulated Classifier ───────────────────────────────────────────────

/// Deterministic classifier keyed by file name.
pub struct SimulatedClassifier {
    verdicts: BTreeMap<String, DiagramKind>,
    fallback: DiagramKind,
    failing: bool,
}

impl SimulatedClassifier {
    /// Every image classifies as `kind`.
    pub fn uniform(kind: DiagramKind) -> Self {
        Self {
            verdicts: BTreeMap::new(),
            fallback: kind,
            failing: false,
        }
    }

    /// Every classification fails.
    pub fn failing() -> Self {
        Self {
            verdicts: BTreeMap::new(),
            fallback: DiagramKind::Other,
            failing: true,
        }
    }

    pub fn with_verdict(mut self, file_name: impl Into<String>, kind: DiagramKind) -> Self {
        self.verdicts.insert(file_name.into(), kind);
        self
    }
}

#[async_trait]
impl DiagramClassifier for SimulatedClassifier {
    async fn classify(&self, image: &Path) -> Result<DiagramKind, ExtractionError> {
        if self.failing {
            return Err(ExtractionError::Classification(format!(
                "simulated failure on {}",
                image.display()
            )));
        }
        let name = image
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(self.verdicts.get(&name).copied().unwrap_or(self.fallback))
    }

    fn name(&self) -> &str {
        "simulated"
    }
}

// ── Scan + Evidence ────────────────────────────────────────────────────

/// Image files directly inside `dir`, sorted.
pub fn scan_images(dir: &Path) -> Result<Vec<PathBuf>, ExtractionError> {
    if !dir.is_dir() {
        return Err(ExtractionError::SourceUnavailable(format!(
            "image directory {} not found",
            dir.display()
        )));
    }
    let entries = fs::read_dir(dir).map_err(|e| ExtractionError::io(dir.display(), e))?;
    let mut images = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| ExtractionError::io(dir.display(), e))?.path();
        let is_image = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()));
        if is_image && path.is_file() {
            images.push(path);
        }
    }
    images.sort();
    Ok(images)
}

pub async fn diagram_evidence(
    criterion_id: &str,
    images: &[PathBuf],
    classifier: Option<&dyn DiagramClassifier>,
) -> Evidence {
    let Some(first) = images.first() else {
        return Evidence::absent(criterion_id, "no images supplied", 1.0);
    };
    let first = first.display().to_string();
    let Some(classifier) = classifier else {
        return Evidence::located(
            criterion_id,
            first,
            format!("{} image(s) present; no diagram classifier configured", images.len()),
            0.3,
        );
    };

    let mut parallel = None;
    let mut linear = None;
    let mut failures = 0usize;
    for image in images {
        match classifier.classify(image).await {
            Ok(DiagramKind::ParallelFanOut) => {
                parallel.get_or_insert_with(|| image.display().to_string());
            }
            Ok(DiagramKind::Linear) => {
                linear.get_or_insert_with(|| image.display().to_string());
            }
            Ok(DiagramKind::Other) => {}
            Err(err) => {
                warn!(classifier = classifier.name(), image = %image.display(), error = %err, "classification failed");
                failures += 1;
            }
        }
    }

    if let Some(location) = parallel {
        Evidence::located(
            criterion_id,
            location,
            "diagram shows parallel fan-out with fan-in",
            1.0,
        )
    } else if let Some(location) = linear {
        Evidence::new(
            criterion_id,
            false,
            location,
            "only linear flowcharts; no parallel branches depicted",
            Confidence::saturating(0.6),
        )
    } else if failures == images.len() {
        Evidence::located(
            criterion_id,
            first,
            format!("{} image(s) present; every classification failed", images.len()),
            0.3,
        )
    } else {
        Evidence::new(
            criterion_id,
            false,
            first,
            format!("none of {} image(s) is an architecture diagram", images.len()),
            Confidence::saturating(0.7),
        )
    }
}
