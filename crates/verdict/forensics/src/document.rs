//! Report document analysis over pre-extracted text.
//!
//! Prose is matched with plain text search and a path regex; structural
//! matching is reserved for program source.

use crate::error::ExtractionError;
use regex::Regex;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use verdict_types::{Confidence, Evidence};

pub const DEPTH_CRITERION: &str = "theoretical_depth";
pub const ACCURACY_CRITERION: &str = "report_accuracy";

const TEXT_EXTENSIONS: [&str; 4] = ["md", "markdown", "txt", "rst"];

pub const THEORETICAL_TERMS: [&str; 8] = [
    "dialectical synthesis",
    "fan-in",
    "fan-out",
    "metacognition",
    "state synchronization",
    "evidence aggregation",
    "adversarial",
    "persona collusion",
];

const EXPLANATION_MARKERS: [&str; 6] = [
    "because",
    "implement",
    "architecture",
    "design",
    "pattern",
    "ensure",
];

/// Characters either side of a term searched for an explanation marker.
pub const EXPLANATION_WINDOW: usize = 200;
pub const DEPTH_THRESHOLD: usize = 3;

static PATH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:src|tests)/[\w/]+\.py\b|\brubric\.json\b|\bCLAUDE\.md\b")
        .expect("valid path pattern")
});

/// A report document reduced to its text.
#[derive(Clone, Debug)]
pub struct ReportDocument {
    pub path: PathBuf,
    pub text: String,
}

impl ReportDocument {
    /// Load a text document. A `.pdf` resolves to a sibling text file with
    /// the same stem.
    pub fn load(path: &Path) -> Result<Self, ExtractionError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        let text_path = if TEXT_EXTENSIONS.contains(&extension.as_str()) {
            path.to_path_buf()
        } else if extension == "pdf" {
            TEXT_EXTENSIONS
                .iter()
                .map(|ext| path.with_extension(ext))
                .find(|candidate| candidate.is_file())
                .ok_or_else(|| {
                    ExtractionError::UnsupportedDocument(format!(
                        "{}: no extracted text alongside the PDF (expected {}.md or .txt)",
                        path.display(),
                        path.with_extension("").display()
                    ))
                })?
        } else {
            return Err(ExtractionError::UnsupportedDocument(format!(
                "{}: unsupported extension '{extension}'",
                path.display()
            )));
        };

        let text =
            fs::read_to_string(&text_path).map_err(|e| ExtractionError::io(text_path.display(), e))?;
        Ok(Self {
            path: path.to_path_buf(),
            text,
        })
    }

    pub fn from_text(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    pub fn location(&self) -> String {
        self.path.display().to_string()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DepthFindings {
    pub terms_found: Vec<&'static str>,
    /// Terms with an explanation marker nearby.
    pub substantive: Vec<&'static str>,
}

impl DepthFindings {
    pub fn has_depth(&self) -> bool {
        self.substantive.len() >= DEPTH_THRESHOLD
    }
}

fn floor_boundary(text: &str, mut index: usize) -> usize {
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn ceil_boundary(text: &str, mut index: usize) -> usize {
    while index < text.len() && !text.is_char_boundary(index) {
        index += 1;
    }
    index
}

pub fn theoretical_depth(text: &str) -> DepthFindings {
    let lower = text.to_lowercase();
    let mut findings = DepthFindings::default();
    for term in THEORETICAL_TERMS {
        let Some(at) = lower.find(term) else { continue };
        findings.terms_found.push(term);
        let start = floor_boundary(&lower, at.saturating_sub(EXPLANATION_WINDOW));
        let end = ceil_boundary(&lower, (at + term.len() + EXPLANATION_WINDOW).min(lower.len()));
        let window = &lower[start..end];
        if EXPLANATION_MARKERS.iter().any(|m| window.contains(m)) {
            findings.substantive.push(term);
        }
    }
    findings
}

/// Repository paths mentioned in the prose, deduplicated and sorted.
pub fn mentioned_paths(text: &str) -> BTreeSet<String> {
    PATH_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CrossReference {
    pub verified: Vec<String>,
    pub hallucinated: Vec<String>,
}

impl CrossReference {
    /// Share of mentioned paths that exist; 1.0 when nothing is mentioned.
    pub fn accuracy(&self) -> f64 {
        let total = self.verified.len() + self.hallucinated.len();
        if total == 0 {
            1.0
        } else {
            self.verified.len() as f64 / total as f64
        }
    }
}

pub fn cross_reference(mentioned: &BTreeSet<String>, tree: &BTreeSet<String>) -> CrossReference {
    let (verified, hallucinated) = mentioned.iter().cloned().partition(|p| tree.contains(p));
    CrossReference {
        verified,
        hallucinated,
    }
}

pub fn depth_evidence(criterion_id: &str, document: Option<&ReportDocument>) -> Evidence {
    let Some(doc) = document else {
        return Evidence::absent(criterion_id, "no report document supplied", 1.0);
    };
    let location = doc.location();
    let f = theoretical_depth(&doc.text);
    let summary = format!(
        "{} of {} theoretical terms present, {} explained ({})",
        f.terms_found.len(),
        THEORETICAL_TERMS.len(),
        f.substantive.len(),
        f.substantive.join(", ")
    );
    if f.has_depth() {
        Evidence::located(criterion_id, location, format!("substantive theory: {summary}"), 1.0)
    } else if !f.substantive.is_empty() {
        Evidence::located(criterion_id, location, format!("shallow theory: {summary}"), 0.6)
    } else if !f.terms_found.is_empty() {
        Evidence::new(
            criterion_id,
            false,
            location,
            format!("terms used without explanation ({})", f.terms_found.join(", ")),
            Confidence::saturating(0.8),
        )
    } else {
        Evidence::new(
            criterion_id,
            false,
            location,
            "no theoretical terms in the report",
            Confidence::saturating(0.9),
        )
    }
}

/// `tree` is the cloned repository's file tree, when the clone succeeded.
pub fn accuracy_evidence(
    criterion_id: &str,
    document: Option<&ReportDocument>,
    tree: Option<&BTreeSet<String>>,
) -> Evidence {
    let Some(doc) = document else {
        return Evidence::absent(criterion_id, "no report document supplied", 1.0);
    };
    let location = doc.location();
    let mentioned = mentioned_paths(&doc.text);
    let Some(tree) = tree else {
        return Evidence::new(
            criterion_id,
            false,
            location,
            format!(
                "{} path(s) mentioned; repository unavailable for cross-reference",
                mentioned.len()
            ),
            Confidence::saturating(0.2),
        );
    };
    if mentioned.is_empty() {
        return Evidence::new(
            criterion_id,
            false,
            location,
            "report mentions no repository paths to verify",
            Confidence::saturating(0.5),
        );
    }

    // Paths are quoted from the document, so they stay out of the rationale.
    let xref = cross_reference(&mentioned, tree);
    let ratio = xref.accuracy();
    let rationale = format!(
        "{}/{} mentioned paths exist (accuracy {ratio:.2}), {} hallucinated",
        xref.verified.len(),
        mentioned.len(),
        xref.hallucinated.len()
    );
    let raw = format!(
        "verified: {}\nhallucinated: {}",
        xref.verified.join(", "),
        xref.hallucinated.join(", ")
    );
    let evidence = if xref.verified.is_empty() {
        Evidence::new(
            criterion_id,
            false,
            location,
            rationale,
            Confidence::CERTAIN,
        )
    } else {
        Evidence::located(criterion_id, location, rationale, ratio)
    };
    evidence.with_raw_content(raw)
}
