//! # verdict-forensics
//!
//! **Forensic extractors**: turn raw evidence sources into immutable
//! [`Evidence`](verdict_types::Evidence) records, one per rubric criterion.
//!
//! ```text
//! locator ──► RepoSandbox (tempdir, git clone under ProcessRunner timeout)
//!                 │
//!                 ├── history    git log ──► commit shape
//!                 └── detectors  parse ──► Visitor + ImportTable ──► confidence ladder
//! document ──► ReportDocument ──► theoretical depth, path cross-reference
//! images   ──► scan ──► DiagramClassifier
//! ```
//!
//! Program source is always parsed and matched on node shape; comments,
//! string literals and variable names never count as a construct.
//!
//! ## Key Types
//!
//! - [`Extractor`] — async trait; [`RepoInvestigator`], [`DocAnalyst`], [`VisionInspector`]
//! - [`Materials`] — sources materialised once per audit
//! - [`RepoSandbox`] — isolated checkout removed on drop
//! - [`ProcessRunner`] — time-boxed, output-capturing process execution
//! - [`ExtractionError`] — recoverable; becomes synthetic evidence via [`failure_evidence`]

#![deny(unsafe_code)]

pub mod detectors;
pub mod document;
pub mod error;
pub mod extractor;
pub mod failure;
pub mod history;
pub mod images;
pub mod materials;
pub mod process;
pub mod sandbox;
pub mod similarity;
pub mod syntax;

// Re-exports
pub use document::ReportDocument;
pub use error::ExtractionError;
pub use extractor::{DocAnalyst, Extractor, RepoInvestigator, VisionInspector};
pub use failure::{failure_evidence, failure_record, is_failure_record};
pub use images::{DiagramClassifier, DiagramKind, SimulatedClassifier};
pub use materials::Materials;
pub use process::{ProcessOutput, ProcessRunner};
pub use sandbox::RepoSandbox;
