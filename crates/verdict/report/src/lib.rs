//! # verdict-report
//!
//! **Report rendering** for the Verdict pipeline.
//!
//! ```text
//! Vec<CriterionResult> + RunMetadata
//!     │
//!     ▼
//! AuditReport ──► render_markdown ──► parse_scores (round-trip)
//!             └─► render_json
//! ```
//!
//! ## Key Types
//!
//! - [`AuditReport`] — Rulings, verdict summary and forensic notes for one run
//! - [`RunMetadata`] — Run id, timestamps, rubric identity, evidence digest

#![deny(unsafe_code)]

pub mod error;
pub mod markdown;
pub mod model;
pub mod write;

// Re-exports
pub use error::ReportError;
pub use markdown::{flatten, parse_scores, render_json, render_markdown, MarkdownReport};
pub use model::{AuditReport, RunMetadata};
pub use write::write_report;
