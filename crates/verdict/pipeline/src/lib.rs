//! # verdict-pipeline
//!
//! **Orchestration** of a Verdict audit, from repository locator to
//! rendered report.
//!
//! ```text
//! AuditRequest
//!     │  materialise (clone / copy into a sandbox)
//!     ▼
//! join_all(extractors) ──► merge (failures ► synthetic evidence)
//!     │  completeness gate (missing ► degraded records)
//!     ▼
//! close_evidence ──► snapshot ──► Bench::convene (join_all)
//!     │  freeze
//!     ▼
//! ChiefJustice::adjudicate_all ──► AuditReport ──► Markdown / JSON
//! ```
//!
//! ## Key Types
//!
//! - [`AuditPipeline`] — Runs one audit; never aborts on forensic or judicial failure
//! - [`AuditConfig`] — TOML configuration with `strict()` / `fast()` presets

#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod pipeline;

// Re-exports
pub use config::{default_roster, AuditConfig, JudgeKind, JudgeSpec};
pub use error::{ConfigError, PipelineError};
pub use pipeline::{AuditOutcome, AuditPipeline, AuditRequest};
