//! # verdict-justice
//!
//! **Chief Justice** for the Verdict pipeline: deterministic adjudication of
//! judge opinions against frozen forensic evidence.
//!
//! ```text
//! FrozenAudit ──► per criterion:
//!                   1. Security        cap at security_cap on a marker hit
//!                   2. Fact supremacy  unverified citation ► score 1
//!                   3. Aggregation     (weighted) mean, one decimal
//!                   4. Dissent         pre-overrule range > threshold
//!             ──► Vec<CriterionResult> ──► VerdictSummary
//! ```
//!
//! No model is ever consulted here and nothing can fail: malformed or
//! overreaching opinions are neutralised by the rules themselves.
//!
//! ## Key Types
//!
//! - [`ChiefJustice`] — Rule engine, configured from the rubric's synthesis rules
//! - [`VerdictSummary`] — Overall score, [`Grade`] and [`Standing`]

#![deny(unsafe_code)]

pub mod engine;
pub mod remediation;
pub mod rules;
pub mod summary;

// Re-exports
pub use engine::ChiefJustice;
pub use summary::{Grade, Standing, VerdictSummary};
