#![deny(unsafe_code)]
//! # verdict-types
//!
//! Shared data model for the Verdict audit pipeline.
//!
//! ## Key Types
//!
//! - [`Evidence`] — Immutable forensic finding about one rubric criterion
//! - [`JudgeEvidence`] — The subset of an [`Evidence`] a judge is allowed to see
//! - [`EvidenceKey`] — Namespaced `{extractor}_{criterion}` ledger key
//! - [`Opinion`] — A judge's scored, untrusted assessment of one criterion
//! - [`CriterionResult`] — The Chief Justice's ruling on one criterion
//! - [`Rubric`] — Externally configured criteria + synthesis rules

pub mod error;
pub mod evidence;
pub mod opinion;
pub mod result;
pub mod rubric;

pub use error::RubricError;
pub use evidence::{Confidence, Evidence, EvidenceKey, JudgeEvidence, NOT_APPLICABLE};
pub use opinion::{JudgeId, Opinion, Score};
pub use result::{CriterionResult, Dissent, DissentVoice, JudgeFailure};
pub use rubric::{ArtifactKind, Criterion, Rubric, SynthesisRules, WeightedCriterion};
