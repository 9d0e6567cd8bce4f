//! # verdict-bench
//!
//! **Judicial bench** for the Verdict pipeline.
//!
//! ```text
//! EvidenceSnapshot (frozen)
//!     │
//!     ▼
//! Bench::convene ── join_all over (criterion × judge)
//!     │   └── invoke: timeout ► retry with backoff ► addressed check
//!     ▼
//! BenchOutcome { opinions, failures }
//! ```
//!
//! ## Traits
//!
//! - [`Judge`] — one opinion per request; implemented by [`HeuristicJudge`]
//!   (no model, posture-parameterised), [`CommandJudge`] (external program
//!   over JSON) and [`SimulatedJudge`] (scripted, for testing)
//!
//! Persona charters are checked offline by [`persona::PersonaSet::check`].

#![deny(unsafe_code)]

pub mod bench;
pub mod command;
pub mod error;
pub mod heuristic;
pub mod judge;
pub mod persona;
pub mod simulated;

// Re-exports
pub use bench::{Bench, BenchOutcome, RetryPolicy};
pub use command::CommandJudge;
pub use error::{JudgmentError, PersonaError};
pub use heuristic::{HeuristicJudge, Posture};
pub use judge::{CriterionBrief, Judge, JudgmentRequest, JudgmentResponse};
pub use persona::{PersonaReport, PersonaSet};
pub use simulated::{SimulatedFault, SimulatedJudge};
