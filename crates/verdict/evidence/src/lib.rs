#![deny(unsafe_code)]
//! # verdict-evidence
//!
//! The audit's shared state and the only two ways to write to it.
//!
//! ## Key Types
//!
//! - [`EvidenceMap`] / [`merge`] — Key-union merge of namespaced evidence lists
//! - [`collect`] — Append-only opinion collection
//! - [`Reducer`] / [`KeyUnion`] / [`Append`] — Merge strategies injected into state channels
//! - [`AuditState`] → [`Deliberation`] → [`FrozenAudit`] — Versioned lifecycle of the ledger
//! - [`CompletenessGate`] — Required-key check with a degraded fallback

pub mod collector;
pub mod error;
pub mod gate;
pub mod reducer;
pub mod state;
pub mod store;

pub use collector::{collect, collect_all, group_by_criterion};
pub use error::CompletenessError;
pub use gate::{CompletenessGate, MISSING_EVIDENCE_PREFIX};
pub use reducer::{Append, Channel, KeyUnion, Reducer};
pub use state::{AuditState, Deliberation, EvidenceSnapshot, FrozenAudit};
pub use store::{evidence_for, merge, EvidenceMap};
