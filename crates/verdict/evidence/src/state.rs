//! Audit state lifecycle.
//!
//! The ledger moves through three phases, each a distinct type:
//!
//! 1. [`AuditState`]: extractors write evidence through the [`KeyUnion`] channel.
//! 2. [`Deliberation`]: evidence is sealed into an [`EvidenceSnapshot`]; judges
//!    write opinions through the [`Append`] channel.
//! 3. [`FrozenAudit`]: read-only input to adjudication.
//!
//! Every write bumps the version. No phase can be re-entered.

use crate::reducer::{Append, Channel, KeyUnion, Reducer};
use crate::store::{self, EvidenceMap};
use std::sync::Arc;
use tracing::debug;
use verdict_types::{Evidence, JudgeEvidence, Opinion};

/// Evidence-collection phase.
pub struct AuditState<E = KeyUnion, O = Append>
where
    E: Reducer<EvidenceMap>,
    O: Reducer<Vec<Opinion>>,
{
    evidences: Channel<EvidenceMap, E>,
    opinion_reducer: O,
    version: u64,
}

impl AuditState {
    pub fn new() -> Self {
        Self::with_reducers(KeyUnion, Append)
    }
}

impl Default for AuditState {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, O> AuditState<E, O>
where
    E: Reducer<EvidenceMap>,
    O: Reducer<Vec<Opinion>>,
{
    pub fn with_reducers(evidence_reducer: E, opinion_reducer: O) -> Self {
        Self {
            evidences: Channel::new(evidence_reducer),
            opinion_reducer,
            version: 0,
        }
    }

    /// Merge one extractor's batch. Returns the new version.
    pub fn merge_evidence(&mut self, batch: EvidenceMap) -> u64 {
        let keys = batch.len();
        self.evidences.write(batch);
        self.version += 1;
        debug!(version = self.version, keys, "evidence merged");
        self.version
    }

    pub fn evidence(&self) -> &EvidenceMap {
        self.evidences.get()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Seal the evidence. Nothing can be added after this.
    pub fn close_evidence(self) -> Deliberation<O> {
        let snapshot = Arc::new(EvidenceSnapshot::new(self.evidences.into_inner()));
        debug!(version = self.version, digest = %snapshot.digest(), "evidence sealed");
        Deliberation {
            snapshot,
            opinions: Channel::new(self.opinion_reducer),
            version: self.version,
        }
    }
}

/// Sealed evidence plus its BLAKE3 digest. Shared by every judge.
#[derive(Clone, Debug, PartialEq)]
pub struct EvidenceSnapshot {
    map: EvidenceMap,
    digest: String,
}

impl EvidenceSnapshot {
    pub fn new(map: EvidenceMap) -> Self {
        let digest = digest_evidence(&map);
        Self { map, digest }
    }

    pub fn evidence(&self) -> &EvidenceMap {
        &self.map
    }

    /// Hex digest over the serialisable fields of every record, in key order.
    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn evidence_for(&self, criterion_id: &str) -> Vec<&Evidence> {
        store::evidence_for(&self.map, criterion_id)
    }

    /// Judge-facing view of one criterion's evidence. No raw content.
    pub fn judge_evidence_for(&self, criterion_id: &str) -> Vec<JudgeEvidence> {
        self.evidence_for(criterion_id)
            .into_iter()
            .map(Evidence::for_judge)
            .collect()
    }
}

fn digest_evidence(map: &EvidenceMap) -> String {
    fn field(hasher: &mut blake3::Hasher, value: &str) {
        hasher.update(&(value.len() as u64).to_le_bytes());
        hasher.update(value.as_bytes());
    }

    let mut hasher = blake3::Hasher::new();
    for (key, list) in map {
        field(&mut hasher, &key.extractor_id);
        field(&mut hasher, &key.criterion_id);
        hasher.update(&(list.len() as u64).to_le_bytes());
        for ev in list {
            field(&mut hasher, ev.criterion_id());
            hasher.update(&[u8::from(ev.found())]);
            field(&mut hasher, ev.location());
            field(&mut hasher, ev.rationale());
            hasher.update(&ev.confidence().value().to_le_bytes());
        }
    }
    hasher.finalize().to_hex().to_string()
}

/// Opinion-collection phase over a sealed snapshot.
pub struct Deliberation<O = Append>
where
    O: Reducer<Vec<Opinion>>,
{
    snapshot: Arc<EvidenceSnapshot>,
    opinions: Channel<Vec<Opinion>, O>,
    version: u64,
}

impl<O: Reducer<Vec<Opinion>>> Deliberation<O> {
    pub fn snapshot(&self) -> Arc<EvidenceSnapshot> {
        Arc::clone(&self.snapshot)
    }

    /// Append one batch of opinions. Returns the new version.
    pub fn append_opinions(&mut self, batch: Vec<Opinion>) -> u64 {
        let count = batch.len();
        self.opinions.write(batch);
        self.version += 1;
        debug!(version = self.version, count, "opinions appended");
        self.version
    }

    pub fn opinions(&self) -> &[Opinion] {
        self.opinions.get()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn freeze(self) -> FrozenAudit {
        FrozenAudit {
            snapshot: self.snapshot,
            opinions: self.opinions.into_inner(),
            version: self.version,
        }
    }
}

/// Read-only ledger handed to the adjudication engine.
#[derive(Clone, Debug)]
pub struct FrozenAudit {
    snapshot: Arc<EvidenceSnapshot>,
    opinions: Vec<Opinion>,
    version: u64,
}

impl FrozenAudit {
    pub fn evidence(&self) -> &EvidenceMap {
        self.snapshot.evidence()
    }

    pub fn evidence_for(&self, criterion_id: &str) -> Vec<&Evidence> {
        self.snapshot.evidence_for(criterion_id)
    }

    pub fn judge_evidence_for(&self, criterion_id: &str) -> Vec<JudgeEvidence> {
        self.snapshot.judge_evidence_for(criterion_id)
    }

    pub fn opinions(&self) -> &[Opinion] {
        &self.opinions
    }

    /// Opinions on one criterion, ordered by judge id.
    pub fn opinions_for(&self, criterion_id: &str) -> Vec<&Opinion> {
        let mut list: Vec<&Opinion> = self
            .opinions
            .iter()
            .filter(|op| op.criterion_id == criterion_id)
            .collect();
        list.sort_by(|a, b| a.judge_id.cmp(&b.judge_id));
        list
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn digest(&self) -> &str {
        self.snapshot.digest()
    }
}
