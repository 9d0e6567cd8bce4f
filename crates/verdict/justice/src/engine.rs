//! The Chief Justice: applies the rules in fixed order and produces one
//! [`CriterionResult`] per criterion.

use crate::remediation::{remediation, RemediationInput};
use crate::rules;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use tracing::{debug, info};
use verdict_evidence::FrozenAudit;
use verdict_types::{Criterion, CriterionResult, Evidence, Opinion, Rubric, SynthesisRules, WeightedCriterion};

/// Score when no opinion reached the engine.
pub const NO_OPINION_SCORE: f64 = 1.0;

fn canonical(a: &Opinion, b: &Opinion) -> Ordering {
    a.judge_id
        .cmp(&b.judge_id)
        .then_with(|| a.score.cmp(&b.score))
        .then_with(|| a.argument.cmp(&b.argument))
        .then_with(|| a.cited_evidence.cmp(&b.cited_evidence))
}

/// Deterministic adjudicator. Never suspends and never fails.
#[derive(Clone, Debug, Default)]
pub struct ChiefJustice {
    rules: SynthesisRules,
}

impl ChiefJustice {
    pub fn new(rules: SynthesisRules) -> Self {
        Self { rules }
    }

    pub fn from_rubric(rubric: &Rubric) -> Self {
        Self::new(rubric.synthesis_rules.clone())
    }

    pub fn rules(&self) -> &SynthesisRules {
        &self.rules
    }

    fn weighting_for(&self, criterion_id: &str) -> Option<&WeightedCriterion> {
        self.rules
            .weighted_criterion
            .as_ref()
            .filter(|w| w.criterion_id == criterion_id)
    }

    /// Rule one criterion.
    ///
    /// `evidence` and `opinions` may arrive in any order; opinions for other
    /// criteria are ignored.
    pub fn adjudicate(
        &self,
        criterion: &Criterion,
        evidence: &[&Evidence],
        opinions: &[&Opinion],
        degraded: bool,
    ) -> CriterionResult {
        let evidence: Vec<&Evidence> = evidence
            .iter()
            .copied()
            .filter(|e| e.criterion_id() == criterion.id)
            .collect();
        let mut submitted: Vec<Opinion> = opinions
            .iter()
            .filter(|o| o.criterion_id == criterion.id)
            .map(|o| (*o).clone())
            .collect();
        submitted.sort_by(canonical);

        let violation = rules::security_violation(&evidence, &self.rules);

        let verified = rules::verified_locations(&evidence);
        let mut overruled = Vec::new();
        let effective: Vec<Opinion> = submitted
            .iter()
            .map(|opinion| match rules::fact_supremacy(opinion, &verified) {
                Some(ruling) => {
                    overruled.push(opinion.judge_id.clone());
                    ruling
                }
                None => opinion.clone(),
            })
            .collect();

        let mut final_score = rules::aggregate(&effective, self.weighting_for(&criterion.id))
            .unwrap_or(NO_OPINION_SCORE)
            .clamp(1.0, 5.0);
        if violation.is_some() {
            final_score = final_score.min(self.rules.security_cap);
        }

        let dissent = rules::dissent(&submitted, self.rules.dissent_threshold);

        let remediation = remediation(&RemediationInput {
            criterion,
            final_score,
            opinions: &effective,
            security_note: violation.map(|_| self.rules.security_note.as_str()),
            degraded,
        });

        debug!(
            criterion = %criterion.id,
            final_score,
            opinions = effective.len(),
            overruled = overruled.len(),
            security = ?violation,
            dissent = dissent.is_some(),
            "criterion ruled"
        );

        CriterionResult {
            criterion_id: criterion.id.clone(),
            criterion_name: criterion.name.clone(),
            final_score,
            opinions: effective,
            dissent,
            remediation,
            security_capped: violation.is_some(),
            overruled,
            degraded,
        }
    }

    /// Rule every criterion in `criteria` order against a frozen audit.
    pub fn adjudicate_all(
        &self,
        criteria: &[Criterion],
        audit: &FrozenAudit,
        degraded: &BTreeSet<String>,
    ) -> Vec<CriterionResult> {
        let results: Vec<CriterionResult> = criteria
            .iter()
            .map(|criterion| {
                self.adjudicate(
                    criterion,
                    &audit.evidence_for(&criterion.id),
                    &audit.opinions_for(&criterion.id),
                    degraded.contains(&criterion.id),
                )
            })
            .collect();
        info!(
            criteria = results.len(),
            capped = results.iter().filter(|r| r.security_capped).count(),
            dissents = results.iter().filter(|r| r.has_dissent()).count(),
            "adjudication complete"
        );
        results
    }
}
