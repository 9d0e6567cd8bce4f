//! The four adjudication rules. Each is a pure function over the evidence
//! and opinions of a single criterion.

use std::collections::BTreeSet;
use verdict_types::{Dissent, DissentVoice, Evidence, Opinion, Score, SynthesisRules, WeightedCriterion};

/// Quoted arguments are cut to this many characters.
pub const ARGUMENT_EXCERPT: usize = 300;

pub const OVERRULE_TAG: &str = "[OVERRULED: FACT SUPREMACY]";

/// First `max` characters of `text`, on a char boundary.
pub fn excerpt(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

// ── Security ────────────────────────────────────────────────────────────

/// The first rubric marker present in this criterion's evidence rationale,
/// compared case-insensitively.
pub fn security_violation<'r>(evidence: &[&Evidence], rules: &'r SynthesisRules) -> Option<&'r str> {
    let rationales: Vec<String> = evidence.iter().map(|e| e.rationale().to_lowercase()).collect();
    rules
        .security_markers
        .iter()
        .filter(|marker| !marker.trim().is_empty())
        .find(|marker| {
            let marker = marker.to_lowercase();
            rationales.iter().any(|r| r.contains(&marker))
        })
        .map(String::as_str)
}

// ── Fact supremacy ──────────────────────────────────────────────────────

/// Locations backed by a positive finding. `"N/A"` never qualifies.
pub fn verified_locations<'e>(evidence: &[&'e Evidence]) -> BTreeSet<&'e str> {
    evidence
        .iter()
        .filter(|e| e.is_verified_location())
        .map(|e| e.location())
        .collect()
}

/// Overrule an opinion citing anything outside `verified`.
///
/// Returns `None` when the opinion stands. Opinions that cite nothing stand.
pub fn fact_supremacy(opinion: &Opinion, verified: &BTreeSet<&str>) -> Option<Opinion> {
    let unverified = opinion
        .cited_evidence
        .iter()
        .find(|loc| !verified.contains(loc.as_str()))?;
    Some(Opinion {
        judge_id: opinion.judge_id.clone(),
        criterion_id: opinion.criterion_id.clone(),
        score: Score::MIN,
        argument: format!(
            "{OVERRULE_TAG} cited location '{unverified}' not found in evidence. Original argument: {}",
            excerpt(&opinion.argument, ARGUMENT_EXCERPT)
        ),
        cited_evidence: opinion.cited_evidence.clone(),
    })
}

// ── Aggregation ─────────────────────────────────────────────────────────

/// Half away from zero.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn mean(opinions: &[&Opinion]) -> f64 {
    let total: f64 = opinions.iter().map(|o| f64::from(o.score.value())).sum();
    total / opinions.len() as f64
}

/// Aggregate effective scores. `None` when there is nothing to aggregate.
///
/// With a `weighting`, the designated judge carries `weight` and the rest
/// share the remainder evenly. Falls back to the plain mean if either side
/// is empty.
pub fn aggregate(opinions: &[Opinion], weighting: Option<&WeightedCriterion>) -> Option<f64> {
    if opinions.is_empty() {
        return None;
    }
    let all: Vec<&Opinion> = opinions.iter().collect();
    let raw = match weighting {
        Some(w) => {
            let (designated, others): (Vec<&Opinion>, Vec<&Opinion>) =
                opinions.iter().partition(|o| o.judge_id.as_str() == w.judge_id);
            if designated.is_empty() || others.is_empty() {
                mean(&all)
            } else {
                let share = w.weight.clamp(0.0, 1.0);
                share * mean(&designated) + (1.0 - share) * mean(&others)
            }
        }
        None => mean(&all),
    };
    Some(round_one_decimal(raw))
}

// ── Dissent ─────────────────────────────────────────────────────────────

fn voice(opinion: &Opinion) -> DissentVoice {
    DissentVoice {
        judge_id: opinion.judge_id.clone(),
        score: opinion.score.value(),
        argument: excerpt(&opinion.argument, ARGUMENT_EXCERPT),
    }
}

fn roll_call(voices: &[DissentVoice]) -> String {
    voices
        .iter()
        .map(|v| format!("{}={}", v.judge_id, v.score))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Record a dissent when the submitted (pre-overrule) scores span more than
/// `threshold` points.
///
/// Scores below the midpoint of the range form the low side, the rest the
/// high side. The smaller side is the minority; on a tie the low side is.
pub fn dissent(submitted: &[Opinion], threshold: u8) -> Option<Dissent> {
    let max = submitted.iter().map(|o| o.score.value()).max()?;
    let min = submitted.iter().map(|o| o.score.value()).min()?;
    let range = max - min;
    if range <= threshold {
        return None;
    }
    let midpoint = f64::from(min + max) / 2.0;
    let (low, high): (Vec<&Opinion>, Vec<&Opinion>) = submitted
        .iter()
        .partition(|o| f64::from(o.score.value()) < midpoint);
    let low: Vec<DissentVoice> = low.into_iter().map(voice).collect();
    let high: Vec<DissentVoice> = high.into_iter().map(voice).collect();
    let (minority, majority) = if high.len() < low.len() { (high, low) } else { (low, high) };
    let summary = format!(
        "{range}-point split exceeds threshold {threshold}: minority [{}] against majority [{}]",
        roll_call(&minority),
        roll_call(&majority)
    );
    Some(Dissent {
        range,
        minority,
        majority,
        summary,
    })
}
