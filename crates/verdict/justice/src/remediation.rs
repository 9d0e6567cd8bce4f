//! Deterministic remediation text for a ruled criterion.

use crate::rules::excerpt;
use verdict_types::{Criterion, Opinion};

pub const NO_OPINION: &str = "Score defaulted to 1.0: no judicial opinion available.";

pub const DEGRADED_NOTE: &str = "Forensic extraction did not produce evidence for this criterion; \
the score reflects missing evidence. Fix the extraction failure and re-run the audit.";

const WEAKEST_EXCERPT: usize = 200;

/// Inputs to the remediation text for one criterion.
pub struct RemediationInput<'a> {
    pub criterion: &'a Criterion,
    pub final_score: f64,
    /// Effective opinions, in canonical judge order.
    pub opinions: &'a [Opinion],
    pub security_note: Option<&'a str>,
    pub degraded: bool,
}

fn improvement(criterion: &Criterion) -> String {
    match criterion.remediation.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => format!(
            "Significant gaps against {}. Work toward: {}",
            criterion.name, criterion.success_pattern
        ),
    }
}

pub fn remediation(input: &RemediationInput<'_>) -> String {
    let mut parts = Vec::new();
    if input.degraded {
        parts.push(DEGRADED_NOTE.to_string());
    }
    if input.opinions.is_empty() {
        parts.push(NO_OPINION.to_string());
    }
    if let Some(note) = input.security_note {
        parts.push(note.to_string());
    }

    if input.final_score <= 2.0 {
        parts.push(improvement(input.criterion));
    } else if input.final_score >= 4.0 {
        if input.security_note.is_none() {
            parts.push(format!(
                "Implementation meets rubric standards for {}.",
                input.criterion.name
            ));
        }
    } else if let Some(weakest) = input.opinions.iter().min_by_key(|o| o.score) {
        parts.push(format!(
            "Address the concern raised by {} (score {}): {}",
            weakest.judge_id,
            weakest.score,
            excerpt(&weakest.argument, WEAKEST_EXCERPT)
        ));
    }
    parts.join(" ")
}
