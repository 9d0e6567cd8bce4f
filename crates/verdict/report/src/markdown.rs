//! Markdown rendering and score recovery.
//!
//! Every piece of free text (arguments, rationale, remediation, names) is
//! flattened to a single line and placed after a fixed prefix, so no
//! judge-supplied string can open a heading or a score line of its own.

use crate::error::ReportError;
use crate::model::AuditReport;
use std::fmt;
use verdict_types::CriterionResult;

const SCORE_PREFIX: &str = "**Final score:** ";

/// Collapse all whitespace runs (newlines included) to single spaces.
pub fn flatten(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn cell(text: &str) -> String {
    flatten(text).replace('|', "\\|")
}

/// Display adapter that writes an [`AuditReport`] as Markdown.
pub struct MarkdownReport<'a>(pub &'a AuditReport);

impl MarkdownReport<'_> {
    fn criterion(f: &mut fmt::Formatter<'_>, result: &CriterionResult) -> fmt::Result {
        writeln!(
            f,
            "### {} (`{}`)",
            flatten(&result.criterion_name),
            flatten(&result.criterion_id)
        )?;
        writeln!(f)?;
        writeln!(f, "{SCORE_PREFIX}{:.1} / 5", result.final_score)?;
        if result.security_capped {
            writeln!(f)?;
            writeln!(f, "**Security cap applied.**")?;
        }
        if result.degraded {
            writeln!(f)?;
            writeln!(f, "**Degraded:** evidence was synthesised after a forensic failure.")?;
        }
        writeln!(f)?;

        if result.opinions.is_empty() {
            writeln!(f, "- _No judicial opinion available._")?;
        }
        for opinion in &result.opinions {
            write!(
                f,
                "- **{}** (score {}): {}",
                flatten(opinion.judge_id.as_str()),
                opinion.score,
                flatten(&opinion.argument)
            )?;
            if !opinion.cited_evidence.is_empty() {
                let cited: Vec<String> = opinion
                    .cited_evidence
                    .iter()
                    .map(|c| format!("`{}`", flatten(c).replace('`', "'")))
                    .collect();
                write!(f, " Cited: {}", cited.join(", "))?;
            }
            writeln!(f)?;
        }

        if let Some(dissent) = &result.dissent {
            writeln!(f)?;
            writeln!(f, "> **Dissent** (range {}): {}", dissent.range, flatten(&dissent.summary))?;
            for voice in &dissent.minority {
                writeln!(
                    f,
                    "> - minority, {} ({}): {}",
                    flatten(voice.judge_id.as_str()),
                    voice.score,
                    flatten(&voice.argument)
                )?;
            }
            for voice in &dissent.majority {
                writeln!(
                    f,
                    "> - majority, {} ({}): {}",
                    flatten(voice.judge_id.as_str()),
                    voice.score,
                    flatten(&voice.argument)
                )?;
            }
        }

        writeln!(f)?;
        writeln!(f, "**Remediation:** {}", flatten(&result.remediation))?;
        writeln!(f)
    }
}

impl fmt::Display for MarkdownReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        let meta = &report.metadata;
        writeln!(f, "# Verdict Audit Report: {}", flatten(&meta.repo_locator))?;
        writeln!(f)?;
        writeln!(
            f,
            "_Run `{}` at {} | rubric {} v{} | evidence digest `{}`_",
            meta.run_id,
            meta.finished_at.to_rfc3339(),
            flatten(&meta.rubric_name),
            flatten(&meta.rubric_version),
            meta.evidence_digest
        )?;
        writeln!(f)?;

        // ── Executive summary ──
        writeln!(f, "## Executive Summary")?;
        writeln!(f)?;
        writeln!(f, "{}", flatten(&report.summary.headline()))?;
        writeln!(f)?;
        writeln!(f, "| Criterion | Score |")?;
        writeln!(f, "|---|---|")?;
        for result in &report.criteria {
            writeln!(f, "| {} | {:.1} |", cell(&result.criterion_name), result.final_score)?;
        }
        writeln!(f)?;

        // ── Breakdown ──
        writeln!(f, "## Criterion Breakdown")?;
        writeln!(f)?;
        for result in &report.criteria {
            Self::criterion(f, result)?;
        }

        // ── Remediation plan ──
        writeln!(f, "## Remediation Plan")?;
        writeln!(f)?;
        let mut critical = report.critical().peekable();
        if critical.peek().is_none() {
            writeln!(f, "No criterion scored 2 or below.")?;
        }
        for result in critical {
            writeln!(
                f,
                "- **{}** ({:.1}): {}",
                flatten(&result.criterion_name),
                result.final_score,
                flatten(&result.remediation)
            )?;
        }
        writeln!(f)?;

        // ── Forensic notes ──
        writeln!(f, "## Forensic Notes")?;
        writeln!(f)?;
        if !report.has_forensic_notes() {
            writeln!(f, "No forensic failures.")?;
        }
        for failure in &report.extraction_failures {
            writeln!(f, "- Extraction failure: {}", flatten(failure))?;
        }
        for key in &report.degraded_keys {
            writeln!(f, "- Degraded evidence: `{}`", flatten(key))?;
        }
        for failure in &report.judge_failures {
            writeln!(
                f,
                "- Judge failure: {} on `{}` after {} attempt(s): {}",
                flatten(failure.judge_id.as_str()),
                flatten(&failure.criterion_id),
                failure.attempts,
                flatten(&failure.message)
            )?;
        }
        Ok(())
    }
}

pub fn render_markdown(report: &AuditReport) -> String {
    MarkdownReport(report).to_string()
}

pub fn render_json(report: &AuditReport) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Recover `(criterion_id, final_score)` pairs from a rendered report, in
/// document order.
pub fn parse_scores(markdown: &str) -> Result<Vec<(String, f64)>, ReportError> {
    let mut scores = Vec::new();
    let mut current: Option<String> = None;
    for (index, line) in markdown.lines().enumerate() {
        if let Some(heading) = line.strip_prefix("### ") {
            current = heading
                .strip_suffix("`)")
                .and_then(|h| h.rfind("(`").map(|at| h[at + 2..].to_string()));
            continue;
        }
        let Some(rest) = line.strip_prefix(SCORE_PREFIX) else {
            continue;
        };
        let Some(id) = current.take() else {
            continue;
        };
        let value = rest.split_whitespace().next().unwrap_or_default();
        let score: f64 = value.parse().map_err(|_| ReportError::Score {
            line: index + 1,
            value: value.to_string(),
        })?;
        scores.push((id, score));
    }
    Ok(scores)
}
