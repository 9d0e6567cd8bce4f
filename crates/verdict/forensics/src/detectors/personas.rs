//! Persona distinctiveness: module-level prompt constants compared by
//! word-shingle overlap.

use super::{examined, load, unanalysable, ParsedSource};
use crate::sandbox::RepoSandbox;
use crate::similarity;
use crate::syntax::{Expr, Stmt};
use verdict_types::Evidence;

pub const CRITERION: &str = "judicial_nuance";
pub const SOURCE: &str = "src/nodes/judges.py";

/// Personas whose prompts overlap at or above this are not distinct.
pub const SIMILARITY_THRESHOLD: f64 = 0.5;
pub const MIN_PERSONAS: usize = 3;

/// `(constant name, prompt text)` for every module-level string assigned to
/// a name containing `PROMPT` or `SYSTEM`.
pub fn persona_prompts(source: &ParsedSource) -> Vec<(String, String)> {
    let mut prompts = Vec::new();
    for stmt in &source.module.body {
        let Stmt::Assign {
            targets,
            value: Some(Expr::Str(text)),
            ..
        } = stmt
        else {
            continue;
        };
        for target in targets {
            if let Expr::Name(name) = target {
                let upper = name.to_uppercase();
                if upper.contains("PROMPT") || upper.contains("SYSTEM") {
                    prompts.push((name.clone(), text.clone()));
                }
            }
        }
    }
    prompts
}

pub fn evidence(criterion_id: &str, repo: &RepoSandbox) -> Evidence {
    let source = match load(repo, SOURCE) {
        Ok(Some(source)) => source,
        Ok(None) => return Evidence::absent(criterion_id, format!("{SOURCE} not found"), 1.0),
        Err(err) => return unanalysable(criterion_id, SOURCE, &err),
    };
    let prompts = persona_prompts(&source);
    let names: Vec<&str> = prompts.iter().map(|(n, _)| n.as_str()).collect();
    let raw = prompts
        .iter()
        .map(|(n, t)| format!("{n}: {t}"))
        .collect::<Vec<_>>()
        .join("\n");

    if prompts.len() < MIN_PERSONAS {
        return examined(
            criterion_id,
            SOURCE,
            format!(
                "only {} persona prompt(s) found ({}); at least {MIN_PERSONAS} distinct personas expected",
                prompts.len(),
                names.join(", ")
            ),
            0.8,
        )
        .with_raw_content(raw);
    }

    let texts: Vec<&str> = prompts.iter().map(|(_, t)| t.as_str()).collect();
    let (i, j, overlap) = similarity::most_similar_pair(&texts).unwrap_or((0, 0, 0.0));
    let evidence = if overlap < SIMILARITY_THRESHOLD {
        Evidence::located(
            criterion_id,
            SOURCE,
            format!(
                "{} distinct personas ({}); max pairwise prompt overlap {overlap:.2}",
                prompts.len(),
                names.join(", ")
            ),
            1.0,
        )
    } else {
        examined(
            criterion_id,
            SOURCE,
            format!(
                "persona prompts {} and {} overlap {overlap:.2}; personas are not distinct",
                names[i], names[j]
            ),
            0.6,
        )
    };
    evidence.with_raw_content(raw)
}
