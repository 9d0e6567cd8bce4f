//! Per-criterion forensic protocols over a repository checkout.
//!
//! Each protocol reads fixed source files, parses them, matches node shapes
//! and grades what it found on a fixed confidence ladder. Protocols never
//! fail: read and parse errors become low-confidence evidence.

pub mod graph;
pub mod personas;
pub mod state;
pub mod structured;
pub mod synthesis;
pub mod tools;

use crate::error::ExtractionError;
use crate::process::excerpt;
use crate::sandbox::RepoSandbox;
use crate::syntax::{parse_module, ImportTable, Module};
use verdict_types::{Confidence, Evidence};

/// Confidence attached to evidence from a file that could not be analysed.
pub const UNANALYSABLE_CONFIDENCE: f64 = 0.2;

/// Characters of source kept as raw content on evidence.
const RAW_EXCERPT: usize = 400;

/// A parsed source file and its import table.
pub struct ParsedSource {
    pub path: String,
    pub text: String,
    pub module: Module,
    pub imports: ImportTable,
}

impl ParsedSource {
    pub fn parse(path: &str, text: String) -> Result<Self, ExtractionError> {
        let module = parse_module(&text).map_err(|source| ExtractionError::Parse {
            path: path.to_string(),
            source,
        })?;
        let imports = ImportTable::from_module(&module);
        Ok(Self {
            path: path.to_string(),
            text,
            module,
            imports,
        })
    }

    pub fn excerpt(&self) -> String {
        excerpt(&self.text, RAW_EXCERPT)
    }
}

/// Read and parse a repository file. `Ok(None)` when it does not exist.
pub fn load(repo: &RepoSandbox, path: &str) -> Result<Option<ParsedSource>, ExtractionError> {
    match repo.read_source(path)? {
        Some(text) => ParsedSource::parse(path, text).map(Some),
        None => Ok(None),
    }
}

/// The file exists but could not be read or parsed.
pub(crate) fn unanalysable(criterion_id: &str, path: &str, err: &ExtractionError) -> Evidence {
    Evidence::new(
        criterion_id,
        false,
        path,
        format!("{path} exists but could not be analysed: {err}"),
        Confidence::saturating(UNANALYSABLE_CONFIDENCE),
    )
}

/// Discount a finding drawn from only some of the files it covers.
///
/// Confidence scales with the share of files analysed. The rationale states
/// the count; the unanalysed paths, being repository-named, go to raw content.
pub(crate) fn partially_analysed(evidence: Evidence, analysed: usize, unanalysed: &[String]) -> Evidence {
    if unanalysed.is_empty() {
        return evidence;
    }
    let total = analysed + unanalysed.len();
    let share = analysed as f64 / total as f64;
    let note = format!("not analysed: {}", unanalysed.join(", "));
    let raw = match evidence.raw_content() {
        Some(raw) => format!("{raw}\n{note}"),
        None => note,
    };
    evidence
        .with_rationale(format!(
            "{}; {} of {total} file(s) could not be analysed",
            evidence.rationale(),
            unanalysed.len()
        ))
        .with_confidence(Confidence::saturating(evidence.confidence().value() * share))
        .with_raw_content(raw)
}

/// Source examined, success pattern not observed.
pub(crate) fn examined(criterion_id: &str, path: &str, rationale: String, confidence: f64) -> Evidence {
    Evidence::new(
        criterion_id,
        false,
        path,
        rationale,
        Confidence::saturating(confidence),
    )
}

/// Run the file-based protocol for `criterion_id`, if one exists.
pub fn detect(criterion_id: &str, repo: &RepoSandbox) -> Option<Evidence> {
    let evidence = match criterion_id {
        state::CRITERION => state::evidence(criterion_id, repo),
        graph::CRITERION => graph::evidence(criterion_id, repo),
        tools::CRITERION => tools::evidence(criterion_id, repo),
        structured::CRITERION => structured::evidence(criterion_id, repo),
        personas::CRITERION => personas::evidence(criterion_id, repo),
        synthesis::CRITERION => synthesis::evidence(criterion_id, repo),
        _ => return None,
    };
    Some(evidence)
}
