//! Deterministic synthesis: named rule functions with no model calls inside.

use super::{examined, load, partially_analysed, unanalysable, ParsedSource};
use crate::sandbox::RepoSandbox;
use crate::syntax::{last_segment, walk_module, walk_stmt, CallCollector, Expr, ImportTable, Stmt, Visitor};
use std::collections::BTreeSet;
use verdict_types::Evidence;

pub const CRITERION: &str = "chief_justice_synthesis";
pub const SOURCES: [&str; 2] = ["src/nodes/justice.py", "src/rules.py"];

const MODEL_METHODS: [&str; 6] = [
    "invoke",
    "ainvoke",
    "generate",
    "agenerate",
    "predict",
    "with_structured_output",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rule {
    Security,
    Evidence,
    Weighting,
    Dissent,
}

impl Rule {
    pub const ALL: [Rule; 4] = [Rule::Security, Rule::Evidence, Rule::Weighting, Rule::Dissent];

    /// The rule a function implements, judged by its name.
    pub fn classify(function_name: &str) -> Option<Rule> {
        let name = function_name.to_lowercase();
        if name.contains("security") {
            Some(Rule::Security)
        } else if name.contains("fact") || name.contains("evidence") {
            Some(Rule::Evidence)
        } else if name.contains("weight") || name.contains("functionality") {
            Some(Rule::Weighting)
        } else if name.contains("dissent") || name.contains("variance") {
            Some(Rule::Dissent)
        } else {
            None
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Rule::Security => "security",
            Rule::Evidence => "fact supremacy",
            Rule::Weighting => "weighting",
            Rule::Dissent => "dissent",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SynthesisFindings {
    pub rules: BTreeSet<Rule>,
    /// `function -> call` for model invocations inside rule functions.
    pub model_calls: Vec<String>,
}

impl SynthesisFindings {
    pub fn coverage(&self) -> usize {
        self.rules.len()
    }
}

fn is_model_call(call: &Expr, imports: &ImportTable) -> bool {
    let Expr::Call { func, .. } = call else {
        return false;
    };
    if let Expr::Attribute { attr, .. } = func.as_ref() {
        if MODEL_METHODS.contains(&attr.as_str()) {
            return true;
        }
    }
    imports
        .resolve(func)
        .is_some_and(|q| last_segment(&q).starts_with("Chat"))
}

struct RuleVisitor<'a> {
    imports: &'a ImportTable,
    findings: &'a mut SynthesisFindings,
}

impl Visitor for RuleVisitor<'_> {
    fn visit_stmt(&mut self, stmt: &Stmt) {
        if let Stmt::FunctionDef { name, body, .. } = stmt {
            if let Some(rule) = Rule::classify(name) {
                self.findings.rules.insert(rule);
                for call in CallCollector::collect_stmts(body) {
                    if let Expr::Call { func, .. } = call {
                        if is_model_call(call, self.imports) {
                            self.findings.model_calls.push(format!("{name} -> {func}"));
                        }
                    }
                }
            }
        }
        walk_stmt(self, stmt);
    }
}

pub fn analyse_into(source: &ParsedSource, findings: &mut SynthesisFindings) {
    let mut visitor = RuleVisitor {
        imports: &source.imports,
        findings,
    };
    walk_module(&mut visitor, &source.module);
}

pub fn evidence(criterion_id: &str, repo: &RepoSandbox) -> Evidence {
    let mut findings = SynthesisFindings::default();
    let mut examined_paths = Vec::new();
    let mut excerpts = Vec::new();
    let mut unanalysed = Vec::new();
    let mut first_failure = None;
    for path in SOURCES {
        match load(repo, path) {
            Ok(Some(source)) => {
                analyse_into(&source, &mut findings);
                excerpts.push(source.excerpt());
                examined_paths.push(path);
            }
            Ok(None) => {}
            Err(err) => {
                unanalysed.push(path.to_string());
                first_failure.get_or_insert((path, err));
            }
        }
    }
    let Some(location) = examined_paths.first().copied() else {
        if let Some((path, err)) = &first_failure {
            return unanalysable(criterion_id, path, err);
        }
        return Evidence::absent(
            criterion_id,
            format!("none of {} present", SOURCES.join(", ")),
            1.0,
        );
    };

    let covered: Vec<&str> = findings.rules.iter().map(|r| r.label()).collect();
    let missing: Vec<&str> = Rule::ALL
        .iter()
        .filter(|r| !findings.rules.contains(r))
        .map(|r| r.label())
        .collect();
    let mut raw = excerpts.join("\n");
    let analysed = examined_paths.len();

    if findings.coverage() == 0 {
        let ev = examined(
            criterion_id,
            location,
            format!(
                "no named synthesis rule functions in {}; resolution likely delegated to prompting",
                examined_paths.join(", ")
            ),
            0.9,
        )
        .with_raw_content(raw);
        return partially_analysed(ev, analysed, &unanalysed);
    }

    let mut confidence = 0.4 + 0.15 * findings.coverage() as f64;
    let mut rationale = format!(
        "{}/4 deterministic rules implemented ({}); missing: {}",
        findings.coverage(),
        covered.join(", "),
        if missing.is_empty() { "none".to_string() } else { missing.join(", ") }
    );
    if !findings.model_calls.is_empty() {
        confidence *= 0.5;
        rationale.push_str(&format!(
            "; model invoked inside rule functions ({} call(s))",
            findings.model_calls.len()
        ));
        raw.push_str(&format!("\nmodel calls: {}", findings.model_calls.join(", ")));
    }
    let ev = Evidence::located(criterion_id, location, rationale, confidence).with_raw_content(raw);
    partially_analysed(ev, analysed, &unanalysed)
}
