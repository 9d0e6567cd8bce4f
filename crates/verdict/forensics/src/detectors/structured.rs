//! Schema-bound judge output.

use super::{examined, load, unanalysable, ParsedSource};
use crate::sandbox::RepoSandbox;
use crate::syntax::{last_segment, CallCollector, Expr, ImportTable};
use verdict_types::Evidence;

pub const CRITERION: &str = "structured_output_enforcement";
pub const SOURCE: &str = "src/nodes/judges.py";

const BINDING_METHODS: [&str; 2] = ["with_structured_output", "bind_tools"];
const OPINION_SCHEMA: &str = "JudicialOpinion";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BindingFindings {
    pub binding: bool,
    /// A binding whose schema argument resolves to the opinion type.
    pub opinion_schema: bool,
}

fn mentions_schema(expr: &Expr, imports: &ImportTable) -> bool {
    match expr {
        Expr::Collection(items) => items.iter().any(|e| mentions_schema(e, imports)),
        other => imports
            .resolve(other)
            .is_some_and(|q| last_segment(&q) == OPINION_SCHEMA),
    }
}

pub fn analyse(source: &ParsedSource) -> BindingFindings {
    let mut findings = BindingFindings::default();
    for call in CallCollector::collect_module(&source.module) {
        let Expr::Call {
            func,
            args,
            keywords,
        } = call
        else {
            continue;
        };
        let Expr::Attribute { attr, .. } = func.as_ref() else {
            continue;
        };
        if !BINDING_METHODS.contains(&attr.as_str()) {
            continue;
        }
        findings.binding = true;
        let schema_arg = args.first().or_else(|| {
            keywords
                .iter()
                .find(|k| matches!(k.arg.as_deref(), Some("schema" | "tools")))
                .map(|k| &k.value)
        });
        if schema_arg.is_some_and(|e| mentions_schema(e, &source.imports)) {
            findings.opinion_schema = true;
        }
    }
    findings
}

pub fn evidence(criterion_id: &str, repo: &RepoSandbox) -> Evidence {
    let source = match load(repo, SOURCE) {
        Ok(Some(source)) => source,
        Ok(None) => return Evidence::absent(criterion_id, format!("{SOURCE} not found"), 1.0),
        Err(err) => return unanalysable(criterion_id, SOURCE, &err),
    };
    let f = analyse(&source);
    let evidence = match (f.binding, f.opinion_schema) {
        (true, true) => Evidence::located(
            criterion_id,
            SOURCE,
            format!("judge output bound to {OPINION_SCHEMA} via structured-output binding"),
            1.0,
        ),
        (true, false) => Evidence::located(
            criterion_id,
            SOURCE,
            format!("structured-output binding present but not bound to {OPINION_SCHEMA}"),
            0.7,
        ),
        _ => examined(
            criterion_id,
            SOURCE,
            "no with_structured_output() or bind_tools() binding; freeform output risk".into(),
            0.9,
        ),
    };
    evidence.with_raw_content(source.excerpt())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyse_text(src: &str) -> BindingFindings {
        analyse(&ParsedSource::parse(SOURCE, src.to_string()).unwrap())
    }

    #[test]
    fn bound_to_opinion_schema() {
        let f = analyse_text(
            "from src.state import JudicialOpinion\nllm = ChatModel().with_structured_output(JudicialOpinion)\n",
        );
        assert!(f.binding && f.opinion_schema);
    }

    #[test]
    fn bind_tools_list_and_keyword_forms() {
        let f = analyse_text("import src.state as st\nm = llm.bind_tools([st.JudicialOpinion])\n");
        assert!(f.opinion_schema);
        let f = analyse_text("m = llm.with_structured_output(schema=JudicialOpinion)\n");
        assert!(f.opinion_schema);
    }

    #[test]
    fn binding_to_other_schema() {
        let f = analyse_text("m = llm.with_structured_output(dict)\n");
        assert!(f.binding && !f.opinion_schema);
    }

    #[test]
    fn string_mentions_do_not_bind() {
        let f = analyse_text("HINT = 'call with_structured_output(JudicialOpinion)'\n");
        assert_eq!(f, BindingFindings::default());
    }
}
