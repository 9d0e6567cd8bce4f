//! Graph wiring: fan-out, fan-in and an aggregation node.

use super::{examined, load, unanalysable, ParsedSource};
use crate::sandbox::RepoSandbox;
use crate::syntax::{last_segment, CallCollector, Expr};
use std::collections::{BTreeMap, BTreeSet};
use verdict_types::Evidence;

pub const CRITERION: &str = "graph_orchestration";
pub const SOURCE: &str = "src/graph.py";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GraphFindings {
    pub state_graph: bool,
    /// `(source, target)` per `add_edge` call; list sources are expanded.
    pub edges: Vec<(String, String)>,
    pub aggregator: Option<String>,
}

impl GraphFindings {
    /// A source with at least two distinct targets.
    pub fn fan_out(&self) -> bool {
        has_branching(self.edges.iter().map(|(s, t)| (s, t)))
    }

    /// A target with at least two distinct sources.
    pub fn fan_in(&self) -> bool {
        has_branching(self.edges.iter().map(|(s, t)| (t, s)))
    }
}

fn has_branching<'a>(pairs: impl Iterator<Item = (&'a String, &'a String)>) -> bool {
    let mut adjacency: BTreeMap<&String, BTreeSet<&String>> = BTreeMap::new();
    for (from, to) in pairs {
        adjacency.entry(from).or_default().insert(to);
    }
    adjacency.values().any(|targets| targets.len() >= 2)
}

fn endpoint_labels(expr: &Expr) -> Vec<String> {
    match expr {
        Expr::Str(s) => vec![s.clone()],
        Expr::Collection(items) => items.iter().flat_map(endpoint_labels).collect(),
        other => other.dotted().into_iter().collect(),
    }
}

fn method_name(call: &Expr) -> Option<&str> {
    match call {
        Expr::Call { func, .. } => match func.as_ref() {
            Expr::Attribute { attr, .. } => Some(attr.as_str()),
            _ => None,
        },
        _ => None,
    }
}

pub fn analyse(source: &ParsedSource) -> GraphFindings {
    let mut findings = GraphFindings::default();
    for call in CallCollector::collect_module(&source.module) {
        let Expr::Call { args, .. } = call else { continue };

        if source
            .imports
            .resolve_call(call)
            .is_some_and(|q| last_segment(&q) == "StateGraph")
        {
            findings.state_graph = true;
        }

        match method_name(call) {
            Some("add_edge") if args.len() >= 2 => {
                for from in endpoint_labels(&args[0]) {
                    for to in endpoint_labels(&args[1]) {
                        findings.edges.push((from.clone(), to));
                    }
                }
            }
            Some("add_node") => {
                let name = args.first().and_then(|a| match a {
                    Expr::Str(s) => Some(s.clone()),
                    other => other.dotted(),
                });
                if let Some(name) = name {
                    if findings.aggregator.is_none() && name.to_lowercase().contains("aggregat") {
                        findings.aggregator = Some(name);
                    }
                }
            }
            _ => {}
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
    let shape = format!(
        "{} edge(s), fan-out={}, fan-in={}, aggregator={}",
        f.edges.len(),
        f.fan_out(),
        f.fan_in(),
        if f.aggregator.is_some() { "yes" } else { "no" }
    );

    let evidence = if !f.state_graph {
        examined(criterion_id, SOURCE, format!("no StateGraph constructed ({shape})"), 0.95)
    } else if !f.fan_out() {
        examined(
            criterion_id,
            SOURCE,
            format!("StateGraph wired as a linear pipeline without parallel branches ({shape})"),
            0.9,
        )
    } else if f.fan_in() && f.aggregator.is_some() {
        Evidence::located(
            criterion_id,
            SOURCE,
            format!("StateGraph with parallel fan-out and fan-in through an aggregation node ({shape})"),
            1.0,
        )
    } else {
        Evidence::located(
            criterion_id,
            SOURCE,
            format!("StateGraph with fan-out but no aggregation fan-in ({shape})"),
            0.8,
        )
    };
    evidence.with_raw_content(source.excerpt())
}
