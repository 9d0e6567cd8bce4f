//! Typed state with merge reducers.

use super::{examined, load, unanalysable, ParsedSource};
use crate::sandbox::RepoSandbox;
use crate::syntax::{last_segment, walk_expr, walk_module, Expr, ImportTable, Stmt, Visitor, walk_stmt};
use verdict_types::Evidence;

pub const CRITERION: &str = "state_management_rigor";

/// Searched in order; the first existing file is analysed.
pub const CANDIDATES: [&str; 2] = ["src/state.py", "src/graph.py"];

const REDUCERS: [&str; 2] = ["operator.add", "operator.ior"];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StateFindings {
    pub base_model: bool,
    pub typed_dict: bool,
    /// A reducer referenced inside an `Annotated[...]` subscript.
    pub reducers: bool,
}

impl StateFindings {
    pub fn typed(&self) -> bool {
        self.base_model || self.typed_dict
    }
}

struct StateVisitor<'a> {
    imports: &'a ImportTable,
    findings: StateFindings,
}

impl Visitor for StateVisitor<'_> {
    fn visit_stmt(&mut self, stmt: &Stmt) {
        if let Stmt::ClassDef { bases, .. } = stmt {
            for base in bases {
                match self.imports.resolve(base).as_deref().map(last_segment) {
                    Some("BaseModel") => self.findings.base_model = true,
                    Some("TypedDict") => self.findings.typed_dict = true,
                    _ => {}
                }
            }
        }
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        if let Expr::Subscript { value, index } = expr {
            let annotated = self
                .imports
                .resolve(value)
                .is_some_and(|q| last_segment(&q) == "Annotated");
            if annotated
                && index.iter().any(|e| {
                    self.imports
                        .resolve(e)
                        .is_some_and(|q| REDUCERS.contains(&q.as_str()))
                })
            {
                self.findings.reducers = true;
            }
        }
        walk_expr(self, expr);
    }
}

pub fn analyse(source: &ParsedSource) -> StateFindings {
    let mut visitor = StateVisitor {
        imports: &source.imports,
        findings: StateFindings::default(),
    };
    walk_module(&mut visitor, &source.module);
    visitor.findings
}

pub fn evidence(criterion_id: &str, repo: &RepoSandbox) -> Evidence {
    for path in CANDIDATES {
        let source = match load(repo, path) {
            Ok(Some(source)) => source,
            Ok(None) => continue,
            Err(err) => return unanalysable(criterion_id, path, &err),
        };
        let f = analyse(&source);
        let summary = format!(
            "BaseModel={}, TypedDict={}, Annotated reducers={}",
            f.base_model, f.typed_dict, f.reducers
        );
        let evidence = if f.typed() && f.reducers {
            Evidence::located(
                criterion_id,
                path,
                format!("typed state with parallel-safe reducers ({summary})"),
                1.0,
            )
        } else if f.typed() {
            Evidence::located(
                criterion_id,
                path,
                format!("typed state without reducers; parallel writers overwrite each other ({summary})"),
                0.7,
            )
        } else {
            examined(
                criterion_id,
                path,
                format!("no BaseModel or TypedDict state definition; plain dicts likely ({summary})"),
                0.9,
            )
        };
        return evidence.with_raw_content(source.excerpt());
    }
    Evidence::absent(
        criterion_id,
        format!("none of {} present", CANDIDATES.join(", ")),
        1.0,
    )
}
