//! Sandboxed tool engineering: process calls, temporary directories and
//! raw shell execution.

use super::{examined, partially_analysed, unanalysable, ParsedSource};
use crate::sandbox::RepoSandbox;
use crate::syntax::{last_segment, walk_expr, walk_stmt, Expr, ImportTable, Stmt, Visitor, walk_module};
use verdict_types::{Confidence, Evidence};

pub const CRITERION: &str = "safe_tool_engineering";
pub const TOOLS_DIR: &str = "src/tools";

const SHELL_CALLS: [&str; 2] = ["os.system", "os.popen"];
const SUBPROCESS_CALLS: [&str; 5] = ["run", "Popen", "call", "check_call", "check_output"];

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ToolFindings {
    /// `path:line construct` per raw shell invocation.
    pub violations: Vec<String>,
    /// First file with an argument-vector subprocess call.
    pub subprocess: Option<String>,
    pub tempfile: bool,
}

struct ToolVisitor<'a> {
    path: &'a str,
    imports: &'a ImportTable,
    line: usize,
    findings: &'a mut ToolFindings,
}

impl Visitor for ToolVisitor<'_> {
    fn visit_stmt(&mut self, stmt: &Stmt) {
        self.line = stmt.line();
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        if let Expr::Call { func, keywords, .. } = expr {
            if let Some(name) = self.imports.resolve(func) {
                if SHELL_CALLS.contains(&name.as_str()) {
                    self.findings
                        .violations
                        .push(format!("{}:{} {name}()", self.path, self.line));
                } else if name.starts_with("subprocess.")
                    && SUBPROCESS_CALLS.contains(&last_segment(&name))
                {
                    let shell = keywords
                        .iter()
                        .any(|k| k.arg.as_deref() == Some("shell") && k.value.is_true());
                    if shell {
                        self.findings
                            .violations
                            .push(format!("{}:{} {name}(shell=True)", self.path, self.line));
                    } else if self.findings.subprocess.is_none() {
                        self.findings.subprocess = Some(self.path.to_string());
                    }
                } else if name.starts_with("tempfile.") {
                    self.findings.tempfile = true;
                }
            }
        }
        walk_expr(self, expr);
    }
}

pub fn analyse_into(source: &ParsedSource, findings: &mut ToolFindings) {
    let mut visitor = ToolVisitor {
        path: &source.path,
        imports: &source.imports,
        line: 0,
        findings,
    };
    walk_module(&mut visitor, &source.module);
}

pub fn evidence(criterion_id: &str, repo: &RepoSandbox) -> Evidence {
    if !repo.has_dir(TOOLS_DIR) {
        return Evidence::absent(criterion_id, format!("{TOOLS_DIR}/ directory not found"), 1.0);
    }
    let location = format!("{TOOLS_DIR}/");
    let files = match repo.list_files(TOOLS_DIR, "py") {
        Ok(files) => files,
        Err(err) => return unanalysable(criterion_id, &location, &err),
    };
    if files.is_empty() {
        return examined(
            criterion_id,
            &location,
            format!("no Python modules in {location}"),
            0.9,
        );
    }

    let mut findings = ToolFindings::default();
    let mut unanalysed = Vec::new();
    let mut first_failure = None;
    for path in &files {
        let parsed = repo
            .read_source(path)
            .and_then(|text| ParsedSource::parse(path, text.unwrap_or_default()));
        match parsed {
            Ok(source) => analyse_into(&source, &mut findings),
            Err(err) => {
                unanalysed.push(path.clone());
                first_failure.get_or_insert(err);
            }
        }
    }
    if unanalysed.len() == files.len() {
        if let Some(err) = &first_failure {
            return unanalysable(criterion_id, &location, err);
        }
    }

    if !findings.violations.is_empty() {
        // The rationale must carry a violation marker: the Security Rule
        // reads it.
        let first = findings.violations[0]
            .split(':')
            .next()
            .unwrap_or(&location)
            .to_string();
        return Evidence::new(
            criterion_id,
            false,
            first,
            format!(
                "SECURITY VIOLATION: raw shell execution ({}); shell injection risk",
                findings.violations.join(", ")
            ),
            Confidence::CERTAIN,
        );
    }

    let verdict = match (&findings.subprocess, findings.tempfile) {
        (Some(path), true) => Evidence::located(
            criterion_id,
            path.as_str(),
            "sandboxed cloning: argument-vector subprocess calls inside tempfile-managed directories",
            1.0,
        ),
        (Some(path), false) => Evidence::located(
            criterion_id,
            path.as_str(),
            "argument-vector subprocess calls, but no temporary-directory isolation detected",
            0.8,
        ),
        (None, _) => examined(
            criterion_id,
            &location,
            format!("neither subprocess calls nor tempfile usage detected in {location}"),
            0.9,
        ),
    };
    partially_analysed(verdict, files.len() - unanalysed.len(), &unanalysed)
}
