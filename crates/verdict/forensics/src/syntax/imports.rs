//! Qualified-name resolution through a module's imports.

use super::tree::{Expr, Module, Stmt};
use std::collections::HashMap;

/// Local binding -> fully qualified name, built from every import statement
/// in a module (including imports nested in functions or blocks).
#[derive(Clone, Debug, Default)]
pub struct ImportTable {
    bindings: HashMap<String, String>,
}

impl ImportTable {
    pub fn from_module(module: &Module) -> Self {
        let mut table = Self::default();
        table.scan(&module.body);
        table
    }

    fn scan(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            match stmt {
                Stmt::Import { names, .. } => {
                    for alias in names {
                        match &alias.asname {
                            Some(local) => {
                                self.bindings.insert(local.clone(), alias.name.clone());
                            }
                            None => {
                                // `import os.path` binds `os`.
                                let root = alias.name.split('.').next().unwrap_or(&alias.name);
                                self.bindings.insert(root.to_string(), root.to_string());
                            }
                        }
                    }
                }
                Stmt::ImportFrom { module, names, .. } => {
                    for alias in names.iter().filter(|a| a.name != "*") {
                        let qualified = if module.is_empty() || module.ends_with('.') {
                            format!("{module}{}", alias.name)
                        } else {
                            format!("{module}.{}", alias.name)
                        };
                        let local = alias.asname.clone().unwrap_or_else(|| alias.name.clone());
                        self.bindings.insert(local, qualified);
                    }
                }
                Stmt::ClassDef { body, .. }
                | Stmt::FunctionDef { body, .. }
                | Stmt::Block { body, .. } => self.scan(body),
                Stmt::Assign { .. } | Stmt::Expr { .. } => {}
            }
        }
    }

    /// Qualified name of a bound local, if it was imported.
    pub fn lookup(&self, local: &str) -> Option<&str> {
        self.bindings.get(local).map(String::as_str)
    }

    /// Resolve a name/attribute chain. Unimported roots resolve to themselves
    /// (builtins, locals); anything that is not a chain resolves to `None`.
    pub fn resolve(&self, expr: &Expr) -> Option<String> {
        match expr {
            Expr::Name(n) => Some(self.lookup(n).unwrap_or(n.as_str()).to_string()),
            Expr::Attribute { value, attr } => self.resolve(value).map(|base| format!("{base}.{attr}")),
            _ => None,
        }
    }

    /// Resolved name of a call's callee.
    pub fn resolve_call(&self, call: &Expr) -> Option<String> {
        match call {
            Expr::Call { func, .. } => self.resolve(func),
            _ => None,
        }
    }
}

/// Last dotted segment: `langgraph.graph.StateGraph` -> `StateGraph`.
pub fn last_segment(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}
