//! Depth-first traversal over the structural tree.

use super::tree::{Expr, Module, Stmt};

/// Override the hooks you care about and call the matching `walk_*`
/// function to keep descending.
pub trait Visitor {
    fn visit_stmt(&mut self, stmt: &Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        walk_expr(self, expr);
    }
}

pub fn walk_module<V: Visitor + ?Sized>(visitor: &mut V, module: &Module) {
    for stmt in &module.body {
        visitor.visit_stmt(stmt);
    }
}

pub fn walk_stmt<V: Visitor + ?Sized>(visitor: &mut V, stmt: &Stmt) {
    match stmt {
        Stmt::Import { .. } | Stmt::ImportFrom { .. } => {}
        Stmt::ClassDef {
            bases,
            keywords,
            decorators,
            body,
            ..
        } => {
            for e in decorators.iter().chain(bases) {
                visitor.visit_expr(e);
            }
            for kw in keywords {
                visitor.visit_expr(&kw.value);
            }
            for s in body {
                visitor.visit_stmt(s);
            }
        }
        Stmt::FunctionDef {
            decorators, body, ..
        } => {
            for e in decorators {
                visitor.visit_expr(e);
            }
            for s in body {
                visitor.visit_stmt(s);
            }
        }
        Stmt::Assign {
            targets,
            annotation,
            value,
            ..
        } => {
            for e in targets.iter().chain(annotation).chain(value) {
                visitor.visit_expr(e);
            }
        }
        Stmt::Expr { values, .. } => {
            for e in values {
                visitor.visit_expr(e);
            }
        }
        Stmt::Block { header, body, .. } => {
            for e in header {
                visitor.visit_expr(e);
            }
            for s in body {
                visitor.visit_stmt(s);
            }
        }
    }
}

pub fn walk_expr<V: Visitor + ?Sized>(visitor: &mut V, expr: &Expr) {
    match expr {
        Expr::Name(_) | Expr::Str(_) | Expr::Num(_) => {}
        Expr::Attribute { value, .. } => visitor.visit_expr(value),
        Expr::Call {
            func,
            args,
            keywords,
        } => {
            visitor.visit_expr(func);
            for a in args {
                visitor.visit_expr(a);
            }
            for kw in keywords {
                visitor.visit_expr(&kw.value);
            }
        }
        Expr::Subscript { value, index } => {
            visitor.visit_expr(value);
            for e in index {
                visitor.visit_expr(e);
            }
        }
        Expr::Collection(items) | Expr::Other(items) => {
            for e in items {
                visitor.visit_expr(e);
            }
        }
    }
}

/// Collects every call expression in a subtree, outermost first.
#[derive(Default)]
pub struct CallCollector<'a> {
    pub calls: Vec<&'a Expr>,
}

impl<'a> CallCollector<'a> {
    pub fn collect_module(module: &'a Module) -> Vec<&'a Expr> {
        let mut c = CallCollector::default();
        for stmt in &module.body {
            c.stmt(stmt);
        }
        c.calls
    }

    pub fn collect_stmts(stmts: &'a [Stmt]) -> Vec<&'a Expr> {
        let mut c = CallCollector::default();
        for stmt in stmts {
            c.stmt(stmt);
        }
        c.calls
    }

    // The Visitor trait hands out short-lived borrows, so the collector
    // walks by hand to keep `'a` on the collected references.
    fn stmt(&mut self, stmt: &'a Stmt) {
        match stmt {
            Stmt::Import { .. } | Stmt::ImportFrom { .. } => {}
            Stmt::ClassDef {
                bases,
                keywords,
                decorators,
                body,
                ..
            } => {
                decorators.iter().chain(bases).for_each(|e| self.expr(e));
                keywords.iter().for_each(|k| self.expr(&k.value));
                body.iter().for_each(|s| self.stmt(s));
            }
            Stmt::FunctionDef {
                decorators, body, ..
            } => {
                decorators.iter().for_each(|e| self.expr(e));
                body.iter().for_each(|s| self.stmt(s));
            }
            Stmt::Assign {
                targets,
                annotation,
                value,
                ..
            } => targets
                .iter()
                .chain(annotation)
                .chain(value)
                .for_each(|e| self.expr(e)),
            Stmt::Expr { values, .. } => values.iter().for_each(|e| self.expr(e)),
            Stmt::Block { header, body, .. } => {
                header.iter().for_each(|e| self.expr(e));
                body.iter().for_each(|s| self.stmt(s));
            }
        }
    }

    fn expr(&mut self, expr: &'a Expr) {
        match expr {
            Expr::Name(_) | Expr::Str(_) | Expr::Num(_) => {}
            Expr::Attribute { value, .. } => self.expr(value),
            Expr::Call {
                func,
                args,
                keywords,
            } => {
                self.calls.push(expr);
                self.expr(func);
                args.iter().for_each(|a| self.expr(a));
                keywords.iter().for_each(|k| self.expr(&k.value));
            }
            Expr::Subscript { value, index } => {
                self.expr(value);
                index.iter().for_each(|e| self.expr(e));
            }
            Expr::Collection(items) | Expr::Other(items) => items.iter().for_each(|e| self.expr(e)),
        }
    }
}
