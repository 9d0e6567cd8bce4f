//! Parser-neutral structural tree.
//!
//! Only the node shapes forensic protocols match on are distinguished.
//! Everything else collapses into `Other`, which still carries its children
//! so nested calls stay visible to visitors.

use std::fmt;

/// A parsed source file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Module {
    pub body: Vec<Stmt>,
}

/// `name [as asname]` inside an import statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alias {
    pub name: String,
    pub asname: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    /// `import a.b as c, d`
    Import { names: Vec<Alias>, line: usize },
    /// `from ..pkg import x as y`. `module` keeps its leading dots.
    ImportFrom {
        module: String,
        names: Vec<Alias>,
        line: usize,
    },
    ClassDef {
        name: String,
        bases: Vec<Expr>,
        keywords: Vec<Keyword>,
        decorators: Vec<Expr>,
        body: Vec<Stmt>,
        line: usize,
    },
    FunctionDef {
        name: String,
        decorators: Vec<Expr>,
        body: Vec<Stmt>,
        line: usize,
    },
    /// `a = b = value`, plus augmented and annotated assignment.
    Assign {
        targets: Vec<Expr>,
        annotation: Option<Expr>,
        value: Option<Expr>,
        line: usize,
    },
    /// Any other simple statement (`return`, `raise`, bare expressions...),
    /// reduced to the expressions it contains.
    Expr { values: Vec<Expr>, line: usize },
    /// Compound statements other than `class`/`def` (`if`, `for`, `with`,
    /// `try`...): header expressions plus every clause body, flattened.
    Block {
        keyword: String,
        header: Vec<Expr>,
        body: Vec<Stmt>,
        line: usize,
    },
}

impl Stmt {
    pub fn line(&self) -> usize {
        match self {
            Stmt::Import { line, .. }
            | Stmt::ImportFrom { line, .. }
            | Stmt::ClassDef { line, .. }
            | Stmt::FunctionDef { line, .. }
            | Stmt::Assign { line, .. }
            | Stmt::Expr { line, .. }
            | Stmt::Block { line, .. } => *line,
        }
    }
}

/// `name=value` in a call, or `**value` when `arg` is `None`.
#[derive(Clone, Debug, PartialEq)]
pub struct Keyword {
    pub arg: Option<String>,
    pub value: Expr,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Name(String),
    Attribute {
        value: Box<Expr>,
        attr: String,
    },
    Call {
        func: Box<Expr>,
        args: Vec<Expr>,
        keywords: Vec<Keyword>,
    },
    Subscript {
        value: Box<Expr>,
        index: Vec<Expr>,
    },
    /// String literal; adjacent literals are already concatenated.
    Str(String),
    Num(String),
    /// Tuple, list, set or dict display (dict keys and values interleaved).
    Collection(Vec<Expr>),
    /// Operators, lambdas, comprehensions and the like.
    Other(Vec<Expr>),
}

impl Expr {
    /// The literal text if this is a string constant.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Expr::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Dotted source spelling of a name/attribute chain (`a.b.c`), without
    /// import resolution.
    pub fn dotted(&self) -> Option<String> {
        match self {
            Expr::Name(n) => Some(n.clone()),
            Expr::Attribute { value, attr } => value.dotted().map(|base| format!("{base}.{attr}")),
            _ => None,
        }
    }

    pub fn is_true(&self) -> bool {
        matches!(self, Expr::Name(n) if n == "True")
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Name(n) => write!(f, "{n}"),
            Expr::Attribute { value, attr } => write!(f, "{value}.{attr}"),
            Expr::Call { func, .. } => write!(f, "{func}(...)"),
            Expr::Subscript { value, .. } => write!(f, "{value}[...]"),
            Expr::Str(s) => write!(f, "{s:?}"),
            Expr::Num(n) => write!(f, "{n}"),
            Expr::Collection(_) => write!(f, "<collection>"),
            Expr::Other(_) => write!(f, "<expr>"),
        }
    }
}
