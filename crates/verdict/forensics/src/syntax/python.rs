//! Recursive-descent parser from Python tokens to the structural tree.
//!
//! The statement grammar is followed closely enough to recover blocks,
//! imports, classes, functions and assignments. The expression grammar is
//! permissive: operator precedence is not modelled, only which nodes contain
//! which.

use super::lexer::{tokenize, Token, TokenKind};
use super::tree::{Alias, Expr, Keyword, Module, Stmt};
use super::ParseError;

/// Parse Python source into a [`Module`].
pub fn parse_module(source: &str) -> Result<Module, ParseError> {
    let tokens = tokenize(source)?;
    let mut parser = Parser { tokens, pos: 0 };
    let mut body = Vec::new();
    loop {
        match parser.kind() {
            TokenKind::EndMarker => break,
            TokenKind::Newline => parser.pos += 1,
            _ => body.extend(parser.statement()?),
        }
    }
    Ok(Module { body })
}

const COMPOUND_KEYWORDS: &[&str] = &[
    "if", "elif", "else", "for", "while", "with", "try", "except", "finally", "match", "case",
];

const BINARY_OPS: &[&str] = &[
    "+", "-", "*", "/", "//", "%", "**", "@", "&", "|", "^", "<<", ">>", "<", ">", "<=", ">=",
    "==", "!=", ":=",
];

const BINARY_WORDS: &[&str] = &["and", "or", "in", "is", "not"];

const AUGMENTED_ASSIGN: &[&str] = &[
    "+=", "-=", "*=", "/=", "//=", "%=", "**=", "@=", "&=", "|=", "^=", ">>=", "<<=",
];

static END: TokenKind = TokenKind::EndMarker;

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    // -- cursor helpers ----------------------------------------------------

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn kind(&self) -> &TokenKind {
        self.current().map_or(&END, |t| &t.kind)
    }

    fn line(&self) -> usize {
        self.current()
            .or_else(|| self.tokens.last())
            .map_or(1, |t| t.line)
    }

    fn is_op(&self, op: &str) -> bool {
        matches!(self.kind(), TokenKind::Op(o) if *o == op)
    }

    fn is_word(&self, word: &str) -> bool {
        matches!(self.kind(), TokenKind::Name(n) if n == word)
    }

    fn is_word_at(&self, offset: usize, word: &str) -> bool {
        matches!(self.tokens.get(self.pos + offset).map(|t| &t.kind), Some(TokenKind::Name(n)) if n == word)
    }

    fn eat_op(&mut self, op: &str) -> bool {
        let hit = self.is_op(op);
        if hit {
            self.pos += 1;
        }
        hit
    }

    fn eat_word(&mut self, word: &str) -> bool {
        let hit = self.is_word(word);
        if hit {
            self.pos += 1;
        }
        hit
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            line: self.line(),
            message: message.into(),
        }
    }

    fn expect_op(&mut self, op: &str) -> Result<(), ParseError> {
        if self.eat_op(op) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{op}', found {}", describe(self.kind()))))
        }
    }

    fn expect_name(&mut self) -> Result<String, ParseError> {
        match self.kind().clone() {
            TokenKind::Name(n) => {
                self.pos += 1;
                Ok(n)
            }
            other => Err(self.error(format!("expected a name, found {}", describe(&other)))),
        }
    }

    fn at_expression_end(&self) -> bool {
        matches!(
            self.kind(),
            TokenKind::Newline | TokenKind::EndMarker | TokenKind::Dedent | TokenKind::Indent
        ) || self.is_op(";")
            || self.is_op(")")
            || self.is_op("]")
            || self.is_op("}")
            || self.is_op(",")
            || self.is_op(":")
            || self.is_op("=")
    }

    // -- statements --------------------------------------------------------

    /// One logical line may carry several `;`-separated simple statements.
    fn statement(&mut self) -> Result<Vec<Stmt>, ParseError> {
        if self.is_op("@") {
            return Ok(vec![self.decorated()?]);
        }
        if self.is_word("class") {
            return Ok(vec![self.class_def(Vec::new())?]);
        }
        if self.is_word("def") || (self.is_word("async") && self.is_word_at(1, "def")) {
            return Ok(vec![self.function_def(Vec::new())?]);
        }
        if let TokenKind::Name(word) = self.kind() {
            let is_compound = COMPOUND_KEYWORDS.contains(&word.as_str())
                || (word == "async" && (self.is_word_at(1, "for") || self.is_word_at(1, "with")));
            // `match` and `case` are soft keywords: only compound when a
            // block follows on the same logical line.
            let soft = word == "match" || word == "case";
            if is_compound && (!soft || self.line_ends_with_colon()) {
                return Ok(vec![self.block()?]);
            }
        }
        if matches!(self.kind(), TokenKind::Indent) {
            return Err(self.error("unexpected indent"));
        }
        if matches!(self.kind(), TokenKind::Dedent) {
            return Err(self.error("unexpected dedent"));
        }
        self.simple_statements()
    }

    fn line_ends_with_colon(&self) -> bool {
        let mut depth = 0usize;
        for token in &self.tokens[self.pos..] {
            match &token.kind {
                TokenKind::Newline | TokenKind::EndMarker => return false,
                TokenKind::Op("(" | "[" | "{") => depth += 1,
                TokenKind::Op(")" | "]" | "}") => depth = depth.saturating_sub(1),
                TokenKind::Op(":") if depth == 0 => return true,
                _ => {}
            }
        }
        false
    }

    fn simple_statements(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut out = vec![self.simple_statement()?];
        while self.eat_op(";") {
            if matches!(self.kind(), TokenKind::Newline | TokenKind::EndMarker) {
                break;
            }
            out.push(self.simple_statement()?);
        }
        self.end_of_line()?;
        Ok(out)
    }

    fn end_of_line(&mut self) -> Result<(), ParseError> {
        match self.kind() {
            TokenKind::Newline => {
                self.pos += 1;
                Ok(())
            }
            TokenKind::EndMarker | TokenKind::Dedent => Ok(()),
            other => Err(self.error(format!("expected end of statement, found {}", describe(other)))),
        }
    }

    fn simple_statement(&mut self) -> Result<Stmt, ParseError> {
        let line = self.line();
        if self.is_word("import") {
            self.pos += 1;
            let names = self.aliases(true)?;
            return Ok(Stmt::Import { names, line });
        }
        if self.is_word("from") {
            return self.import_from(line);
        }
        for keyword in ["pass", "break", "continue"] {
            if self.eat_word(keyword) {
                return Ok(Stmt::Expr {
                    values: Vec::new(),
                    line,
                });
            }
        }
        for keyword in ["return", "raise", "del", "assert", "global", "nonlocal"] {
            if self.eat_word(keyword) {
                let mut values = self.expression_list()?;
                // `raise X from Y`
                if self.eat_word("from") {
                    values.extend(self.expression_list()?);
                }
                return Ok(Stmt::Expr { values, line });
            }
        }

        let first = self.expression_list()?;
        if self.eat_op(":") {
            let annotation = self.expression()?;
            let value = if self.eat_op("=") {
                Some(self.tuple_or_expression()?)
            } else {
                None
            };
            return Ok(Stmt::Assign {
                targets: first,
                annotation: Some(annotation),
                value,
                line,
            });
        }
        if let TokenKind::Op(op) = self.kind() {
            if AUGMENTED_ASSIGN.contains(op) {
                self.pos += 1;
                let value = self.tuple_or_expression()?;
                return Ok(Stmt::Assign {
                    targets: first,
                    annotation: None,
                    value: Some(value),
                    line,
                });
            }
        }
        if self.is_op("=") {
            let mut targets = first;
            let mut value = None;
            while self.eat_op("=") {
                let next = self.tuple_or_expression()?;
                if let Some(previous) = value.replace(next) {
                    targets.push(previous);
                }
            }
            return Ok(Stmt::Assign {
                targets,
                annotation: None,
                value,
                line,
            });
        }
        Ok(Stmt::Expr {
            values: first,
            line,
        })
    }

    fn import_from(&mut self, line: usize) -> Result<Stmt, ParseError> {
        self.pos += 1;
        let mut module = String::new();
        loop {
            if self.eat_op(".") {
                module.push('.');
            } else if self.eat_op("...") {
                module.push_str("...");
            } else {
                break;
            }
        }
        if !self.is_word("import") {
            module.push_str(&self.dotted_name()?);
        }
        if !self.eat_word("import") {
            return Err(self.error("expected 'import'"));
        }
        let names = if self.eat_op("*") {
            vec![Alias {
                name: "*".into(),
                asname: None,
            }]
        } else if self.eat_op("(") {
            let names = self.aliases(false)?;
            self.expect_op(")")?;
            names
        } else {
            self.aliases(false)?
        };
        Ok(Stmt::ImportFrom {
            module,
            names,
            line,
        })
    }

    fn dotted_name(&mut self) -> Result<String, ParseError> {
        let mut name = self.expect_name()?;
        while self.eat_op(".") {
            name.push('.');
            name.push_str(&self.expect_name()?);
        }
        Ok(name)
    }

    fn aliases(&mut self, dotted: bool) -> Result<Vec<Alias>, ParseError> {
        let mut names = Vec::new();
        loop {
            let name = if dotted {
                self.dotted_name()?
            } else {
                self.expect_name()?
            };
            let asname = if self.eat_word("as") {
                Some(self.expect_name()?)
            } else {
                None
            };
            names.push(Alias { name, asname });
            if !self.eat_op(",") || self.is_op(")") {
                break;
            }
        }
        Ok(names)
    }

    fn decorated(&mut self) -> Result<Stmt, ParseError> {
        let mut decorators = Vec::new();
        while self.eat_op("@") {
            decorators.push(self.expression()?);
            self.end_of_line()?;
        }
        if self.is_word("class") {
            self.class_def(decorators)
        } else if self.is_word("def") || self.is_word("async") {
            self.function_def(decorators)
        } else {
            Err(self.error("decorator must precede 'def' or 'class'"))
        }
    }

    fn class_def(&mut self, decorators: Vec<Expr>) -> Result<Stmt, ParseError> {
        let line = self.line();
        self.pos += 1;
        let name = self.expect_name()?;
        self.type_params()?;
        let (bases, keywords) = if self.eat_op("(") {
            self.call_arguments()?
        } else {
            (Vec::new(), Vec::new())
        };
        self.expect_op(":")?;
        let body = self.suite()?;
        Ok(Stmt::ClassDef {
            name,
            bases,
            keywords,
            decorators,
            body,
            line,
        })
    }

    /// Optional `[T, *Ts, **P]` list after a `def` or `class` name.
    fn type_params(&mut self) -> Result<(), ParseError> {
        if self.eat_op("[") {
            self.skip_bracketed()?;
        }
        Ok(())
    }

    /// Skip to just past the bracket closing one already consumed.
    fn skip_bracketed(&mut self) -> Result<(), ParseError> {
        let mut depth = 1usize;
        while depth > 0 {
            match self.kind() {
                TokenKind::Op("(" | "[" | "{") => depth += 1,
                TokenKind::Op(")" | "]" | "}") => depth -= 1,
                TokenKind::EndMarker => return Err(self.error("unexpected end of file in brackets")),
                _ => {}
            }
            self.pos += 1;
        }
        Ok(())
    }

    fn function_def(&mut self, decorators: Vec<Expr>) -> Result<Stmt, ParseError> {
        let line = self.line();
        self.eat_word("async");
        if !self.eat_word("def") {
            return Err(self.error("expected 'def'"));
        }
        let name = self.expect_name()?;
        self.type_params()?;
        self.expect_op("(")?;
        // Parameters are skipped: the tokenizer already guarantees balance.
        self.skip_bracketed()?;
        if self.eat_op("->") {
            self.expression()?;
        }
        self.expect_op(":")?;
        let body = self.suite()?;
        Ok(Stmt::FunctionDef {
            name,
            decorators,
            body,
            line,
        })
    }

    /// `if`/`for`/`with`/`try`... The header is parsed as a sequence of
    /// expressions; clause bodies (`elif`, `else`, `except`...) are folded
    /// into one body.
    fn block(&mut self) -> Result<Stmt, ParseError> {
        let line = self.line();
        let keyword = self.expect_name()?;
        let keyword = if keyword == "async" {
            self.expect_name()?
        } else {
            keyword
        };
        let mut header = self.block_header()?;
        let mut body = self.suite()?;

        if keyword == "match" {
            return Ok(Stmt::Block {
                keyword,
                header,
                body,
                line,
            });
        }
        loop {
            let continues = match keyword.as_str() {
                "if" => self.is_word("elif") || self.is_word("else"),
                "for" | "while" => self.is_word("else"),
                "try" => {
                    self.is_word("except") || self.is_word("else") || self.is_word("finally")
                }
                _ => false,
            };
            if !continues {
                break;
            }
            self.pos += 1;
            header.extend(self.block_header()?);
            body.extend(self.suite()?);
        }
        Ok(Stmt::Block {
            keyword,
            header,
            body,
            line,
        })
    }

    fn block_header(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut header = Vec::new();
        loop {
            if self.eat_op(":") {
                return Ok(header);
            }
            if matches!(self.kind(), TokenKind::Newline | TokenKind::EndMarker) {
                return Err(self.error("expected ':'"));
            }
            if self.eat_op(",") || self.eat_word("as") || self.eat_word("in") || self.eat_op("*") {
                continue;
            }
            header.push(self.expression()?);
        }
    }

    fn suite(&mut self) -> Result<Vec<Stmt>, ParseError> {
        if !matches!(self.kind(), TokenKind::Newline) {
            return self.simple_statements();
        }
        self.pos += 1;
        if !matches!(self.kind(), TokenKind::Indent) {
            return Err(self.error("expected an indented block"));
        }
        self.pos += 1;
        let mut body = Vec::new();
        loop {
            match self.kind() {
                TokenKind::Dedent => {
                    self.pos += 1;
                    break;
                }
                TokenKind::EndMarker => break,
                TokenKind::Newline => self.pos += 1,
                _ => body.extend(self.statement()?),
            }
        }
        Ok(body)
    }

    // -- expressions -------------------------------------------------------

    fn expression_list(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut items = Vec::new();
        while !self.at_expression_end() {
            items.push(self.expression()?);
            if !self.eat_op(",") {
                break;
            }
        }
        Ok(items)
    }

    /// A bare `a, b` right-hand side becomes one collection.
    fn tuple_or_expression(&mut self) -> Result<Expr, ParseError> {
        let mut items = self.expression_list()?;
        match items.len() {
            0 => Err(self.error("expected an expression")),
            1 => Ok(items.remove(0)),
            _ => Ok(Expr::Collection(items)),
        }
    }

    fn expression(&mut self) -> Result<Expr, ParseError> {
        if self.eat_word("lambda") {
            while !self.is_op(":") {
                if matches!(self.kind(), TokenKind::Newline | TokenKind::EndMarker) {
                    return Err(self.error("expected ':' in lambda"));
                }
                self.pos += 1;
            }
            self.pos += 1;
            let body = self.expression()?;
            return Ok(Expr::Other(vec![body]));
        }

        let first = self.binary()?;
        if !self.is_word("if") {
            return Ok(first);
        }
        // Conditional expression, or the filter of a comprehension.
        self.pos += 1;
        let mut parts = vec![first, self.binary()?];
        if self.eat_word("else") {
            parts.push(self.expression()?);
        }
        Ok(Expr::Other(parts))
    }

    fn binary(&mut self) -> Result<Expr, ParseError> {
        let first = self.unary()?;
        let mut operands = vec![first];
        loop {
            let is_operator = match self.kind() {
                TokenKind::Op(op) => BINARY_OPS.contains(op),
                TokenKind::Name(n) => BINARY_WORDS.contains(&n.as_str()),
                _ => false,
            };
            if !is_operator {
                break;
            }
            self.pos += 1;
            // `is not`, `not in`
            self.eat_word("not");
            self.eat_word("in");
            operands.push(self.unary()?);
        }
        if operands.len() == 1 {
            Ok(operands.remove(0))
        } else {
            Ok(Expr::Other(operands))
        }
    }

    fn unary(&mut self) -> Result<Expr, ParseError> {
        if self.eat_word("await") {
            return self.unary();
        }
        if self.eat_word("yield") {
            self.eat_word("from");
            if self.at_expression_end() {
                return Ok(Expr::Other(Vec::new()));
            }
            return Ok(Expr::Other(self.expression_list()?));
        }
        if self.eat_word("not") || ["-", "+", "~", "*", "**"].iter().any(|op| self.eat_op(op)) {
            return Ok(Expr::Other(vec![self.unary()?]));
        }
        self.postfix()
    }

    fn postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.atom()?;
        loop {
            if self.eat_op(".") {
                let attr = self.expect_name()?;
                expr = Expr::Attribute {
                    value: Box::new(expr),
                    attr,
                };
            } else if self.eat_op("(") {
                let (args, keywords) = self.call_arguments()?;
                expr = Expr::Call {
                    func: Box::new(expr),
                    args,
                    keywords,
                };
            } else if self.eat_op("[") {
                let index = self.bracket_items("]")?;
                expr = Expr::Subscript {
                    value: Box::new(expr),
                    index,
                };
            } else {
                return Ok(expr);
            }
        }
    }

    fn atom(&mut self) -> Result<Expr, ParseError> {
        match self.kind().clone() {
            TokenKind::Name(n) => {
                self.pos += 1;
                Ok(Expr::Name(n))
            }
            TokenKind::Number(n) => {
                self.pos += 1;
                Ok(Expr::Num(n))
            }
            TokenKind::Str(s) => {
                self.pos += 1;
                let mut text = s;
                while let TokenKind::Str(next) = self.kind() {
                    text.push_str(next);
                    self.pos += 1;
                }
                Ok(Expr::Str(text))
            }
            TokenKind::Op("...") => {
                self.pos += 1;
                Ok(Expr::Name("Ellipsis".into()))
            }
            TokenKind::Op("(") => {
                self.pos += 1;
                let mut items = self.bracket_items(")")?;
                if items.len() == 1 {
                    Ok(items.remove(0))
                } else {
                    Ok(Expr::Collection(items))
                }
            }
            TokenKind::Op("[") => {
                self.pos += 1;
                Ok(Expr::Collection(self.bracket_items("]")?))
            }
            TokenKind::Op("{") => {
                self.pos += 1;
                Ok(Expr::Collection(self.bracket_items("}")?))
            }
            other => Err(self.error(format!("unexpected {}", describe(&other)))),
        }
    }

    /// Items of a display, subscript or parenthesised expression up to
    /// `close`. Comprehension clauses, slice and dict colons and star
    /// markers act as separators.
    fn bracket_items(&mut self, close: &str) -> Result<Vec<Expr>, ParseError> {
        let mut items = Vec::new();
        loop {
            if self.eat_op(close) {
                return Ok(items);
            }
            if matches!(self.kind(), TokenKind::EndMarker) {
                return Err(self.error(format!("expected '{close}'")));
            }
            if self.eat_op(",")
                || self.eat_op(":")
                || self.eat_op("*")
                || self.eat_op("**")
                || self.eat_word("for")
                || self.eat_word("async")
                || self.eat_word("in")
            {
                continue;
            }
            items.push(self.expression()?);
        }
    }

    fn call_arguments(&mut self) -> Result<(Vec<Expr>, Vec<Keyword>), ParseError> {
        let mut args = Vec::new();
        let mut keywords = Vec::new();
        loop {
            if self.eat_op(")") {
                return Ok((args, keywords));
            }
            if matches!(self.kind(), TokenKind::EndMarker) {
                return Err(self.error("expected ')'"));
            }
            if self.eat_op(",") || self.eat_op("*") || self.eat_word("for") || self.eat_word("in") {
                continue;
            }
            if self.eat_op("**") {
                let value = self.expression()?;
                keywords.push(Keyword { arg: None, value });
                continue;
            }
            let keyword_name = match (self.kind(), self.tokens.get(self.pos + 1).map(|t| &t.kind)) {
                (TokenKind::Name(n), Some(TokenKind::Op("="))) => Some(n.clone()),
                _ => None,
            };
            if let Some(arg) = keyword_name {
                self.pos += 2;
                let value = self.expression()?;
                keywords.push(Keyword {
                    arg: Some(arg),
                    value,
                });
            } else {
                args.push(self.expression()?);
            }
        }
    }
}

fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Name(n) => format!("'{n}'"),
        TokenKind::Number(n) => format!("number {n}"),
        TokenKind::Str(_) => "string literal".into(),
        TokenKind::Op(op) => format!("'{op}'"),
        TokenKind::Newline => "end of line".into(),
        TokenKind::Indent => "indent".into(),
        TokenKind::Dedent => "dedent".into(),
        TokenKind::EndMarker => "end of file".into(),
    }
}
