//! Python tokenizer with indentation tracking.
//!
//! Produces logical-line tokens: newlines inside brackets and after a
//! backslash continuation are dropped, comments are skipped, and changes in
//! leading whitespace become `Indent` / `Dedent` tokens.

use super::ParseError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Name(String),
    Number(String),
    /// Literal body with its prefix and quotes stripped.
    Str(String),
    Op(&'static str),
    Newline,
    Indent,
    Dedent,
    EndMarker,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
}

// Longest first: matching stops at the first hit.
const OPERATORS: &[&str] = &[
    "**=", "//=", ">>=", "<<=", "...", "->", ":=", "==", "!=", "<=", ">=", "**", "//", "<<", ">>",
    "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "@=", "+", "-", "*", "/", "%", "@", "&", "|",
    "^", "~", "<", ">", "(", ")", "[", "]", "{", "}", ",", ":", ".", ";", "=", "!",
];

const STRING_PREFIXES: &[&str] = &["r", "u", "b", "f", "br", "rb", "fr", "rf"];

pub fn tokenize(source: &str) -> Result<Vec<Token>, ParseError> {
    Lexer::new(source).run()
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    tokens: Vec<Token>,
    indents: Vec<usize>,
    brackets: Vec<(char, usize)>,
    at_line_start: bool,
}

impl Lexer {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            tokens: Vec::new(),
            indents: vec![0],
            brackets: Vec::new(),
            at_line_start: true,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn push(&mut self, kind: TokenKind, line: usize) {
        self.tokens.push(Token { kind, line });
    }

    fn error(&self, line: usize, message: impl Into<String>) -> ParseError {
        ParseError {
            line,
            message: message.into(),
        }
    }

    fn run(mut self) -> Result<Vec<Token>, ParseError> {
        loop {
            if self.at_line_start && self.brackets.is_empty() {
                let width = self.measure_indent();
                match self.peek() {
                    None => break,
                    Some('\n') => {
                        self.pos += 1;
                        self.line += 1;
                        continue;
                    }
                    Some('\r') => {
                        self.pos += 1;
                        continue;
                    }
                    Some('#') => {
                        self.skip_comment();
                        continue;
                    }
                    Some(_) => {
                        self.indent_to(width)?;
                        self.at_line_start = false;
                    }
                }
            }

            let Some(c) = self.peek() else { break };
            match c {
                '\n' => {
                    self.pos += 1;
                    if self.brackets.is_empty() {
                        self.push(TokenKind::Newline, self.line);
                        self.at_line_start = true;
                    }
                    self.line += 1;
                }
                ' ' | '\t' | '\r' | '\x0c' => self.pos += 1,
                '#' => self.skip_comment(),
                '\\' => self.continuation()?,
                '\'' | '"' => self.string(false)?,
                c if c.is_ascii_digit() => self.number(),
                '.' if self.peek_at(1).is_some_and(|n| n.is_ascii_digit()) => self.number(),
                c if c.is_alphabetic() || c == '_' => self.name_or_prefixed_string()?,
                _ => self.operator(c)?,
            }
        }

        if let Some((open, line)) = self.brackets.last() {
            return Err(self.error(*line, format!("'{open}' was never closed")));
        }
        let end_line = self.line;
        if !self.at_line_start {
            self.push(TokenKind::Newline, end_line);
        }
        while self.indents.len() > 1 {
            self.indents.pop();
            self.push(TokenKind::Dedent, end_line);
        }
        self.push(TokenKind::EndMarker, end_line);
        Ok(self.tokens)
    }

    fn measure_indent(&mut self) -> usize {
        let mut width = 0;
        while let Some(c) = self.peek() {
            match c {
                ' ' => width += 1,
                '\t' => width = (width / 8 + 1) * 8,
                '\x0c' => width = 0,
                _ => break,
            }
            self.pos += 1;
        }
        width
    }

    fn indent_to(&mut self, width: usize) -> Result<(), ParseError> {
        let current = self.indents.last().copied().unwrap_or(0);
        if width > current {
            self.indents.push(width);
            self.push(TokenKind::Indent, self.line);
        } else if width < current {
            while self.indents.last().is_some_and(|&top| top > width) {
                self.indents.pop();
                self.push(TokenKind::Dedent, self.line);
            }
            if self.indents.last().copied().unwrap_or(0) != width {
                return Err(self.error(
                    self.line,
                    "unindent does not match any outer indentation level",
                ));
            }
        }
        Ok(())
    }

    fn skip_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.pos += 1;
        }
    }

    fn continuation(&mut self) -> Result<(), ParseError> {
        self.pos += 1;
        if self.peek() == Some('\r') {
            self.pos += 1;
        }
        match self.peek() {
            Some('\n') => {
                self.pos += 1;
                self.line += 1;
                Ok(())
            }
            None => Err(self.error(self.line, "unexpected end of file after line continuation")),
            Some(_) => Err(self.error(
                self.line,
                "unexpected character after line continuation character",
            )),
        }
    }

    fn number(&mut self) {
        let line = self.line;
        let start = self.pos;
        let hex = self.peek() == Some('0') && matches!(self.peek_at(1), Some('x' | 'X'));
        while let Some(c) = self.peek() {
            let exponent_sign = (c == '+' || c == '-')
                && !hex
                && matches!(self.chars.get(self.pos.wrapping_sub(1)).copied(), Some('e' | 'E'));
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' || exponent_sign {
                self.pos += 1;
            } else {
                break;
            }
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        self.push(TokenKind::Number(text), line);
    }

    fn name_or_prefixed_string(&mut self) -> Result<(), ParseError> {
        let line = self.line;
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.pos += 1;
            } else {
                break;
            }
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        let lower = text.to_ascii_lowercase();
        if matches!(self.peek(), Some('\'' | '"')) && STRING_PREFIXES.contains(&lower.as_str()) {
            return self.string(lower.contains('r'));
        }
        self.push(TokenKind::Name(text), line);
        Ok(())
    }

    fn string(&mut self, raw: bool) -> Result<(), ParseError> {
        let start_line = self.line;
        let Some(quote) = self.peek() else {
            return Err(self.error(start_line, "unterminated string literal"));
        };
        let triple = self.peek_at(1) == Some(quote) && self.peek_at(2) == Some(quote);
        self.pos += if triple { 3 } else { 1 };

        let mut body = String::new();
        loop {
            let Some(c) = self.peek() else {
                return Err(self.error(start_line, "unterminated string literal"));
            };
            match c {
                '\\' => {
                    let Some(next) = self.peek_at(1) else {
                        return Err(self.error(start_line, "unterminated string literal"));
                    };
                    self.pos += 2;
                    if next == '\n' {
                        self.line += 1;
                        if raw {
                            body.push('\\');
                            body.push('\n');
                        }
                        continue;
                    }
                    if raw {
                        body.push('\\');
                        body.push(next);
                    } else {
                        body.push(match next {
                            'n' => '\n',
                            't' => '\t',
                            'r' => '\r',
                            '0' => '\0',
                            other => other,
                        });
                    }
                }
                '\n' if !triple => {
                    return Err(self.error(start_line, "unterminated string literal"));
                }
                c if c == quote
                    && (!triple
                        || (self.peek_at(1) == Some(quote) && self.peek_at(2) == Some(quote))) =>
                {
                    self.pos += if triple { 3 } else { 1 };
                    break;
                }
                c => {
                    if c == '\n' {
                        self.line += 1;
                    }
                    body.push(c);
                    self.pos += 1;
                }
            }
        }
        self.push(TokenKind::Str(body), start_line);
        Ok(())
    }

    fn operator(&mut self, c: char) -> Result<(), ParseError> {
        let line = self.line;
        let Some(op) = OPERATORS.iter().copied().find(|op| {
            op.chars()
                .enumerate()
                .all(|(i, ch)| self.peek_at(i) == Some(ch))
        }) else {
            return Err(self.error(line, format!("invalid character '{c}'")));
        };

        match op {
            "(" | "[" | "{" => self.brackets.push((c, line)),
            ")" | "]" | "}" => {
                let expected = match op {
                    ")" => '(',
                    "]" => '[',
                    _ => '{',
                };
                match self.brackets.pop() {
                    Some((open, _)) if open == expected => {}
                    Some((open, open_line)) => {
                        return Err(self.error(
                            line,
                            format!("closing '{op}' does not match '{open}' opened on line {open_line}"),
                        ));
                    }
                    None => return Err(self.error(line, format!("unmatched '{op}'"))),
                }
            }
            _ => {}
        }
        self.pos += op.chars().count();
        self.push(TokenKind::Op(op), line);
        Ok(())
    }
}
