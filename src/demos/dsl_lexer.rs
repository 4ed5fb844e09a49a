use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;

/*
A small hand-written scanner for the grammar-description language, in the same
style as a typical recursive-descent front end: a `start`/`current`/`line`
cursor over the source text, `peek`/`advance`/`match_char` helpers, and one
`scan_token` dispatch. This is deliberately the "toy lexer" the core spec
calls out as an external collaborator -- it exists only so the engine has a
runnable example to parse, not as part of the parser's public contract.

Grammar-description-language tokens:
  rule   ::= alt ( "|" alt )*
  alt    ::= symbol*
  symbol ::= STRING | "@" IDENT | IDENT
A rule is written as `name ::= alt | alt | ...`, one per line. `""` denotes
the empty alternative (epsilon). `@IDENT` denotes a tag matcher; a bare
quoted string denotes an exact-match terminal; a bare identifier denotes a
nonterminal reference.
*/

static ESCAPES: Lazy<HashMap<char, char>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert('n', '\n');
    m.insert('t', '\t');
    m.insert('"', '"');
    m.insert('\\', '\\');
    m
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DslToken {
    Arrow,        // "::="
    Pipe,         // "|"
    At,           // "@"
    Ident(String),
    Str(String),
    Eol,
    Eof,
}

impl fmt::Display for DslToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DslLexError {
    pub line: usize,
    pub message: String,
}

impl fmt::Display for DslLexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[line {}] {}", self.line, self.message)
    }
}

impl std::error::Error for DslLexError {}

pub struct DslLexer {
    source: Vec<char>,
    start: usize,
    current: usize,
    line: usize,
    tokens: Vec<DslToken>,
}

impl DslLexer {
    pub fn new(source: &str) -> Self {
        DslLexer {
            source: source.chars().collect(),
            start: 0,
            current: 0,
            line: 1,
            tokens: Vec::new(),
        }
    }

    pub fn scan_tokens(mut self) -> Result<Vec<DslToken>, DslLexError> {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token()?;
        }
        self.tokens.push(DslToken::Eof);
        Ok(self.tokens)
    }

    fn scan_token(&mut self) -> Result<(), DslLexError> {
        let ch = self.advance();
        match ch {
            '|' => self.add(DslToken::Pipe),
            '@' => self.add(DslToken::At),
            ':' => {
                if self.match_char(':') && self.match_char('=') {
                    self.add(DslToken::Arrow);
                } else {
                    return Err(self.error("expected '::=' after ':'"));
                }
            }
            '#' => {
                while self.peek() != '\n' && !self.is_at_end() {
                    self.advance();
                }
            }
            '\n' => {
                self.add(DslToken::Eol);
                self.line += 1;
            }
            ' ' | '\r' | '\t' => {}
            '"' => self.string()?,
            c if Self::is_ident_start(c) => self.identifier(),
            c => return Err(self.error(&format!("unexpected character '{c}'"))),
        }
        Ok(())
    }

    fn string(&mut self) -> Result<(), DslLexError> {
        let mut value = String::new();
        while self.peek() != '"' && !self.is_at_end() {
            let c = self.advance();
            if c == '\n' {
                return Err(self.error("unterminated string literal"));
            }
            if c == '\\' {
                let escaped = self.advance();
                match ESCAPES.get(&escaped) {
                    Some(mapped) => value.push(*mapped),
                    None => return Err(self.error(&format!("unknown escape '\\{escaped}'"))),
                }
            } else {
                value.push(c);
            }
        }
        if self.is_at_end() {
            return Err(self.error("unterminated string literal"));
        }
        self.advance(); // closing quote
        self.add(DslToken::Str(value));
        Ok(())
    }

    fn identifier(&mut self) {
        while Self::is_ident_continue(self.peek()) {
            self.advance();
        }
        let text: String = self.source[self.start..self.current].iter().collect();
        self.add(DslToken::Ident(text));
    }

    fn is_ident_start(c: char) -> bool {
        c.is_ascii_alphabetic() || c == '_'
    }

    fn is_ident_continue(c: char) -> bool {
        c.is_ascii_alphanumeric() || c == '_'
    }

    fn advance(&mut self) -> char {
        let c = self.source[self.current];
        self.current += 1;
        c
    }

    fn peek(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.source[self.current]
        }
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.source[self.current] != expected {
            return false;
        }
        self.current += 1;
        true
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn add(&mut self, token: DslToken) {
        self.tokens.push(token);
    }

    fn error(&self, message: &str) -> DslLexError {
        DslLexError {
            line: self.line,
            message: message.to_string(),
        }
    }
}
