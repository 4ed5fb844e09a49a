use std::fmt;

use crate::demos::dsl_lexer::DslToken;
use crate::demos::DemoToken;
use crate::grammar::{Grammar, Production, Symbol};
use crate::matcher::{exactly, tag};

/*
Converts the DSL's token stream into a small parse tree (`DslRule`/`AltSpec`/
`SymbolSpec`), then reduces that tree into the engine's native `Grammar`
representation. This is the spec's "toy grammar DSL reducer": an example
client of the core, not part of it.

Each grammar symbol is tagged with one of exactly two kinds -- terminal or
nonterminal -- by construction; the reduction step below matches over that
closed, two-variant enum, so there is no analogue of the reference
implementation's dead `"arrow"` branch to avoid replicating: the match is
total by the type system, and any shape the lexer cannot produce simply
cannot reach this code.
*/

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolKind {
    Terminal,
    Nonterminal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolSpec {
    pub kind: SymbolKind,
    /// A literal's matched text (terminal, no `@`), a tag name (terminal,
    /// `@name`), or a nonterminal's rule name.
    pub payload: String,
    pub is_tag: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AltSpec {
    pub symbols: Vec<SymbolSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DslRule {
    pub name: String,
    pub alternatives: Vec<AltSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DslError {
    UnexpectedToken { found: DslToken, expected: String },
    UnexpectedEof { expected: String },
    EmptyGrammar,
    Lex(String),
}

impl fmt::Display for DslError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DslError::UnexpectedToken { found, expected } => {
                write!(f, "expected {expected}, found {found}")
            }
            DslError::UnexpectedEof { expected } => {
                write!(f, "expected {expected}, found end of input")
            }
            DslError::EmptyGrammar => write!(f, "grammar description defines no rules"),
            DslError::Lex(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for DslError {}

/// A tiny recursive-descent reader over the DSL's token stream, producing the
/// parse tree the reducer below walks.
struct DslReader {
    tokens: Vec<DslToken>,
    pos: usize,
}

impl DslReader {
    fn new(tokens: Vec<DslToken>) -> Self {
        DslReader { tokens, pos: 0 }
    }

    fn peek(&self) -> &DslToken {
        self.tokens.get(self.pos).unwrap_or(&DslToken::Eof)
    }

    fn advance(&mut self) -> DslToken {
        let t = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        t
    }

    fn skip_blank_lines(&mut self) {
        while matches!(self.peek(), DslToken::Eol) {
            self.advance();
        }
    }

    fn expect_ident(&mut self) -> Result<String, DslError> {
        match self.advance() {
            DslToken::Ident(name) => Ok(name),
            DslToken::Eof => Err(DslError::UnexpectedEof {
                expected: "an identifier".to_string(),
            }),
            other => Err(DslError::UnexpectedToken {
                found: other,
                expected: "an identifier".to_string(),
            }),
        }
    }

    fn expect(&mut self, wanted: DslToken, label: &str) -> Result<(), DslError> {
        let found = self.advance();
        if found == wanted {
            Ok(())
        } else if found == DslToken::Eof {
            Err(DslError::UnexpectedEof {
                expected: label.to_string(),
            })
        } else {
            Err(DslError::UnexpectedToken {
                found,
                expected: label.to_string(),
            })
        }
    }

    fn parse_rules(&mut self) -> Result<Vec<DslRule>, DslError> {
        let mut rules = Vec::new();
        self.skip_blank_lines();
        while *self.peek() != DslToken::Eof {
            rules.push(self.parse_rule()?);
            self.skip_blank_lines();
        }
        Ok(rules)
    }

    fn parse_rule(&mut self) -> Result<DslRule, DslError> {
        let name = self.expect_ident()?;
        self.expect(DslToken::Arrow, "'::='")?;
        let mut alternatives = vec![self.parse_alt()?];
        while *self.peek() == DslToken::Pipe {
            self.advance();
            alternatives.push(self.parse_alt()?);
        }
        match self.peek() {
            DslToken::Eol | DslToken::Eof => {}
            other => {
                return Err(DslError::UnexpectedToken {
                    found: other.clone(),
                    expected: "end of line".to_string(),
                })
            }
        }
        Ok(DslRule { name, alternatives })
    }

    fn parse_alt(&mut self) -> Result<AltSpec, DslError> {
        let mut symbols = Vec::new();
        loop {
            match self.peek().clone() {
                DslToken::Str(text) => {
                    self.advance();
                    if text.is_empty() {
                        // epsilon: contributes no symbol to this alternative.
                        continue;
                    }
                    symbols.push(SymbolSpec {
                        kind: SymbolKind::Terminal,
                        payload: text,
                        is_tag: false,
                    });
                }
                DslToken::At => {
                    self.advance();
                    let name = self.expect_ident()?;
                    symbols.push(SymbolSpec {
                        kind: SymbolKind::Terminal,
                        payload: name,
                        is_tag: true,
                    });
                }
                DslToken::Ident(name) => {
                    self.advance();
                    symbols.push(SymbolSpec {
                        kind: SymbolKind::Nonterminal,
                        payload: name,
                        is_tag: false,
                    });
                }
                _ => break,
            }
        }
        Ok(AltSpec { symbols })
    }
}

/// Parse a grammar-description-language token stream into its DSL parse
/// tree: one `DslRule` per `name ::= alt | alt | ...` line.
pub fn parse_dsl(tokens: Vec<DslToken>) -> Result<Vec<DslRule>, DslError> {
    DslReader::new(tokens).parse_rules()
}

/// Reduce a DSL parse tree into the engine's native `Grammar`. The name of
/// the first rule defined becomes the grammar's start rule, by convention.
pub fn reduce(rules: Vec<DslRule>) -> Result<(Grammar<DemoToken>, String), DslError> {
    let start_rule = rules.first().map(|r| r.name.clone()).ok_or(DslError::EmptyGrammar)?;

    let mut grammar: Grammar<DemoToken> = Grammar::new();
    for rule in rules {
        for alt in rule.alternatives {
            let symbols: Vec<Symbol<DemoToken>> =
                alt.symbols.into_iter().map(reduce_symbol).collect();
            grammar.add_rule(rule.name.clone(), Production::new(symbols));
        }
    }
    Ok((grammar, start_rule))
}

fn reduce_symbol(spec: SymbolSpec) -> Symbol<DemoToken> {
    match spec.kind {
        SymbolKind::Nonterminal => Symbol::Nonterminal(spec.payload),
        SymbolKind::Terminal if spec.is_tag => Symbol::Terminal(tag(spec.payload)),
        SymbolKind::Terminal => {
            Symbol::Terminal(exactly(("LIT".to_string(), spec.payload)))
        }
    }
}

/// Parse and reduce a grammar-description-language source string in one step.
pub fn load_grammar(source: &str) -> Result<(Grammar<DemoToken>, String), DslError> {
    let tokens = crate::demos::dsl_lexer::DslLexer::new(source)
        .scan_tokens()
        .map_err(|e| DslError::Lex(e.to_string()))?;
    let rules = parse_dsl(tokens)?;
    reduce(rules)
}
