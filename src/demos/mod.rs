//! A runnable example client of the engine: a tiny grammar-description
//! language, its lexer and reducer, and a CLI that drives an incremental
//! parse from the grammar it describes.
//!
//! None of this is part of the library's public contract -- `lib.rs`
//! deliberately does not re-export it at the crate root -- it exists so the
//! core in [`crate::engine`] has something concrete to exercise end to end.

pub mod cli;
pub mod dsl_lexer;
pub mod dsl_reducer;

/// The token type the demonstration grammars run over: a `(kind, text)`
/// pair. Exact-match terminals compare the whole pair; tag terminals (`@tag`
/// in the DSL) compare only `kind`, via [`crate::matcher::Taggable`].
pub type DemoToken = (String, String);

/// Tokenize a line of demonstration input into whitespace-separated words,
/// each carrying the literal kind `"LIT"` so it lines up with how the DSL
/// reducer encodes quoted-string terminals.
pub fn tokenize_input(line: &str) -> Vec<DemoToken> {
    line.split_whitespace()
        .map(|word| ("LIT".to_string(), word.to_string()))
        .collect()
}
