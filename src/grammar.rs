use std::collections::HashMap;
use std::rc::Rc;

use crate::matcher::{Matcher, TokenLike};

/*
A symbol is either a terminal (recognised by a matcher) or a nonterminal
(recognised by looking up its name's productions in the grammar). A production
is an ordered, possibly empty sequence of symbols. Productions are shared as
`Rc<Vec<Symbol<T>>>` so that many Earley items can point at the same body
without cloning it; see `crate::chart::Remaining` for how an item's "dot"
position into a shared production is represented.
*/

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Symbol<T> {
    Terminal(Matcher<T>),
    Nonterminal(String),
}

/// An ordered, possibly empty sequence of symbols, shared cheaply across items.
#[derive(Clone, Debug)]
pub struct Production<T>(Rc<Vec<Symbol<T>>>);

impl<T> Production<T> {
    pub fn new(symbols: Vec<Symbol<T>>) -> Self {
        Production(Rc::new(symbols))
    }

    pub fn symbols(&self) -> &[Symbol<T>] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// An immutable mapping from nonterminal name to its alternative productions.
///
/// The grammar is fixed for the lifetime of a parser; `rules_of` is the only
/// lookup the engine performs against it. Asking for a name the grammar does
/// not define is a programmer error (a malformed grammar), not a parse
/// failure, and panics — see `rules_of`.
#[derive(Clone, Debug)]
pub struct Grammar<T> {
    rules: HashMap<String, Vec<Production<T>>>,
}

impl<T: TokenLike> Grammar<T> {
    pub fn new() -> Self {
        Grammar {
            rules: HashMap::new(),
        }
    }

    /// Add one alternative production for `name`. Calling this repeatedly
    /// with the same name accumulates alternatives in call order; the engine
    /// does not depend on that order for correctness.
    pub fn add_rule(&mut self, name: impl Into<String>, production: Production<T>) -> &mut Self {
        self.rules
            .entry(name.into())
            .or_insert_with(Vec::new)
            .push(production);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// All alternative productions for `name`.
    ///
    /// # Panics
    ///
    /// Panics if `name` is not a key of this grammar. The engine only ever
    /// calls this with names drawn from `Symbol::Nonterminal` occurrences
    /// inside the grammar itself, so a missing name means the grammar is
    /// malformed -- a programming error, not a runtime parse failure.
    pub fn rules_of(&self, name: &str) -> &[Production<T>] {
        match self.rules.get(name) {
            Some(productions) => productions,
            None => {
                log::warn!("predicted nonterminal '{name}' has no productions in this grammar");
                panic!("malformed grammar: undefined nonterminal '{name}'");
            }
        }
    }
}

impl<T: TokenLike> From<HashMap<String, Vec<Production<T>>>> for Grammar<T> {
    fn from(rules: HashMap<String, Vec<Production<T>>>) -> Self {
        Grammar { rules }
    }
}
