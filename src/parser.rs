use crate::chart::{Chart, Tree};
use crate::engine::{self, ParseFailure};
use crate::grammar::Grammar;
use crate::matcher::TokenLike;

/*
The façade is the only stateful piece of the core: it owns the chart and the
current position, and turns the engine's pure `advance` into an incremental,
single-threaded API. Failures are sticky -- once recorded, `feed` becomes a
no-op and `position` is never rolled back.
*/

/// An incremental Earley parser over tokens of type `T`.
///
/// Not safe to `feed` from multiple threads concurrently. Readers of a
/// quiescent parser (`finished`, `results`, `failed`, `get_failure`) may run
/// concurrently with each other, but never with an in-flight `feed`.
pub struct Parser<T: TokenLike> {
    grammar: Grammar<T>,
    start_rule: String,
    chart: Chart<T>,
    position: usize,
    failure: Option<ParseFailure>,
}

impl<T: TokenLike> Parser<T> {
    pub fn new(grammar: Grammar<T>, start_rule: impl Into<String>) -> Self {
        let start_rule = start_rule.into();
        let chart = engine::initial_chart(&grammar, &start_rule);
        Parser {
            grammar,
            start_rule,
            chart,
            position: 0,
            failure: None,
        }
    }

    /// Feed one token. A no-op once the parser has failed.
    pub fn feed(&mut self, token: T) {
        if self.failure.is_some() {
            return;
        }

        let next_position = self.position + 1;
        match engine::advance(&self.grammar, &mut self.chart, next_position, &token) {
            Ok(()) => {
                self.position = next_position;
                log::debug!(
                    "fed token at position {next_position}, state set has {} items",
                    self.chart.get_set(next_position).len()
                );
            }
            Err(reason) => {
                self.position = next_position;
                log::debug!("parse failed at position {next_position}: {reason}");
                self.failure = Some(reason);
            }
        }
    }

    /// Feed tokens in order; stops having further effect once failed, but
    /// still iterates harmlessly over the remainder.
    pub fn feed_many(&mut self, tokens: impl IntoIterator<Item = T>) {
        for token in tokens {
            self.feed(token);
        }
    }

    pub fn failed(&self) -> bool {
        self.failure.is_some()
    }

    pub fn get_failure(&self) -> Option<String> {
        self.failure.as_ref().map(|f| f.to_string())
    }

    /// True iff a complete item for the start rule, originated at 0, exists
    /// in the current state set.
    pub fn finished(&self) -> bool {
        self.chart
            .completed_heads_at(self.position)
            .iter()
            .any(|(head, _)| *head == self.start_rule)
    }

    /// Every tree from a completed start-rule item in the current state set.
    /// Multiple entries indicate an ambiguous parse.
    pub fn results(&self) -> Vec<Tree<T>> {
        self.chart
            .completed_heads_at(self.position)
            .into_iter()
            .filter(|(head, _)| *head == self.start_rule)
            .map(|(_, tree)| tree.clone())
            .collect()
    }

    pub fn position(&self) -> usize {
        self.position
    }
}

/// Construct a parser for `grammar`, starting recognition at `start_rule`.
pub fn make_marley<T: TokenLike>(grammar: Grammar<T>, start_rule: impl Into<String>) -> Parser<T> {
    Parser::new(grammar, start_rule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{Production, Symbol};
    use crate::matcher::exactly;

    fn parens_grammar() -> Grammar<String> {
        let mut g: Grammar<String> = Grammar::new();
        g.add_rule("parens", Production::new(vec![]));
        g.add_rule(
            "parens",
            Production::new(vec![
                Symbol::Terminal(exactly("(".to_string())),
                Symbol::Nonterminal("parens".to_string()),
                Symbol::Terminal(exactly(")".to_string())),
            ]),
        );
        g
    }

    fn toks(s: &str) -> Vec<String> {
        s.chars().map(|c| c.to_string()).collect()
    }

    #[test]
    fn empty_input_on_nullable_start_rule_is_finished_before_any_feed() {
        let parser = make_marley(parens_grammar(), "parens");
        assert!(parser.finished());
        assert!(!parser.failed());
    }

    #[test]
    fn balanced_parens_accept() {
        let mut parser = make_marley(parens_grammar(), "parens");
        parser.feed_many(toks("((()))"));
        assert!(parser.finished());
        assert!(!parser.failed());
    }

    #[test]
    fn unbalanced_open_parens_is_a_prefix_not_finished_not_failed() {
        let mut parser = make_marley(parens_grammar(), "parens");
        parser.feed_many(toks("(()"));
        assert!(!parser.finished());
        assert!(!parser.failed());
    }

    #[test]
    fn unknown_token_fails_immediately() {
        let mut parser = make_marley(parens_grammar(), "parens");
        parser.feed("a".to_string());
        assert!(parser.failed());
        assert!(!parser.finished());
    }

    #[test]
    fn extra_closing_paren_fails_on_the_offending_token() {
        let mut parser = make_marley(parens_grammar(), "parens");
        parser.feed_many(toks("())"));
        assert!(parser.failed());
        assert_eq!(parser.position(), 3);
    }

    #[test]
    fn feed_many_stops_effecting_change_once_failed() {
        let mut parser = make_marley(parens_grammar(), "parens");
        parser.feed_many(toks("a((("));
        assert!(parser.failed());
        let msg = parser.get_failure().unwrap();
        // further tokens in the same feed_many call must not overwrite it
        assert!(msg.contains("Expected one of"));
    }

    #[test]
    fn feed_many_is_deterministic() {
        let mut a = make_marley(parens_grammar(), "parens");
        let mut b = make_marley(parens_grammar(), "parens");
        a.feed_many(toks("(())"));
        b.feed_many(toks("(())"));
        assert_eq!(a.failed(), b.failed());
        assert_eq!(a.finished(), b.finished());
        assert_eq!(a.results(), b.results());
    }

    #[test]
    fn prefix_monotonicity_failed_prefix_stays_failed_on_extension() {
        let mut parser = make_marley(parens_grammar(), "parens");
        parser.feed("a".to_string());
        assert!(parser.failed());
        parser.feed_many(toks("((("));
        assert!(parser.failed());
    }

    #[test]
    fn results_are_well_formed() {
        let mut parser = make_marley(parens_grammar(), "parens");
        parser.feed_many(toks("()"));
        for tree in parser.results() {
            match tree {
                Tree::Node(head, _) => assert_eq!(head, "parens"),
                Tree::Leaf(_) => panic!("a top-level result must be a Node"),
            }
        }
    }
}
