use std::fmt;

use crate::chart::{Chart, EarleyItem};
use crate::grammar::{Grammar, Symbol};
use crate::matcher::TokenLike;

/*
The engine is the pure(-ish) core: given the chart as it stood through the
prior token and the new token itself, compute the next state set by closure
under the three Earley inference rules. Ordering of the work queue does not
affect the result, only termination discipline does -- an item is pushed for
further processing only the first time `Chart::add` reports it as new.
*/

/// The two ways a `feed` can fail. Both are sticky: once recorded by the
/// parser façade, further tokens are ignored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseFailure {
    /// The prior state set was already empty when a token arrived.
    NoProgress,
    /// Closure produced an empty current state set; carries the rendered
    /// "Expected one of: ..." diagnostic.
    UnexpectedToken(String),
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseFailure::NoProgress => write!(f, "Parser cannot advance"),
            ParseFailure::UnexpectedToken(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ParseFailure {}

/// Seed state set 0 with every production of `start_rule`, then close under
/// Prediction only (no token has arrived yet, so Scanning cannot fire, and no
/// origin-0 item can yet be complete).
pub fn initial_chart<T: TokenLike>(grammar: &Grammar<T>, start_rule: &str) -> Chart<T> {
    let mut chart = Chart::new();
    let mut queue: Vec<EarleyItem<T>> = Vec::new();

    for production in grammar.rules_of(start_rule) {
        let item = EarleyItem::predicted(start_rule, production, 0);
        if chart.add(0, item.clone()) {
            queue.push(item);
        }
    }

    while let Some(item) = queue.pop() {
        if let Some(Symbol::Nonterminal(name)) = item.remaining.first() {
            for production in grammar.rules_of(name) {
                let predicted = EarleyItem::predicted(name, production, 0);
                if chart.add(0, predicted.clone()) {
                    queue.push(predicted);
                }
            }
        }
    }

    chart
}

/// Advance `chart` by exactly one token, landing it at `position`.
///
/// `position` must be one past the chart's current last position (i.e. the
/// caller has already decided the next token occupies this slot). Mutates
/// `chart` in place, which is permitted by the spec's "logically immutable,
/// observers see only monotone growth" contract; no state set already present
/// is ever altered, only new sets/items appended.
pub fn advance<T: TokenLike>(
    grammar: &Grammar<T>,
    chart: &mut Chart<T>,
    position: usize,
    token: &T,
) -> Result<(), ParseFailure> {
    let prior = position - 1;

    if chart.get_set(prior).is_empty() {
        return Err(ParseFailure::NoProgress);
    }

    let mut queue: Vec<(usize, EarleyItem<T>)> = chart
        .get_set(prior)
        .iter()
        .cloned()
        .map(|item| (prior, item))
        .collect();

    let mut expected: Vec<String> = Vec::new();

    while let Some((k, item)) = queue.pop() {
        log::trace!("closure step at set {k}: {:?}", item);
        match item.remaining.first() {
            None => {
                // Completion: propagate this finished subtree into every
                // item in state set `item.origin` that was waiting on it.
                for parent in chart.get_set(item.origin).to_vec() {
                    if let Some(Symbol::Nonterminal(name)) = parent.remaining.first() {
                        if *name == item.head {
                            let advanced = parent.completed_with(item.tree.clone());
                            if chart.add(k, advanced.clone()) {
                                queue.push((k, advanced));
                            }
                        }
                    }
                }
            }
            Some(Symbol::Nonterminal(name)) => {
                for production in grammar.rules_of(name) {
                    let predicted = EarleyItem::predicted(name, production, k);
                    if chart.add(k, predicted.clone()) {
                        queue.push((k, predicted));
                    }
                }
            }
            Some(Symbol::Terminal(matcher)) => {
                // Scanning items at k < prior cannot fire for this token;
                // they stay in the chart for a future Completion to consume.
                if k == prior {
                    if matcher.matches(token) {
                        let scanned = item.scanned(token.clone());
                        if chart.add(k + 1, scanned.clone()) {
                            queue.push((k + 1, scanned));
                        }
                    } else {
                        expected.push(matcher.error());
                    }
                }
            }
        }
    }

    if chart.get_set(position).is_empty() {
        expected.dedup();
        return Err(ParseFailure::UnexpectedToken(format!(
            "Expected one of: {}",
            expected.join(", ")
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{Production, Symbol};
    use crate::matcher::exactly;

    /// `parens -> "" | "(" parens ")"`
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

    #[test]
    fn initial_chart_closes_under_prediction() {
        let g = parens_grammar();
        let chart = initial_chart(&g, "parens");
        // both alternatives of `parens` predicted at origin 0, plus the
        // epsilon alternative is already complete.
        assert_eq!(chart.get_set(0).len(), 2);
        assert_eq!(chart.completed_heads_at(0).len(), 1);
    }

    #[test]
    fn advance_scans_a_matching_token() {
        let g = parens_grammar();
        let mut chart = initial_chart(&g, "parens");
        let result = advance(&g, &mut chart, 1, &"(".to_string());
        assert!(result.is_ok());
        assert_eq!(chart.len(), 2);
    }

    #[test]
    fn advance_reports_no_progress_on_empty_prior_set() {
        let g = parens_grammar();
        let mut chart = initial_chart(&g, "parens");
        // drive it to failure once, then feed again into the now-empty set.
        let _ = advance(&g, &mut chart, 1, &"x".to_string());
        let failed_position = chart.len();
        let result = advance(&g, &mut chart, failed_position + 1, &"(".to_string());
        assert_eq!(result, Err(ParseFailure::NoProgress));
    }

    #[test]
    fn monotone_chart_feed_only_grows_existing_state_sets() {
        let g = parens_grammar();
        let mut chart = initial_chart(&g, "parens");
        let before = chart.get_set(0).to_vec();

        advance(&g, &mut chart, 1, &"(".to_string()).unwrap();

        for item in &before {
            assert!(chart.contains(0, item), "feed must never drop an existing item");
        }
    }

    #[test]
    fn closure_is_a_fixed_point_after_a_successful_feed() {
        let g = parens_grammar();
        let mut chart = initial_chart(&g, "parens");
        advance(&g, &mut chart, 1, &"(".to_string()).unwrap();

        // Re-run Prediction and Completion over the just-closed state set 1;
        // neither rule should be able to derive anything `Chart::add` reports
        // as new -- that's what "closed" means.
        for item in chart.get_set(1).to_vec() {
            match item.remaining.first() {
                Some(Symbol::Nonterminal(name)) => {
                    for production in g.rules_of(name) {
                        let predicted = EarleyItem::predicted(name, production, 1);
                        assert!(
                            !chart.add(1, predicted),
                            "prediction found a new item after closure"
                        );
                    }
                }
                None => {
                    for parent in chart.get_set(item.origin).to_vec() {
                        if let Some(Symbol::Nonterminal(name)) = parent.remaining.first() {
                            if *name == item.head {
                                let advanced = parent.completed_with(item.tree.clone());
                                assert!(
                                    !chart.add(1, advanced),
                                    "completion found a new item after closure"
                                );
                            }
                        }
                    }
                }
                Some(Symbol::Terminal(_)) => {}
            }
        }
    }

    #[test]
    fn advance_reports_unexpected_token_with_expected_set() {
        let g = parens_grammar();
        let mut chart = initial_chart(&g, "parens");
        let result = advance(&g, &mut chart, 1, &"x".to_string());
        match result {
            Err(ParseFailure::UnexpectedToken(msg)) => {
                assert!(msg.starts_with("Expected one of: "));
                assert!(msg.contains("exactly \"(\""));
            }
            other => panic!("expected UnexpectedToken, got {other:?}"),
        }
    }
}
