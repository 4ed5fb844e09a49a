use std::hash::{Hash, Hasher};

use crate::grammar::{Production, Symbol};
use crate::matcher::TokenLike;

/*
A partial parse tree: a list beginning with the recognised nonterminal's name
followed by the children matched so far, each child either a scanned token or
a completed subtree. `Tree::Leaf` holds a token; `Tree::Node` holds a head name
and its children in match order.
*/
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Tree<T> {
    Leaf(T),
    Node(String, Vec<Tree<T>>),
}

impl<T: Clone> Tree<T> {
    fn empty(head: &str) -> Self {
        Tree::Node(head.to_string(), Vec::new())
    }

    fn with_child(&self, child: Tree<T>) -> Tree<T> {
        match self {
            Tree::Node(head, children) => {
                let mut children = children.clone();
                children.push(child);
                Tree::Node(head.clone(), children)
            }
            Tree::Leaf(_) => unreachable!("a leaf token tree never grows children"),
        }
    }

    fn with_token(&self, token: T) -> Tree<T> {
        self.with_child(Tree::Leaf(token))
    }
}

/// The suffix of a production still to be matched: a shared [`Production`]
/// plus a cursor ("the dot") into it. The production itself shares its body
/// via `Rc`, so advancing the dot never copies the symbols behind it.
#[derive(Clone, Debug)]
pub struct Remaining<T> {
    production: Production<T>,
    dot: usize,
}

impl<T> Remaining<T> {
    pub fn of(production: &Production<T>) -> Self {
        Remaining {
            production: production.clone(),
            dot: 0,
        }
    }

    fn symbols(&self) -> &[Symbol<T>] {
        &self.production.symbols()[self.dot..]
    }

    pub fn is_empty(&self) -> bool {
        self.dot >= self.production.len()
    }

    pub fn first(&self) -> Option<&Symbol<T>> {
        self.production.symbols().get(self.dot)
    }

    fn advanced(&self) -> Self {
        Remaining {
            production: self.production.clone(),
            dot: self.dot + 1,
        }
    }
}

impl<T: PartialEq> PartialEq for Remaining<T> {
    fn eq(&self, other: &Self) -> bool {
        self.symbols() == other.symbols()
    }
}
impl<T: Eq> Eq for Remaining<T> {}

impl<T: Hash> Hash for Remaining<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.symbols().hash(state);
    }
}

/// A 4-tuple `(head, remaining, origin, tree)`: the element of a state set.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct EarleyItem<T> {
    pub head: String,
    pub remaining: Remaining<T>,
    pub origin: usize,
    pub tree: Tree<T>,
}

impl<T: Clone> EarleyItem<T> {
    /// A freshly predicted item: dot at the start of `production`, originating
    /// at `origin`, with an empty tree for `head`.
    pub fn predicted(head: &str, production: &Production<T>, origin: usize) -> Self {
        EarleyItem {
            head: head.to_string(),
            remaining: Remaining::of(production),
            origin,
            tree: Tree::empty(head),
        }
    }

    /// The item obtained by advancing the dot past a scanned token.
    pub fn scanned(&self, token: T) -> Self {
        EarleyItem {
            head: self.head.clone(),
            remaining: self.remaining.advanced(),
            origin: self.origin,
            tree: self.tree.with_token(token),
        }
    }

    /// The item obtained by advancing the dot past a completed subtree.
    pub fn completed_with(&self, child: Tree<T>) -> Self {
        EarleyItem {
            head: self.head.clone(),
            remaining: self.remaining.advanced(),
            origin: self.origin,
            tree: self.tree.with_child(child),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.remaining.is_empty()
    }
}

/// An ordered sequence of state sets, indexed by input position.
///
/// State set `k` holds every item consistent with the first `k` tokens. The
/// chart grows append-only: once a state set exists it is never removed, and
/// `add` is idempotent so the same item is never stored twice (this is what
/// makes the engine terminate on left-recursive grammars).
#[derive(Clone, Debug)]
pub struct Chart<T> {
    sets: Vec<Vec<EarleyItem<T>>>,
}

impl<T: TokenLike> Chart<T> {
    /// A chart with a single, empty state set 0.
    pub fn new() -> Self {
        Chart { sets: vec![Vec::new()] }
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn contains(&self, k: usize, item: &EarleyItem<T>) -> bool {
        self.sets.get(k).map(|set| set.contains(item)).unwrap_or(false)
    }

    /// Insert `item` into state set `k`, extending the chart with a new,
    /// singleton state set if `k == len()`. Returns `true` if the item was
    /// new (and so should be queued for further closure), `false` if it was
    /// already present.
    pub fn add(&mut self, k: usize, item: EarleyItem<T>) -> bool {
        if k == self.sets.len() {
            self.sets.push(Vec::new());
        }
        let set = &mut self.sets[k];
        if set.contains(&item) {
            false
        } else {
            set.push(item);
            true
        }
    }

    pub fn get_set(&self, k: usize) -> &[EarleyItem<T>] {
        self.sets.get(k).map(|s| s.as_slice()).unwrap_or(&[])
    }

    /// Items in set `k` that are complete and originated at position 0 --
    /// the candidates for a top-level parse after `k` tokens.
    pub fn completed_heads_at(&self, k: usize) -> Vec<(&str, &Tree<T>)> {
        self.get_set(k)
            .iter()
            .filter(|item| item.is_complete() && item.origin == 0)
            .map(|item| (item.head.as_str(), &item.tree))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::exactly;

    fn production(symbols: Vec<Symbol<String>>) -> Production<String> {
        Production::new(symbols)
    }

    #[test]
    fn add_is_idempotent() {
        let mut chart: Chart<String> = Chart::new();
        let p = production(vec![Symbol::Terminal(exactly("x".to_string()))]);
        let item = EarleyItem::predicted("S", &p, 0);
        assert!(chart.add(0, item.clone()));
        assert!(!chart.add(0, item.clone()));
        assert_eq!(chart.get_set(0).len(), 1);
    }

    #[test]
    fn contains_reflects_membership_before_and_after_add() {
        let mut chart: Chart<String> = Chart::new();
        let p = production(vec![Symbol::Terminal(exactly("x".to_string()))]);
        let item = EarleyItem::predicted("S", &p, 0);
        assert!(!chart.contains(0, &item));
        chart.add(0, item.clone());
        assert!(chart.contains(0, &item));
        assert!(!chart.contains(1, &item));
    }

    #[test]
    fn add_extends_chart_by_one_set() {
        let mut chart: Chart<String> = Chart::new();
        assert_eq!(chart.len(), 1);
        let p = production(vec![]);
        let item = EarleyItem::predicted("S", &p, 0);
        chart.add(1, item);
        assert_eq!(chart.len(), 2);
    }

    #[test]
    fn get_set_out_of_range_is_empty() {
        let chart: Chart<String> = Chart::new();
        assert!(chart.get_set(5).is_empty());
    }

    #[test]
    fn completed_heads_only_reports_complete_zero_origin_items() {
        let mut chart: Chart<String> = Chart::new();
        let p = production(vec![]);
        let complete = EarleyItem::predicted("S", &p, 0);
        assert!(complete.is_complete());
        chart.add(0, complete);

        let p2 = production(vec![Symbol::Terminal(exactly("x".to_string()))]);
        let incomplete = EarleyItem::predicted("T", &p2, 0);
        chart.add(0, incomplete);

        let heads = chart.completed_heads_at(0);
        assert_eq!(heads.len(), 1);
        assert_eq!(heads[0].0, "S");
    }
}
