use std::fmt;

/*
A matcher is the only bridge between the engine and the token domain: the engine
never inspects a token directly, it only ever asks a matcher whether a token
satisfies a terminal. Two matchers built from equal arguments must compare equal,
or deduplication in the chart would never converge on recursive grammars.
*/

/// Tokens that can be matched by [`Matcher::Tag`] expose a short classification
/// string without giving up their own identity. A plain tagged value (a pair
/// whose first field is the tag) is the common case; a bare tag string matches
/// itself.
pub trait Taggable {
    fn tag_str(&self) -> Option<&str>;
}

impl Taggable for String {
    fn tag_str(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl<V> Taggable for (String, V) {
    fn tag_str(&self) -> Option<&str> {
        Some(self.0.as_str())
    }
}

/// Bound satisfied by any token type the engine can run over.
pub trait TokenLike:
    Clone + PartialEq + Eq + std::hash::Hash + fmt::Debug + Taggable
{
}

impl<T> TokenLike for T where
    T: Clone + PartialEq + Eq + std::hash::Hash + fmt::Debug + Taggable
{
}

/// A predicate over a token, with a human-readable label for diagnostics.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Matcher<T> {
    /// Matches iff the token equals `v` by value equality.
    Exactly(T),
    /// Matches iff the token's tag equals this string.
    Tag(String),
}

impl<T: TokenLike> Matcher<T> {
    pub fn matches(&self, token: &T) -> bool {
        match self {
            Matcher::Exactly(v) => token == v,
            Matcher::Tag(t) => token.tag_str() == Some(t.as_str()),
        }
    }

    /// Short label used when this matcher fails to match the incoming token,
    /// for assembling an "expected one of ..." diagnostic.
    pub fn error(&self) -> String {
        match self {
            Matcher::Exactly(v) => format!("exactly {:?}", v),
            Matcher::Tag(t) => format!("tag {}", t),
        }
    }
}

/// Matches iff `token == value`.
pub fn exactly<T>(value: T) -> Matcher<T> {
    Matcher::Exactly(value)
}

/// Matches iff `token` is tagged with `name` (see [`Taggable`]).
pub fn tag<T>(name: impl Into<String>) -> Matcher<T> {
    Matcher::Tag(name.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_matcher_compares_by_value() {
        let m: Matcher<String> = exactly("(".to_string());
        assert!(m.matches(&"(".to_string()));
        assert!(!m.matches(&")".to_string()));
    }

    #[test]
    fn tag_matcher_matches_plain_string() {
        let m: Matcher<String> = tag("NUMBER");
        assert!(m.matches(&"NUMBER".to_string()));
        assert!(!m.matches(&"WORD".to_string()));
    }

    #[test]
    fn tag_matcher_matches_pair_by_first_field() {
        let m: Matcher<(String, String)> = tag("NUMBER");
        let tok = ("NUMBER".to_string(), "42".to_string());
        assert!(m.matches(&tok));
        let other = ("WORD".to_string(), "42".to_string());
        assert!(!m.matches(&other));
    }

    #[test]
    fn matchers_built_from_equal_arguments_compare_equal() {
        let a: Matcher<String> = exactly("x".to_string());
        let b: Matcher<String> = exactly("x".to_string());
        assert_eq!(a, b);

        let c: Matcher<String> = tag("NUMBER");
        let d: Matcher<String> = tag("NUMBER");
        assert_eq!(c, d);
    }

    #[test]
    fn error_labels_are_human_readable() {
        let m: Matcher<String> = exactly("(".to_string());
        assert_eq!(m.error(), "exactly \"(\"");
        let t: Matcher<String> = tag("NUMBER");
        assert_eq!(t.error(), "tag NUMBER");
    }
}
