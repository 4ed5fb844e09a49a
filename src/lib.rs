//! An incremental Earley chart parser.
//!
//! Feed tokens one at a time; at every point the parser can report whether
//! the input so far is a prefix of some accepted string (`finished() ==
//! false, failed() == false`), whether it is already accepted (`finished()`),
//! or whether the next token made further progress impossible (`failed()`).
//!
//! The core is three pieces: a [`Matcher`] abstraction so terminals can be
//! more than raw symbol equality, a [`Grammar`]/[`Chart`] data model, and the
//! [`engine`] that implements the Prediction/Scanning/Completion closure one
//! token at a time. [`Parser`] (built with [`make_marley`]) ties these
//! together into the incremental façade described above.
//!
//! `demos` builds a small grammar-description-language front end on top of
//! this engine as a runnable example; it is not part of the parser's public
//! contract and is not re-exported here.

pub mod chart;
pub mod engine;
pub mod grammar;
pub mod matcher;
pub mod parser;

pub mod demos;

pub use chart::{Chart, EarleyItem, Tree};
pub use engine::ParseFailure;
pub use grammar::{Grammar, Production, Symbol};
pub use matcher::{exactly, tag, Matcher, Taggable, TokenLike};
pub use parser::{make_marley, Parser};