//! MVL Combinators
//!
//! Parsing primitives over an indexable character sequence with an explicit
//! cursor. Every parser is a function `(input, index) -> ParseResult<O>`:
//! on success it yields the value and the index after the consumed input,
//! on failure a [`Failure`] recording what was expected and where.
//!
//! The cursor is threaded through every call, so parsers hold no scan state
//! and can run on any number of inputs concurrently.
//!
//! # Example
//!
//! ```
//! use mvl_combinator::{character, many1, not, recognize, sequence, Parser};
//!
//! let input: Vec<char> = "(abc)".chars().collect();
//! let group = sequence((character('('), recognize(many1(not(&[")"]))), character(')')));
//! let ((_, body, _), end) = group.parse(&input, 0).unwrap();
//! assert_eq!(body, "abc");
//! assert_eq!(end, 5);
//! ```

pub mod combinators;
pub mod primitives;

pub use combinators::{
    alternates, and, many, many1, map, or, recognize, sequence, Alternates, Sequence,
};
pub use primitives::{any, character, eof, not, regex, string};

/// A failed parse: the expectation that could not be met and the index it
/// was checked at.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expected {expected} at index {index}")]
pub struct Failure {
    pub expected: String,
    pub index: usize,
}

impl Failure {
    pub fn new(expected: impl Into<String>, index: usize) -> Self {
        Self {
            expected: expected.into(),
            index,
        }
    }

    /// The more informative of two failures: the one that got further into
    /// the input. Ties go to `other`.
    pub fn furthest(self, other: Failure) -> Failure {
        if self.index > other.index {
            self
        } else {
            other
        }
    }
}

/// Outcome of running a parser: the value and the next index, or a failure.
pub type ParseResult<O> = Result<(O, usize), Failure>;

/// A parser producing values of type `O`.
///
/// Implemented for every `Fn(&[char], usize) -> ParseResult<O>`, so plain
/// functions and closures are parsers and recursive grammar rules can be
/// written as ordinary `fn` items.
pub trait Parser<O> {
    fn parse(&self, input: &[char], index: usize) -> ParseResult<O>;
}

impl<O, F> Parser<O> for F
where
    F: Fn(&[char], usize) -> ParseResult<O>,
{
    fn parse(&self, input: &[char], index: usize) -> ParseResult<O> {
        self(input, index)
    }
}
