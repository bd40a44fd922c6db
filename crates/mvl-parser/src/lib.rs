//! MVL Parser
//!
//! Parses host source text with embedded Moon View Language nodes into a
//! lossless parse tree. Everything that is not view syntax is kept as
//! passthrough segments, so the tree can be written back byte for byte.
//!
//! ```text
//! source → parse() → Expression { segments }
//! ```
//!
//! # Example
//!
//! ```
//! use mvl_parser::{parse, Segment};
//!
//! let tree = parse("const view = <div></div>;").unwrap();
//! assert!(matches!(tree.segments[2], Segment::NodeDataChildren(_)));
//! assert_eq!(tree.to_source(), "const view = <div></div>;");
//! ```

pub mod ast;
pub mod diagnostic;
pub mod grammar;
pub mod parser;

pub use ast::{Child, Expression, Segment, Value, View};
pub use diagnostic::Location;
pub use parser::parse;

/// Parser error: the furthest expectation that could not be met.
///
/// `index` counts characters (not bytes) from the start of the source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Parse error at index {index}: expected {expected}")]
pub struct ParseError {
    pub expected: String,
    pub index: usize,
}

impl From<mvl_combinator::Failure> for ParseError {
    fn from(failure: mvl_combinator::Failure) -> Self {
        Self {
            expected: failure.expected,
            index: failure.index,
        }
    }
}
