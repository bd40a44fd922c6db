//! Parser entry point.
//!
//! Runs the `main` rule over the whole source and requires it to end exactly
//! at end of input. There is no recovery: a failure anywhere rejects the
//! source.

use crate::ast::Expression;
use crate::{grammar, ParseError};
use tracing::debug;

/// Parse source text into an expression tree.
pub fn parse(source: &str) -> Result<Expression, ParseError> {
    let input: Vec<char> = source.chars().collect();
    debug!(chars = input.len(), "parsing source");

    match grammar::main(&input, 0) {
        Ok((expression, _)) => {
            debug!(segments = expression.segments.len(), "parsed source");
            Ok(expression)
        }
        Err(failure) => {
            debug!(expected = %failure.expected, index = failure.index, "parse failed");
            Err(failure.into())
        }
    }
}
