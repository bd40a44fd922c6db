//! String literal escaping for view text.

use mvl_parser::ast::{Text, TextPiece};

/// Write text as the body of a double-quoted JavaScript string.
///
/// Escapes written in the source (`\{`, `\<`, `\"`, ...) are kept as they
/// are. A bare newline becomes `\n` followed by a line continuation, so the
/// generated code keeps the source's line structure.
pub fn string_body(text: &Text, out: &mut String) {
    for piece in &text.pieces {
        match *piece {
            TextPiece::Escaped(c) => {
                out.push('\\');
                out.push(c);
            }
            TextPiece::Char('"') => out.push_str("\\\""),
            TextPiece::Char('\n') => out.push_str("\\n\\\n"),
            TextPiece::Char('\r') => out.push_str("\\r"),
            TextPiece::Char(c) => out.push(c),
        }
    }
}
