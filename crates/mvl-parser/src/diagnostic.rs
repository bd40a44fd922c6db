//! Source locations for parse errors.
//!
//! A `ParseError` only carries a character index. Build tools that show the
//! error to a person want a line, a column, and the offending line of source.

use crate::ParseError;

/// A 1-based line and column, plus the full text of that line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
    pub snippet: String,
}

impl ParseError {
    /// Resolve the error index against the source it came from.
    ///
    /// An index past the end of the source points just after the last
    /// character.
    pub fn locate(&self, source: &str) -> Location {
        let mut line = 1;
        let mut line_start = 0;

        for (i, c) in source.chars().enumerate().take(self.index) {
            if c == '\n' {
                line += 1;
                line_start = i + 1;
            }
        }

        let snippet: String = source
            .chars()
            .skip(line_start)
            .take_while(|&c| c != '\n')
            .collect();

        Location {
            line,
            column: self.index.saturating_sub(line_start) + 1,
            snippet,
        }
    }

    /// Render the error with its line of source and a caret under the column.
    pub fn render(&self, source: &str) -> String {
        let location = self.locate(source);

        // Keep tabs so the caret lines up with tab-indented source.
        let pad: String = location
            .snippet
            .chars()
            .take(location.column - 1)
            .map(|c| if c == '\t' { '\t' } else { ' ' })
            .collect();

        format!(
            "Parse error at line {}, column {}: expected {}\n{}\n{pad}^",
            location.line, location.column, self.expected, location.snippet
        )
    }
}
