//! Line/column positions.
//!
//! Statements arrive with the line and column of their first character.
//! Diagnostics inside a statement are placed by counting newlines in the
//! statement text up to the diagnostic's offset.

use serde::Serialize;

/// A 1-based line and 1-based column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    #[inline]
    pub const fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }

    /// Position of byte `offset` inside `text`, where `text` itself starts at `self`.
    ///
    /// Offsets past the end of `text` are clamped; columns count chars, not bytes.
    pub fn advance(self, text: &str, offset: u32) -> Position {
        let mut end = (offset as usize).min(text.len());
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        let prefix = &text[..end];

        match prefix.rfind('\n') {
            Some(last_newline) => {
                let lines = prefix.matches('\n').count() as u32;
                let column = prefix[last_newline + 1..].chars().count() as u32 + 1;
                Position {
                    line: self.line + lines,
                    column,
                }
            }
            None => Position {
                line: self.line,
                column: self.column + prefix.chars().count() as u32,
            },
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position { line: 1, column: 1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_on_same_line() {
        let start = Position::new(3, 5);
        assert_eq!(start.advance("if (x) {}", 4), Position::new(3, 9));
    }

    #[test]
    fn advance_across_lines() {
        let start = Position::new(3, 5);
        let text = "if (a &&\n    b) {}";
        assert_eq!(start.advance(text, 13), Position::new(4, 5));
    }

    #[test]
    fn advance_clamps_past_end() {
        let start = Position::default();
        assert_eq!(start.advance("ab", 40), Position::new(1, 3));
    }
}
