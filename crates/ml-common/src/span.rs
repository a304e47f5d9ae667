use serde::Serialize;

/// A coordinate into source text: 1-based line and column plus the 0-based
/// byte offset.
///
/// Columns count bytes, not characters, so a multi-byte code point advances
/// the column by its UTF-8 length. Positions are immutable once constructed;
/// the lexer builds new ones as its cursor moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
    pub index: u32,
}

impl Position {
    /// Create a position from explicit coordinates.
    pub fn new(line: u32, column: u32, index: u32) -> Self {
        Self { line, column, index }
    }

    /// The position of the first byte of a source string.
    pub fn origin() -> Self {
        Self { line: 1, column: 1, index: 0 }
    }
}

/// A half-open region of source text. Start is inclusive, end is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    /// Create a new span from two positions.
    pub fn new(start: Position, end: Position) -> Self {
        debug_assert!(
            start.index <= end.index,
            "span start ({}) must be <= end ({})",
            start.index,
            end.index
        );
        Self { start, end }
    }

    /// A zero-length span at a single position.
    pub fn at(pos: Position) -> Self {
        Self { start: pos, end: pos }
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> u32 {
        self.end.index - self.start.index
    }

    /// Whether the span is empty (zero-length).
    pub fn is_empty(&self) -> bool {
        self.start.index == self.end.index
    }

    /// Merge two spans into one that covers both.
    pub fn merge(self, other: Span) -> Span {
        let start = if self.start.index <= other.start.index {
            self.start
        } else {
            other.start
        };
        let end = if self.end.index >= other.end.index {
            self.end
        } else {
            other.end
        };
        Span { start, end }
    }

    /// Whether `other` lies entirely within this span.
    pub fn contains(&self, other: Span) -> bool {
        self.start.index <= other.start.index && other.end.index <= self.end.index
    }
}
