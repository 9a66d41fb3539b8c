//! Core types for source mapping

use serde::{Deserialize, Serialize};

/// A location in source text (0-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    /// Byte offset from start of source
    pub offset: usize,
    /// Row number (0-indexed)
    pub row: usize,
    /// Column number (0-indexed, in UTF-16 code units)
    pub column: usize,
}

/// A half-open byte range `start..end` in source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Span {
    /// Start offset (inclusive)
    pub start: usize,
    /// End offset (exclusive)
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Create a span of `len` bytes starting at `start`.
    pub fn at(start: usize, len: usize) -> Self {
        Self {
            start,
            end: start + len,
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Whether `other` lies entirely within this span (bounds inclusive).
    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Translate a span that is relative to `base` into absolute offsets.
    pub fn offset_by(&self, base: usize) -> Span {
        Span {
            start: self.start + base,
            end: self.end + base,
        }
    }

    /// The text covered by this span, if it is in bounds.
    pub fn slice<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.start..self.end)
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(range: std::ops::Range<usize>) -> Self {
        Span::new(range.start, range.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_ordering() {
        let loc1 = Location {
            offset: 0,
            row: 0,
            column: 0,
        };
        let loc2 = Location {
            offset: 5,
            row: 0,
            column: 5,
        };
        let loc3 = Location {
            offset: 10,
            row: 1,
            column: 0,
        };

        assert!(loc1 < loc2);
        assert!(loc2 < loc3);
        assert!(loc1 < loc3);
    }

    #[test]
    fn test_span_contains_is_inclusive() {
        let block = Span::new(10, 40);

        assert!(block.contains(&Span::new(10, 40)));
        assert!(block.contains(&Span::new(20, 25)));
        assert!(!block.contains(&Span::new(5, 12)));
        assert!(!block.contains(&Span::new(38, 41)));
    }

    #[test]
    fn test_span_offset_and_slice() {
        let source = "---HTML---\n<p>{{name}}</p>";
        let relative = Span::at(5, 4);
        let absolute = relative.offset_by(11);

        assert_eq!(absolute, Span::new(16, 20));
        assert_eq!(absolute.slice(source), Some("name"));
        assert_eq!(Span::new(20, 99).slice(source), None);
    }

    #[test]
    fn test_span_serialization() {
        let json = serde_json::to_string(&Span::new(3, 7)).unwrap();
        assert_eq!(json, r#"{"start":3,"end":7}"#);
    }
}
