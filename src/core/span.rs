//! Byte Spans
//!
//! Half-open `[start, end)` byte ranges into a text. Spans produced while
//! analysing a region are relative to that region until rebased.

use serde::{Serialize, Serializer};

/// A half-open byte range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start after end");
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Move both ends by `offset`
    pub fn shifted(self, offset: usize) -> Self {
        Self {
            start: self.start + offset,
            end: self.end + offset,
        }
    }

    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }

    pub fn intersects(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Slice `text`, or `None` when the span is out of bounds or splits a
    /// UTF-8 sequence.
    pub fn slice<'a>(&self, text: &'a str) -> Option<&'a str> {
        text.get(self.start..self.end)
    }
}

impl Serialize for Span {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.start, self.end].serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_respects_char_boundaries() {
        let text = "Seção I";
        assert_eq!(Span::new(0, 6).slice(text), Some("Seção"));
        // 'ç' is two bytes wide; 3 falls inside it
        assert_eq!(Span::new(0, 3).slice(text), None);
        assert_eq!(Span::new(0, 99).slice(text), None);
    }

    #[test]
    fn test_shift_and_intersect() {
        let span = Span::new(2, 5).shifted(10);
        assert_eq!(span, Span::new(12, 15));
        assert!(span.intersects(&Span::new(14, 20)));
        assert!(!span.intersects(&Span::new(15, 20)));
        assert!(span.contains(12));
        assert!(!span.contains(15));
    }

    #[test]
    fn test_serializes_as_pair() {
        let json = serde_json::to_string(&Span::new(3, 7)).unwrap();
        assert_eq!(json, "[3,7]");
    }
}
