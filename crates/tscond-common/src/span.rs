//! Byte-offset source spans.

use serde::Serialize;

/// A half-open byte range `[start, end)` in source text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }

    /// Create a span from a start offset and a length.
    #[inline]
    pub const fn at(start: u32, len: u32) -> Self {
        Span {
            start,
            end: start + len,
        }
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Returns `true` if `other` lies entirely inside this span.
    #[inline]
    pub const fn contains(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Smallest span covering both `self` and `other`.
    #[inline]
    pub fn cover(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Shift a span by `delta` bytes.
    #[inline]
    pub const fn offset(self, delta: u32) -> Span {
        Span {
            start: self.start + delta,
            end: self.end + delta,
        }
    }

    /// Translate an absolute span into coordinates relative to `origin`.
    ///
    /// Returns `None` when the span starts before `origin`.
    #[inline]
    pub fn relative_to(self, origin: u32) -> Option<Span> {
        if self.start < origin {
            return None;
        }
        Some(Span {
            start: self.start - origin,
            end: self.end - origin,
        })
    }

    /// Slice `text` by this span, if it is in bounds and on char boundaries.
    pub fn slice(self, text: &str) -> Option<&str> {
        text.get(self.start as usize..self.end as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cover_and_contains() {
        let a = Span::new(2, 5);
        let b = Span::new(4, 9);
        let c = a.cover(b);
        assert_eq!(c, Span::new(2, 9));
        assert!(c.contains(a));
        assert!(c.contains(b));
        assert!(!a.contains(b));
    }

    #[test]
    fn relative_to_rejects_spans_before_origin() {
        assert_eq!(Span::new(10, 14).relative_to(10), Some(Span::new(0, 4)));
        assert_eq!(Span::new(3, 14).relative_to(10), None);
    }

    #[test]
    fn slice_respects_bounds() {
        let text = "if (x) {}";
        assert_eq!(Span::new(4, 5).slice(text), Some("x"));
        assert_eq!(Span::new(4, 50).slice(text), None);
    }
}
