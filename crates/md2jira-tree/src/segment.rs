//! Byte ranges into the original source.

use std::ops::Range;

/// Half-open byte range `[start, end)` into the source a tree was built from.
///
/// Segments never own text. Resolve them against the same source buffer
/// with [`Segment::value`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Segment {
    /// Offset of the first byte.
    pub start: usize,
    /// Offset one past the last byte.
    pub end: usize,
}

impl Segment {
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Empty segment positioned at `offset`.
    #[must_use]
    pub const fn empty(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve the segment against the source buffer.
    ///
    /// # Panics
    ///
    /// Panics if the segment lies outside `source`, which means the segment
    /// belongs to a different buffer.
    #[must_use]
    pub fn value<'s>(&self, source: &'s [u8]) -> &'s [u8] {
        &source[self.start..self.end]
    }
}

impl From<Range<usize>> for Segment {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}
