/// A byte range `[start, end)` in the primary source file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end, "inverted span {}..{}", start, end);
        Self { start, end }
    }

    /// A zero-length span, used for pure insertions.
    pub fn empty(at: u32) -> Self {
        Self { start: at, end: at }
    }

    pub fn len(self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// True if both spans cover at least one common byte.
    ///
    /// A zero-length span overlaps another only when it sits strictly inside
    /// it; insertions at either boundary of a range are compatible with it.
    pub fn overlaps(self, other: Span) -> bool {
        match (self.is_empty(), other.is_empty()) {
            (true, true) => false,
            (true, false) => other.start < self.start && self.start < other.end,
            (false, true) => self.start < other.start && other.start < self.end,
            (false, false) => self.start < other.end && other.start < self.end,
        }
    }

    pub fn range(self) -> std::ops::Range<usize> {
        self.start as usize..self.end as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_of_ranges() {
        assert!(Span::new(0, 5).overlaps(Span::new(4, 8)));
        assert!(!Span::new(0, 5).overlaps(Span::new(5, 8)));
        assert!(Span::new(2, 3).overlaps(Span::new(0, 10)));
    }

    #[test]
    fn test_insertion_only_conflicts_strictly_inside() {
        assert!(!Span::empty(0).overlaps(Span::new(0, 4)));
        assert!(!Span::empty(4).overlaps(Span::new(0, 4)));
        assert!(Span::empty(2).overlaps(Span::new(0, 4)));
        assert!(!Span::empty(2).overlaps(Span::empty(2)));
    }
}
