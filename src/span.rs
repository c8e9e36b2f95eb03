//! Half-open spans in address space and in draw space.

use omics::coordinate::position::Number;

/// A half-open range `[start, end)` within the linear address space of a
/// [`CoordinateSpace`](crate::space::CoordinateSpace).
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct AddressSpan {
    /// The first address within the span.
    pub start: Number,

    /// The first address past the end of the span.
    pub end: Number,
}

impl AddressSpan {
    /// Creates a new [`AddressSpan`].
    pub fn new(start: Number, end: Number) -> Self {
        Self { start, end }
    }

    /// Gets the number of addresses within the span.
    pub fn len(&self) -> Number {
        self.end.saturating_sub(self.start)
    }

    /// Returns whether the span contains no addresses.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Returns whether `address` falls within the span.
    pub fn contains(&self, address: Number) -> bool {
        self.start <= address && address < self.end
    }

    /// Gets the span shared by `self` and `other`, if it is non-empty.
    pub fn intersect(&self, other: &AddressSpan) -> Option<AddressSpan> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start < end).then_some(AddressSpan { start, end })
    }
}

impl std::fmt::Display for AddressSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// A half-open range `[start, end)` of horizontal draw space, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelSpan {
    /// The left edge.
    pub start: f64,

    /// The right edge.
    pub end: f64,
}

impl PixelSpan {
    /// Creates a new [`PixelSpan`].
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Gets the width of the span.
    pub fn len(&self) -> f64 {
        self.end - self.start
    }

    /// Returns whether the span has no positive width.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Gets the horizontal midpoint of the span.
    pub fn center(&self) -> f64 {
        0.5 * (self.start + self.end)
    }

    /// Gets the span shared by `self` and `other`, if it has positive width.
    ///
    /// # Examples
    ///
    /// ```
    /// use tracklayout::span::PixelSpan;
    ///
    /// let a = PixelSpan::new(0.0, 10.0);
    /// assert_eq!(
    ///     a.intersect(&PixelSpan::new(5.0, 20.0)),
    ///     Some(PixelSpan::new(5.0, 10.0))
    /// );
    ///
    /// // Abutting spans share nothing.
    /// assert_eq!(a.intersect(&PixelSpan::new(10.0, 20.0)), None);
    /// ```
    pub fn intersect(&self, other: &PixelSpan) -> Option<PixelSpan> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start < end).then_some(PixelSpan { start, end })
    }

    /// Returns whether `self` and `other` share any positive width.
    pub fn overlaps(&self, other: &PixelSpan) -> bool {
        self.intersect(other).is_some()
    }
}

impl std::fmt::Display for PixelSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:.2}, {:.2})", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_span_intersection() {
        let a = AddressSpan::new(10, 20);
        assert_eq!(
            a.intersect(&AddressSpan::new(15, 30)),
            Some(AddressSpan::new(15, 20))
        );
        assert_eq!(a.intersect(&AddressSpan::new(20, 30)), None);
        assert!(a.contains(10));
        assert!(!a.contains(20));
        assert_eq!(a.len(), 10);
    }

    #[test]
    fn test_pixel_span_overlap_is_strict() {
        let a = PixelSpan::new(0.0, 10.0);
        assert!(a.overlaps(&PixelSpan::new(9.5, 12.0)));
        assert!(!a.overlaps(&PixelSpan::new(10.0, 12.0)));
        assert!(!a.overlaps(&PixelSpan::new(-5.0, 0.0)));
        assert_eq!(a.center(), 5.0);
    }
}
