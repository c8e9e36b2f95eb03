//! Greedy one-dimensional collision resolution.

use crate::span::PixelSpan;

/// Places spans one at a time so that no two accepted spans overlap.
///
/// The allocator tracks an envelope `[left_extent, right_extent]` around
/// everything accepted so far. A proposal that overlaps an accepted span is
/// moved, keeping its width, to just outside whichever side of the envelope
/// displaces it the least (ties go left). The envelope is grown by the margin
/// around every accepted span.
///
/// Accepted spans are also kept ordered by position. Because they never
/// overlap, their ends are ordered too, so a collision check only needs to
/// look at the last accepted span starting before the proposal ends.
///
/// A fresh allocator is used for every placement pass.
#[derive(Clone, Debug)]
pub struct Allocator {
    /// The space kept free around each accepted span.
    margin: f64,

    /// The left edge of the envelope.
    left_extent: f64,

    /// The right edge of the envelope.
    right_extent: f64,

    /// The accepted spans in placement order.
    placements: Vec<PixelSpan>,

    /// The accepted spans ordered by `(start, end)`.
    ordered: Vec<PixelSpan>,
}

impl Allocator {
    /// Creates an empty allocator with the given margin.
    pub fn new(margin: f64) -> Self {
        Self {
            margin,
            left_extent: f64::INFINITY,
            right_extent: f64::NEG_INFINITY,
            placements: Vec::new(),
            ordered: Vec::new(),
        }
    }

    /// Gets the current envelope as `(left, right)`.
    pub fn extents(&self) -> (f64, f64) {
        (self.left_extent, self.right_extent)
    }

    /// Gets the accepted spans in placement order.
    pub fn placements(&self) -> &[PixelSpan] {
        &self.placements
    }

    /// Places `proposal`, returning where it was accepted.
    ///
    /// # Examples
    ///
    /// ```
    /// use tracklayout::alignment::Allocator;
    /// use tracklayout::span::PixelSpan;
    ///
    /// let mut allocator = Allocator::new(0.0);
    ///
    /// let first = allocator.place(PixelSpan::new(100.0, 200.0));
    /// assert_eq!(first, PixelSpan::new(100.0, 200.0));
    ///
    /// // Overlaps the first span by 30 pixels and is nearer its right side.
    /// let second = allocator.place(PixelSpan::new(170.0, 230.0));
    /// assert_eq!(second, PixelSpan::new(200.0, 260.0));
    /// ```
    pub fn place(&mut self, proposal: PixelSpan) -> PixelSpan {
        let accepted = if self.collides(&proposal) {
            let width = proposal.len();
            let center = proposal.center();

            let left = PixelSpan::new(self.left_extent - width, self.left_extent);
            let right = PixelSpan::new(self.right_extent, self.right_extent + width);

            if (center - left.center()).abs() <= (right.center() - center).abs() {
                left
            } else {
                right
            }
        } else {
            proposal
        };

        let i = self
            .ordered
            .partition_point(|span| (span.start, span.end) <= (accepted.start, accepted.end));
        self.ordered.insert(i, accepted);
        self.placements.push(accepted);

        if accepted.start < self.left_extent {
            self.left_extent = accepted.start - self.margin;
        }

        if accepted.end > self.right_extent {
            self.right_extent = accepted.end + self.margin;
        }

        accepted
    }

    /// Returns whether `proposal` overlaps any accepted span.
    fn collides(&self, proposal: &PixelSpan) -> bool {
        let i = self
            .ordered
            .partition_point(|span| span.start < proposal.end);

        i > 0 && self.ordered[i - 1].overlaps(proposal)
    }
}

#[cfg(test)]
mod tests {
    use rand::Rng;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn test_first_placement_is_untouched() {
        let mut allocator = Allocator::new(5.0);
        let span = allocator.place(PixelSpan::new(10.0, 20.0));
        assert_eq!(span, PixelSpan::new(10.0, 20.0));
        assert_eq!(allocator.extents(), (5.0, 25.0));
    }

    #[test]
    fn test_overlapping_proposals_abut() {
        let mut allocator = Allocator::new(0.0);
        allocator.place(PixelSpan::new(100.0, 200.0));

        // Nearer the left side.
        let span = allocator.place(PixelSpan::new(80.0, 130.0));
        assert_eq!(span, PixelSpan::new(50.0, 100.0));

        // Nearer the right side.
        let span = allocator.place(PixelSpan::new(170.0, 230.0));
        assert_eq!(span, PixelSpan::new(200.0, 260.0));

        assert_eq!(allocator.placements()[0], PixelSpan::new(100.0, 200.0));
        assert_eq!(allocator.extents(), (50.0, 260.0));
    }

    #[test]
    fn test_ties_go_left() {
        let mut allocator = Allocator::new(0.0);
        allocator.place(PixelSpan::new(100.0, 200.0));

        let span = allocator.place(PixelSpan::new(140.0, 160.0));
        assert_eq!(span, PixelSpan::new(80.0, 100.0));
    }

    #[test]
    fn test_margin_separates_moved_spans() {
        let mut allocator = Allocator::new(5.0);
        allocator.place(PixelSpan::new(100.0, 200.0));

        let span = allocator.place(PixelSpan::new(190.0, 210.0));
        assert_eq!(span, PixelSpan::new(205.0, 225.0));
    }

    #[test]
    fn test_proposals_fitting_between_spans_are_untouched() {
        let mut allocator = Allocator::new(0.0);
        allocator.place(PixelSpan::new(100.0, 200.0));
        allocator.place(PixelSpan::new(300.0, 400.0));
        allocator.place(PixelSpan::new(0.0, 50.0));

        let span = allocator.place(PixelSpan::new(200.0, 300.0));
        assert_eq!(span, PixelSpan::new(200.0, 300.0));

        // Collides with 100-200 and is moved past the left edge of everything.
        let span = allocator.place(PixelSpan::new(60.0, 110.0));
        assert_eq!(span, PixelSpan::new(-50.0, 0.0));
    }

    #[test]
    fn test_accepted_spans_never_overlap() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..50 {
            let mut allocator = Allocator::new(rng.gen_range(0.0..10.0));

            for _ in 0..40 {
                let start = rng.gen_range(-100.0..1000.0);
                let width = rng.gen_range(1.0..200.0);
                allocator.place(PixelSpan::new(start, start + width));
            }

            let placements = allocator.placements();
            for (i, a) in placements.iter().enumerate() {
                for b in &placements[i + 1..] {
                    assert!(!a.overlaps(b), "{a} overlaps {b}");
                }
            }
        }
    }
}
