//! Projection of a coordinate space into draw space.
//!
//! A [`DrawProjector`] scales a visible window of a
//! [`CoordinateSpace`](crate::space::CoordinateSpace) onto a horizontal draw
//! range of `width` pixels. Features are mapped into the space, clipped to the
//! window, and converted into [`Placement`]s. A feature that straddles
//! several segments of the space is placed once per segment.
//!
//! Sub-segments of a feature (exons, for example) are never projected on
//! their own. Instead, [`DrawProjector::place_segments()`] positions them
//! relative to a placement of their parent so that they stay consistent with
//! a parent that was itself clipped at the edge of the window.

use omics::coordinate::position::Number;
use tracing::debug;
use tracing::trace;

use crate::space::CoordinateSpace;
use crate::span::AddressSpan;
use crate::span::PixelSpan;

mod feature;
mod placement;

pub use feature::Feature;
pub use placement::Placed;
pub use placement::PlacedSegment;
pub use placement::Placement;

/// An error related to a [`DrawProjector`].
#[derive(Debug, PartialEq)]
pub enum Error {
    /// The visible window is empty or the width is not a positive, finite
    /// number of pixels.
    DegenerateWindow(AddressSpan, f64),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::DegenerateWindow(window, width) => {
                write!(f, "degenerate window: {window} drawn across {width} pixels")
            }
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// Maps addresses within a visible window onto pixels.
#[derive(Clone, Copy, Debug)]
pub struct DrawProjector<'a> {
    /// The space being drawn.
    space: &'a CoordinateSpace,

    /// The visible address range.
    window: AddressSpan,

    /// The width of the draw range in pixels.
    width: f64,

    /// The number of addresses covered by one pixel.
    bases_per_pixel: f64,
}

impl<'a> DrawProjector<'a> {
    /// Attempts to create a new [`DrawProjector`] drawing `window` of `space`
    /// across `width` pixels.
    ///
    /// # Examples
    ///
    /// ```
    /// use tracklayout::draw::DrawProjector;
    /// use tracklayout::space::CoordinateSpace;
    /// use tracklayout::span::AddressSpan;
    ///
    /// let space = CoordinateSpace::from_chromosomes("hg38", [("chr1", 10_000)])?;
    /// let projector = DrawProjector::try_new(&space, AddressSpan::new(1_000, 2_000), 100.0)?;
    ///
    /// assert_eq!(projector.bases_per_pixel(), 10.0);
    /// assert_eq!(projector.address_to_pixel(1_500), 50.0);
    /// assert_eq!(projector.pixel_span_length(250), 25.0);
    ///
    /// assert!(DrawProjector::try_new(&space, AddressSpan::new(5, 5), 100.0).is_err());
    /// assert!(DrawProjector::try_new(&space, AddressSpan::new(0, 5), 0.0).is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_new(space: &'a CoordinateSpace, window: AddressSpan, width: f64) -> Result<Self> {
        if window.is_empty() || !width.is_finite() || width <= 0.0 {
            return Err(Error::DegenerateWindow(window, width));
        }

        Ok(Self {
            space,
            window,
            width,
            bases_per_pixel: window.len() as f64 / width,
        })
    }

    /// Gets the space being drawn.
    pub fn space(&self) -> &'a CoordinateSpace {
        self.space
    }

    /// Gets the visible address range.
    pub fn window(&self) -> AddressSpan {
        self.window
    }

    /// Gets the width of the draw range in pixels.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Gets the number of addresses covered by one pixel.
    pub fn bases_per_pixel(&self) -> f64 {
        self.bases_per_pixel
    }

    /// Converts an address to a horizontal pixel position.
    ///
    /// Addresses outside of the window map outside of `[0, width)`.
    pub fn address_to_pixel(&self, address: Number) -> f64 {
        (address as f64 - self.window.start as f64) / self.bases_per_pixel
    }

    /// Converts a horizontal pixel position to a (fractional) address.
    pub fn pixel_to_address(&self, x: f64) -> f64 {
        self.window.start as f64 + x * self.bases_per_pixel
    }

    /// Converts a number of addresses to a number of pixels.
    pub fn pixel_span_length(&self, length: Number) -> f64 {
        length as f64 / self.bases_per_pixel
    }

    /// Converts a number of pixels to a number of addresses.
    pub fn pixels_to_bases(&self, pixels: f64) -> f64 {
        pixels * self.bases_per_pixel
    }

    /// Converts an address range to a draw span without clamping.
    pub fn address_span_to_pixels(&self, span: &AddressSpan) -> PixelSpan {
        PixelSpan::new(
            self.address_to_pixel(span.start),
            self.address_to_pixel(span.end),
        )
    }

    /// Clips `span` to the window and clamps its draw span to `[0, width)`.
    fn visible(&self, span: &AddressSpan) -> Option<(AddressSpan, PixelSpan)> {
        let span = span.intersect(&self.window)?;
        let pixels = self.address_span_to_pixels(&span);
        let pixels = PixelSpan::new(pixels.start.max(0.0), pixels.end.min(self.width));

        (!pixels.is_empty()).then_some((span, pixels))
    }

    /// Places a single feature.
    ///
    /// # Examples
    ///
    /// ```
    /// use tracklayout::draw::DrawProjector;
    /// use tracklayout::draw::Feature;
    /// use tracklayout::draw::Placed;
    /// use tracklayout::space::Builder;
    /// use tracklayout::span::AddressSpan;
    /// use tracklayout::span::PixelSpan;
    ///
    /// let space = Builder::new("view")
    ///     .push_feature("chr1:100-200".parse()?)
    ///     .push_gap(100)?
    ///     .push_feature("chr1:300-400".parse()?)
    ///     .try_build()?;
    ///
    /// let projector = DrawProjector::try_new(&space, AddressSpan::new(0, 300), 300.0)?;
    ///
    /// let feature = Feature::new("chr1:150-350".parse()?);
    /// match projector.place_feature(&feature) {
    ///     Placed::Split(pieces) => {
    ///         assert_eq!(pieces.len(), 2);
    ///         assert_eq!(pieces[0].pixel_span(), PixelSpan::new(50.0, 100.0));
    ///         assert_eq!(pieces[1].pixel_span(), PixelSpan::new(200.0, 250.0));
    ///     }
    ///     other => panic!("unexpected placement: {other:?}"),
    /// }
    ///
    /// let hidden = Feature::new("chr2:0-100".parse()?);
    /// assert_eq!(projector.place_feature(&hidden), Placed::Dropped);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn place_feature<'f>(&self, feature: &'f Feature) -> Placed<'f> {
        let mut placements = self
            .space
            .to_address(feature.locus())
            .iter()
            .filter_map(|span| self.visible(span))
            .map(|(address, pixels)| Placement::new(feature, address, pixels))
            .collect::<Vec<_>>();

        match placements.len() {
            0 => {
                trace!("feature {} is not visible", feature.locus());
                Placed::Dropped
            }
            1 => Placed::Single(placements.remove(0)),
            _ => Placed::Split(placements),
        }
    }

    /// Places every feature in `features`, returning the visible pieces in
    /// input order.
    pub fn place_features<'f>(&self, features: &'f [Feature]) -> Vec<Placement<'f>> {
        let mut dropped = 0usize;

        let placements = features
            .iter()
            .flat_map(|feature| {
                let placed = self.place_feature(feature);

                if placed == Placed::Dropped {
                    dropped += 1;
                }

                placed.into_placements()
            })
            .collect::<Vec<_>>();

        debug!(
            "placed {} pieces from {} features ({} not visible)",
            placements.len(),
            features.len(),
            dropped
        );

        placements
    }

    /// Positions the sub-segments of a placed feature inside `placement`.
    ///
    /// Each sub-segment is offset from the genomic position at the start of
    /// the placement, then intersected with the placement's address and draw
    /// spans. Sub-segments on another chromosome or outside of the placement
    /// are dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use tracklayout::draw::DrawProjector;
    /// use tracklayout::draw::Feature;
    /// use tracklayout::draw::Placed;
    /// use tracklayout::space::CoordinateSpace;
    /// use tracklayout::span::AddressSpan;
    /// use tracklayout::span::PixelSpan;
    ///
    /// let space = CoordinateSpace::from_chromosomes("hg38", [("chr1", 10_000)])?;
    /// let projector = DrawProjector::try_new(&space, AddressSpan::new(500, 1_500), 100.0)?;
    ///
    /// let feature = Feature::new("chr1:400-800".parse()?)
    ///     .with_segments(vec!["chr1:400-450".parse()?, "chr1:600-650".parse()?]);
    ///
    /// let Placed::Single(placement) = projector.place_feature(&feature) else {
    ///     panic!("expected a single placement");
    /// };
    ///
    /// let segments = projector.place_segments(&placement);
    /// assert_eq!(segments.len(), 1);
    /// assert_eq!(segments[0].pixel_span(), PixelSpan::new(10.0, 15.0));
    /// assert_eq!(segments[0].offset(), 200);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn place_segments<'f>(&self, placement: &Placement<'f>) -> Vec<PlacedSegment<'f>> {
        let feature = placement.feature();
        let parent = placement.address_span();

        let Ok(location) = self.space.to_locus(parent.start) else {
            return Vec::new();
        };

        let Some((chromosome, position)) = location.position() else {
            return Vec::new();
        };

        feature
            .segments()
            .iter()
            .filter(|segment| segment.chromosome() == chromosome)
            .filter_map(|segment| {
                let distance = segment.start() as i64 - position as i64;
                let start = parent.start as i64 + distance;
                let end = start + segment.len() as i64;

                let start = start.max(parent.start as i64);
                let end = end.min(parent.end as i64);

                if start >= end {
                    trace!("segment {segment} lies outside of its placement");
                    return None;
                }

                let address = AddressSpan::new(start as Number, end as Number);
                let pixels = self
                    .address_span_to_pixels(&address)
                    .intersect(&placement.pixel_span())?;

                Some(PlacedSegment::new(
                    segment,
                    address,
                    pixels,
                    segment.start().saturating_sub(feature.locus().start()),
                ))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Locus;
    use crate::space::Builder;

    fn genome() -> std::result::Result<CoordinateSpace, Box<dyn std::error::Error>> {
        Ok(CoordinateSpace::from_chromosomes(
            "genome",
            [("chr1", 1_000), ("chr2", 500)],
        )?)
    }

    #[test]
    fn test_it_rejects_degenerate_windows() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let space = genome()?;

        let err = DrawProjector::try_new(&space, AddressSpan::new(10, 10), 100.0).unwrap_err();
        assert_eq!(err, Error::DegenerateWindow(AddressSpan::new(10, 10), 100.0));
        assert_eq!(
            err.to_string(),
            "degenerate window: [10, 10) drawn across 100 pixels"
        );

        for width in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(DrawProjector::try_new(&space, AddressSpan::new(0, 10), width).is_err());
        }

        Ok(())
    }

    #[test]
    fn test_address_to_pixel_is_monotonic() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let space = genome()?;
        let projector = DrawProjector::try_new(&space, AddressSpan::new(250, 1_327), 713.0)?;

        let mut last = f64::NEG_INFINITY;
        for address in 0..space.total_length() {
            let x = projector.address_to_pixel(address);
            assert!(x >= last);
            last = x;
        }

        let x = projector.address_to_pixel(900);
        assert!((projector.pixel_to_address(x) - 900.0).abs() < 1e-9);
        assert!((projector.pixels_to_bases(projector.pixel_span_length(77)) - 77.0).abs() < 1e-9);

        Ok(())
    }

    #[test]
    fn test_placements_are_clipped_to_the_window()
    -> std::result::Result<(), Box<dyn std::error::Error>> {
        let space = genome()?;
        let projector = DrawProjector::try_new(&space, AddressSpan::new(500, 1_500), 100.0)?;

        let features = vec![
            Feature::new("chr1:400-700".parse()?),
            Feature::new("chr1:0-100".parse()?),
            Feature::new("chr2:400-500".parse()?),
            Feature::new("chrX:0-100".parse()?),
        ];

        let placements = projector.place_features(&features);
        assert_eq!(placements.len(), 2);

        assert_eq!(placements[0].feature(), &features[0]);
        assert_eq!(placements[0].address_span(), AddressSpan::new(500, 700));
        assert_eq!(placements[0].pixel_span(), PixelSpan::new(0.0, 20.0));

        assert_eq!(placements[1].feature(), &features[2]);
        assert_eq!(placements[1].address_span(), AddressSpan::new(1_400, 1_500));
        assert_eq!(placements[1].pixel_span(), PixelSpan::new(90.0, 100.0));

        assert!(projector.place_features(&[]).is_empty());

        Ok(())
    }

    #[test]
    fn test_segments_follow_a_clipped_parent()
    -> std::result::Result<(), Box<dyn std::error::Error>> {
        let space = genome()?;
        let projector = DrawProjector::try_new(&space, AddressSpan::new(500, 1_500), 100.0)?;

        let feature = Feature::new("chr1:400-800".parse()?).with_segments(vec![
            "chr1:400-450".parse()?,
            "chr1:600-650".parse()?,
            "chr1:780-900".parse()?,
            "chr2:600-650".parse()?,
        ]);

        let placements = projector.place_feature(&feature).into_placements();
        assert_eq!(placements.len(), 1);

        let segments = projector.place_segments(&placements[0]);
        assert_eq!(segments.len(), 2);

        assert_eq!(segments[0].locus(), &"chr1:600-650".parse::<Locus>()?);
        assert_eq!(segments[0].address_span(), AddressSpan::new(600, 650));
        assert_eq!(segments[0].pixel_span(), PixelSpan::new(10.0, 15.0));
        assert_eq!(segments[0].offset(), 200);

        assert_eq!(segments[1].address_span(), AddressSpan::new(780, 800));
        assert_eq!(segments[1].pixel_span(), PixelSpan::new(28.0, 30.0));
        assert_eq!(segments[1].offset(), 380);

        Ok(())
    }

    #[test]
    fn test_segments_of_a_split_feature() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let space = Builder::new("view")
            .push_feature("chr1:100-200".parse()?)
            .push_gap(100)?
            .push_feature("chr1:300-400".parse()?)
            .try_build()?;
        let projector = DrawProjector::try_new(&space, AddressSpan::new(0, 300), 300.0)?;

        let feature = Feature::new("chr1:150-350".parse()?)
            .with_segments(vec!["chr1:160-170".parse()?, "chr1:320-330".parse()?]);

        let Placed::Split(pieces) = projector.place_feature(&feature) else {
            panic!("expected a split placement");
        };

        let first = projector.place_segments(&pieces[0]);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].pixel_span(), PixelSpan::new(60.0, 70.0));
        assert_eq!(first[0].offset(), 10);

        let second = projector.place_segments(&pieces[1]);
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].pixel_span(), PixelSpan::new(220.0, 230.0));
        assert_eq!(second[0].offset(), 170);

        Ok(())
    }
}
