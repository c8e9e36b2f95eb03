//! The results of projecting features into draw space.

use omics::coordinate::position::Number;

use crate::Locus;
use crate::draw::Feature;
use crate::span::AddressSpan;
use crate::span::PixelSpan;

/// A visible piece of a feature.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement<'a> {
    /// The feature that was placed.
    feature: &'a Feature,

    /// The visible address range of this piece.
    address_span: AddressSpan,

    /// The draw span of this piece, clamped to the view.
    pixel_span: PixelSpan,
}

impl<'a> Placement<'a> {
    /// Creates a new [`Placement`].
    pub(crate) fn new(
        feature: &'a Feature,
        address_span: AddressSpan,
        pixel_span: PixelSpan,
    ) -> Self {
        Self {
            feature,
            address_span,
            pixel_span,
        }
    }

    /// Gets the feature that was placed.
    pub fn feature(&self) -> &'a Feature {
        self.feature
    }

    /// Gets the visible address range of this piece.
    pub fn address_span(&self) -> AddressSpan {
        self.address_span
    }

    /// Gets the draw span of this piece.
    pub fn pixel_span(&self) -> PixelSpan {
        self.pixel_span
    }
}

/// The outcome of placing a single feature.
#[derive(Clone, Debug, PartialEq)]
pub enum Placed<'a> {
    /// The feature is visible as one contiguous piece.
    Single(Placement<'a>),

    /// The feature is visible as several pieces, split at segment
    /// boundaries of the coordinate space.
    Split(Vec<Placement<'a>>),

    /// No part of the feature is visible.
    Dropped,
}

impl<'a> Placed<'a> {
    /// Consumes `self` and returns the visible pieces.
    pub fn into_placements(self) -> Vec<Placement<'a>> {
        match self {
            Placed::Single(placement) => vec![placement],
            Placed::Split(placements) => placements,
            Placed::Dropped => Vec::new(),
        }
    }
}

/// A sub-segment of a feature positioned inside its parent's placement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedSegment<'a> {
    /// The sub-segment that was placed.
    locus: &'a Locus,

    /// The visible address range of the sub-segment.
    address_span: AddressSpan,

    /// The draw span of the sub-segment.
    pixel_span: PixelSpan,

    /// The distance from the start of the feature to the start of the
    /// sub-segment, in bases.
    offset: Number,
}

impl<'a> PlacedSegment<'a> {
    /// Creates a new [`PlacedSegment`].
    pub(crate) fn new(
        locus: &'a Locus,
        address_span: AddressSpan,
        pixel_span: PixelSpan,
        offset: Number,
    ) -> Self {
        Self {
            locus,
            address_span,
            pixel_span,
            offset,
        }
    }

    /// Gets the sub-segment that was placed.
    pub fn locus(&self) -> &'a Locus {
        self.locus
    }

    /// Gets the visible address range of the sub-segment.
    pub fn address_span(&self) -> AddressSpan {
        self.address_span
    }

    /// Gets the draw span of the sub-segment.
    pub fn pixel_span(&self) -> PixelSpan {
        self.pixel_span
    }

    /// Gets the distance from the start of the feature to the start of the
    /// sub-segment, in bases.
    pub fn offset(&self) -> Number {
        self.offset
    }
}
