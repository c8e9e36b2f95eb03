//! Segments of a coordinate space.

use omics::coordinate::position::Number;

use crate::Locus;
use crate::space::Error;

/// One atomic piece of a [`CoordinateSpace`](super::CoordinateSpace).
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Segment {
    /// A region of a genome.
    Feature(Locus),

    /// Synthetic filler of the given length with no genomic identity.
    Gap(Number),
}

impl Segment {
    /// Attempts to create a gap segment of `length` addresses.
    ///
    /// # Examples
    ///
    /// ```
    /// use tracklayout::space::Segment;
    ///
    /// let gap = Segment::try_gap(100)?;
    /// assert_eq!(gap.len(), 100);
    /// assert!(gap.is_gap());
    ///
    /// assert!(Segment::try_gap(0).is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_gap(length: Number) -> Result<Self, Error> {
        if length == 0 {
            return Err(Error::InvalidLength(length));
        }

        Ok(Segment::Gap(length))
    }

    /// Gets the number of addresses the segment occupies.
    ///
    /// Valid segments are never empty.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> Number {
        match self {
            Segment::Feature(locus) => locus.len(),
            Segment::Gap(length) => *length,
        }
    }

    /// Gets the locus of a feature segment.
    pub fn locus(&self) -> Option<&Locus> {
        match self {
            Segment::Feature(locus) => Some(locus),
            Segment::Gap(_) => None,
        }
    }

    /// Returns whether this is a gap segment.
    pub fn is_gap(&self) -> bool {
        matches!(self, Segment::Gap(_))
    }
}

impl From<Locus> for Segment {
    fn from(locus: Locus) -> Self {
        Segment::Feature(locus)
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Segment::Feature(locus) => write!(f, "{locus}"),
            Segment::Gap(length) => write!(f, "<gap:{length}>"),
        }
    }
}
