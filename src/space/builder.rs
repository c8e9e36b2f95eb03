//! A builder for a [`CoordinateSpace`].

use omics::coordinate::position::Number;

use crate::Locus;
use crate::space::CoordinateSpace;
use crate::space::Error;
use crate::space::Segment;

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// A builder for a [`CoordinateSpace`].
#[derive(Debug, Default)]
pub struct Builder {
    /// The name of the space.
    name: String,

    /// The segments pushed so far, in address order.
    segments: Vec<Segment>,
}

impl Builder {
    /// Creates a builder for a space called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            segments: Vec::new(),
        }
    }

    /// Appends a feature segment covering `locus`.
    pub fn push_feature(mut self, locus: Locus) -> Self {
        self.segments.push(Segment::Feature(locus));
        self
    }

    /// Appends a gap segment of `length` addresses.
    pub fn push_gap(mut self, length: Number) -> Result<Self> {
        self.segments.push(Segment::try_gap(length)?);
        Ok(self)
    }

    /// Gets the number of segments pushed so far.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns whether no segments have been pushed.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Consumes `self` to attempt to build a [`CoordinateSpace`].
    ///
    /// # Examples
    ///
    /// ```
    /// use tracklayout::space::Builder;
    ///
    /// let space = Builder::new("view")
    ///     .push_feature("chr1:0-100".parse()?)
    ///     .push_gap(50)?
    ///     .push_feature("chr2:0-100".parse()?)
    ///     .try_build()?;
    ///
    /// assert_eq!(space.total_length(), 250);
    /// assert!(Builder::new("empty").try_build().is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_build(self) -> Result<CoordinateSpace> {
        CoordinateSpace::try_new(self.name, self.segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_it_fails_to_build_without_segments() {
        let err = Builder::new("empty").try_build().unwrap_err();
        assert_eq!(err, Error::EmptySpace);
        assert_eq!(err.to_string(), "a coordinate space needs at least one segment");
    }

    #[test]
    fn test_it_rejects_empty_gaps() {
        let err = Builder::new("view").push_gap(0).unwrap_err();
        assert_eq!(err, Error::InvalidLength(0));
    }
}
