//! Features to be projected into draw space.

use crate::Locus;

/// A genomic feature to be drawn, optionally decomposed into sub-segments
/// (for example, the exons of a transcript).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Feature {
    /// An optional display name.
    name: Option<String>,

    /// The full extent of the feature.
    locus: Locus,

    /// The sub-segments of the feature in no particular order.
    segments: Vec<Locus>,
}

impl Feature {
    /// Creates a new [`Feature`] spanning `locus` with no sub-segments.
    ///
    /// # Examples
    ///
    /// ```
    /// use tracklayout::draw::Feature;
    ///
    /// let feature = Feature::new("chr1:100-500".parse()?)
    ///     .with_name("TP53")
    ///     .with_segments(vec!["chr1:100-150".parse()?, "chr1:400-500".parse()?]);
    ///
    /// assert_eq!(feature.name(), Some("TP53"));
    /// assert_eq!(feature.locus().to_string(), "chr1:100-500");
    /// assert_eq!(feature.segments().len(), 2);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(locus: Locus) -> Self {
        Self {
            name: None,
            locus,
            segments: Vec::new(),
        }
    }

    /// Sets the display name of the feature.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the sub-segments of the feature.
    pub fn with_segments(mut self, segments: Vec<Locus>) -> Self {
        self.segments = segments;
        self
    }

    /// Gets the display name of the feature.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Gets the full extent of the feature.
    pub fn locus(&self) -> &Locus {
        &self.locus
    }

    /// Gets the sub-segments of the feature.
    pub fn segments(&self) -> &[Locus] {
        &self.segments
    }
}

impl From<Locus> for Feature {
    fn from(locus: Locus) -> Self {
        Self::new(locus)
    }
}
