//! Paired-genome alignment records.

use omics::coordinate::Strand;

use crate::Locus;

/// A region of the primary genome aligned to a region of the secondary
/// genome, carrying an opaque payload for the caller.
#[derive(Clone, Debug, PartialEq)]
pub struct Record<P> {
    /// The locus in the primary (displayed) genome.
    primary: Locus,

    /// The locus in the secondary (query) genome.
    secondary: Locus,

    /// The strand of the secondary locus relative to the primary.
    strand: Strand,

    /// The caller's payload.
    payload: P,
}

impl<P> Record<P> {
    /// Creates a new [`Record`].
    ///
    /// # Examples
    ///
    /// ```
    /// use omics::coordinate::Strand;
    /// use tracklayout::alignment::Record;
    ///
    /// let record = Record::new(
    ///     "chr1:100-200".parse()?,
    ///     "chr7:5000-5100".parse()?,
    ///     Strand::Negative,
    ///     "block-1",
    /// );
    ///
    /// assert_eq!(record.primary().to_string(), "chr1:100-200");
    /// assert_eq!(record.secondary().to_string(), "chr7:5000-5100");
    /// assert_eq!(record.strand(), &Strand::Negative);
    /// assert_eq!(*record.payload(), "block-1");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(primary: Locus, secondary: Locus, strand: Strand, payload: P) -> Self {
        Self {
            primary,
            secondary,
            strand,
            payload,
        }
    }

    /// Gets the locus in the primary genome.
    pub fn primary(&self) -> &Locus {
        &self.primary
    }

    /// Gets the locus in the secondary genome.
    pub fn secondary(&self) -> &Locus {
        &self.secondary
    }

    /// Gets the strand of the secondary locus.
    pub fn strand(&self) -> &Strand {
        &self.strand
    }

    /// Gets the payload.
    pub fn payload(&self) -> &P {
        &self.payload
    }

    /// Consumes `self` and returns the payload.
    pub fn into_payload(self) -> P {
        self.payload
    }
}
