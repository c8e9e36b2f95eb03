//! Genomic loci.
//!
//! A [`Locus`] is a region of a single chromosome expressed as a 0-based,
//! half-open range of base pairs. Loci are the currency that every layer of
//! this crate accepts from the outside world: features, alignment records, and
//! the feature segments of a [`CoordinateSpace`](crate::space::CoordinateSpace)
//! are all described by them.
//!
//! ```text
//! ================ chr1 ===============
//!
//! | 0 | 1 | 2 | 3 | 4 | 5 | 6 | 7 | 8 |
//! -------------------------------------
//! |   |   | X | X | X | X |   |   |   |  <= chr1:2-6
//! ```
//!
//! Loci can be parsed from (and are displayed as) `<chromosome>:<start>-<end>`.

use std::str::FromStr;
use std::sync::LazyLock;

use omics::coordinate::position::Number;
use regex::Regex;

/// The pattern for a locus written as `<chromosome>:<start>-<end>`.
static LOCUS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^\s:]+):([0-9,]+)-([0-9,]+)$").unwrap());

/// An error related to a [`Locus`].
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// The start position was not strictly less than the end position.
    InvalidLocus(Number, Number),

    /// The value could not be parsed as a locus.
    Parse(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidLocus(start, end) => write!(
                f,
                "invalid locus: start ({start}) must be less than end ({end})"
            ),
            Error::Parse(value) => write!(f, "could not parse locus from the value: {value}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// A half-open region on a single chromosome.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Locus {
    /// The chromosome name.
    chromosome: String,

    /// The start position (inclusive).
    start: Number,

    /// The end position (exclusive).
    end: Number,
}

impl Locus {
    /// Attempts to create a new [`Locus`].
    ///
    /// # Examples
    ///
    /// ```
    /// use tracklayout::Locus;
    ///
    /// let locus = Locus::try_new("chr1", 100, 200)?;
    /// assert_eq!(locus.len(), 100);
    ///
    /// assert!(Locus::try_new("chr1", 200, 200).is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_new(chromosome: impl Into<String>, start: Number, end: Number) -> Result<Self> {
        if start >= end {
            return Err(Error::InvalidLocus(start, end));
        }

        Ok(Self {
            chromosome: chromosome.into(),
            start,
            end,
        })
    }

    /// Gets the chromosome name.
    pub fn chromosome(&self) -> &str {
        &self.chromosome
    }

    /// Gets the start position (inclusive).
    pub fn start(&self) -> Number {
        self.start
    }

    /// Gets the end position (exclusive).
    pub fn end(&self) -> Number {
        self.end
    }

    /// Gets the number of bases covered by the locus.
    ///
    /// A locus is never empty, so there is no `is_empty()` counterpart.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> Number {
        self.end - self.start
    }

    /// Returns whether the `position` on `chromosome` falls within the locus.
    pub fn contains(&self, chromosome: &str, position: Number) -> bool {
        self.chromosome == chromosome && self.start <= position && position < self.end
    }

    /// Gets the portion of `self` shared with `other`, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use tracklayout::Locus;
    ///
    /// let a = "chr1:100-200".parse::<Locus>()?;
    /// let b = "chr1:150-300".parse::<Locus>()?;
    /// assert_eq!(a.intersect(&b), Some("chr1:150-200".parse()?));
    ///
    /// let c = "chr2:150-300".parse::<Locus>()?;
    /// assert_eq!(a.intersect(&c), None);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn intersect(&self, other: &Locus) -> Option<Locus> {
        if self.chromosome != other.chromosome {
            return None;
        }

        let start = self.start.max(other.start);
        let end = self.end.min(other.end);

        (start < end).then(|| Locus {
            chromosome: self.chromosome.clone(),
            start,
            end,
        })
    }

    /// Gets the smallest locus covering both `self` and `other`, if they lie
    /// on the same chromosome.
    ///
    /// # Examples
    ///
    /// ```
    /// use tracklayout::Locus;
    ///
    /// let a = "chr1:100-200".parse::<Locus>()?;
    /// let b = "chr1:500-600".parse::<Locus>()?;
    /// assert_eq!(a.hull(&b), Some("chr1:100-600".parse()?));
    /// assert_eq!(a.hull(&"chr2:0-1".parse()?), None);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn hull(&self, other: &Locus) -> Option<Locus> {
        (self.chromosome == other.chromosome).then(|| Locus {
            chromosome: self.chromosome.clone(),
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        })
    }

    /// Consumes `self` and returns the chromosome, start, and end.
    pub fn into_parts(self) -> (String, Number, Number) {
        (self.chromosome, self.start, self.end)
    }
}

impl std::fmt::Display for Locus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}-{}", self.chromosome, self.start, self.end)
    }
}

impl FromStr for Locus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let captures = LOCUS_REGEX
            .captures(s.trim())
            .ok_or_else(|| Error::Parse(s.to_string()))?;

        let number = |i: usize| {
            captures[i]
                .replace(',', "")
                .parse::<Number>()
                .map_err(|_| Error::Parse(s.to_string()))
        };

        Locus::try_new(&captures[1], number(2)?, number(3)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_it_parses_a_locus() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let locus = "chr1:1,000-2,000".parse::<Locus>()?;
        assert_eq!(locus.chromosome(), "chr1");
        assert_eq!(locus.start(), 1000);
        assert_eq!(locus.end(), 2000);
        assert_eq!(locus.to_string(), "chr1:1000-2000");

        Ok(())
    }

    #[test]
    fn test_it_rejects_reversed_and_empty_loci() {
        let err = Locus::try_new("chr1", 20, 10).unwrap_err();
        assert_eq!(err, Error::InvalidLocus(20, 10));
        assert_eq!(
            err.to_string(),
            "invalid locus: start (20) must be less than end (10)"
        );

        let err = "chr1:5-5".parse::<Locus>().unwrap_err();
        assert_eq!(err, Error::InvalidLocus(5, 5));
    }

    #[test]
    fn test_it_rejects_malformed_text() {
        for value in ["chr1", "chr1:10", "chr1:a-b", ":1-2", "chr1:1-2-3"] {
            let err = value.parse::<Locus>().unwrap_err();
            assert_eq!(err, Error::Parse(value.to_string()));
        }
    }

    #[test]
    fn test_contains_is_half_open() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let locus = Locus::try_new("chr1", 10, 20)?;
        assert!(locus.contains("chr1", 10));
        assert!(locus.contains("chr1", 19));
        assert!(!locus.contains("chr1", 20));
        assert!(!locus.contains("chr2", 15));
        Ok(())
    }
}
