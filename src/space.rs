//! Linear address spaces built from genomic segments.
//!
//! A [`CoordinateSpace`] concatenates an ordered list of [`Segment`]s into a
//! single address range `[0, total_length)`. Feature segments correspond to
//! genomic loci (possibly from several chromosomes, or several merged regions
//! of a second genome) and gap segments are synthetic filler. The space maps
//! loci to addresses ([`CoordinateSpace::to_address()`]) and addresses back to
//! segments ([`CoordinateSpace::to_locus()`]).
//!
//! ```text
//!  segments:  | chr1:0-100 | <gap:50> | chr2:0-100 |
//!  addresses: 0           100        150          250
//! ```
//!
//! A space is immutable once built and can be shared by reference between
//! every consumer that draws against the same view.

use std::collections::HashMap;

use nonempty::NonEmpty;
use omics::coordinate::position::Number;
use rust_lapper as lapper;

use crate::Locus;
use crate::index;
use crate::index::IntervalIndex;
use crate::locus;
use crate::span::AddressSpan;

mod builder;
mod segment;

pub use builder::Builder;
pub use segment::Segment;

/// An error related to a [`CoordinateSpace`].
#[derive(Debug, PartialEq)]
pub enum Error {
    /// A space was requested with no segments.
    EmptySpace,

    /// A gap segment was requested with a non-positive length.
    InvalidLength(Number),

    /// An address fell outside of `[0, total_length)`.
    AddressOutOfRange(Number, Number),

    /// An error from the segment index.
    Index(index::Error),

    /// An error constructing a locus.
    Locus(locus::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::EmptySpace => write!(f, "a coordinate space needs at least one segment"),
            Error::InvalidLength(length) => {
                write!(f, "invalid length: a gap must be longer than {length}")
            }
            Error::AddressOutOfRange(address, total) => write!(
                f,
                "address {address} is outside of the coordinate space [0, {total})"
            ),
            Error::Index(err) => write!(f, "index error: {err}"),
            Error::Locus(err) => write!(f, "locus error: {err}"),
        }
    }
}

impl std::error::Error for Error {}

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// Where an address lands within a [`CoordinateSpace`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Location<'a> {
    /// The segment containing the address.
    segment: &'a Segment,

    /// The position of the segment within the space.
    index: usize,

    /// The distance of the address from the start of the segment.
    offset: Number,
}

impl<'a> Location<'a> {
    /// Gets the segment containing the address.
    pub fn segment(&self) -> &'a Segment {
        self.segment
    }

    /// Gets the position of the segment within the space.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Gets the distance of the address from the start of its segment.
    pub fn offset(&self) -> Number {
        self.offset
    }

    /// Gets the genomic position of the address, if it landed on a feature
    /// segment.
    pub fn position(&self) -> Option<(&'a str, Number)> {
        self.segment
            .locus()
            .map(|locus| (locus.chromosome(), locus.start() + self.offset))
    }
}

/// An ordered sequence of segments forming one linear address space.
#[derive(Debug)]
pub struct CoordinateSpace {
    /// The name of the space.
    name: String,

    /// The segments in address order.
    segments: NonEmpty<Segment>,

    /// The first address of each segment.
    offsets: Vec<Number>,

    /// The number of addresses in the space.
    total_length: Number,

    /// The feature segments of each chromosome keyed by their genomic range.
    lookup: HashMap<String, lapper::Lapper<Number, usize>>,

    /// The address range of every segment, keyed by segment position.
    index: IntervalIndex,
}

impl CoordinateSpace {
    /// Attempts to build a space from `segments` in order.
    ///
    /// # Examples
    ///
    /// ```
    /// use tracklayout::space::CoordinateSpace;
    /// use tracklayout::space::Segment;
    ///
    /// let space = CoordinateSpace::try_new(
    ///     "view",
    ///     vec![
    ///         Segment::Feature("chr1:0-100".parse()?),
    ///         Segment::try_gap(50)?,
    ///         Segment::Feature("chr2:0-100".parse()?),
    ///     ],
    /// )?;
    ///
    /// assert_eq!(space.total_length(), 250);
    /// assert_eq!(space.segments().len(), 3);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_new(
        name: impl Into<String>,
        segments: impl IntoIterator<Item = Segment>,
    ) -> Result<Self> {
        let segments =
            NonEmpty::from_vec(segments.into_iter().collect()).ok_or(Error::EmptySpace)?;

        let mut offsets = Vec::with_capacity(segments.len());
        let mut total_length: Number = 0;

        for segment in segments.iter() {
            if segment.len() == 0 {
                return Err(Error::InvalidLength(0));
            }

            offsets.push(total_length);
            total_length += segment.len();
        }

        let mut index =
            IntervalIndex::try_new(total_length as f64 / 2.0).map_err(Error::Index)?;
        let mut features = HashMap::<String, Vec<lapper::Interval<Number, usize>>>::new();

        for (i, (segment, offset)) in segments.iter().zip(&offsets).enumerate() {
            index
                .insert(*offset, offset + segment.len(), Some(i as u64))
                .map_err(Error::Index)?;

            if let Segment::Feature(locus) = segment {
                features
                    .entry(locus.chromosome().to_string())
                    .or_default()
                    .push(lapper::Interval {
                        start: locus.start(),
                        stop: locus.end(),
                        val: i,
                    });
            }
        }

        let lookup = features
            .into_iter()
            .map(|(chromosome, intervals)| (chromosome, lapper::Lapper::new(intervals)))
            .collect();

        Ok(Self {
            name: name.into(),
            segments,
            offsets,
            total_length,
            lookup,
            index,
        })
    }

    /// Builds a space with one feature segment spanning each chromosome.
    ///
    /// # Examples
    ///
    /// ```
    /// use tracklayout::space::CoordinateSpace;
    ///
    /// let space = CoordinateSpace::from_chromosomes("hg38", [("chr1", 1000), ("chr2", 500)])?;
    /// assert_eq!(space.total_length(), 1500);
    ///
    /// let spans = space.to_address(&"chr2:100-200".parse()?);
    /// assert_eq!((spans[0].start, spans[0].end), (1100, 1200));
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_chromosomes<S>(
        name: impl Into<String>,
        chromosomes: impl IntoIterator<Item = (S, Number)>,
    ) -> Result<Self>
    where
        S: Into<String>,
    {
        let segments = chromosomes
            .into_iter()
            .map(|(chromosome, length)| {
                Locus::try_new(chromosome, 0, length)
                    .map(Segment::Feature)
                    .map_err(Error::Locus)
            })
            .collect::<Result<Vec<_>>>()?;

        Self::try_new(name, segments)
    }

    /// Gets the name of the space.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the segments of the space in address order.
    pub fn segments(&self) -> &NonEmpty<Segment> {
        &self.segments
    }

    /// Gets the number of addresses in the space.
    pub fn total_length(&self) -> Number {
        self.total_length
    }

    /// Gets the address range occupied by the segment at position `i`.
    pub fn segment_span(&self, i: usize) -> Option<AddressSpan> {
        let segment = self.segments.get(i)?;
        let offset = self.offsets[i];
        Some(AddressSpan::new(offset, offset + segment.len()))
    }

    /// Returns whether any feature segment lies on `chromosome`.
    pub fn has_feature_on(&self, chromosome: &str) -> bool {
        self.lookup.contains_key(chromosome)
    }

    /// Iterates over the loci of the feature segments in address order.
    pub fn features(&self) -> impl Iterator<Item = &Locus> {
        self.segments.iter().filter_map(Segment::locus)
    }

    /// Maps `locus` to the address ranges it occupies.
    ///
    /// The locus is clipped to every feature segment it overlaps, so a locus
    /// that is not represented in this space maps to nothing and a locus that
    /// spans several feature segments maps to several ranges. The ranges are
    /// sorted by address.
    ///
    /// # Examples
    ///
    /// ```
    /// use tracklayout::space::Builder;
    ///
    /// let space = Builder::new("view")
    ///     .push_feature("chr1:100-200".parse()?)
    ///     .push_gap(10)?
    ///     .push_feature("chr1:300-400".parse()?)
    ///     .try_build()?;
    ///
    /// let spans = space.to_address(&"chr1:150-350".parse()?);
    /// assert_eq!(spans.len(), 2);
    /// assert_eq!((spans[0].start, spans[0].end), (50, 100));
    /// assert_eq!((spans[1].start, spans[1].end), (110, 160));
    ///
    /// assert!(space.to_address(&"chr1:200-300".parse()?).is_empty());
    /// assert!(space.to_address(&"chrX:0-10".parse()?).is_empty());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn to_address(&self, locus: &Locus) -> Vec<AddressSpan> {
        let Some(features) = self.lookup.get(locus.chromosome()) else {
            return Vec::new();
        };

        let mut spans = features
            .find(locus.start(), locus.end())
            .filter_map(|entry| {
                let segment = self.segments.get(entry.val)?.locus()?;
                let clipped = segment.intersect(locus)?;
                let offset = self.offsets[entry.val];

                Some(AddressSpan::new(
                    offset + (clipped.start() - segment.start()),
                    offset + (clipped.end() - segment.start()),
                ))
            })
            .collect::<Vec<_>>();

        spans.sort();
        spans
    }

    /// Finds the segment containing `address` and the offset within it.
    ///
    /// # Examples
    ///
    /// ```
    /// use tracklayout::space::Builder;
    ///
    /// let space = Builder::new("view")
    ///     .push_feature("chr1:100-200".parse()?)
    ///     .push_gap(10)?
    ///     .push_feature("chr1:300-400".parse()?)
    ///     .try_build()?;
    ///
    /// let location = space.to_locus(115)?;
    /// assert_eq!(location.index(), 2);
    /// assert_eq!(location.offset(), 5);
    /// assert_eq!(location.position(), Some(("chr1", 305)));
    ///
    /// assert!(space.to_locus(105)?.segment().is_gap());
    /// assert!(space.to_locus(210).is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn to_locus(&self, address: Number) -> Result<Location<'_>> {
        let out_of_range = Error::AddressOutOfRange(address, self.total_length);

        if address >= self.total_length {
            return Err(out_of_range);
        }

        let interval = self
            .index
            .point_query(address)
            .into_iter()
            .next()
            .ok_or(out_of_range)?;

        let index = interval.id() as usize;
        let segment = self
            .segments
            .get(index)
            .ok_or(Error::AddressOutOfRange(address, self.total_length))?;

        Ok(Location {
            segment,
            index,
            offset: address - interval.start(),
        })
    }

    /// Gets the genomic loci visible within `span`, in address order.
    ///
    /// Gap segments contribute nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use tracklayout::Locus;
    /// use tracklayout::space::Builder;
    /// use tracklayout::span::AddressSpan;
    ///
    /// let space = Builder::new("view")
    ///     .push_feature("chr1:100-200".parse()?)
    ///     .push_gap(10)?
    ///     .push_feature("chr2:300-400".parse()?)
    ///     .try_build()?;
    ///
    /// let loci = space.loci_in(&AddressSpan::new(50, 150))?;
    /// assert_eq!(
    ///     loci,
    ///     vec![
    ///         "chr1:150-200".parse::<Locus>()?,
    ///         "chr2:300-340".parse::<Locus>()?
    ///     ]
    /// );
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn loci_in(&self, span: &AddressSpan) -> Result<Vec<Locus>> {
        let hits = self
            .index
            .range_query(span.start, span.end)
            .map_err(Error::Index)?;

        let mut loci = Vec::new();

        for hit in hits {
            let interval = hit.interval();
            let Some(Segment::Feature(locus)) = self.segments.get(interval.id() as usize) else {
                continue;
            };

            let occupied = AddressSpan::new(interval.start(), interval.end());
            if let Some(visible) = occupied.intersect(span) {
                loci.push(
                    Locus::try_new(
                        locus.chromosome(),
                        locus.start() + (visible.start - occupied.start),
                        locus.start() + (visible.end - occupied.start),
                    )
                    .map_err(Error::Locus)?,
                );
            }
        }

        Ok(loci)
    }
}

impl std::fmt::Display for CoordinateSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: ", self.name)?;

        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }

            write!(f, "{segment}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> Result<CoordinateSpace> {
        Builder::new("view")
            .push_feature(Locus::try_new("chr1", 100, 200).map_err(Error::Locus)?)
            .push_gap(50)?
            .push_feature(Locus::try_new("chr2", 0, 100).map_err(Error::Locus)?)
            .push_feature(Locus::try_new("chr1", 500, 600).map_err(Error::Locus)?)
            .try_build()
    }

    #[test]
    fn test_offsets_are_contiguous() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let space = view()?;
        assert_eq!(space.total_length(), 350);

        let spans = (0..space.segments().len())
            .map(|i| space.segment_span(i).unwrap())
            .collect::<Vec<_>>();
        assert_eq!(
            spans,
            vec![
                AddressSpan::new(0, 100),
                AddressSpan::new(100, 150),
                AddressSpan::new(150, 250),
                AddressSpan::new(250, 350),
            ]
        );
        assert_eq!(space.segment_span(4), None);

        Ok(())
    }

    #[test]
    fn test_round_trip_within_a_feature_segment()
    -> std::result::Result<(), Box<dyn std::error::Error>> {
        let space = view()?;

        for locus in ["chr1:120-180", "chr2:0-100", "chr1:599-600", "chr2:42-43"] {
            let locus = locus.parse::<Locus>()?;
            let spans = space.to_address(&locus);
            assert_eq!(spans.len(), 1);

            let start = space.to_locus(spans[0].start)?;
            assert_eq!(start.position(), Some((locus.chromosome(), locus.start())));

            let last = space.to_locus(spans[0].end - 1)?;
            assert_eq!(
                last.position(),
                Some((locus.chromosome(), locus.end() - 1))
            );

            assert_eq!(space.loci_in(&spans[0])?, vec![locus]);
        }

        Ok(())
    }

    #[test]
    fn test_to_address_clips_to_segments() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let space = view()?;

        let spans = space.to_address(&"chr1:0-1000".parse()?);
        assert_eq!(
            spans,
            vec![AddressSpan::new(0, 100), AddressSpan::new(250, 350)]
        );

        assert!(space.to_address(&"chr1:200-500".parse()?).is_empty());
        assert!(space.has_feature_on("chr2"));
        assert!(!space.has_feature_on("chr3"));

        Ok(())
    }

    #[test]
    fn test_it_can_be_queried_from_many_threads()
    -> std::result::Result<(), Box<dyn std::error::Error>> {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CoordinateSpace>();

        let space = view()?;

        let results = std::thread::scope(|scope| {
            let handles = [0, 149, 200, 349]
                .into_iter()
                .map(|address| {
                    let space = &space;
                    scope.spawn(move || {
                        space.to_locus(address).map(|location| {
                            location
                                .position()
                                .map(|(chromosome, position)| (chromosome.to_string(), position))
                        })
                    })
                })
                .collect::<Vec<_>>();

            handles
                .into_iter()
                .map(|handle| handle.join().unwrap())
                .collect::<Result<Vec<_>>>()
        })?;

        assert_eq!(
            results,
            vec![
                Some((String::from("chr1"), 100)),
                None,
                Some((String::from("chr2"), 50)),
                Some((String::from("chr1"), 599)),
            ]
        );

        Ok(())
    }

    #[test]
    fn test_to_locus_rejects_out_of_range_addresses()
    -> std::result::Result<(), Box<dyn std::error::Error>> {
        let space = view()?;

        let err = space.to_locus(350).unwrap_err();
        assert_eq!(err, Error::AddressOutOfRange(350, 350));
        assert_eq!(
            err.to_string(),
            "address 350 is outside of the coordinate space [0, 350)"
        );

        let location = space.to_locus(120)?;
        assert!(location.segment().is_gap());
        assert_eq!(location.position(), None);
        assert_eq!(location.offset(), 20);

        Ok(())
    }

    #[test]
    fn test_it_rejects_empty_gaps_passed_directly() {
        let err = CoordinateSpace::try_new("view", vec![Segment::Gap(0)]).unwrap_err();
        assert_eq!(err, Error::InvalidLength(0));

        let err = CoordinateSpace::try_new("view", Vec::new()).unwrap_err();
        assert_eq!(err, Error::EmptySpace);
    }

    #[test]
    fn test_display() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let space = view()?;
        assert_eq!(
            space.to_string(),
            "view: chr1:100-200, <gap:50>, chr2:0-100, chr1:500-600"
        );
        assert_eq!(space.features().count(), 3);
        Ok(())
    }
}
