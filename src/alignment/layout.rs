//! The output of a placement pass.

use nonempty::NonEmpty;
use omics::coordinate::position::Number;

use crate::Locus;
use crate::alignment::Error;
use crate::alignment::Record;
use crate::space::CoordinateSpace;
use crate::space::Segment;
use crate::span::PixelSpan;

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// A record positioned within its group.
#[derive(Debug)]
pub struct PlacedRecord<'r, P> {
    /// The record.
    record: &'r Record<P>,

    /// The unclamped draw span of one piece of the primary locus.
    primary_span: PixelSpan,

    /// The draw span of the secondary locus within the group.
    secondary_span: PixelSpan,
}

impl<'r, P> PlacedRecord<'r, P> {
    /// Creates a new [`PlacedRecord`].
    pub(crate) fn new(
        record: &'r Record<P>,
        primary_span: PixelSpan,
        secondary_span: PixelSpan,
    ) -> Self {
        Self {
            record,
            primary_span,
            secondary_span,
        }
    }

    /// Gets the record.
    pub fn record(&self) -> &'r Record<P> {
        self.record
    }

    /// Gets the draw span of the primary locus.
    pub fn primary_span(&self) -> PixelSpan {
        self.primary_span
    }

    /// Gets the draw span of the secondary locus.
    pub fn secondary_span(&self) -> PixelSpan {
        self.secondary_span
    }
}

/// A group of records merged in the secondary genome and placed together.
#[derive(Debug)]
pub struct MergedGroup<'r, P> {
    /// The smallest secondary locus covering every member.
    secondary_locus: Locus,

    /// The resolved draw span of the group.
    pixel_span: PixelSpan,

    /// The members, one per piece of each record's primary locus that maps
    /// into the drawn space. A record whose primary locus maps onto `n`
    /// segments appears `n` times.
    members: NonEmpty<PlacedRecord<'r, P>>,
}

impl<'r, P> MergedGroup<'r, P> {
    /// Creates a new [`MergedGroup`].
    pub(crate) fn new(
        secondary_locus: Locus,
        pixel_span: PixelSpan,
        members: NonEmpty<PlacedRecord<'r, P>>,
    ) -> Self {
        Self {
            secondary_locus,
            pixel_span,
            members,
        }
    }

    /// Gets the secondary locus covered by the group.
    pub fn secondary_locus(&self) -> &Locus {
        &self.secondary_locus
    }

    /// Gets the resolved draw span of the group.
    pub fn pixel_span(&self) -> PixelSpan {
        self.pixel_span
    }

    /// Gets the members of the group.
    ///
    /// A record whose primary locus maps onto several segments of the drawn
    /// space appears once per segment. Records of the group whose primary
    /// locus does not map into the drawn space at all are reported in
    /// [`Layout::dropped()`] with [`DropReason::NotInSpace`].
    pub fn members(&self) -> &NonEmpty<PlacedRecord<'r, P>> {
        &self.members
    }
}

/// Why a group was left out of a layout.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DropReason {
    /// The group would be drawn narrower than the minimum draw width.
    TooNarrow,

    /// The primary locus does not map onto any segment of the drawn space.
    NotInSpace,
}

impl std::fmt::Display for DropReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DropReason::TooNarrow => write!(f, "too narrow to draw"),
            DropReason::NotInSpace => write!(f, "primary locus not in the drawn space"),
        }
    }
}

/// Records of a group that could not be placed.
///
/// When a group is placed but some of its records have no primary locus in
/// the drawn space, those records are reported here on their own.
#[derive(Debug)]
pub struct Dropped<'r, P> {
    /// The secondary locus covered by the group.
    secondary_locus: Locus,

    /// The records left out.
    records: Vec<&'r Record<P>>,

    /// Why the group was dropped.
    reason: DropReason,
}

impl<'r, P> Dropped<'r, P> {
    /// Creates a new [`Dropped`].
    pub(crate) fn new(
        secondary_locus: Locus,
        records: Vec<&'r Record<P>>,
        reason: DropReason,
    ) -> Self {
        Self {
            secondary_locus,
            records,
            reason,
        }
    }

    /// Gets the secondary locus covered by the group.
    pub fn secondary_locus(&self) -> &Locus {
        &self.secondary_locus
    }

    /// Gets the records left out.
    pub fn records(&self) -> &[&'r Record<P>] {
        &self.records
    }

    /// Gets why the group was dropped.
    pub fn reason(&self) -> DropReason {
        self.reason
    }
}

/// The placed and dropped groups of one placement pass.
#[derive(Debug)]
pub struct Layout<'r, P> {
    /// The placed groups in placement order.
    groups: Vec<MergedGroup<'r, P>>,

    /// The groups that could not be placed.
    dropped: Vec<Dropped<'r, P>>,

    /// The scale of the pass.
    bases_per_pixel: f64,

    /// The draw width of the pass.
    width: f64,
}

impl<'r, P> Layout<'r, P> {
    /// Creates an empty layout for a pass at the given scale and width.
    pub(crate) fn new(bases_per_pixel: f64, width: f64) -> Self {
        Self {
            groups: Vec::new(),
            dropped: Vec::new(),
            bases_per_pixel,
            width,
        }
    }

    /// Adds a placed group.
    pub(crate) fn push_group(&mut self, group: MergedGroup<'r, P>) {
        self.groups.push(group);
    }

    /// Adds a dropped group.
    pub(crate) fn push_dropped(&mut self, dropped: Dropped<'r, P>) {
        self.dropped.push(dropped);
    }

    /// Gets the placed groups in placement order (longest secondary locus
    /// first).
    pub fn groups(&self) -> &[MergedGroup<'r, P>] {
        &self.groups
    }

    /// Gets the groups, or parts of groups, that could not be placed.
    pub fn dropped(&self) -> &[Dropped<'r, P>] {
        &self.dropped
    }

    /// Returns whether no groups were placed.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Builds a coordinate space for the secondary genome out of the placed
    /// groups.
    ///
    /// Groups are laid out left to right by their draw spans. The pixel
    /// distance before each group, and after the last group up to the draw
    /// width, becomes a gap segment of the equivalent number of bases
    /// (rounded up).
    ///
    /// # Examples
    ///
    /// ```
    /// use omics::coordinate::Strand;
    /// use tracklayout::alignment::Placer;
    /// use tracklayout::alignment::Record;
    /// use tracklayout::draw::DrawProjector;
    /// use tracklayout::space::CoordinateSpace;
    /// use tracklayout::span::AddressSpan;
    ///
    /// let space = CoordinateSpace::from_chromosomes("hg38", [("chr1", 1_000)])?;
    /// let projector = DrawProjector::try_new(&space, AddressSpan::new(0, 1_000), 1_000.0)?;
    ///
    /// let records = vec![Record::new(
    ///     "chr1:100-200".parse()?,
    ///     "chr7:5000-5100".parse()?,
    ///     Strand::Positive,
    ///     (),
    /// )];
    ///
    /// let layout = Placer::default().place(&records, &projector);
    /// let secondary = layout.secondary_space("mm10")?;
    ///
    /// assert_eq!(
    ///     secondary.to_string(),
    ///     "mm10: <gap:100>, chr7:5000-5100, <gap:800>"
    /// );
    /// assert_eq!(secondary.total_length(), 1_000);
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn secondary_space(&self, name: impl Into<String>) -> Result<CoordinateSpace> {
        let mut groups = self.groups.iter().collect::<Vec<_>>();
        groups.sort_by(|a, b| a.pixel_span.start.total_cmp(&b.pixel_span.start));

        let mut segments = Vec::with_capacity(groups.len() * 2 + 1);
        let mut x = 0.0;

        for group in groups {
            let bases = self.bases_per_pixel * (group.pixel_span.start - x);
            if bases > 0.0 {
                segments.push(Segment::try_gap(bases.ceil() as Number).map_err(Error::Space)?);
            }

            segments.push(Segment::Feature(group.secondary_locus.clone()));
            x = group.pixel_span.end;
        }

        let bases = self.bases_per_pixel * (self.width - x);
        if bases > 0.0 {
            segments.push(Segment::try_gap(bases.ceil() as Number).map_err(Error::Space)?);
        }

        CoordinateSpace::try_new(name, segments).map_err(Error::Space)
    }
}
