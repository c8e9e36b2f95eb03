//! Proximity-based placement of paired-genome alignments.
//!
//! Given a batch of [`Record`]s, each aligning a locus of the primary
//! (displayed) genome to a locus of a secondary genome, a [`Placer`] produces
//! a [`Layout`] in primary draw space:
//!
//! 1. Records whose secondary loci lie within a resolution-dependent distance
//!    of each other are merged into groups.
//! 2. Groups are visited from the longest secondary locus to the shortest.
//! 3. Each record's primary locus is projected into draw space.
//! 4. Each group is proposed at the weighted centroid of its primary spans,
//!    shifted into the visible pixel window, and handed to an [`Allocator`]
//!    that moves it aside if it collides with a group placed earlier.
//! 5. Each record's secondary locus is positioned inside its group's span.
//!
//! The placed groups can then be turned back into a
//! [`CoordinateSpace`](crate::space::CoordinateSpace) for
//! the secondary genome with [`Layout::secondary_space()`].
//!
//! ```
//! use omics::coordinate::Strand;
//! use tracklayout::alignment::Placer;
//! use tracklayout::alignment::Record;
//! use tracklayout::draw::DrawProjector;
//! use tracklayout::space::CoordinateSpace;
//! use tracklayout::span::AddressSpan;
//!
//! let space = CoordinateSpace::from_chromosomes("hg38", [("chr1", 1_000)])?;
//! let projector = DrawProjector::try_new(&space, AddressSpan::new(0, 1_000), 1_000.0)?;
//!
//! let records = vec![
//!     Record::new(
//!         "chr1:100-200".parse()?,
//!         "chr7:0-100".parse()?,
//!         Strand::Positive,
//!         "a",
//!     ),
//!     Record::new(
//!         "chr1:170-230".parse()?,
//!         "chr9:0-60".parse()?,
//!         Strand::Positive,
//!         "b",
//!     ),
//! ];
//!
//! let layout = Placer::builder().margin(0.0).try_build()?.place(&records, &projector);
//! let spans = layout
//!     .groups()
//!     .iter()
//!     .map(|group| (group.pixel_span().start, group.pixel_span().end))
//!     .collect::<Vec<_>>();
//!
//! assert_eq!(spans, vec![(100.0, 200.0), (200.0, 260.0)]);
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::space;
use crate::span::PixelSpan;

mod allocator;
mod builder;
mod layout;
mod merge;
mod placer;
mod record;

pub use allocator::Allocator;
pub use builder::Builder;
pub use layout::DropReason;
pub use layout::Dropped;
pub use layout::Layout;
pub use layout::MergedGroup;
pub use layout::PlacedRecord;
pub use placer::Placer;
pub use record::Record;

/// The default distance, in pixels, within which secondary loci are merged.
pub const MERGE_PIXEL_DISTANCE: f64 = 200.0;

/// The default space, in pixels, kept free around each placed group.
pub const MARGIN: f64 = 5.0;

/// The default minimum width, in pixels, of a group worth drawing.
pub const MIN_DRAW_WIDTH: f64 = 5.0;

/// An error related to placing alignments.
#[derive(Debug, PartialEq)]
pub enum Error {
    /// A placement parameter was negative or not finite.
    InvalidParameter(&'static str, f64),

    /// The visible pixel window was empty or not finite.
    InvalidView(PixelSpan),

    /// An error building a coordinate space.
    Space(space::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidParameter(name, value) => {
                write!(
                    f,
                    "invalid parameter: {name} must be finite and non-negative, found {value}"
                )
            }
            Error::InvalidView(view) => write!(f, "invalid view: {view}"),
            Error::Space(err) => write!(f, "coordinate space error: {err}"),
        }
    }
}

impl std::error::Error for Error {}
