//! `tracklayout` is a crate for deciding where genomic features go on screen.
//!
//! The crate is the computational core of a genome browser track: it
//! linearizes a (possibly discontiguous) set of genomic regions into a single
//! address space, scales that address space into pixels, and resolves
//! collisions among features that compete for the same horizontal space. It
//! never draws anything itself.
//!
//! The facilities, from the leaves up, are:
//!
//! - [`index::IntervalIndex`], a centered interval tree supporting point and
//!   range overlap queries over half-open integer intervals.
//! - [`space::CoordinateSpace`], an ordered list of genomic
//!   [segments](space::Segment) (and synthetic gaps) forming one linear
//!   address space, with mappings between [`Locus`]es and addresses.
//! - [`draw::DrawProjector`], which maps a visible window of a coordinate space
//!   onto a pixel range and places [features](draw::Feature) (and their
//!   sub-segments) within it.
//! - [`alignment::Placer`], which merges paired-genome
//!   [records](alignment::Record) by proximity in the secondary genome and
//!   assigns each merged group a non-overlapping span in primary draw space.
//!
//! ## Placing features
//!
//! Below is a representative example of building a coordinate space out of two
//! regions of the genome, projecting it across 1,000 pixels, and placing a
//! feature that straddles both regions.
//!
//! ```
//! use tracklayout::draw::DrawProjector;
//! use tracklayout::draw::Feature;
//! use tracklayout::space::Builder;
//! use tracklayout::span::AddressSpan;
//!
//! let space = Builder::new("view")
//!     .push_feature("chr1:1,000-2,000".parse()?)
//!     .push_gap(500)?
//!     .push_feature("chr1:5,000-6,500".parse()?)
//!     .try_build()?;
//!
//! let window = AddressSpan::new(0, space.total_length());
//! let projector = DrawProjector::try_new(&space, window, 1_000.0)?;
//! assert_eq!(projector.bases_per_pixel(), 3.0);
//!
//! let features = vec![Feature::new("chr1:1,500-5,300".parse()?).with_name("gene")];
//! for placement in projector.place_features(&features) {
//!     println!(
//!         "{} -> {}",
//!         placement.address_span(),
//!         placement.pixel_span()
//!     );
//! }
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Placing alignments
//!
//! When the features are alignments to a second genome, an
//! [`alignment::Placer`] groups them and lays the groups out so that they do
//! not overlap. The placed groups can in turn be converted into a coordinate
//! space for the second genome.
//!
//! ```
//! use omics::coordinate::Strand;
//! use tracklayout::alignment::Placer;
//! use tracklayout::alignment::Record;
//! use tracklayout::draw::DrawProjector;
//! use tracklayout::space::CoordinateSpace;
//! use tracklayout::span::AddressSpan;
//!
//! let space = CoordinateSpace::from_chromosomes("hg38", [("chr1", 10_000)])?;
//! let projector = DrawProjector::try_new(&space, AddressSpan::new(0, 10_000), 1_000.0)?;
//!
//! let records = vec![
//!     Record::new(
//!         "chr1:1000-2000".parse()?,
//!         "chr3:40000-41000".parse()?,
//!         Strand::Positive,
//!         1,
//!     ),
//!     Record::new(
//!         "chr1:2500-3000".parse()?,
//!         "chr3:41500-42000".parse()?,
//!         Strand::Positive,
//!         2,
//!     ),
//! ];
//!
//! let layout = Placer::default().place(&records, &projector);
//! assert_eq!(layout.groups().len(), 1);
//!
//! let secondary = layout.secondary_space("mm10")?;
//! assert_eq!(secondary.features().count(), 1);
//!
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]
#![warn(missing_debug_implementations)]
#![warn(clippy::missing_docs_in_private_items)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod alignment;
pub mod draw;
pub mod index;
pub mod locus;
pub mod space;
pub mod span;

pub use locus::Locus;
