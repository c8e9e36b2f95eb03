//! Placement of merged alignment groups in draw space.

use nonempty::NonEmpty;
use tracing::debug;
use tracing::trace;

use crate::alignment::Allocator;
use crate::alignment::Builder;
use crate::alignment::DropReason;
use crate::alignment::Dropped;
use crate::alignment::Layout;
use crate::alignment::MARGIN;
use crate::alignment::MERGE_PIXEL_DISTANCE;
use crate::alignment::MIN_DRAW_WIDTH;
use crate::alignment::MergedGroup;
use crate::alignment::PlacedRecord;
use crate::alignment::Record;
use crate::alignment::merge;
use crate::draw::DrawProjector;
use crate::span::PixelSpan;

/// Groups paired-genome records by secondary proximity and places each group
/// without overlapping the others.
///
/// Generally, you will want to use a [`Builder`] (via [`Placer::builder()`])
/// to construct one of these.
#[derive(Clone, Copy, Debug)]
pub struct Placer {
    /// The distance, in pixels, within which secondary loci are merged.
    merge_pixel_distance: f64,

    /// The space, in pixels, kept free around each placed group.
    margin: f64,

    /// The minimum width, in pixels, of a group worth drawing.
    min_draw_width: f64,

    /// The visible pixel window, if it differs from the full draw width.
    view: Option<PixelSpan>,
}

impl Default for Placer {
    fn default() -> Self {
        Self::new(MERGE_PIXEL_DISTANCE, MARGIN, MIN_DRAW_WIDTH, None)
    }
}

impl Placer {
    /// Creates a new [`Placer`] from validated parameters.
    pub(crate) fn new(
        merge_pixel_distance: f64,
        margin: f64,
        min_draw_width: f64,
        view: Option<PixelSpan>,
    ) -> Self {
        Self {
            merge_pixel_distance,
            margin,
            min_draw_width,
            view,
        }
    }

    /// Creates a [`Builder`] with the default parameters.
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Gets the distance, in pixels, within which secondary loci are merged.
    pub fn merge_pixel_distance(&self) -> f64 {
        self.merge_pixel_distance
    }

    /// Gets the space, in pixels, kept free around each placed group.
    pub fn margin(&self) -> f64 {
        self.margin
    }

    /// Gets the minimum width, in pixels, of a group worth drawing.
    pub fn min_draw_width(&self) -> f64 {
        self.min_draw_width
    }

    /// Gets the configured visible pixel window, if any.
    pub fn view(&self) -> Option<PixelSpan> {
        self.view
    }

    /// Shifts `proposal` into `view`, keeping its width.
    fn shift_into(&self, proposal: PixelSpan, view: &PixelSpan) -> PixelSpan {
        let width = proposal.len();

        if proposal.start < view.start {
            let start = view.start + self.margin;
            PixelSpan::new(start, start + width)
        } else if proposal.end > view.end {
            let end = view.end - self.margin;
            PixelSpan::new(end - width, end)
        } else {
            proposal
        }
    }

    /// Places `records` as drawn by `projector`.
    ///
    /// Groups that are too narrow to draw, or whose primary loci are not
    /// represented in the projector's space, are reported in
    /// [`Layout::dropped()`]. So are the records of a placed group whose own
    /// primary locus is not represented in the space; every record ends up
    /// either as a member of a group or in the dropped list.
    pub fn place<'r, P>(
        &self,
        records: &'r [Record<P>],
        projector: &DrawProjector<'_>,
    ) -> Layout<'r, P> {
        let bases_per_pixel = projector.bases_per_pixel();
        let mut layout = Layout::new(bases_per_pixel, projector.width());

        if records.is_empty() {
            return layout;
        }

        let view = self
            .view
            .unwrap_or_else(|| PixelSpan::new(0.0, projector.width()));

        let mut merges = merge::merge(records, self.merge_pixel_distance * bases_per_pixel);
        merges.sort_by(|a, b| b.locus.len().cmp(&a.locus.len()));

        let mut allocator = Allocator::new(self.margin);

        for merge in merges {
            let draw_width = projector.pixel_span_length(merge.locus.len());

            if draw_width < self.min_draw_width {
                trace!("dropping {}: {draw_width:.2}px wide", merge.locus);
                layout.push_dropped(Dropped::new(
                    merge.locus,
                    merge.records,
                    DropReason::TooNarrow,
                ));
                continue;
            }

            let mut primaries = Vec::new();
            let mut unmapped = Vec::new();

            for record in merge.records.iter().copied() {
                let spans = projector.space().to_address(record.primary());

                if spans.is_empty() {
                    unmapped.push(record);
                    continue;
                }

                primaries.extend(
                    spans
                        .into_iter()
                        .map(|span| (record, projector.address_span_to_pixels(&span))),
                );
            }

            let Some(primaries) = NonEmpty::from_vec(primaries) else {
                trace!("dropping {}: no primary locus in the space", merge.locus);
                layout.push_dropped(Dropped::new(
                    merge.locus,
                    merge.records,
                    DropReason::NotInSpace,
                ));
                continue;
            };

            if !unmapped.is_empty() {
                trace!(
                    "dropping {} of the records in {}: no primary locus in the space",
                    unmapped.len(),
                    merge.locus
                );
                layout.push_dropped(Dropped::new(
                    merge.locus.clone(),
                    unmapped,
                    DropReason::NotInSpace,
                ));
            }

            let center = centroid(primaries.iter().map(|(_, span)| span));
            let proposal = PixelSpan::new(center - 0.5 * draw_width, center + 0.5 * draw_width);
            let span = allocator.place(self.shift_into(proposal, &view));

            let origin = merge.locus.start();
            let members = primaries.map(|(record, primary_span)| {
                let secondary = record.secondary();
                let start = span.start + projector.pixel_span_length(secondary.start() - origin);
                let end = start + projector.pixel_span_length(secondary.len());
                PlacedRecord::new(record, primary_span, PixelSpan::new(start, end))
            });

            layout.push_group(MergedGroup::new(merge.locus, span, members));
        }

        debug!(
            "placed {} alignment groups from {} records ({} dropped)",
            layout.groups().len(),
            records.len(),
            layout.dropped().len()
        );

        layout
    }
}

/// Computes the length-weighted center of `spans`.
fn centroid<'a>(spans: impl Iterator<Item = &'a PixelSpan>) -> f64 {
    let (numerator, denominator) = spans.fold((0.0, 0.0), |(numerator, denominator), span| {
        (
            numerator + span.center() * span.len(),
            denominator + span.len(),
        )
    });

    numerator / denominator
}
