//! A builder for a [`Placer`].

use crate::alignment::Error;
use crate::alignment::MARGIN;
use crate::alignment::MERGE_PIXEL_DISTANCE;
use crate::alignment::MIN_DRAW_WIDTH;
use crate::alignment::Placer;
use crate::span::PixelSpan;

/// A [`Result`](std::result::Result) with an [`Error`].
type Result<T> = std::result::Result<T, Error>;

/// A builder for a [`Placer`].
#[derive(Clone, Copy, Debug)]
pub struct Builder {
    /// The distance, in pixels, within which secondary loci are merged.
    merge_pixel_distance: f64,

    /// The space, in pixels, kept free around each placed group.
    margin: f64,

    /// The minimum width, in pixels, of a group worth drawing.
    min_draw_width: f64,

    /// The visible pixel window, if it differs from the full draw width.
    view: Option<PixelSpan>,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            merge_pixel_distance: MERGE_PIXEL_DISTANCE,
            margin: MARGIN,
            min_draw_width: MIN_DRAW_WIDTH,
            view: None,
        }
    }
}

impl Builder {
    /// Sets the distance, in pixels, within which secondary loci are merged.
    pub fn merge_pixel_distance(mut self, pixels: f64) -> Self {
        self.merge_pixel_distance = pixels;
        self
    }

    /// Sets the space, in pixels, kept free around each placed group.
    pub fn margin(mut self, pixels: f64) -> Self {
        self.margin = pixels;
        self
    }

    /// Sets the minimum width, in pixels, of a group worth drawing.
    pub fn min_draw_width(mut self, pixels: f64) -> Self {
        self.min_draw_width = pixels;
        self
    }

    /// Sets the visible pixel window that proposals are shifted into.
    ///
    /// By default, this is `[0, width)` of the projector used for placement.
    pub fn view(mut self, view: PixelSpan) -> Self {
        self.view = Some(view);
        self
    }

    /// Consumes `self` to attempt to build a [`Placer`].
    ///
    /// # Examples
    ///
    /// ```
    /// use tracklayout::alignment::Placer;
    /// use tracklayout::span::PixelSpan;
    ///
    /// let placer = Placer::builder()
    ///     .merge_pixel_distance(50.0)
    ///     .view(PixelSpan::new(100.0, 900.0))
    ///     .try_build()?;
    /// assert_eq!(placer.merge_pixel_distance(), 50.0);
    /// assert_eq!(placer.margin(), 5.0);
    ///
    /// assert!(Placer::builder().margin(-1.0).try_build().is_err());
    /// assert!(
    ///     Placer::builder()
    ///         .view(PixelSpan::new(10.0, 10.0))
    ///         .try_build()
    ///         .is_err()
    /// );
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn try_build(self) -> Result<Placer> {
        for (name, value) in [
            ("merge pixel distance", self.merge_pixel_distance),
            ("margin", self.margin),
            ("minimum draw width", self.min_draw_width),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidParameter(name, value));
            }
        }

        if let Some(view) = self.view {
            if view.is_empty() || !view.start.is_finite() || !view.end.is_finite() {
                return Err(Error::InvalidView(view));
            }
        }

        Ok(Placer::new(
            self.merge_pixel_distance,
            self.margin,
            self.min_draw_width,
            self.view,
        ))
    }
}
