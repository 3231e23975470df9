//! Drawing surfaces the layout engine renders onto.
//!
//! [`Surface`] is the narrow canvas API the renderers need.  [`pdf::PdfSurface`]
//! writes a real document through `printpdf`; [`recording::RecordingSurface`]
//! keeps a list of operations, which is what the layout tests inspect.

use image::DynamicImage;

use crate::fonts::{FontWeight, TextMetrics};
use crate::layout::geometry::{Point, Rect};
use crate::layout::theme::Rgb;

pub mod pdf;
pub mod recording;

/// Font, size and colour of a text run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub weight: FontWeight,
    pub size_pt: f64,
    pub color: Rgb,
}

impl TextStyle {
    pub const fn regular(size_pt: f64, color: Rgb) -> Self {
        Self {
            weight: FontWeight::Regular,
            size_pt,
            color,
        }
    }

    pub const fn bold(size_pt: f64, color: Rgb) -> Self {
        Self {
            weight: FontWeight::Bold,
            size_pt,
            color,
        }
    }
}

/// Horizontal placement of a text run relative to its anchor point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAnchor {
    /// The anchor is the left end of the baseline.
    Start,
    /// The anchor is the middle of the baseline.
    Center,
}

/// Paint applied to a closed shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapePaint {
    pub fill: Option<Rgb>,
    pub stroke: Option<(Rgb, f64)>,
}

impl ShapePaint {
    pub const fn fill(color: Rgb) -> Self {
        Self {
            fill: Some(color),
            stroke: None,
        }
    }

    pub const fn stroke(color: Rgb, width_pt: f64) -> Self {
        Self {
            fill: None,
            stroke: Some((color, width_pt)),
        }
    }

    pub const fn fill_and_stroke(fill: Rgb, stroke: Rgb, width_pt: f64) -> Self {
        Self {
            fill: Some(fill),
            stroke: Some((stroke, width_pt)),
        }
    }
}

/// A fixed-size page canvas with a top-left millimetre coordinate system.
///
/// A surface starts on its first page; [`Surface::new_page`] appends another
/// one and makes it current.
pub trait Surface: TextMetrics {
    /// Appends a page and directs further drawing to it.
    fn new_page(&mut self);

    /// Number of pages created so far.
    fn page_count(&self) -> usize;

    /// Fills an axis-aligned rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Rgb);

    /// Strokes a straight line.
    fn line(&mut self, from: Point, to: Point, color: Rgb, width_pt: f64);

    /// Paints a circle.
    fn circle(&mut self, center: Point, radius: f64, paint: ShapePaint);

    /// Paints a rectangle with rounded corners.
    fn rounded_rect(&mut self, rect: Rect, radius: f64, paint: ShapePaint);

    /// Draws a single line of text with its baseline at `at.y`.
    fn text(&mut self, text: &str, at: Point, style: TextStyle, anchor: TextAnchor);

    /// Places `image` stretched over `rect`; transparent pixels show `backdrop`.
    fn image(&mut self, image: &DynamicImage, rect: Rect, backdrop: Rgb);

    /// Restricts drawing to a circle until the matching [`Surface::pop_clip`].
    fn push_clip_circle(&mut self, center: Point, radius: f64);

    /// Removes the innermost clip region.
    fn pop_clip(&mut self);
}

/// Control points of a circle as four cubic Bézier arcs, starting at the rightmost point.
///
/// Each arc is `(control_1, control_2, end)`.
pub(crate) fn circle_arcs(center: Point, radius: f64) -> (Point, [(Point, Point, Point); 4]) {
    const KAPPA: f64 = 0.552_284_749_8;
    let k = radius * KAPPA;
    let (cx, cy) = (center.x, center.y);
    let start = Point::new(cx + radius, cy);
    let arcs = [
        (
            Point::new(cx + radius, cy + k),
            Point::new(cx + k, cy + radius),
            Point::new(cx, cy + radius),
        ),
        (
            Point::new(cx - k, cy + radius),
            Point::new(cx - radius, cy + k),
            Point::new(cx - radius, cy),
        ),
        (
            Point::new(cx - radius, cy - k),
            Point::new(cx - k, cy - radius),
            Point::new(cx, cy - radius),
        ),
        (
            Point::new(cx + k, cy - radius),
            Point::new(cx + radius, cy - k),
            start,
        ),
    ];
    (start, arcs)
}
