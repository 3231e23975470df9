//! A surface that records drawing operations instead of producing a file.

use image::{DynamicImage, GenericImageView};

use super::{ShapePaint, Surface, TextAnchor, TextStyle};
use crate::fonts::builtin::BuiltinMetrics;
use crate::fonts::{FontWeight, TextMetrics};
use crate::layout::geometry::{Point, Rect};
use crate::layout::theme::Rgb;

/// One recorded drawing call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    NewPage,
    FillRect {
        rect: Rect,
        color: Rgb,
    },
    Line {
        from: Point,
        to: Point,
        color: Rgb,
        width_pt: f64,
    },
    Circle {
        center: Point,
        radius: f64,
        paint: ShapePaint,
    },
    RoundedRect {
        rect: Rect,
        radius: f64,
        paint: ShapePaint,
    },
    Text {
        text: String,
        at: Point,
        style: TextStyle,
        anchor: TextAnchor,
    },
    Image {
        rect: Rect,
        pixels: (u32, u32),
        backdrop: Rgb,
    },
    PushClipCircle {
        center: Point,
        radius: f64,
    },
    PopClip,
}

/// Surface keeping every operation in order, tagged with the page it landed on.
#[derive(Debug)]
pub struct RecordingSurface {
    ops: Vec<(usize, DrawOp)>,
    pages: usize,
    metrics: BuiltinMetrics,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSurface {
    /// Creates a surface positioned on its first page.
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            pages: 1,
            metrics: BuiltinMetrics,
        }
    }

    /// Every recorded operation with its page number.
    pub fn ops(&self) -> &[(usize, DrawOp)] {
        &self.ops
    }

    /// Returns whether nothing was drawn.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Text runs in drawing order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|(_, op)| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Text runs drawn on `page`.
    pub fn texts_on_page(&self, page: usize) -> Vec<&str> {
        self.ops
            .iter()
            .filter(|(op_page, _)| *op_page == page)
            .filter_map(|(_, op)| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Number of text runs equal to `text`.
    pub fn count_text(&self, text: &str) -> usize {
        self.texts().into_iter().filter(|run| *run == text).count()
    }

    /// Target rectangles of every placed image with their page numbers.
    pub fn images(&self) -> Vec<(usize, Rect)> {
        self.ops
            .iter()
            .filter_map(|(page, op)| match op {
                DrawOp::Image { rect, .. } => Some((*page, *rect)),
                _ => None,
            })
            .collect()
    }

    /// Number of operations matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&DrawOp) -> bool) -> usize {
        self.ops.iter().filter(|(_, op)| predicate(op)).count()
    }

    fn record(&mut self, op: DrawOp) {
        self.ops.push((self.pages, op));
    }
}

impl TextMetrics for RecordingSurface {
    fn text_width(&self, text: &str, weight: FontWeight, size_pt: f64) -> f64 {
        self.metrics.text_width(text, weight, size_pt)
    }
}

impl Surface for RecordingSurface {
    fn new_page(&mut self) {
        self.pages += 1;
        self.record(DrawOp::NewPage);
    }

    fn page_count(&self) -> usize {
        self.pages
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        self.record(DrawOp::FillRect { rect, color });
    }

    fn line(&mut self, from: Point, to: Point, color: Rgb, width_pt: f64) {
        self.record(DrawOp::Line {
            from,
            to,
            color,
            width_pt,
        });
    }

    fn circle(&mut self, center: Point, radius: f64, paint: ShapePaint) {
        self.record(DrawOp::Circle {
            center,
            radius,
            paint,
        });
    }

    fn rounded_rect(&mut self, rect: Rect, radius: f64, paint: ShapePaint) {
        self.record(DrawOp::RoundedRect {
            rect,
            radius,
            paint,
        });
    }

    fn text(&mut self, text: &str, at: Point, style: TextStyle, anchor: TextAnchor) {
        self.record(DrawOp::Text {
            text: text.to_string(),
            at,
            style,
            anchor,
        });
    }

    fn image(&mut self, image: &DynamicImage, rect: Rect, backdrop: Rgb) {
        self.record(DrawOp::Image {
            rect,
            pixels: image.dimensions(),
            backdrop,
        });
    }

    fn push_clip_circle(&mut self, center: Point, radius: f64) {
        self.record(DrawOp::PushClipCircle { center, radius });
    }

    fn pop_clip(&mut self) {
        self.record(DrawOp::PopClip);
    }
}
