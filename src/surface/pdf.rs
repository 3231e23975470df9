//! `printpdf` backed surface producing the final document bytes.

use std::fmt;
use std::io::{BufWriter, Cursor};

use image::{DynamicImage, RgbImage};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference,
};

use super::{circle_arcs, ShapePaint, Surface, TextAnchor, TextStyle};
use crate::error::ExportError;
use crate::fonts::builtin::fold_text;
use crate::fonts::{FontWeight, LoadedFonts, TextMetrics};
use crate::images::{natural_size_mm, DEFAULT_IMAGE_DPI};
use crate::layout::geometry::{Point, Rect, PAGE_HEIGHT, PAGE_WIDTH};
use crate::layout::theme::Rgb;

const LAYER_NAME: &str = "Contenido";

fn pdf_error(err: impl fmt::Display) -> ExportError {
    ExportError::Pdf(err.to_string())
}

fn color(rgb: Rgb) -> Color {
    let (r, g, b) = rgb.unit();
    Color::Rgb(printpdf::Rgb::new(r, g, b, None))
}

fn point(p: Point) -> printpdf::Point {
    printpdf::Point::new(Mm(p.x), Mm(PAGE_HEIGHT - p.y))
}

/// Blends `image` over an opaque `backdrop` and drops the alpha channel.
fn flatten_onto(image: &DynamicImage, backdrop: Rgb) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }

    let rgba = image.to_rgba8();
    let Rgb(base_r, base_g, base_b) = backdrop;
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let alpha = u16::from(a);
        let blend = |channel: u8, base: u8| {
            ((u16::from(channel) * alpha + u16::from(base) * (255 - alpha) + 127) / 255) as u8
        };
        image::Rgb([blend(r, base_r), blend(g, base_g), blend(b, base_b)])
    })
}

/// Surface writing A4 pages into a `printpdf` document.
pub struct PdfSurface {
    document: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    fonts: LoadedFonts,
    pages: usize,
}

impl PdfSurface {
    /// Creates a document with one empty page and registers `fonts` with it.
    pub fn new(title: &str, fonts: LoadedFonts) -> Result<Self, ExportError> {
        let (document, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER_NAME);

        let (regular, bold) = match &fonts {
            LoadedFonts::Bundled { regular, bold, .. } => (
                document
                    .add_external_font(Cursor::new(regular.clone()))
                    .map_err(pdf_error)?,
                document
                    .add_external_font(Cursor::new(bold.clone()))
                    .map_err(pdf_error)?,
            ),
            LoadedFonts::Builtin => (
                document
                    .add_builtin_font(BuiltinFont::Helvetica)
                    .map_err(pdf_error)?,
                document
                    .add_builtin_font(BuiltinFont::HelveticaBold)
                    .map_err(pdf_error)?,
            ),
        };

        let layer = document.get_page(page).get_layer(layer);
        Ok(Self {
            document,
            layer,
            regular,
            bold,
            fonts,
            pages: 1,
        })
    }

    /// Serializes the document.
    pub fn finish(self) -> Result<Vec<u8>, ExportError> {
        let mut writer = BufWriter::new(Vec::new());
        self.document.save(&mut writer).map_err(pdf_error)?;
        writer.into_inner().map_err(|err| pdf_error(err.error()))
    }

    fn font(&self, weight: FontWeight) -> &IndirectFontRef {
        match weight {
            FontWeight::Regular => &self.regular,
            FontWeight::Bold => &self.bold,
        }
    }

    fn apply_paint(&self, paint: ShapePaint) {
        if let Some(fill) = paint.fill {
            self.layer.set_fill_color(color(fill));
        }
        if let Some((stroke, width)) = paint.stroke {
            self.layer.set_outline_color(color(stroke));
            self.layer.set_outline_thickness(width);
        }
    }

    fn add_path(&self, points: Vec<(printpdf::Point, bool)>, paint: ShapePaint, clip: bool) {
        self.layer.add_shape(Line {
            points,
            is_closed: true,
            has_fill: paint.fill.is_some(),
            has_stroke: paint.stroke.is_some(),
            is_clipping_path: clip,
        });
    }

    // printpdf flags a point `true` when the point after it is a Bézier
    // handle: a curve is `start(true) c1(true) c2(false) end`.
    fn circle_path(center: Point, radius: f64) -> Vec<(printpdf::Point, bool)> {
        let (start, arcs) = circle_arcs(center, radius);
        let mut points = vec![(point(start), true)];
        for (first, second, end) in arcs {
            points.push((point(first), true));
            points.push((point(second), false));
            points.push((point(end), true));
        }
        points
    }

    fn rounded_rect_path(rect: Rect, radius: f64) -> Vec<(printpdf::Point, bool)> {
        let r = radius.min(rect.width / 2.0).min(rect.height / 2.0).max(0.0);
        let k = r * (1.0 - 0.552_284_749_8);
        let (left, top, right, bottom) = (rect.x, rect.y, rect.right(), rect.bottom());

        let corner = |anchor: Point, c1: Point, c2: Point, end: Point| {
            [
                (point(anchor), true),
                (point(c1), true),
                (point(c2), false),
                (point(end), false),
            ]
        };

        let mut points = Vec::with_capacity(16);
        points.extend(corner(
            Point::new(right - r, top),
            Point::new(right - k, top),
            Point::new(right, top + k),
            Point::new(right, top + r),
        ));
        points.extend(corner(
            Point::new(right, bottom - r),
            Point::new(right, bottom - k),
            Point::new(right - k, bottom),
            Point::new(right - r, bottom),
        ));
        points.extend(corner(
            Point::new(left + r, bottom),
            Point::new(left + k, bottom),
            Point::new(left, bottom - k),
            Point::new(left, bottom - r),
        ));
        points.extend(corner(
            Point::new(left, top + r),
            Point::new(left, top + k),
            Point::new(left + k, top),
            Point::new(left + r, top),
        ));
        points
    }
}

impl TextMetrics for PdfSurface {
    fn text_width(&self, text: &str, weight: FontWeight, size_pt: f64) -> f64 {
        self.fonts.text_width(text, weight, size_pt)
    }
}

impl Surface for PdfSurface {
    fn new_page(&mut self) {
        let (page, layer) =
            self.document
                .add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER_NAME);
        self.layer = self.document.get_page(page).get_layer(layer);
        self.pages += 1;
    }

    fn page_count(&self) -> usize {
        self.pages
    }

    fn fill_rect(&mut self, rect: Rect, fill: Rgb) {
        self.layer.set_fill_color(color(fill));
        let corners = [
            Point::new(rect.x, rect.y),
            Point::new(rect.right(), rect.y),
            Point::new(rect.right(), rect.bottom()),
            Point::new(rect.x, rect.bottom()),
        ];
        let points = corners.iter().map(|corner| (point(*corner), false)).collect();
        self.add_path(points, ShapePaint::fill(fill), false);
    }

    fn line(&mut self, from: Point, to: Point, stroke: Rgb, width_pt: f64) {
        self.layer.set_outline_color(color(stroke));
        self.layer.set_outline_thickness(width_pt);
        self.layer.add_shape(Line {
            points: vec![(point(from), false), (point(to), false)],
            is_closed: false,
            has_fill: false,
            has_stroke: true,
            is_clipping_path: false,
        });
    }

    fn circle(&mut self, center: Point, radius: f64, paint: ShapePaint) {
        self.apply_paint(paint);
        self.add_path(Self::circle_path(center, radius), paint, false);
    }

    fn rounded_rect(&mut self, rect: Rect, radius: f64, paint: ShapePaint) {
        self.apply_paint(paint);
        self.add_path(Self::rounded_rect_path(rect, radius), paint, false);
    }

    fn text(&mut self, text: &str, at: Point, style: TextStyle, anchor: TextAnchor) {
        let text = if self.fonts.is_builtin() {
            fold_text(text)
        } else {
            text.to_string()
        };
        let x = match anchor {
            TextAnchor::Start => at.x,
            TextAnchor::Center => at.x - self.text_width(&text, style.weight, style.size_pt) / 2.0,
        };

        self.layer.set_fill_color(color(style.color));
        self.layer.use_text(
            text,
            style.size_pt,
            Mm(x),
            Mm(PAGE_HEIGHT - at.y),
            self.font(style.weight),
        );
    }

    fn image(&mut self, image: &DynamicImage, rect: Rect, backdrop: Rgb) {
        let (natural_width, natural_height) = natural_size_mm(image, DEFAULT_IMAGE_DPI);
        if natural_width <= f64::EPSILON || natural_height <= f64::EPSILON {
            return;
        }

        let flattened = DynamicImage::ImageRgb8(flatten_onto(image, backdrop));
        printpdf::Image::from_dynamic_image(&flattened).add_to_layer(
            self.layer.clone(),
            Some(Mm(rect.x)),
            Some(Mm(PAGE_HEIGHT - rect.bottom())),
            None,
            Some(rect.width / natural_width),
            Some(rect.height / natural_height),
            Some(DEFAULT_IMAGE_DPI),
        );
    }

    fn push_clip_circle(&mut self, center: Point, radius: f64) {
        self.layer.save_graphics_state();
        self.add_path(
            Self::circle_path(center, radius),
            ShapePaint {
                fill: None,
                stroke: None,
            },
            true,
        );
    }

    fn pop_clip(&mut self) {
        self.layer.restore_graphics_state();
    }
}
