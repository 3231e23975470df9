//! Two-column evidence gallery appended after the content pages.

use log::{debug, warn};

use super::geometry::{Point, Rect, PAGE_HEIGHT, PAGE_WIDTH};
use super::{draw_wrapped, theme};
use crate::evidence::Evidence;
use crate::fonts::pt_to_mm;
use crate::images::{fit_centered, load_image, ImageOutcome, ImageStore};
use crate::surface::{ShapePaint, Surface, TextAnchor, TextStyle};

const BANNER_HEIGHT: f64 = 25.0;
const BANNER_BASELINE: f64 = 15.0;
const BANNER_TITLE: &str = "GALERÍA DE EVIDENCIAS";
const CONTINUATION_BANNER_HEIGHT: f64 = 15.0;
const CONTINUATION_BASELINE: f64 = 10.0;
const CONTINUATION_TITLE: &str = "Galería (cont.)";

const MARGIN: f64 = 15.0;
const GUTTER: f64 = 10.0;
const COLUMN_WIDTH: f64 = (PAGE_WIDTH - 2.0 * MARGIN - GUTTER) / 2.0;
const ROW_HEIGHT: f64 = 75.0;
const ROW_ADVANCE: f64 = 80.0;
const FIRST_ROW_TOP: f64 = 35.0;
const CONTINUATION_ROW_TOP: f64 = 25.0;

const CARD_RADIUS_PT: f64 = 8.0;
const IMAGE_INSET: f64 = 2.0;
const IMAGE_ZONE_HEIGHT: f64 = 45.0;
const CAPTION_OFFSET: f64 = 50.0;
const CAPTION_INSET: f64 = 3.0;
const LABEL_GAP: f64 = 4.0;
const LABEL_LEADING_PT: f64 = 10.0;

/// Outcome of drawing the evidence gallery.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GallerySummary {
    /// Images drawn into their cards.
    pub placed: usize,
    /// Cards drawn with caption only because the image could not be used.
    pub skipped: usize,
    /// Grid rows used, `ceil(entries / 2)`.
    pub rows: usize,
    /// Pages used by the gallery.
    pub pages: usize,
    /// Page holding the main banner.
    pub first_page: usize,
}

/// Draws every evidence entry into a two-column grid starting on a new page.
///
/// Failing images never stop the gallery: the card and its caption are
/// drawn and the image area stays empty.
pub fn draw_gallery<S: Surface + ?Sized>(
    surface: &mut S,
    images: &dyn ImageStore,
    entries: &[Evidence],
) -> GallerySummary {
    surface.new_page();
    let mut summary = GallerySummary {
        pages: 1,
        first_page: surface.page_count(),
        ..GallerySummary::default()
    };

    surface.fill_rect(Rect::new(0.0, 0.0, PAGE_WIDTH, BANNER_HEIGHT), theme::SIDEBAR);
    surface.text(
        BANNER_TITLE,
        Point::new(PAGE_WIDTH / 2.0, BANNER_BASELINE),
        TextStyle::bold(18.0, theme::WHITE),
        TextAnchor::Center,
    );

    let mut y = FIRST_ROW_TOP;
    for (index, entry) in entries.iter().enumerate() {
        let column = index % 2;

        if column == 0 && y + ROW_HEIGHT > PAGE_HEIGHT - MARGIN {
            continuation_page(surface);
            summary.pages += 1;
            y = CONTINUATION_ROW_TOP;
        }

        let x = MARGIN + column as f64 * (COLUMN_WIDTH + GUTTER);
        if draw_entry(surface, images, entry, Point::new(x, y)) {
            summary.placed += 1;
        } else {
            summary.skipped += 1;
        }

        if column == 1 || index + 1 == entries.len() {
            y += ROW_ADVANCE;
            summary.rows += 1;
        }
    }

    debug!(
        "gallery placed {} of {} images in {} rows over {} pages",
        summary.placed,
        entries.len(),
        summary.rows,
        summary.pages
    );
    summary
}

fn continuation_page<S: Surface + ?Sized>(surface: &mut S) {
    surface.new_page();
    surface.fill_rect(
        Rect::new(0.0, 0.0, PAGE_WIDTH, CONTINUATION_BANNER_HEIGHT),
        theme::SIDEBAR,
    );
    surface.text(
        CONTINUATION_TITLE,
        Point::new(MARGIN, CONTINUATION_BASELINE),
        TextStyle::bold(12.0, theme::WHITE),
        TextAnchor::Start,
    );
}

/// Draws one gallery card at `origin`; returns whether its image was placed.
fn draw_entry<S: Surface + ?Sized>(
    surface: &mut S,
    images: &dyn ImageStore,
    entry: &Evidence,
    origin: Point,
) -> bool {
    surface.rounded_rect(
        Rect::new(origin.x, origin.y, COLUMN_WIDTH, ROW_HEIGHT),
        pt_to_mm(CARD_RADIUS_PT),
        ShapePaint::fill_and_stroke(theme::CARD_FILL, theme::CARD_BORDER, 1.0),
    );

    let placed = match load_image(images, &entry.image) {
        ImageOutcome::Decoded(image) => {
            let zone = Rect::new(
                origin.x + IMAGE_INSET,
                origin.y + IMAGE_INSET,
                COLUMN_WIDTH - 2.0 * IMAGE_INSET,
                IMAGE_ZONE_HEIGHT,
            );
            surface.image(&image, fit_centered(&image, zone), theme::CARD_FILL);
            true
        }
        ImageOutcome::Skipped(reason) => {
            warn!("evidence image {} left out: {}", entry.image, reason);
            false
        }
    };

    let caption_x = origin.x + CAPTION_INSET;
    let caption_y = origin.y + CAPTION_OFFSET;
    surface.text(
        entry.section,
        Point::new(caption_x, caption_y),
        TextStyle::bold(9.0, theme::TITLE),
        TextAnchor::Start,
    );
    draw_wrapped(
        surface,
        &entry.label,
        Point::new(caption_x, caption_y + LABEL_GAP),
        COLUMN_WIDTH - 2.0 * CAPTION_INSET,
        TextStyle::regular(8.0, theme::TEXT),
        pt_to_mm(LABEL_LEADING_PT),
    );

    placed
}
