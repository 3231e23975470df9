//! Titled sections of the content column, one timeline card per item.

use log::debug;

use super::geometry::{content_width, content_x, Point, RIGHT_MARGIN, PAGE_WIDTH};
use super::wrap::explicit_line_count;
use super::{draw_wrapped, heading, theme, PageFlow};
use crate::fonts::pt_to_mm;
use crate::model::{SectionItem, SectionKind};
use crate::sections::SectionDescriptor;
use crate::surface::{ShapePaint, Surface, TextAnchor, TextStyle};

const TITLE_BLOCK: f64 = 25.0;
const TITLE_RULE_OFFSET: f64 = 2.5;
const ACCENT_RULE_LENGTH: f64 = 12.0;
const DIVIDER_START: f64 = 14.0;
const TITLE_ADVANCE: f64 = 12.0;

const CARD_BASE_HEIGHT: f64 = 15.0;
const CARD_LINE_HEIGHT: f64 = 5.0;
const CARD_INDENT: f64 = 10.0;
const CARD_TITLE_GAP: f64 = 5.0;
const BODY_LEADING_PT: f64 = 14.0;
const CONNECTOR_X_OFFSET: f64 = 2.0;
const CONNECTOR_TOP: f64 = 5.0;
const CONNECTOR_TAIL: f64 = 2.0;
const BULLET_OFFSET: f64 = 6.5;
const BULLET_RADIUS: f64 = 1.2;
const CARD_GAP: f64 = 6.0;

/// Summary of one section drawn into the content column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedSection {
    pub kind: SectionKind,
    pub title: &'static str,
    pub cards: usize,
    /// Page holding the section title.
    pub first_page: usize,
}

/// Space a card asks for before it is drawn.
///
/// The estimate only counts explicit lines of the body, so wrapped bodies
/// may run past it; nothing re-checks the space while the card is drawn.
pub fn estimate_card_height(body: &str) -> f64 {
    CARD_BASE_HEIGHT + CARD_LINE_HEIGHT * explicit_line_count(body) as f64
}

/// Draws a section heading with its accent rule and divider.
pub fn draw_section_title<S: Surface + ?Sized>(surface: &mut S, flow: &mut PageFlow<'_>, title: &str) {
    flow.ensure_space(surface, TITLE_BLOCK);

    let y = flow.cursor();
    let x = content_x();
    surface.text(
        &heading(title),
        Point::new(x, y),
        TextStyle::bold(14.0, theme::TITLE),
        TextAnchor::Start,
    );

    let rule_y = y + TITLE_RULE_OFFSET;
    surface.line(
        Point::new(x, rule_y),
        Point::new(x + ACCENT_RULE_LENGTH, rule_y),
        theme::ACCENT,
        3.0,
    );
    surface.line(
        Point::new(x + DIVIDER_START, rule_y),
        Point::new(PAGE_WIDTH - RIGHT_MARGIN, rule_y),
        theme::LINE,
        1.0,
    );

    flow.advance(TITLE_ADVANCE);
}

/// Draws one timeline card: bold title, wrapped body, connector line and bullet.
pub fn draw_card<S: Surface + ?Sized>(surface: &mut S, flow: &mut PageFlow<'_>, title: &str, body: &str) {
    flow.ensure_space(surface, estimate_card_height(body));

    let top = flow.cursor();
    let text_x = content_x() + CARD_INDENT;
    surface.text(
        title,
        Point::new(text_x, top),
        TextStyle::bold(11.0, theme::SIDEBAR),
        TextAnchor::Start,
    );

    let body_top = top + CARD_TITLE_GAP;
    let body_end = draw_wrapped(
        surface,
        body,
        Point::new(text_x, body_top),
        content_width() - CARD_INDENT,
        TextStyle::regular(10.0, theme::TEXT),
        pt_to_mm(BODY_LEADING_PT),
    );

    let timeline_x = content_x() + CONNECTOR_X_OFFSET;
    surface.line(
        Point::new(timeline_x, body_top - CONNECTOR_TOP),
        Point::new(timeline_x, body_end - CONNECTOR_TAIL),
        theme::LINE,
        1.0,
    );
    surface.circle(
        Point::new(timeline_x, body_top - BULLET_OFFSET),
        BULLET_RADIUS,
        ShapePaint::fill(theme::ACCENT),
    );

    flow.advance(body_end + CARD_GAP - top);
}

/// Draws a section title followed by a card per item, in the given order.
pub fn draw_section<S: Surface + ?Sized>(
    surface: &mut S,
    flow: &mut PageFlow<'_>,
    descriptor: &SectionDescriptor,
    items: &[SectionItem],
) -> RenderedSection {
    draw_section_title(surface, flow, descriptor.print_title);
    let first_page = flow.state().page;

    for item in items {
        draw_card(surface, flow, descriptor.card_title(item), item.body());
    }

    debug!(
        "section {} rendered with {} cards starting on page {}",
        descriptor.print_title,
        items.len(),
        first_page
    );
    RenderedSection {
        kind: descriptor.kind,
        title: descriptor.print_title,
        cards: items.len(),
        first_page,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::geometry::{content_bottom, CONTINUATION_TOP, FIRST_PAGE_TOP};
    use crate::layout::sidebar::{Sidebar, SidebarPhoto};
    use crate::model::Profile;
    use crate::surface::recording::{DrawOp, RecordingSurface};

    #[test]
    fn card_estimate_counts_explicit_lines() {
        assert_eq!(estimate_card_height(""), 20.0);
        assert_eq!(estimate_card_height("uno\ndos\ntres"), 30.0);
    }

    #[test]
    fn section_draws_title_then_cards_in_order() {
        let profile = Profile::default();
        let photo = SidebarPhoto::Absent;
        let mut surface = RecordingSurface::new();
        let mut flow = PageFlow::new(Sidebar::new(&profile, &photo));

        let items = vec![
            SectionItem::new(3, "Tercero").with_body("c"),
            SectionItem::new(1, "Primero").with_body("a"),
            SectionItem::new(2, "Segundo").with_body("b"),
        ];
        let rendered = draw_section(
            &mut surface,
            &mut flow,
            SectionDescriptor::of(SectionKind::Courses),
            &items,
        );

        assert_eq!(rendered.cards, 3);
        assert_eq!(rendered.first_page, 1);
        assert_eq!(
            surface.texts(),
            ["FORMACIÓN Y CURSOS", "Tercero", "c", "Primero", "a", "Segundo", "b"]
        );
        assert_eq!(
            surface.count(|op| matches!(op, DrawOp::Circle { radius, .. } if *radius == BULLET_RADIUS)),
            3
        );
        assert!(flow.cursor() > FIRST_PAGE_TOP + TITLE_ADVANCE);
    }

    #[test]
    fn card_connector_spans_the_wrapped_body() {
        let profile = Profile::default();
        let photo = SidebarPhoto::Absent;
        let mut surface = RecordingSurface::new();
        let mut flow = PageFlow::new(Sidebar::new(&profile, &photo));

        let body = "palabra ".repeat(60);
        draw_card(&mut surface, &mut flow, "Proyecto", &body);

        let body_lines = surface.texts().len() - 1;
        assert!(body_lines > 1);
        let connector = surface
            .ops()
            .iter()
            .find_map(|(_, op)| match op {
                DrawOp::Line { from, to, .. } if from.x == to.x => Some((*from, *to)),
                _ => None,
            })
            .expect("connector drawn");
        let expected_end = FIRST_PAGE_TOP + CARD_TITLE_GAP
            + body_lines as f64 * pt_to_mm(BODY_LEADING_PT)
            - CONNECTOR_TAIL;
        assert!((connector.1.y - expected_end).abs() < 1e-9);
        assert_eq!(connector.0.y, FIRST_PAGE_TOP);
    }

    #[test]
    fn title_moves_to_next_page_when_space_is_short() {
        let profile = Profile::default();
        let photo = SidebarPhoto::Absent;
        let mut surface = RecordingSurface::new();
        let mut flow = PageFlow::new(Sidebar::new(&profile, &photo));
        flow.advance(content_bottom() - FIRST_PAGE_TOP - 10.0);

        draw_section_title(&mut surface, &mut flow, "Reconocimientos");

        assert_eq!(surface.page_count(), 2);
        let title = surface
            .ops()
            .iter()
            .find_map(|(page, op)| match op {
                DrawOp::Text { text, at, .. } if text == "RECONOCIMIENTOS" => Some((*page, *at)),
                _ => None,
            })
            .expect("title drawn");
        assert_eq!(title, (2, Point::new(content_x(), CONTINUATION_TOP)));
    }
}
