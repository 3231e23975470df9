//! Layout engine of the CV document.
//!
//! The engine is split the way the page is: [`sidebar`] draws the identity
//! panel, [`cards`] the titled sections of the content column and
//! [`gallery`] the trailing evidence grid.  [`PageFlow`] owns the running
//! cursor of the content column and decides when a block has to move to a
//! new page.

use log::debug;

use crate::layout::geometry::{LayoutState, Point};
use crate::surface::{Surface, TextAnchor, TextStyle};

pub mod cards;
pub mod gallery;
pub mod geometry;
pub mod sidebar;
pub mod theme;
pub mod wrap;

use sidebar::Sidebar;

/// Pagination control of the sidebar pages.
///
/// Every page break triggered here redraws the sidebar, so all content pages
/// carry the identity panel.
pub struct PageFlow<'a> {
    sidebar: Sidebar<'a>,
    state: LayoutState,
}

impl<'a> PageFlow<'a> {
    /// Starts at the top of the first page; the caller has already drawn its sidebar.
    pub fn new(sidebar: Sidebar<'a>) -> Self {
        Self {
            sidebar,
            state: LayoutState::first_page(),
        }
    }

    /// Current layout state.
    pub fn state(&self) -> LayoutState {
        self.state
    }

    /// Baseline of the next line.
    pub fn cursor(&self) -> f64 {
        self.state.cursor
    }

    /// Moves the cursor down by `amount` millimetres.
    pub fn advance(&mut self, amount: f64) {
        self.state.advance(amount);
    }

    /// Starts a new page when less than `required` millimetres are left.
    ///
    /// Returns whether a page break happened.
    pub fn ensure_space<S: Surface + ?Sized>(&mut self, surface: &mut S, required: f64) -> bool {
        if self.state.fits(required) {
            return false;
        }

        surface.new_page();
        self.sidebar.draw(surface);
        self.state.next_page();
        debug!(
            "page break before a {:.1} mm block, continuing on page {}",
            required, self.state.page
        );
        true
    }
}

/// Draws pre-wrapped `lines` from baseline `y` downwards and returns the baseline after the last one.
pub(crate) fn draw_lines<S: Surface + ?Sized>(
    surface: &mut S,
    lines: &[String],
    x: f64,
    mut y: f64,
    style: TextStyle,
    leading: f64,
) -> f64 {
    for line in lines {
        surface.text(line, Point::new(x, y), style, TextAnchor::Start);
        y += leading;
    }
    y
}

/// Wraps `text` to `max_width` and draws it; returns the baseline after the last line.
///
/// Blank text draws nothing and leaves the baseline at `at.y`.
pub(crate) fn draw_wrapped<S: Surface + ?Sized>(
    surface: &mut S,
    text: &str,
    at: Point,
    max_width: f64,
    style: TextStyle,
    leading: f64,
) -> f64 {
    if text.trim().is_empty() {
        return at.y;
    }
    let lines = wrap::wrap_text(&*surface, text, style.weight, style.size_pt, max_width);
    draw_lines(surface, &lines, at.x, at.y, style, leading)
}

/// Uppercases a heading; non-ASCII letters are handled by `str::to_uppercase`.
pub(crate) fn heading(text: &str) -> String {
    text.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::geometry::{content_bottom, CONTINUATION_TOP};
    use crate::model::Profile;
    use crate::surface::recording::{DrawOp, RecordingSurface};

    #[test]
    fn ensure_space_breaks_only_when_needed() {
        let profile = Profile::default();
        let photo = sidebar::SidebarPhoto::Absent;
        let mut surface = RecordingSurface::new();
        let mut flow = PageFlow::new(Sidebar::new(&profile, &photo));

        assert!(!flow.ensure_space(&mut surface, 100.0));
        assert!(surface.is_empty());

        flow.advance(content_bottom() - flow.cursor() - 5.0);
        assert!(flow.ensure_space(&mut surface, 10.0));
        assert_eq!(surface.page_count(), 2);
        assert_eq!(flow.state().page, 2);
        assert_eq!(flow.cursor(), CONTINUATION_TOP);
        assert!(matches!(surface.ops()[0], (2, DrawOp::NewPage)));
        assert!(surface.count(|op| matches!(op, DrawOp::FillRect { .. })) >= 1);
    }

    #[test]
    fn blank_text_draws_nothing() {
        let mut surface = RecordingSurface::new();
        let style = TextStyle::regular(10.0, theme::TEXT);
        let end = draw_wrapped(&mut surface, " \n ", Point::new(90.0, 50.0), 112.0, style, 5.0);
        assert_eq!(end, 50.0);
        assert!(surface.is_empty());
    }

    #[test]
    fn headings_uppercase_accented_letters() {
        assert_eq!(heading(" Formación y Cursos "), "FORMACIÓN Y CURSOS");
    }
}
