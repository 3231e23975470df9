//! Identity panel drawn on the left of every content page.

use log::warn;

use super::geometry::{Point, Rect, PAGE_HEIGHT, SIDEBAR_WIDTH};
use super::theme;
use super::{draw_wrapped, heading};
use crate::fonts::pt_to_mm;
use crate::images::{fit_centered, load_image, ImageOutcome, ImageStore};
use crate::model::Profile;
use crate::surface::{ShapePaint, Surface, TextAnchor, TextStyle};

const TOP: f64 = 15.0;
const PHOTO_RADIUS: f64 = 22.0;
const PHOTO_RING_PT: f64 = 2.0;
const PHOTO_GAP: f64 = 10.0;
const NO_PHOTO_OFFSET: f64 = 20.0;
const NAME_LEADING: f64 = 7.0;
const NAME_GAP: f64 = 10.0;
const INNER_X: f64 = 8.0;
const INNER_WIDTH: f64 = SIDEBAR_WIDTH - 2.0 * INNER_X;
const HEADER_RULE_OFFSET: f64 = 2.0;
const HEADER_GAP: f64 = 8.0;
const LABEL_GAP: f64 = 4.0;
const FIELD_GAP: f64 = 4.0;
const VALUE_LEADING_PT: f64 = 12.0;

const HEADER: &str = "INFORMACIÓN PERSONAL";

/// The profile photograph, loaded once per document.
#[derive(Debug)]
pub enum SidebarPhoto {
    /// The profile has no photograph.
    Absent,
    /// The photograph was fetched and decoded, or skipped with a reason.
    Loaded(ImageOutcome),
}

impl SidebarPhoto {
    /// Loads the photograph of `profile`; never touches the store when there is none.
    pub fn load(profile: &Profile, store: &dyn ImageStore) -> Self {
        let Some(reference) = profile.photo() else {
            return Self::Absent;
        };

        let outcome = load_image(store, reference);
        if let ImageOutcome::Skipped(reason) = &outcome {
            warn!("profile photo {reference} left out: {reason}");
        }
        Self::Loaded(outcome)
    }

    /// Summary of the photo state for reports.
    pub fn status(&self) -> PhotoStatus {
        match self {
            Self::Absent => PhotoStatus::Absent,
            Self::Loaded(ImageOutcome::Decoded(_)) => PhotoStatus::Drawn,
            Self::Loaded(ImageOutcome::Skipped(_)) => PhotoStatus::Skipped,
        }
    }
}

/// Whether the profile photograph made it onto the pages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhotoStatus {
    Absent,
    Drawn,
    Skipped,
}

/// Renders the sidebar from the profile data; drawing it twice yields identical output.
#[derive(Clone, Copy)]
pub struct Sidebar<'a> {
    profile: &'a Profile,
    photo: &'a SidebarPhoto,
}

impl<'a> Sidebar<'a> {
    pub fn new(profile: &'a Profile, photo: &'a SidebarPhoto) -> Self {
        Self { profile, photo }
    }

    /// Draws the panel on the current page and returns the baseline below the last field.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) -> f64 {
        surface.fill_rect(Rect::new(0.0, 0.0, SIDEBAR_WIDTH, PAGE_HEIGHT), theme::SIDEBAR);

        let mut y = self.draw_photo(surface, TOP);
        y = self.draw_name(surface, y);
        self.draw_fields(surface, y)
    }

    fn draw_photo<S: Surface + ?Sized>(&self, surface: &mut S, y: f64) -> f64 {
        let image = match self.photo {
            SidebarPhoto::Loaded(ImageOutcome::Decoded(image)) => image,
            _ => return y + NO_PHOTO_OFFSET,
        };

        let center = Point::new(SIDEBAR_WIDTH / 2.0, y + PHOTO_RADIUS);
        let frame = Rect::new(
            center.x - PHOTO_RADIUS,
            y,
            2.0 * PHOTO_RADIUS,
            2.0 * PHOTO_RADIUS,
        );

        surface.push_clip_circle(center, PHOTO_RADIUS);
        surface.image(image, fit_centered(image, frame), theme::SIDEBAR);
        surface.pop_clip();
        surface.circle(
            center,
            PHOTO_RADIUS,
            ShapePaint::stroke(theme::ACCENT, PHOTO_RING_PT),
        );

        y + 2.0 * PHOTO_RADIUS + PHOTO_GAP
    }

    fn draw_name<S: Surface + ?Sized>(&self, surface: &mut S, mut y: f64) -> f64 {
        let style = TextStyle::bold(16.0, theme::SIDEBAR_TEXT);
        let parts = [&self.profile.first_names, &self.profile.last_names];
        for part in parts.into_iter().filter(|part| !part.trim().is_empty()) {
            surface.text(
                &heading(part),
                Point::new(SIDEBAR_WIDTH / 2.0, y),
                style,
                TextAnchor::Center,
            );
            y += NAME_LEADING;
        }
        y + NAME_GAP
    }

    fn draw_fields<S: Surface + ?Sized>(&self, surface: &mut S, mut y: f64) -> f64 {
        surface.text(
            HEADER,
            Point::new(INNER_X, y),
            TextStyle::bold(10.0, theme::ACCENT),
            TextAnchor::Start,
        );
        surface.line(
            Point::new(INNER_X, y + HEADER_RULE_OFFSET),
            Point::new(SIDEBAR_WIDTH - INNER_X, y + HEADER_RULE_OFFSET),
            theme::ACCENT,
            1.0,
        );
        y += HEADER_GAP;

        let label_style = TextStyle::bold(8.0, theme::SIDEBAR_LABEL);
        let value_style = TextStyle::regular(9.0, theme::SIDEBAR_TEXT);
        for (label, value) in self.profile.personal_fields() {
            surface.text(
                &heading(label),
                Point::new(INNER_X, y),
                label_style,
                TextAnchor::Start,
            );
            y += LABEL_GAP;
            y = draw_wrapped(
                surface,
                &value,
                Point::new(INNER_X, y),
                INNER_WIDTH,
                value_style,
                pt_to_mm(VALUE_LEADING_PT),
            );
            y += FIELD_GAP;
        }
        y
    }
}
