//! Page geometry and the running layout state.
//!
//! All coordinates are millimetres with the origin at the top-left corner of
//! the page and `y` growing downwards; the PDF surface converts them into PDF
//! user space.

/// A4 page width.
pub const PAGE_WIDTH: f64 = 210.0;
/// A4 page height.
pub const PAGE_HEIGHT: f64 = 297.0;
/// Width of the identity sidebar on every content page.
pub const SIDEBAR_WIDTH: f64 = 70.0;
/// Gap between the sidebar and the content column.
pub const CONTENT_GAP: f64 = 10.0;
/// Right margin of the content column.
pub const RIGHT_MARGIN: f64 = 8.0;
/// Space kept free at the bottom of content pages.
pub const BOTTOM_MARGIN: f64 = 10.0;
/// Cursor position of the first content line on page one.
pub const FIRST_PAGE_TOP: f64 = 15.0;
/// Cursor position of the first content line on continuation pages.
pub const CONTINUATION_TOP: f64 = 25.0;

/// Left edge of the content column.
pub const fn content_x() -> f64 {
    SIDEBAR_WIDTH + CONTENT_GAP
}

/// Width of the content column.
pub const fn content_width() -> f64 {
    PAGE_WIDTH - content_x() - RIGHT_MARGIN
}

/// Lowest cursor position content may reach.
pub const fn content_bottom() -> f64 {
    PAGE_HEIGHT - BOTTOM_MARGIN
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle given by its top-left corner and size.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Transient position of the writer inside the document.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutState {
    /// 1-based number of the current page.
    pub page: usize,
    /// Baseline of the next line to draw.
    pub cursor: f64,
}

impl LayoutState {
    /// State at the top of the first page.
    pub fn first_page() -> Self {
        Self {
            page: 1,
            cursor: FIRST_PAGE_TOP,
        }
    }

    /// Vertical space left before the bottom margin.
    pub fn remaining(&self) -> f64 {
        content_bottom() - self.cursor
    }

    /// Returns whether a block of `height` fits below the cursor.
    pub fn fits(&self, height: f64) -> bool {
        height <= self.remaining()
    }

    /// Moves the cursor down by `amount`.
    pub fn advance(&mut self, amount: f64) {
        self.cursor += amount;
    }

    /// Moves to the top of a new continuation page.
    pub fn next_page(&mut self) {
        self.page += 1;
        self.cursor = CONTINUATION_TOP;
    }
}

impl Default for LayoutState {
    fn default() -> Self {
        Self::first_page()
    }
}
