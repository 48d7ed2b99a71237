//! Page model for the record sheet
//!
//! Coordinates are PDF points with the origin at the bottom-left corner of an
//! A4 page. A [`Layout`] keeps a running vertical cursor; callers draw at the
//! cursor and move it down. Page breaks are only considered where the caller
//! asks for them via [`Layout::check_page_break`].

/// A4 width in points
pub const PAGE_WIDTH: f32 = 595.2756;
/// A4 height in points
pub const PAGE_HEIGHT: f32 = 841.8898;

/// Left edge for text and rules
pub const LEFT_MARGIN: f32 = 40.0;
/// Cursor position below which a new page is started
pub const BOTTOM_MARGIN: f32 = 80.0;
/// Distance from the top edge where the cursor restarts on a new page
pub const CONTINUATION_TOP: f32 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

/// Something drawn on a page
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Text {
        x: f32,
        y: f32,
        size: f32,
        weight: FontWeight,
        text: String,
    },
    /// Horizontal rule spanning the page between the margins
    Rule { y: f32 },
}

#[derive(Debug, Clone, Default)]
pub struct Page {
    pub elements: Vec<Element>,
}

impl Page {
    /// Text drawn on this page, in drawing order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(|e| match e {
            Element::Text { text, .. } => Some(text.as_str()),
            Element::Rule { .. } => None,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Layout {
    pages: Vec<Page>,
    y: f32,
    /// Set when the cursor crossed the bottom margin; the break is taken
    /// before the next draw or move so a finished document never ends on
    /// an empty page
    break_pending: bool,
}

impl Layout {
    /// Start a document with one page and the cursor at `start_y`
    pub fn new(start_y: f32) -> Self {
        Self {
            pages: vec![Page::default()],
            y: start_y,
            break_pending: false,
        }
    }

    pub fn cursor(&self) -> f32 {
        self.y
    }

    /// Draw text at the cursor without moving it
    pub fn text(&mut self, x: f32, size: f32, weight: FontWeight, text: impl Into<String>) {
        self.take_pending_break();
        let y = self.y;
        self.current_page().elements.push(Element::Text {
            x,
            y,
            size,
            weight,
            text: text.into(),
        });
    }

    /// Draw a horizontal rule at the cursor
    pub fn rule(&mut self) {
        self.take_pending_break();
        let y = self.y;
        self.current_page().elements.push(Element::Rule { y });
    }

    /// Move the cursor down by `dy`
    pub fn advance(&mut self, dy: f32) {
        self.take_pending_break();
        self.y -= dy;
    }

    /// Schedule a new page if the cursor is below the bottom margin
    pub fn check_page_break(&mut self) {
        if self.y < BOTTOM_MARGIN {
            self.break_pending = true;
        }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All text in document order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flat_map(Page::texts)
    }

    fn take_pending_break(&mut self) {
        if self.break_pending {
            self.break_pending = false;
            self.pages.push(Page::default());
            self.y = PAGE_HEIGHT - CONTINUATION_TOP;
        }
    }

    fn current_page(&mut self) -> &mut Page {
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }
}
