//! Page collection and the vertical write position on the current page.

use serde::Serialize;
use tracing::debug;

use crate::layout::font_metrics::Font;

/// One drawing operation. `y` is measured from the top edge of the page; for
/// text it is the baseline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DrawOp {
    Text { text: String, x: f32, y: f32, font: Font },
    Rule { x1: f32, x2: f32, y: f32, weight: f32 },
}

/// A page of the output. Pages are only ever appended.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Page {
    pub index: usize,
    pub ops: Vec<DrawOp>,
}

/// Owns the page list and the write position on the last page.
///
/// `current_y` never decreases while a page is active and resets to
/// `top_margin` exactly when a new page is started.
#[derive(Debug)]
pub struct PageCursor {
    pages: Vec<Page>,
    current_y: f32,
    top_margin: f32,
    bottom_limit: f32,
}

impl PageCursor {
    /// Starts with a single blank page and the cursor at the top margin.
    pub fn new(page_height: f32, top_margin: f32, bottom_margin: f32) -> Self {
        Self {
            pages: vec![Page::default()],
            current_y: top_margin,
            top_margin,
            bottom_limit: page_height - bottom_margin,
        }
    }

    pub fn current_y(&self) -> f32 {
        self.current_y
    }

    #[cfg(test)]
    pub fn current_page_index(&self) -> usize {
        self.pages.len() - 1
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// True if a block of `height` still fits above the bottom margin.
    pub fn fits(&self, height: f32) -> bool {
        self.current_y + height <= self.bottom_limit
    }

    /// Starts a new page unless a block of `height` fits on the current one.
    ///
    /// Must be called before the ops of the block are emitted. Returns whether
    /// a page break happened.
    pub fn ensure_space(&mut self, height: f32) -> bool {
        if self.fits(height) {
            return false;
        }
        self.new_page();
        true
    }

    /// Appends a blank page and moves the cursor to its top margin.
    pub fn new_page(&mut self) {
        let index = self.pages.len();
        debug!(page = index, from_y = self.current_y, "starting new page");
        self.pages.push(Page {
            index,
            ops: Vec::new(),
        });
        self.current_y = self.top_margin;
    }

    pub fn advance(&mut self, height: f32) {
        self.current_y += height.max(0.0);
    }

    /// Appends an op to the page that is active right now.
    pub fn push(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn into_pages(self) -> Vec<Page> {
        self.pages
    }
}
