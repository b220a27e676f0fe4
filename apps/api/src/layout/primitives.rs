//! Drawing primitives over a single render's cursor and page list.

use serde::Serialize;

use crate::layout::cursor::{DrawOp, Page, PageCursor};
use crate::layout::error::LayoutError;
use crate::layout::font_metrics::{Font, MeasurementProvider, BULLET_GLYPH};
use crate::layout::page_config::PageConfig;

/// Horizontal placement of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Align {
    /// `x` as given.
    Left,
    /// Flush against the right margin.
    Right,
    /// Centered on the page.
    Center,
}

/// A single styled string drawn at one baseline.
#[derive(Debug, Clone, Copy)]
pub struct Run<'a> {
    pub text: &'a str,
    pub font: Font,
}

impl<'a> Run<'a> {
    pub fn new(text: &'a str, font: Font) -> Self {
        Self { text, font }
    }
}

/// Mutable state of one render: the page cursor plus the read-only
/// configuration and metrics it consults.
///
/// A context is created per render and consumed by [`RenderContext::finish`];
/// nothing is shared between renders.
pub struct RenderContext<'a> {
    config: &'a PageConfig,
    metrics: &'a dyn MeasurementProvider,
    cursor: PageCursor,
}

impl<'a> RenderContext<'a> {
    pub fn new(config: &'a PageConfig, metrics: &'a dyn MeasurementProvider) -> Self {
        let cursor = PageCursor::new(config.page_height, config.margin, config.margin);
        Self {
            config,
            metrics,
            cursor,
        }
    }

    pub fn config(&self) -> &'a PageConfig {
        self.config
    }

    pub fn y(&self) -> f32 {
        self.cursor.current_y()
    }

    pub fn page_count(&self) -> usize {
        self.cursor.page_count()
    }

    pub fn ops_emitted(&self) -> usize {
        self.cursor.pages().iter().map(|p| p.ops.len()).sum()
    }

    pub fn ensure_space(&mut self, height: f32) -> bool {
        self.cursor.ensure_space(height)
    }

    pub fn advance(&mut self, height: f32) {
        self.cursor.advance(height);
    }

    pub fn measure(&self, text: &str, font: Font) -> Result<f32, LayoutError> {
        self.metrics.measure_width(text, font)
    }

    pub fn wrap(&self, text: &str, font: Font, max_width: f32) -> Result<Vec<String>, LayoutError> {
        self.metrics.wrap_to_lines(text, font, max_width)
    }

    /// Draws `text` with its x position resolved from `align`.
    ///
    /// Pre-wrapped content (embedded newlines) produces one op per physical
    /// line, spaced by the configured line height.
    pub fn draw_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        font: Font,
        align: Align,
    ) -> Result<(), LayoutError> {
        for (i, line) in text.split('\n').enumerate() {
            let line_x = match align {
                Align::Left => x,
                Align::Right => self.config.right_edge() - self.measure(line, font)?,
                Align::Center => (self.config.page_width - self.measure(line, font)?) / 2.0,
            };
            self.cursor.push(DrawOp::Text {
                text: line.to_string(),
                x: line_x,
                y: y + i as f32 * self.config.line_height,
                font,
            });
        }
        Ok(())
    }

    /// Draws already wrapped lines left-aligned at `x`, one line height apart.
    pub fn draw_lines(&mut self, lines: &[String], x: f32, y: f32, font: Font) {
        for (i, line) in lines.iter().enumerate() {
            self.cursor.push(DrawOp::Text {
                text: line.clone(),
                x,
                y: y + i as f32 * self.config.line_height,
                font,
            });
        }
    }

    /// Horizontal line across the content width.
    pub fn draw_rule(&mut self, y: f32) {
        self.cursor.push(DrawOp::Rule {
            x1: self.config.margin,
            x2: self.config.right_edge(),
            y,
            weight: self.config.rule_weight,
        });
    }

    /// Left runs laid end to end from the margin, optional right run flush
    /// against the right margin, all on baseline `y`.
    pub fn paired_line(
        &mut self,
        left: &[Run<'_>],
        right: Option<Run<'_>>,
        y: f32,
    ) -> Result<(), LayoutError> {
        let mut x = self.config.margin;
        for run in left {
            self.draw_text(run.text, x, y, run.font, Align::Left)?;
            x += self.measure(run.text, run.font)?;
        }
        if let Some(run) = right {
            self.draw_text(run.text, 0.0, y, run.font, Align::Right)?;
        }
        Ok(())
    }

    /// Wrapped bullet point at `indent` from the margin.
    ///
    /// The wrapped line count is measured before the space check, so the
    /// whole bullet moves to the next page when it does not fit. A blank
    /// bullet still draws its marker and takes one line. Returns the number
    /// of lines consumed.
    pub fn bullet_block(&mut self, text: &str, indent: f32) -> Result<usize, LayoutError> {
        let font = self.config.body();
        let gutter = self.config.bullet_gutter;
        let max_width = self.config.content_width() - indent - gutter;

        let lines = self.wrap(text, font, max_width)?;
        let line_count = lines.len().max(1);
        let height = line_count as f32 * self.config.line_height;

        self.ensure_space(height);
        let y = self.y();
        let marker_x = self.config.margin + indent;
        self.draw_text(BULLET_GLYPH, marker_x, y, font, Align::Left)?;
        self.draw_lines(&lines, marker_x + gutter, y, font);
        self.advance(height);
        Ok(line_count)
    }

    /// Hands over the finished pages, consuming the context.
    pub fn finish(self) -> Vec<Page> {
        self.cursor.into_pages()
    }
}
