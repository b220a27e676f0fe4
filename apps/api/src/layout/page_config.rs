use serde::{Deserialize, Serialize};

use crate::layout::font_metrics::Font;

/// Fixed layout parameters, read-only for a whole render.
///
/// All values are in points. The coordinate origin is the top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    pub page_width: f32,
    pub page_height: f32,
    /// Applied on all four sides.
    pub margin: f32,
    /// Baseline-to-baseline distance for wrapped body text.
    pub line_height: f32,
    pub name_size: f32,
    pub contact_size: f32,
    pub heading_size: f32,
    pub body_size: f32,
    pub rule_weight: f32,
    /// Distance from the left margin to the bullet marker.
    pub bullet_indent: f32,
    /// Distance from the bullet marker to its text.
    pub bullet_gutter: f32,
}

/// US Letter, half-inch margins, 11pt body.
pub fn default_page_config() -> PageConfig {
    PageConfig {
        page_width: 612.0,
        page_height: 792.0,
        margin: 36.0,
        line_height: 13.0,
        name_size: 24.0,
        contact_size: 11.0,
        heading_size: 12.0,
        body_size: 11.0,
        rule_weight: 0.5,
        bullet_indent: 10.0,
        bullet_gutter: 10.0,
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        default_page_config()
    }
}

impl PageConfig {
    /// Page width minus both side margins.
    pub fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }

    pub fn right_edge(&self) -> f32 {
        self.page_width - self.margin
    }

    pub fn body(&self) -> Font {
        Font::normal(self.body_size)
    }

    pub fn body_bold(&self) -> Font {
        Font::bold(self.body_size)
    }

    pub fn body_italic(&self) -> Font {
        Font::italic(self.body_size)
    }

    pub fn heading(&self) -> Font {
        Font::bold(self.heading_size)
    }
}
