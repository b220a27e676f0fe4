//! Document assembly: header, then every non-empty section in fixed order.

use serde::Serialize;
use tracing::debug;

use crate::layout::cursor::Page;
use crate::layout::error::LayoutError;
use crate::layout::font_metrics::MeasurementProvider;
use crate::layout::page_config::PageConfig;
use crate::layout::primitives::RenderContext;
use crate::layout::sections::{render_header, render_section, SectionKind};
use crate::models::resume::ResumeDocument;

/// A finished, paginated document ready for export.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaidOutDocument {
    pub file_name: String,
    pub title: String,
    /// Sections that produced output, in document order.
    pub sections: Vec<SectionKind>,
    pub pages: Vec<Page>,
}

impl LaidOutDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Lays out `doc` into pages.
///
/// Runs synchronously to completion on a fresh render context. On error the
/// partial pages are discarded.
pub fn render_document(
    doc: &ResumeDocument,
    config: &PageConfig,
    metrics: &dyn MeasurementProvider,
) -> Result<LaidOutDocument, LayoutError> {
    let mut ctx = RenderContext::new(config, metrics);
    render_header(&mut ctx, doc)?;

    let mut sections = Vec::new();
    for kind in SectionKind::ORDER {
        if render_section(&mut ctx, kind, doc)? {
            sections.push(kind);
        } else {
            debug!(section = kind.title(), "section empty, skipped");
        }
    }

    Ok(LaidOutDocument {
        file_name: export_file_name(&doc.full_name),
        title: doc.full_name.clone(),
        sections,
        pages: ctx.finish(),
    })
}

/// `"<Full Name>"` → `"Full_Name_Resume.pdf"`; each run of whitespace becomes
/// one underscore.
pub fn export_file_name(full_name: &str) -> String {
    let mut stem = String::with_capacity(full_name.len());
    let mut in_space = false;
    for c in full_name.chars() {
        if c.is_whitespace() {
            if !in_space {
                stem.push('_');
            }
            in_space = true;
        } else {
            stem.push(c);
            in_space = false;
        }
    }
    format!("{stem}_Resume.pdf")
}
