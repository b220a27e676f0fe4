// Document export: layout + PDF serialization, and the HTTP handlers on top.

pub mod handlers;
pub mod pdf;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::layout::{render_document, LayoutError, MeasurementProvider, PageConfig};
use crate::models::resume::ResumeDocument;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("PDF serialization failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("PDF write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// A `pdfB64` payload that cannot be served as a download.
#[derive(Debug, Error)]
pub enum SuppliedPdfError {
    #[error("pdfB64 is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("pdfB64 does not decode to a PDF: {0}")]
    NotPdf(#[from] lopdf::Error),
}

/// A finished download.
#[derive(Debug, Clone)]
pub struct RenderedPdf {
    pub render_id: Uuid,
    pub file_name: String,
    pub page_count: usize,
    pub bytes: Vec<u8>,
}

/// Lays out and serializes `doc` in one synchronous pass.
///
/// CPU-bound: call from `tokio::task::spawn_blocking`.
pub fn render_pdf(
    render_id: Uuid,
    doc: &ResumeDocument,
    config: &PageConfig,
    metrics: &dyn MeasurementProvider,
    compress: bool,
) -> Result<RenderedPdf, RenderError> {
    let laid_out = render_document(doc, config, metrics)?;
    let bytes = pdf::export_pdf(&laid_out, config, compress)?;

    info!(
        %render_id,
        pages = laid_out.page_count(),
        file = %laid_out.file_name,
        bytes = bytes.len(),
        "document rendered"
    );

    Ok(RenderedPdf {
        render_id,
        file_name: laid_out.file_name,
        page_count: laid_out.pages.len(),
        bytes,
    })
}

/// Serves a PDF the analysis service already produced, unchanged.
///
/// Whitespace inside the base64 text (line-wrapped payloads) is ignored. The
/// bytes must parse as a PDF so the page count header is real.
pub fn supplied_pdf(
    render_id: Uuid,
    encoded: &str,
    file_name: String,
) -> Result<RenderedPdf, SuppliedPdfError> {
    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD.decode(compact)?;
    let page_count = lopdf::Document::load_mem(&bytes)?.get_pages().len();

    info!(
        %render_id,
        pages = page_count,
        file = %file_name,
        bytes = bytes.len(),
        "serving supplied PDF"
    );

    Ok(RenderedPdf {
        render_id,
        file_name,
        page_count,
        bytes,
    })
}
