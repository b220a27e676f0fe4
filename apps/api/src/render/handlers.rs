use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderName},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::layout::{export_file_name, render_document, LaidOutDocument};
use crate::models::resume::{AnalysisResult, ResumeDocument};
use crate::render::{render_pdf, supplied_pdf, RenderedPdf};
use crate::state::AppState;

const X_RENDER_ID: HeaderName = HeaderName::from_static("x-render-id");
const X_PAGE_COUNT: HeaderName = HeaderName::from_static("x-page-count");

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutPreviewResponse {
    pub render_id: Uuid,
    pub page_count: usize,
    #[serde(flatten)]
    pub document: LaidOutDocument,
}

/// POST /api/v1/render
pub async fn handle_render_pdf(
    State(state): State<AppState>,
    payload: Result<Json<ResumeDocument>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(doc) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    let rendered = render_in_background(&state, doc).await?;
    Ok(pdf_response(rendered))
}

/// POST /api/v1/render/analysis
///
/// A PDF already present in the envelope is served as is; otherwise the
/// structured résumé (or the placeholder) is rendered.
pub async fn handle_render_analysis(
    State(state): State<AppState>,
    payload: Result<Json<AnalysisResult>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(mut result) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    if let Some(encoded) = result.take_supplied_pdf() {
        let file_name = export_file_name(result.document_name());
        let rendered = tokio::task::spawn_blocking(move || {
            supplied_pdf(Uuid::new_v4(), &encoded, file_name)
        })
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in decode: {e}")))??;
        return Ok(pdf_response(rendered));
    }

    let rendered = render_in_background(&state, result.into_document()).await?;
    Ok(pdf_response(rendered))
}

/// POST /api/v1/render/layout
pub async fn handle_render_layout(
    State(state): State<AppState>,
    payload: Result<Json<ResumeDocument>, JsonRejection>,
) -> Result<Json<LayoutPreviewResponse>, AppError> {
    let Json(doc) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    let render_id = Uuid::new_v4();
    let config = state.page_config.clone();
    let metrics = state.metrics.clone();

    let document = tokio::task::spawn_blocking(move || {
        render_document(&doc, &config, metrics.as_ref())
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in layout: {e}")))?
    .map_err(crate::render::RenderError::from)?;

    tracing::info!(%render_id, pages = document.page_count(), "layout preview rendered");
    Ok(Json(LayoutPreviewResponse {
        render_id,
        page_count: document.page_count(),
        document,
    }))
}

/// Runs layout + PDF export off the async executor.
async fn render_in_background(state: &AppState, doc: ResumeDocument) -> Result<RenderedPdf, AppError> {
    let render_id = Uuid::new_v4();
    let config = state.page_config.clone();
    let metrics = state.metrics.clone();
    let compress = state.config.pdf_compress;

    let rendered = tokio::task::spawn_blocking(move || {
        render_pdf(render_id, &doc, &config, metrics.as_ref(), compress)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in render: {e}")))??;

    Ok(rendered)
}

fn pdf_response(rendered: RenderedPdf) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                content_disposition(&rendered.file_name),
            ),
            (X_RENDER_ID, rendered.render_id.to_string()),
            (X_PAGE_COUNT, rendered.page_count.to_string()),
        ],
        Bytes::from(rendered.bytes),
    )
        .into_response()
}

/// `attachment; filename="..."` with characters that cannot appear in a
/// quoted ASCII header parameter replaced by '_'.
pub fn content_disposition(file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect();
    format!("attachment; filename=\"{safe}\"")
}
