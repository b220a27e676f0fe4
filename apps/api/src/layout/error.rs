use thiserror::Error;

/// Failures raised while laying out a document.
///
/// Every variant is fatal to the render in progress: the partially built pages
/// are dropped with the render context and nothing is returned to the caller.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Font metrics unavailable: {0}")]
    Metrics(String),
}
