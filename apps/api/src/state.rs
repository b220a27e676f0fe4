use std::sync::Arc;

use crate::config::Config;
use crate::layout::{MeasurementProvider, PageConfig};

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Everything here is read-only; each render builds its own cursor and pages.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Page geometry and type sizes used for every render.
    pub page_config: PageConfig,
    /// Text metrics. Default: the static Times tables.
    pub metrics: Arc<dyn MeasurementProvider + Send + Sync>,
}
