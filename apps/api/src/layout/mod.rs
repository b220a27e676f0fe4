// Layout engine: turns a structured résumé into fixed-size pages of draw ops.
// Single-threaded and synchronous; callers on the async runtime must run it
// inside tokio::task::spawn_blocking.

pub mod assembler;
pub mod cursor;
pub mod error;
pub mod font_metrics;
pub mod page_config;
pub mod primitives;
pub mod sections;

// Re-export the public API consumed by the render handlers.
pub use assembler::{export_file_name, render_document, LaidOutDocument};
pub use cursor::{DrawOp, Page};
pub use error::LayoutError;
pub use font_metrics::{FontStyle, MeasurementProvider, StaticMetrics};
pub use page_config::{default_page_config, PageConfig};
