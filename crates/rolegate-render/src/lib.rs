//! Rendering utilities for CI surfaces (Markdown summaries).

#![forbid(unsafe_code)]

mod markdown;
mod model;

pub use markdown::render_markdown;
pub use model::{
    RenderableData, RenderableReport, RenderableResult, RenderableSeverity, RenderableStatus,
};
