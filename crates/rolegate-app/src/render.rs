//! Thin wrappers over the render crate for CLI consumption.

use rolegate_types::RolegateReport;

/// Render a report as a Markdown summary.
pub fn render_report_markdown(report: &RolegateReport) -> String {
    let renderable = crate::report::to_renderable(report);
    rolegate_render::render_markdown(&renderable)
}
