//! Application use cases wiring the catalogue loader, compiler, validator,
//! settings, and renderers together for the CLI.

#![forbid(unsafe_code)]

mod check;
mod explain;
mod render;
mod report;

pub use check::{
    CheckInput, CheckOutput, Stage, ValidateInput, run_check, run_compile, run_validate,
    status_exit_code,
};
pub use explain::{ExplainOutput, format_explanation, format_not_found, run_explain};
pub use render::render_report_markdown;
pub use report::{parse_report_json, runtime_error_report, serialize_report, to_renderable};
