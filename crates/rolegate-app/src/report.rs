//! Report serialization, parsing, and projection helpers.

use anyhow::Context;
use rolegate_render::RenderableReport;
use rolegate_types::{
    ComplianceStatus, ReportEnvelope, RolegateData, RolegateReport, SCHEMA_REPORT_V1, Severity,
    ToolMeta, ValidationResult, ids,
};
use time::OffsetDateTime;

/// Parse a previously emitted report from JSON.
pub fn parse_report_json(input: &str) -> anyhow::Result<RolegateReport> {
    let report: RolegateReport = serde_json::from_str(input).context("parse report JSON")?;
    if report.schema != SCHEMA_REPORT_V1 {
        anyhow::bail!(
            "unsupported report schema '{}' (expected '{SCHEMA_REPORT_V1}')",
            report.schema
        );
    }
    Ok(report)
}

/// Serialize a report to pretty-printed JSON with a trailing newline.
pub fn serialize_report(report: &RolegateReport) -> anyhow::Result<String> {
    let mut out = serde_json::to_string_pretty(report).context("serialize report")?;
    out.push('\n');
    Ok(out)
}

/// Project a report into the renderer-facing shape.
pub fn to_renderable(report: &RolegateReport) -> RenderableReport {
    RenderableReport::from_envelope(report)
}

/// Build a minimal non-compliant report describing a runtime failure, so
/// consumers that only read report JSON still see the run failed.
pub fn runtime_error_report(message: &str) -> RolegateReport {
    let now = OffsetDateTime::now_utc();
    ReportEnvelope {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: "rolegate".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at: now,
        finished_at: now,
        status: ComplianceStatus::NonCompliant,
        results: vec![ValidationResult {
            severity: Severity::Critical,
            rule_id: ids::RULE_TOOL_RUNTIME.to_string(),
            code: ids::CODE_RUNTIME_ERROR.to_string(),
            passed: false,
            message: message.to_string(),
            role: None,
            statement: None,
            fingerprint: None,
            data: serde_json::Value::Null,
        }],
        policies: Default::default(),
        data: RolegateData::default(),
    }
}
